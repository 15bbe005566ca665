//! Whitelist reconciliation

use crate::repo::RepoId;
use crate::whitelist::Whitelist;

/// Organization repositories that are not whitelisted, in the order given
pub fn reconcile(org_repos: &[RepoId], whitelist: &Whitelist) -> Vec<RepoId> {
    org_repos
        .iter()
        .filter(|repo| !whitelist.contains(repo))
        .cloned()
        .collect()
}
