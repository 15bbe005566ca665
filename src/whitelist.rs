//! Whitelist loading
//!
//! The whitelist is a plain text file with one `owner/repo` per line. Blank
//! lines are skipped; there is no comment syntax.
//!
//! Loading fails open: an unreadable file is logged and treated as an empty
//! whitelist, so the run carries on without exemptions.

use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, info};

use crate::repo::RepoId;

/// Repositories exempt from being ignored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    repos: HashSet<RepoId>,
}

impl Whitelist {
    /// Load the whitelist from `path`, or return an empty one
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("No whitelist file configured");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let whitelist = Self::parse(&content);
                info!(
                    "Read {} whitelisted repos from {}",
                    whitelist.len(),
                    path.display()
                );
                whitelist
            }
            Err(e) => {
                error!(
                    "Error reading whitelist file {}: {}. Continuing with an empty whitelist",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Parse whitelist file contents
    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(RepoId::from)
            .collect()
    }

    pub fn contains(&self, repo: &RepoId) -> bool {
        self.repos.contains(repo)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

impl FromIterator<RepoId> for Whitelist {
    fn from_iter<I: IntoIterator<Item = RepoId>>(iter: I) -> Self {
        Self {
            repos: iter.into_iter().collect(),
        }
    }
}
