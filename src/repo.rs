//! Repository identifiers
//!
//! GitHub names every repository `owner/name`. The identifier is kept opaque:
//! equality is exact string comparison and casing is whatever GitHub returned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A repository identifier of the form `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self(full_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(owner, name)` on the first `/`
    ///
    /// Returns `None` when there is no separator or either side is empty.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        match self.0.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Some((owner, name)),
            _ => None,
        }
    }

    /// Whether this repository belongs to `org`, by exact `org/` prefix
    pub fn belongs_to(&self, org: &str) -> bool {
        self.0
            .strip_prefix(org)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepoId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RepoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for RepoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
