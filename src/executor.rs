//! Unsubscribe executor
//!
//! Marks repositories as ignored. Every request in a batch is dispatched at
//! once and the batch completes only when all of them have settled. A failed
//! request never stops the others.

use anyhow::{anyhow, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::api::SubscriptionApi;
use crate::repo::RepoId;

/// Outcome of ignoring a single repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreResult {
    Ignored { repo: RepoId },
    Failed { repo: RepoId, error: String },
}

/// Results from a complete ignore batch
#[derive(Debug, Clone)]
pub struct IgnoreSummary {
    pub total_repositories: usize,
    pub ignored: usize,
    pub failed: usize,
    pub duration: Duration,
    pub results: Vec<IgnoreResult>,
}

impl IgnoreSummary {
    fn compile(results: Vec<IgnoreResult>, duration: Duration) -> Self {
        let failed = results
            .iter()
            .filter(|r| matches!(r, IgnoreResult::Failed { .. }))
            .count();

        Self {
            total_repositories: results.len(),
            ignored: results.len() - failed,
            failed,
            duration,
            results,
        }
    }

    /// Failed repositories with their error messages
    pub fn failures(&self) -> impl Iterator<Item = (&RepoId, &str)> {
        self.results.iter().filter_map(|r| match r {
            IgnoreResult::Failed { repo, error } => Some((repo, error.as_str())),
            IgnoreResult::Ignored { .. } => None,
        })
    }
}

/// Set a single repository's subscription to ignored
pub async fn ignore_repo(api: &dyn SubscriptionApi, repo: &RepoId) -> Result<()> {
    info!("Unsubscribing from {} (Ignoring)", repo);

    let (owner, name) = repo
        .owner_and_name()
        .ok_or_else(|| anyhow!("Expecting `owner/name`, but was `{}`", repo))?;

    api.ignore_repo(owner, name).await
}

/// Ignore every repository concurrently and wait for all of them
pub async fn ignore_all(api: &dyn SubscriptionApi, repos: &[RepoId]) -> IgnoreSummary {
    let start_time = Instant::now();

    let mut futures: FuturesUnordered<_> = repos
        .iter()
        .map(|repo| async move { (repo, ignore_repo(api, repo).await) })
        .collect();

    let mut results = Vec::with_capacity(repos.len());

    while let Some((repo, outcome)) = futures.next().await {
        match outcome {
            Ok(()) => {
                debug!("Ignored {}", repo);
                results.push(IgnoreResult::Ignored { repo: repo.clone() });
            }
            Err(e) => {
                error!("Failed to ignore {}: {:#}", repo, e);
                results.push(IgnoreResult::Failed {
                    repo: repo.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    IgnoreSummary::compile(results, start_time.elapsed())
}
