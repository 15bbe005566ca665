//! Unwatch Engine - orchestrates a single unwatch run
//!
//! A run loads the whitelist, fetches the organization's watched
//! repositories, removes whitelisted ones and then either reports the result
//! (dry run) or ignores every remaining repository concurrently.

use tracing::info;

use crate::api::SubscriptionApi;
use crate::config::{Mode, RunSettings};
use crate::executor::{self, IgnoreSummary};
use crate::reconcile::reconcile;
use crate::repo::RepoId;
use crate::subscriptions;
use crate::whitelist::Whitelist;

/// What a run did
#[derive(Debug, Clone)]
pub enum RunReport {
    /// No watched repository needs ignoring
    NothingToDo,
    /// Repositories that would be ignored with `--force`
    DryRun { to_ignore: Vec<RepoId> },
    /// Repositories that were ignored, with per-repository outcomes
    Executed {
        to_ignore: Vec<RepoId>,
        summary: IgnoreSummary,
    },
}

/// The engine that turns settings into a run against a subscription API
pub struct UnwatchEngine<'a> {
    api: &'a dyn SubscriptionApi,
}

impl<'a> UnwatchEngine<'a> {
    pub fn new(api: &'a dyn SubscriptionApi) -> Self {
        Self { api }
    }

    /// Run a complete unwatch pass
    pub async fn run(&self, settings: &RunSettings) -> RunReport {
        self.run_with_hook(settings, |_| {}).await
    }

    /// Run a complete unwatch pass, calling `before_ignore` with the
    /// repositories about to be ignored right before any request is sent
    ///
    /// The hook only runs in execute mode with a non-empty list.
    pub async fn run_with_hook<F>(&self, settings: &RunSettings, before_ignore: F) -> RunReport
    where
        F: FnOnce(&[RepoId]),
    {
        info!(
            "Starting unwatch run for @{} ({:?})",
            settings.org, settings.mode
        );

        let whitelist = Whitelist::load(settings.whitelist_path.as_deref());
        let org_repos =
            subscriptions::fetch_org_watched_repos(self.api, &settings.org, settings.per_page)
                .await;

        let to_ignore = reconcile(&org_repos, &whitelist);

        if to_ignore.is_empty() {
            info!("Nothing to do for @{}", settings.org);
            return RunReport::NothingToDo;
        }

        match settings.mode {
            Mode::DryRun => {
                info!("Dry run: {} repos would be ignored", to_ignore.len());
                RunReport::DryRun { to_ignore }
            }
            Mode::Execute => {
                info!("Ignoring {} repos", to_ignore.len());
                before_ignore(to_ignore.as_slice());

                let summary = executor::ignore_all(self.api, &to_ignore).await;

                info!(
                    "Ignore completed in {:.2}s: {} ignored, {} failed",
                    summary.duration.as_secs_f64(),
                    summary.ignored,
                    summary.failed
                );

                RunReport::Executed { to_ignore, summary }
            }
        }
    }
}
