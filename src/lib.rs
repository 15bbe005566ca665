//! unwatch - Stop watching an organization's GitHub repositories
//!
//! unwatch lists every repository the authenticated user watches, keeps the
//! ones owned by a given organization, drops the ones on a whitelist and
//! marks the rest as ignored. Runs are dry runs unless forced.
//!
//! ## Modules
//!
//! - [`config`]: Configuration file and run settings
//! - [`github`]: GitHub API client and authentication
//! - [`subscriptions`]: Paginated subscription fetching
//! - [`whitelist`]: Whitelist loading
//! - [`reconcile`]: Whitelist reconciliation
//! - [`executor`]: Concurrent unsubscribe requests
//! - [`engine`]: Run orchestration

pub mod api;
pub mod config;
pub mod engine;
pub mod executor;
pub mod github;
pub mod reconcile;
pub mod repo;
pub mod subscriptions;
pub mod whitelist;

pub use api::SubscriptionApi;
pub use config::{Config, Mode, RunSettings};
pub use engine::{RunReport, UnwatchEngine};
pub use executor::{IgnoreResult, IgnoreSummary};
pub use github::GitHubClient;
pub use repo::RepoId;
pub use whitelist::Whitelist;
