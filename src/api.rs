//! Subscription API abstraction
//!
//! The engine only needs two calls from the hosting provider: list one page
//! of watched repositories, and mark one repository as ignored. Keeping them
//! behind a trait lets the pagination and fan-out logic run against an
//! in-memory source in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::repo::RepoId;

/// Page size used when listing subscriptions
pub const PAGE_SIZE: u8 = 100;

/// Access to the authenticated user's repository subscriptions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Fetch one page of watched repositories
    ///
    /// Pages are numbered from 1. An empty page means there are no more.
    async fn list_subscriptions(&self, page: u32, per_page: u8) -> Result<Vec<RepoId>>;

    /// Set the subscription for `owner/name` to not subscribed, ignored
    async fn ignore_repo(&self, owner: &str, name: &str) -> Result<()>;

    /// Provider name for display/logging
    fn provider_name(&self) -> &'static str;
}
