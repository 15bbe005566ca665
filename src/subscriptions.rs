//! Paginated subscription fetching
//!
//! Subscriptions are read page by page, starting at page 1, until a page
//! comes back empty. The pages are exposed as a lazy stream: nothing is
//! requested until the stream is polled, and calling [`subscription_pages`]
//! again starts over from the first page.

use anyhow::{Context, Result};
use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, error, info};

use crate::api::SubscriptionApi;
use crate::repo::RepoId;

/// Lazily stream pages of watched repositories until an empty page
///
/// The stream ends after the first error.
pub fn subscription_pages<'a>(
    api: &'a dyn SubscriptionApi,
    per_page: u8,
) -> impl Stream<Item = Result<Vec<RepoId>>> + Send + 'a {
    stream::try_unfold(1u32, move |page| async move {
        debug!("Fetching subscriptions page {}", page);

        let items = api
            .list_subscriptions(page, per_page)
            .await
            .with_context(|| format!("Failed to fetch subscriptions page {}", page))?;

        if items.is_empty() {
            debug!("Page {} is empty, stopping", page);
            return Ok(None);
        }

        anyhow::Ok(Some((items, page + 1)))
    })
}

/// Collect every watched repository, unfiltered, in the order returned
pub async fn fetch_all_subscriptions(
    api: &dyn SubscriptionApi,
    per_page: u8,
) -> Result<Vec<RepoId>> {
    let pages: Vec<Vec<RepoId>> = subscription_pages(api, per_page).try_collect().await?;
    Ok(pages.into_iter().flatten().collect())
}

/// Watched repositories belonging to `org`, or the first error
///
/// Filtering happens only once the full listing has been collected, so a
/// failure never yields a partial list.
pub async fn try_fetch_org_watched_repos(
    api: &dyn SubscriptionApi,
    org: &str,
    per_page: u8,
) -> Result<Vec<RepoId>> {
    let all = fetch_all_subscriptions(api, per_page).await?;
    debug!("Fetched {} subscriptions in total", all.len());

    let org_repos: Vec<RepoId> = all.into_iter().filter(|r| r.belongs_to(org)).collect();

    info!(
        "Found {} subscriptions to @{} repos",
        org_repos.len(),
        org
    );

    Ok(org_repos)
}

/// Watched repositories belonging to `org`, or nothing on failure
///
/// A failed fetch is logged and treated the same as an organization with no
/// subscriptions.
pub async fn fetch_org_watched_repos(
    api: &dyn SubscriptionApi,
    org: &str,
    per_page: u8,
) -> Vec<RepoId> {
    match try_fetch_org_watched_repos(api, org, per_page).await {
        Ok(repos) => repos,
        Err(e) => {
            error!(
                "Error fetching subscriptions from {}: {:#}",
                api.provider_name(),
                e
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::PAGE_SIZE;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory page source that records which pages were requested
    pub(crate) struct PagedSource {
        pages: Vec<Vec<RepoId>>,
        fail_on_page: Option<u32>,
        pub(crate) requested: Mutex<Vec<u32>>,
    }

    impl PagedSource {
        pub(crate) fn new(pages: Vec<Vec<RepoId>>) -> Self {
            Self {
                pages,
                fail_on_page: None,
                requested: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn of_sizes(org: &str, sizes: &[usize]) -> Self {
            let mut next = 0;
            let pages: Vec<Vec<RepoId>> = sizes
                .iter()
                .map(|&size| {
                    (0..size)
                        .map(|_| {
                            next += 1;
                            RepoId::new(format!("{}/repo-{}", org, next))
                        })
                        .collect()
                })
                .collect();
            Self::new(pages)
        }

        pub(crate) fn failing_on(mut self, page: u32) -> Self {
            self.fail_on_page = Some(page);
            self
        }
    }

    #[async_trait]
    impl SubscriptionApi for PagedSource {
        async fn list_subscriptions(&self, page: u32, _per_page: u8) -> Result<Vec<RepoId>> {
            self.requested.lock().unwrap().push(page);
            if self.fail_on_page == Some(page) {
                return Err(anyhow!("rate limited"));
            }
            Ok(self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default())
        }

        async fn ignore_repo(&self, _owner: &str, _name: &str) -> Result<()> {
            Ok(())
        }

        fn provider_name(&self) -> &'static str {
            "memory"
        }
    }

    fn ids(names: &[&str]) -> Vec<RepoId> {
        names.iter().map(|&n| RepoId::new(n)).collect()
    }

    #[tokio::test]
    async fn test_pagination_stops_on_empty_page() {
        let source = PagedSource::of_sizes("org", &[100, 100, 37, 0]);

        let all = fetch_all_subscriptions(&source, PAGE_SIZE).await.unwrap();

        assert_eq!(all.len(), 237);
        assert_eq!(all[0].as_str(), "org/repo-1");
        assert_eq!(all[236].as_str(), "org/repo-237");
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_stream_is_lazy_and_restartable() {
        let source = PagedSource::of_sizes("org", &[2, 1]);

        let pages = subscription_pages(&source, PAGE_SIZE);
        assert!(source.requested.lock().unwrap().is_empty());
        let first: Vec<Vec<RepoId>> = pages.try_collect().await.unwrap();

        let again: Vec<Vec<RepoId>> = subscription_pages(&source, PAGE_SIZE)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(first, again);
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_filters_by_exact_org_prefix() {
        let source = PagedSource::new(vec![ids(&["org/a", "org/b", "other/c", "organic/d"])]);

        let repos = fetch_org_watched_repos(&source, "org", PAGE_SIZE).await;

        assert_eq!(repos, ids(&["org/a", "org/b"]));
    }

    #[tokio::test]
    async fn test_failure_yields_empty_not_partial() {
        let source = PagedSource::of_sizes("org", &[100, 100, 37]).failing_on(2);

        let repos = fetch_org_watched_repos(&source, "org", PAGE_SIZE).await;
        assert!(repos.is_empty());

        // Nothing past the failing page is requested
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_try_fetch_surfaces_error() {
        let source = PagedSource::of_sizes("org", &[3]).failing_on(1);

        let err = try_fetch_org_watched_repos(&source, "org", PAGE_SIZE)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("page 1"));
        assert!(format!("{:#}", err).contains("rate limited"));
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let source = PagedSource::new(vec![]);

        let repos = try_fetch_org_watched_repos(&source, "org", PAGE_SIZE)
            .await
            .unwrap();

        assert!(repos.is_empty());
        assert_eq!(*source.requested.lock().unwrap(), vec![1]);
    }
}
