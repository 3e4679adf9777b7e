//! Canonical tag sources.

mod stashbox;

pub use stashbox::StashBoxClient;

use std::time::Duration;

use async_trait::async_trait;
use tagsync_model::CanonicalTag;
use tracing::{debug, info};

use crate::error::{Result, SyncError};

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(750);

/// One page of canonical tags together with the total the service reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPage {
    pub count: usize,
    pub tags: Vec<CanonicalTag>,
}

#[async_trait]
pub trait TagSource: Send + Sync {
    /// Fetch page `page` (1-based).
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<TagPage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub per_page: u32,
    /// Pause between consecutive page requests.
    pub page_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// Walk every page of `source` until the reported count is reached.
///
/// An empty page also ends the walk. Ending short of the reported count is
/// an error, so a partial list never reaches the cache.
pub async fn fetch_all(
    source: &dyn TagSource,
    options: &FetchOptions,
) -> Result<Vec<CanonicalTag>> {
    let mut tags: Vec<CanonicalTag> = Vec::new();
    let mut page = 1;
    info!("fetching canonical tags");

    let total = loop {
        if page > 1 && !options.page_delay.is_zero() {
            tokio::time::sleep(options.page_delay).await;
        }
        let TagPage { count, tags: batch } =
            source.fetch_page(page, options.per_page).await?;
        if batch.is_empty() {
            debug!(page, "empty page, stopping");
            break count;
        }
        for tag in &batch {
            debug!(n = tags.len() + 1, tag = %tag.name, "fetched tag");
        }
        tags.extend(batch);
        info!(page, fetched = tags.len(), total = count, "fetched page");

        if tags.len() >= count {
            break count;
        }
        page += 1;
    };

    if tags.len() < total {
        return Err(SyncError::InvalidResponse(format!(
            "tag listing ended after {} of {total} tags",
            tags.len()
        )));
    }

    info!(count = tags.len(), "fetched canonical tags");
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct PagedSource {
        pages: Vec<Vec<&'static str>>,
        count: usize,
        requested: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl TagSource for PagedSource {
        async fn fetch_page(&self, page: u32, _per_page: u32) -> Result<TagPage> {
            self.requested.lock().unwrap().push(page);
            let names = self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default();
            Ok(TagPage {
                count: self.count,
                tags: names
                    .into_iter()
                    .map(|n| CanonicalTag::new(n).unwrap())
                    .collect(),
            })
        }
    }

    fn quick() -> FetchOptions {
        FetchOptions {
            per_page: 2,
            page_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn stops_once_count_is_reached() {
        let source = PagedSource {
            pages: vec![vec!["A", "B"], vec!["C"], vec!["D"]],
            count: 3,
            requested: Mutex::new(Vec::new()),
        };
        let tags = fetch_all(&source, &quick()).await.unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_page_ends_a_shrinking_list() {
        let source = PagedSource {
            pages: vec![vec!["A", "B"]],
            count: 10,
            requested: Mutex::new(Vec::new()),
        };
        let err = fetch_all(&source, &quick()).await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidResponse(_)), "got {err}");
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_listing_with_zero_count_is_complete() {
        let source = PagedSource {
            pages: vec![],
            count: 0,
            requested: Mutex::new(Vec::new()),
        };
        let tags = fetch_all(&source, &quick()).await.unwrap();
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn short_listing_is_never_cached() {
        let source = PagedSource {
            pages: vec![],
            count: 5000,
            requested: Mutex::new(Vec::new()),
        };
        let dir = tempfile::tempdir().unwrap();
        let cache = crate::cache::TagCache::new(dir.path().join("tags.json"));

        assert!(cache.load_or_fetch(&source, &quick()).await.is_err());
        assert!(cache.load().await.unwrap().is_none());
    }
}
