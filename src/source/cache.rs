//! Page cache decorator
//!
//! Wraps any `PageSource` and memoizes successful fetches keyed by
//! `(page_number, page_size)`. Entries expire after a fixed time-to-live and
//! the cache holds at most `max_pages` pages. Failed fetches are never cached.
//!
//! Off by default: without it every request goes to the wrapped source.

use super::{Page, PageSource, Result};
use crate::config::CacheConfig;
use async_trait::async_trait;
use moka::sync::Cache;
use std::time::Duration;
use tracing::trace;

/// Memoizing wrapper around another page source
pub struct CachedSource<S> {
    inner: S,
    pages: Cache<(u32, u32), Page>,
}

impl<S: PageSource> CachedSource<S> {
    /// Wrap `inner` with a cache bounded by `max_pages` entries and `ttl`
    #[must_use]
    pub fn new(inner: S, max_pages: u64, ttl: Duration) -> Self {
        let pages = Cache::builder()
            .max_capacity(max_pages)
            .time_to_live(ttl)
            .build();
        Self { inner, pages }
    }

    /// Wrap `inner` using the `[cache]` configuration section
    #[must_use]
    pub fn from_config(inner: S, config: &CacheConfig) -> Self {
        Self::new(inner, config.max_pages, Duration::from_secs(config.ttl_secs))
    }

    /// Drop every cached page
    pub fn invalidate_all(&self) {
        self.pages.invalidate_all();
    }

    /// Access the wrapped source
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: PageSource> PageSource for CachedSource<S> {
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<Page> {
        let key = (page_number, page_size);
        if let Some(page) = self.pages.get(&key) {
            trace!(page = page_number, "Page served from cache");
            return Ok(page);
        }

        let page = self.inner.fetch_page(page_number, page_size).await?;
        self.pages.insert(key, page.clone());
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSource;

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let source = CachedSource::new(ScriptedSource::numbered(9), 16, Duration::from_secs(60));

        let first = source.fetch_page(1, 3).await.unwrap();
        let second = source.fetch_page(1, 3).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.inner().requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn test_page_size_is_part_of_key() {
        let source = CachedSource::new(ScriptedSource::numbered(9), 16, Duration::from_secs(60));

        source.fetch_page(1, 3).await.unwrap();
        let bigger = source.fetch_page(1, 4).await.unwrap();

        assert_eq!(bigger.ids(), vec![1, 2, 3, 4]);
        assert_eq!(source.inner().requested_pages(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = CachedSource::new(
            ScriptedSource::numbered(9).fail_on_page(2),
            16,
            Duration::from_secs(60),
        );

        assert!(source.fetch_page(2, 3).await.is_err());
        assert!(source.fetch_page(2, 3).await.is_err());
        assert_eq!(source.inner().requested_pages(), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_invalidate_all_forces_refetch() {
        let source = CachedSource::new(ScriptedSource::numbered(9), 16, Duration::from_secs(60));

        source.fetch_page(1, 3).await.unwrap();
        source.invalidate_all();
        source.fetch_page(1, 3).await.unwrap();

        assert_eq!(source.inner().requested_pages(), vec![1, 1]);
    }
}
