//! Testing utilities for pagesel
//!
//! This module provides a scripted page source that records every request
//! and can be told to fail or to trigger cancellation at a given page.
//!
//! Only available when compiled with `cfg(test)`.

use crate::source::{Page, PageSource, Record, RecordId, Result, SourceError};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// In-memory source with request log and failure injection
///
/// # Examples
/// ```ignore
/// let source = ScriptedSource::numbered(9).fail_on_page(2);
/// assert!(source.fetch_page(2, 3).await.is_err());
/// assert_eq!(source.requested_pages(), vec![2]);
/// ```
pub struct ScriptedSource {
    records: Vec<Record>,
    reported_total: Option<u64>,
    fail_on_page: Option<u32>,
    cancel_after: Option<(u32, CancellationToken)>,
    requests: Mutex<Vec<u32>>,
}

impl ScriptedSource {
    /// Source over the given ids, in order
    pub fn from_ids(ids: impl IntoIterator<Item = RecordId>) -> Self {
        Self {
            records: ids.into_iter().map(Record::new).collect(),
            reported_total: None,
            fail_on_page: None,
            cancel_after: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Source over ids `1..=count`
    pub fn numbered(count: RecordId) -> Self {
        Self::from_ids(1..=count)
    }

    /// Fail every request for `page`
    #[must_use]
    pub fn fail_on_page(mut self, page: u32) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    /// Report `total` as the collection size instead of the real count
    #[must_use]
    pub const fn with_reported_total(mut self, total: u64) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Cancel `token` right after serving `page`
    #[must_use]
    pub fn cancel_after_page(mut self, page: u32, token: CancellationToken) -> Self {
        self.cancel_after = Some((page, token));
        self
    }

    /// Page numbers requested so far, in order
    ///
    /// # Panics
    /// Panics if the request log mutex is poisoned.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<Page> {
        self.requests.lock().unwrap().push(page_number);

        if page_number == 0 {
            return Err(SourceError::InvalidPage(page_number));
        }
        if self.fail_on_page == Some(page_number) {
            return Err(SourceError::Unavailable(format!(
                "scripted failure on page {page_number}"
            )));
        }

        let size = page_size as usize;
        let records = self
            .records
            .iter()
            .skip((page_number as usize - 1) * size)
            .take(size)
            .cloned()
            .collect();

        if let Some((page, token)) = &self.cancel_after
            && *page == page_number
        {
            token.cancel();
        }

        Ok(Page {
            page_number,
            records,
            total_count: self
                .reported_total
                .unwrap_or(self.records.len() as u64),
        })
    }
}
