//! In-memory page source
//!
//! Serves pages out of an ordered `Vec<Record>`. Used by the offline mode of
//! the CLI and throughout the tests.

use super::{Page, PageSource, Record, RecordId, Result, SourceError};
use async_trait::async_trait;
use std::sync::Arc;

/// Ordered in-memory collection
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: Arc<Vec<Record>>,
}

impl MemorySource {
    /// Create a source over the given records, in collection order
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Collection of records with the given ids and no display fields
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = RecordId>) -> Self {
        Self::new(ids.into_iter().map(Record::new).collect())
    }

    /// Synthetic collection with ids `1..=count` and a few display fields
    #[must_use]
    pub fn synthetic(count: u64) -> Self {
        let records = (1..=count)
            .map(|id| {
                Record::new(id)
                    .with_field("title", format!("Record {id}"))
                    .with_field("place_of_origin", "Offline")
                    .with_field("date_start", 1900 + (id % 100))
            })
            .collect();
        Self::new(records)
    }

    /// Total number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<Page> {
        if page_number == 0 {
            return Err(SourceError::InvalidPage(page_number));
        }

        let size = page_size as usize;
        let start = (page_number as usize - 1).saturating_mul(size);
        let records = self
            .records
            .iter()
            .skip(start)
            .take(size)
            .cloned()
            .collect();

        Ok(Page {
            page_number,
            records,
            total_count: self.records.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages_are_contiguous_slices() {
        let source = MemorySource::from_ids(1..=7);

        let first = source.fetch_page(1, 3).await.unwrap();
        let second = source.fetch_page(2, 3).await.unwrap();
        let third = source.fetch_page(3, 3).await.unwrap();

        assert_eq!(first.ids(), vec![1, 2, 3]);
        assert_eq!(second.ids(), vec![4, 5, 6]);
        assert_eq!(third.ids(), vec![7]);
        assert_eq!(third.total_count, 7);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let source = MemorySource::from_ids(1..=3);
        let page = source.fetch_page(5, 3).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count, 3);
    }

    #[tokio::test]
    async fn test_page_zero_rejected() {
        let source = MemorySource::from_ids(1..=3);
        assert!(matches!(
            source.fetch_page(0, 3).await,
            Err(SourceError::InvalidPage(0))
        ));
    }

    #[test]
    fn test_synthetic_records() {
        let source = MemorySource::synthetic(25);
        assert_eq!(source.len(), 25);
        assert_eq!(source.records[0].field_text("title"), "Record 1");
    }
}
