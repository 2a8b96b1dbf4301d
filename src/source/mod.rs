//! Page sources for a server-paginated record collection
//!
//! A [`PageSource`] answers one question: "give me page P of size S, and tell
//! me how many records the whole collection holds". Everything above this
//! module only ever sees one page at a time.
//!
//! # Implementations
//!
//! - **`HttpSource`**: JSON-over-HTTP source (`{"data": [...], "pagination": {"total": N}}`)
//! - **`MemorySource`**: ordered in-memory records, used for offline mode and tests
//! - **`CachedSource`**: optional decorator memoizing pages for a bounded time
//!
//! Page numbers are 1-based. A page past the end of the collection is an
//! empty page, not an error.

pub mod cache;
pub mod error;
pub mod http;
pub mod memory;

pub use cache::CachedSource;
pub use error::SourceError;
pub use http::HttpSource;
pub use memory::MemorySource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of a record in the remote collection
pub type RecordId = u64;

/// Result type for page fetches
pub type Result<T> = std::result::Result<T, SourceError>;

/// One item of the remote collection
///
/// Only `id` carries meaning for selection; the remaining fields are kept
/// verbatim for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record without display fields
    #[must_use]
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Builder-style helper to attach a display field
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Render a display field as plain text
    ///
    /// Strings are returned unquoted, `null` and missing fields as an empty string.
    #[must_use]
    pub fn field_text(&self, name: &str) -> String {
        match self.fields.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// A contiguous slice of the collection returned by one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub page_number: u32,

    /// Records in collection order
    pub records: Vec<Record>,

    /// Total number of records in the whole collection
    pub total_count: u64,
}

impl Page {
    /// Ids of the records on this page, in order
    #[must_use]
    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Number of pages needed to show `total_count` records
#[must_use]
pub fn page_count(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total_count.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

/// Fetches pages of records from a remote (or local) collection
///
/// Implementations must be stateless from the caller's point of view: the
/// same request may be issued any number of times.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch page `page_number` (1-based) holding at most `page_size` records
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the source cannot be reached or answers
    /// with something that is not a page.
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<Page>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Box<S> {
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<Page> {
        (**self).fetch_page(page_number, page_size).await
    }
}
