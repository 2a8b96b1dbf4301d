//! JSON-over-HTTP page source
//!
//! Speaks the envelope used by public collection APIs such as
//! `https://api.artic.edu/api/v1/artworks`:
//!
//! ```text
//! GET {base_url}?page=2&limit=12&fields=id,title
//!
//! {
//!   "pagination": { "total": 128035, "current_page": 2, ... },
//!   "data": [ { "id": 27992, "title": "..." }, ... ]
//! }
//! ```
//!
//! Only `data[].id` and `pagination.total` are required; every other record
//! field is carried through untouched for display.

use super::{Page, PageSource, Record, Result, SourceError};
use crate::config::SourceConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Response envelope of one page request
#[derive(Debug, Deserialize)]
struct Envelope {
    data: Vec<Record>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total: u64,
}

/// Page source backed by a remote JSON API
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    fields: Vec<String>,
}

impl HttpSource {
    /// Build a source from configuration
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Transport` if the HTTP client cannot be built
    /// (e.g. TLS backend initialisation fails).
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            fields: config.fields.clone(),
        })
    }

    /// Query parameters for one page request
    fn query(&self, page_number: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", page_number.to_string()),
            ("limit", page_size.to_string()),
        ];
        if !self.fields.is_empty() {
            let mut fields = self.fields.clone();
            if !fields.iter().any(|f| f == "id") {
                fields.insert(0, "id".to_string());
            }
            query.push(("fields", fields.join(",")));
        }
        query
    }

    /// Decode a response body into a page
    fn decode(page_number: u32, body: &[u8]) -> Result<Page> {
        let envelope: Envelope =
            serde_json::from_slice(body).map_err(|e| SourceError::Malformed {
                page: page_number,
                reason: e.to_string(),
            })?;

        Ok(Page {
            page_number,
            records: envelope.data,
            total_count: envelope.pagination.total,
        })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<Page> {
        if page_number == 0 {
            return Err(SourceError::InvalidPage(page_number));
        }

        debug!(page = page_number, limit = page_size, url = %self.base_url, "Requesting page");

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query(page_number, page_size))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                page: page_number,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Self::decode(page_number, &body)
    }
}
