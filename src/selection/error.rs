//! Selection error types
//!
//! Only the bulk-select scan can fail; page reconciliation works on data that
//! is already in memory.
//!
//! # Error Types
//!
//! - **`Source`**: A page fetch failed part-way through the scan
//! - **`Cancelled`**: The scan was cancelled between two page fetches
//!
//! Both variants carry the [`BulkSelectReport`] of what was achieved before
//! the scan stopped. That progress has already been applied to the selection.

use super::bulk::BulkSelectReport;
use crate::source::SourceError;
use thiserror::Error;

/// Errors surfaced by `SelectionManager`
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Page fetch failed; partial progress was kept
    #[error("Bulk select stopped at page {page}: {source}")]
    Source {
        page: u32,
        #[source]
        source: SourceError,
        report: BulkSelectReport,
    },

    /// Scan cancelled; partial progress was kept
    #[error("Bulk select cancelled after {} page(s)", .report.pages_scanned)]
    Cancelled { report: BulkSelectReport },

    /// Loading a page for display failed
    #[error("Failed to load page {page}: {source}")]
    PageLoad {
        page: u32,
        #[source]
        source: SourceError,
    },
}

impl SelectionError {
    /// Progress achieved by an interrupted bulk-select, if any
    #[must_use]
    pub fn partial_report(&self) -> Option<&BulkSelectReport> {
        match self {
            Self::Source { report, .. } | Self::Cancelled { report } => Some(report),
            Self::PageLoad { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
