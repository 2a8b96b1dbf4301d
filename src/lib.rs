//! Pagesel - keeps a multi-page row selection consistent
//!
//! This library tracks which records of a paginated, server-backed collection
//! the user has selected while only one page is ever loaded, and can grow the
//! selection to "the first N records" by scanning pages in order.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod output;
pub mod selection;
pub mod session;
pub mod source;

#[cfg(test)]
pub mod testing;

pub use selection::{BulkSelectReport, Decision, PageDelta, SelectionError, SelectionManager};
pub use source::{Page, PageSource, Record, RecordId, SourceError};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum PageselError {
    /// Page source error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    /// Selection error
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
    /// Browse session error
    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_module_errors() {
        let error: PageselError = SourceError::InvalidPage(0).into();
        assert!(error.to_string().starts_with("Source error: "));

        let error: PageselError = session::SessionError::UnknownCommand("x".into()).into();
        assert!(error.to_string().contains("Unknown command: x"));
    }
}
