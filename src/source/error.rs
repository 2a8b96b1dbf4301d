//! Page source error types
//!
//! Every variant means the same thing to the caller: the source is
//! unavailable for this request. The variants only differ in the cause they
//! carry for diagnostics.
//!
//! # Error Types
//!
//! - **`Transport`**: The HTTP request could not be sent or its body not read
//! - **`Status`**: The remote answered with a non-success status code
//! - **`Malformed`**: The body did not match the expected page envelope
//! - **`InvalidPage`**: Page number 0 was requested (pages are 1-based)
//! - **`Unavailable`**: Any other failure reported by a source implementation

use thiserror::Error;

/// Failure to obtain a page from a `PageSource`
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or protocol failure
    #[error("Source unavailable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote returned a non-success status
    #[error("Source unavailable: HTTP {status} for page {page}")]
    Status { page: u32, status: u16 },

    /// Body could not be decoded as a page
    #[error("Source unavailable: malformed response for page {page}: {reason}")]
    Malformed { page: u32, reason: String },

    /// Pages are numbered from 1
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// Generic unavailability reported by a source implementation
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
