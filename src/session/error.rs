//! Browse session error types
//!
//! # Error Types
//!
//! - **`UnknownCommand`** / **`InvalidArgument`**: the input line could not be
//!   understood; the session reports it and keeps going
//! - **`Input`**: reading from the terminal failed; ends the session

use thiserror::Error;

/// Errors that can occur during a browse session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown command: {0} (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl SessionError {
    /// Whether the session can continue after this error
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownCommand(_) | Self::InvalidArgument(_))
    }
}
