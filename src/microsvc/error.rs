//! Error types for microsvc command handlers.

use thiserror::Error;

use crate::error::LibraryError;
use crate::model::StoreError;

/// Error type for command handler operations.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Payload decode / deserialization failed.
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// Business logic rejected the command. The message is user-facing.
    #[error("{0}")]
    Rejected(String),
    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// The record changed since it was read.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Missing or invalid authentication / authorization.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Guard rejected the command (input validation failed).
    #[error("guard rejected command: {0}")]
    GuardRejected(String),
    /// Any other library failure.
    #[error("handler error: {0}")]
    Library(LibraryError),
}

impl From<LibraryError> for HandlerError {
    fn from(err: LibraryError) -> Self {
        if err.is_user_facing() {
            return HandlerError::Rejected(err.to_string());
        }
        match err {
            LibraryError::NotFound { .. } | LibraryError::Store(StoreError::NotFound { .. }) => {
                HandlerError::NotFound(err.to_string())
            }
            LibraryError::Store(StoreError::ConcurrencyConflict { .. }) => {
                HandlerError::Conflict(err.to_string())
            }
            other => HandlerError::Library(other),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::Rejected(_) => 422,
            HandlerError::NotFound(_) => 404,
            HandlerError::Conflict(_) => 409,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Library(_) => 500,
        }
    }
}
