use thiserror::Error;

use crate::model::{Model, StoreError};
use crate::notify::MessagingError;

/// Errors raised by library operations.
///
/// Validation and user errors carry the message shown to the user verbatim.
/// None of these errors is transient: callers report them, they do not retry.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A business rule rejected the data (bad ISBN, empty title, ...).
    #[error("{0}")]
    Validation(String),
    /// The operation is not allowed in the current situation.
    #[error("{0}")]
    UserError(String),
    /// A referenced record does not exist.
    #[error("{collection} record {id} does not exist")]
    NotFound { collection: String, id: String },
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

impl LibraryError {
    pub fn validation(message: impl Into<String>) -> Self {
        LibraryError::Validation(message.into())
    }

    pub fn user(message: impl Into<String>) -> Self {
        LibraryError::UserError(message.into())
    }

    pub(crate) fn not_found<M: Model>(id: &str) -> Self {
        LibraryError::NotFound {
            collection: M::COLLECTION.to_string(),
            id: id.to_string(),
        }
    }

    /// Whether the message is meant for the end user as-is. Store constraint
    /// violations count: they carry the constraint's declared message.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            LibraryError::Validation(_)
                | LibraryError::UserError(_)
                | LibraryError::Store(StoreError::Constraint { .. })
        )
    }
}

/// A store-level `NotFound` is reported like any other missing record.
impl From<StoreError> for LibraryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => LibraryError::NotFound { collection, id },
            other => LibraryError::Store(other),
        }
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;
