//! Drafts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftsServiceError {
    /// Unknown draft, or a draft owned by someone else.
    #[error("draft not found")]
    NotFound,

    #[error("invalid draft data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] Error),
}

impl From<Error> for DraftsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(
                ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
                | ErrorKind::ForeignKeyViolation,
            ) => Self::InvalidData,
            _ => Self::Storage(error),
        }
    }
}
