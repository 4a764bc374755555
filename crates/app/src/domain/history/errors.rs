//! Draft history errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftHistoryError {
    #[error("draft not found")]
    UnknownDraft,

    #[error("invalid history entry")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] Error),
}

impl From<Error> for DraftHistoryError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownDraft,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Storage(error),
        }
    }
}
