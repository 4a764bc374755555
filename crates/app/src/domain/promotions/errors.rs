//! Promotions service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromotionsServiceError {
    /// Unknown, inactive or expired code.
    #[error("invalid code")]
    InvalidCode,

    #[error("promo code already exists")]
    AlreadyExists,

    #[error("invalid promo code data")]
    InvalidData,

    #[error("storage error")]
    Storage(#[source] Error),
}

impl From<Error> for PromotionsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::InvalidCode;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Storage(error),
        }
    }
}
