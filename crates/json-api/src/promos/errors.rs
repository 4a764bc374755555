//! Promo Code Errors

use salvo::http::StatusError;
use tracing::error;

use patisserie_app::domain::promotions::PromotionsServiceError;

pub(crate) fn into_status_error(error: PromotionsServiceError) -> StatusError {
    match error {
        PromotionsServiceError::InvalidCode => StatusError::bad_request().brief("invalid code"),
        PromotionsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promo code already exists")
        }
        PromotionsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promo code payload")
        }
        PromotionsServiceError::Storage(source) => {
            error!(%source, "failed to look up promo code");

            StatusError::internal_server_error()
        }
    }
}
