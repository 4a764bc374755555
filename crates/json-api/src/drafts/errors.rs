//! Draft Errors

use salvo::http::StatusError;
use tracing::error;

use patisserie_app::domain::drafts::DraftsServiceError;

pub(crate) fn into_status_error(error: DraftsServiceError) -> StatusError {
    match error {
        DraftsServiceError::NotFound => StatusError::not_found().brief("Draft not found"),
        DraftsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid draft payload")
        }
        DraftsServiceError::Storage(source) => {
            error!(%source, "draft storage failure");

            StatusError::internal_server_error()
        }
    }
}
