//! Latest Draft Handler

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use patisserie_app::domain::{drafts::DraftsServiceError, users::UserUuid};

use crate::{
    drafts::{get::DraftResponse, into_status_error},
    extensions::*,
};

/// Latest Draft Handler
///
/// Returns the owner's most recently updated draft.
#[endpoint(
    tags("drafts"),
    summary = "Latest draft for a user",
    responses(
        (status_code = StatusCode::OK, description = "Draft found"),
        (status_code = StatusCode::NOT_FOUND, description = "User has no draft"),
    ),
)]
pub(crate) async fn handler(
    owner: QueryParam<Uuid, true>,
    depot: &mut Depot,
) -> Result<Json<DraftResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let draft = state
        .app
        .drafts
        .get_latest_draft_for_user(UserUuid::from_uuid(owner.into_inner()))
        .await
        .map_err(into_status_error)?
        .ok_or_else(|| into_status_error(DraftsServiceError::NotFound))?;

    Ok(Json(draft.into()))
}
