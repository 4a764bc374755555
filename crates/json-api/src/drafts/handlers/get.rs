//! Get Draft Handler

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use patisserie_app::domain::{
    drafts::{DraftsServiceError, models::Draft},
    users::UserUuid,
};

use crate::{drafts::into_status_error, extensions::*};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DraftResponse {
    pub id: Uuid,

    pub owner_user_id: Uuid,

    /// Configuration exactly as last saved
    #[salvo(schema(value_type = Object))]
    pub config: Value,

    pub created_at: String,

    pub updated_at: String,
}

impl From<Draft> for DraftResponse {
    fn from(draft: Draft) -> Self {
        Self {
            id: draft.uuid.into(),
            owner_user_id: draft.owner.into(),
            config: draft.config,
            created_at: draft.created_at.to_string(),
            updated_at: draft.updated_at.to_string(),
        }
    }
}

/// Get Draft Handler
///
/// Returns a draft belonging to `owner`. Drafts owned by anyone else are
/// reported as missing.
#[endpoint(
    tags("drafts"),
    summary = "Get Draft",
    responses(
        (status_code = StatusCode::OK, description = "Draft found"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown draft or foreign owner"),
    ),
)]
pub(crate) async fn handler(
    draft: PathParam<Uuid>,
    owner: QueryParam<Uuid, true>,
    depot: &mut Depot,
) -> Result<Json<DraftResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = UserUuid::from_uuid(owner.into_inner());

    let draft = state
        .app
        .drafts
        .get_draft(draft.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if draft.owner != owner {
        return Err(into_status_error(DraftsServiceError::NotFound));
    }

    Ok(Json(draft.into()))
}
