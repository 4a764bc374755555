//! Draft History Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use patisserie_app::domain::{history::models::NewDraftHistoryEntry, users::UserUuid};

use crate::extensions::*;

/// Draft History Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordHistoryRequest {
    pub draft_id: Uuid,

    pub author_user_id: Uuid,

    /// Configuration snapshot
    #[salvo(schema(value_type = Object))]
    pub config: Value,
}

impl From<RecordHistoryRequest> for NewDraftHistoryEntry {
    fn from(request: RecordHistoryRequest) -> Self {
        NewDraftHistoryEntry {
            draft: request.draft_id.into(),
            author: UserUuid::from_uuid(request.author_user_id),
            config: request.config,
        }
    }
}

/// Draft History Handler
///
/// Accepts a snapshot and records it in the background. Failures are logged
/// and never reported to the caller.
#[endpoint(
    tags("drafts"),
    summary = "Record a draft snapshot",
    responses((status_code = StatusCode::ACCEPTED, description = "Snapshot accepted")),
)]
pub(crate) async fn handler(
    json: JsonBody<RecordHistoryRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.state_or_500()?;
    let history = state.app.history.clone();
    let entry: NewDraftHistoryEntry = json.into_inner().into();

    tokio::spawn(async move {
        let draft = entry.draft;

        if let Err(source) = history.record(entry).await {
            warn!(%draft, %source, "failed to record draft history");
        }
    });

    res.status_code(StatusCode::ACCEPTED);

    Ok(())
}
