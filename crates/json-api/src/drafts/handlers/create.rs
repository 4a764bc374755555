//! Save Draft Handler

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use patisserie_app::domain::{drafts::models::NewDraft, users::UserUuid};

use crate::{
    drafts::{get::DraftResponse, into_status_error},
    extensions::*,
};

/// Save Draft Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveDraftRequest {
    pub owner_user_id: Uuid,

    /// Configuration in progress; stored as-is
    #[salvo(schema(value_type = Object))]
    pub config: Value,

    /// Draft to update; the owner's draft is found or created when omitted
    pub draft_id: Option<Uuid>,
}

impl From<SaveDraftRequest> for NewDraft {
    fn from(request: SaveDraftRequest) -> Self {
        NewDraft {
            owner: UserUuid::from_uuid(request.owner_user_id),
            config: request.config,
            draft: request.draft_id.map(Into::into),
        }
    }
}

/// Save Draft Handler
///
/// Creates the owner's draft on first save and updates it afterwards.
#[endpoint(
    tags("drafts"),
    summary = "Save Draft",
    responses(
        (status_code = StatusCode::CREATED, description = "Draft saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid draft payload"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown draft or foreign owner"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SaveDraftRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DraftResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let draft = state
        .app
        .drafts
        .upsert_draft(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    debug!(draft = %draft.uuid, owner = %draft.owner, "draft saved");

    res.add_header(LOCATION, format!("/drafts/{}", draft.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(draft.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use patisserie_app::{
        context::AppContext,
        domain::drafts::{DraftsServiceError, MockDraftsService, models::DraftUuid},
    };

    use crate::test_helpers::{make_draft, service, test_app};

    use super::*;

    fn make_service(app: AppContext) -> Service {
        service(app, Router::with_path("drafts").post(handler))
    }

    fn with_drafts(drafts: MockDraftsService) -> AppContext {
        AppContext {
            drafts: Arc::new(drafts),
            ..test_app()
        }
    }

    #[tokio::test]
    async fn first_save_creates_then_updates_in_place() -> TestResult {
        let service = make_service(test_app());
        let owner = UserUuid::new();

        let mut res = TestClient::post("http://example.com/drafts")
            .json(&json!({ "ownerUserId": owner, "config": { "weightKg": 1 } }))
            .send(&service)
            .await;

        let created: DraftResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED), "created");
        assert_eq!(location, Some(format!("/drafts/{}", created.id).as_str()), "location");

        let updated: DraftResponse = TestClient::post("http://example.com/drafts")
            .json(&json!({
                "ownerUserId": owner,
                "config": { "weightKg": 2 },
                "draftId": created.id
            }))
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(updated.id, created.id, "same draft");
        assert_eq!(updated.config, json!({ "weightKg": 2 }), "config replaced");

        Ok(())
    }

    #[tokio::test]
    async fn forwards_the_draft_to_the_store() {
        let owner = UserUuid::new();
        let uuid = DraftUuid::new();
        let saved = make_draft(uuid, owner, json!({ "weightKg": 3 }));

        let mut drafts = MockDraftsService::new();

        drafts
            .expect_upsert_draft()
            .once()
            .withf(move |new| {
                *new == NewDraft {
                    owner,
                    config: json!({ "weightKg": 3 }),
                    draft: Some(uuid),
                }
            })
            .return_once(move |_| Ok(saved));
        drafts.expect_get_draft().never();
        drafts.expect_get_latest_draft_for_user().never();

        let res = TestClient::post("http://example.com/drafts")
            .json(&json!({ "ownerUserId": owner, "config": { "weightKg": 3 }, "draftId": uuid }))
            .send(&make_service(with_drafts(drafts)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED), "saved");
    }

    #[tokio::test]
    async fn foreign_draft_returns_404() {
        let mut drafts = MockDraftsService::new();

        drafts
            .expect_upsert_draft()
            .once()
            .return_once(|_| Err(DraftsServiceError::NotFound));
        drafts.expect_get_draft().never();
        drafts.expect_get_latest_draft_for_user().never();

        let res = TestClient::post("http://example.com/drafts")
            .json(&json!({
                "ownerUserId": UserUuid::new(),
                "config": {},
                "draftId": DraftUuid::new()
            }))
            .send(&make_service(with_drafts(drafts)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND), "not the owner");
    }

    #[tokio::test]
    async fn non_object_config_returns_400() {
        let res = TestClient::post("http://example.com/drafts")
            .json(&json!({ "ownerUserId": UserUuid::new(), "config": [1, 2, 3] }))
            .send(&make_service(test_app()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "config must be an object");
    }
}
