//! In-memory drafts store for single-instance deployments and tests.

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;

use crate::domain::{
    drafts::{
        errors::DraftsServiceError,
        models::{Draft, DraftUuid, NewDraft},
        service::DraftsService,
    },
    users::UserUuid,
};

#[derive(Debug, Default)]
struct DraftsState {
    drafts: FxHashMap<DraftUuid, Draft>,
    by_owner: FxHashMap<UserUuid, DraftUuid>,
}

/// Drafts kept in process memory. Both indexes sit behind one lock so an
/// upsert is a single critical section.
#[derive(Debug, Default)]
pub struct MemoryDraftsService {
    state: Mutex<DraftsState>,
}

impl MemoryDraftsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftsService for MemoryDraftsService {
    async fn get_draft(&self, draft: DraftUuid) -> Result<Draft, DraftsServiceError> {
        let state = self.state.lock().await;

        state
            .drafts
            .get(&draft)
            .cloned()
            .ok_or(DraftsServiceError::NotFound)
    }

    async fn get_latest_draft_for_user(
        &self,
        owner: UserUuid,
    ) -> Result<Option<Draft>, DraftsServiceError> {
        let state = self.state.lock().await;

        Ok(state
            .by_owner
            .get(&owner)
            .and_then(|uuid| state.drafts.get(uuid))
            .cloned())
    }

    async fn upsert_draft(&self, draft: NewDraft) -> Result<Draft, DraftsServiceError> {
        if !draft.config.is_object() {
            return Err(DraftsServiceError::InvalidData);
        }

        let mut state = self.state.lock().await;
        let now = Timestamp::now();

        let owner_draft = state.by_owner.get(&draft.owner).copied();

        let existing = match draft.draft {
            Some(uuid) => Some(
                state
                    .drafts
                    .get_mut(&uuid)
                    .filter(|existing| existing.owner == draft.owner)
                    .ok_or(DraftsServiceError::NotFound)?,
            ),
            None => owner_draft.and_then(|uuid| state.drafts.get_mut(&uuid)),
        };

        if let Some(existing) = existing {
            existing.config = draft.config;
            existing.updated_at = now.max(existing.updated_at);

            return Ok(existing.clone());
        }

        let created = Draft {
            uuid: DraftUuid::new(),
            owner: draft.owner,
            config: draft.config,
            created_at: now,
            updated_at: now,
        };

        state.by_owner.insert(created.owner, created.uuid);
        state.drafts.insert(created.uuid, created.clone());

        Ok(created)
    }
}
