//! Drafts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        drafts::{
            errors::DraftsServiceError,
            models::{Draft, DraftUuid, NewDraft},
            repository::PgDraftsRepository,
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgDraftsService {
    db: Db,
    repository: PgDraftsRepository,
}

impl PgDraftsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDraftsRepository::new(),
        }
    }
}

#[async_trait]
impl DraftsService for PgDraftsService {
    async fn get_draft(&self, draft: DraftUuid) -> Result<Draft, DraftsServiceError> {
        let mut tx = self.db.begin().await?;

        let draft = self.repository.get_draft(&mut tx, draft).await?;

        tx.commit().await?;

        Ok(draft)
    }

    async fn get_latest_draft_for_user(
        &self,
        owner: UserUuid,
    ) -> Result<Option<Draft>, DraftsServiceError> {
        let mut tx = self.db.begin().await?;

        let draft = self
            .repository
            .get_latest_draft_for_user(&mut tx, owner)
            .await?;

        tx.commit().await?;

        Ok(draft)
    }

    async fn upsert_draft(&self, draft: NewDraft) -> Result<Draft, DraftsServiceError> {
        if !draft.config.is_object() {
            return Err(DraftsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let saved = match draft.draft {
            Some(uuid) => {
                self.repository
                    .update_draft(&mut tx, uuid, draft.owner, &draft.config)
                    .await?
            }
            None => {
                self.repository
                    .upsert_draft(&mut tx, draft.owner, &draft.config)
                    .await?
            }
        };

        tx.commit().await?;

        debug!(draft = %saved.uuid, owner = %saved.owner, "saved draft");

        Ok(saved)
    }
}

#[automock]
#[async_trait]
pub trait DraftsService: Send + Sync {
    /// Retrieve a single draft.
    async fn get_draft(&self, draft: DraftUuid) -> Result<Draft, DraftsServiceError>;

    /// Retrieve the owner's most recently updated draft, if any.
    async fn get_latest_draft_for_user(
        &self,
        owner: UserUuid,
    ) -> Result<Option<Draft>, DraftsServiceError>;

    /// Save a draft.
    ///
    /// With a draft UUID the existing draft is updated, provided `owner` owns
    /// it; otherwise [`DraftsServiceError::NotFound`] is returned. Without one,
    /// the owner's draft is created or replaced atomically, so concurrent
    /// first saves still produce a single draft.
    async fn upsert_draft(&self, draft: NewDraft) -> Result<Draft, DraftsServiceError>;
}
