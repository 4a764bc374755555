//! Draft history service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        drafts::models::DraftUuid,
        history::{
            errors::DraftHistoryError,
            models::{DraftHistoryEntry, NewDraftHistoryEntry},
            repository::PgDraftHistoryRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgDraftHistoryService {
    db: Db,
    repository: PgDraftHistoryRepository,
}

impl PgDraftHistoryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDraftHistoryRepository::new(),
        }
    }
}

#[async_trait]
impl DraftHistoryService for PgDraftHistoryService {
    async fn record(
        &self,
        entry: NewDraftHistoryEntry,
    ) -> Result<DraftHistoryEntry, DraftHistoryError> {
        let mut tx = self.db.begin().await?;

        let recorded = self.repository.record(&mut tx, &entry).await?;

        tx.commit().await?;

        Ok(recorded)
    }

    async fn list_for_draft(
        &self,
        draft: DraftUuid,
    ) -> Result<Vec<DraftHistoryEntry>, DraftHistoryError> {
        let mut tx = self.db.begin().await?;

        let entries = self.repository.list_for_draft(&mut tx, draft).await?;

        tx.commit().await?;

        Ok(entries)
    }
}

#[automock]
#[async_trait]
pub trait DraftHistoryService: Send + Sync {
    /// Append a snapshot.
    async fn record(
        &self,
        entry: NewDraftHistoryEntry,
    ) -> Result<DraftHistoryEntry, DraftHistoryError>;

    /// Snapshots of a draft, oldest first.
    async fn list_for_draft(
        &self,
        draft: DraftUuid,
    ) -> Result<Vec<DraftHistoryEntry>, DraftHistoryError>;
}
