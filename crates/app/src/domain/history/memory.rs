//! In-memory draft history.

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;

use crate::domain::{
    drafts::models::DraftUuid,
    history::{
        errors::DraftHistoryError,
        models::{DraftHistoryEntry, DraftHistoryEntryUuid, NewDraftHistoryEntry},
        service::DraftHistoryService,
    },
};

#[derive(Debug, Default)]
pub struct MemoryDraftHistoryService {
    entries: Mutex<FxHashMap<DraftUuid, Vec<DraftHistoryEntry>>>,
}

impl MemoryDraftHistoryService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftHistoryService for MemoryDraftHistoryService {
    async fn record(
        &self,
        entry: NewDraftHistoryEntry,
    ) -> Result<DraftHistoryEntry, DraftHistoryError> {
        let recorded = DraftHistoryEntry {
            uuid: DraftHistoryEntryUuid::new(),
            draft: entry.draft,
            author: entry.author,
            config: entry.config,
            recorded_at: Timestamp::now(),
        };

        self.entries
            .lock()
            .await
            .entry(recorded.draft)
            .or_default()
            .push(recorded.clone());

        Ok(recorded)
    }

    async fn list_for_draft(
        &self,
        draft: DraftUuid,
    ) -> Result<Vec<DraftHistoryEntry>, DraftHistoryError> {
        Ok(self
            .entries
            .lock()
            .await
            .get(&draft)
            .cloned()
            .unwrap_or_default())
    }
}
