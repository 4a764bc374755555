//! Draft History Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::{
    drafts::models::DraftUuid,
    history::models::{DraftHistoryEntry, DraftHistoryEntryUuid, NewDraftHistoryEntry},
    users::UserUuid,
};

const RECORD_ENTRY_SQL: &str = include_str!("sql/record_entry.sql");
const LIST_ENTRIES_FOR_DRAFT_SQL: &str = include_str!("sql/list_entries_for_draft.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDraftHistoryRepository;

impl PgDraftHistoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &NewDraftHistoryEntry,
    ) -> Result<DraftHistoryEntry, sqlx::Error> {
        query_as::<Postgres, DraftHistoryEntry>(RECORD_ENTRY_SQL)
            .bind(DraftHistoryEntryUuid::new().into_uuid())
            .bind(entry.draft.into_uuid())
            .bind(entry.author.into_uuid())
            .bind(Json(&entry.config))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_for_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: DraftUuid,
    ) -> Result<Vec<DraftHistoryEntry>, sqlx::Error> {
        query_as::<Postgres, DraftHistoryEntry>(LIST_ENTRIES_FOR_DRAFT_SQL)
            .bind(draft.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for DraftHistoryEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DraftHistoryEntryUuid::from_uuid(row.try_get("uuid")?),
            draft: DraftUuid::from_uuid(row.try_get("draft_uuid")?),
            author: UserUuid::from_uuid(row.try_get("author_user_uuid")?),
            config: row.try_get::<Json<Value>, _>("config")?.0,
            recorded_at: row.try_get::<SqlxTimestamp, _>("recorded_at")?.to_jiff(),
        })
    }
}
