//! Drafts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::{
    drafts::models::{Draft, DraftUuid},
    users::UserUuid,
};

const GET_DRAFT_SQL: &str = include_str!("sql/get_draft.sql");
const GET_LATEST_DRAFT_FOR_USER_SQL: &str = include_str!("sql/get_latest_draft_for_user.sql");
const UPSERT_DRAFT_SQL: &str = include_str!("sql/upsert_draft.sql");
const UPDATE_DRAFT_SQL: &str = include_str!("sql/update_draft.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDraftsRepository;

impl PgDraftsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: DraftUuid,
    ) -> Result<Draft, sqlx::Error> {
        query_as::<Postgres, Draft>(GET_DRAFT_SQL)
            .bind(draft.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_latest_draft_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
    ) -> Result<Option<Draft>, sqlx::Error> {
        query_as::<Postgres, Draft>(GET_LATEST_DRAFT_FOR_USER_SQL)
            .bind(owner.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert the owner's draft, or replace its config when one exists.
    pub(crate) async fn upsert_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        config: &Value,
    ) -> Result<Draft, sqlx::Error> {
        query_as::<Postgres, Draft>(UPSERT_DRAFT_SQL)
            .bind(DraftUuid::new().into_uuid())
            .bind(owner.into_uuid())
            .bind(Json(config))
            .fetch_one(&mut **tx)
            .await
    }

    /// Update a draft the owner already has; `RowNotFound` for any other draft.
    pub(crate) async fn update_draft(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: DraftUuid,
        owner: UserUuid,
        config: &Value,
    ) -> Result<Draft, sqlx::Error> {
        query_as::<Postgres, Draft>(UPDATE_DRAFT_SQL)
            .bind(draft.into_uuid())
            .bind(owner.into_uuid())
            .bind(Json(config))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Draft {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DraftUuid::from_uuid(row.try_get("uuid")?),
            owner: UserUuid::from_uuid(row.try_get("owner_user_uuid")?),
            config: row.try_get::<Json<Value>, _>("config")?.0,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
