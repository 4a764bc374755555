//! Promo Codes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use patisserie::discounts::Discount;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::promotions::models::{PromoCode, PromoCodeUuid};

const LOOKUP_CODE_SQL: &str = include_str!("sql/lookup_code.sql");
const CREATE_CODE_SQL: &str = include_str!("sql/create_code.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromotionsRepository;

impl PgPromotionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Find a redeemable code; `RowNotFound` when there is none.
    pub(crate) async fn lookup_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<PromoCode, sqlx::Error> {
        query_as::<Postgres, PromoCode>(LOOKUP_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &PromoCode,
    ) -> Result<PromoCode, sqlx::Error> {
        query_as::<Postgres, PromoCode>(CREATE_CODE_SQL)
            .bind(code.uuid.into_uuid())
            .bind(code.code.trim())
            .bind(code.discount.percent)
            .bind(code.discount.amount)
            .bind(code.active)
            .bind(code.expires_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PromoCode {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PromoCodeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            discount: Discount {
                percent: row.try_get::<Option<Decimal>, _>("discount_percent")?,
                amount: row.try_get::<Option<i64>, _>("discount_amount")?,
            },
            active: row.try_get("active")?,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
