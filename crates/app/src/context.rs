//! App Context

use std::sync::Arc;

use patisserie::catalog::RulesCatalog;
use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    database::{self, Db},
    domain::{
        drafts::{DraftsService, MemoryDraftsService, PgDraftsService},
        history::{DraftHistoryService, MemoryDraftHistoryService, PgDraftHistoryService},
        promotions::{MemoryPromotionsService, PgPromotionsService, PromotionsService},
        rate_limits::{MemoryRateLimitStore, RateLimitPolicy, RateLimitStore},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] MigrateError),
}

/// Services shared by every request.
#[derive(Clone)]
pub struct AppContext {
    pub drafts: Arc<dyn DraftsService>,
    pub history: Arc<dyn DraftHistoryService>,
    pub promotions: Arc<dyn PromotionsService>,
    pub rate_limits: Arc<dyn RateLimitStore>,
    pub catalog: Arc<RulesCatalog>,
}

impl AppContext {
    /// Build application context backed by `PostgreSQL`, applying pending
    /// migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn from_database_url(
        url: &str,
        catalog: RulesCatalog,
        policy: RateLimitPolicy,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        info!("database ready");

        let db = Db::new(pool);

        Ok(Self {
            drafts: Arc::new(PgDraftsService::new(db.clone())),
            history: Arc::new(PgDraftHistoryService::new(db.clone())),
            promotions: Arc::new(PgPromotionsService::new(db)),
            rate_limits: Arc::new(MemoryRateLimitStore::new(policy)),
            catalog: Arc::new(catalog),
        })
    }

    /// Build application context with every store held in process memory.
    pub fn in_memory(catalog: RulesCatalog, policy: RateLimitPolicy) -> Self {
        Self {
            drafts: Arc::new(MemoryDraftsService::new()),
            history: Arc::new(MemoryDraftHistoryService::new()),
            promotions: Arc::new(MemoryPromotionsService::new([])),
            rate_limits: Arc::new(MemoryRateLimitStore::new(policy)),
            catalog: Arc::new(catalog),
        }
    }
}
