//! Promotions service.

use async_trait::async_trait;
use mockall::automock;
use patisserie::discounts::Discount;
use tracing::debug;

use crate::{
    database::Db,
    domain::promotions::{
        errors::PromotionsServiceError,
        models::{PromoCode, normalize_code},
        repository::PgPromotionsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPromotionsService {
    db: Db,
    repository: PgPromotionsRepository,
}

impl PgPromotionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromotionsRepository::new(),
        }
    }
}

#[async_trait]
impl PromotionsService for PgPromotionsService {
    async fn lookup_code(&self, code: &str) -> Result<Discount, PromotionsServiceError> {
        let code = normalize_code(code);

        if code.is_empty() {
            return Err(PromotionsServiceError::InvalidCode);
        }

        let mut tx = self.db.begin().await?;

        let promo = self.repository.lookup_code(&mut tx, &code).await?;

        tx.commit().await?;

        debug!(code = %promo.code, "resolved promo code");

        Ok(promo.discount)
    }

    async fn create_code(&self, code: PromoCode) -> Result<PromoCode, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_code(&mut tx, &code).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Resolve a promo code to its discount.
    ///
    /// Unknown, inactive and expired codes all return
    /// [`PromotionsServiceError::InvalidCode`].
    async fn lookup_code(&self, code: &str) -> Result<Discount, PromotionsServiceError>;

    /// Register a promo code.
    async fn create_code(&self, code: PromoCode) -> Result<PromoCode, PromotionsServiceError>;
}
