//! In-memory promo codes.

use async_trait::async_trait;
use jiff::Timestamp;
use patisserie::discounts::Discount;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::promotions::{
    errors::PromotionsServiceError,
    models::{PromoCode, normalize_code},
    service::PromotionsService,
};

#[derive(Debug, Default)]
pub struct MemoryPromotionsService {
    codes: RwLock<FxHashMap<String, PromoCode>>,
}

impl MemoryPromotionsService {
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = PromoCode>) -> Self {
        let codes = codes
            .into_iter()
            .map(|code| (normalize_code(&code.code), code))
            .collect();

        Self {
            codes: RwLock::new(codes),
        }
    }
}

#[async_trait]
impl PromotionsService for MemoryPromotionsService {
    async fn lookup_code(&self, code: &str) -> Result<Discount, PromotionsServiceError> {
        let codes = self.codes.read().await;

        codes
            .get(&normalize_code(code))
            .filter(|promo| promo.is_redeemable_at(Timestamp::now()))
            .map(|promo| promo.discount)
            .ok_or(PromotionsServiceError::InvalidCode)
    }

    async fn create_code(&self, code: PromoCode) -> Result<PromoCode, PromotionsServiceError> {
        let key = normalize_code(&code.code);

        if key.is_empty() {
            return Err(PromotionsServiceError::InvalidData);
        }

        let mut codes = self.codes.write().await;

        if codes.contains_key(&key) {
            return Err(PromotionsServiceError::AlreadyExists);
        }

        codes.insert(key, code.clone());

        Ok(code)
    }
}
