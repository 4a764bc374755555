//! Promo Code Models

use jiff::Timestamp;
use patisserie::discounts::Discount;

use crate::uuids::TypedUuid;

/// Promo code UUID
pub type PromoCodeUuid = TypedUuid<PromoCode>;

/// Promo Code Model
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCode {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub discount: Discount,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
}

impl PromoCode {
    /// Create an active, non-expiring code.
    pub fn new(code: impl Into<String>, discount: Discount) -> Self {
        Self {
            uuid: PromoCodeUuid::new(),
            code: code.into(),
            discount,
            active: true,
            expires_at: None,
        }
    }

    /// Check whether the code can be redeemed at `now`.
    pub fn is_redeemable_at(&self, now: Timestamp) -> bool {
        self.active && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Normalise a code for lookup.
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}
