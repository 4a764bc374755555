//! Delivery Pricing

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the finished cake reaches the customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryMethod {
    /// Customer collects the order; always free.
    Pickup,

    /// Own courier.
    Courier,

    /// Third-party shipping carrier (also accepted as `sdek`).
    Carrier,

    /// Any method outside the known set; priced at zero.
    Custom(String),
}

impl DeliveryMethod {
    /// Parse a method name, keeping unknown names as [`DeliveryMethod::Custom`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        match value.to_ascii_lowercase().as_str() {
            "pickup" => Self::Pickup,
            "courier" => Self::Courier,
            "carrier" | "sdek" => Self::Carrier,
            _ => Self::Custom(value.to_string()),
        }
    }

    /// Wire name of the method.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pickup => "pickup",
            Self::Courier => "courier",
            Self::Carrier => "carrier",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for DeliveryMethod {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DeliveryMethod> for String {
    fn from(value: DeliveryMethod) -> Self {
        value.as_str().to_string()
    }
}

/// Linear tariff: `base + distance * per_km + weight * per_kg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTariff {
    /// Fixed part of the price.
    pub base: Decimal,

    /// Price per kilometre.
    pub per_km: Decimal,

    /// Price per kilogram.
    pub per_kg: Decimal,

    /// Distance used when none (or a negative one) is given.
    pub default_distance_km: Decimal,

    /// Weight used when none (or a negative one) is given.
    pub default_weight_kg: Decimal,
}

impl DeliveryTariff {
    /// Price for the given inputs, before rounding. `None` on overflow.
    fn price(&self, distance_km: Decimal, weight_kg: Decimal) -> Option<Decimal> {
        let distance = distance_km.checked_mul(self.per_km)?;
        let weight = weight_kg.checked_mul(self.per_kg)?;

        self.base.checked_add(distance)?.checked_add(weight)
    }
}

/// Tariffs for every priced delivery method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTariffs {
    /// Own courier tariff.
    pub courier: DeliveryTariff,

    /// Third-party carrier tariff.
    pub carrier: DeliveryTariff,
}

impl DeliveryTariffs {
    /// Standard tariffs: courier `300 + d*15 + w*20` (5 km, 1 kg defaults) and
    /// carrier `250 + d*8 + w*25` (10 km, 1 kg defaults).
    pub fn standard() -> Self {
        Self {
            courier: DeliveryTariff {
                base: Decimal::from(300),
                per_km: Decimal::from(15),
                per_kg: Decimal::from(20),
                default_distance_km: Decimal::from(5),
                default_weight_kg: Decimal::ONE,
            },
            carrier: DeliveryTariff {
                base: Decimal::from(250),
                per_km: Decimal::from(8),
                per_kg: Decimal::from(25),
                default_distance_km: Decimal::from(10),
                default_weight_kg: Decimal::ONE,
            },
        }
    }

    /// Tariff for a method, or `None` for methods without one.
    pub fn tariff(&self, method: &DeliveryMethod) -> Option<&DeliveryTariff> {
        match method {
            DeliveryMethod::Courier => Some(&self.courier),
            DeliveryMethod::Carrier => Some(&self.carrier),
            DeliveryMethod::Pickup | DeliveryMethod::Custom(_) => None,
        }
    }
}

impl Default for DeliveryTariffs {
    fn default() -> Self {
        Self::standard()
    }
}

/// A priced delivery request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuote {
    /// Delivery method.
    pub method: DeliveryMethod,

    /// Requested distance, if any.
    pub distance_km: Option<Decimal>,

    /// Requested weight, if any.
    pub weight_kg: Option<Decimal>,

    /// Price in whole currency units.
    pub price: i64,
}

impl DeliveryQuote {
    /// Price a delivery request against the given tariffs.
    pub fn new(
        method: DeliveryMethod,
        distance_km: Option<Decimal>,
        weight_kg: Option<Decimal>,
        tariffs: &DeliveryTariffs,
    ) -> Self {
        let price = compute_delivery_price(&method, distance_km, weight_kg, tariffs);

        Self {
            method,
            distance_km,
            weight_kg,
            price,
        }
    }
}

/// Compute the delivery price in whole currency units.
///
/// Pickup and unknown methods cost nothing. Missing or negative distance and
/// weight fall back to the tariff defaults. The result is rounded once, half
/// away from zero, and saturates at `i64::MAX`.
pub fn compute_delivery_price(
    method: &DeliveryMethod,
    distance_km: Option<Decimal>,
    weight_kg: Option<Decimal>,
    tariffs: &DeliveryTariffs,
) -> i64 {
    if let DeliveryMethod::Custom(name) = method {
        warn!(method = %name, "unknown delivery method, pricing as free");

        return 0;
    }

    let Some(tariff) = tariffs.tariff(method) else {
        return 0;
    };

    let distance = non_negative_or(distance_km, tariff.default_distance_km, "distance_km");
    let weight = non_negative_or(weight_kg, tariff.default_weight_kg, "weight_kg");

    let Some(price) = tariff.price(distance, weight) else {
        warn!(%method, %distance, %weight, "delivery price overflowed, saturating");

        return i64::MAX;
    };

    price
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

fn non_negative_or(value: Option<Decimal>, default: Decimal, field: &'static str) -> Decimal {
    match value {
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            warn!(field, %value, "negative delivery input, using default");

            default
        }
        Some(value) => value,
        None => default,
    }
}
