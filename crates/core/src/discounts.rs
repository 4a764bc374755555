//! Discount and Bonus Resolver
//!
//! Promo-code discounts and loyalty bonus accrual. Promo codes are resolved
//! elsewhere; this module only applies what a lookup returned.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default loyalty bonus rate: 5% of the paid total.
pub const STANDARD_BONUS_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Discount resolved from a promo code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Percentage points taken off, e.g. `10` for 10%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,

    /// Flat amount taken off after the percentage, in whole currency units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

impl Discount {
    /// A percentage-only discount.
    pub const fn percent(points: Decimal) -> Self {
        Self {
            percent: Some(points),
            amount: None,
        }
    }

    /// A flat-amount-only discount.
    pub const fn amount(amount: i64) -> Self {
        Self {
            percent: None,
            amount: Some(amount),
        }
    }

    /// Percentage points clamped to `[0, 100]`.
    fn clamped_percent(&self) -> Option<Decimal> {
        self.percent
            .map(|points| points.clamp(Decimal::ZERO, HUNDRED))
            .filter(|points| !points.is_zero())
    }

    /// Flat amount, ignoring non-positive values.
    fn positive_amount(&self) -> Option<i64> {
        self.amount.filter(|amount| *amount > 0)
    }
}

/// Apply a discount to a total.
///
/// The percentage is applied first, then the flat amount. The result never
/// goes below zero and is rounded once, half away from zero.
pub fn apply_discount(total: i64, discount: Option<&Discount>) -> i64 {
    let Some(discount) = discount else {
        return total;
    };

    if discount.percent.is_some_and(|p| p < Decimal::ZERO || p > HUNDRED) {
        debug!(percent = ?discount.percent, "clamping discount percentage");
    }

    let mut result = Decimal::from(total);

    if let Some(points) = discount.clamped_percent() {
        let off = Percentage::from(points / HUNDRED) * result;

        result -= off;
    }

    if let Some(amount) = discount.positive_amount() {
        result = result.saturating_sub(Decimal::from(amount));
    }

    result
        .max(Decimal::ZERO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(total)
}

/// Loyalty bonus earned on a paid total, rounded down.
///
/// Negative totals and rates earn nothing.
pub fn bonus_earned(total: i64, rate: Decimal) -> i64 {
    if total <= 0 || rate <= Decimal::ZERO {
        return 0;
    }

    Decimal::from(total)
        .checked_mul(rate)
        .map_or(0, |bonus| bonus.floor().to_i64().unwrap_or(0))
}
