//! Order Totals

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discounts::{Discount, apply_discount, bonus_earned};

/// Checkout total for a cake plus its delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotal {
    /// Cake price.
    pub cake_price: i64,

    /// Delivery price.
    pub delivery_price: i64,

    /// Cake and delivery before discounts.
    pub subtotal: i64,

    /// Amount payable after the discount.
    pub total: i64,

    /// Loyalty bonus earned on `total`.
    pub bonus_earned: i64,
}

impl OrderTotal {
    /// Amount taken off by the discount.
    pub const fn savings(&self) -> i64 {
        self.subtotal.saturating_sub(self.total)
    }
}

/// Combine cake and delivery prices, apply a discount to their sum, and
/// compute the bonus earned on the discounted total.
pub fn order_total(
    cake_price: i64,
    delivery_price: i64,
    discount: Option<&Discount>,
    bonus_rate: Decimal,
) -> OrderTotal {
    let subtotal = cake_price.saturating_add(delivery_price);
    let total = apply_discount(subtotal, discount);

    OrderTotal {
        cake_price,
        delivery_price,
        subtotal,
        total,
        bonus_earned: bonus_earned(total, bonus_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discounts::STANDARD_BONUS_RATE;

    #[test]
    fn total_without_discount() {
        let total = order_total(4471, 395, None, STANDARD_BONUS_RATE);

        assert_eq!(total.subtotal, 4866, "subtotal");
        assert_eq!(total.total, 4866, "total");
        assert_eq!(total.bonus_earned, 243, "5% of 4866, floored");
        assert_eq!(total.savings(), 0, "no savings");
    }

    #[test]
    fn discount_applies_to_cake_and_delivery() {
        let discount = Discount {
            percent: Some(Decimal::from(10)),
            amount: Some(100),
        };

        let total = order_total(900, 100, Some(&discount), STANDARD_BONUS_RATE);

        assert_eq!(total.total, 800, "1000 * 0.9 - 100");
        assert_eq!(total.bonus_earned, 40, "bonus on discounted total");
        assert_eq!(total.savings(), 200, "savings");
    }

    #[test]
    fn zero_bonus_rate_earns_nothing() {
        let total = order_total(1000, 0, None, Decimal::ZERO);

        assert_eq!(total.bonus_earned, 0, "no bonus");
    }
}
