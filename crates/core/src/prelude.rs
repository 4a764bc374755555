//! Patisserie prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{CatalogError, CatalogSummary, RulesCatalog},
    configuration::{
        CakeConfiguration, Complexity, EventType, FieldError, ProductType, Topping,
        ValidationError,
    },
    delivery::{
        DeliveryMethod, DeliveryQuote, DeliveryTariff, DeliveryTariffs, compute_delivery_price,
    },
    discounts::{Discount, STANDARD_BONUS_RATE, apply_discount, bonus_earned},
    engine::{PricingError, compute_price},
    money::format_price,
    quote::PriceQuote,
    totals::{OrderTotal, order_total},
};
