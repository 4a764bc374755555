//! Patisserie
//!
//! Rules-based pricing for custom cakes: a versioned rules catalog, the price
//! engine, delivery pricing and the discount/bonus resolver used at checkout.

pub mod catalog;
pub mod configuration;
pub mod delivery;
pub mod discounts;
pub mod engine;
pub mod money;
pub mod prelude;
pub mod quote;
pub mod totals;
