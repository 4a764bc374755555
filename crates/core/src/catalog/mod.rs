//! Rules Catalog
//!
//! Read-only pricing tables: base price per kilogram, multipliers for layers,
//! toppings, events and complexity, the extra-filling surcharge and delivery
//! tariffs. Every quote records the catalog version it was computed with.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    configuration::{Complexity, EventType, ProductType, Topping},
    delivery::DeliveryTariffs,
};

mod file;

pub use file::{CatalogFile, DeliveryTariffFile, DeliveryTariffsFile};

/// Version identifier of [`RulesCatalog::standard`].
pub const STANDARD_CATALOG_VERSION: &str = "standard-1";

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Currency code not supported.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Base price keyed by an unknown product type.
    #[error("unknown product type in base prices: {0}")]
    UnknownProductType(String),

    /// Product type without a base price.
    #[error("missing base price for product type {0}")]
    MissingBasePrice(ProductType),

    /// Price or multiplier that must be strictly positive.
    #[error("{field} must be greater than zero, got {value}")]
    NonPositive {
        /// Catalog field path.
        field: String,

        /// Offending value.
        value: Decimal,
    },

    /// Layer multiplier below one would make extra layers cheaper.
    #[error("layer multiplier must be at least 1, got {0}")]
    LayerMultiplierBelowOne(Decimal),

    /// Surcharge or tariff component that must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Catalog field path.
        field: String,

        /// Offending value.
        value: Decimal,
    },
}

/// Base price per kilogram for each product type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePrices {
    /// Cakes.
    pub cake: Decimal,

    /// Desserts.
    pub dessert: Decimal,

    /// Small cakes.
    pub small_cake: Decimal,
}

impl BasePrices {
    /// Base price per kilogram for a product type.
    pub const fn get(&self, product_type: ProductType) -> Decimal {
        match product_type {
            ProductType::Cake => self.cake,
            ProductType::Dessert => self.dessert,
            ProductType::SmallCake => self.small_cake,
        }
    }
}

/// Pricing rules table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesCatalog {
    version: String,
    currency: &'static Currency,
    base_prices: BasePrices,
    layer_multiplier: Decimal,
    filling_surcharge: Decimal,
    toppings: FxHashMap<String, Decimal>,
    events: FxHashMap<String, Decimal>,
    complexities: FxHashMap<String, Decimal>,
    delivery: DeliveryTariffs,
}

impl RulesCatalog {
    /// Built-in catalog, priced in roubles.
    pub fn standard() -> Self {
        let toppings = [
            ("fondant", Decimal::ONE),
            ("cream", Decimal::new(9, 1)),
            ("chocolate", Decimal::new(11, 1)),
            ("buttercream", Decimal::ONE),
        ];

        let events = [
            ("wedding", Decimal::new(13, 1)),
            ("birthday", Decimal::ONE),
            ("corporate", Decimal::new(12, 1)),
            ("anniversary", Decimal::new(11, 1)),
            ("kids", Decimal::ONE),
            ("other", Decimal::ONE),
        ];

        let complexities = [
            ("simple", Decimal::ONE),
            ("medium", Decimal::new(12, 1)),
            ("complex", Decimal::new(15, 1)),
        ];

        Self {
            version: STANDARD_CATALOG_VERSION.to_string(),
            currency: iso::RUB,
            base_prices: BasePrices {
                cake: Decimal::from(1800),
                dessert: Decimal::from(1200),
                small_cake: Decimal::from(800),
            },
            layer_multiplier: Decimal::new(115, 2),
            filling_surcharge: Decimal::from(150),
            toppings: multiplier_table(toppings),
            events: multiplier_table(events),
            complexities: multiplier_table(complexities),
            delivery: DeliveryTariffs::standard(),
        }
    }

    /// Catalog version recorded on every quote.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Currency prices are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Base prices per kilogram.
    pub fn base_prices(&self) -> &BasePrices {
        &self.base_prices
    }

    /// Base price per kilogram for a product type.
    pub fn base_price(&self, product_type: ProductType) -> Decimal {
        self.base_prices.get(product_type)
    }

    /// Multiplier applied once per layer beyond the first.
    pub fn layer_multiplier(&self) -> Decimal {
        self.layer_multiplier
    }

    /// Surcharge per filling beyond the first.
    pub fn filling_surcharge(&self) -> Decimal {
        self.filling_surcharge
    }

    /// Topping multiplier; unknown or absent toppings are neutral.
    pub fn topping_multiplier(&self, topping: Option<&Topping>) -> Decimal {
        topping.map_or(Decimal::ONE, |topping| lookup(&self.toppings, topping.as_str()))
    }

    /// Event multiplier; unknown or absent events are neutral.
    pub fn event_multiplier(&self, event: Option<&EventType>) -> Decimal {
        event.map_or(Decimal::ONE, |event| lookup(&self.events, event.as_str()))
    }

    /// Complexity multiplier; unknown values are neutral.
    pub fn complexity_multiplier(&self, complexity: &Complexity) -> Decimal {
        lookup(&self.complexities, complexity.as_str())
    }

    /// Delivery tariffs.
    pub fn delivery(&self) -> &DeliveryTariffs {
        &self.delivery
    }

    /// Serializable overview of the catalog, with deterministic key order.
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            version: self.version.clone(),
            currency: self.currency.iso_alpha_code.to_string(),
            base_prices: self.base_prices,
            layer_multiplier: self.layer_multiplier,
            filling_surcharge: self.filling_surcharge,
            toppings: sorted(&self.toppings),
            events: sorted(&self.events),
            complexity: sorted(&self.complexities),
            delivery: self.delivery,
        }
    }
}

impl Default for RulesCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Catalog overview returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    /// Catalog version.
    pub version: String,

    /// ISO currency code.
    pub currency: String,

    /// Base prices per kilogram.
    pub base_prices: BasePrices,

    /// Per-layer multiplier.
    pub layer_multiplier: Decimal,

    /// Per-extra-filling surcharge.
    pub filling_surcharge: Decimal,

    /// Topping multipliers.
    pub toppings: BTreeMap<String, Decimal>,

    /// Event multipliers.
    pub events: BTreeMap<String, Decimal>,

    /// Complexity multipliers.
    pub complexity: BTreeMap<String, Decimal>,

    /// Delivery tariffs.
    pub delivery: DeliveryTariffs,
}

fn multiplier_table<const N: usize>(entries: [(&str, Decimal); N]) -> FxHashMap<String, Decimal> {
    entries
        .into_iter()
        .map(|(name, multiplier)| (name.to_string(), multiplier))
        .collect()
}

fn lookup(table: &FxHashMap<String, Decimal>, name: &str) -> Decimal {
    table
        .get(&name.trim().to_ascii_lowercase())
        .copied()
        .unwrap_or(Decimal::ONE)
}

fn sorted(table: &FxHashMap<String, Decimal>) -> BTreeMap<String, Decimal> {
    table
        .iter()
        .map(|(name, multiplier)| (name.clone(), *multiplier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_expected_base_prices() {
        let catalog = RulesCatalog::standard();

        assert_eq!(catalog.base_price(ProductType::Cake), Decimal::from(1800), "cake");
        assert_eq!(catalog.base_price(ProductType::Dessert), Decimal::from(1200), "dessert");
        assert_eq!(catalog.base_price(ProductType::SmallCake), Decimal::from(800), "small cake");
        assert_eq!(catalog.currency(), iso::RUB, "currency");
        assert_eq!(catalog.version(), STANDARD_CATALOG_VERSION, "version");
    }

    #[test]
    fn known_labels_resolve_to_their_multipliers() {
        let catalog = RulesCatalog::standard();

        assert_eq!(
            catalog.topping_multiplier(Some(&Topping::Chocolate)),
            Decimal::new(11, 1),
            "chocolate"
        );
        assert_eq!(
            catalog.event_multiplier(Some(&EventType::Wedding)),
            Decimal::new(13, 1),
            "wedding"
        );
        assert_eq!(
            catalog.complexity_multiplier(&Complexity::Complex),
            Decimal::new(15, 1),
            "complex"
        );
    }

    #[test]
    fn unknown_or_missing_labels_are_neutral() {
        let catalog = RulesCatalog::standard();

        assert_eq!(catalog.topping_multiplier(None), Decimal::ONE, "no topping");
        assert_eq!(
            catalog.topping_multiplier(Some(&Topping::Custom("marzipan".to_string()))),
            Decimal::ONE,
            "custom topping"
        );
        assert_eq!(
            catalog.event_multiplier(Some(&EventType::Custom("prom".to_string()))),
            Decimal::ONE,
            "custom event"
        );
        assert_eq!(
            catalog.complexity_multiplier(&Complexity::Custom("baroque".to_string())),
            Decimal::ONE,
            "custom complexity"
        );
    }

    #[test]
    fn summary_lists_tables_in_sorted_order() {
        let summary = RulesCatalog::standard().summary();
        let events: Vec<&str> = summary.events.keys().map(String::as_str).collect();

        assert_eq!(summary.currency, "RUB", "currency code");
        assert_eq!(
            events,
            ["anniversary", "birthday", "corporate", "kids", "other", "wedding"],
            "event keys"
        );
    }
}
