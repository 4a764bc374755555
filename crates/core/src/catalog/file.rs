//! Catalog Files
//!
//! YAML representation of a [`RulesCatalog`]. Decimals are written as strings
//! so multipliers such as `"1.15"` survive without float rounding.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, RUB, USD};
use serde::Deserialize;
use tracing::debug;

use crate::{
    catalog::{BasePrices, CatalogError, RulesCatalog},
    configuration::ProductType,
    delivery::{DeliveryTariff, DeliveryTariffs},
};

/// Catalog as written in YAML.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    /// Catalog version, e.g. `"2025-spring"`.
    pub version: String,

    /// ISO currency code.
    pub currency: String,

    /// Product type -> base price per kilogram.
    pub base_prices: FxHashMap<String, Decimal>,

    /// Per-layer multiplier.
    pub layer_multiplier: Decimal,

    /// Surcharge per filling beyond the first.
    pub filling_surcharge: Decimal,

    /// Topping -> multiplier.
    #[serde(default)]
    pub toppings: FxHashMap<String, Decimal>,

    /// Event -> multiplier.
    #[serde(default)]
    pub events: FxHashMap<String, Decimal>,

    /// Complexity -> multiplier.
    #[serde(default)]
    pub complexity: FxHashMap<String, Decimal>,

    /// Delivery tariffs; the standard tariffs when omitted.
    #[serde(default)]
    pub delivery: Option<DeliveryTariffsFile>,
}

/// Delivery tariffs as written in YAML.
#[derive(Debug, Deserialize)]
pub struct DeliveryTariffsFile {
    /// Own courier tariff.
    pub courier: DeliveryTariffFile,

    /// Third-party carrier tariff.
    pub carrier: DeliveryTariffFile,
}

/// A single delivery tariff as written in YAML.
#[derive(Debug, Deserialize)]
pub struct DeliveryTariffFile {
    /// Fixed part.
    pub base: Decimal,

    /// Price per kilometre.
    pub per_km: Decimal,

    /// Price per kilogram.
    pub per_kg: Decimal,

    /// Distance used when none is given.
    pub default_distance_km: Decimal,

    /// Weight used when none is given.
    pub default_weight_kg: Decimal,
}

impl RulesCatalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any value
    /// fails validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        debug!(path = %path.display(), "loading pricing catalog");

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or any value fails validation.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(contents)?;

        Self::try_from(file)
    }
}

impl TryFrom<CatalogFile> for RulesCatalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        let currency = parse_currency(&file.currency)?;
        let base_prices = parse_base_prices(&file.base_prices)?;

        if file.layer_multiplier < Decimal::ONE {
            return Err(CatalogError::LayerMultiplierBelowOne(file.layer_multiplier));
        }

        non_negative("filling_surcharge", file.filling_surcharge)?;

        let toppings = normalize_multipliers("toppings", file.toppings)?;
        let events = normalize_multipliers("events", file.events)?;
        let complexities = normalize_multipliers("complexity", file.complexity)?;

        let delivery = match file.delivery {
            Some(delivery) => DeliveryTariffs {
                courier: parse_tariff("delivery.courier", &delivery.courier)?,
                carrier: parse_tariff("delivery.carrier", &delivery.carrier)?,
            },
            None => DeliveryTariffs::standard(),
        };

        Ok(RulesCatalog {
            version: file.version,
            currency,
            base_prices,
            layer_multiplier: file.layer_multiplier,
            filling_surcharge: file.filling_surcharge,
            toppings,
            events,
            complexities,
            delivery,
        })
    }
}

fn parse_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "RUB" => Ok(RUB),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(CatalogError::UnknownCurrency(other.to_string())),
    }
}

fn parse_base_prices(prices: &FxHashMap<String, Decimal>) -> Result<BasePrices, CatalogError> {
    let mut parsed: FxHashMap<ProductType, Decimal> = FxHashMap::default();

    for (key, price) in prices {
        let product_type = key
            .parse::<ProductType>()
            .map_err(CatalogError::UnknownProductType)?;

        positive(&format!("base_prices.{key}"), *price)?;

        parsed.insert(product_type, *price);
    }

    let price_for = |product_type: ProductType| {
        parsed
            .get(&product_type)
            .copied()
            .ok_or(CatalogError::MissingBasePrice(product_type))
    };

    Ok(BasePrices {
        cake: price_for(ProductType::Cake)?,
        dessert: price_for(ProductType::Dessert)?,
        small_cake: price_for(ProductType::SmallCake)?,
    })
}

fn normalize_multipliers(
    table: &str,
    multipliers: FxHashMap<String, Decimal>,
) -> Result<FxHashMap<String, Decimal>, CatalogError> {
    multipliers
        .into_iter()
        .map(|(name, multiplier)| {
            positive(&format!("{table}.{name}"), multiplier)?;

            Ok((name.trim().to_ascii_lowercase(), multiplier))
        })
        .collect()
}

fn parse_tariff(field: &str, tariff: &DeliveryTariffFile) -> Result<DeliveryTariff, CatalogError> {
    for (component, value) in [
        ("base", tariff.base),
        ("per_km", tariff.per_km),
        ("per_kg", tariff.per_kg),
        ("default_distance_km", tariff.default_distance_km),
        ("default_weight_kg", tariff.default_weight_kg),
    ] {
        non_negative(&format!("{field}.{component}"), value)?;
    }

    Ok(DeliveryTariff {
        base: tariff.base,
        per_km: tariff.per_km,
        per_kg: tariff.per_kg,
        default_distance_km: tariff.default_distance_km,
        default_weight_kg: tariff.default_weight_kg,
    })
}

fn positive(field: &str, value: Decimal) -> Result<(), CatalogError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(CatalogError::NonPositive {
            field: field.to_string(),
            value,
        })
    }
}

fn non_negative(field: &str, value: Decimal) -> Result<(), CatalogError> {
    if value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(CatalogError::Negative {
            field: field.to_string(),
            value,
        })
    }
}
