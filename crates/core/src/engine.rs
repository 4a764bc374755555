//! Price Engine
//!
//! Pure computation of a cake price from a configuration and a catalog. Every
//! step runs in decimal space and the result is rounded exactly once.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;
use tracing::trace;

use crate::{
    catalog::RulesCatalog,
    configuration::{CakeConfiguration, ValidationError},
    quote::PriceQuote,
};

/// Errors that can occur while pricing a configuration.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Configuration failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Decimal arithmetic overflowed.
    #[error("price calculation overflowed while applying {step}")]
    Overflow {
        /// Pricing step that overflowed.
        step: &'static str,
    },
}

/// Compute the price of a configuration.
///
/// The steps are, in order: base price per kilogram times weight, the layer
/// multiplier for each tier beyond the first, topping and event multipliers,
/// the surcharge for each filling beyond the first, and the complexity
/// multiplier. The final price is rounded half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Validation`] when the weight is not positive or
/// there are no layers, and [`PricingError::Overflow`] when an intermediate
/// value does not fit.
pub fn compute_price(
    config: &CakeConfiguration,
    catalog: &RulesCatalog,
) -> Result<PriceQuote, PricingError> {
    config.validate()?;

    let base_price = catalog
        .base_price(config.product_type)
        .checked_mul(config.weight_kg)
        .ok_or(PricingError::Overflow { step: "base price" })?;

    let layer_factor = checked_pow(catalog.layer_multiplier(), config.layer_count.saturating_sub(1))
        .ok_or(PricingError::Overflow { step: "layers" })?;

    let after_layers = multiply(base_price, layer_factor, "layers")?;

    let after_topping = multiply(
        after_layers,
        catalog.topping_multiplier(config.topping.as_ref()),
        "topping",
    )?;

    let after_event = multiply(
        after_topping,
        catalog.event_multiplier(config.event_type.as_ref()),
        "event",
    )?;

    let filling_surcharge = Decimal::from(config.filling_count.saturating_sub(1))
        .checked_mul(catalog.filling_surcharge())
        .ok_or(PricingError::Overflow { step: "fillings" })?;

    let after_fillings = after_event
        .checked_add(filling_surcharge)
        .ok_or(PricingError::Overflow { step: "fillings" })?;

    let subtotal = multiply(
        after_fillings,
        catalog.complexity_multiplier(&config.complexity),
        "complexity",
    )?;

    let final_price = subtotal
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow { step: "rounding" })?;

    trace!(
        product_type = %config.product_type,
        %subtotal,
        final_price,
        catalog_version = catalog.version(),
        "computed cake price"
    );

    Ok(PriceQuote {
        base_price,
        layer_surcharge: after_layers - base_price,
        topping_adjustment: after_topping - after_layers,
        event_adjustment: after_event - after_topping,
        filling_surcharge,
        complexity_adjustment: subtotal - after_fillings,
        final_price,
        catalog_version: catalog.version().to_string(),
    })
}

fn multiply(value: Decimal, factor: Decimal, step: &'static str) -> Result<Decimal, PricingError> {
    value
        .checked_mul(factor)
        .ok_or(PricingError::Overflow { step })
}

/// Exponentiation by squaring, `None` on overflow.
fn checked_pow(base: Decimal, exponent: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    let mut remaining = exponent;

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(square)?;
        }

        remaining >>= 1;

        if remaining > 0 {
            square = square.checked_mul(square)?;
        }
    }

    Some(result)
}
