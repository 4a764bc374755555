//! Pricing

mod errors;
mod handlers;

pub(crate) use errors::{PricingRejection, ValidationErrorResponse};
pub(crate) use handlers::*;
