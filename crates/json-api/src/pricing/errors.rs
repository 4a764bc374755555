//! Pricing Errors

use salvo::{
    http::{StatusCode, StatusError},
    prelude::{Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use patisserie::{
    configuration::{FieldError, ValidationError},
    engine::PricingError,
};

/// Body of a 400 for a configuration the engine refused.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ValidationErrorResponse {
    pub error: String,

    /// Every offending field, in the order found
    pub fields: Vec<FieldError>,
}

impl From<&ValidationError> for ValidationErrorResponse {
    fn from(error: &ValidationError) -> Self {
        Self {
            error: "Invalid cake configuration".to_owned(),
            fields: error.fields().to_vec(),
        }
    }
}

/// Why a pricing request was turned away.
#[derive(Debug)]
pub(crate) enum PricingRejection {
    /// Rendered as a 400 listing the fields.
    Invalid(ValidationError),

    Status(StatusError),
}

impl PricingRejection {
    /// Write the rejection to `res`; anything but a validation failure is
    /// handed back for salvo to render.
    pub(crate) fn render(self, res: &mut Response) -> Result<(), StatusError> {
        match self {
            Self::Invalid(error) => {
                res.status_code(StatusCode::BAD_REQUEST);
                res.render(Json(ValidationErrorResponse::from(&error)));

                Ok(())
            }
            Self::Status(status) => Err(status),
        }
    }
}

impl From<ValidationError> for PricingRejection {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

impl From<StatusError> for PricingRejection {
    fn from(status: StatusError) -> Self {
        Self::Status(status)
    }
}

impl From<PricingError> for PricingRejection {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::Validation(error) => Self::Invalid(error),
            PricingError::Overflow { step } => {
                warn!(step, "price calculation overflowed");

                Self::Status(StatusError::bad_request().brief("Cake configuration is out of range"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use patisserie::configuration::CakeConfiguration;
    use serde_json::json;

    use super::*;

    #[test]
    fn response_lists_every_field() {
        let fields: Vec<String> = CakeConfiguration::from_value(&json!({ "layerCount": 0 }))
            .err()
            .map(|error| ValidationErrorResponse::from(&error).fields)
            .unwrap_or_default()
            .into_iter()
            .map(|field| field.field)
            .collect();

        assert!(fields.iter().any(|field| field == "productType"), "productType in {fields:?}");
        assert!(fields.iter().any(|field| field == "weightKg"), "weightKg in {fields:?}");
        assert!(fields.iter().any(|field| field == "layerCount"), "layerCount in {fields:?}");
    }

    #[test]
    fn overflow_stays_a_status_error() {
        let rejection = PricingRejection::from(PricingError::Overflow { step: "layers" });

        assert!(
            matches!(rejection, PricingRejection::Status(ref status) if status.code == StatusCode::BAD_REQUEST),
            "expected a 400 status, got {rejection:?}"
        );
    }
}
