//! Price Quote Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use patisserie::{
    configuration::CakeConfiguration, engine::compute_price, money::format_price,
    quote::PriceQuote,
};

use crate::{extensions::*, pricing::PricingRejection};

/// Price Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceRequest {
    /// Cake configuration, as edited by the customer
    #[salvo(schema(value_type = Object))]
    pub config: Value,
}

/// Price Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceResponse {
    /// Final price in whole currency units
    pub price: i64,

    /// Final price formatted in the catalog currency
    pub formatted: String,

    /// Per-step breakdown
    #[salvo(schema(value_type = Object))]
    pub quote: PriceQuote,
}

/// Price Quote Handler
///
/// Prices a cake configuration against the active catalog.
#[endpoint(
    tags("pricing"),
    summary = "Price a cake configuration",
    responses(
        (status_code = StatusCode::OK, description = "Priced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid configuration"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Rate limited"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PriceRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    match price(&json.into_inner(), depot) {
        Ok(body) => {
            res.render(Json(body));

            Ok(())
        }
        Err(rejection) => rejection.render(res),
    }
}

fn price(request: &PriceRequest, depot: &Depot) -> Result<PriceResponse, PricingRejection> {
    let state = depot.state_or_500()?;
    let catalog = &state.app.catalog;

    let config = CakeConfiguration::from_value(&request.config)?;
    let quote = compute_price(&config, catalog)?;

    debug!(
        product = %config.product_type,
        price = quote.final_price,
        catalog = catalog.version(),
        "priced configuration"
    );

    Ok(PriceResponse {
        price: quote.final_price,
        formatted: format_price(quote.final_price, catalog.currency()),
        quote,
    })
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        pricing::ValidationErrorResponse,
        test_helpers::{service, test_app},
    };

    use super::*;

    fn make_service() -> Service {
        service(test_app(), Router::with_path("price").post(handler))
    }

    #[tokio::test]
    async fn prices_the_example_cake() -> TestResult {
        let body: PriceResponse = TestClient::post("http://example.com/price")
            .json(&json!({
                "config": {
                    "productType": "cake",
                    "weightKg": 2,
                    "layerCount": 2,
                    "topping": "cream",
                    "eventType": "birthday"
                }
            }))
            .send(&make_service())
            .await
            .take_json()
            .await?;

        assert_eq!(body.price, 4471, "final price");
        assert_eq!(body.quote.final_price, 4471, "quote price");
        assert_eq!(body.quote.catalog_version, "standard-1", "catalog version");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_labels_price_neutrally() -> TestResult {
        let body: PriceResponse = TestClient::post("http://example.com/price")
            .json(&json!({
                "config": {
                    "type": "tort",
                    "weight": "1",
                    "topping": "gold leaf",
                    "event": "graduation",
                    "complexity": "baroque"
                }
            }))
            .send(&make_service())
            .await
            .take_json()
            .await?;

        assert_eq!(body.price, 1800, "1800 per kg, all neutral");

        Ok(())
    }

    #[tokio::test]
    async fn invalid_configuration_lists_the_fields() -> TestResult {
        let mut res = TestClient::post("http://example.com/price")
            .json(&json!({ "config": { "productType": "pie", "weightKg": -1, "layerCount": 0 } }))
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "status");

        let body: ValidationErrorResponse = res.take_json().await?;
        let fields: Vec<&str> = body.fields.iter().map(|field| field.field.as_str()).collect();

        assert_eq!(body.error, "Invalid cake configuration", "error");
        assert!(fields.contains(&"productType"), "productType in {fields:?}");
        assert!(fields.contains(&"weightKg"), "weightKg in {fields:?}");
        assert!(fields.contains(&"layerCount"), "layerCount in {fields:?}");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_type_returns_400() {
        let res = TestClient::post("http://example.com/price")
            .json(&json!({ "config": { "productType": "pie", "weightKg": 1 } }))
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "strict product type");
    }
}
