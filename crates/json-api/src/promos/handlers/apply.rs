//! Apply Promo Code Handler

use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use patisserie::discounts::Discount;

use crate::{extensions::*, promos::into_status_error};

/// Apply Promo Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyPromoRequest {
    pub code: String,
}

/// Resolved discount
#[derive(Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscountResponse {
    /// Percentage points off
    #[serde(skip_serializing_if = "Option::is_none")]
    #[salvo(schema(value_type = Option<f64>))]
    pub discount_percent: Option<Decimal>,

    /// Flat amount off, in whole currency units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<i64>,
}

impl From<Discount> for DiscountResponse {
    fn from(discount: Discount) -> Self {
        Self {
            discount_percent: discount.percent,
            discount_amount: discount.amount,
        }
    }
}

/// Apply Promo Code Handler
///
/// Resolves a promo code to the discount it grants.
#[endpoint(
    tags("promos"),
    summary = "Apply a promo code",
    responses(
        (status_code = StatusCode::OK, description = "Code is valid"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown, inactive or expired code"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ApplyPromoRequest>,
    depot: &mut Depot,
) -> Result<Json<DiscountResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let discount = state
        .app
        .promotions
        .lookup_code(&json.into_inner().code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(discount.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use patisserie_app::{
        context::AppContext,
        domain::promotions::{MockPromotionsService, PromotionsServiceError},
    };

    use crate::test_helpers::{service, test_app};

    use super::*;

    fn make_service(promotions: MockPromotionsService) -> Service {
        let app = AppContext {
            promotions: Arc::new(promotions),
            ..test_app()
        };

        service(app, Router::with_path("promos/apply").post(handler))
    }

    #[tokio::test]
    async fn valid_code_returns_discount() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_lookup_code()
            .once()
            .withf(|code| code == "SPRING10")
            .return_once(|_| Ok(Discount::percent(Decimal::from(10))));

        promotions.expect_create_code().never();

        let body: DiscountResponse = TestClient::post("http://example.com/promos/apply")
            .json(&json!({ "code": "SPRING10" }))
            .send(&make_service(promotions))
            .await
            .take_json()
            .await?;

        assert_eq!(body.discount_percent, Some(Decimal::from(10)), "percent");
        assert_eq!(body.discount_amount, None, "no amount");

        Ok(())
    }

    #[tokio::test]
    async fn invalid_code_returns_400() {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_lookup_code()
            .once()
            .return_once(|_| Err(PromotionsServiceError::InvalidCode));

        promotions.expect_create_code().never();

        let res = TestClient::post("http://example.com/promos/apply")
            .json(&json!({ "code": "NOPE" }))
            .send(&make_service(promotions))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "invalid code");
    }
}
