//! Catalog Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use patisserie::catalog::CatalogSummary;

use crate::extensions::*;

/// Catalog Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CatalogResponse {
    /// Prices and multipliers quotes are computed with
    #[salvo(schema(value_type = Object))]
    pub catalog: CatalogSummary,
}

/// Catalog Handler
///
/// Returns the active rules catalog.
#[endpoint(tags("pricing"), summary = "Active pricing catalog")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CatalogResponse>, StatusError> {
    let state = depot.state_or_500()?;

    Ok(Json(CatalogResponse {
        catalog: state.app.catalog.summary(),
    }))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{service, test_app};

    use super::*;

    #[tokio::test]
    async fn returns_the_catalog_summary() -> TestResult {
        let body: CatalogResponse = TestClient::get("http://example.com/price")
            .send(&service(test_app(), Router::with_path("price").get(handler)))
            .await
            .take_json()
            .await?;

        assert_eq!(body.catalog.version, "standard-1", "version");
        assert_eq!(body.catalog.currency, "RUB", "currency");
        assert_eq!(body.catalog.base_prices.cake, Decimal::from(1800), "cake base price");
        assert_eq!(
            body.catalog.toppings.get("cream"),
            Some(&Decimal::new(9, 1)),
            "cream multiplier"
        );

        Ok(())
    }
}
