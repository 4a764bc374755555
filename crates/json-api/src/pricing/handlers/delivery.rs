//! Delivery Price Handler

use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use patisserie::{
    delivery::{DeliveryMethod, DeliveryQuote, DeliveryTariffs},
    money::format_price,
};

use crate::extensions::*;

/// Delivery Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeliveryRequest {
    /// pickup, courier or carrier
    pub method: String,

    #[salvo(schema(value_type = Option<f64>))]
    pub distance_km: Option<Decimal>,

    #[salvo(schema(value_type = Option<f64>))]
    pub weight_kg: Option<Decimal>,
}

/// Delivery Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryResponse {
    /// Normalised method name
    pub method: String,

    /// Price in whole currency units
    pub price: i64,

    pub formatted: String,
}

impl DeliveryRequest {
    pub(crate) fn quote(self, tariffs: &DeliveryTariffs) -> DeliveryQuote {
        DeliveryQuote::new(
            DeliveryMethod::parse(&self.method),
            self.distance_km,
            self.weight_kg,
            tariffs,
        )
    }
}

/// Delivery Price Handler
#[endpoint(tags("pricing"), summary = "Price a delivery")]
pub(crate) async fn handler(
    json: JsonBody<DeliveryRequest>,
    depot: &mut Depot,
) -> Result<Json<DeliveryResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let catalog = &state.app.catalog;

    let quote = json.into_inner().quote(catalog.delivery());

    Ok(Json(DeliveryResponse {
        method: quote.method.to_string(),
        price: quote.price,
        formatted: format_price(quote.price, catalog.currency()),
    }))
}
