//! Order Total Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use patisserie::{
    configuration::CakeConfiguration,
    discounts::{Discount, STANDARD_BONUS_RATE},
    engine::compute_price,
    money::format_price,
    totals::{OrderTotal, order_total},
};

use crate::{
    extensions::*,
    pricing::{PricingRejection, delivery::DeliveryRequest},
    promos,
};

/// Order Total Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TotalsRequest {
    /// Cake configuration
    #[salvo(schema(value_type = Object))]
    pub config: Value,

    pub delivery: DeliveryRequest,

    /// Optional promo code, applied to cake and delivery together
    pub promo_code: Option<String>,
}

/// Order Total Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TotalsResponse {
    pub cake_price: i64,
    pub delivery_price: i64,
    pub subtotal: i64,
    pub total: i64,
    pub bonus_earned: i64,

    /// `total` formatted in the catalog currency
    pub formatted_total: String,
}

impl TotalsResponse {
    fn new(total: OrderTotal, formatted_total: String) -> Self {
        Self {
            cake_price: total.cake_price,
            delivery_price: total.delivery_price,
            subtotal: total.subtotal,
            total: total.total,
            bonus_earned: total.bonus_earned,
            formatted_total,
        }
    }
}

/// Order Total Handler
///
/// Prices the cake and its delivery, then applies the promo code and loyalty
/// bonus to the combined amount.
#[endpoint(
    tags("pricing"),
    summary = "Order total",
    responses(
        (status_code = StatusCode::OK, description = "Totals computed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid configuration or promo code"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<TotalsRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    match totals(json.into_inner(), depot).await {
        Ok(body) => {
            res.render(Json(body));

            Ok(())
        }
        Err(rejection) => rejection.render(res),
    }
}

async fn totals(request: TotalsRequest, depot: &Depot) -> Result<TotalsResponse, PricingRejection> {
    let state = depot.state_or_500()?;
    let catalog = &state.app.catalog;

    let config = CakeConfiguration::from_value(&request.config)?;
    let cake = compute_price(&config, catalog)?;
    let delivery = request.delivery.quote(catalog.delivery());

    let discount: Option<Discount> = match request.promo_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => Some(
            state
                .app
                .promotions
                .lookup_code(code)
                .await
                .map_err(promos::into_status_error)?,
        ),
        _ => None,
    };

    let total = order_total(
        cake.final_price,
        delivery.price,
        discount.as_ref(),
        STANDARD_BONUS_RATE,
    );

    debug!(total = total.total, savings = total.savings(), "computed order total");

    Ok(TotalsResponse::new(
        total,
        format_price(total.total, catalog.currency()),
    ))
}
