use std::path::PathBuf;

use clap::Args;
use patisserie::{
    delivery::{DeliveryMethod, compute_delivery_price},
    money::format_price,
};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct DeliveryArgs {
    /// Delivery method: pickup, courier or carrier
    #[arg(long, default_value = "courier")]
    method: String,

    #[arg(long)]
    distance_km: Option<Decimal>,

    #[arg(long)]
    weight_kg: Option<Decimal>,

    /// YAML catalog providing the delivery tariffs
    #[arg(long, env = "PRICING_CATALOG")]
    catalog: Option<PathBuf>,
}

pub(crate) fn run(args: &DeliveryArgs) -> Result<(), String> {
    let catalog = super::load_catalog(args.catalog.as_deref())?;
    let method = DeliveryMethod::parse(&args.method);

    let price = compute_delivery_price(&method, args.distance_km, args.weight_kg, catalog.delivery());

    println!("{}: {}", method.as_str(), format_price(price, catalog.currency()));

    Ok(())
}
