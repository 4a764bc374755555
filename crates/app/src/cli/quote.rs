use std::{io, path::PathBuf};

use clap::Args;
use patisserie::{
    configuration::{CakeConfiguration, Complexity, EventType, ProductType, Topping},
    engine::compute_price,
};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Product type: cake, dessert or smallCake
    #[arg(long = "type", default_value = "cake")]
    product_type: ProductType,

    /// Weight in kilograms
    #[arg(long)]
    weight: Decimal,

    #[arg(long, default_value_t = 1)]
    layers: u32,

    #[arg(long, default_value_t = 1)]
    fillings: u32,

    #[arg(long)]
    topping: Option<String>,

    #[arg(long)]
    event: Option<String>,

    #[arg(long)]
    complexity: Option<String>,

    /// YAML catalog; the built-in catalog is used when omitted
    #[arg(long, env = "PRICING_CATALOG")]
    catalog: Option<PathBuf>,

    /// Print the quote as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl QuoteArgs {
    fn configuration(&self) -> CakeConfiguration {
        CakeConfiguration {
            layer_count: self.layers,
            filling_count: self.fillings,
            topping: self.topping.as_deref().map(Topping::parse),
            event_type: self.event.as_deref().map(EventType::parse),
            complexity: self
                .complexity
                .as_deref()
                .map(Complexity::parse)
                .unwrap_or_default(),
            ..CakeConfiguration::new(self.product_type, self.weight)
        }
    }
}

pub(crate) fn run(args: &QuoteArgs) -> Result<(), String> {
    let catalog = super::load_catalog(args.catalog.as_deref())?;

    let quote = compute_price(&args.configuration(), &catalog).map_err(|error| error.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&quote)
            .map_err(|error| format!("failed to encode quote: {error}"))?;

        println!("{json}");

        return Ok(());
    }

    quote
        .write_to(io::stdout().lock(), catalog.currency())
        .map_err(|error| format!("failed to write quote: {error}"))
}
