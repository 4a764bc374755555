use std::path::Path;

use clap::{Parser, Subcommand};
use patisserie::catalog::RulesCatalog;

mod catalog;
mod db;
mod delivery;
mod promo;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "patisserie-app", about = "Patisserie pricing CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a cake configuration
    Quote(quote::QuoteArgs),
    /// Price a delivery
    Delivery(delivery::DeliveryArgs),
    Catalog(catalog::CatalogCommand),
    Db(db::DbCommand),
    Promo(promo::PromoCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Quote(args) => quote::run(&args),
            Commands::Delivery(args) => delivery::run(&args),
            Commands::Catalog(command) => catalog::run(command),
            Commands::Db(command) => db::run(command).await,
            Commands::Promo(command) => promo::run(command).await,
        }
    }
}

/// Load the catalog at `path`, or the built-in one.
fn load_catalog(path: Option<&Path>) -> Result<RulesCatalog, String> {
    path.map_or_else(
        || Ok(RulesCatalog::standard()),
        |path| {
            RulesCatalog::from_path(path)
                .map_err(|error| format!("failed to load catalog {}: {error}", path.display()))
        },
    )
}
