use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// YAML catalog; the built-in catalog is shown when omitted
    #[arg(long, env = "PRICING_CATALOG")]
    catalog: Option<PathBuf>,
}

pub(crate) fn run(args: &ShowArgs) -> Result<(), String> {
    let catalog = crate::cli::load_catalog(args.catalog.as_deref())?;

    let json = serde_json::to_string_pretty(&catalog.summary())
        .map_err(|error| format!("failed to encode catalog: {error}"))?;

    println!("{json}");

    Ok(())
}
