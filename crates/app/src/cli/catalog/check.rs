use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    /// Catalog file to validate
    path: PathBuf,
}

pub(crate) fn run(args: &CheckArgs) -> Result<(), String> {
    let catalog = crate::cli::load_catalog(Some(&args.path))?;

    println!(
        "{}: ok (version {}, currency {})",
        args.path.display(),
        catalog.version(),
        catalog.currency().iso_alpha_code
    );

    Ok(())
}
