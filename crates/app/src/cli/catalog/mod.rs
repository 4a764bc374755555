use clap::{Args, Subcommand};

mod check;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// Validate a YAML catalog file
    Check(check::CheckArgs),
    /// Print the catalog in effect as JSON
    Show(show::ShowArgs),
}

pub(crate) fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::Check(args) => check::run(&args),
        CatalogSubcommand::Show(args) => show::run(&args),
    }
}
