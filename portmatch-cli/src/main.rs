//! portmatch CLI
//!
//! Finds the games in a Steam, Epic or GOG library that have a PortMaster
//! port.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;

use cli_types::{CacheAction, CatalogAction, Cli, Commands, ConfigAction};
use commands::cache::{run_cache_clear, run_cache_list};
use commands::catalog::{run_catalog_list, run_catalog_lookup};
use commands::compare::run_compare;
use commands::config::{run_config_path, run_config_set_key, run_config_show};
use error::CliError;

fn run(cli: Cli) -> Result<(), CliError> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Compare {
            storefront,
            input,
            output,
            no_cache,
        } => run_compare(storefront, &input, &output, no_cache, quiet),
        Commands::Catalog { action } => match action {
            CatalogAction::List { search, no_cache } => {
                run_catalog_list(search.as_deref(), no_cache, quiet)
            }
            CatalogAction::Lookup {
                title,
                limit,
                no_cache,
            } => run_catalog_lookup(&title, limit, no_cache, quiet),
        },
        Commands::Cache { action } => match action {
            CacheAction::List => run_cache_list(),
            CacheAction::Clear => run_cache_clear(),
        },
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => run_config_show(),
                ConfigAction::Path => run_config_path(),
                ConfigAction::SetKey { key } => return run_config_set_key(&key),
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_to_stderr = match &cli.command {
        Commands::Compare { output, .. } => commands::compare::report_on_stdout(output),
        _ => false,
    };

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref(), log_to_stderr) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
