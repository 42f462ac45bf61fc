//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use portmatch_core::Storefront;

#[derive(Parser)]
#[command(name = "portmatch")]
#[command(
    about = "Find games in your Steam, Epic or GOG library that have a PortMaster port",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for a comparison report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    /// Colored summary on the terminal
    Text,
    /// Pretty-printed JSON
    Json,
    /// Standalone HTML page
    Html,
}

/// Options shared by commands that produce a report.
#[derive(Args, Clone)]
pub(crate) struct OutputArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compare a storefront library against the PortMaster catalog
    Compare {
        /// Storefront: steam, epic or gog
        storefront: Storefront,

        /// Steam ID64, profile URL or custom name; for Epic/GOG a file
        /// with the exported library, or "-" for stdin
        input: String,

        #[command(flatten)]
        output: OutputArgs,

        /// Ignore cached upstream data
        #[arg(long)]
        no_cache: bool,
    },

    /// Browse the PortMaster catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Manage cached upstream data
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage configuration (Steam API key)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CatalogAction {
    /// List ports in the catalog
    List {
        /// Only show ports whose name or key contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Ignore cached upstream data
        #[arg(long)]
        no_cache: bool,
    },

    /// Show how a title is normalized and which ports it matches
    Lookup {
        /// Game title to look up
        title: String,

        /// Number of nearest ports to show
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Ignore cached upstream data
        #[arg(long)]
        no_cache: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// List cached entries
    List,

    /// Remove all cached entries
    Clear,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the config file path
    Path,

    /// Save a Steam Web API key to the config file
    SetKey {
        /// The API key (from https://steamcommunity.com/dev/apikey)
        key: String,
    },
}
