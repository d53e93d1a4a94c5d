mod commands;
mod fetch;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{FilterArgs, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meetdir")]
#[command(about = "Browse a directory of recurring meetings from the terminal")]
struct Cli {
    /// Catalog location: an http(s) URL or a local JSON file (overrides config)
    #[arg(long, global = true)]
    data_url: Option<String>,

    /// Meetings shown per page (overrides config)
    #[arg(long, global = true)]
    per_page: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filtered meetings
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of pages to show
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Filter and page through meetings interactively
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show the tags of every category with meeting counts
    Tags {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the share link for a set of filters
    Link {
        #[command(flatten)]
        filters: FilterArgs,

        /// Open the link in a browser
        #[arg(long)]
        open: bool,
    },
    /// Export one meeting as a weekly recurring .ics event
    Export {
        /// Meeting id as shown in listings
        id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write --data-url and --per-page into the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Config { save } = cli.command {
        return commands::config::run(cli.data_url, cli.per_page, save);
    }

    let settings = Settings::resolve(cli.data_url, cli.per_page)?;

    match cli.command {
        Commands::List { filters, pages } => commands::list::run(settings, filters, pages).await,
        Commands::Browse { filters } => commands::browse::run(settings, filters).await,
        Commands::Tags { filters } => commands::tags::run(settings, filters).await,
        Commands::Link { filters, open } => commands::link::run(settings, filters, open).await,
        Commands::Export { id, output } => commands::export::run(settings, id, output).await,
        Commands::Config { .. } => Ok(()),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
