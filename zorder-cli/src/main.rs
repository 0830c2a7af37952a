//! ZOrder CLI - Command-line interface
//!
//! Computes Z-order keys, decodes them, and prints the scan ranges a
//! range-scanning store would read for a bounding box and optional time
//! window.
//!
//! # Example
//!
//! ```bash
//! zorder ranges --sw -0.83,43.52 --ne 5.29,47.44 \
//!   --from 2018-06-10T07:00:00Z --to 2018-06-11T07:00:00Z --format json
//! ```

mod commands;
mod error;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config::ConfigCommands;
use commands::index::IndexArgs;
use commands::invert::InvertArgs;
use commands::ranges::RangesArgs;
use commands::tile::TileCommands;
use commands::weeks::WeeksArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "zorder", version, about = "Z-order spatial and spatio-temporal index keys")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the key of a point
    Index(IndexArgs),

    /// Decode a key to the centre of its cell
    Invert(InvertArgs),

    /// Compute the scan ranges for a bounding box
    Ranges(RangesArgs),

    /// Cut a date span into week slices
    Weeks(WeeksArgs),

    /// NDS packed tile ids
    Tile {
        #[command(subcommand)]
        command: TileCommands,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Log to stderr. `-v` flags win over `RUST_LOG`; without either only
/// warnings are shown.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Index(args) => commands::index::run(args),
        Commands::Invert(args) => commands::invert::run(args),
        Commands::Ranges(args) => commands::ranges::run(args, config_path),
        Commands::Weeks(args) => commands::weeks::run(args),
        Commands::Tile { command } => commands::tile::run(command),
        Commands::Config { command } => commands::config::run(command, config_path),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        e.exit();
    }
}
