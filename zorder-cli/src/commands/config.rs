//! Configuration CLI commands.
//!
//! Provides `config path` and `config show` for locating the configuration
//! file and printing the search budgets that commands will actually use.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use super::common::{default_config_path, load_search_config};
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective search configuration as INI
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", resolve_path(config_path)?.display());
        }
        ConfigCommands::Show => {
            print!("{}", load_search_config(config_path)?.to_ini_string());
        }
    }
    Ok(())
}

/// The explicit path if given, otherwise the platform default.
fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf, CliError> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path().ok_or_else(|| {
            CliError::Config("could not determine the user configuration directory".to_string())
        }),
    }
}
