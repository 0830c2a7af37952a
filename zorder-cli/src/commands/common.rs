//! Argument parsing and configuration helpers shared across commands.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use tracing::debug;
use zorder::{Point, SearchConfig};

use crate::error::CliError;

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "zorder";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Output format selection for CLI arguments.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable line per item
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Search budget overrides accepted by commands that run a range search.
#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Leading Z-value bits to resolve (64 = exact)
    #[arg(long)]
    pub search_precision: Option<u32>,

    /// Stop subdividing after this many ranges (0 = unbounded)
    #[arg(long)]
    pub max_ranges: Option<usize>,

    /// Maximum subdivision depth (0 = 20 levels)
    #[arg(long)]
    pub max_recurse: Option<usize>,
}

impl SearchArgs {
    /// Apply command-line overrides on top of `base`.
    pub fn apply(&self, base: SearchConfig) -> SearchConfig {
        let mut config = base;
        if let Some(precision) = self.search_precision {
            config = config.with_precision(precision);
        }
        if let Some(max_ranges) = self.max_ranges {
            config = config.with_max_ranges(max_ranges);
        }
        if let Some(max_recurse) = self.max_recurse {
            config = config.with_max_recurse(max_recurse);
        }
        config
    }
}

/// Default configuration file path (`<config dir>/zorder/config.ini`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Resolve the search configuration.
///
/// An explicit path must exist. The default path is optional: when it is
/// missing the built-in defaults are used.
pub fn load_search_config(explicit: Option<&Path>) -> Result<SearchConfig, CliError> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "Loading search config");
        return Ok(SearchConfig::load(path)?);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading search config");
            Ok(SearchConfig::load(&path)?)
        }
        _ => Ok(SearchConfig::default()),
    }
}

/// Parse a `LON,LAT` pair.
pub fn parse_point(s: &str) -> Result<Point, CliError> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| CliError::Usage(format!("expected LON,LAT, got '{}'", s)))?;

    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| CliError::Usage(format!("'{}' is not a number in '{}'", v.trim(), s)))
    };

    Ok(Point::new(parse(lon)?, parse(lat)?))
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::Usage(format!("'{}' is not an RFC 3339 timestamp: {}", s, e)))
}
