//! Range search tuning.
//!
//! [`SearchConfig`] bundles the three knobs of the range search. The defaults
//! are the values used for production-scale indexes: full precision, no cap on
//! the number of ranges and seven levels of subdivision.
//!
//! # Example Configuration (INI)
//!
//! ```ini
//! [search]
//! precision = 64
//! max_ranges = 0
//! max_recurse = 7
//! ```
//!
//! Missing keys keep their defaults. Unknown keys are logged and ignored.

use std::path::Path;
use std::str::FromStr;

use ini::Ini;
use tracing::warn;

use crate::error::{Result, ZOrderError};

/// INI section holding the search settings.
pub const SEARCH_SECTION: &str = "search";

/// Default number of Z-value bits resolved before a cell is accepted.
pub const DEFAULT_PRECISION: u32 = 64;

/// Default cap on emitted ranges (0 = unbounded).
pub const DEFAULT_MAX_RANGES: usize = 0;

/// Default number of subdivision levels.
pub const DEFAULT_MAX_RECURSE: usize = 7;

/// Budgets passed to the range search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Leading Z-value bits that must be resolved (64 = exact).
    pub precision: u32,

    /// Stop subdividing after this many ranges (0 = unbounded).
    pub max_ranges: usize,

    /// Maximum subdivision depth (0 = the search's own limit of 20).
    pub max_recurse: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            max_ranges: DEFAULT_MAX_RANGES,
            max_recurse: DEFAULT_MAX_RECURSE,
        }
    }
}

impl SearchConfig {
    /// Create a configuration with default budgets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the precision.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Set the range cap.
    pub fn with_max_ranges(mut self, max_ranges: usize) -> Self {
        self.max_ranges = max_ranges;
        self
    }

    /// Set the recursion depth.
    pub fn with_max_recurse(mut self, max_recurse: usize) -> Self {
        self.max_recurse = max_recurse;
        self
    }

    /// Parse the `[search]` section of an INI document.
    ///
    /// A document without that section yields the defaults.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let ini = Ini::load_from_str(content).map_err(|e| ZOrderError::ConfigRead {
            path: "<string>".into(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Load the `[search]` section from an INI file.
    pub fn load(path: &Path) -> Result<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| ZOrderError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Render the configuration as an INI document that [`Self::from_ini_str`]
    /// reads back.
    pub fn to_ini_string(&self) -> String {
        format!(
            "[{}]\nprecision = {}\nmax_ranges = {}\nmax_recurse = {}\n",
            SEARCH_SECTION, self.precision, self.max_ranges, self.max_recurse
        )
    }

    fn from_ini(ini: &Ini) -> Result<Self> {
        let mut config = Self::default();
        let Some(section) = ini.section(Some(SEARCH_SECTION)) else {
            return Ok(config);
        };

        for (key, value) in section.iter() {
            match key {
                "precision" => config.precision = parse_value(key, value)?,
                "max_ranges" => config.max_ranges = parse_value(key, value)?,
                "max_recurse" => config.max_recurse = parse_value(key, value)?,
                other => warn!(key = other, "Ignoring unknown search config key"),
            }
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ZOrderError::ConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
