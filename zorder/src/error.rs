//! Error types for indexing and range decomposition.
//!
//! Every error here is a local input violation: nothing is retried and nothing
//! is partially applied. Callers are expected to validate query geometry before
//! asking for scan ranges, and the variants carry the offending values so the
//! caller can report them.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, ZOrderError>;

/// Errors that can occur while building curves or computing scan ranges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZOrderError {
    /// A coordinate or time value fell outside its axis domain.
    #[error("{axis} value {value} out of range (min {min}, max {max})")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Precision (bits per dimension) outside the allowed window.
    #[error("{axis} precision {bits} must be in range [{min}, {max}]")]
    InvalidPrecision {
        axis: Axis,
        bits: u32,
        min: u32,
        max: u32,
    },

    /// Normalizer bounds are not finite or not strictly ordered.
    #[error("Invalid normalizer bounds: min {min} must be finite and below max {max}")]
    InvalidBounds { min: f64, max: f64 },

    /// A bounded range was built with `min > max`.
    #[error("Range bounds must be ordered: min {min} > max {max}")]
    MalformedRange { min: u64, max: u64 },

    /// A bounding box whose south-west corner lies east or north of its
    /// north-east corner.
    #[error("Bounding box {axis} is inverted: {min} > {max}")]
    InvertedBox { axis: Axis, min: f64, max: f64 },

    /// An NDS tile level above 15.
    #[error("Invalid tile level {0}, must be in range [0, 15]")]
    InvalidTileLevel(u32),

    /// A packed NDS tile id without a level marker bit.
    #[error("Packed tile id {0} has no level marker")]
    MissingTileLevel(u32),

    /// Fewer than two Z-values were supplied to the common prefix computation.
    #[error("Wrong number of elements {0}, at least 2 are required")]
    InsufficientInput(usize),

    /// A date span was given with its lower bound after its upper bound.
    #[error("Date range is not ordered: {min} is after {max}")]
    UnorderedDates { min: String, max: String },

    /// A search query had no bounds to decompose.
    #[error("No query bounds supplied")]
    EmptyQuery,

    /// The range search finished without emitting a single range.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration file could not be read.
    #[error("Failed to read config file {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// Configuration value could not be parsed.
    #[error("Invalid value '{value}' for config key '{key}'")]
    ConfigValue { key: String, value: String },
}

/// Axis that an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Longitude,
    Latitude,
    Time,
    /// A standalone normalizer not bound to a geographic axis.
    Value,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Longitude => write!(f, "longitude"),
            Axis::Latitude => write!(f, "latitude"),
            Axis::Time => write!(f, "time"),
            Axis::Value => write!(f, "value"),
        }
    }
}
