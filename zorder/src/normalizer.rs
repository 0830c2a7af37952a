//! Fixed-precision dimension normalizer.
//!
//! Maps a continuous value in `[min, max)` onto one of `2^precision` integer
//! bins and back. Both the space and the space-time curves are built from one
//! normalizer per axis.

use crate::error::{Axis, Result, ZOrderError};

/// Smallest allowed precision in bits (inclusive).
pub const MIN_PRECISION: u32 = 1;

/// Largest precision a normalizer supports (inclusive).
///
/// Curves apply a tighter budget of their own: 31 bits for each axis of the
/// 2D curve and 21 bits for each axis of the 3D curve.
pub const MAX_PRECISION: u32 = 31;

/// Maps a bounded continuous dimension onto `2^precision` integer bins.
///
/// Immutable after construction, so one instance can be shared freely across
/// threads and queries.
///
/// # Lower bound
///
/// [`normalize`](Self::normalize) clamps values at or above `max` to the last
/// bin but does **not** clamp values below `min`. Callers must reject such
/// values before normalizing; the space filling curves do this in `index()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    min: f64,
    max: f64,
    precision: u32,
    normalizer: f64,
    denormalizer: f64,
    max_index: u32,
}

impl Normalizer {
    /// Creates a normalizer over `[min, max)` with `precision` bits.
    ///
    /// # Errors
    ///
    /// - [`ZOrderError::InvalidPrecision`] if `precision` is not in `1..=31`
    /// - [`ZOrderError::InvalidBounds`] if the bounds are not finite or `min >= max`
    pub fn new(min: f64, max: f64, precision: u32) -> Result<Self> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(ZOrderError::InvalidPrecision {
                axis: Axis::Value,
                bits: precision,
                min: MIN_PRECISION,
                max: MAX_PRECISION,
            });
        }
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ZOrderError::InvalidBounds { min, max });
        }

        let bins = 1u64 << precision;
        Ok(Self {
            min,
            max,
            precision,
            normalizer: bins as f64 / (max - min),
            denormalizer: (max - min) / bins as f64,
            max_index: (bins - 1) as u32,
        })
    }

    /// Returns the bin containing `value`.
    ///
    /// Values at or above `max` land in the last bin. Values below `min` are a
    /// caller error; the float-to-int conversion saturates them to bin 0.
    ///
    /// The scaled value of anything within a few ULPs of `max` can round up to
    /// exactly `2^precision`, so the result is clamped to the last bin as well.
    #[inline]
    pub fn normalize(&self, value: f64) -> u32 {
        if value >= self.max {
            return self.max_index;
        }
        (((value - self.min) * self.normalizer).floor() as u32).min(self.max_index)
    }

    /// Returns the centre of `bin`.
    ///
    /// Bins past the last one are clamped so the result never overshoots the
    /// centre of the topmost bin.
    #[inline]
    pub fn denormalize(&self, bin: u32) -> f64 {
        let bin = bin.min(self.max_index);
        self.min + (bin as f64 + 0.5) * self.denormalizer
    }

    /// Lower bound of the domain (inclusive).
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the domain.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Precision in bits.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Number of bins (`2^precision`).
    pub fn bins(&self) -> u64 {
        1u64 << self.precision
    }

    /// Width of a single bin in domain units.
    ///
    /// This is also the worst-case round-trip error of `denormalize(normalize(v))`.
    pub fn bin_width(&self) -> f64 {
        self.denormalizer
    }

    /// Returns true if `value` lies within `[min, max]`.
    ///
    /// The upper bound is inclusive so that the domain edge (e.g. longitude 180)
    /// can still be indexed; it lands in the last bin.
    #[inline]
    pub fn accepts(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
