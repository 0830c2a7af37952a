//! Z-value intervals.
//!
//! [`BoundedRange`] is an inclusive `[min, max]` interval of Z-values. Read as
//! two opposite corners it also describes a hyper-rectangle in curve space,
//! which is how the range search uses it.
//!
//! [`IndexRange`] is the unit the range search hands back to a storage layer:
//! one contiguous scan plus a flag telling whether every key in it is known to
//! match the query.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZOrderError};

/// Inclusive interval of Z-values with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedRange {
    min: u64,
    max: u64,
}

impl BoundedRange {
    /// Creates a range from two Z-values.
    ///
    /// # Errors
    ///
    /// Returns [`ZOrderError::MalformedRange`] if `min > max`.
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if min > max {
            return Err(ZOrderError::MalformedRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound (inclusive).
    #[inline]
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Upper bound (inclusive).
    #[inline]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Midpoint, rounded down.
    #[inline]
    pub fn mid(&self) -> u64 {
        self.min + ((self.max - self.min) >> 1)
    }

    /// Number of Z-values in the range.
    ///
    /// Saturates at `u64::MAX` for the single range spanning every value.
    #[inline]
    pub fn length(&self) -> u64 {
        (self.max - self.min).saturating_add(1)
    }

    /// Returns true if `value` lies within the range.
    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Returns true if `other` lies entirely within this range.
    #[inline]
    pub fn contains_range(&self, other: &BoundedRange) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Returns true if the two ranges share at least one value.
    #[inline]
    pub fn overlaps(&self, other: &BoundedRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// A contiguous scan range produced by the range search.
///
/// When `contained` is true every key in `[lower, upper]` that exists in the
/// store belongs to the query (up to the requested precision). When false the
/// range only partially overlaps the query and candidates must be re-checked
/// against the original geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub lower: u64,
    pub upper: u64,
    pub contained: bool,
}

impl IndexRange {
    pub fn new(lower: u64, upper: u64, contained: bool) -> Self {
        Self {
            lower,
            upper,
            contained,
        }
    }

    /// Returns true if `value` lies within `[lower, upper]`.
    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl From<BoundedRange> for IndexRange {
    fn from(range: BoundedRange) -> Self {
        Self::new(range.min, range.max, true)
    }
}
