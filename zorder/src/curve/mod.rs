//! Z-order (Morton) curve codecs.
//!
//! A codec interleaves the bits of `D` integer bins into one 64-bit Z-value
//! and takes them apart again. Two codecs are provided:
//!
//! | Codec  | Dimensions | Bits per dimension | Significant bits |
//! |--------|------------|--------------------|------------------|
//! | [`Z2`] | 2          | 31                 | 62               |
//! | [`Z3`] | 3          | 21                 | 63               |
//!
//! # Statelessness
//!
//! Codecs are zero-sized and every operation is a pure function of its
//! arguments. A single codec value can be copied into any number of threads
//! and used concurrently without locking.
//!
//! # Range predicates
//!
//! A [`BoundedRange`] whose `min` and `max` are Z-values describes an
//! axis-aligned box in curve space: its corners are the de-interleaved `min`
//! and `max`. [`ZCurve::contains`] and [`ZCurve::overlaps`] test against that
//! box one dimension at a time, without decoding every bit of every value.

mod z2;
mod z3;

pub use z2::Z2;
pub(crate) use z2::{combine, spread};
pub use z3::Z3;

use crate::range::BoundedRange;

/// Interleaving geometry and per-dimension predicates shared by all codecs.
///
/// The range search is generic over this trait so it can decompose 2D and 3D
/// queries with the same code.
pub trait ZCurve: Copy + Send + Sync + std::fmt::Debug {
    /// Number of interleaved dimensions.
    const DIMENSIONS: u32;

    /// Bits kept per dimension.
    const BITS_PER_DIMENSION: u32;

    /// Mask applied to each bin before interleaving.
    const MAX_MASK: u64;

    /// Projects dimension `i` out of `z`.
    fn dim(&self, i: u32, z: u64) -> u32;

    /// Number of interleaved dimensions.
    #[inline]
    fn dimensions(&self) -> u32 {
        Self::DIMENSIONS
    }

    /// Number of children produced by one subdivision step (`2^dimensions`).
    #[inline]
    fn quadrants(&self) -> u64 {
        1u64 << Self::DIMENSIONS
    }

    /// Total number of significant bits in a Z-value.
    #[inline]
    fn total_bits(&self) -> u32 {
        Self::DIMENSIONS * Self::BITS_PER_DIMENSION
    }

    /// Returns true if `value` falls inside the box described by `range`.
    fn contains(&self, range: &BoundedRange, value: u64) -> bool {
        (0..Self::DIMENSIONS).all(|i| {
            let v = self.dim(i, value);
            v >= self.dim(i, range.min()) && v <= self.dim(i, range.max())
        })
    }

    /// Returns true if the boxes described by `a` and `b` intersect.
    fn overlaps(&self, a: &BoundedRange, b: &BoundedRange) -> bool {
        (0..Self::DIMENSIONS).all(|i| {
            let lo = self.dim(i, a.min()).max(self.dim(i, b.min()));
            let hi = self.dim(i, a.max()).min(self.dim(i, b.max()));
            lo <= hi
        })
    }
}
