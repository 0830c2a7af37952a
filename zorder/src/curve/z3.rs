//! Three-dimensional Z-order codec.

use super::ZCurve;

/// 3D Morton codec: three 21-bit bins interleaved into 63 bits.
///
/// Dimension 0 (x, longitude) occupies bits `0, 3, 6, ...`, dimension 1
/// (y, latitude) bits `1, 4, 7, ...` and dimension 2 (time) bits `2, 5, 8, ...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Z3;

impl Z3 {
    /// Interleaves `x`, `y` and `t` into a Z-value.
    ///
    /// All inputs are masked to 21 bits first.
    #[inline]
    pub fn interleave(x: u32, y: u32, t: u32) -> u64 {
        split(x as u64) | (split(y as u64) << 1) | (split(t as u64) << 2)
    }

    /// Splits a Z-value back into `(x, y, t)`.
    #[inline]
    pub fn deinterleave(z: u64) -> (u32, u32, u32) {
        (combine(z), combine(z >> 1), combine(z >> 2))
    }
}

impl ZCurve for Z3 {
    const DIMENSIONS: u32 = 3;
    const BITS_PER_DIMENSION: u32 = 21;
    const MAX_MASK: u64 = 0x1f_ffff;

    #[inline]
    fn dim(&self, i: u32, z: u64) -> u32 {
        combine(z >> i)
    }
}

/// Spreads the low 21 bits of `value` onto every third bit position.
#[inline]
const fn split(value: u64) -> u64 {
    let mut x = value & Z3::MAX_MASK;
    x = (x | (x << 32)) & 0x001f_0000_0000_ffff;
    x = (x | (x << 16)) & 0x001f_0000_ff00_00ff;
    x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x << 2)) & 0x1249_2492_4924_9249;
    x
}

/// Gathers every third bit of `z` into a contiguous integer.
#[inline]
const fn combine(z: u64) -> u32 {
    let mut x = z & 0x1249_2492_4924_9249;
    x = (x ^ (x >> 2)) & 0x10c3_0c30_c30c_30c3;
    x = (x ^ (x >> 4)) & 0x100f_00f0_0f00_f00f;
    x = (x ^ (x >> 8)) & 0x001f_0000_ff00_00ff;
    x = (x ^ (x >> 16)) & 0x001f_0000_0000_ffff;
    x = (x ^ (x >> 32)) & Z3::MAX_MASK;
    x as u32
}
