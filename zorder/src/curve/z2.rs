//! Two-dimensional Z-order codec.

use super::ZCurve;

/// 2D Morton codec: two 31-bit bins interleaved into 62 bits.
///
/// Dimension 0 (x, longitude) occupies the even bits, dimension 1
/// (y, latitude) the odd bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Z2;

impl Z2 {
    /// Interleaves `x` and `y` into a Z-value.
    ///
    /// Both inputs are masked to 31 bits first.
    #[inline]
    pub fn interleave(x: u32, y: u32) -> u64 {
        split(x as u64) | (split(y as u64) << 1)
    }

    /// Splits a Z-value back into `(x, y)`.
    #[inline]
    pub fn deinterleave(z: u64) -> (u32, u32) {
        (combine(z), combine(z >> 1))
    }
}

impl ZCurve for Z2 {
    const DIMENSIONS: u32 = 2;
    const BITS_PER_DIMENSION: u32 = 31;
    const MAX_MASK: u64 = 0x7fff_ffff;

    #[inline]
    fn dim(&self, i: u32, z: u64) -> u32 {
        combine(z >> i)
    }
}

/// Spreads the low 31 bits of `value` onto the even bit positions.
#[inline]
const fn split(value: u64) -> u64 {
    spread(value & Z2::MAX_MASK)
}

/// Spreads the low 32 bits of `value` onto the even bit positions.
#[inline]
pub(crate) const fn spread(value: u64) -> u64 {
    let mut x = value & 0xffff_ffff;
    x = (x ^ (x << 32)) & 0x0000_0000_ffff_ffff;
    x = (x ^ (x << 16)) & 0x0000_ffff_0000_ffff;
    x = (x ^ (x << 8)) & 0x00ff_00ff_00ff_00ff;
    x = (x ^ (x << 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x ^ (x << 2)) & 0x3333_3333_3333_3333;
    x = (x ^ (x << 1)) & 0x5555_5555_5555_5555;
    x
}

/// Gathers the even bits of `z` into a contiguous integer.
#[inline]
pub(crate) const fn combine(z: u64) -> u32 {
    let mut x = z & 0x5555_5555_5555_5555;
    x = (x ^ (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x ^ (x >> 2)) & 0x0f0f_0f0f_0f0f_0f0f;
    x = (x ^ (x >> 4)) & 0x00ff_00ff_00ff_00ff;
    x = (x ^ (x >> 8)) & 0x0000_ffff_0000_ffff;
    x = (x ^ (x >> 16)) & 0x0000_0000_ffff_ffff;
    x as u32
}
