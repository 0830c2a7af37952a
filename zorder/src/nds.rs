//! NDS packed tile ids.
//!
//! The Navigation Data Standard tiles the globe with a Morton code of its own:
//! coordinates are scaled so that 360 degrees span `2^32` units, longitude
//! keeps 32 bits and latitude 31, both in two's complement. A tile at level
//! `L` is the top `2L + 1` bits of that code. The packed id prefixes the tile
//! number with a marker bit at position `16 + L`, so the level can be read back
//! from the id alone.
//!
//! Coordinates exactly on the east or north edge wrap around to the opposite
//! edge, as the two's complement representation has no room for them.

use crate::curve::{combine, spread};
use crate::error::{Axis, Result, ZOrderError};
use crate::sfc::{Point, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Deepest tile level.
pub const MAX_TILE_LEVEL: u32 = 15;

/// NDS coordinate units per degree.
const UNITS_PER_DEGREE: f64 = (1u64 << 32) as f64 / 360.0;

/// Position of the level marker bit at level 0.
const LEVEL_MARKER_BASE: u32 = 16;

/// Returns the packed tile id of the level `level` tile containing `(lon, lat)`.
///
/// # Errors
///
/// - [`ZOrderError::OutOfRange`] if a coordinate is outside the globe.
/// - [`ZOrderError::InvalidTileLevel`] if `level` is above [`MAX_TILE_LEVEL`].
pub fn packed_tile_id(lon: f64, lat: f64, level: u32) -> Result<u32> {
    check_coordinate(Axis::Longitude, lon, MIN_LON, MAX_LON)?;
    check_coordinate(Axis::Latitude, lat, MIN_LAT, MAX_LAT)?;
    if level > MAX_TILE_LEVEL {
        return Err(ZOrderError::InvalidTileLevel(level));
    }

    let tile_number = morton(lon, lat) >> tile_shift(level);
    Ok((1 << (LEVEL_MARKER_BASE + level)) | tile_number as u32)
}

/// Decodes a packed tile id into the south-west corner of its tile and its level.
///
/// # Errors
///
/// Returns [`ZOrderError::MissingTileLevel`] if no bit at or above position 16
/// is set.
pub fn read_packed_tile_id(packed: u32) -> Result<(Point, u32)> {
    let leading = packed.leading_zeros();
    if leading > MAX_TILE_LEVEL {
        return Err(ZOrderError::MissingTileLevel(packed));
    }
    let level = MAX_TILE_LEVEL - leading;

    let tile_bits = (1u64 << (2 * level + 1)) - 1;
    let code = (packed as u64 & tile_bits) << tile_shift(level);

    let lon = wrap(combine(code) as f64 / UNITS_PER_DEGREE, MAX_LON);
    let lat = wrap(combine(code >> 1) as f64 / UNITS_PER_DEGREE, MAX_LAT);

    Ok((Point::new(lon, lat), level))
}

/// 63-bit Morton code: longitude on the even bits, latitude on the odd ones.
fn morton(lon: f64, lat: f64) -> u64 {
    let x = to_units(lon) as u64 & 0xffff_ffff;
    let y = to_units(lat) as u64 & 0x7fff_ffff;
    spread(x) | (spread(y) << 1)
}

#[inline]
fn to_units(degrees: f64) -> i64 {
    (degrees * UNITS_PER_DEGREE).trunc() as i64
}

/// Shift that leaves the top `2 * level + 1` bits of a Morton code.
#[inline]
fn tile_shift(level: u32) -> u32 {
    62 - 2 * level
}

/// Maps an unsigned reading of a two's complement coordinate back to `[-max, max)`.
#[inline]
fn wrap(degrees: f64, max: f64) -> f64 {
    if degrees >= max {
        degrees - 2.0 * max
    } else {
        degrees
    }
}

fn check_coordinate(axis: Axis, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ZOrderError::OutOfRange {
            axis,
            value,
            min,
            max,
        });
    }
    Ok(())
}
