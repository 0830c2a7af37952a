//! Space and space-time filling curves.
//!
//! These combine one [`Normalizer`] per axis with a curve codec to turn a
//! geographic point (and optionally a time of week) into a Z-value and back.
//!
//! | Curve      | Axes                              | Max precision per axis |
//! |------------|-----------------------------------|------------------------|
//! | [`Z2Sfc`]  | longitude, latitude               | 31 bits                |
//! | [`Z3Sfc`]  | longitude, latitude, week seconds | 21 bits                |
//!
//! The time axis of [`Z3Sfc`] covers a single week (`0..=604800` seconds since
//! Monday 00:00 UTC). Absolute date spans are first cut into week slices by
//! [`crate::week::decompose`].

use serde::{Deserialize, Serialize};

use crate::curve::{Z2, Z3};
use crate::error::{Axis, Result, ZOrderError};
use crate::normalizer::{Normalizer, MIN_PRECISION};
use crate::week::SECONDS_PER_WEEK;

/// Minimum longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum longitude in degrees.
pub const MAX_LON: f64 = 180.0;
/// Minimum latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Maximum precision per axis for the 2D curve.
pub const Z2_MAX_PRECISION: u32 = 31;
/// Maximum precision per axis for the 3D curve.
pub const Z3_MAX_PRECISION: u32 = 21;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Query rectangle given by its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south_west: Point,
    pub north_east: Point,
}

impl BoundingBox {
    pub fn new(south_west: Point, north_east: Point) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Builds a box from `(min_lon, min_lat, max_lon, max_lat)`.
    pub fn from_bounds(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self::new(Point::new(min_lon, min_lat), Point::new(max_lon, max_lat))
    }

    /// Returns true if `point` lies inside the box (edges included).
    pub fn contains(&self, point: &Point) -> bool {
        point.longitude >= self.south_west.longitude
            && point.longitude <= self.north_east.longitude
            && point.latitude >= self.south_west.latitude
            && point.latitude <= self.north_east.latitude
    }

    /// Checks that the south-west corner is not east or north of the
    /// north-east corner.
    ///
    /// Corner keys alone cannot catch this: a box with only its longitudes
    /// swapped can still produce ordered keys.
    pub fn validate(&self) -> Result<()> {
        let (sw, ne) = (&self.south_west, &self.north_east);
        if sw.longitude > ne.longitude {
            return Err(ZOrderError::InvertedBox {
                axis: Axis::Longitude,
                min: sw.longitude,
                max: ne.longitude,
            });
        }
        if sw.latitude > ne.latitude {
            return Err(ZOrderError::InvertedBox {
                axis: Axis::Latitude,
                min: sw.latitude,
                max: ne.latitude,
            });
        }
        Ok(())
    }
}

fn check_precision(axis: Axis, bits: u32, max: u32) -> Result<()> {
    if !(MIN_PRECISION..=max).contains(&bits) {
        return Err(ZOrderError::InvalidPrecision {
            axis,
            bits,
            min: MIN_PRECISION,
            max,
        });
    }
    Ok(())
}

fn check_domain(axis: Axis, normalizer: &Normalizer, value: f64) -> Result<()> {
    if !normalizer.accepts(value) {
        return Err(ZOrderError::OutOfRange {
            axis,
            value,
            min: normalizer.min(),
            max: normalizer.max(),
        });
    }
    Ok(())
}

// =============================================================================
// Z2 space filling curve
// =============================================================================

/// Longitude/latitude space filling curve backed by the [`Z2`] codec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Z2Sfc {
    precision: u32,
    lon: Normalizer,
    lat: Normalizer,
}

impl Z2Sfc {
    /// Creates a 2D curve with `precision` bits per axis (`1..=31`).
    pub fn new(precision: u32) -> Result<Self> {
        check_precision(Axis::Longitude, precision, Z2_MAX_PRECISION)?;
        Ok(Self {
            precision,
            lon: Normalizer::new(MIN_LON, MAX_LON, precision)?,
            lat: Normalizer::new(MIN_LAT, MAX_LAT, precision)?,
        })
    }

    /// Computes the Z-value of `(lon, lat)`.
    ///
    /// # Errors
    ///
    /// Returns [`ZOrderError::OutOfRange`] if either coordinate is outside its
    /// domain.
    pub fn index(&self, lon: f64, lat: f64) -> Result<u64> {
        check_domain(Axis::Longitude, &self.lon, lon)?;
        check_domain(Axis::Latitude, &self.lat, lat)?;

        Ok(Z2::interleave(
            self.lon.normalize(lon),
            self.lat.normalize(lat),
        ))
    }

    /// Computes the Z-value of a [`Point`].
    pub fn index_point(&self, point: &Point) -> Result<u64> {
        self.index(point.longitude, point.latitude)
    }

    /// Decodes `z` into the centre of its cell as `(lon, lat)`.
    pub fn invert(&self, z: u64) -> (f64, f64) {
        let (x, y) = Z2::deinterleave(z);
        (self.lon.denormalize(x), self.lat.denormalize(y))
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn lon_normalizer(&self) -> &Normalizer {
        &self.lon
    }

    pub fn lat_normalizer(&self) -> &Normalizer {
        &self.lat
    }
}

// =============================================================================
// Z3 space-time filling curve
// =============================================================================

/// Longitude/latitude/time-of-week curve backed by the [`Z3`] codec.
///
/// Time is expressed in whole seconds since Monday 00:00 UTC and must be in
/// `0..=604800`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Z3Sfc {
    lon: Normalizer,
    lat: Normalizer,
    time: Normalizer,
}

impl Z3Sfc {
    /// Creates a 3D curve with the same precision on every axis (`1..=21`).
    pub fn new(precision: u32) -> Result<Self> {
        Self::with_precision(precision, precision, precision)
    }

    /// Creates a 3D curve with an independent precision per axis.
    ///
    /// Coarser axes simply leave their low bits at zero once interleaved.
    pub fn with_precision(lon_bits: u32, lat_bits: u32, time_bits: u32) -> Result<Self> {
        check_precision(Axis::Longitude, lon_bits, Z3_MAX_PRECISION)?;
        check_precision(Axis::Latitude, lat_bits, Z3_MAX_PRECISION)?;
        check_precision(Axis::Time, time_bits, Z3_MAX_PRECISION)?;

        Ok(Self {
            lon: Normalizer::new(MIN_LON, MAX_LON, lon_bits)?,
            lat: Normalizer::new(MIN_LAT, MAX_LAT, lat_bits)?,
            time: Normalizer::new(0.0, SECONDS_PER_WEEK as f64, time_bits)?,
        })
    }

    /// Computes the Z-value of `(lon, lat, seconds)`.
    ///
    /// # Errors
    ///
    /// Returns [`ZOrderError::OutOfRange`] if a coordinate is outside its domain
    /// or `seconds` exceeds one week.
    pub fn index(&self, lon: f64, lat: f64, seconds: u64) -> Result<u64> {
        check_domain(Axis::Longitude, &self.lon, lon)?;
        check_domain(Axis::Latitude, &self.lat, lat)?;
        check_domain(Axis::Time, &self.time, seconds as f64)?;

        Ok(Z3::interleave(
            self.lon.normalize(lon),
            self.lat.normalize(lat),
            self.time.normalize(seconds as f64),
        ))
    }

    /// Decodes `z` into the centre of its cell as `(lon, lat, seconds)`.
    ///
    /// The time bin centre is rounded to the nearest whole second.
    pub fn invert(&self, z: u64) -> (f64, f64, u64) {
        let (x, y, t) = Z3::deinterleave(z);
        (
            self.lon.denormalize(x),
            self.lat.denormalize(y),
            self.time.denormalize(t).round() as u64,
        )
    }

    pub fn lon_normalizer(&self) -> &Normalizer {
        &self.lon
    }

    pub fn lat_normalizer(&self) -> &Normalizer {
        &self.lat
    }

    pub fn time_normalizer(&self) -> &Normalizer {
        &self.time
    }
}
