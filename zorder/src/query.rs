//! Query front ends.
//!
//! These are the entry points a storage layer calls: hand over a bounding box
//! (and a date span for space-time indexes) and get back the list of key
//! ranges to scan.
//!
//! # Space-time queries
//!
//! The time axis of [`Z3Sfc`] only spans one week, so [`Z3Search`] cuts the
//! date span into week slices first. Each slice contributes one bound to a
//! single range search; the week number itself is not part of the key and the
//! caller is expected to partition its storage by week.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::SearchConfig;
use crate::curve::{Z2, Z3};
use crate::error::Result;
use crate::range::{BoundedRange, IndexRange};
use crate::search::calculate_ranges;
use crate::sfc::{BoundingBox, Z2Sfc, Z3Sfc, Z3_MAX_PRECISION};
use crate::week::{decompose, WeekTimeRange};

/// Range search over a longitude/latitude index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Z2Search {
    sfc: Z2Sfc,
    config: SearchConfig,
}

impl Z2Search {
    /// Create a search over a [`Z2Sfc`] with `precision` bits per axis.
    pub fn new(precision: u32) -> Result<Self> {
        Ok(Self::with_curve(Z2Sfc::new(precision)?))
    }

    /// Create a search over an existing curve.
    pub fn with_curve(sfc: Z2Sfc) -> Self {
        Self {
            sfc,
            config: SearchConfig::default(),
        }
    }

    /// Replace the search budgets.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn curve(&self) -> &Z2Sfc {
        &self.sfc
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Computes the scan ranges covering `bbox`.
    ///
    /// # Errors
    ///
    /// - [`crate::ZOrderError::InvertedBox`] if the south-west corner lies
    ///   north or east of the north-east corner.
    /// - [`crate::ZOrderError::OutOfRange`] if a corner is outside the globe.
    pub fn ranges(&self, bbox: &BoundingBox) -> Result<Vec<IndexRange>> {
        bbox.validate()?;
        let lower = self.sfc.index_point(&bbox.south_west)?;
        let upper = self.sfc.index_point(&bbox.north_east)?;
        let bound = BoundedRange::new(lower, upper)?;

        let ranges = calculate_ranges(
            &Z2,
            &[bound],
            self.config.precision,
            self.config.max_ranges,
            self.config.max_recurse,
        )?;
        debug!(lower, upper, ranges = ranges.len(), "Computed 2D scan ranges");

        Ok(ranges)
    }
}

/// Range search over a longitude/latitude/time-of-week index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Z3Search {
    sfc: Z3Sfc,
    config: SearchConfig,
}

impl Z3Search {
    /// Create a search over a [`Z3Sfc`] at full precision on every axis.
    pub fn new() -> Result<Self> {
        Ok(Self::with_curve(Z3Sfc::new(Z3_MAX_PRECISION)?))
    }

    /// Create a search over an existing curve.
    pub fn with_curve(sfc: Z3Sfc) -> Self {
        Self {
            sfc,
            config: SearchConfig::default(),
        }
    }

    /// Replace the search budgets.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn curve(&self) -> &Z3Sfc {
        &self.sfc
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Computes the scan ranges covering `bbox` between `date_min` and
    /// `date_max`.
    ///
    /// # Errors
    ///
    /// - [`crate::ZOrderError::UnorderedDates`] if `date_min > date_max`.
    /// - [`crate::ZOrderError::InvertedBox`] if the corners are swapped.
    /// - [`crate::ZOrderError::OutOfRange`] if a corner is outside the globe.
    pub fn ranges(
        &self,
        bbox: &BoundingBox,
        date_min: &DateTime<Utc>,
        date_max: &DateTime<Utc>,
    ) -> Result<Vec<IndexRange>> {
        self.ranges_with_weeks(bbox, date_min, date_max)
            .map(|(ranges, _)| ranges)
    }

    /// Like [`Self::ranges`], also returning the week slices the date span was
    /// cut into.
    pub fn ranges_with_weeks(
        &self,
        bbox: &BoundingBox,
        date_min: &DateTime<Utc>,
        date_max: &DateTime<Utc>,
    ) -> Result<(Vec<IndexRange>, Vec<WeekTimeRange>)> {
        bbox.validate()?;
        let weeks = decompose(date_min, date_max)?;
        let bounds = self.week_bounds(bbox, &weeks)?;

        let ranges = calculate_ranges(
            &Z3,
            &bounds,
            self.config.precision,
            self.config.max_ranges,
            self.config.max_recurse,
        )?;
        debug!(
            weeks = weeks.len(),
            bounds = bounds.len(),
            ranges = ranges.len(),
            "Computed 3D scan ranges"
        );

        Ok((ranges, weeks))
    }

    /// One bound per week slice. Every whole week in the middle of a span maps
    /// to the same bound, so consecutive duplicates are dropped.
    fn week_bounds(
        &self,
        bbox: &BoundingBox,
        weeks: &[WeekTimeRange],
    ) -> Result<Vec<BoundedRange>> {
        let sw = &bbox.south_west;
        let ne = &bbox.north_east;

        let mut bounds = weeks
            .iter()
            .map(|week| {
                let lower = self
                    .sfc
                    .index(sw.longitude, sw.latitude, week.min.seconds.floor() as u64)?;
                let upper = self
                    .sfc
                    .index(ne.longitude, ne.latitude, week.max.seconds.floor() as u64)?;
                BoundedRange::new(lower, upper)
            })
            .collect::<Result<Vec<_>>>()?;
        bounds.dedup();

        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Axis, ZOrderError};
    use crate::sfc::Point;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn covered(ranges: &[IndexRange], z: u64) -> bool {
        ranges.iter().any(|r| r.contains(z))
    }

    // =========================================================================
    // Z2Search
    // =========================================================================

    #[test]
    fn test_z2_defaults() {
        let search = Z2Search::new(31).unwrap();
        assert_eq!(search.curve().precision(), 31);
        assert_eq!(*search.config(), SearchConfig::default());
    }

    #[test]
    fn test_z2_rejects_bad_precision() {
        assert!(matches!(
            Z2Search::new(32),
            Err(ZOrderError::InvalidPrecision { .. })
        ));
    }

    #[test]
    fn test_z2_single_point_box() {
        let search = Z2Search::new(31).unwrap();
        let point = Point::new(1.391483667, 43.56362116);
        let ranges = search.ranges(&BoundingBox::new(point, point)).unwrap();

        assert_eq!(
            ranges,
            vec![IndexRange::new(3650378452887927909, 3650378452887927909, true)]
        );
    }

    #[test]
    fn test_z2_swapped_corners() {
        let search = Z2Search::new(31).unwrap();
        let bbox = BoundingBox::from_bounds(5.0, 45.0, 1.0, 43.0);
        assert!(matches!(
            search.ranges(&bbox),
            Err(ZOrderError::InvertedBox { .. })
        ));
    }

    #[test]
    fn test_z2_swapped_longitude_only() {
        let search = Z2Search::new(31).unwrap();
        let bbox = BoundingBox::from_bounds(5.0, 43.0, 1.0, 45.0);
        assert!(matches!(
            search.ranges(&bbox),
            Err(ZOrderError::InvertedBox {
                axis: Axis::Longitude,
                ..
            })
        ));
    }

    #[test]
    fn test_z2_swapped_latitude_only() {
        let search = Z2Search::new(31).unwrap();
        let bbox = BoundingBox::from_bounds(1.0, 45.0, 5.0, 43.0);
        assert!(matches!(
            search.ranges(&bbox),
            Err(ZOrderError::InvertedBox {
                axis: Axis::Latitude,
                ..
            })
        ));
    }

    #[test]
    fn test_z2_box_touching_east_edge_covers_edge_points() {
        let search = Z2Search::new(31).unwrap();
        let bbox = BoundingBox::from_bounds(179.0, 0.0, 180.0, 1.0);
        let ranges = search.ranges(&bbox).unwrap();

        let east = f64::from_bits(180.0_f64.to_bits() - 1);
        for lon in [179.5, east, 180.0] {
            let z = search.curve().index(lon, 0.5).unwrap();
            assert!(covered(&ranges, z), "lon {} not covered", lon);
        }
    }

    #[test]
    fn test_z2_out_of_range_corner() {
        let search = Z2Search::new(31).unwrap();
        let bbox = BoundingBox::from_bounds(1.0, 43.0, 181.0, 44.0);
        assert!(matches!(
            search.ranges(&bbox),
            Err(ZOrderError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_z2_covers_indexed_points() {
        let search = Z2Search::new(31).unwrap();
        let bbox = BoundingBox::from_bounds(1.4, 43.5, 1.5, 44.0);
        let ranges = search.ranges(&bbox).unwrap();

        for (lon, lat) in [(1.4, 43.5), (1.45, 43.75), (1.5, 44.0), (1.41, 43.99)] {
            let z = search.curve().index(lon, lat).unwrap();
            assert!(covered(&ranges, z), "({}, {}) not covered", lon, lat);
        }
    }

    #[test]
    fn test_z2_config_caps_range_count() {
        let bbox = BoundingBox::from_bounds(-0.83, 43.52, 5.29, 47.44);
        let exact = Z2Search::new(31)
            .unwrap()
            .with_config(SearchConfig::new().with_max_recurse(12));
        let capped = exact.with_config(SearchConfig::new().with_max_recurse(12).with_max_ranges(4));

        let exact_ranges = exact.ranges(&bbox).unwrap();
        let capped_ranges = capped.ranges(&bbox).unwrap();
        assert!(capped_ranges.len() <= exact_ranges.len());
    }

    // =========================================================================
    // Z3Search
    // =========================================================================

    #[test]
    fn test_z3_single_week() {
        let search = Z3Search::new().unwrap();
        let bbox = BoundingBox::from_bounds(1.4, 43.5, 1.5, 44.0);
        let (ranges, weeks) = search
            .ranges_with_weeks(&bbox, &utc(2018, 9, 10, 7), &utc(2018, 9, 16, 23))
            .unwrap();

        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].min.week_number, 2541);
        assert_eq!(weeks[0].min.seconds, 25200.0);
        assert_eq!(weeks[0].max.seconds, 601200.0);
        assert!(!ranges.is_empty());
    }

    #[test]
    fn test_z3_ranges_matches_ranges_with_weeks() {
        let search = Z3Search::new().unwrap();
        let bbox = BoundingBox::from_bounds(1.4, 43.5, 1.5, 44.0);
        let (min, max) = (utc(2018, 6, 10, 7), utc(2018, 6, 11, 7));

        let (with_weeks, _) = search.ranges_with_weeks(&bbox, &min, &max).unwrap();
        assert_eq!(search.ranges(&bbox, &min, &max).unwrap(), with_weeks);
    }

    #[test]
    fn test_z3_covers_slice_corners() {
        let search = Z3Search::new().unwrap();
        let bbox = BoundingBox::from_bounds(-0.83, 43.52, 5.29, 47.44);
        let (ranges, weeks) = search
            .ranges_with_weeks(&bbox, &utc(2018, 6, 10, 7), &utc(2018, 6, 11, 7))
            .unwrap();

        assert_eq!(weeks.len(), 2);
        for week in &weeks {
            for seconds in [week.min.seconds as u64, week.max.seconds as u64] {
                let z = search.curve().index(2.0, 45.0, seconds).unwrap();
                assert!(covered(&ranges, z), "t = {} not covered", seconds);
            }
        }
    }

    #[test]
    fn test_z3_swapped_corners() {
        let search = Z3Search::new().unwrap();
        let (min, max) = (utc(2018, 6, 10, 7), utc(2018, 6, 11, 7));

        for bbox in [
            BoundingBox::from_bounds(5.0, 43.0, 1.0, 45.0),
            BoundingBox::from_bounds(1.0, 45.0, 5.0, 43.0),
        ] {
            assert!(matches!(
                search.ranges(&bbox, &min, &max),
                Err(ZOrderError::InvertedBox { .. })
            ));
        }
    }

    #[test]
    fn test_z3_middle_weeks_share_one_bound() {
        let search = Z3Search::new().unwrap();
        let bbox = BoundingBox::from_bounds(1.4, 43.5, 1.5, 44.0);
        let weeks = decompose(&utc(2018, 9, 12, 7), &utc(2018, 10, 10, 7)).unwrap();
        assert_eq!(weeks.len(), 5);

        let bounds = search.week_bounds(&bbox, &weeks).unwrap();
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds[1].min(), search.curve().index(1.4, 43.5, 0).unwrap());
    }

    #[test]
    fn test_z3_rejects_unordered_dates() {
        let search = Z3Search::new().unwrap();
        let bbox = BoundingBox::from_bounds(1.4, 43.5, 1.5, 44.0);
        assert!(matches!(
            search.ranges(&bbox, &utc(2018, 6, 11, 7), &utc(2018, 6, 10, 7)),
            Err(ZOrderError::UnorderedDates { .. })
        ));
    }

    #[test]
    fn test_z3_with_custom_curve() {
        let sfc = Z3Sfc::with_precision(7, 7, 3).unwrap();
        let search = Z3Search::with_curve(sfc);
        let bbox = BoundingBox::from_bounds(1.4, 43.5, 1.5, 44.0);
        let ranges = search
            .ranges(&bbox, &utc(2018, 9, 10, 7), &utc(2018, 9, 10, 8))
            .unwrap();

        let z = sfc.index(1.45, 43.7, 27000).unwrap();
        assert!(covered(&ranges, z));
    }
}
