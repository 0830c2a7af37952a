//! Week-aligned time decomposition.
//!
//! The time axis of the space-time curve covers one week only: seconds since
//! Monday 00:00 UTC. A query over an arbitrary absolute date span is therefore
//! cut into one [`WeekTimeRange`] per week it touches, and each slice becomes a
//! separate bound for the range search.
//!
//! Week numbers count whole weeks since Monday 1969-12-29 00:00 UTC, the
//! Monday on or before the Unix epoch. Instants before that Monday get
//! negative week numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZOrderError};

/// Number of seconds in one week.
pub const SECONDS_PER_WEEK: u64 = 604_800;

/// Seconds between Monday 1969-12-29 00:00 UTC and the Unix epoch (a Thursday).
const EPOCH_MONDAY_OFFSET_SECS: i64 = 3 * 86_400;

const NANOS_PER_SECOND: f64 = 1e9;

/// A point in time expressed as a week number and an offset into that week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekDate {
    /// Whole weeks since Monday 1969-12-29.
    pub week_number: i64,
    /// Seconds since Monday 00:00 UTC of that week, in `[0, 604800]`.
    pub seconds: f64,
}

impl WeekDate {
    pub fn new(week_number: i64, seconds: f64) -> Self {
        Self {
            week_number,
            seconds,
        }
    }

    /// Monday 00:00 UTC of this week, or `None` if it is outside chrono's range.
    pub fn week_start(&self) -> Option<DateTime<Utc>> {
        let secs = self
            .week_number
            .checked_mul(SECONDS_PER_WEEK as i64)?
            .checked_sub(EPOCH_MONDAY_OFFSET_SECS)?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// One week slice of a date span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekTimeRange {
    pub min: WeekDate,
    pub max: WeekDate,
}

/// Converts `instant` into its week number and offset into the week.
pub fn week_date(instant: &DateTime<Utc>) -> WeekDate {
    let since_monday = instant.timestamp() + EPOCH_MONDAY_OFFSET_SECS;
    let week_number = since_monday.div_euclid(SECONDS_PER_WEEK as i64);
    let secs = since_monday.rem_euclid(SECONDS_PER_WEEK as i64);
    let nanos = instant.timestamp_subsec_nanos();

    WeekDate {
        week_number,
        seconds: secs as f64 + nanos as f64 / NANOS_PER_SECOND,
    }
}

/// Number of whole weeks between Monday 1969-12-29 and `instant`.
pub fn weeks_since_epoch(instant: &DateTime<Utc>) -> i64 {
    week_date(instant).week_number
}

/// Week number of the current wall-clock time.
pub fn current_week_number() -> i64 {
    weeks_since_epoch(&Utc::now())
}

/// Cuts `[date_min, date_max]` into week slices.
///
/// - Both dates in the same week: one slice from `date_min` to `date_max`.
/// - Otherwise: the first slice runs from `date_min` to the end of its week
///   (`604800`), the last from `0` to `date_max`, and every week in between
///   is covered entirely.
///
/// # Errors
///
/// Returns [`ZOrderError::UnorderedDates`] if `date_min` is after `date_max`.
pub fn decompose(date_min: &DateTime<Utc>, date_max: &DateTime<Utc>) -> Result<Vec<WeekTimeRange>> {
    if date_min > date_max {
        return Err(ZOrderError::UnorderedDates {
            min: date_min.to_rfc3339(),
            max: date_max.to_rfc3339(),
        });
    }

    let first = week_date(date_min);
    let last = week_date(date_max);

    if first.week_number == last.week_number {
        return Ok(vec![WeekTimeRange {
            min: first,
            max: last,
        }]);
    }

    let end_of_week = SECONDS_PER_WEEK as f64;
    let ranges = (first.week_number..=last.week_number)
        .map(|week| {
            let min = if week == first.week_number {
                first
            } else {
                WeekDate::new(week, 0.0)
            };
            let max = if week == last.week_number {
                last
            } else {
                WeekDate::new(week, end_of_week)
            };
            WeekTimeRange { min, max }
        })
        .collect();

    Ok(ranges)
}
