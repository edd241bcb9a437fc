//! Calendar dates and inclusive date ranges.
//!
//! # Time Model
//! All dates are calendar days (`NaiveDate`, no time zone). Ranges are
//! closed on both ends: a leave from Monday to Wednesday covers three days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// ISO date format accepted by [`parse_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
/// Returns `InvalidDate` for anything that is not a real calendar date
/// in that format (e.g. `2024-02-30`, `03/06/2024`).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| ScheduleError::InvalidDate {
        input: input.to_string(),
    })
}

/// A date interval [start, end], inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range. `start` after `end` yields an empty range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Whether the range covers no day at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of days covered.
    pub fn days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    /// Whether `date` falls within the range.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether two ranges share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-03").unwrap(), d(2024, 6, 3));
        assert_eq!(parse_date(" 2024-06-03 ").unwrap(), d(2024, 6, 3));
    }

    #[test]
    fn test_parse_date_rejects_malformed() {
        for bad in ["2024-02-30", "03/06/2024", "", "tomorrow", "2024-13-01"] {
            match parse_date(bad) {
                Err(ScheduleError::InvalidDate { input }) => assert_eq!(input, bad),
                other => panic!("expected InvalidDate for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_range_inclusive() {
        let r = DateRange::new(d(2024, 6, 3), d(2024, 6, 5));
        assert!(r.contains(d(2024, 6, 3)));
        assert!(r.contains(d(2024, 6, 5)));
        assert!(!r.contains(d(2024, 6, 6)));
        assert!(!r.contains(d(2024, 6, 2)));
        assert_eq!(r.days(), 3);
    }

    #[test]
    fn test_range_overlap() {
        let a = DateRange::new(d(2024, 6, 1), d(2024, 6, 5));
        let b = DateRange::new(d(2024, 6, 5), d(2024, 6, 9));
        let c = DateRange::new(d(2024, 6, 6), d(2024, 6, 9));
        assert!(a.overlaps(&b)); // shared last day
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_empty_range() {
        let r = DateRange::new(d(2024, 6, 5), d(2024, 6, 1));
        assert!(r.is_empty());
        assert_eq!(r.days(), 0);
        assert!(!r.contains(d(2024, 6, 3)));
        assert!(!r.overlaps(&DateRange::day(d(2024, 6, 3))));
    }
}
