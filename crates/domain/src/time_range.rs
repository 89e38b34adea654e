// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open time intervals and same-date conflict detection.
//!
//! Every overlap decision in the system (booking vs booking, booking vs
//! coach time off, time off vs time off, slot vs opening hours) goes
//! through this module.
//!
//! ## Invariants
//!
//! - Ranges are half-open: `[start, end)`. Two ranges that merely touch
//!   (`a.end == b.start`) do not overlap.
//! - `start < end` always. Ranges spanning midnight are rejected at
//!   construction time rather than silently wrapping.
//! - A slot with no time range covers the whole day and conflicts with
//!   everything on that date.

use crate::error::DomainError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` interval within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start time.
    start: NaiveTime,
    /// Exclusive end time.
    end: NaiveTime,
}

impl TimeRange {
    /// Creates a new `TimeRange`.
    ///
    /// # Arguments
    ///
    /// * `start` - Inclusive start time
    /// * `end` - Exclusive end time
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeRange` if `start >= end`. This also
    /// rejects ranges that would span midnight, which are not supported.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the inclusive start time.
    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// Returns the exclusive end time.
    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns true if this range intersects `other`.
    ///
    /// Half-open semantics: adjacent ranges sharing a boundary do not
    /// overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if this range lies entirely within `outer`.
    #[must_use]
    pub fn within(&self, outer: &Self) -> bool {
        outer.start <= self.start && self.end <= outer.end
    }

    /// Returns the duration of this range in whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_minutes()
    }
}

/// A calendar date plus an optional time range.
///
/// `range == None` means the slot covers the entire day. Coach time off
/// uses this shape; a full-day entry conflicts with any slot on the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlot {
    /// The calendar date.
    date: NaiveDate,
    /// The time range, or `None` for a full-day slot.
    range: Option<TimeRange>,
}

impl DaySlot {
    /// Creates a slot covering part of a day.
    #[must_use]
    pub const fn partial(date: NaiveDate, range: TimeRange) -> Self {
        Self {
            date,
            range: Some(range),
        }
    }

    /// Creates a slot covering the whole day.
    #[must_use]
    pub const fn full_day(date: NaiveDate) -> Self {
        Self { date, range: None }
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time range, or `None` for a full-day slot.
    #[must_use]
    pub const fn range(&self) -> Option<TimeRange> {
        self.range
    }

    /// Returns true if the two slots conflict.
    ///
    /// Slots on different dates never conflict. A full-day slot conflicts
    /// with any slot on the same date. Two partial slots conflict iff
    /// their time ranges overlap.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        if self.date != other.date {
            return false;
        }
        match (self.range, other.range) {
            (Some(a), Some(b)) => a.overlaps(&b),
            // At least one side covers the whole day
            _ => true,
        }
    }
}

/// A concrete booking slot: a date with a mandatory time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSlot {
    /// The calendar date.
    date: NaiveDate,
    /// The booked time range.
    range: TimeRange,
}

impl BookingSlot {
    /// Creates a booking slot from a date and time range.
    #[must_use]
    pub const fn new(date: NaiveDate, range: TimeRange) -> Self {
        Self { date, range }
    }

    /// Creates a booking slot from start and end timestamps.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CrossMidnightNotSupported` if the timestamps
    /// fall on different dates, or `DomainError::InvalidTimeRange` if the
    /// start is not strictly before the end.
    pub fn from_timestamps(
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        if start.date() != end.date() {
            return Err(DomainError::CrossMidnightNotSupported { start, end });
        }
        let range: TimeRange = TimeRange::new(start.time(), end.time())?;
        Ok(Self {
            date: start.date(),
            range,
        })
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the booked time range.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        self.range
    }

    /// Returns the start of the slot as a timestamp.
    #[must_use]
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.range.start())
    }

    /// Converts this booking slot into a `DaySlot` for conflict checks
    /// against full-day entries.
    #[must_use]
    pub const fn as_day_slot(&self) -> DaySlot {
        DaySlot::partial(self.date, self.range)
    }

    /// Returns true if two booking slots on the same court conflict.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.date == other.date && self.range.overlaps(&other.range)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
    }

    #[test]
    fn test_range_rejects_equal_bounds() {
        let result = TimeRange::new(t(10, 0), t(10, 0));
        assert!(matches!(
            result,
            Err(DomainError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        // A 22:00..01:00 booking would span midnight
        let result = TimeRange::new(t(22, 0), t(1, 0));
        assert!(matches!(
            result,
            Err(DomainError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_overlap_basic() {
        let a = TimeRange::new(t(10, 0), t(11, 0)).unwrap();
        let b = TimeRange::new(t(10, 30), t(11, 30)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let a = TimeRange::new(t(10, 0), t(11, 0)).unwrap();
        let b = TimeRange::new(t(11, 0), t(12, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_contained_range_overlaps() {
        let outer = TimeRange::new(t(9, 0), t(17, 0)).unwrap();
        let inner = TimeRange::new(t(12, 0), t(13, 0)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.within(&outer));
        assert!(!outer.within(&inner));
    }

    #[test]
    fn test_within_allows_touching_bounds() {
        let outer = TimeRange::new(t(9, 0), t(17, 0)).unwrap();
        let edge = TimeRange::new(t(9, 0), t(17, 0)).unwrap();
        assert!(edge.within(&outer));
    }

    #[test]
    fn test_duration_minutes() {
        let range = TimeRange::new(t(9, 0), t(10, 30)).unwrap();
        assert_eq!(range.duration_minutes(), 90);
    }

    #[test]
    fn test_full_day_conflicts_with_partial() {
        let full = DaySlot::full_day(d(1));
        let partial = DaySlot::partial(d(1), TimeRange::new(t(10, 0), t(11, 0)).unwrap());
        assert!(full.conflicts_with(&partial));
        assert!(partial.conflicts_with(&full));
    }

    #[test]
    fn test_full_day_conflicts_with_full_day() {
        assert!(DaySlot::full_day(d(1)).conflicts_with(&DaySlot::full_day(d(1))));
    }

    #[test]
    fn test_different_dates_never_conflict() {
        let full = DaySlot::full_day(d(1));
        let partial = DaySlot::partial(d(2), TimeRange::new(t(10, 0), t(11, 0)).unwrap());
        assert!(!full.conflicts_with(&partial));
        assert!(!DaySlot::full_day(d(1)).conflicts_with(&DaySlot::full_day(d(2))));
    }

    #[test]
    fn test_booking_slot_from_timestamps() {
        let start = d(5).and_time(t(14, 0));
        let end = d(5).and_time(t(15, 0));
        let slot = BookingSlot::from_timestamps(start, end).unwrap();
        assert_eq!(slot.date(), d(5));
        assert_eq!(slot.range().duration_minutes(), 60);
        assert_eq!(slot.start_datetime(), start);
    }

    #[test]
    fn test_booking_slot_rejects_cross_midnight() {
        let start = d(5).and_time(t(23, 0));
        let end = d(6).and_time(t(1, 0));
        let result = BookingSlot::from_timestamps(start, end);
        assert!(matches!(
            result,
            Err(DomainError::CrossMidnightNotSupported { .. })
        ));
    }
}
