// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::time_off::{
    CoachTimeOff, validate_time_off_against_bookings, validate_time_off_overlap,
};
use crate::time_range::{BookingSlot, DaySlot, TimeRange};
use chrono::{NaiveDate, NaiveTime};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

fn partial(day: u32, start_h: u32, end_h: u32) -> DaySlot {
    DaySlot::partial(d(day), TimeRange::new(t(start_h, 0), t(end_h, 0)).unwrap())
}

fn booked(day: u32, start_h: u32, end_h: u32) -> BookingSlot {
    BookingSlot::new(d(day), TimeRange::new(t(start_h, 0), t(end_h, 0)).unwrap())
}

#[test]
fn test_time_off_entry_construction() {
    let entry: CoachTimeOff =
        CoachTimeOff::new(7, DaySlot::full_day(d(1)), String::from("holiday"));
    assert!(entry.time_off_id.is_none());
    assert_eq!(entry.coach_id, 7);
    assert!(entry.slot.range().is_none());
}

#[test]
fn test_no_existing_entries_never_conflicts() {
    assert!(validate_time_off_overlap(&DaySlot::full_day(d(1)), &[]).is_ok());
}

#[test]
fn test_full_day_conflicts_with_partial_entry() {
    let existing = vec![partial(1, 10, 12)];
    let result = validate_time_off_overlap(&DaySlot::full_day(d(1)), &existing);
    assert_eq!(result, Err(DomainError::TimeOffConflict { date: d(1) }));
}

#[test]
fn test_partial_conflicts_with_full_day_entry() {
    let existing = vec![DaySlot::full_day(d(1))];
    let result = validate_time_off_overlap(&partial(1, 10, 12), &existing);
    assert_eq!(result, Err(DomainError::TimeOffConflict { date: d(1) }));
}

#[test]
fn test_disjoint_partial_entries_pass() {
    let existing = vec![partial(1, 8, 10), partial(1, 12, 14)];
    assert!(validate_time_off_overlap(&partial(1, 10, 12), &existing).is_ok());
}

#[test]
fn test_other_dates_do_not_conflict() {
    let existing = vec![DaySlot::full_day(d(2)), partial(3, 8, 20)];
    assert!(validate_time_off_overlap(&DaySlot::full_day(d(1)), &existing).is_ok());
}

#[test]
fn test_full_day_off_conflicts_with_any_booking_that_date() {
    let bookings = vec![booked(1, 9, 10)];
    let result = validate_time_off_against_bookings(&DaySlot::full_day(d(1)), &bookings);
    assert_eq!(result, Err(DomainError::TimeOffConflict { date: d(1) }));
}

#[test]
fn test_partial_time_off_conflicts_with_overlapping_booking() {
    let bookings = vec![booked(1, 9, 11)];
    let result = validate_time_off_against_bookings(&partial(1, 10, 12), &bookings);
    assert!(result.is_err());
}

#[test]
fn test_adjacent_booking_does_not_block_time_off() {
    let bookings = vec![booked(1, 8, 10)];
    assert!(validate_time_off_against_bookings(&partial(1, 10, 12), &bookings).is_ok());
}
