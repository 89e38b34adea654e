// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::{BookingStatus, PaymentStatus};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A time range has a start that is not strictly before its end.
    InvalidTimeRange {
        /// The start time.
        start: NaiveTime,
        /// The end time.
        end: NaiveTime,
    },
    /// A booking's start and end fall on different calendar dates.
    CrossMidnightNotSupported {
        /// The start timestamp.
        start: NaiveDateTime,
        /// The end timestamp.
        end: NaiveDateTime,
    },
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Display name is empty or invalid.
    InvalidDisplayName(String),
    /// Club name is empty or invalid.
    InvalidClubName(String),
    /// Court name is empty or invalid.
    InvalidCourtName(String),
    /// Coach name is empty or invalid.
    InvalidCoachName(String),
    /// Organization name is empty or invalid.
    InvalidOrganizationName(String),
    /// Free-text reason exceeds limits.
    InvalidReason(String),
    /// Timezone label is not a valid IANA timezone.
    InvalidTimezone(String),
    /// Weekday index is out of range.
    InvalidWeekday {
        /// The out-of-range value (valid values are 0-6, Monday = 0).
        value: u8,
    },
    /// Opening hours have an open time that is not before the close time.
    InvalidOpeningHours {
        /// The open time.
        open: NaiveTime,
        /// The close time.
        close: NaiveTime,
    },
    /// The club is closed on the requested date.
    ClubClosed {
        /// The requested date.
        date: NaiveDate,
    },
    /// The requested slot falls outside the club's opening hours.
    OutsideOpeningHours {
        /// The open time for the date.
        open: NaiveTime,
        /// The close time for the date.
        close: NaiveTime,
    },
    /// The requested slot overlaps an existing booking on the same court.
    BookingConflict {
        /// The booking already occupying the slot.
        existing_booking_id: i64,
    },
    /// The requested slot overlaps coach time off, or the time off overlaps
    /// an existing booking or time-off entry.
    TimeOffConflict {
        /// The date of the conflict.
        date: NaiveDate,
    },
    /// The booking is already cancelled.
    AlreadyCancelled,
    /// The booking's start time has already passed.
    BookingAlreadyStarted,
    /// A paid booking cannot be cancelled directly.
    PaidBookingRequiresRefund,
    /// Booking status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },
    /// Payment status transition is not permitted.
    InvalidPaymentTransition {
        /// The current payment status.
        from: PaymentStatus,
        /// The requested payment status.
        to: PaymentStatus,
    },
    /// Failed to parse a booking status from a string.
    InvalidBookingStatus(String),
    /// Failed to parse a payment status from a string.
    InvalidPaymentStatus(String),
    /// Failed to parse a cancel reason from a string.
    InvalidCancelReason(String),
    /// Failed to parse a date, time, or timestamp from a string.
    DateParseError {
        /// The invalid input.
        value: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeRange { start, end } => {
                write!(
                    f,
                    "Start time must be before end time (got {start} .. {end})"
                )
            }
            Self::CrossMidnightNotSupported { start, end } => {
                write!(
                    f,
                    "Bookings spanning midnight are not supported ({start} .. {end})"
                )
            }
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidDisplayName(msg) => write!(f, "Invalid display name: {msg}"),
            Self::InvalidClubName(msg) => write!(f, "Invalid club name: {msg}"),
            Self::InvalidCourtName(msg) => write!(f, "Invalid court name: {msg}"),
            Self::InvalidCoachName(msg) => write!(f, "Invalid coach name: {msg}"),
            Self::InvalidOrganizationName(msg) => {
                write!(f, "Invalid organization name: {msg}")
            }
            Self::InvalidReason(msg) => write!(f, "Invalid reason: {msg}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
            Self::InvalidWeekday { value } => {
                write!(f, "Invalid weekday index: {value}. Must be 0-6 (Monday=0)")
            }
            Self::InvalidOpeningHours { open, close } => {
                write!(
                    f,
                    "Open time must be before close time (got {open} .. {close})"
                )
            }
            Self::ClubClosed { date } => write!(f, "The club is closed on {date}"),
            Self::OutsideOpeningHours { open, close } => {
                write!(
                    f,
                    "Requested time falls outside opening hours ({open} .. {close})"
                )
            }
            Self::BookingConflict {
                existing_booking_id,
            } => {
                write!(
                    f,
                    "Requested time overlaps existing booking {existing_booking_id}"
                )
            }
            Self::TimeOffConflict { date } => {
                write!(f, "Requested time conflicts with coach time off on {date}")
            }
            Self::AlreadyCancelled => write!(f, "Booking is already cancelled"),
            Self::BookingAlreadyStarted => {
                write!(f, "Booking start time has already passed")
            }
            Self::PaidBookingRequiresRefund => {
                write!(
                    f,
                    "Paid bookings cannot be cancelled directly and must be refunded"
                )
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Booking status cannot change from {from} to {to}")
            }
            Self::InvalidPaymentTransition { from, to } => {
                write!(f, "Payment status cannot change from {from} to {to}")
            }
            Self::InvalidBookingStatus(s) => write!(f, "Unknown booking status: {s}"),
            Self::InvalidPaymentStatus(s) => write!(f, "Unknown payment status: {s}"),
            Self::InvalidCancelReason(s) => write!(f, "Unknown cancel reason: {s}"),
            Self::DateParseError { value, error } => {
                write!(f, "Failed to parse '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
