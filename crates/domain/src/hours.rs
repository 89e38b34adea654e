// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Club opening hours and their resolution for a specific date.
//!
//! Clubs carry one weekly schedule (one entry per weekday) plus optional
//! per-date overrides for holidays and special events. Resolution order
//! for a date: special hours if present, otherwise the weekday entry,
//! otherwise closed.

use crate::error::DomainError;
use crate::time_range::TimeRange;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Opening hours for a single day.
///
/// Used for both weekly business hours and per-date special hours. The
/// `open`/`close` pair is meaningless when `is_closed` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Opening time.
    open: NaiveTime,
    /// Closing time.
    close: NaiveTime,
    /// Whether the club is closed for the whole day.
    is_closed: bool,
}

impl DayHours {
    /// Creates open hours for a day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOpeningHours` if `open >= close`.
    pub fn open(open: NaiveTime, close: NaiveTime) -> Result<Self, DomainError> {
        if open >= close {
            return Err(DomainError::InvalidOpeningHours { open, close });
        }
        Ok(Self {
            open,
            close,
            is_closed: false,
        })
    }

    /// Creates a closed day.
    #[must_use]
    pub fn closed() -> Self {
        // The stored times are irrelevant for closed days
        Self {
            open: NaiveTime::MIN,
            close: NaiveTime::MIN,
            is_closed: true,
        }
    }

    /// Returns the opening time.
    #[must_use]
    pub const fn open_time(&self) -> NaiveTime {
        self.open
    }

    /// Returns the closing time.
    #[must_use]
    pub const fn close_time(&self) -> NaiveTime {
        self.close
    }

    /// Returns whether the day is fully closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.is_closed
    }
}

/// The resolved opening hours for a club on a specific date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveHours {
    /// The date the hours apply to.
    pub date: NaiveDate,
    /// The resolved hours.
    pub hours: DayHours,
    /// True when a per-date override produced these hours.
    pub from_special_hours: bool,
}

/// Resolves the effective hours for a date.
///
/// # Arguments
///
/// * `date` - The date to resolve
/// * `special` - The per-date override for this date, if any
/// * `weekly` - The weekly schedule indexed Monday=0 .. Sunday=6; `None`
///   entries mean no schedule was configured for that weekday
///
/// # Returns
///
/// The effective hours. A missing weekday entry resolves to closed.
#[must_use]
pub fn resolve_effective_hours(
    date: NaiveDate,
    special: Option<DayHours>,
    weekly: &[Option<DayHours>; 7],
) -> EffectiveHours {
    if let Some(hours) = special {
        return EffectiveHours {
            date,
            hours,
            from_special_hours: true,
        };
    }
    let weekday_index: usize = date.weekday().num_days_from_monday() as usize;
    let hours: DayHours = weekly[weekday_index].unwrap_or_else(DayHours::closed);
    EffectiveHours {
        date,
        hours,
        from_special_hours: false,
    }
}

/// Validates that a time range fits within the effective hours for its date.
///
/// # Arguments
///
/// * `range` - The requested time range
/// * `effective` - The resolved hours for the date
///
/// # Errors
///
/// Returns `DomainError::ClubClosed` when the day is closed, or
/// `DomainError::OutsideOpeningHours` when the range does not fit
/// entirely within the open window.
pub fn validate_within_hours(
    range: &TimeRange,
    effective: &EffectiveHours,
) -> Result<(), DomainError> {
    if effective.hours.is_closed() {
        return Err(DomainError::ClubClosed {
            date: effective.date,
        });
    }
    let open_window: TimeRange =
        TimeRange::new(effective.hours.open_time(), effective.hours.close_time())?;
    if !range.within(&open_window) {
        return Err(DomainError::OutsideOpeningHours {
            open: effective.hours.open_time(),
            close: effective.hours.close_time(),
        });
    }
    Ok(())
}
