// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coach time off and its conflict rules.

use crate::error::DomainError;
use crate::time_range::{BookingSlot, DaySlot};
use serde::{Deserialize, Serialize};

/// Represents a coach's time-off entry.
///
/// An entry with no time range blocks the entire day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachTimeOff {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the entry has not been persisted yet.
    pub time_off_id: Option<i64>,
    /// The coach this entry belongs to.
    pub coach_id: i64,
    /// The blocked date and optional time range.
    pub slot: DaySlot,
    /// Why the coach is unavailable.
    pub reason: String,
}

impl CoachTimeOff {
    /// Creates a new unpersisted time-off entry.
    #[must_use]
    pub const fn new(coach_id: i64, slot: DaySlot, reason: String) -> Self {
        Self {
            time_off_id: None,
            coach_id,
            slot,
            reason,
        }
    }
}

/// Validates a new time-off entry against the coach's existing entries.
///
/// Full-day entries conflict with anything on the same date; partial
/// entries conflict when their ranges overlap.
///
/// # Errors
///
/// Returns `DomainError::TimeOffConflict` naming the conflicting date.
pub fn validate_time_off_overlap(
    candidate: &DaySlot,
    existing: &[DaySlot],
) -> Result<(), DomainError> {
    for slot in existing {
        if candidate.conflicts_with(slot) {
            return Err(DomainError::TimeOffConflict {
                date: candidate.date(),
            });
        }
    }
    Ok(())
}

/// Validates a new time-off entry against the coach's live bookings.
///
/// Only bookings that still occupy their slot are passed in; cancelled
/// bookings never block time off.
///
/// # Errors
///
/// Returns `DomainError::TimeOffConflict` naming the conflicting date.
pub fn validate_time_off_against_bookings(
    candidate: &DaySlot,
    booked_slots: &[BookingSlot],
) -> Result<(), DomainError> {
    for slot in booked_slots {
        if candidate.conflicts_with(&slot.as_day_slot()) {
            return Err(DomainError::TimeOffConflict {
                date: candidate.date(),
            });
        }
    }
    Ok(())
}
