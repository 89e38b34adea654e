// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Represents an organization that owns clubs.
///
/// `organization_id` is the canonical identifier assigned by the database.
/// `None` indicates the organization has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// The canonical numeric identifier assigned by the database.
    organization_id: Option<i64>,
    /// The organization name (unique, case-insensitive).
    name: String,
}

// Two organizations are equal if they have the same name, regardless of IDs
impl PartialEq for Organization {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Organization {}

impl Organization {
    /// Creates a new `Organization` without a persisted ID.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            organization_id: None,
            name,
        }
    }

    /// Creates an `Organization` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(organization_id: i64, name: String) -> Self {
        Self {
            organization_id: Some(organization_id),
            name,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn organization_id(&self) -> Option<i64> {
        self.organization_id
    }

    /// Returns the organization name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Represents a bookable sports facility owned by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the club has not been persisted yet.
    pub club_id: Option<i64>,
    /// The owning organization.
    pub organization_id: i64,
    /// The club name (unique per organization, case-insensitive).
    pub name: String,
    /// IANA timezone the club's opening hours are expressed in.
    pub timezone: String,
}

impl Club {
    /// Creates a new `Club` without a persisted ID.
    #[must_use]
    pub const fn new(organization_id: i64, name: String, timezone: String) -> Self {
        Self {
            club_id: None,
            organization_id,
            name,
            timezone,
        }
    }
}

/// Represents a bookable court within a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the court has not been persisted yet.
    pub court_id: Option<i64>,
    /// The owning club.
    pub club_id: i64,
    /// The court name (unique per club, case-insensitive).
    pub name: String,
    /// Playing surface label (informational).
    pub surface: Option<String>,
    /// Hourly rate in the smallest currency unit.
    pub hourly_rate_cents: i64,
}

impl Court {
    /// Creates a new `Court` without a persisted ID.
    #[must_use]
    pub const fn new(
        club_id: i64,
        name: String,
        surface: Option<String>,
        hourly_rate_cents: i64,
    ) -> Self {
        Self {
            court_id: None,
            club_id,
            name,
            surface,
            hourly_rate_cents,
        }
    }
}

/// Represents a coach attached to a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the coach has not been persisted yet.
    pub coach_id: Option<i64>,
    /// The club this coach works at.
    pub club_id: i64,
    /// The coach's display name.
    pub name: String,
}

impl Coach {
    /// Creates a new `Coach` without a persisted ID.
    #[must_use]
    pub const fn new(club_id: i64, name: String) -> Self {
        Self {
            coach_id: None,
            club_id,
            name,
        }
    }
}

/// Converts a stored weekday index (Monday = 0) into a `Weekday`.
///
/// # Errors
///
/// Returns `DomainError::InvalidWeekday` for values outside 0-6.
pub const fn weekday_from_index(value: u8) -> Result<Weekday, DomainError> {
    match value {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        _ => Err(DomainError::InvalidWeekday { value }),
    }
}

/// Converts a `Weekday` into its stored index (Monday = 0).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn weekday_to_index(weekday: Weekday) -> u8 {
    // num_days_from_monday is always 0-6
    weekday.num_days_from_monday() as u8
}
