// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Serializable representation of an account row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    pub account_id: i64,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// Serializable representation of a session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub account_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Serializable representation of an organization row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationData {
    pub organization_id: i64,
    pub name: String,
    pub created_at: String,
}

/// Serializable representation of a club row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubData {
    pub club_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub timezone: String,
    pub created_at: String,
}

/// Serializable representation of a court row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtData {
    pub court_id: i64,
    pub club_id: i64,
    pub name: String,
    pub surface: Option<String>,
    pub hourly_rate_cents: i64,
    pub created_at: String,
}

/// Serializable representation of a coach row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachData {
    pub coach_id: i64,
    pub club_id: i64,
    pub name: String,
    pub created_at: String,
}

/// Serializable representation of a weekly business-hours row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHoursData {
    pub business_hours_id: i64,
    pub club_id: i64,
    /// Weekday index, Monday = 0.
    pub day_of_week: i32,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
}

/// Serializable representation of a per-date special-hours row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialHoursData {
    pub special_hours_id: i64,
    pub club_id: i64,
    pub date: String,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
}

/// Serializable representation of a coach time-off row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffData {
    pub time_off_id: i64,
    pub coach_id: i64,
    pub date: String,
    /// `None` together with `end_time == None` marks a full-day entry.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: String,
    pub created_at: String,
}

/// Serializable representation of a booking row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingData {
    pub booking_id: i64,
    pub court_id: i64,
    pub account_id: i64,
    pub coach_id: Option<i64>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub booking_status: String,
    pub payment_status: String,
    pub cancel_reason: Option<String>,
    pub reservation_expires_at: Option<String>,
    pub created_at: String,
}

/// Parameters for inserting a new booking row.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub court_id: i64,
    pub account_id: i64,
    pub coach_id: Option<i64>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub reservation_expires_at: Option<String>,
}
