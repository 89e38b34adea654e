// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These DTOs are distinct from domain types and represent the API
//! contract. Dates, times, and timestamps travel as strings
//! (`YYYY-MM-DD`, `HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`) and are parsed at
//! the handler boundary.

use serde::{Deserialize, Serialize};

// ============================================================================
// Authentication & accounts
// ============================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The account email.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The opaque session token.
    pub session_token: String,
    /// The normalized account email.
    pub email: String,
    /// The account display name.
    pub display_name: String,
    /// The account role.
    pub role: String,
    /// Session expiry (ISO 8601).
    pub expires_at: String,
}

/// API response describing the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// The account's canonical identifier.
    pub account_id: i64,
    /// The normalized account email.
    pub email: String,
    /// The account display name.
    pub display_name: String,
    /// The account role.
    pub role: String,
}

/// API request to change the caller's own password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password.
    pub current_password: String,
    /// The new password.
    pub new_password: String,
    /// Confirmation of the new password.
    pub new_password_confirmation: String,
}

/// API response for a successful password change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordResponse {
    /// A success message.
    pub message: String,
}

/// API request to create an account (Admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// The account email.
    pub email: String,
    /// The display name.
    pub display_name: String,
    /// The initial password.
    pub password: String,
    /// Confirmation of the initial password.
    pub password_confirmation: String,
    /// The role (Admin, Staff, or Member).
    pub role: String,
}

/// API response for a successful account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    /// The canonical account identifier.
    pub account_id: i64,
    /// The normalized email.
    pub email: String,
    /// A success message.
    pub message: String,
}

/// Account information for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The canonical account identifier.
    pub account_id: i64,
    /// The normalized email.
    pub email: String,
    /// The display name.
    pub display_name: String,
    /// The role.
    pub role: String,
    /// Whether the account is disabled.
    pub is_disabled: bool,
}

/// API response for listing accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAccountsResponse {
    /// The accounts.
    pub accounts: Vec<AccountInfo>,
}

/// API response for enabling or disabling an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleAccountResponse {
    /// The account.
    pub account_id: i64,
    /// Whether the account is now disabled.
    pub is_disabled: bool,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Facility structure
// ============================================================================

/// API request to create an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    /// The organization name.
    pub name: String,
}

/// API response for a successful organization creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganizationResponse {
    /// The canonical organization identifier.
    pub organization_id: i64,
    /// The organization name.
    pub name: String,
    /// A success message.
    pub message: String,
}

/// Organization information for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInfo {
    /// The canonical organization identifier.
    pub organization_id: i64,
    /// The organization name.
    pub name: String,
}

/// API response for listing organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOrganizationsResponse {
    /// The organizations.
    pub organizations: Vec<OrganizationInfo>,
}

/// API request to create a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClubRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// The club name.
    pub name: String,
    /// IANA timezone label.
    pub timezone: String,
}

/// API response for a successful club creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClubResponse {
    /// The canonical club identifier.
    pub club_id: i64,
    /// The owning organization.
    pub organization_id: i64,
    /// The club name.
    pub name: String,
    /// A success message.
    pub message: String,
}

/// Club information for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubInfo {
    /// The canonical club identifier.
    pub club_id: i64,
    /// The owning organization.
    pub organization_id: i64,
    /// The club name.
    pub name: String,
    /// IANA timezone label.
    pub timezone: String,
}

/// API response for listing clubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListClubsResponse {
    /// The owning organization.
    pub organization_id: i64,
    /// The clubs.
    pub clubs: Vec<ClubInfo>,
}

/// API request to create a court.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCourtRequest {
    /// The owning club.
    pub club_id: i64,
    /// The court name.
    pub name: String,
    /// Playing surface label (informational).
    pub surface: Option<String>,
    /// Hourly rate in the smallest currency unit.
    pub hourly_rate_cents: i64,
}

/// API response for a successful court creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCourtResponse {
    /// The canonical court identifier.
    pub court_id: i64,
    /// The owning club.
    pub club_id: i64,
    /// The court name.
    pub name: String,
    /// A success message.
    pub message: String,
}

/// Court information for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtInfo {
    /// The canonical court identifier.
    pub court_id: i64,
    /// The owning club.
    pub club_id: i64,
    /// The court name.
    pub name: String,
    /// Playing surface label.
    pub surface: Option<String>,
    /// Hourly rate in the smallest currency unit.
    pub hourly_rate_cents: i64,
}

/// API response for listing courts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCourtsResponse {
    /// The owning club.
    pub club_id: i64,
    /// The courts.
    pub courts: Vec<CourtInfo>,
}

/// API request to create a coach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCoachRequest {
    /// The owning club.
    pub club_id: i64,
    /// The coach's display name.
    pub name: String,
}

/// API response for a successful coach creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCoachResponse {
    /// The canonical coach identifier.
    pub coach_id: i64,
    /// The owning club.
    pub club_id: i64,
    /// The coach's display name.
    pub name: String,
    /// A success message.
    pub message: String,
}

/// Coach information for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachInfo {
    /// The canonical coach identifier.
    pub coach_id: i64,
    /// The owning club.
    pub club_id: i64,
    /// The coach's display name.
    pub name: String,
}

/// API response for listing coaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCoachesResponse {
    /// The owning club.
    pub club_id: i64,
    /// The coaches.
    pub coaches: Vec<CoachInfo>,
}

// ============================================================================
// Opening hours
// ============================================================================

/// API request to set business hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBusinessHoursRequest {
    /// The club.
    pub club_id: i64,
    /// Weekday index, Monday = 0.
    pub day_of_week: u8,
    /// Opening time ("HH:MM:SS"); ignored when `is_closed`.
    pub open_time: String,
    /// Closing time ("HH:MM:SS"); ignored when `is_closed`.
    pub close_time: String,
    /// Whether the club is closed that weekday.
    pub is_closed: bool,
}

/// API request to set special hours for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSpecialHoursRequest {
    /// The club.
    pub club_id: i64,
    /// The date ("YYYY-MM-DD").
    pub date: String,
    /// Opening time ("HH:MM:SS"); ignored when `is_closed`.
    pub open_time: String,
    /// Closing time ("HH:MM:SS"); ignored when `is_closed`.
    pub close_time: String,
    /// Whether the club is closed that date.
    pub is_closed: bool,
}

/// API response for a successful hours update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetHoursResponse {
    /// The club.
    pub club_id: i64,
    /// A success message.
    pub message: String,
}

/// One weekday's business hours for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHoursInfo {
    /// Weekday index, Monday = 0.
    pub day_of_week: u8,
    /// Opening time.
    pub open_time: String,
    /// Closing time.
    pub close_time: String,
    /// Whether the club is closed that weekday.
    pub is_closed: bool,
}

/// API response for listing a club's weekly hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBusinessHoursResponse {
    /// The club.
    pub club_id: i64,
    /// The configured weekday entries.
    pub hours: Vec<BusinessHoursInfo>,
}

/// API response for the resolved hours of a club on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveHoursResponse {
    /// The club.
    pub club_id: i64,
    /// The date.
    pub date: String,
    /// Whether the club is closed on that date.
    pub is_closed: bool,
    /// Opening time, absent when closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    /// Closing time, absent when closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
    /// True when a per-date override produced these hours.
    pub from_special_hours: bool,
}

// ============================================================================
// Coach time off
// ============================================================================

/// API request to create a time-off entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTimeOffRequest {
    /// The coach.
    pub coach_id: i64,
    /// The blocked date ("YYYY-MM-DD").
    pub date: String,
    /// Optional start time ("HH:MM:SS"); both times absent = full day.
    pub start_time: Option<String>,
    /// Optional end time ("HH:MM:SS").
    pub end_time: Option<String>,
    /// Why the coach is unavailable.
    #[serde(default)]
    pub reason: String,
}

/// API response for a successful time-off creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTimeOffResponse {
    /// The canonical time-off identifier.
    pub time_off_id: i64,
    /// The coach.
    pub coach_id: i64,
    /// The blocked date.
    pub date: String,
    /// A success message.
    pub message: String,
}

/// Time-off information for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffInfo {
    /// The canonical time-off identifier.
    pub time_off_id: i64,
    /// The coach.
    pub coach_id: i64,
    /// The blocked date.
    pub date: String,
    /// Optional start time; absent = full day.
    pub start_time: Option<String>,
    /// Optional end time.
    pub end_time: Option<String>,
    /// Why the coach is unavailable.
    pub reason: String,
}

/// API response for listing a coach's time off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTimeOffResponse {
    /// The coach.
    pub coach_id: i64,
    /// The entries.
    pub entries: Vec<TimeOffInfo>,
}

/// API response for deleting a time-off entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTimeOffResponse {
    /// The removed entry.
    pub time_off_id: i64,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Bookings
// ============================================================================

/// API request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// The court to book.
    pub court_id: i64,
    /// Optional coach to attach.
    pub coach_id: Option<i64>,
    /// Start timestamp ("YYYY-MM-DDTHH:MM:SS", club-local).
    pub start: String,
    /// End timestamp ("YYYY-MM-DDTHH:MM:SS", club-local). Must fall on the
    /// same date as `start`.
    pub end: String,
}

/// API response for a successful booking creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    /// The canonical booking identifier.
    pub booking_id: i64,
    /// The booked court.
    pub court_id: i64,
    /// The booked date.
    pub date: String,
    /// The start time.
    pub start_time: String,
    /// The end time.
    pub end_time: String,
    /// The booking status (always Pending on creation).
    pub booking_status: String,
    /// The payment status (always Unpaid on creation).
    pub payment_status: String,
    /// RFC 3339 payment-hold deadline.
    pub reservation_expires_at: String,
    /// The price derived from the court's hourly rate.
    pub price_cents: i64,
    /// A success message.
    pub message: String,
}

/// Booking information for listing and detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    /// The canonical booking identifier.
    pub booking_id: i64,
    /// The booked court.
    pub court_id: i64,
    /// The owning account.
    pub account_id: i64,
    /// The attached coach, if any.
    pub coach_id: Option<i64>,
    /// The booked date.
    pub date: String,
    /// The start time.
    pub start_time: String,
    /// The end time.
    pub end_time: String,
    /// The booking status.
    pub booking_status: String,
    /// The payment status.
    pub payment_status: String,
    /// Why the booking was cancelled, if it was.
    pub cancel_reason: Option<String>,
    /// RFC 3339 payment-hold deadline, if still unpaid.
    pub reservation_expires_at: Option<String>,
}

/// API response for listing bookings on a court and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookingsResponse {
    /// The court.
    pub court_id: i64,
    /// The date.
    pub date: String,
    /// The bookings.
    pub bookings: Vec<BookingInfo>,
}

/// API response for a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    /// The cancelled booking.
    pub booking_id: i64,
    /// The booking status (always Cancelled).
    pub booking_status: String,
    /// The recorded reason.
    pub cancel_reason: String,
    /// A success message.
    pub message: String,
}

/// API response for a successful payment-hold extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePaymentResponse {
    /// The booking.
    pub booking_id: i64,
    /// The new RFC 3339 payment-hold deadline.
    pub reservation_expires_at: String,
    /// A success message.
    pub message: String,
}

/// API response for a successful payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPaymentResponse {
    /// The booking.
    pub booking_id: i64,
    /// The booking status (always Confirmed).
    pub booking_status: String,
    /// The payment status (always Paid).
    pub payment_status: String,
    /// A success message.
    pub message: String,
}

/// API response for the reservation-expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseExpiredResponse {
    /// The bookings released by this sweep.
    pub released_booking_ids: Vec<i64>,
    /// A success message.
    pub message: String,
}
