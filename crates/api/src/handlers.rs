// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers follow a fixed shape: authorize the actor, translate the wire
//! request into domain types, run the domain guards, persist, and build
//! the response. Conflict checks happen while the caller holds the
//! persistence lock, so the read-then-write sequence cannot race within
//! one process.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use num_traits::cast::ToPrimitive;
use std::str::FromStr;
use time::OffsetDateTime;

use courtkeep_domain::{
    Booking, BookingSlot, BookingStatus, CancelReason, DayHours, DaySlot, EffectiveHours,
    PaymentStatus, TimeRange, resolve_effective_hours, validate_cancellation, validate_club_name,
    validate_coach_name, validate_court_name, validate_display_name, validate_email,
    validate_payment_confirmation, validate_payment_resume, validate_reason,
    validate_time_off_against_bookings, validate_time_off_overlap, validate_timezone,
    validate_within_hours, weekday_from_index,
};
use courtkeep_persistence::{
    AccountData, BookingData, BusinessHoursData, ClubData, CoachData, CourtData, NewBooking,
    Persistence, SpecialHoursData, TimeOffData,
};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::error::{ApiError, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AccountInfo, BookingInfo, BusinessHoursInfo, CancelBookingResponse, ChangePasswordRequest,
    ChangePasswordResponse, ClubInfo, CoachInfo, ConfirmPaymentResponse, CourtInfo,
    CreateAccountRequest, CreateAccountResponse, CreateBookingRequest, CreateBookingResponse,
    CreateClubRequest, CreateClubResponse, CreateCoachRequest, CreateCoachResponse,
    CreateCourtRequest, CreateCourtResponse, CreateOrganizationRequest,
    CreateOrganizationResponse, CreateTimeOffRequest, CreateTimeOffResponse,
    DeleteTimeOffResponse, EffectiveHoursResponse, GetBusinessHoursResponse, ListAccountsResponse,
    ListBookingsResponse, ListClubsResponse, ListCoachesResponse, ListCourtsResponse,
    ListOrganizationsResponse, ListTimeOffResponse, LoginRequest, LoginResponse,
    OrganizationInfo, ReleaseExpiredResponse, ResumePaymentResponse, SetBusinessHoursRequest,
    SetHoursResponse, SetSpecialHoursRequest, TimeOffInfo, ToggleAccountResponse, WhoAmIResponse,
};

/// Wire format for dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for times.
const TIME_FORMAT: &str = "%H:%M:%S";

/// Wire format for club-local timestamps.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ============================================================================
// Parsing and conversion helpers
// ============================================================================

/// Wraps a persistence failure as an internal API error.
fn internal(err: courtkeep_persistence::PersistenceError) -> ApiError {
    ApiError::Internal {
        message: format!("Persistence error: {err}"),
    }
}

/// Parses a wire date ("YYYY-MM-DD").
fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| ApiError::InvalidInput {
        field: String::from("date"),
        message: format!("Failed to parse date '{value}': {e}"),
    })
}

/// Parses a wire time ("HH:MM:SS", seconds optional).
fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Failed to parse time '{value}': {e}"),
        })
}

/// Parses a wire timestamp ("YYYY-MM-DDTHH:MM:SS").
fn parse_datetime(field: &'static str, value: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Failed to parse timestamp '{value}': {e}"),
    })
}

/// Formats an `OffsetDateTime` as RFC 3339 for storage and responses.
fn format_rfc3339(value: OffsetDateTime) -> Result<String, ApiError> {
    value
        .format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}

/// Parses a stored RFC 3339 deadline.
fn parse_rfc3339(value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &time::format_description::well_known::Rfc3339).map_err(|e| {
        ApiError::Internal {
            message: format!("Stored deadline '{value}' is invalid: {e}"),
        }
    })
}

/// Reconstructs a domain booking from a stored row.
fn booking_to_domain(data: &BookingData) -> Result<Booking, ApiError> {
    let date: NaiveDate = parse_date(&data.date)?;
    let start: NaiveTime = parse_time("start_time", &data.start_time)?;
    let end: NaiveTime = parse_time("end_time", &data.end_time)?;
    let range: TimeRange = TimeRange::new(start, end).map_err(translate_domain_error)?;

    let status: BookingStatus =
        BookingStatus::from_str(&data.booking_status).map_err(translate_domain_error)?;
    let payment_status: PaymentStatus =
        PaymentStatus::from_str(&data.payment_status).map_err(translate_domain_error)?;
    let cancel_reason: Option<CancelReason> = data
        .cancel_reason
        .as_deref()
        .map(CancelReason::from_str)
        .transpose()
        .map_err(translate_domain_error)?;

    Ok(Booking {
        booking_id: Some(data.booking_id),
        court_id: data.court_id,
        account_id: data.account_id,
        coach_id: data.coach_id,
        slot: BookingSlot::new(date, range),
        status,
        payment_status,
        cancel_reason,
        reservation_expires_at: data.reservation_expires_at.clone(),
    })
}

/// Converts a stored booking row into its wire representation.
fn booking_to_info(data: BookingData) -> BookingInfo {
    BookingInfo {
        booking_id: data.booking_id,
        court_id: data.court_id,
        account_id: data.account_id,
        coach_id: data.coach_id,
        date: data.date,
        start_time: data.start_time,
        end_time: data.end_time,
        booking_status: data.booking_status,
        payment_status: data.payment_status,
        cancel_reason: data.cancel_reason,
        reservation_expires_at: data.reservation_expires_at,
    }
}

/// Reconstructs the slot of a stored time-off row.
fn time_off_to_slot(data: &TimeOffData) -> Result<DaySlot, ApiError> {
    let date: NaiveDate = parse_date(&data.date)?;
    match (&data.start_time, &data.end_time) {
        (Some(start), Some(end)) => {
            let range: TimeRange = TimeRange::new(
                parse_time("start_time", start)?,
                parse_time("end_time", end)?,
            )
            .map_err(translate_domain_error)?;
            Ok(DaySlot::partial(date, range))
        }
        (None, None) => Ok(DaySlot::full_day(date)),
        _ => Err(ApiError::Internal {
            message: format!(
                "Time-off entry {} has a half-open time pair",
                data.time_off_id
            ),
        }),
    }
}

/// Builds the Monday-indexed weekly schedule from stored rows.
fn weekly_schedule(rows: &[BusinessHoursData]) -> Result<[Option<DayHours>; 7], ApiError> {
    let mut weekly: [Option<DayHours>; 7] = [None; 7];
    for row in rows {
        let index: usize =
            row.day_of_week
                .to_usize()
                .filter(|i| *i < 7)
                .ok_or_else(|| ApiError::Internal {
                    message: format!("Stored weekday index {} is invalid", row.day_of_week),
                })?;
        let hours: DayHours = if row.is_closed {
            DayHours::closed()
        } else {
            DayHours::open(
                parse_time("open_time", &row.open_time)?,
                parse_time("close_time", &row.close_time)?,
            )
            .map_err(translate_domain_error)?
        };
        weekly[index] = Some(hours);
    }
    Ok(weekly)
}

/// Converts a stored special-hours row into `DayHours`.
fn special_to_hours(row: &SpecialHoursData) -> Result<DayHours, ApiError> {
    if row.is_closed {
        return Ok(DayHours::closed());
    }
    DayHours::open(
        parse_time("open_time", &row.open_time)?,
        parse_time("close_time", &row.close_time)?,
    )
    .map_err(translate_domain_error)
}

/// Resolves the effective hours for a club and date from persistence.
fn load_effective_hours(
    persistence: &mut Persistence,
    club_id: i64,
    date: NaiveDate,
) -> Result<EffectiveHours, ApiError> {
    let date_str: String = date.format(DATE_FORMAT).to_string();
    let special: Option<DayHours> = persistence
        .get_special_hours(club_id, &date_str)
        .map_err(internal)?
        .as_ref()
        .map(special_to_hours)
        .transpose()?;
    let rows: Vec<BusinessHoursData> =
        persistence.list_business_hours(club_id).map_err(internal)?;
    let weekly: [Option<DayHours>; 7] = weekly_schedule(&rows)?;
    Ok(resolve_effective_hours(date, special, &weekly))
}

/// Loads a court or fails with 404.
fn require_court(persistence: &mut Persistence, court_id: i64) -> Result<CourtData, ApiError> {
    persistence
        .get_court_by_id(court_id)
        .map_err(internal)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Court"),
            message: format!("Court {court_id} does not exist"),
        })
}

/// Loads a club or fails with 404.
fn require_club(persistence: &mut Persistence, club_id: i64) -> Result<ClubData, ApiError> {
    persistence
        .get_club_by_id(club_id)
        .map_err(internal)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Club"),
            message: format!("Club {club_id} does not exist"),
        })
}

/// Loads a coach or fails with 404.
fn require_coach(persistence: &mut Persistence, coach_id: i64) -> Result<CoachData, ApiError> {
    persistence
        .get_coach_by_id(coach_id)
        .map_err(internal)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Coach"),
            message: format!("Coach {coach_id} does not exist"),
        })
}

/// Loads a booking or fails with 404.
fn require_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<BookingData, ApiError> {
    persistence
        .get_booking_by_id(booking_id)
        .map_err(internal)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {booking_id} does not exist"),
        })
}

/// Returns the current wall-clock time in a club's timezone.
///
/// Stored booking times are club-local, so lifecycle guards that compare
/// against "now" must use the club's clock, not the server's.
fn club_local_now(timezone: &str) -> Result<NaiveDateTime, ApiError> {
    let tz: Tz = timezone.parse().map_err(|_| ApiError::Internal {
        message: format!("Stored club timezone '{timezone}' is invalid"),
    })?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

/// Derives the price of a slot from the court's hourly rate.
///
/// Widened to 128-bit for the multiply so pathological rates cannot wrap.
fn price_for_slot(hourly_rate_cents: i64, duration_minutes: i64) -> Result<i64, ApiError> {
    let wide: i128 = i128::from(hourly_rate_cents) * i128::from(duration_minutes) / 60;
    wide.to_i64().ok_or_else(|| ApiError::Internal {
        message: String::from("Booking price exceeds representable range"),
    })
}

// ============================================================================
// Authentication & accounts
// ============================================================================

/// Authenticates an account and creates a session.
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the account is
/// disabled.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _actor, account): (String, AuthenticatedActor, AccountData) =
        AuthenticationService::login(persistence, &request.email, &request.password)?;

    let expires_at: String = persistence
        .get_session_by_token(&session_token)
        .map_err(internal)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    Ok(LoginResponse {
        session_token,
        email: account.email,
        display_name: account.display_name,
        role: account.role,
        expires_at,
    })
}

/// Logs out by deleting the caller's session.
///
/// # Errors
///
/// Returns an error if the session cannot be removed.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Describes the authenticated account.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor, account: &AccountData) -> WhoAmIResponse {
    WhoAmIResponse {
        account_id: actor.account_id,
        email: account.email.clone(),
        display_name: account.display_name.clone(),
        role: account.role.clone(),
    }
}

/// Creates a new account (Admin only).
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, a field is invalid,
/// the password violates policy, or the email is already registered.
pub fn create_account(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateAccountRequest,
) -> Result<CreateAccountResponse, ApiError> {
    AuthorizationService::authorize_manage_accounts(actor)?;

    let email: String = validate_email(&request.email).map_err(translate_domain_error)?;
    validate_display_name(&request.display_name).map_err(translate_domain_error)?;
    let role: Role = Role::parse(&request.role).map_err(|_| ApiError::InvalidInput {
        field: String::from("role"),
        message: format!(
            "Invalid role: '{}'. Must be 'Admin', 'Staff', or 'Member'",
            request.role
        ),
    })?;

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &email,
        &request.display_name,
    )?;

    if persistence
        .get_account_by_email(&email)
        .map_err(internal)?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: format!("An account with email '{email}' already exists"),
        });
    }

    let account_id: i64 = persistence
        .create_account(&email, &request.display_name, &request.password, role.as_str())
        .map_err(internal)?;

    Ok(CreateAccountResponse {
        account_id,
        email: email.clone(),
        message: format!("Successfully created account '{email}'"),
    })
}

/// Lists all accounts (Admin only).
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the query fails.
pub fn list_accounts(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListAccountsResponse, ApiError> {
    AuthorizationService::authorize_manage_accounts(actor)?;

    let accounts: Vec<AccountInfo> = persistence
        .list_accounts()
        .map_err(internal)?
        .into_iter()
        .map(|a| AccountInfo {
            account_id: a.account_id,
            email: a.email,
            display_name: a.display_name,
            role: a.role,
            is_disabled: a.is_disabled,
        })
        .collect();

    Ok(ListAccountsResponse { accounts })
}

/// Disables an account (Admin only). The lockout is immediate: the
/// account's sessions are removed along the way.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the account does not
/// exist.
pub fn disable_account(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    account_id: i64,
) -> Result<ToggleAccountResponse, ApiError> {
    AuthorizationService::authorize_manage_accounts(actor)?;

    if persistence
        .get_account_by_id(account_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Account"),
            message: format!("Account {account_id} does not exist"),
        });
    }

    persistence.disable_account(account_id).map_err(internal)?;

    Ok(ToggleAccountResponse {
        account_id,
        is_disabled: true,
        message: format!("Account {account_id} disabled"),
    })
}

/// Re-enables a disabled account (Admin only).
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the account does not
/// exist.
pub fn enable_account(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    account_id: i64,
) -> Result<ToggleAccountResponse, ApiError> {
    AuthorizationService::authorize_manage_accounts(actor)?;

    if persistence
        .get_account_by_id(account_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Account"),
            message: format!("Account {account_id} does not exist"),
        });
    }

    persistence.enable_account(account_id).map_err(internal)?;

    Ok(ToggleAccountResponse {
        account_id,
        is_disabled: false,
        message: format!("Account {account_id} enabled"),
    })
}

/// Changes the caller's own password.
///
/// Validates the current password and enforces the password policy.
///
/// # Errors
///
/// Returns an error if the current password is wrong or the new password
/// violates policy.
pub fn change_password(
    persistence: &mut Persistence,
    account: &AccountData,
    request: &ChangePasswordRequest,
) -> Result<ChangePasswordResponse, ApiError> {
    let current_valid: bool = persistence
        .verify_password(&request.current_password, &account.password_hash)
        .map_err(internal)?;
    if !current_valid {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is incorrect"),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &account.email,
        &account.display_name,
    )?;

    persistence
        .update_password(account.account_id, &request.new_password)
        .map_err(internal)?;

    Ok(ChangePasswordResponse {
        message: String::from("Password changed successfully"),
    })
}

// ============================================================================
// Facility structure
// ============================================================================

/// Creates a new organization (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member, the name is invalid, or an
/// organization with the name already exists.
pub fn create_organization(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateOrganizationRequest,
) -> Result<CreateOrganizationResponse, ApiError> {
    AuthorizationService::authorize_manage_structure(actor)?;

    validate_club_name(&request.name).map_err(|_| {
        translate_domain_error(courtkeep_domain::DomainError::InvalidOrganizationName(
            String::from("Organization name must be non-empty and at most 80 characters"),
        ))
    })?;

    if persistence
        .get_organization_by_name(&request.name)
        .map_err(internal)?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: format!("Organization '{}' already exists", request.name),
        });
    }

    let organization_id: i64 = persistence
        .create_organization(&request.name)
        .map_err(internal)?;

    Ok(CreateOrganizationResponse {
        organization_id,
        name: request.name.clone(),
        message: format!("Successfully created organization '{}'", request.name),
    })
}

/// Lists all organizations.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_organizations(
    persistence: &mut Persistence,
) -> Result<ListOrganizationsResponse, ApiError> {
    let organizations: Vec<OrganizationInfo> = persistence
        .list_organizations()
        .map_err(internal)?
        .into_iter()
        .map(|o| OrganizationInfo {
            organization_id: o.organization_id,
            name: o.name,
        })
        .collect();

    Ok(ListOrganizationsResponse { organizations })
}

/// Creates a new club (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member, a field is invalid, the
/// organization does not exist, or the club name is taken within it.
pub fn create_club(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateClubRequest,
) -> Result<CreateClubResponse, ApiError> {
    AuthorizationService::authorize_manage_structure(actor)?;

    validate_club_name(&request.name).map_err(translate_domain_error)?;
    validate_timezone(&request.timezone).map_err(translate_domain_error)?;

    if persistence
        .get_organization_by_id(request.organization_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Organization"),
            message: format!("Organization {} does not exist", request.organization_id),
        });
    }

    if persistence
        .get_club_by_name(request.organization_id, &request.name)
        .map_err(internal)?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: format!(
                "Club '{}' already exists in organization {}",
                request.name, request.organization_id
            ),
        });
    }

    let club_id: i64 = persistence
        .create_club(request.organization_id, &request.name, &request.timezone)
        .map_err(internal)?;

    Ok(CreateClubResponse {
        club_id,
        organization_id: request.organization_id,
        name: request.name.clone(),
        message: format!("Successfully created club '{}'", request.name),
    })
}

/// Lists the clubs of an organization.
///
/// # Errors
///
/// Returns an error if the organization does not exist or the query
/// fails.
pub fn list_clubs(
    persistence: &mut Persistence,
    organization_id: i64,
) -> Result<ListClubsResponse, ApiError> {
    if persistence
        .get_organization_by_id(organization_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Organization"),
            message: format!("Organization {organization_id} does not exist"),
        });
    }

    let clubs: Vec<ClubInfo> = persistence
        .list_clubs(organization_id)
        .map_err(internal)?
        .into_iter()
        .map(|c| ClubInfo {
            club_id: c.club_id,
            organization_id: c.organization_id,
            name: c.name,
            timezone: c.timezone,
        })
        .collect();

    Ok(ListClubsResponse {
        organization_id,
        clubs,
    })
}

/// Creates a new court (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member, a field is invalid, the
/// club does not exist, or the court name is taken within it.
pub fn create_court(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateCourtRequest,
) -> Result<CreateCourtResponse, ApiError> {
    AuthorizationService::authorize_manage_structure(actor)?;

    validate_court_name(&request.name).map_err(translate_domain_error)?;
    if request.hourly_rate_cents < 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("hourly_rate_cents"),
            message: String::from("Hourly rate cannot be negative"),
        });
    }

    require_club(persistence, request.club_id)?;

    if persistence
        .get_court_by_name(request.club_id, &request.name)
        .map_err(internal)?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: format!(
                "Court '{}' already exists in club {}",
                request.name, request.club_id
            ),
        });
    }

    let court_id: i64 = persistence
        .create_court(
            request.club_id,
            &request.name,
            request.surface.as_deref(),
            request.hourly_rate_cents,
        )
        .map_err(internal)?;

    Ok(CreateCourtResponse {
        court_id,
        club_id: request.club_id,
        name: request.name.clone(),
        message: format!("Successfully created court '{}'", request.name),
    })
}

/// Lists the courts of a club.
///
/// # Errors
///
/// Returns an error if the club does not exist or the query fails.
pub fn list_courts(
    persistence: &mut Persistence,
    club_id: i64,
) -> Result<ListCourtsResponse, ApiError> {
    require_club(persistence, club_id)?;

    let courts: Vec<CourtInfo> = persistence
        .list_courts(club_id)
        .map_err(internal)?
        .into_iter()
        .map(|c| CourtInfo {
            court_id: c.court_id,
            club_id: c.club_id,
            name: c.name,
            surface: c.surface,
            hourly_rate_cents: c.hourly_rate_cents,
        })
        .collect();

    Ok(ListCourtsResponse { club_id, courts })
}

/// Creates a new coach (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member, the name is invalid, or
/// the club does not exist.
pub fn create_coach(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateCoachRequest,
) -> Result<CreateCoachResponse, ApiError> {
    AuthorizationService::authorize_manage_structure(actor)?;

    validate_coach_name(&request.name).map_err(translate_domain_error)?;
    require_club(persistence, request.club_id)?;

    let coach_id: i64 = persistence
        .create_coach(request.club_id, &request.name)
        .map_err(internal)?;

    Ok(CreateCoachResponse {
        coach_id,
        club_id: request.club_id,
        name: request.name.clone(),
        message: format!("Successfully created coach '{}'", request.name),
    })
}

/// Lists the coaches of a club.
///
/// # Errors
///
/// Returns an error if the club does not exist or the query fails.
pub fn list_coaches(
    persistence: &mut Persistence,
    club_id: i64,
) -> Result<ListCoachesResponse, ApiError> {
    require_club(persistence, club_id)?;

    let coaches: Vec<CoachInfo> = persistence
        .list_coaches(club_id)
        .map_err(internal)?
        .into_iter()
        .map(|c| CoachInfo {
            coach_id: c.coach_id,
            club_id: c.club_id,
            name: c.name,
        })
        .collect();

    Ok(ListCoachesResponse { club_id, coaches })
}

// ============================================================================
// Opening hours
// ============================================================================

/// Sets the business hours for one weekday of a club (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member, the club does not exist,
/// the weekday index is out of range, or the open/close pair is invalid.
pub fn set_business_hours(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &SetBusinessHoursRequest,
) -> Result<SetHoursResponse, ApiError> {
    AuthorizationService::authorize_manage_hours(actor)?;

    require_club(persistence, request.club_id)?;
    weekday_from_index(request.day_of_week).map_err(translate_domain_error)?;

    let open: NaiveTime = parse_time("open_time", &request.open_time)?;
    let close: NaiveTime = parse_time("close_time", &request.close_time)?;
    if !request.is_closed {
        DayHours::open(open, close).map_err(translate_domain_error)?;
    }

    persistence
        .upsert_business_hours(
            request.club_id,
            i32::from(request.day_of_week),
            &open.format(TIME_FORMAT).to_string(),
            &close.format(TIME_FORMAT).to_string(),
            request.is_closed,
        )
        .map_err(internal)?;

    Ok(SetHoursResponse {
        club_id: request.club_id,
        message: format!(
            "Business hours set for club {} weekday {}",
            request.club_id, request.day_of_week
        ),
    })
}

/// Lists the configured weekly hours of a club.
///
/// # Errors
///
/// Returns an error if the club does not exist or the query fails.
pub fn get_business_hours(
    persistence: &mut Persistence,
    club_id: i64,
) -> Result<GetBusinessHoursResponse, ApiError> {
    require_club(persistence, club_id)?;

    let hours: Vec<BusinessHoursInfo> = persistence
        .list_business_hours(club_id)
        .map_err(internal)?
        .into_iter()
        .map(|row| {
            row.day_of_week
                .to_u8()
                .ok_or_else(|| ApiError::Internal {
                    message: format!("Stored weekday index {} is invalid", row.day_of_week),
                })
                .map(|day_of_week| BusinessHoursInfo {
                    day_of_week,
                    open_time: row.open_time,
                    close_time: row.close_time,
                    is_closed: row.is_closed,
                })
        })
        .collect::<Result<_, _>>()?;

    Ok(GetBusinessHoursResponse { club_id, hours })
}

/// Sets the special hours for one date of a club (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member, the club does not exist,
/// the date is invalid, or the open/close pair is invalid.
pub fn set_special_hours(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &SetSpecialHoursRequest,
) -> Result<SetHoursResponse, ApiError> {
    AuthorizationService::authorize_manage_hours(actor)?;

    require_club(persistence, request.club_id)?;
    let date: NaiveDate = parse_date(&request.date)?;

    let open: NaiveTime = parse_time("open_time", &request.open_time)?;
    let close: NaiveTime = parse_time("close_time", &request.close_time)?;
    if !request.is_closed {
        DayHours::open(open, close).map_err(translate_domain_error)?;
    }

    persistence
        .upsert_special_hours(
            request.club_id,
            &date.format(DATE_FORMAT).to_string(),
            &open.format(TIME_FORMAT).to_string(),
            &close.format(TIME_FORMAT).to_string(),
            request.is_closed,
        )
        .map_err(internal)?;

    Ok(SetHoursResponse {
        club_id: request.club_id,
        message: format!(
            "Special hours set for club {} on {}",
            request.club_id, request.date
        ),
    })
}

/// Resolves the effective hours of a club on a date.
///
/// # Errors
///
/// Returns an error if the club does not exist or the date is invalid.
pub fn get_effective_hours(
    persistence: &mut Persistence,
    club_id: i64,
    date_str: &str,
) -> Result<EffectiveHoursResponse, ApiError> {
    require_club(persistence, club_id)?;
    let date: NaiveDate = parse_date(date_str)?;

    let effective: EffectiveHours = load_effective_hours(persistence, club_id, date)?;

    Ok(EffectiveHoursResponse {
        club_id,
        date: date.format(DATE_FORMAT).to_string(),
        is_closed: effective.hours.is_closed(),
        open_time: (!effective.hours.is_closed())
            .then(|| effective.hours.open_time().format(TIME_FORMAT).to_string()),
        close_time: (!effective.hours.is_closed())
            .then(|| effective.hours.close_time().format(TIME_FORMAT).to_string()),
        from_special_hours: effective.from_special_hours,
    })
}

// ============================================================================
// Coach time off
// ============================================================================

/// Creates a time-off entry for a coach (Admin or Staff).
///
/// Rejected when it overlaps the coach's existing entries or any booking
/// that still occupies its slot.
///
/// # Errors
///
/// Returns an error if the actor is a Member, the coach does not exist,
/// a field is invalid, or the entry conflicts (409).
pub fn create_time_off(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateTimeOffRequest,
) -> Result<CreateTimeOffResponse, ApiError> {
    AuthorizationService::authorize_manage_time_off(actor)?;

    require_coach(persistence, request.coach_id)?;
    validate_reason(&request.reason).map_err(translate_domain_error)?;
    let date: NaiveDate = parse_date(&request.date)?;

    let candidate: DaySlot = match (&request.start_time, &request.end_time) {
        (Some(start), Some(end)) => {
            let range: TimeRange = TimeRange::new(
                parse_time("start_time", start)?,
                parse_time("end_time", end)?,
            )
            .map_err(translate_domain_error)?;
            DaySlot::partial(date, range)
        }
        (None, None) => DaySlot::full_day(date),
        _ => {
            return Err(ApiError::InvalidInput {
                field: String::from("start_time"),
                message: String::from(
                    "Provide both start_time and end_time, or neither for a full day",
                ),
            });
        }
    };

    let date_str: String = date.format(DATE_FORMAT).to_string();

    // Existing entries for the same coach and date
    let existing: Vec<DaySlot> = persistence
        .list_time_off_for_coach_on_date(request.coach_id, &date_str)
        .map_err(internal)?
        .iter()
        .map(time_off_to_slot)
        .collect::<Result<_, _>>()?;
    validate_time_off_overlap(&candidate, &existing).map_err(translate_domain_error)?;

    // Bookings that still occupy a slot with this coach
    let booked: Vec<BookingSlot> = persistence
        .list_active_bookings_for_coach_on_date(request.coach_id, &date_str)
        .map_err(internal)?
        .iter()
        .map(|b| booking_to_domain(b).map(|booking| booking.slot))
        .collect::<Result<_, _>>()?;
    validate_time_off_against_bookings(&candidate, &booked).map_err(translate_domain_error)?;

    let time_off_id: i64 = persistence
        .create_time_off(
            request.coach_id,
            &date_str,
            request.start_time.as_deref(),
            request.end_time.as_deref(),
            &request.reason,
        )
        .map_err(internal)?;

    Ok(CreateTimeOffResponse {
        time_off_id,
        coach_id: request.coach_id,
        date: date_str,
        message: String::from("Time off recorded"),
    })
}

/// Lists a coach's time-off entries.
///
/// # Errors
///
/// Returns an error if the coach does not exist or the query fails.
pub fn list_time_off(
    persistence: &mut Persistence,
    coach_id: i64,
) -> Result<ListTimeOffResponse, ApiError> {
    require_coach(persistence, coach_id)?;

    let entries: Vec<TimeOffInfo> = persistence
        .list_time_off_for_coach(coach_id)
        .map_err(internal)?
        .into_iter()
        .map(|t| TimeOffInfo {
            time_off_id: t.time_off_id,
            coach_id: t.coach_id,
            date: t.date,
            start_time: t.start_time,
            end_time: t.end_time,
            reason: t.reason,
        })
        .collect();

    Ok(ListTimeOffResponse { coach_id, entries })
}

/// Deletes a time-off entry (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member or the entry does not
/// exist.
pub fn delete_time_off(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    time_off_id: i64,
) -> Result<DeleteTimeOffResponse, ApiError> {
    AuthorizationService::authorize_manage_time_off(actor)?;

    let deleted: usize = persistence.delete_time_off(time_off_id).map_err(internal)?;
    if deleted == 0 {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Time off"),
            message: format!("Time-off entry {time_off_id} does not exist"),
        });
    }

    Ok(DeleteTimeOffResponse {
        time_off_id,
        message: String::from("Time off removed"),
    })
}

// ============================================================================
// Bookings
// ============================================================================

/// Creates a booking.
///
/// The requested slot must fall on a single date, fit within the club's
/// effective hours, and be free of conflicts with other slot-occupying
/// bookings on the court and (when a coach is attached) with the coach's
/// bookings and time off. The booking starts Pending/Unpaid with a
/// payment-hold deadline of `hold_minutes` from now.
///
/// # Errors
///
/// Returns 400-class errors for invalid or out-of-hours slots, 404 for
/// unknown courts/coaches, and 409 for overlap conflicts.
#[allow(clippy::too_many_lines)]
pub fn create_booking(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateBookingRequest,
    hold_minutes: i64,
) -> Result<CreateBookingResponse, ApiError> {
    let start: NaiveDateTime = parse_datetime("start", &request.start)?;
    let end: NaiveDateTime = parse_datetime("end", &request.end)?;
    let slot: BookingSlot =
        BookingSlot::from_timestamps(start, end).map_err(translate_domain_error)?;

    let court: CourtData = require_court(persistence, request.court_id)?;

    // Opening hours for the club on that date
    let effective: EffectiveHours =
        load_effective_hours(persistence, court.club_id, slot.date())?;
    validate_within_hours(&slot.range(), &effective).map_err(translate_domain_error)?;

    let date_str: String = slot.date().format(DATE_FORMAT).to_string();

    // Court conflicts: any slot-occupying booking that overlaps
    let active: Vec<BookingData> = persistence
        .list_active_bookings_for_court_on_date(request.court_id, &date_str)
        .map_err(internal)?;
    for existing in &active {
        let existing_slot: BookingSlot = booking_to_domain(existing)?.slot;
        if slot.conflicts_with(&existing_slot) {
            return Err(translate_domain_error(
                courtkeep_domain::DomainError::BookingConflict {
                    existing_booking_id: existing.booking_id,
                },
            ));
        }
    }

    // Coach conflicts: the coach must work at this club and be free
    if let Some(coach_id) = request.coach_id {
        let coach: CoachData = require_coach(persistence, coach_id)?;
        if coach.club_id != court.club_id {
            return Err(ApiError::RuleViolation {
                rule: String::from("coach_at_club"),
                message: format!(
                    "Coach {} does not work at club {}",
                    coach_id, court.club_id
                ),
            });
        }

        let time_off: Vec<TimeOffData> = persistence
            .list_time_off_for_coach_on_date(coach_id, &date_str)
            .map_err(internal)?;
        for entry in &time_off {
            if time_off_to_slot(entry)?.conflicts_with(&slot.as_day_slot()) {
                return Err(translate_domain_error(
                    courtkeep_domain::DomainError::TimeOffConflict { date: slot.date() },
                ));
            }
        }

        let coach_bookings: Vec<BookingData> = persistence
            .list_active_bookings_for_coach_on_date(coach_id, &date_str)
            .map_err(internal)?;
        for existing in &coach_bookings {
            let existing_slot: BookingSlot = booking_to_domain(existing)?.slot;
            if slot.conflicts_with(&existing_slot) {
                return Err(translate_domain_error(
                    courtkeep_domain::DomainError::BookingConflict {
                        existing_booking_id: existing.booking_id,
                    },
                ));
            }
        }
    }

    let expires_at: String =
        format_rfc3339(OffsetDateTime::now_utc() + time::Duration::minutes(hold_minutes))?;

    let start_time: String = slot.range().start().format(TIME_FORMAT).to_string();
    let end_time: String = slot.range().end().format(TIME_FORMAT).to_string();

    let booking_id: i64 = persistence
        .insert_booking(&NewBooking {
            court_id: request.court_id,
            account_id: actor.account_id,
            coach_id: request.coach_id,
            date: date_str.clone(),
            start_time: start_time.clone(),
            end_time: end_time.clone(),
            reservation_expires_at: Some(expires_at.clone()),
        })
        .map_err(internal)?;

    let price_cents: i64 =
        price_for_slot(court.hourly_rate_cents, slot.range().duration_minutes())?;

    Ok(CreateBookingResponse {
        booking_id,
        court_id: request.court_id,
        date: date_str,
        start_time,
        end_time,
        booking_status: BookingStatus::Pending.as_str().to_string(),
        payment_status: PaymentStatus::Unpaid.as_str().to_string(),
        reservation_expires_at: expires_at,
        price_cents,
        message: String::from("Booking created; complete payment to confirm"),
    })
}

/// Retrieves a booking.
///
/// Members see only their own bookings.
///
/// # Errors
///
/// Returns 404 for unknown bookings and 403 when a Member targets
/// another member's booking.
pub fn get_booking(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    booking_id: i64,
) -> Result<BookingInfo, ApiError> {
    let data: BookingData = require_booking(persistence, booking_id)?;
    AuthorizationService::authorize_booking_access(actor, data.account_id)?;
    Ok(booking_to_info(data))
}

/// Lists the bookings of a court on a date.
///
/// # Errors
///
/// Returns an error if the court does not exist or a parameter is
/// invalid.
pub fn list_bookings(
    persistence: &mut Persistence,
    court_id: i64,
    date_str: &str,
) -> Result<ListBookingsResponse, ApiError> {
    require_court(persistence, court_id)?;
    let date: NaiveDate = parse_date(date_str)?;
    let date_str: String = date.format(DATE_FORMAT).to_string();

    let bookings: Vec<BookingInfo> = persistence
        .list_bookings_for_court_on_date(court_id, &date_str)
        .map_err(internal)?
        .into_iter()
        .map(booking_to_info)
        .collect();

    Ok(ListBookingsResponse {
        court_id,
        date: date_str,
        bookings,
    })
}

/// Lists the caller's own bookings.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_my_bookings(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<BookingInfo>, ApiError> {
    let bookings: Vec<BookingInfo> = persistence
        .list_bookings_for_account(actor.account_id)
        .map_err(internal)?
        .into_iter()
        .map(booking_to_info)
        .collect();
    Ok(bookings)
}

/// Cancels a booking.
///
/// The caller must own the booking or hold Staff/Admin authority. The
/// domain guard rejects paid, already-cancelled, and already-started
/// bookings; the comparison clock is the club's own timezone.
///
/// # Errors
///
/// Returns 404 for unknown bookings, 403 for foreign bookings, 409 when
/// already cancelled, and 400 for paid or already-started bookings.
pub fn cancel_booking(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    booking_id: i64,
) -> Result<CancelBookingResponse, ApiError> {
    let data: BookingData = require_booking(persistence, booking_id)?;
    AuthorizationService::authorize_booking_access(actor, data.account_id)?;

    let booking: Booking = booking_to_domain(&data)?;
    let court: CourtData = require_court(persistence, data.court_id)?;
    let club: ClubData = require_club(persistence, court.club_id)?;
    let now: NaiveDateTime = club_local_now(&club.timezone)?;

    validate_cancellation(&booking, now).map_err(translate_domain_error)?;

    // Front-desk cancellations by staff are attributed to the club
    let reason: CancelReason = if actor.account_id == data.account_id {
        CancelReason::UserCancelled
    } else {
        CancelReason::ClubCancelled
    };

    persistence
        .cancel_booking(booking_id, reason)
        .map_err(internal)?;

    Ok(CancelBookingResponse {
        booking_id,
        booking_status: BookingStatus::Cancelled.as_str().to_string(),
        cancel_reason: reason.as_str().to_string(),
        message: String::from("Booking cancelled"),
    })
}

/// Extends the payment hold on an unpaid booking.
///
/// # Errors
///
/// Returns 404 for unknown bookings, 403 for foreign bookings, 409 for
/// cancelled bookings, and 400 when payment was already captured.
pub fn resume_payment(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    booking_id: i64,
    hold_minutes: i64,
) -> Result<ResumePaymentResponse, ApiError> {
    let data: BookingData = require_booking(persistence, booking_id)?;
    AuthorizationService::authorize_booking_access(actor, data.account_id)?;

    let booking: Booking = booking_to_domain(&data)?;
    validate_payment_resume(&booking).map_err(translate_domain_error)?;

    let expires_at: String =
        format_rfc3339(OffsetDateTime::now_utc() + time::Duration::minutes(hold_minutes))?;
    persistence
        .extend_reservation(booking_id, &expires_at)
        .map_err(internal)?;

    Ok(ResumePaymentResponse {
        booking_id,
        reservation_expires_at: expires_at,
        message: String::from("Payment hold extended"),
    })
}

/// Confirms payment for a booking, moving it to Confirmed/Paid.
///
/// # Errors
///
/// Returns 404 for unknown bookings, 403 for foreign bookings, and 409
/// when the booking is cancelled or already paid.
pub fn confirm_payment(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    booking_id: i64,
) -> Result<ConfirmPaymentResponse, ApiError> {
    let data: BookingData = require_booking(persistence, booking_id)?;
    AuthorizationService::authorize_booking_access(actor, data.account_id)?;

    let booking: Booking = booking_to_domain(&data)?;
    validate_payment_confirmation(&booking).map_err(translate_domain_error)?;

    persistence.confirm_payment(booking_id).map_err(internal)?;

    Ok(ConfirmPaymentResponse {
        booking_id,
        booking_status: BookingStatus::Confirmed.as_str().to_string(),
        payment_status: PaymentStatus::Paid.as_str().to_string(),
        message: String::from("Payment confirmed"),
    })
}

/// Releases every unpaid booking whose payment hold has lapsed.
///
/// Shared by the authorized admin endpoint and the server's background
/// sweeper. Paid and cancelled bookings are never touched; the deadline
/// query excludes them up front.
///
/// # Errors
///
/// Returns an error if a stored deadline cannot be parsed or a write
/// fails.
pub fn release_expired_reservations(
    persistence: &mut Persistence,
    now: OffsetDateTime,
) -> Result<Vec<i64>, ApiError> {
    let candidates: Vec<BookingData> = persistence
        .list_bookings_with_reservation_deadline()
        .map_err(internal)?;

    let mut released: Vec<i64> = Vec::new();
    for candidate in candidates {
        let Some(deadline_str) = candidate.reservation_expires_at.as_deref() else {
            continue;
        };
        let deadline: OffsetDateTime = parse_rfc3339(deadline_str)?;
        if deadline <= now {
            persistence
                .cancel_booking(candidate.booking_id, CancelReason::ReservationExpired)
                .map_err(internal)?;
            tracing::info!(
                booking_id = candidate.booking_id,
                "Released expired reservation"
            );
            released.push(candidate.booking_id);
        }
    }

    Ok(released)
}

/// Authorized wrapper around the expiry sweep (Admin or Staff).
///
/// # Errors
///
/// Returns an error if the actor is a Member or the sweep fails.
pub fn release_expired(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ReleaseExpiredResponse, ApiError> {
    AuthorizationService::authorize_release_expired(actor)?;

    let released: Vec<i64> = release_expired_reservations(persistence, OffsetDateTime::now_utc())?;
    let count: usize = released.len();

    Ok(ReleaseExpiredResponse {
        released_booking_ids: released,
        message: format!("Released {count} expired reservations"),
    })
}
