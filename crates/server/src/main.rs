// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};

use courtkeep_api::{
    ApiError, AuthenticatedActor,
    csv_import::{CsvImportResult, import_members_csv, preview_members_csv},
    handlers,
    request_response::{
        BookingInfo, CancelBookingResponse, ChangePasswordRequest, ChangePasswordResponse,
        ConfirmPaymentResponse, CreateAccountRequest, CreateAccountResponse, CreateBookingRequest,
        CreateBookingResponse, CreateClubRequest, CreateClubResponse, CreateCoachRequest,
        CreateCoachResponse, CreateCourtRequest, CreateCourtResponse, CreateOrganizationRequest,
        CreateOrganizationResponse, CreateTimeOffRequest, CreateTimeOffResponse,
        DeleteTimeOffResponse, EffectiveHoursResponse, GetBusinessHoursResponse,
        ListAccountsResponse, ListBookingsResponse, ListClubsResponse, ListCoachesResponse,
        ListCourtsResponse, ListOrganizationsResponse, ListTimeOffResponse, LoginRequest,
        LoginResponse, ReleaseExpiredResponse, ResumePaymentResponse, SetBusinessHoursRequest,
        SetHoursResponse, SetSpecialHoursRequest, ToggleAccountResponse, WhoAmIResponse,
    },
};
use courtkeep_persistence::{AccountData, Persistence};

mod live;
mod session;

use live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use session::{SESSION_COOKIE, SessionAccount, SessionToken};

/// courtkeep server - HTTP server for the courtkeep booking system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Minutes an unpaid booking holds its slot before the expiry sweep
    /// releases it
    #[arg(long, default_value_t = 15)]
    hold_minutes: i64,

    /// Seconds between reservation-expiry sweeps
    #[arg(long, default_value_t = 60)]
    sweep_interval_secs: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer behind an async lock; conflict checks and
    /// their follow-up writes run under one lock acquisition.
    persistence: Arc<Mutex<Persistence>>,
    /// Broadcaster for the live event stream.
    broadcaster: LiveEventBroadcaster,
    /// Payment-hold window for new and resumed bookings.
    hold_minutes: i64,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. }
            | ApiError::RuleViolation { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal API error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Server-local DTOs
// ============================================================================

/// Query parameters for listing clubs.
#[derive(Debug, Deserialize)]
struct ListClubsQuery {
    /// The organization.
    organization_id: i64,
}

/// Query parameters for listing courts or coaches.
#[derive(Debug, Deserialize)]
struct ClubQuery {
    /// The club.
    club_id: i64,
}

/// Query parameters for effective hours.
#[derive(Debug, Deserialize)]
struct EffectiveHoursQuery {
    /// The club.
    club_id: i64,
    /// The date ("YYYY-MM-DD").
    date: String,
}

/// Query parameters for listing time off.
#[derive(Debug, Deserialize)]
struct TimeOffQuery {
    /// The coach.
    coach_id: i64,
}

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
struct ListBookingsQuery {
    /// The court.
    court_id: i64,
    /// The date ("YYYY-MM-DD").
    date: String,
}

/// API request for the CSV member import endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImportMembersApiRequest {
    /// The raw CSV text, including a header row.
    csv_content: String,
    /// When true, validate only; no accounts are created.
    #[serde(default)]
    preview_only: bool,
}

/// Per-row outcome in the CSV import response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImportMembersRowResponse {
    /// The row number (1-based, excluding header).
    row_number: usize,
    /// The normalized email, when the row got that far.
    email: Option<String>,
    /// The created account ID on success.
    account_id: Option<i64>,
    /// Errors that prevented the row from importing.
    errors: Vec<String>,
}

/// API response for the CSV member import endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImportMembersApiResponse {
    /// Whether this was a preview-only run.
    preview_only: bool,
    /// Number of accounts created (always 0 in preview).
    imported_count: usize,
    /// Number of rows not imported.
    skipped_count: usize,
    /// Per-row outcomes.
    rows: Vec<ImportMembersRowResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for POST /login.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = handlers::login(&mut persistence, &req)?;
    drop(persistence);

    // Browser clients ride on the cookie; API clients reuse the token
    let cookie: String = format!(
        "{SESSION_COOKIE}={}; HttpOnly; Path=/; SameSite=Lax",
        response.session_token
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(response)).into_response())
}

/// Handler for POST /logout.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionToken(token): SessionToken,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /whoami.
async fn handle_whoami(
    SessionAccount(actor, account): SessionAccount,
) -> Json<WhoAmIResponse> {
    Json(handlers::whoami(&actor, &account))
}

/// Handler for POST /accounts.
async fn handle_create_account(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, HttpError> {
    info!(actor = %actor.email, email = %req.email, "Handling create_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateAccountResponse =
        handlers::create_account(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /accounts.
async fn handle_list_accounts(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
) -> Result<Json<ListAccountsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListAccountsResponse = handlers::list_accounts(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /accounts/{account_id}/disable.
async fn handle_disable_account(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(account_id): Path<i64>,
) -> Result<Json<ToggleAccountResponse>, HttpError> {
    info!(actor = %actor.email, account_id, "Handling disable_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ToggleAccountResponse =
        handlers::disable_account(&mut persistence, &actor, account_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /accounts/{account_id}/enable.
async fn handle_enable_account(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(account_id): Path<i64>,
) -> Result<Json<ToggleAccountResponse>, HttpError> {
    info!(actor = %actor.email, account_id, "Handling enable_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ToggleAccountResponse =
        handlers::enable_account(&mut persistence, &actor, account_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /accounts/password.
async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, account): SessionAccount,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, HttpError> {
    info!(email = %account.email, "Handling change_password request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ChangePasswordResponse =
        handlers::change_password(&mut persistence, &account, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /accounts/import.
///
/// Validates (and, unless `preview_only`, imports) a member CSV.
async fn handle_import_members(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<ImportMembersApiRequest>,
) -> Result<Json<ImportMembersApiResponse>, HttpError> {
    info!(
        actor = %actor.email,
        preview_only = req.preview_only,
        "Handling import_members request"
    );

    if req.preview_only {
        let preview = preview_members_csv(&actor, &req.csv_content)?;
        let rows: Vec<ImportMembersRowResponse> = preview
            .rows
            .into_iter()
            .map(|r| ImportMembersRowResponse {
                row_number: r.row_number,
                email: r.email,
                account_id: None,
                errors: r.errors,
            })
            .collect();
        return Ok(Json(ImportMembersApiResponse {
            preview_only: true,
            imported_count: 0,
            skipped_count: preview.invalid_count,
            rows,
        }));
    }

    let mut persistence = app_state.persistence.lock().await;
    let result: CsvImportResult = import_members_csv(&mut persistence, &actor, &req.csv_content)?;
    drop(persistence);

    let rows: Vec<ImportMembersRowResponse> = result
        .rows
        .into_iter()
        .map(|r| ImportMembersRowResponse {
            row_number: r.row_number,
            email: r.email,
            account_id: r.account_id,
            errors: r.errors,
        })
        .collect();

    Ok(Json(ImportMembersApiResponse {
        preview_only: false,
        imported_count: result.imported_count,
        skipped_count: result.skipped_count,
        rows,
    }))
}

/// Handler for POST /organizations.
async fn handle_create_organization(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<Json<CreateOrganizationResponse>, HttpError> {
    info!(actor = %actor.email, name = %req.name, "Handling create_organization request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateOrganizationResponse =
        handlers::create_organization(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /organizations.
async fn handle_list_organizations(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
) -> Result<Json<ListOrganizationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListOrganizationsResponse = handlers::list_organizations(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /clubs.
async fn handle_create_club(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CreateClubRequest>,
) -> Result<Json<CreateClubResponse>, HttpError> {
    info!(actor = %actor.email, name = %req.name, "Handling create_club request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateClubResponse = handlers::create_club(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /clubs.
async fn handle_list_clubs(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
    Query(query): Query<ListClubsQuery>,
) -> Result<Json<ListClubsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListClubsResponse =
        handlers::list_clubs(&mut persistence, query.organization_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /courts.
async fn handle_create_court(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CreateCourtRequest>,
) -> Result<Json<CreateCourtResponse>, HttpError> {
    info!(actor = %actor.email, name = %req.name, "Handling create_court request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateCourtResponse = handlers::create_court(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /courts.
async fn handle_list_courts(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
    Query(query): Query<ClubQuery>,
) -> Result<Json<ListCourtsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListCourtsResponse = handlers::list_courts(&mut persistence, query.club_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /coaches.
async fn handle_create_coach(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CreateCoachRequest>,
) -> Result<Json<CreateCoachResponse>, HttpError> {
    info!(actor = %actor.email, name = %req.name, "Handling create_coach request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateCoachResponse = handlers::create_coach(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /coaches.
async fn handle_list_coaches(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
    Query(query): Query<ClubQuery>,
) -> Result<Json<ListCoachesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListCoachesResponse = handlers::list_coaches(&mut persistence, query.club_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /business_hours.
async fn handle_set_business_hours(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<SetBusinessHoursRequest>,
) -> Result<Json<SetHoursResponse>, HttpError> {
    info!(
        actor = %actor.email,
        club_id = req.club_id,
        day_of_week = req.day_of_week,
        "Handling set_business_hours request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SetHoursResponse =
        handlers::set_business_hours(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /business_hours.
async fn handle_get_business_hours(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
    Query(query): Query<ClubQuery>,
) -> Result<Json<GetBusinessHoursResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GetBusinessHoursResponse =
        handlers::get_business_hours(&mut persistence, query.club_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /special_hours.
async fn handle_set_special_hours(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<SetSpecialHoursRequest>,
) -> Result<Json<SetHoursResponse>, HttpError> {
    info!(
        actor = %actor.email,
        club_id = req.club_id,
        date = %req.date,
        "Handling set_special_hours request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SetHoursResponse =
        handlers::set_special_hours(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /hours/effective.
async fn handle_get_effective_hours(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
    Query(query): Query<EffectiveHoursQuery>,
) -> Result<Json<EffectiveHoursResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: EffectiveHoursResponse =
        handlers::get_effective_hours(&mut persistence, query.club_id, &query.date)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /time_off.
async fn handle_create_time_off(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CreateTimeOffRequest>,
) -> Result<Json<CreateTimeOffResponse>, HttpError> {
    info!(
        actor = %actor.email,
        coach_id = req.coach_id,
        date = %req.date,
        "Handling create_time_off request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateTimeOffResponse =
        handlers::create_time_off(&mut persistence, &actor, &req)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::TimeOffCreated {
        coach_id: response.coach_id,
        date: response.date.clone(),
    });

    Ok(Json(response))
}

/// Handler for GET /time_off.
async fn handle_list_time_off(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
    Query(query): Query<TimeOffQuery>,
) -> Result<Json<ListTimeOffResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListTimeOffResponse =
        handlers::list_time_off(&mut persistence, query.coach_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE /time_off/{time_off_id}.
async fn handle_delete_time_off(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(time_off_id): Path<i64>,
) -> Result<Json<DeleteTimeOffResponse>, HttpError> {
    info!(actor = %actor.email, time_off_id, "Handling delete_time_off request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteTimeOffResponse =
        handlers::delete_time_off(&mut persistence, &actor, time_off_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /bookings.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, HttpError> {
    info!(
        actor = %actor.email,
        court_id = req.court_id,
        start = %req.start,
        end = %req.end,
        "Handling create_booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateBookingResponse =
        handlers::create_booking(&mut persistence, &actor, &req, app_state.hold_minutes)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::BookingCreated {
        booking_id: response.booking_id,
        court_id: response.court_id,
        date: response.date.clone(),
    });

    info!(
        booking_id = response.booking_id,
        "Successfully created booking"
    );

    Ok(Json(response))
}

/// Handler for GET /bookings.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(_actor, _account): SessionAccount,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListBookingsResponse =
        handlers::list_bookings(&mut persistence, query.court_id, &query.date)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /bookings/my.
async fn handle_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
) -> Result<Json<Vec<BookingInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<BookingInfo> = handlers::list_my_bookings(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET /bookings/{booking_id}.
async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BookingInfo = handlers::get_booking(&mut persistence, &actor, booking_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /bookings/{booking_id}/cancel.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(booking_id): Path<i64>,
) -> Result<Json<CancelBookingResponse>, HttpError> {
    info!(actor = %actor.email, booking_id, "Handling cancel_booking request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CancelBookingResponse =
        handlers::cancel_booking(&mut persistence, &actor, booking_id)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::BookingCancelled {
            booking_id: response.booking_id,
            reason: response.cancel_reason.clone(),
        });

    Ok(Json(response))
}

/// Handler for POST /bookings/{booking_id}/resume_payment.
async fn handle_resume_payment(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(booking_id): Path<i64>,
) -> Result<Json<ResumePaymentResponse>, HttpError> {
    info!(actor = %actor.email, booking_id, "Handling resume_payment request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ResumePaymentResponse = handlers::resume_payment(
        &mut persistence,
        &actor,
        booking_id,
        app_state.hold_minutes,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST /bookings/{booking_id}/confirm_payment.
async fn handle_confirm_payment(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
    Path(booking_id): Path<i64>,
) -> Result<Json<ConfirmPaymentResponse>, HttpError> {
    info!(actor = %actor.email, booking_id, "Handling confirm_payment request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ConfirmPaymentResponse =
        handlers::confirm_payment(&mut persistence, &actor, booking_id)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::PaymentConfirmed {
            booking_id: response.booking_id,
        });

    Ok(Json(response))
}

/// Handler for POST /bookings/release_expired.
async fn handle_release_expired(
    AxumState(app_state): AxumState<AppState>,
    SessionAccount(actor, _account): SessionAccount,
) -> Result<Json<ReleaseExpiredResponse>, HttpError> {
    info!(actor = %actor.email, "Handling release_expired request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ReleaseExpiredResponse =
        handlers::release_expired(&mut persistence, &actor)?;
    drop(persistence);

    if !response.released_booking_ids.is_empty() {
        app_state
            .broadcaster
            .broadcast(&LiveEvent::ReservationsReleased {
                booking_ids: response.released_booking_ids.clone(),
            });
    }

    Ok(Json(response))
}

/// Background task that periodically releases lapsed unpaid reservations.
///
/// Runs for the lifetime of the server; failures are logged and the next
/// tick retries.
async fn run_expiry_sweeper(app_state: AppState, interval_secs: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
    loop {
        interval.tick().await;

        let mut persistence = app_state.persistence.lock().await;
        let result =
            handlers::release_expired_reservations(&mut persistence, OffsetDateTime::now_utc());
        drop(persistence);

        match result {
            Ok(released) if !released.is_empty() => {
                info!(count = released.len(), "Expiry sweep released reservations");
                app_state
                    .broadcaster
                    .broadcast(&LiveEvent::ReservationsReleased {
                        booking_ids: released,
                    });
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Expiry sweep failed");
            }
        }
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/whoami", get(handle_whoami))
        .route("/accounts", post(handle_create_account))
        .route("/accounts", get(handle_list_accounts))
        .route("/accounts/password", post(handle_change_password))
        .route("/accounts/import", post(handle_import_members))
        .route("/accounts/{account_id}/disable", post(handle_disable_account))
        .route("/accounts/{account_id}/enable", post(handle_enable_account))
        .route("/organizations", post(handle_create_organization))
        .route("/organizations", get(handle_list_organizations))
        .route("/clubs", post(handle_create_club))
        .route("/clubs", get(handle_list_clubs))
        .route("/courts", post(handle_create_court))
        .route("/courts", get(handle_list_courts))
        .route("/coaches", post(handle_create_coach))
        .route("/coaches", get(handle_list_coaches))
        .route("/business_hours", post(handle_set_business_hours))
        .route("/business_hours", get(handle_get_business_hours))
        .route("/special_hours", post(handle_set_special_hours))
        .route("/hours/effective", get(handle_get_effective_hours))
        .route("/time_off", post(handle_create_time_off))
        .route("/time_off", get(handle_list_time_off))
        .route("/time_off/{time_off_id}", delete(handle_delete_time_off))
        .route("/bookings", post(handle_create_booking))
        .route("/bookings", get(handle_list_bookings))
        .route("/bookings/my", get(handle_my_bookings))
        .route("/bookings/release_expired", post(handle_release_expired))
        .route("/bookings/{booking_id}", get(handle_get_booking))
        .route("/bookings/{booking_id}/cancel", post(handle_cancel_booking))
        .route(
            "/bookings/{booking_id}/resume_payment",
            post(handle_resume_payment),
        )
        .route(
            "/bookings/{booking_id}/confirm_payment",
            post(handle_confirm_payment),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing courtkeep server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        broadcaster: LiveEventBroadcaster::new(),
        hold_minutes: args.hold_minutes,
    };

    // Background reservation-expiry sweeper
    tokio::spawn(run_expiry_sweeper(
        app_state.clone(),
        args.sweep_interval_secs,
    ));

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence and a
    /// seeded admin, staff, and member account plus one bookable court.
    ///
    /// Returns the state along with `(club_id, court_id, coach_id)`.
    fn create_test_app_state() -> (AppState, i64, i64, i64) {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");

        persistence
            .create_account("admin@example.com", "Admin", "Adm1n-Passw0rd!", "Admin")
            .unwrap();
        persistence
            .create_account("member@example.com", "Member", "M3mber-Passw0rd!", "Member")
            .unwrap();

        let organization_id: i64 = persistence.create_organization("Riverside Sports").unwrap();
        let club_id: i64 = persistence
            .create_club(organization_id, "Riverside Tennis", "Europe/Madrid")
            .unwrap();
        let court_id: i64 = persistence
            .create_court(club_id, "Court 1", Some("clay"), 2400)
            .unwrap();
        let coach_id: i64 = persistence.create_coach(club_id, "Coach Sam").unwrap();
        for day_of_week in 0..7 {
            persistence
                .upsert_business_hours(club_id, day_of_week, "06:00:00", "23:00:00", false)
                .unwrap();
        }

        let app_state: AppState = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            broadcaster: LiveEventBroadcaster::new(),
            hold_minutes: 15,
        };
        (app_state, club_id, court_id, coach_id)
    }

    /// Logs in via the HTTP surface and returns the session token.
    async fn login(app: &Router, email: &str, password: &str) -> String {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login should set a session cookie")
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with(SESSION_COOKIE));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let login: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        login.session_token
    }

    /// Sends an authenticated JSON request and returns the response.
    async fn send(
        app: &Router,
        token: &str,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> axum::response::Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .header("content-type", "application/json");
        let request = match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    fn booking_body(court_id: i64, start: &str, end: &str) -> serde_json::Value {
        serde_json::json!({
            "court_id": court_id,
            "coach_id": null,
            "start": start,
            "end": end,
        })
    }

    #[tokio::test]
    async fn test_unauthenticated_request_is_rejected() {
        let (app_state, _club, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_and_whoami_via_cookie() {
        let (app_state, _club, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;

        // Cookie-based access, no bearer header
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/whoami")
                    .header("Cookie", format!("{SESSION_COOKIE}={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let whoami: WhoAmIResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(whoami.email, "member@example.com");
        assert_eq!(whoami.role, "Member");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let (app_state, _club, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let body = serde_json::json!({
            "email": "member@example.com",
            "password": "wrong-password",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_booking_conflict_maps_to_409() {
        let (app_state, _club, court_id, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;

        let first = send(
            &app,
            &token,
            "POST",
            "/bookings",
            Some(booking_body(
                court_id,
                "2099-06-05T10:00:00",
                "2099-06-05T11:00:00",
            )),
        )
        .await;
        assert_eq!(first.status(), HttpStatusCode::OK);

        let overlapping = send(
            &app,
            &token,
            "POST",
            "/bookings",
            Some(booking_body(
                court_id,
                "2099-06-05T10:30:00",
                "2099-06-05T11:30:00",
            )),
        )
        .await;
        assert_eq!(overlapping.status(), HttpStatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(overlapping.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(error.error);
        assert!(error.message.contains("overlaps"));
    }

    #[tokio::test]
    async fn test_invalid_interval_maps_to_400() {
        let (app_state, _club, court_id, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;

        let response = send(
            &app,
            &token,
            "POST",
            "/bookings",
            Some(booking_body(
                court_id,
                "2099-06-05T11:00:00",
                "2099-06-05T10:00:00",
            )),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(error.message.contains("Start time must be before end time"));
    }

    #[tokio::test]
    async fn test_cancel_paid_booking_maps_to_400() {
        let (app_state, _club, court_id, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;

        let created = send(
            &app,
            &token,
            "POST",
            "/bookings",
            Some(booking_body(
                court_id,
                "2099-06-05T10:00:00",
                "2099-06-05T11:00:00",
            )),
        )
        .await;
        let bytes = axum::body::to_bytes(created.into_body(), usize::MAX)
            .await
            .unwrap();
        let booking: CreateBookingResponse = serde_json::from_slice(&bytes).unwrap();

        let confirm = send(
            &app,
            &token,
            "POST",
            &format!("/bookings/{}/confirm_payment", booking.booking_id),
            None,
        )
        .await;
        assert_eq!(confirm.status(), HttpStatusCode::OK);

        let cancel = send(
            &app,
            &token,
            "POST",
            &format!("/bookings/{}/cancel", booking.booking_id),
            None,
        )
        .await;
        assert_eq!(cancel.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_member_creating_account_maps_to_403() {
        let (app_state, _club, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;

        let response = send(
            &app,
            &token,
            "POST",
            "/accounts",
            Some(serde_json::json!({
                "email": "new@example.com",
                "display_name": "New",
                "password": "N3w-Passw0rd!!",
                "password_confirmation": "N3w-Passw0rd!!",
                "role": "Member",
            })),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_booking_maps_to_404() {
        let (app_state, _club, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;

        let response = send(&app, &token, "GET", "/bookings/424242", None).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_release_expired_endpoint() {
        let (app_state, _club, court_id, _coach) = create_test_app_state();
        // Holds lapse immediately in this app instance
        let app_state = AppState {
            hold_minutes: 0,
            ..app_state
        };
        let app: Router = build_router(app_state);

        let member_token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;
        let admin_token: String = login(&app, "admin@example.com", "Adm1n-Passw0rd!").await;

        let created = send(
            &app,
            &member_token,
            "POST",
            "/bookings",
            Some(booking_body(
                court_id,
                "2099-06-05T10:00:00",
                "2099-06-05T11:00:00",
            )),
        )
        .await;
        assert_eq!(created.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(created.into_body(), usize::MAX)
            .await
            .unwrap();
        let booking: CreateBookingResponse = serde_json::from_slice(&bytes).unwrap();

        // Members may not run the sweep
        let forbidden = send(
            &app,
            &member_token,
            "POST",
            "/bookings/release_expired",
            None,
        )
        .await;
        assert_eq!(forbidden.status(), HttpStatusCode::FORBIDDEN);

        let response = send(
            &app,
            &admin_token,
            "POST",
            "/bookings/release_expired",
            None,
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let released: ReleaseExpiredResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(released.released_booking_ids, vec![booking.booking_id]);

        // The released booking is visible as cancelled
        let detail = send(
            &app,
            &member_token,
            "GET",
            &format!("/bookings/{}", booking.booking_id),
            None,
        )
        .await;
        let bytes = axum::body::to_bytes(detail.into_body(), usize::MAX)
            .await
            .unwrap();
        let info: BookingInfo = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(info.booking_status, "Cancelled");
        assert_eq!(info.cancel_reason.as_deref(), Some("ReservationExpired"));
    }

    #[tokio::test]
    async fn test_effective_hours_endpoint_reflects_special_closure() {
        let (app_state, club_id, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let admin_token: String = login(&app, "admin@example.com", "Adm1n-Passw0rd!").await;

        let set = send(
            &app,
            &admin_token,
            "POST",
            "/special_hours",
            Some(serde_json::json!({
                "club_id": club_id,
                "date": "2099-12-25",
                "open_time": "00:00:00",
                "close_time": "00:00:01",
                "is_closed": true,
            })),
        )
        .await;
        assert_eq!(set.status(), HttpStatusCode::OK);

        let response = send(
            &app,
            &admin_token,
            "GET",
            &format!("/hours/effective?club_id={club_id}&date=2099-12-25"),
            None,
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let hours: EffectiveHoursResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(hours.is_closed);
        assert!(hours.from_special_hours);

        // A regular day resolves from the weekly schedule
        let response = send(
            &app,
            &admin_token,
            "GET",
            &format!("/hours/effective?club_id={club_id}&date=2099-12-26"),
            None,
        )
        .await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let hours: EffectiveHoursResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!hours.is_closed);
        assert_eq!(hours.open_time.as_deref(), Some("06:00:00"));
    }

    #[tokio::test]
    async fn test_logout_invalidates_cookie_session() {
        let (app_state, _club, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let token: String = login(&app, "member@example.com", "M3mber-Passw0rd!").await;

        let logout = send(&app, &token, "POST", "/logout", None).await;
        assert_eq!(logout.status(), HttpStatusCode::NO_CONTENT);

        let whoami = send(&app, &token, "GET", "/whoami", None).await;
        assert_eq!(whoami.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_member_csv_import_via_admin() {
        let (app_state, _club, _court, _coach) = create_test_app_state();
        let app: Router = build_router(app_state);

        let admin_token: String = login(&app, "admin@example.com", "Adm1n-Passw0rd!").await;

        let csv = "email,display_name,initial_password\nanna@example.com,Anna,Welcome-2026!\n";
        let response = send(
            &app,
            &admin_token,
            "POST",
            "/accounts/import",
            Some(serde_json::json!({ "csv_content": csv })),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: ImportMembersApiResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(result.imported_count, 1);

        // The imported member can log in
        let anna_token: String = login(&app, "anna@example.com", "Welcome-2026!").await;
        assert!(!anna_token.is_empty());
    }
}
