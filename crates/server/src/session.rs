// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication middleware for the server.
//!
//! This module provides Axum extractors for validating session tokens
//! and enforcing authentication at the server boundary.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use courtkeep_api::{AuthenticatedActor, AuthenticationService};
use courtkeep_persistence::AccountData;

use crate::AppState;

/// Name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "courtkeep_session";

/// Extractor for authenticated accounts.
///
/// This extractor pulls the session token from either the
/// `courtkeep_session` cookie (browser clients) or an
/// `Authorization: Bearer <token>` header (API clients), validates it,
/// and returns the authenticated account context.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionAccount(actor, account): SessionAccount,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     // account: AccountData
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Authentication Flow
///
/// 1. Extract the token (cookie first, then bearer header)
/// 2. Validate the session via `AuthenticationService::validate_session`
/// 3. Check session expiration and account disabled status
/// 4. Return `AuthenticatedActor` and `AccountData`
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if no token is present, the token is
/// invalid, the session is expired, or the account is disabled.
pub struct SessionAccount(pub AuthenticatedActor, pub AccountData);

/// Extracts the raw session token from request parts.
///
/// The cookie takes precedence; the bearer header is the API fallback.
pub fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts.headers.get("Cookie")
        && let Ok(cookies) = cookie_header.to_str()
    {
        for cookie in cookies.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=')
                && name == SESSION_COOKIE
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
        }
    }

    parts
        .headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl FromRequestParts<AppState> for SessionAccount {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = extract_token(parts).ok_or_else(|| {
            debug!("No session cookie or bearer token present");
            SessionError::MissingCredentials
        })?;

        let mut persistence = state.persistence.lock().await;
        let (actor, account) = AuthenticationService::validate_session(&mut persistence, &token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;

        debug!(
            email = %account.email,
            role = ?actor.role,
            "Session validated successfully"
        );

        Ok(Self(actor, account))
    }
}

/// Extractor for the raw session token (used by logout).
pub struct SessionToken(pub String);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_token(parts)
            .map(Self)
            .ok_or(SessionError::MissingCredentials)
    }
}

/// Session extraction errors.
///
/// These errors are returned when session validation fails and are
/// automatically converted to HTTP responses.
#[derive(Debug)]
pub enum SessionError {
    /// No session cookie or bearer token was presented.
    MissingCredentials,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "Missing session cookie or 'Authorization: Bearer <token>' header",
            )
                .into_response(),
            Self::InvalidSession(reason) => (
                StatusCode::UNAUTHORIZED,
                format!("Session validation failed: {reason}"),
            )
                .into_response(),
        }
    }
}
