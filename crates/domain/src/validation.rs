// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation and normalization rules.

use crate::error::DomainError;
use chrono_tz::Tz;

/// Maximum length of an account display name.
const MAX_DISPLAY_NAME_LEN: usize = 120;

/// Maximum length of club, court, and coach names.
const MAX_ENTITY_NAME_LEN: usize = 80;

/// Maximum length of free-text reasons.
const MAX_REASON_LEN: usize = 200;

/// Normalizes an email address for storage and lookup.
///
/// Leading and trailing whitespace is trimmed and the address is
/// lowercased. The function is idempotent: normalizing an already
/// normalized address returns it unchanged.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates and normalizes an email address.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is empty after
/// trimming or does not contain an '@' with text on both sides.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let normalized: String = normalize_email(email);
    if normalized.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }
    let Some((local, domain)) = normalized.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' is missing an '@'"
        )));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(DomainError::InvalidEmail(format!(
            "'{normalized}' is missing a local part or domain"
        )));
    }
    Ok(normalized)
}

/// Validates an account display name.
///
/// # Errors
///
/// Returns `DomainError::InvalidDisplayName` if the name is empty or too
/// long.
pub fn validate_display_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidDisplayName(String::from(
            "Display name cannot be empty",
        )));
    }
    if name.len() > MAX_DISPLAY_NAME_LEN {
        return Err(DomainError::InvalidDisplayName(format!(
            "Display name cannot exceed {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates a club name.
///
/// # Errors
///
/// Returns `DomainError::InvalidClubName` if the name is empty or too long.
pub fn validate_club_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidClubName(String::from(
            "Club name cannot be empty",
        )));
    }
    if name.len() > MAX_ENTITY_NAME_LEN {
        return Err(DomainError::InvalidClubName(format!(
            "Club name cannot exceed {MAX_ENTITY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates a court name.
///
/// # Errors
///
/// Returns `DomainError::InvalidCourtName` if the name is empty or too long.
pub fn validate_court_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidCourtName(String::from(
            "Court name cannot be empty",
        )));
    }
    if name.len() > MAX_ENTITY_NAME_LEN {
        return Err(DomainError::InvalidCourtName(format!(
            "Court name cannot exceed {MAX_ENTITY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates a coach name.
///
/// # Errors
///
/// Returns `DomainError::InvalidCoachName` if the name is empty or too long.
pub fn validate_coach_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidCoachName(String::from(
            "Coach name cannot be empty",
        )));
    }
    if name.len() > MAX_ENTITY_NAME_LEN {
        return Err(DomainError::InvalidCoachName(format!(
            "Coach name cannot exceed {MAX_ENTITY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates a free-text reason.
///
/// Empty reasons are allowed; overly long ones are not.
///
/// # Errors
///
/// Returns `DomainError::InvalidReason` if the reason is too long.
pub fn validate_reason(reason: &str) -> Result<(), DomainError> {
    if reason.len() > MAX_REASON_LEN {
        return Err(DomainError::InvalidReason(format!(
            "Reason cannot exceed {MAX_REASON_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates an IANA timezone label.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the label is not a known
/// timezone.
pub fn validate_timezone(timezone: &str) -> Result<(), DomainError> {
    timezone
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}
