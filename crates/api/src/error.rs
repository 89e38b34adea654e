// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use courtkeep_domain::DomainError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain errors and represent the API contract.
/// The server layer maps each variant onto an HTTP status code:
/// `InvalidInput` and `RuleViolation` → 400, `AuthenticationFailed` → 401,
/// `Unauthorized` → 403, `ResourceNotFound` → 404, `Conflict` → 409,
/// `Internal` → 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A validation rule was violated.
    RuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The request conflicts with current state (overlapping interval,
    /// duplicate resource, already-cancelled booking).
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::RuleViolation { rule, message } => {
                write!(f, "Rule violation ({rule}): {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly. Interval conflicts and lifecycle dead ends become `Conflict`;
/// everything else is a validation failure.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTimeRange { .. } => ApiError::InvalidInput {
            field: String::from("start_time"),
            message: String::from("Start time must be before end time"),
        },
        DomainError::CrossMidnightNotSupported { .. } => ApiError::InvalidInput {
            field: String::from("end_time"),
            message: String::from("Bookings spanning midnight are not supported"),
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidDisplayName(msg) => ApiError::InvalidInput {
            field: String::from("display_name"),
            message: msg,
        },
        DomainError::InvalidClubName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidCourtName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidCoachName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidOrganizationName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidReason(msg) => ApiError::InvalidInput {
            field: String::from("reason"),
            message: msg,
        },
        DomainError::InvalidTimezone(tz) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: format!("'{tz}' is not a valid IANA timezone"),
        },
        DomainError::InvalidWeekday { value } => ApiError::InvalidInput {
            field: String::from("day_of_week"),
            message: format!("Invalid weekday index: {value}. Must be 0-6 (Monday=0)"),
        },
        DomainError::InvalidOpeningHours { open, close } => ApiError::InvalidInput {
            field: String::from("open_time"),
            message: format!("Open time must be before close time (got {open} .. {close})"),
        },
        DomainError::ClubClosed { date } => ApiError::RuleViolation {
            rule: String::from("within_opening_hours"),
            message: format!("The club is closed on {date}"),
        },
        DomainError::OutsideOpeningHours { open, close } => ApiError::RuleViolation {
            rule: String::from("within_opening_hours"),
            message: format!("Requested time falls outside opening hours ({open} .. {close})"),
        },
        DomainError::BookingConflict {
            existing_booking_id,
        } => ApiError::Conflict {
            message: format!("Requested time overlaps existing booking {existing_booking_id}"),
        },
        DomainError::TimeOffConflict { date } => ApiError::Conflict {
            message: format!("Requested time conflicts with coach availability on {date}"),
        },
        DomainError::AlreadyCancelled => ApiError::Conflict {
            message: String::from("Booking is already cancelled"),
        },
        DomainError::BookingAlreadyStarted => ApiError::RuleViolation {
            rule: String::from("cancel_before_start"),
            message: String::from("Bookings whose start time has passed cannot be cancelled"),
        },
        DomainError::PaidBookingRequiresRefund => ApiError::RuleViolation {
            rule: String::from("unpaid_cancellation"),
            message: String::from(
                "Paid bookings cannot be cancelled directly and must be refunded",
            ),
        },
        DomainError::InvalidStatusTransition { from, to } => ApiError::Conflict {
            message: format!("Booking status cannot change from {from} to {to}"),
        },
        DomainError::InvalidPaymentTransition { from, to } => ApiError::Conflict {
            message: format!("Payment status cannot change from {from} to {to}"),
        },
        DomainError::InvalidBookingStatus(s) => ApiError::Internal {
            message: format!("Stored booking status is invalid: {s}"),
        },
        DomainError::InvalidPaymentStatus(s) => ApiError::Internal {
            message: format!("Stored payment status is invalid: {s}"),
        },
        DomainError::InvalidCancelReason(s) => ApiError::Internal {
            message: format!("Stored cancel reason is invalid: {s}"),
        },
        DomainError::DateParseError { value, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse '{value}': {error}"),
        },
    }
}
