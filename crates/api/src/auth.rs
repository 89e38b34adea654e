// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use time::{Duration, OffsetDateTime};

use courtkeep_persistence::{AccountData, Persistence, PersistenceError, SessionData};

use crate::error::AuthError;

/// Account roles for authorization.
///
/// Roles determine what actions an authenticated account may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full structural and corrective authority.
    ///
    /// Admins may manage organizations, clubs, courts, coaches, accounts,
    /// opening hours, and any booking.
    Admin,
    /// Staff role: club operators.
    ///
    /// Staff may manage the facility structure, opening hours, and coach
    /// time off, and may act on any booking (e.g., front-desk
    /// cancellations), but may not administer accounts.
    Staff,
    /// Member role: regular players.
    ///
    /// Members book courts for themselves and manage only their own
    /// bookings.
    Member,
}

impl Role {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
            Self::Member => "Member",
        }
    }

    /// Parses a role from its stored string representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known role.
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Staff" => Ok(Self::Staff),
            "Member" => Ok(Self::Member),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {s}"),
            }),
        }
    }

    /// Returns true if this role carries club-management authority.
    #[must_use]
    pub const fn is_staff_or_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

/// An authenticated account with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account's canonical identifier.
    pub account_id: i64,
    /// The account's normalized email.
    pub email: String,
    /// The role assigned to this account.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(account_id: i64, email: String, role: Role) -> Self {
        Self {
            account_id,
            email,
            role,
        }
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated actor has permission
/// to perform a specific action based on their role.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may administer accounts (create, disable,
    /// enable, reset passwords, import members).
    ///
    /// Only Admin actors have account authority.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_accounts(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Staff | Role::Member => Err(AuthError::Unauthorized {
                action: String::from("manage_accounts"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may manage the facility structure
    /// (organizations, clubs, courts, coaches).
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a Member.
    pub fn authorize_manage_structure(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        if actor.role.is_staff_or_admin() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("manage_structure"),
                required_role: String::from("Staff"),
            })
        }
    }

    /// Checks if an actor may manage opening hours.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a Member.
    pub fn authorize_manage_hours(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        if actor.role.is_staff_or_admin() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("manage_hours"),
                required_role: String::from("Staff"),
            })
        }
    }

    /// Checks if an actor may manage coach time off.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a Member.
    pub fn authorize_manage_time_off(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        if actor.role.is_staff_or_admin() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("manage_time_off"),
                required_role: String::from("Staff"),
            })
        }
    }

    /// Checks if an actor may act on a booking owned by `owner_account_id`.
    ///
    /// Members may act only on their own bookings; Staff and Admin may act
    /// on any booking.
    ///
    /// # Errors
    ///
    /// Returns an error if a Member targets another member's booking.
    pub fn authorize_booking_access(
        actor: &AuthenticatedActor,
        owner_account_id: i64,
    ) -> Result<(), AuthError> {
        if actor.role.is_staff_or_admin() || actor.account_id == owner_account_id {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("access_booking"),
                required_role: String::from("Staff"),
            })
        }
    }

    /// Checks if an actor may run the reservation-expiry sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is a Member.
    pub fn authorize_release_expired(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        if actor.role.is_staff_or_admin() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("release_expired"),
                required_role: String::from("Staff"),
            })
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates an account by email and password and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email (normalized before lookup)
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `account_data`).
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown, disabled, or the
    /// password does not match. The error does not distinguish unknown
    /// accounts from bad passwords.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, AccountData), AuthError> {
        let normalized: String = courtkeep_domain::normalize_email(email);

        let account: AccountData = persistence
            .get_account_by_email(&normalized)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            })?;

        let password_valid: bool = persistence
            .verify_password(password, &account.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_valid {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            });
        }

        if account.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let role: Role = Role::parse(&account.role)?;

        let session_token: String = Self::generate_session_token();

        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, account.account_id, &expires_at_str)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(account.account_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(account.account_id, account.email.clone(), role);

        Ok((session_token, authenticated_actor, account))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `account_data`).
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or the
    /// account has been disabled since login.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, AccountData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(session.account_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        if account.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let role: Role = Role::parse(&account.role)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(account.account_id, account.email.clone(), role);

        Ok((authenticated_actor, account))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates an opaque session token.
    ///
    /// Two independent 128-bit random draws; the token carries no
    /// structure a client could depend on.
    #[must_use]
    pub fn generate_session_token() -> String {
        let a: u128 = rand::random::<u128>();
        let b: u128 = rand::random::<u128>();
        format!("ck_{a:032x}{b:032x}")
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionExpired(msg) | PersistenceError::SessionNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}
