// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.
//!
//! This module contains backend-agnostic mutations for persisting accounts
//! and sessions. Most mutations use Diesel DSL, with minimal backend-specific
//! helpers abstracted via the `PersistenceBackend` trait.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{accounts, sessions};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new account.
///
/// The caller must normalize the email before calling. The password is
/// hashed with bcrypt here so plain-text passwords never reach a column.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The normalized email address
/// * `display_name` - The display name
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role (Admin, Staff, or Member)
///
/// # Errors
///
/// Returns an error if the account cannot be created or if the email
/// already exists.
pub fn create_account(
    conn: &mut _,
    email: &str,
    display_name: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating account with email: {}, display_name: {}, role: {}",
        email, display_name, role
    );

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(accounts::table)
        .values((
            accounts::email.eq(email),
            accounts::display_name.eq(display_name),
            accounts::password_hash.eq(&password_hash),
            accounts::role.eq(role),
        ))
        .execute(conn)?;

    let account_id: i64 = conn.last_insert_id()?;

    info!(account_id, "Account created successfully");

    Ok(account_id)
}
}

backend_fn! {
/// Updates the last login timestamp for an account.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut _, account_id: i64) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for account ID: {}", account_id);

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Disables an account.
///
/// Sets `is_disabled` and records the `disabled_at` timestamp. Existing
/// sessions for the account are removed so the lockout is immediate.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn disable_account(conn: &mut _, account_id: i64) -> Result<(), PersistenceError> {
    info!("Disabling account ID: {}", account_id);

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set((
            accounts::is_disabled.eq(1),
            accounts::disabled_at.eq(diesel::dsl::sql::<
                diesel::sql_types::Nullable<diesel::sql_types::Text>,
            >("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    diesel::delete(sessions::table)
        .filter(sessions::account_id.eq(account_id))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Re-enables a disabled account.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn enable_account(conn: &mut _, account_id: i64) -> Result<(), PersistenceError> {
    info!("Enabling account ID: {}", account_id);

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set((
            accounts::is_disabled.eq(0),
            accounts::disabled_at.eq(None::<String>),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Replaces an account's password hash.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account ID
/// * `password` - The new plain-text password (will be hashed)
///
/// # Errors
///
/// Returns an error if hashing or the database update fails.
pub fn update_password(
    conn: &mut _,
    account_id: i64,
    password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for account ID: {}", account_id);

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::update(accounts::table)
        .filter(accounts::account_id.eq(account_id))
        .set(accounts::password_hash.eq(&password_hash))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Creates a session for an account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque session token
/// * `account_id` - The account the session belongs to
/// * `expires_at` - ISO 8601 expiry timestamp
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    account_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!("Creating session for account ID: {}", account_id);

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::account_id.eq(account_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.last_insert_id()?;

    Ok(session_id)
}
}

backend_fn! {
/// Touches a session's last-activity timestamp.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
            "CURRENT_TIMESTAMP",
        )))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes a session by token (logout).
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes all sessions whose expiry timestamp precedes `now`.
///
/// Expiry timestamps are stored as ISO 8601 UTC strings, which order
/// lexicographically.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(conn: &mut _, now: &str) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    if deleted > 0 {
        debug!("Deleted {} expired sessions", deleted);
    }

    Ok(deleted)
}
}
