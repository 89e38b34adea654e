// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization, club, court, and coach mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{clubs, coaches, courts, organizations};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new organization.
///
/// # Errors
///
/// Returns an error if the insert fails or the name already exists.
pub fn create_organization(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    info!("Creating organization: {}", name);

    diesel::insert_into(organizations::table)
        .values(organizations::name.eq(name))
        .execute(conn)?;

    let organization_id: i64 = conn.last_insert_id()?;

    info!(organization_id, "Organization created successfully");

    Ok(organization_id)
}
}

backend_fn! {
/// Creates a new club within an organization.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `organization_id` - The owning organization
/// * `name` - The club name
/// * `timezone` - IANA timezone label for the club's opening hours
///
/// # Errors
///
/// Returns an error if the insert fails or the name already exists
/// within the organization.
pub fn create_club(
    conn: &mut _,
    organization_id: i64,
    name: &str,
    timezone: &str,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating club '{}' in organization {} ({})",
        name, organization_id, timezone
    );

    diesel::insert_into(clubs::table)
        .values((
            clubs::organization_id.eq(organization_id),
            clubs::name.eq(name),
            clubs::timezone.eq(timezone),
        ))
        .execute(conn)?;

    let club_id: i64 = conn.last_insert_id()?;

    info!(club_id, "Club created successfully");

    Ok(club_id)
}
}

backend_fn! {
/// Creates a new court within a club.
///
/// # Errors
///
/// Returns an error if the insert fails or the name already exists
/// within the club.
pub fn create_court(
    conn: &mut _,
    club_id: i64,
    name: &str,
    surface: Option<&str>,
    hourly_rate_cents: i64,
) -> Result<i64, PersistenceError> {
    info!("Creating court '{}' in club {}", name, club_id);

    diesel::insert_into(courts::table)
        .values((
            courts::club_id.eq(club_id),
            courts::name.eq(name),
            courts::surface.eq(surface),
            courts::hourly_rate_cents.eq(hourly_rate_cents),
        ))
        .execute(conn)?;

    let court_id: i64 = conn.last_insert_id()?;

    info!(court_id, "Court created successfully");

    Ok(court_id)
}
}

backend_fn! {
/// Creates a new coach within a club.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_coach(conn: &mut _, club_id: i64, name: &str) -> Result<i64, PersistenceError> {
    info!("Creating coach '{}' in club {}", name, club_id);

    diesel::insert_into(coaches::table)
        .values((coaches::club_id.eq(club_id), coaches::name.eq(name)))
        .execute(conn)?;

    let coach_id: i64 = conn.last_insert_id()?;

    info!(coach_id, "Coach created successfully");

    Ok(coach_id)
}
}
