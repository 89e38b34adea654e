// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization, club, court, and coach queries.
//!
//! Backend-agnostic read queries for the facility structure. Name lookups
//! are exact after the API layer normalizes case; the schema additionally
//! enforces case-insensitive uniqueness.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{ClubData, CoachData, CourtData, OrganizationData};
use crate::diesel_schema::{clubs, coaches, courts, organizations};
use crate::error::PersistenceError;

/// Diesel Queryable struct for organization rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = organizations)]
struct OrganizationRow {
    organization_id: i64,
    name: String,
    created_at: String,
}

impl From<OrganizationRow> for OrganizationData {
    fn from(row: OrganizationRow) -> Self {
        Self {
            organization_id: row.organization_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Diesel Queryable struct for club rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = clubs)]
struct ClubRow {
    club_id: i64,
    organization_id: i64,
    name: String,
    timezone: String,
    created_at: String,
}

impl From<ClubRow> for ClubData {
    fn from(row: ClubRow) -> Self {
        Self {
            club_id: row.club_id,
            organization_id: row.organization_id,
            name: row.name,
            timezone: row.timezone,
            created_at: row.created_at,
        }
    }
}

/// Diesel Queryable struct for court rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = courts)]
struct CourtRow {
    court_id: i64,
    club_id: i64,
    name: String,
    surface: Option<String>,
    hourly_rate_cents: i64,
    created_at: String,
}

impl From<CourtRow> for CourtData {
    fn from(row: CourtRow) -> Self {
        Self {
            court_id: row.court_id,
            club_id: row.club_id,
            name: row.name,
            surface: row.surface,
            hourly_rate_cents: row.hourly_rate_cents,
            created_at: row.created_at,
        }
    }
}

/// Diesel Queryable struct for coach rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = coaches)]
struct CoachRow {
    coach_id: i64,
    club_id: i64,
    name: String,
    created_at: String,
}

impl From<CoachRow> for CoachData {
    fn from(row: CoachRow) -> Self {
        Self {
            coach_id: row.coach_id,
            club_id: row.club_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

backend_fn! {
/// Retrieves an organization by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the organization is not found.
pub fn get_organization_by_name(
    conn: &mut _,
    name: &str,
) -> Result<Option<OrganizationData>, PersistenceError> {
    let result: Result<OrganizationRow, diesel::result::Error> = organizations::table
        .filter(organizations::name.eq(name))
        .select(OrganizationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(OrganizationData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves an organization by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the organization is not found.
pub fn get_organization_by_id(
    conn: &mut _,
    organization_id: i64,
) -> Result<Option<OrganizationData>, PersistenceError> {
    let result: Result<OrganizationRow, diesel::result::Error> = organizations::table
        .filter(organizations::organization_id.eq(organization_id))
        .select(OrganizationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(OrganizationData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists all organizations ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_organizations(conn: &mut _) -> Result<Vec<OrganizationData>, PersistenceError> {
    let rows: Vec<OrganizationRow> = organizations::table
        .order(organizations::name.asc())
        .select(OrganizationRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(OrganizationData::from).collect())
}
}

backend_fn! {
/// Retrieves a club by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the club is not found.
pub fn get_club_by_id(
    conn: &mut _,
    club_id: i64,
) -> Result<Option<ClubData>, PersistenceError> {
    let result: Result<ClubRow, diesel::result::Error> = clubs::table
        .filter(clubs::club_id.eq(club_id))
        .select(ClubRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(ClubData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves a club by organization and name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the club is not found.
pub fn get_club_by_name(
    conn: &mut _,
    organization_id: i64,
    name: &str,
) -> Result<Option<ClubData>, PersistenceError> {
    let result: Result<ClubRow, diesel::result::Error> = clubs::table
        .filter(clubs::organization_id.eq(organization_id))
        .filter(clubs::name.eq(name))
        .select(ClubRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(ClubData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists clubs for an organization ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clubs(
    conn: &mut _,
    organization_id: i64,
) -> Result<Vec<ClubData>, PersistenceError> {
    debug!("Listing clubs for organization {}", organization_id);

    let rows: Vec<ClubRow> = clubs::table
        .filter(clubs::organization_id.eq(organization_id))
        .order(clubs::name.asc())
        .select(ClubRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(ClubData::from).collect())
}
}

backend_fn! {
/// Retrieves a court by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the court is not found.
pub fn get_court_by_id(
    conn: &mut _,
    court_id: i64,
) -> Result<Option<CourtData>, PersistenceError> {
    let result: Result<CourtRow, diesel::result::Error> = courts::table
        .filter(courts::court_id.eq(court_id))
        .select(CourtRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(CourtData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves a court by club and name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the court is not found.
pub fn get_court_by_name(
    conn: &mut _,
    club_id: i64,
    name: &str,
) -> Result<Option<CourtData>, PersistenceError> {
    let result: Result<CourtRow, diesel::result::Error> = courts::table
        .filter(courts::club_id.eq(club_id))
        .filter(courts::name.eq(name))
        .select(CourtRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(CourtData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists courts for a club ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_courts(conn: &mut _, club_id: i64) -> Result<Vec<CourtData>, PersistenceError> {
    let rows: Vec<CourtRow> = courts::table
        .filter(courts::club_id.eq(club_id))
        .order(courts::name.asc())
        .select(CourtRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(CourtData::from).collect())
}
}

backend_fn! {
/// Retrieves a coach by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the coach is not found.
pub fn get_coach_by_id(
    conn: &mut _,
    coach_id: i64,
) -> Result<Option<CoachData>, PersistenceError> {
    let result: Result<CoachRow, diesel::result::Error> = coaches::table
        .filter(coaches::coach_id.eq(coach_id))
        .select(CoachRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(CoachData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists coaches for a club ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_coaches(conn: &mut _, club_id: i64) -> Result<Vec<CoachData>, PersistenceError> {
    let rows: Vec<CoachRow> = coaches::table
        .filter(coaches::club_id.eq(club_id))
        .order(coaches::name.asc())
        .select(CoachRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(CoachData::from).collect())
}
}
