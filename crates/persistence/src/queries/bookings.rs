// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking queries.
//!
//! Conflict detection loads candidate rows by `(court_id, date)` or
//! `(coach_id, date)` and leaves the interval arithmetic to the domain
//! layer, so the overlap rules live in exactly one place.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use courtkeep_domain::BookingStatus;

use crate::data_models::BookingData;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Diesel Queryable struct for booking rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
struct BookingRow {
    booking_id: i64,
    court_id: i64,
    account_id: i64,
    coach_id: Option<i64>,
    date: String,
    start_time: String,
    end_time: String,
    booking_status: String,
    payment_status: String,
    cancel_reason: Option<String>,
    reservation_expires_at: Option<String>,
    created_at: String,
}

impl From<BookingRow> for BookingData {
    fn from(row: BookingRow) -> Self {
        Self {
            booking_id: row.booking_id,
            court_id: row.court_id,
            account_id: row.account_id,
            coach_id: row.coach_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            booking_status: row.booking_status,
            payment_status: row.payment_status,
            cancel_reason: row.cancel_reason,
            reservation_expires_at: row.reservation_expires_at,
            created_at: row.created_at,
        }
    }
}

backend_fn! {
/// Retrieves a booking by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the booking is not found.
pub fn get_booking_by_id(
    conn: &mut _,
    booking_id: i64,
) -> Result<Option<BookingData>, PersistenceError> {
    let result: Result<BookingRow, diesel::result::Error> = bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(BookingData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists all bookings for a court on a date, ordered by start time.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_court_on_date(
    conn: &mut _,
    court_id: i64,
    date: &str,
) -> Result<Vec<BookingData>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::court_id.eq(court_id))
        .filter(bookings::date.eq(date))
        .order(bookings::start_time.asc())
        .select(BookingRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(BookingData::from).collect())
}
}

backend_fn! {
/// Lists bookings on a court and date that still occupy their slot.
///
/// Cancelled bookings never participate in conflict detection.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_active_bookings_for_court_on_date(
    conn: &mut _,
    court_id: i64,
    date: &str,
) -> Result<Vec<BookingData>, PersistenceError> {
    debug!("Loading active bookings for court {} on {}", court_id, date);

    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::court_id.eq(court_id))
        .filter(bookings::date.eq(date))
        .filter(bookings::booking_status.ne(BookingStatus::Cancelled.as_str()))
        .order(bookings::start_time.asc())
        .select(BookingRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(BookingData::from).collect())
}
}

backend_fn! {
/// Lists bookings with a coach on a date that still occupy their slot.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_active_bookings_for_coach_on_date(
    conn: &mut _,
    coach_id: i64,
    date: &str,
) -> Result<Vec<BookingData>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::coach_id.eq(coach_id))
        .filter(bookings::date.eq(date))
        .filter(bookings::booking_status.ne(BookingStatus::Cancelled.as_str()))
        .order(bookings::start_time.asc())
        .select(BookingRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(BookingData::from).collect())
}
}

backend_fn! {
/// Lists all bookings owned by an account, ordered by date and start time.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_account(
    conn: &mut _,
    account_id: i64,
) -> Result<Vec<BookingData>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::account_id.eq(account_id))
        .order((bookings::date.asc(), bookings::start_time.asc()))
        .select(BookingRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(BookingData::from).collect())
}
}

backend_fn! {
/// Lists unpaid, uncancelled bookings that carry a reservation deadline.
///
/// The API layer decides which of these have actually lapsed; timestamp
/// comparison does not belong in the storage layer.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_with_reservation_deadline(
    conn: &mut _,
) -> Result<Vec<BookingData>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::reservation_expires_at.is_not_null())
        .filter(bookings::payment_status.eq("Unpaid"))
        .filter(bookings::booking_status.ne(BookingStatus::Cancelled.as_str()))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(BookingData::from).collect())
}
}
