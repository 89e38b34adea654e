// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening-hours mutations.
//!
//! Hours rows are keyed by `(club_id, day_of_week)` or `(club_id, date)`
//! and written with `replace_into`, which both `SQLite` and `MySQL`
//! support, so setting hours is always an upsert.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::diesel_schema::{club_business_hours, club_special_hours};
use crate::error::PersistenceError;

backend_fn! {
/// Sets the business hours for one weekday of a club.
///
/// Replaces any existing row for the same `(club_id, day_of_week)`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `club_id` - The club
/// * `day_of_week` - Weekday index, Monday = 0
/// * `open_time` - Opening time ("HH:MM:SS")
/// * `close_time` - Closing time ("HH:MM:SS")
/// * `is_closed` - Whether the club is closed that weekday
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_business_hours(
    conn: &mut _,
    club_id: i64,
    day_of_week: i32,
    open_time: &str,
    close_time: &str,
    is_closed: bool,
) -> Result<(), PersistenceError> {
    info!(
        "Setting business hours for club {} weekday {}: {}..{} (closed: {})",
        club_id, day_of_week, open_time, close_time, is_closed
    );

    diesel::replace_into(club_business_hours::table)
        .values((
            club_business_hours::club_id.eq(club_id),
            club_business_hours::day_of_week.eq(day_of_week),
            club_business_hours::open_time.eq(open_time),
            club_business_hours::close_time.eq(close_time),
            club_business_hours::is_closed.eq(i32::from(is_closed)),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Sets the special hours for one date of a club.
///
/// Replaces any existing row for the same `(club_id, date)`.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_special_hours(
    conn: &mut _,
    club_id: i64,
    date: &str,
    open_time: &str,
    close_time: &str,
    is_closed: bool,
) -> Result<(), PersistenceError> {
    info!(
        "Setting special hours for club {} on {}: {}..{} (closed: {})",
        club_id, date, open_time, close_time, is_closed
    );

    diesel::replace_into(club_special_hours::table)
        .values((
            club_special_hours::club_id.eq(club_id),
            club_special_hours::date.eq(date),
            club_special_hours::open_time.eq(open_time),
            club_special_hours::close_time.eq(close_time),
            club_special_hours::is_closed.eq(i32::from(is_closed)),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Removes the special-hours override for a date, if one exists.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_special_hours(
    conn: &mut _,
    club_id: i64,
    date: &str,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(club_special_hours::table)
        .filter(club_special_hours::club_id.eq(club_id))
        .filter(club_special_hours::date.eq(date))
        .execute(conn)?;

    Ok(deleted)
}
}
