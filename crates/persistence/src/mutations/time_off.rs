// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coach time-off mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::coach_time_off;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a time-off entry for a coach.
///
/// A `None` start/end pair marks a full-day entry. Conflict checks run at
/// the API boundary before this is called.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `coach_id` - The coach
/// * `date` - The blocked date ("YYYY-MM-DD")
/// * `start_time` - Optional start ("HH:MM:SS")
/// * `end_time` - Optional end ("HH:MM:SS")
/// * `reason` - Why the coach is unavailable
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_time_off(
    conn: &mut _,
    coach_id: i64,
    date: &str,
    start_time: Option<&str>,
    end_time: Option<&str>,
    reason: &str,
) -> Result<i64, PersistenceError> {
    info!("Creating time off for coach {} on {}", coach_id, date);

    diesel::insert_into(coach_time_off::table)
        .values((
            coach_time_off::coach_id.eq(coach_id),
            coach_time_off::date.eq(date),
            coach_time_off::start_time.eq(start_time),
            coach_time_off::end_time.eq(end_time),
            coach_time_off::reason.eq(reason),
        ))
        .execute(conn)?;

    let time_off_id: i64 = conn.last_insert_id()?;

    info!(time_off_id, "Time off created successfully");

    Ok(time_off_id)
}
}

backend_fn! {
/// Deletes a time-off entry.
///
/// # Errors
///
/// Returns an error if the delete fails.
///
/// # Returns
///
/// The number of rows removed (0 if the entry did not exist).
pub fn delete_time_off(conn: &mut _, time_off_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting time off entry {}", time_off_id);

    let deleted: usize = diesel::delete(coach_time_off::table)
        .filter(coach_time_off::time_off_id.eq(time_off_id))
        .execute(conn)?;

    Ok(deleted)
}
}
