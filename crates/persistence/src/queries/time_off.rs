// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coach time-off queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::TimeOffData;
use crate::diesel_schema::coach_time_off;
use crate::error::PersistenceError;

/// Diesel Queryable struct for time-off rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = coach_time_off)]
struct TimeOffRow {
    time_off_id: i64,
    coach_id: i64,
    date: String,
    start_time: Option<String>,
    end_time: Option<String>,
    reason: String,
    created_at: String,
}

impl From<TimeOffRow> for TimeOffData {
    fn from(row: TimeOffRow) -> Self {
        Self {
            time_off_id: row.time_off_id,
            coach_id: row.coach_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

backend_fn! {
/// Retrieves a time-off entry by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the entry is not found.
pub fn get_time_off_by_id(
    conn: &mut _,
    time_off_id: i64,
) -> Result<Option<TimeOffData>, PersistenceError> {
    let result: Result<TimeOffRow, diesel::result::Error> = coach_time_off::table
        .filter(coach_time_off::time_off_id.eq(time_off_id))
        .select(TimeOffRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(TimeOffData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists all time-off entries for a coach ordered by date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_time_off_for_coach(
    conn: &mut _,
    coach_id: i64,
) -> Result<Vec<TimeOffData>, PersistenceError> {
    let rows: Vec<TimeOffRow> = coach_time_off::table
        .filter(coach_time_off::coach_id.eq(coach_id))
        .order(coach_time_off::date.asc())
        .select(TimeOffRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(TimeOffData::from).collect())
}
}

backend_fn! {
/// Lists time-off entries for a coach on a specific date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_time_off_for_coach_on_date(
    conn: &mut _,
    coach_id: i64,
    date: &str,
) -> Result<Vec<TimeOffData>, PersistenceError> {
    let rows: Vec<TimeOffRow> = coach_time_off::table
        .filter(coach_time_off::coach_id.eq(coach_id))
        .filter(coach_time_off::date.eq(date))
        .order(coach_time_off::time_off_id.asc())
        .select(TimeOffRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(TimeOffData::from).collect())
}
}
