// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening-hours queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{BusinessHoursData, SpecialHoursData};
use crate::diesel_schema::{club_business_hours, club_special_hours};
use crate::error::PersistenceError;

/// Diesel Queryable struct for weekly business-hours rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = club_business_hours)]
struct BusinessHoursRow {
    business_hours_id: i64,
    club_id: i64,
    day_of_week: i32,
    open_time: String,
    close_time: String,
    is_closed: i32,
}

impl From<BusinessHoursRow> for BusinessHoursData {
    fn from(row: BusinessHoursRow) -> Self {
        Self {
            business_hours_id: row.business_hours_id,
            club_id: row.club_id,
            day_of_week: row.day_of_week,
            open_time: row.open_time,
            close_time: row.close_time,
            is_closed: row.is_closed != 0,
        }
    }
}

/// Diesel Queryable struct for per-date special-hours rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = club_special_hours)]
struct SpecialHoursRow {
    special_hours_id: i64,
    club_id: i64,
    date: String,
    open_time: String,
    close_time: String,
    is_closed: i32,
}

impl From<SpecialHoursRow> for SpecialHoursData {
    fn from(row: SpecialHoursRow) -> Self {
        Self {
            special_hours_id: row.special_hours_id,
            club_id: row.club_id,
            date: row.date,
            open_time: row.open_time,
            close_time: row.close_time,
            is_closed: row.is_closed != 0,
        }
    }
}

backend_fn! {
/// Lists the weekly business hours for a club ordered by weekday.
///
/// Clubs with no configured hours return an empty list; the domain layer
/// treats missing weekdays as closed.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_business_hours(
    conn: &mut _,
    club_id: i64,
) -> Result<Vec<BusinessHoursData>, PersistenceError> {
    let rows: Vec<BusinessHoursRow> = club_business_hours::table
        .filter(club_business_hours::club_id.eq(club_id))
        .order(club_business_hours::day_of_week.asc())
        .select(BusinessHoursRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(BusinessHoursData::from).collect())
}
}

backend_fn! {
/// Retrieves the special-hours override for a club and date, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no override exists for the date.
pub fn get_special_hours(
    conn: &mut _,
    club_id: i64,
    date: &str,
) -> Result<Option<SpecialHoursData>, PersistenceError> {
    let result: Result<SpecialHoursRow, diesel::result::Error> = club_special_hours::table
        .filter(club_special_hours::club_id.eq(club_id))
        .filter(club_special_hours::date.eq(date))
        .select(SpecialHoursRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SpecialHoursData::from(row))),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists all special-hours overrides for a club ordered by date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_special_hours(
    conn: &mut _,
    club_id: i64,
) -> Result<Vec<SpecialHoursData>, PersistenceError> {
    let rows: Vec<SpecialHoursRow> = club_special_hours::table
        .filter(club_special_hours::club_id.eq(club_id))
        .order(club_special_hours::date.asc())
        .select(SpecialHoursRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SpecialHoursData::from).collect())
}
}
