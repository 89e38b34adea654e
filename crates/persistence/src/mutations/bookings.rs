// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutations.
//!
//! Lifecycle transitions are persisted here only after the corresponding
//! domain guard has passed at the API boundary; these functions apply the
//! side effects without re-deciding the rules.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use courtkeep_domain::{BookingStatus, CancelReason, PaymentStatus};

use crate::backend::PersistenceBackend;
use crate::data_models::NewBooking;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new booking in its initial Pending/Unpaid state.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_booking` - The booking fields
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_booking(
    conn: &mut _,
    new_booking: &NewBooking,
) -> Result<i64, PersistenceError> {
    info!(
        "Inserting booking for court {} on {} {}..{}",
        new_booking.court_id, new_booking.date, new_booking.start_time, new_booking.end_time
    );

    diesel::insert_into(bookings::table)
        .values((
            bookings::court_id.eq(new_booking.court_id),
            bookings::account_id.eq(new_booking.account_id),
            bookings::coach_id.eq(new_booking.coach_id),
            bookings::date.eq(&new_booking.date),
            bookings::start_time.eq(&new_booking.start_time),
            bookings::end_time.eq(&new_booking.end_time),
            bookings::booking_status.eq(BookingStatus::Pending.as_str()),
            bookings::payment_status.eq(PaymentStatus::Unpaid.as_str()),
            bookings::reservation_expires_at.eq(&new_booking.reservation_expires_at),
        ))
        .execute(conn)?;

    let booking_id: i64 = conn.last_insert_id()?;

    info!(booking_id, "Booking inserted successfully");

    Ok(booking_id)
}
}

backend_fn! {
/// Cancels a booking.
///
/// Sets the status to Cancelled, records the reason, and clears the
/// reservation deadline.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `booking_id` - The booking to cancel
/// * `reason` - Why the booking was cancelled
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn cancel_booking(
    conn: &mut _,
    booking_id: i64,
    reason: CancelReason,
) -> Result<(), PersistenceError> {
    info!("Cancelling booking {} ({})", booking_id, reason.as_str());

    diesel::update(bookings::table)
        .filter(bookings::booking_id.eq(booking_id))
        .set((
            bookings::booking_status.eq(BookingStatus::Cancelled.as_str()),
            bookings::cancel_reason.eq(Some(reason.as_str())),
            bookings::reservation_expires_at.eq(None::<String>),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Marks a booking as paid and confirmed.
///
/// Clears the reservation deadline; a paid booking is never released by
/// the expiry sweep.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn confirm_payment(conn: &mut _, booking_id: i64) -> Result<(), PersistenceError> {
    info!("Confirming payment for booking {}", booking_id);

    diesel::update(bookings::table)
        .filter(bookings::booking_id.eq(booking_id))
        .set((
            bookings::booking_status.eq(BookingStatus::Confirmed.as_str()),
            bookings::payment_status.eq(PaymentStatus::Paid.as_str()),
            bookings::reservation_expires_at.eq(None::<String>),
        ))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Extends the reservation deadline of an unpaid booking.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `booking_id` - The booking
/// * `expires_at` - The new RFC 3339 deadline
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn extend_reservation(
    conn: &mut _,
    booking_id: i64,
    expires_at: &str,
) -> Result<(), PersistenceError> {
    info!(
        "Extending reservation for booking {} until {}",
        booking_id, expires_at
    );

    diesel::update(bookings::table)
        .filter(bookings::booking_id.eq(booking_id))
        .set(bookings::reservation_expires_at.eq(Some(expires_at)))
        .execute(conn)?;

    Ok(())
}
}
