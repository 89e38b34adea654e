// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking entity and lifecycle guards.
//!
//! The guards in this module are pure functions over a booking's current
//! state. They decide whether a requested transition is permitted; the
//! caller applies the side effects after a guard passes.

use crate::booking_status::{BookingStatus, PaymentStatus};
use crate::error::DomainError;
use crate::time_range::BookingSlot;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Represents a court booking.
///
/// `booking_id` is the canonical identifier assigned by the database.
/// `None` indicates the booking has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The canonical numeric identifier assigned by the database.
    pub booking_id: Option<i64>,
    /// The court this booking occupies.
    pub court_id: i64,
    /// The account that owns this booking.
    pub account_id: i64,
    /// The coach attached to this booking, if any.
    pub coach_id: Option<i64>,
    /// The booked date and time range.
    pub slot: BookingSlot,
    /// The lifecycle state.
    pub status: BookingStatus,
    /// The payment state.
    pub payment_status: PaymentStatus,
    /// Why the booking was cancelled, if it was.
    pub cancel_reason: Option<crate::booking_status::CancelReason>,
    /// RFC 3339 deadline after which an unpaid booking may be released.
    /// `None` once payment is captured or the booking is cancelled.
    pub reservation_expires_at: Option<String>,
}

impl Booking {
    /// Creates a new unpersisted booking in its initial state.
    ///
    /// # Arguments
    ///
    /// * `court_id` - The court to book
    /// * `account_id` - The owning account
    /// * `coach_id` - Optional coach
    /// * `slot` - The booked date and time range
    /// * `reservation_expires_at` - RFC 3339 payment-hold deadline
    #[must_use]
    pub const fn new(
        court_id: i64,
        account_id: i64,
        coach_id: Option<i64>,
        slot: BookingSlot,
        reservation_expires_at: Option<String>,
    ) -> Self {
        Self {
            booking_id: None,
            court_id,
            account_id,
            coach_id,
            slot,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            cancel_reason: None,
            reservation_expires_at,
        }
    }

    /// Returns true if this booking still occupies its slot.
    #[must_use]
    pub const fn occupies_slot(&self) -> bool {
        self.status.occupies_slot()
    }
}

/// Validates that a booking may be cancelled.
///
/// # Guard conditions
///
/// - The booking must not already be cancelled.
/// - Payment must not have been captured. Paid bookings go through the
///   refund flow instead.
///   TODO: route paid bookings through the refund flow once the payments
///   integration supports partial-window refunds.
/// - The booking's start must still be in the future.
///
/// Ownership is enforced at the API boundary, not here.
///
/// # Arguments
///
/// * `booking` - The booking to cancel
/// * `now` - The current timestamp
///
/// # Errors
///
/// Returns `DomainError::AlreadyCancelled`, `PaidBookingRequiresRefund`,
/// or `BookingAlreadyStarted` when the respective guard fails.
pub fn validate_cancellation(booking: &Booking, now: NaiveDateTime) -> Result<(), DomainError> {
    if booking.status == BookingStatus::Cancelled {
        return Err(DomainError::AlreadyCancelled);
    }
    if booking.payment_status != PaymentStatus::Unpaid {
        return Err(DomainError::PaidBookingRequiresRefund);
    }
    if booking.slot.start_datetime() <= now {
        return Err(DomainError::BookingAlreadyStarted);
    }
    Ok(())
}

/// Validates that payment may be confirmed for a booking.
///
/// Confirming payment moves the booking to `Confirmed` and the payment
/// status to `Paid`. Both transitions must be legal from the current state.
///
/// # Errors
///
/// Returns `DomainError::AlreadyCancelled` if the booking is cancelled, or
/// `DomainError::InvalidPaymentTransition` if payment was already captured.
pub fn validate_payment_confirmation(booking: &Booking) -> Result<(), DomainError> {
    if booking.status == BookingStatus::Cancelled {
        return Err(DomainError::AlreadyCancelled);
    }
    if !booking
        .payment_status
        .can_transition_to(PaymentStatus::Paid)
    {
        return Err(DomainError::InvalidPaymentTransition {
            from: booking.payment_status,
            to: PaymentStatus::Paid,
        });
    }
    Ok(())
}

/// Validates that the payment hold on a booking may be extended.
///
/// Resuming payment is only meaningful while the booking is alive and
/// unpaid. The caller extends `reservation_expires_at` after this passes.
///
/// # Errors
///
/// Returns `DomainError::AlreadyCancelled` if the booking is cancelled, or
/// `DomainError::InvalidPaymentTransition` if payment was already captured.
pub fn validate_payment_resume(booking: &Booking) -> Result<(), DomainError> {
    if booking.status == BookingStatus::Cancelled {
        return Err(DomainError::AlreadyCancelled);
    }
    if booking.payment_status != PaymentStatus::Unpaid {
        return Err(DomainError::InvalidPaymentTransition {
            from: booking.payment_status,
            to: PaymentStatus::Paid,
        });
    }
    Ok(())
}
