// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the lifecycle state of a booking.
///
/// Booking status and payment status are independent axes that are coupled
/// through the cancellation and payment-confirmation guards in `booking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BookingStatus {
    /// Initial state after creation. Awaiting payment.
    #[default]
    Pending,
    /// Payment received; the slot is firmly held.
    Confirmed,
    /// Terminal state. The slot is released.
    Cancelled,
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BookingStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Confirmed
    /// - Pending → Cancelled
    /// - Confirmed → Cancelled
    ///
    /// Cancelled is terminal.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    /// Returns true if this status still occupies its slot for conflict
    /// detection purposes.
    #[must_use]
    pub const fn occupies_slot(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// Represents the payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    /// No payment has been captured.
    #[default]
    Unpaid,
    /// Payment captured in full.
    Paid,
    /// Payment returned to the account holder.
    Refunded,
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            "Refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PaymentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
            Self::Refunded => "Refunded",
        }
    }

    /// Checks if a transition from this payment status to another is valid.
    ///
    /// Valid transitions are:
    /// - Unpaid → Paid
    /// - Paid → Refunded
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Unpaid, Self::Paid) | (Self::Paid, Self::Refunded)
        )
    }
}

/// Records why a booking was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelReason {
    /// The account holder (or an administrator acting for them) cancelled.
    UserCancelled,
    /// The unpaid reservation hold lapsed and the slot was released.
    ReservationExpired,
    /// The club cancelled the booking (maintenance, closure, etc).
    ClubCancelled,
}

impl FromStr for CancelReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UserCancelled" => Ok(Self::UserCancelled),
            "ReservationExpired" => Ok(Self::ReservationExpired),
            "ClubCancelled" => Ok(Self::ClubCancelled),
            _ => Err(DomainError::InvalidCancelReason(s.to_string())),
        }
    }
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CancelReason {
    /// Converts this reason to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserCancelled => "UserCancelled",
            Self::ReservationExpired => "ReservationExpired",
            Self::ClubCancelled => "ClubCancelled",
        }
    }
}
