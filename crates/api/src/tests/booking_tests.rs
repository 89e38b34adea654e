// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{CreateBookingRequest, CreateBookingResponse};
use crate::tests::helpers::{TEST_HOLD_MINUTES, TestEnv, book, book_with_coach, seeded_env};

#[test]
fn test_booking_succeeds_within_hours() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let response: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    assert_eq!(response.booking_status, "Pending");
    assert_eq!(response.payment_status, "Unpaid");
    assert_eq!(response.date, "2099-06-05");
    assert_eq!(response.start_time, "10:00:00");
    // 60 minutes at 2400 cents/hour
    assert_eq!(response.price_cents, 2400);
    assert!(!response.reservation_expires_at.is_empty());
}

#[test]
fn test_overlapping_booking_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();
    let other = env.other_member.clone();

    book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    let result = book(
        &mut env,
        &other,
        "2099-06-05T10:30:00",
        "2099-06-05T11:30:00",
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_adjacent_bookings_are_allowed() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();
    let other = env.other_member.clone();

    book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    assert!(
        book(
            &mut env,
            &other,
            "2099-06-05T11:00:00",
            "2099-06-05T12:00:00",
        )
        .is_ok()
    );
}

#[test]
fn test_cancelled_booking_frees_the_slot() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();
    let other = env.other_member.clone();

    let first: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();
    handlers::cancel_booking(&mut env.persistence, &member, first.booking_id).unwrap();

    assert!(
        book(
            &mut env,
            &other,
            "2099-06-05T10:00:00",
            "2099-06-05T11:00:00",
        )
        .is_ok()
    );
}

#[test]
fn test_inverted_interval_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let result = book(
        &mut env,
        &member,
        "2099-06-05T11:00:00",
        "2099-06-05T10:00:00",
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_cross_midnight_booking_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let result = book(
        &mut env,
        &member,
        "2099-06-05T22:00:00",
        "2099-06-06T01:00:00",
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_booking_outside_hours_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    // Club opens at 06:00
    let result = book(
        &mut env,
        &member,
        "2099-06-05T05:00:00",
        "2099-06-05T06:30:00",
    );
    assert!(matches!(result, Err(ApiError::RuleViolation { .. })));
}

#[test]
fn test_booking_on_special_closure_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    env.persistence
        .upsert_special_hours(env.club_id, "2099-06-05", "00:00:00", "00:00:01", true)
        .unwrap();

    let result = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    );
    assert!(matches!(result, Err(ApiError::RuleViolation { .. })));
}

#[test]
fn test_unknown_court_is_not_found() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let result = handlers::create_booking(
        &mut env.persistence,
        &member,
        &CreateBookingRequest {
            court_id: 9999,
            coach_id: None,
            start: String::from("2099-06-05T10:00:00"),
            end: String::from("2099-06-05T11:00:00"),
        },
        TEST_HOLD_MINUTES,
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_full_day_time_off_blocks_coach_booking() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    env.persistence
        .create_time_off(env.coach_id, "2099-06-05", None, None, "holiday")
        .unwrap();

    let result = book_with_coach(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));

    // The coach is free the next day
    assert!(
        book_with_coach(
            &mut env,
            &member,
            "2099-06-06T10:00:00",
            "2099-06-06T11:00:00",
        )
        .is_ok()
    );
}

#[test]
fn test_coach_double_booking_is_rejected_across_courts() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();
    let other = env.other_member.clone();

    let second_court: i64 = env
        .persistence
        .create_court(env.club_id, "Court 2", None, 2400)
        .unwrap();

    book_with_coach(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    // Same coach, overlapping time, different court
    let result = handlers::create_booking(
        &mut env.persistence,
        &other,
        &CreateBookingRequest {
            court_id: second_court,
            coach_id: Some(env.coach_id),
            start: String::from("2099-06-05T10:30:00"),
            end: String::from("2099-06-05T11:30:00"),
        },
        TEST_HOLD_MINUTES,
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_coach_from_another_club_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let other_club: i64 = env
        .persistence
        .create_club(env.organization_id, "Northside Padel", "Europe/Madrid")
        .unwrap();
    let foreign_coach: i64 = env
        .persistence
        .create_coach(other_club, "Coach Elsewhere")
        .unwrap();

    let result = handlers::create_booking(
        &mut env.persistence,
        &member,
        &CreateBookingRequest {
            court_id: env.court_id,
            coach_id: Some(foreign_coach),
            start: String::from("2099-06-05T10:00:00"),
            end: String::from("2099-06-05T11:00:00"),
        },
        TEST_HOLD_MINUTES,
    );
    assert!(matches!(result, Err(ApiError::RuleViolation { .. })));
}

#[test]
fn test_cancel_unpaid_future_booking() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    let response = handlers::cancel_booking(&mut env.persistence, &member, booking.booking_id)
        .unwrap();
    assert_eq!(response.booking_status, "Cancelled");
    assert_eq!(response.cancel_reason, "UserCancelled");

    let stored = env
        .persistence
        .get_booking_by_id(booking.booking_id)
        .unwrap()
        .unwrap();
    assert!(stored.reservation_expires_at.is_none());
}

#[test]
fn test_cancel_paid_booking_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();
    handlers::confirm_payment(&mut env.persistence, &member, booking.booking_id).unwrap();

    let result = handlers::cancel_booking(&mut env.persistence, &member, booking.booking_id);
    assert!(matches!(result, Err(ApiError::RuleViolation { .. })));
}

#[test]
fn test_cancel_past_booking_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2020-01-06T10:00:00",
        "2020-01-06T11:00:00",
    )
    .unwrap();

    let result = handlers::cancel_booking(&mut env.persistence, &member, booking.booking_id);
    assert!(matches!(result, Err(ApiError::RuleViolation { .. })));
}

#[test]
fn test_cancel_twice_is_a_conflict() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();
    handlers::cancel_booking(&mut env.persistence, &member, booking.booking_id).unwrap();

    let result = handlers::cancel_booking(&mut env.persistence, &member, booking.booking_id);
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_staff_cancellation_is_attributed_to_the_club() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();
    let staff = env.staff.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    let response =
        handlers::cancel_booking(&mut env.persistence, &staff, booking.booking_id).unwrap();
    assert_eq!(response.cancel_reason, "ClubCancelled");
}

#[test]
fn test_confirm_payment_confirms_booking() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    let response =
        handlers::confirm_payment(&mut env.persistence, &member, booking.booking_id).unwrap();
    assert_eq!(response.booking_status, "Confirmed");
    assert_eq!(response.payment_status, "Paid");

    // Paying twice is a duplicate request
    let result = handlers::confirm_payment(&mut env.persistence, &member, booking.booking_id);
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_resume_payment_extends_the_deadline() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();

    let response =
        handlers::resume_payment(&mut env.persistence, &member, booking.booking_id, 60).unwrap();
    assert!(response.reservation_expires_at > booking.reservation_expires_at);

    let stored = env
        .persistence
        .get_booking_by_id(booking.booking_id)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.reservation_expires_at.as_deref(),
        Some(response.reservation_expires_at.as_str())
    );
}

#[test]
fn test_resume_payment_on_cancelled_booking_is_rejected() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let booking: CreateBookingResponse = book(
        &mut env,
        &member,
        "2099-06-05T10:00:00",
        "2099-06-05T11:00:00",
    )
    .unwrap();
    handlers::cancel_booking(&mut env.persistence, &member, booking.booking_id).unwrap();

    let result =
        handlers::resume_payment(&mut env.persistence, &member, booking.booking_id, 60);
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_expiry_sweep_releases_only_lapsed_unpaid_bookings() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    // Hold of zero minutes lapses immediately
    let lapsed = handlers::create_booking(
        &mut env.persistence,
        &member,
        &CreateBookingRequest {
            court_id: env.court_id,
            coach_id: None,
            start: String::from("2099-06-05T10:00:00"),
            end: String::from("2099-06-05T11:00:00"),
        },
        0,
    )
    .unwrap();

    let unexpired = book(
        &mut env,
        &member,
        "2099-06-05T12:00:00",
        "2099-06-05T13:00:00",
    )
    .unwrap();

    let paid = handlers::create_booking(
        &mut env.persistence,
        &member,
        &CreateBookingRequest {
            court_id: env.court_id,
            coach_id: None,
            start: String::from("2099-06-05T14:00:00"),
            end: String::from("2099-06-05T15:00:00"),
        },
        0,
    )
    .unwrap();
    handlers::confirm_payment(&mut env.persistence, &member, paid.booking_id).unwrap();

    let released: Vec<i64> = handlers::release_expired_reservations(
        &mut env.persistence,
        OffsetDateTime::now_utc(),
    )
    .unwrap();
    assert_eq!(released, vec![lapsed.booking_id]);

    let stored = env
        .persistence
        .get_booking_by_id(lapsed.booking_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.booking_status, "Cancelled");
    assert_eq!(stored.cancel_reason.as_deref(), Some("ReservationExpired"));

    let untouched = env
        .persistence
        .get_booking_by_id(unexpired.booking_id)
        .unwrap()
        .unwrap();
    assert_eq!(untouched.booking_status, "Pending");

    let paid_stored = env
        .persistence
        .get_booking_by_id(paid.booking_id)
        .unwrap()
        .unwrap();
    assert_eq!(paid_stored.booking_status, "Confirmed");
}

#[test]
fn test_expired_but_unswept_booking_can_resume_payment() {
    let mut env: TestEnv = seeded_env();
    let member = env.member.clone();

    let lapsed = handlers::create_booking(
        &mut env.persistence,
        &member,
        &CreateBookingRequest {
            court_id: env.court_id,
            coach_id: None,
            start: String::from("2099-06-05T10:00:00"),
            end: String::from("2099-06-05T11:00:00"),
        },
        0,
    )
    .unwrap();

    // Until the sweep runs, the booking is still alive and can be rescued
    assert!(
        handlers::resume_payment(&mut env.persistence, &member, lapsed.booking_id, 30).is_ok()
    );

    let released: Vec<i64> = handlers::release_expired_reservations(
        &mut env.persistence,
        OffsetDateTime::now_utc(),
    )
    .unwrap();
    assert!(released.is_empty());
}
