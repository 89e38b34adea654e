// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared test fixtures for API handler tests.

use courtkeep_persistence::Persistence;

use crate::auth::{AuthenticatedActor, Role};
use crate::handlers;
use crate::request_response::{CreateBookingRequest, CreateBookingResponse};

/// Default payment-hold window used by tests.
pub const TEST_HOLD_MINUTES: i64 = 15;

/// A seeded environment: three accounts, one organization, one club with
/// open hours every day, one court, one coach.
pub struct TestEnv {
    pub persistence: Persistence,
    pub admin: AuthenticatedActor,
    pub staff: AuthenticatedActor,
    pub member: AuthenticatedActor,
    pub other_member: AuthenticatedActor,
    pub organization_id: i64,
    pub club_id: i64,
    pub court_id: i64,
    pub coach_id: i64,
}

/// Builds a fully seeded environment against in-memory `SQLite`.
pub fn seeded_env() -> TestEnv {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");

    let admin_id: i64 = persistence
        .create_account("admin@example.com", "Admin", "Adm1n-Passw0rd!", "Admin")
        .unwrap();
    let staff_id: i64 = persistence
        .create_account("staff@example.com", "Staff", "St@ff-Passw0rd!", "Staff")
        .unwrap();
    let member_id: i64 = persistence
        .create_account("member@example.com", "Member", "M3mber-Passw0rd!", "Member")
        .unwrap();
    let other_member_id: i64 = persistence
        .create_account("other@example.com", "Other", "0ther-Passw0rd!", "Member")
        .unwrap();

    let organization_id: i64 = persistence.create_organization("Riverside Sports").unwrap();
    let club_id: i64 = persistence
        .create_club(organization_id, "Riverside Tennis", "Europe/Madrid")
        .unwrap();
    let court_id: i64 = persistence
        .create_court(club_id, "Court 1", Some("clay"), 2400)
        .unwrap();
    let coach_id: i64 = persistence.create_coach(club_id, "Coach Sam").unwrap();

    // Open every weekday so booking tests control their own dates
    for day_of_week in 0..7 {
        persistence
            .upsert_business_hours(club_id, day_of_week, "06:00:00", "23:00:00", false)
            .unwrap();
    }

    TestEnv {
        persistence,
        admin: AuthenticatedActor::new(admin_id, String::from("admin@example.com"), Role::Admin),
        staff: AuthenticatedActor::new(staff_id, String::from("staff@example.com"), Role::Staff),
        member: AuthenticatedActor::new(
            member_id,
            String::from("member@example.com"),
            Role::Member,
        ),
        other_member: AuthenticatedActor::new(
            other_member_id,
            String::from("other@example.com"),
            Role::Member,
        ),
        organization_id,
        club_id,
        court_id,
        coach_id,
    }
}

/// Books the environment's court as the given actor.
pub fn book(
    env: &mut TestEnv,
    actor: &AuthenticatedActor,
    start: &str,
    end: &str,
) -> Result<CreateBookingResponse, crate::error::ApiError> {
    let actor = actor.clone();
    handlers::create_booking(
        &mut env.persistence,
        &actor,
        &CreateBookingRequest {
            court_id: env.court_id,
            coach_id: None,
            start: start.to_string(),
            end: end.to_string(),
        },
        TEST_HOLD_MINUTES,
    )
}

/// Books the environment's court with the coach attached.
pub fn book_with_coach(
    env: &mut TestEnv,
    actor: &AuthenticatedActor,
    start: &str,
    end: &str,
) -> Result<CreateBookingResponse, crate::error::ApiError> {
    let actor = actor.clone();
    let coach_id: i64 = env.coach_id;
    handlers::create_booking(
        &mut env.persistence,
        &actor,
        &CreateBookingRequest {
            court_id: env.court_id,
            coach_id: Some(coach_id),
            start: start.to_string(),
            end: end.to_string(),
        },
        TEST_HOLD_MINUTES,
    )
}
