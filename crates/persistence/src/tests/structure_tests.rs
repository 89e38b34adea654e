// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BusinessHoursData, ClubData, CourtData, Persistence, PersistenceError, SpecialHoursData,
    TimeOffData,
};

fn new_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Creates an organization and club, returning `(organization_id, club_id)`.
fn seed_club(persistence: &mut Persistence) -> (i64, i64) {
    let organization_id: i64 = persistence.create_organization("Riverside Sports").unwrap();
    let club_id: i64 = persistence
        .create_club(organization_id, "Riverside Tennis", "Europe/Madrid")
        .unwrap();
    (organization_id, club_id)
}

#[test]
fn test_organization_club_court_hierarchy() {
    let mut persistence: Persistence = new_persistence();
    let (organization_id, club_id) = seed_club(&mut persistence);

    let court_id: i64 = persistence
        .create_court(club_id, "Center Court", Some("clay"), 2400)
        .unwrap();

    let clubs: Vec<ClubData> = persistence.list_clubs(organization_id).unwrap();
    assert_eq!(clubs.len(), 1);
    assert_eq!(clubs[0].club_id, club_id);
    assert_eq!(clubs[0].timezone, "Europe/Madrid");

    let courts: Vec<CourtData> = persistence.list_courts(club_id).unwrap();
    assert_eq!(courts.len(), 1);
    assert_eq!(courts[0].court_id, court_id);
    assert_eq!(courts[0].surface.as_deref(), Some("clay"));
    assert_eq!(courts[0].hourly_rate_cents, 2400);
}

#[test]
fn test_duplicate_organization_name_is_rejected() {
    let mut persistence: Persistence = new_persistence();

    persistence.create_organization("Riverside Sports").unwrap();
    let result = persistence.create_organization("Riverside Sports");
    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_duplicate_club_name_within_organization_is_rejected() {
    let mut persistence: Persistence = new_persistence();
    let (organization_id, _club_id) = seed_club(&mut persistence);

    let result = persistence.create_club(organization_id, "Riverside Tennis", "Europe/Madrid");
    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_same_club_name_in_different_organizations_is_allowed() {
    let mut persistence: Persistence = new_persistence();
    let (_organization_id, _club_id) = seed_club(&mut persistence);

    let other_org: i64 = persistence.create_organization("Northside Sports").unwrap();
    assert!(
        persistence
            .create_club(other_org, "Riverside Tennis", "Europe/Madrid")
            .is_ok()
    );
}

#[test]
fn test_duplicate_court_name_within_club_is_rejected() {
    let mut persistence: Persistence = new_persistence();
    let (_organization_id, club_id) = seed_club(&mut persistence);

    persistence
        .create_court(club_id, "Court 1", None, 1500)
        .unwrap();
    let result = persistence.create_court(club_id, "Court 1", None, 1500);
    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_club_requires_existing_organization() {
    let mut persistence: Persistence = new_persistence();
    // Foreign key enforcement rejects clubs for unknown organizations
    let result = persistence.create_club(12345, "Orphan Club", "UTC");
    assert!(result.is_err());
}

#[test]
fn test_business_hours_upsert_replaces_weekday() {
    let mut persistence: Persistence = new_persistence();
    let (_organization_id, club_id) = seed_club(&mut persistence);

    persistence
        .upsert_business_hours(club_id, 0, "09:00:00", "18:00:00", false)
        .unwrap();
    persistence
        .upsert_business_hours(club_id, 0, "07:00:00", "22:00:00", false)
        .unwrap();

    let hours: Vec<BusinessHoursData> = persistence.list_business_hours(club_id).unwrap();
    assert_eq!(hours.len(), 1);
    assert_eq!(hours[0].day_of_week, 0);
    assert_eq!(hours[0].open_time, "07:00:00");
    assert_eq!(hours[0].close_time, "22:00:00");
    assert!(!hours[0].is_closed);
}

#[test]
fn test_special_hours_round_trip_and_delete() {
    let mut persistence: Persistence = new_persistence();
    let (_organization_id, club_id) = seed_club(&mut persistence);

    persistence
        .upsert_special_hours(club_id, "2026-12-25", "00:00:00", "00:00:01", true)
        .unwrap();

    let special: SpecialHoursData = persistence
        .get_special_hours(club_id, "2026-12-25")
        .unwrap()
        .expect("override should exist");
    assert!(special.is_closed);

    assert_eq!(
        persistence.delete_special_hours(club_id, "2026-12-25").unwrap(),
        1
    );
    assert!(
        persistence
            .get_special_hours(club_id, "2026-12-25")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_time_off_round_trip() {
    let mut persistence: Persistence = new_persistence();
    let (_organization_id, club_id) = seed_club(&mut persistence);
    let coach_id: i64 = persistence.create_coach(club_id, "Coach Sam").unwrap();

    let full_day: i64 = persistence
        .create_time_off(coach_id, "2026-06-01", None, None, "holiday")
        .unwrap();
    let partial: i64 = persistence
        .create_time_off(
            coach_id,
            "2026-06-02",
            Some("10:00:00"),
            Some("12:00:00"),
            "",
        )
        .unwrap();

    let all: Vec<TimeOffData> = persistence.list_time_off_for_coach(coach_id).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].time_off_id, full_day);
    assert!(all[0].start_time.is_none());
    assert_eq!(all[1].time_off_id, partial);
    assert_eq!(all[1].start_time.as_deref(), Some("10:00:00"));

    let on_date: Vec<TimeOffData> = persistence
        .list_time_off_for_coach_on_date(coach_id, "2026-06-01")
        .unwrap();
    assert_eq!(on_date.len(), 1);

    assert_eq!(persistence.delete_time_off(full_day).unwrap(), 1);
    assert_eq!(persistence.delete_time_off(full_day).unwrap(), 0);
}
