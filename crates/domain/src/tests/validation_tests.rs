// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{weekday_from_index, weekday_to_index};
use crate::validation::{
    normalize_email, validate_club_name, validate_display_name, validate_email, validate_reason,
    validate_timezone,
};
use chrono::Weekday;

#[test]
fn test_normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email(" User@Example.COM "), "user@example.com");
}

#[test]
fn test_normalize_email_is_idempotent() {
    let once: String = normalize_email(" User@Example.COM ");
    let twice: String = normalize_email(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_validate_email_accepts_normal_address() {
    assert_eq!(
        validate_email("Pat.Smith@club.example").unwrap(),
        "pat.smith@club.example"
    );
}

#[test]
fn test_validate_email_rejects_empty() {
    assert!(matches!(
        validate_email("   "),
        Err(DomainError::InvalidEmail(_))
    ));
}

#[test]
fn test_validate_email_rejects_missing_at() {
    assert!(validate_email("not-an-email").is_err());
}

#[test]
fn test_validate_email_rejects_empty_local_or_domain() {
    assert!(validate_email("@example.com").is_err());
    assert!(validate_email("user@").is_err());
}

#[test]
fn test_display_name_rules() {
    assert!(validate_display_name("Pat Smith").is_ok());
    assert!(validate_display_name("").is_err());
    assert!(validate_display_name("   ").is_err());
    assert!(validate_display_name(&"x".repeat(121)).is_err());
    assert!(validate_display_name(&"x".repeat(120)).is_ok());
}

#[test]
fn test_club_name_rules() {
    assert!(validate_club_name("Riverside Tennis").is_ok());
    assert!(validate_club_name("").is_err());
    assert!(validate_club_name(&"x".repeat(81)).is_err());
}

#[test]
fn test_reason_rules() {
    assert!(validate_reason("").is_ok());
    assert!(validate_reason("family emergency").is_ok());
    assert!(validate_reason(&"x".repeat(201)).is_err());
}

#[test]
fn test_timezone_validation() {
    assert!(validate_timezone("Europe/Madrid").is_ok());
    assert!(validate_timezone("America/New_York").is_ok());
    assert_eq!(
        validate_timezone("Mars/Olympus_Mons"),
        Err(DomainError::InvalidTimezone(String::from(
            "Mars/Olympus_Mons"
        )))
    );
}

#[test]
fn test_weekday_index_round_trip() {
    for index in 0u8..7 {
        let weekday: Weekday = weekday_from_index(index).unwrap();
        assert_eq!(weekday_to_index(weekday), index);
    }
    assert_eq!(weekday_from_index(0).unwrap(), Weekday::Mon);
    assert_eq!(weekday_from_index(6).unwrap(), Weekday::Sun);
    assert!(matches!(
        weekday_from_index(7),
        Err(DomainError::InvalidWeekday { value: 7 })
    ));
}
