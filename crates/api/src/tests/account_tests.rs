// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::AuthenticationService;
use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{ChangePasswordRequest, CreateAccountRequest, LoginRequest};
use crate::tests::helpers::{TestEnv, seeded_env};

#[test]
fn test_login_round_trip() {
    let mut env: TestEnv = seeded_env();

    let response = handlers::login(
        &mut env.persistence,
        &LoginRequest {
            email: String::from("member@example.com"),
            password: String::from("M3mber-Passw0rd!"),
        },
    )
    .unwrap();

    assert_eq!(response.email, "member@example.com");
    assert_eq!(response.role, "Member");
    assert!(!response.session_token.is_empty());

    // The token validates back to the same account
    let (actor, account) =
        AuthenticationService::validate_session(&mut env.persistence, &response.session_token)
            .unwrap();
    assert_eq!(actor.account_id, env.member.account_id);
    assert_eq!(account.email, "member@example.com");
}

#[test]
fn test_login_normalizes_email() {
    let mut env: TestEnv = seeded_env();

    let response = handlers::login(
        &mut env.persistence,
        &LoginRequest {
            email: String::from("  Member@Example.COM "),
            password: String::from("M3mber-Passw0rd!"),
        },
    )
    .unwrap();
    assert_eq!(response.email, "member@example.com");
}

#[test]
fn test_login_rejects_bad_password() {
    let mut env: TestEnv = seeded_env();

    let result = handlers::login(
        &mut env.persistence,
        &LoginRequest {
            email: String::from("member@example.com"),
            password: String::from("wrong-password"),
        },
    );
    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_login_rejects_disabled_account() {
    let mut env: TestEnv = seeded_env();
    let admin = env.admin.clone();

    handlers::disable_account(&mut env.persistence, &admin, env.member.account_id).unwrap();

    let result = handlers::login(
        &mut env.persistence,
        &LoginRequest {
            email: String::from("member@example.com"),
            password: String::from("M3mber-Passw0rd!"),
        },
    );
    assert!(matches!(result, Err(ApiError::AuthenticationFailed { .. })));
}

#[test]
fn test_logout_invalidates_session() {
    let mut env: TestEnv = seeded_env();

    let login = handlers::login(
        &mut env.persistence,
        &LoginRequest {
            email: String::from("member@example.com"),
            password: String::from("M3mber-Passw0rd!"),
        },
    )
    .unwrap();

    handlers::logout(&mut env.persistence, &login.session_token).unwrap();

    let result =
        AuthenticationService::validate_session(&mut env.persistence, &login.session_token);
    assert!(result.is_err());
}

#[test]
fn test_create_account_normalizes_and_rejects_duplicates() {
    let mut env: TestEnv = seeded_env();
    let admin = env.admin.clone();

    let response = handlers::create_account(
        &mut env.persistence,
        &admin,
        &CreateAccountRequest {
            email: String::from(" New@Example.COM "),
            display_name: String::from("New Member"),
            password: String::from("N3w-Passw0rd!!"),
            password_confirmation: String::from("N3w-Passw0rd!!"),
            role: String::from("Member"),
        },
    )
    .unwrap();
    assert_eq!(response.email, "new@example.com");

    // Same address in different case is a duplicate
    let result = handlers::create_account(
        &mut env.persistence,
        &admin,
        &CreateAccountRequest {
            email: String::from("NEW@example.com"),
            display_name: String::from("Other"),
            password: String::from("0ther-Passw0rd!"),
            password_confirmation: String::from("0ther-Passw0rd!"),
            role: String::from("Member"),
        },
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_create_account_enforces_password_policy() {
    let mut env: TestEnv = seeded_env();
    let admin = env.admin.clone();

    let result = handlers::create_account(
        &mut env.persistence,
        &admin,
        &CreateAccountRequest {
            email: String::from("weak@example.com"),
            display_name: String::from("Weak"),
            password: String::from("short"),
            password_confirmation: String::from("short"),
            role: String::from("Member"),
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
}

#[test]
fn test_create_account_rejects_unknown_role() {
    let mut env: TestEnv = seeded_env();
    let admin = env.admin.clone();

    let result = handlers::create_account(
        &mut env.persistence,
        &admin,
        &CreateAccountRequest {
            email: String::from("role@example.com"),
            display_name: String::from("Role"),
            password: String::from("R0le-Passw0rd!!"),
            password_confirmation: String::from("R0le-Passw0rd!!"),
            role: String::from("Wizard"),
        },
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_change_password_requires_current_password() {
    let mut env: TestEnv = seeded_env();

    let account = env
        .persistence
        .get_account_by_id(env.member.account_id)
        .unwrap()
        .unwrap();

    let wrong = handlers::change_password(
        &mut env.persistence,
        &account,
        &ChangePasswordRequest {
            current_password: String::from("not-the-password"),
            new_password: String::from("Fresh-Passw0rd!!"),
            new_password_confirmation: String::from("Fresh-Passw0rd!!"),
        },
    );
    assert!(matches!(wrong, Err(ApiError::AuthenticationFailed { .. })));

    handlers::change_password(
        &mut env.persistence,
        &account,
        &ChangePasswordRequest {
            current_password: String::from("M3mber-Passw0rd!"),
            new_password: String::from("Fresh-Passw0rd!!"),
            new_password_confirmation: String::from("Fresh-Passw0rd!!"),
        },
    )
    .unwrap();

    // Old password no longer works
    assert!(
        handlers::login(
            &mut env.persistence,
            &LoginRequest {
                email: String::from("member@example.com"),
                password: String::from("M3mber-Passw0rd!"),
            },
        )
        .is_err()
    );
    assert!(
        handlers::login(
            &mut env.persistence,
            &LoginRequest {
                email: String::from("member@example.com"),
                password: String::from("Fresh-Passw0rd!!"),
            },
        )
        .is_ok()
    );
}

#[test]
fn test_disable_then_enable_account() {
    let mut env: TestEnv = seeded_env();
    let admin = env.admin.clone();

    handlers::disable_account(&mut env.persistence, &admin, env.member.account_id).unwrap();
    handlers::enable_account(&mut env.persistence, &admin, env.member.account_id).unwrap();

    assert!(
        handlers::login(
            &mut env.persistence,
            &LoginRequest {
                email: String::from("member@example.com"),
                password: String::from("M3mber-Passw0rd!"),
            },
        )
        .is_ok()
    );
}

#[test]
fn test_disable_unknown_account_is_not_found() {
    let mut env: TestEnv = seeded_env();
    let admin = env.admin.clone();

    let result = handlers::disable_account(&mut env.persistence, &admin, 9999);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
