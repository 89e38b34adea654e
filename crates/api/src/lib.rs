// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the courtkeep booking system.
//!
//! This crate sits between the HTTP server and the domain/persistence
//! layers. It owns:
//!
//! - Authentication (bcrypt-verified logins, opaque session tokens)
//! - Authorization (role checks per action)
//! - Request/response DTOs, which are distinct from domain types
//! - Handler functions that validate via `courtkeep-domain` and persist
//!   via `courtkeep-persistence`
//! - Explicit error translation so domain and persistence errors never
//!   leak through the API surface

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf
)]
#![allow(clippy::multiple_crate_versions)]

pub mod auth;
pub mod csv_import;
pub mod error;
pub mod handlers;
pub mod password_policy;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use error::{ApiError, AuthError, translate_domain_error};
