// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection management.
//!
//! Everything here is `SQLite`-only: PRAGMA configuration, embedded
//! migrations, and the `last_insert_rowid()` workaround for inserts whose
//! ID the caller needs. Domain queries and mutations stay backend-agnostic
//! and live in `queries/` and `mutations/`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// Embedded `SQLite` migrations, applied on every open.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens a `SQLite` database, turns on foreign keys, and applies pending
/// migrations.
///
/// `database_url` may be a file path or a `file:...?mode=memory` URL.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, the PRAGMA
/// fails, or a migration fails.
pub fn open(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!("Opening SQLite database at {database_url}");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    // Off by default in SQLite; the schema relies on it
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    info!("Applying SQLite migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Switches a file-backed database to WAL journaling.
///
/// WAL lets readers proceed while a write is in flight, which matters for
/// file-based deployments; in-memory databases ignore it.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}

/// Returns the rowid of the most recent insert on this connection.
///
/// `SQLite` cannot attach a `RETURNING` clause to every insert shape, so
/// inserts that need their generated ID call this immediately afterwards,
/// on the same connection.
///
/// # Errors
///
/// Returns an error if the lookup query fails.
pub fn last_insert_id(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Row shape of `PRAGMA foreign_keys`. Diesel has no PRAGMA DSL, so this
/// one check stays raw SQL.
#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement is on.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if enforcement is off, or a
/// query error if the PRAGMA cannot be read.
pub fn assert_foreign_keys_enabled(
    conn: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}
