// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `MySQL`/`MariaDB` connection management.
//!
//! The `MySQL` backend exists for explicit, opt-in validation that the
//! schema and queries behave identically on a second engine; nothing in
//! the standard workflow connects to it. `cargo xtask test-mariadb`
//! provisions a throwaway container, points `DATABASE_URL` at it, and
//! runs the `#[ignore]`d validation tests against this module.
//!
//! The embedded migrations in `migrations_mysql/` must stay semantically
//! identical to the `SQLite` set in `migrations/`: same tables, columns,
//! constraints, and indexes, differing only in syntax (`AUTO_INCREMENT`
//! vs `AUTOINCREMENT`, `VARCHAR` vs `TEXT`). A schema change lands in
//! both directories or in neither.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, MysqlConnection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// Embedded `MySQL` migrations, applied on every open.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Opens a `MySQL`/`MariaDB` database and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the connection cannot be established or a
/// migration fails.
pub fn open(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Opening MySQL database");

    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    info!("Applying MySQL migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Returns the auto-increment ID of the most recent insert on this
/// connection, via `LAST_INSERT_ID()`.
///
/// # Errors
///
/// Returns an error if the lookup query fails.
pub fn last_insert_id(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// Row shape of the `@@foreign_key_checks` session variable.
#[derive(QueryableByName)]
struct ForeignKeyChecks {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Fails unless `foreign_key_checks` is on for this session (the InnoDB
/// default).
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if enforcement is off, or a
/// query error if the variable cannot be read.
pub fn assert_foreign_keys_enabled(
    conn: &mut MysqlConnection,
) -> Result<(), PersistenceError> {
    let row: ForeignKeyChecks =
        diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks").get_result(conn)?;
    if row.fk_checks == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}
