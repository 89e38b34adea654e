// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific connection plumbing.
//!
//! Diesel needs concrete connection types, so everything that differs
//! between `SQLite` and `MySQL`/`MariaDB` (opening a connection, applying
//! migrations, retrieving insert IDs, integrity checks) lives behind this
//! module. The rest of the crate speaks `PersistenceBackend` or plain
//! Diesel DSL and never branches on the engine.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Engine-specific operations the backend-agnostic code needs.
pub trait PersistenceBackend: Connection {
    /// Returns the auto-generated ID of the most recent insert on this
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup query fails.
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError>;

    /// Fails unless the engine enforces foreign keys on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off or the check query fails.
    fn assert_foreign_keys_enabled(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError> {
        sqlite::last_insert_id(self)
    }

    fn assert_foreign_keys_enabled(&mut self) -> Result<(), PersistenceError> {
        sqlite::assert_foreign_keys_enabled(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError> {
        mysql::last_insert_id(self)
    }

    fn assert_foreign_keys_enabled(&mut self) -> Result<(), PersistenceError> {
        mysql::assert_foreign_keys_enabled(self)
    }
}
