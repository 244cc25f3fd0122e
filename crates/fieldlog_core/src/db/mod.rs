//! On-device database holding the `kv_blobs` table that every collection
//! persists into.
//!
//! # Responsibility
//! - Open the fieldlog SQLite file and bring `kv_blobs` up to date.
//! - Refuse files written by a newer build instead of guessing at their layout.
//!
//! # Invariants
//! - The `kv_blobs` layout version is `PRAGMA user_version`.
//! - [`open_db`] and [`open_db_in_memory`] hand out a connection only after
//!   [`migrations::apply_migrations`] succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the fieldlog database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a later build; its blobs are left untouched.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "fieldlog database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "kv_blobs schema version {db_version} was written by a newer fieldlog; \
                 this build migrates up to version {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
