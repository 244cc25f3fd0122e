//! Key/value blob persistence backends.
//!
//! # Responsibility
//! - Define the opaque `get_item` / `set_item` contract the stores write to.
//! - Provide the SQLite-backed device implementation and an in-memory one.
//!
//! # Invariants
//! - Last write wins per key; no partial-write guarantees are promised.
//! - Backends never interpret the payload.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

pub type BlobResult<T> = Result<T, BlobError>;

#[derive(Debug)]
pub enum BlobError {
    Db(DbError),
    /// Backend refused the operation (read-only, quota, injected failure).
    Unavailable(String),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "blob storage unavailable: {reason}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for BlobError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque blob store keyed by a fixed name per entity collection.
pub trait BlobStore {
    fn get_item(&self, key: &str) -> BlobResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> BlobResult<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
    fn get_item(&self, key: &str) -> BlobResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> BlobResult<()> {
        (**self).set_item(key, value)
    }
}
