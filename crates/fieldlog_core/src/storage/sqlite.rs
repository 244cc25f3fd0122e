use super::{BlobResult, BlobStore};
use rusqlite::{params, Connection, OptionalExtension};

/// Blob store over the migrated `kv_blobs` table.
///
/// Borrows the connection, so one connection can back every collection.
#[derive(Clone, Copy)]
pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn get_item(&self, key: &str) -> BlobResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_blobs WHERE storage_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn set_item(&self, key: &str, value: &str) -> BlobResult<()> {
        self.conn.execute(
            "INSERT INTO kv_blobs (storage_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
