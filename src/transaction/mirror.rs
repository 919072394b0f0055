//! A best-effort local copy of the transaction list for offline continuity.
//!
//! The mirror is a single key in a SQLite key-value table holding the
//! JSON-serialized record sequence, most-recent-first. Reads and writes are
//! whole-value operations. The mirror is non-authoritative and is never
//! reconciled with the remote store: after a remote delete, the local copy
//! still holds the deleted record.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

use super::Transaction;

/// The key under which the serialized transaction list is stored.
const MIRROR_KEY: &str = "transactions";

/// The local key-value mirror of the transaction list.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    connection: Arc<Mutex<Connection>>,
}

impl LocalMirror {
    /// Create a mirror on top of `connection`, adding its table if needed.
    ///
    /// # Errors
    /// Returns an error if the table cannot be created.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Result<Self, Error> {
        {
            let connection = connection.lock().map_err(|_| Error::MirrorLockError)?;

            connection.execute(
                "CREATE TABLE IF NOT EXISTS mirror (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                    )",
                (),
            )?;
        }

        Ok(Self { connection })
    }

    /// Read the mirrored transaction list, most-recent-first.
    ///
    /// An empty mirror reads as an empty list.
    ///
    /// # Errors
    /// Returns an error if the mirror cannot be read or its contents cannot
    /// be deserialized.
    pub fn read(&self) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection.lock().map_err(|_| Error::MirrorLockError)?;

        let value: Option<String> = connection
            .query_row(
                "SELECT value FROM mirror WHERE key = :key",
                &[(":key", MIRROR_KEY)],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(value) => {
                serde_json::from_str(&value).map_err(|error| Error::MirrorError(error.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Prepend `transaction` to the mirrored list and write the whole value
    /// back.
    ///
    /// # Errors
    /// Returns an error if the mirror cannot be read, serialized or written.
    /// Callers on the write path treat this as best-effort: a mirror failure
    /// must not fail the overall operation.
    pub fn write(&self, transaction: &Transaction) -> Result<(), Error> {
        let mut transactions = self.read()?;
        transactions.insert(0, transaction.clone());

        let value = serde_json::to_string(&transactions)
            .map_err(|error| Error::MirrorError(error.to_string()))?;

        let connection = self.connection.lock().map_err(|_| Error::MirrorLockError)?;
        connection.execute(
            "INSERT OR REPLACE INTO mirror (key, value) VALUES (:key, :value)",
            &[(":key", MIRROR_KEY), (":value", value.as_str())],
        )?;

        Ok(())
    }
}
