//! SQLite-backed snapshot storage.
//!
//! A single `kv` table holds the serialized store under its storage key.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, StateStorage};
use crate::error::StorageError;

/// SQLite database holding the persisted store snapshot.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open the database at `<data_dir>/tinywins.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("tinywins.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::OpenFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );",
        )?;
        Ok(())
    }
}

impl StateStorage for SqliteStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = SqliteStorage::open_memory().unwrap();
        assert!(db.read("test").unwrap().is_none());
        db.write("test", "hello").unwrap();
        assert_eq!(db.read("test").unwrap().unwrap(), "hello");
        db.write("test", "again").unwrap();
        assert_eq!(db.read("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tinywins.db");
        {
            let db = SqliteStorage::open_at(&path).unwrap();
            db.write("k", "v").unwrap();
        }
        let db = SqliteStorage::open_at(&path).unwrap();
        assert_eq!(db.read("k").unwrap().as_deref(), Some("v"));
    }
}
