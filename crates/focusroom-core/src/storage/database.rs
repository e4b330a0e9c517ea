//! SQLite-backed persistence.
//!
//! The session history lives in a key-value table as a single JSON array
//! (see [`crate::session`] for the record shape). Writing the whole array on
//! every change keeps the stored copy identical to the in-memory history.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::data_dir;
use super::store::SessionStore;
use crate::error::PersistenceError;
use crate::session::SessionRecord;

/// Key under which the history array is stored.
pub const SESSIONS_KEY: &str = "focus_sessions";

/// SQLite database holding the session history.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open the database at `<data_dir>/focusroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, PersistenceError> {
        Self::open_at(data_dir()?.join("focusroom.db"))
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| PersistenceError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self {
            conn,
            path: Some(path),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn, path: None };
        db.migrate()?;
        Ok(db)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn load(&self) -> Result<Option<Vec<SessionRecord>>, PersistenceError> {
        match self.kv_get(SESSIONS_KEY)? {
            Some(json) => {
                let sessions = serde_json::from_str(&json).map_err(PersistenceError::Decode)?;
                Ok(Some(sessions))
            }
            None => Ok(None),
        }
    }

    fn save(&self, sessions: &[SessionRecord]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(sessions).map_err(PersistenceError::Encode)?;
        self.kv_set(SESSIONS_KEY, &json)?;
        Ok(())
    }
}
