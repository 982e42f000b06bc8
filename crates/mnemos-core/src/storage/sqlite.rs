//! SQLite snapshot store
//!
//! One row per deck holding the serialized snapshot. A single connection is
//! shared behind a mutex, so the store is `Send + Sync` and every method
//! takes `&self`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use super::migrations::apply_migrations;
use super::{Result, SnapshotStore, StoreError};

/// Database file name inside the platform data directory
pub const DATABASE_FILE: &str = "mnemos.db";

/// Snapshot store backed by a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Apply PRAGMAs to a fresh connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Platform data directory location of the default database.
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "mnemos", "core").ok_or_else(|| {
            StoreError::Init("Could not determine project directories".to_string())
        })?;
        Ok(proj_dirs.data_dir().join(DATABASE_FILE))
    }

    /// Open (creating if needed) the database at `db_path`, or at
    /// [`SqliteStore::default_path`] when `None`.
    pub fn open(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700));
            }
        }

        let conn = Connection::open(&path)?;
        Self::configure_connection(&conn)?;
        apply_migrations(&conn)?;

        tracing::debug!("Opened snapshot store at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Init("Connection lock poisoned".into()))
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&self, deck_id: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let body = conn
            .query_row(
                "SELECT body FROM deck_snapshots WHERE deck_id = ?1",
                params![deck_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    fn save(&self, deck_id: &str, body: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO deck_snapshots (deck_id, body, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(deck_id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
            params![deck_id, body, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, deck_id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM deck_snapshots WHERE deck_id = ?1", params![deck_id])?;
        Ok(removed > 0)
    }

    fn list(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT deck_id FROM deck_snapshots ORDER BY deck_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }
}
