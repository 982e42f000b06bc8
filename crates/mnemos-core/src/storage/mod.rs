//! Storage Module
//!
//! Key-value persistence for deck snapshots:
//! - [`SnapshotStore`]: load/save/remove serialized snapshots by deck id
//! - [`MemoryStore`]: in-process map, for tests and embedding
//! - [`SqliteStore`]: SQLite file with versioned migrations
//!
//! The scheduling engine never touches storage. Sessions are persisted by the
//! caller through [`load_snapshot`] and [`save_snapshot`].

mod memory;
mod migrations;
mod snapshot;
mod sqlite;

pub use memory::MemoryStore;
pub use migrations::MIGRATIONS;
pub use snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotError, SNAPSHOT_VERSION};
pub use sqlite::SqliteStore;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Snapshot could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Key-value store of serialized snapshots, keyed by deck id.
///
/// Methods take `&self`; implementations handle their own locking.
pub trait SnapshotStore {
    /// Stored body for `deck_id`, if any
    fn load(&self, deck_id: &str) -> Result<Option<String>>;

    /// Insert or replace the body for `deck_id`
    fn save(&self, deck_id: &str, body: &str) -> Result<()>;

    /// Delete `deck_id`. Returns whether anything was removed.
    fn remove(&self, deck_id: &str) -> Result<bool>;

    /// All stored deck ids, sorted
    fn list(&self) -> Result<Vec<String>>;
}
