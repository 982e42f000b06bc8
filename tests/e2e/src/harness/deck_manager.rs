//! Test Deck Manager
//!
//! Provides an isolated snapshot database per test:
//! - A temporary SQLite file that is deleted with the manager
//! - A simulated clock so multi-day journeys run instantly
//! - Restart simulation by reopening the same database file

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use mnemos_core::storage::{load_snapshot, save_snapshot, SnapshotStore, SqliteStore};
use mnemos_core::{CardState, Grade, GradeOutcome, ReviewSession, SelectionSource, SrsConfig, StudyItem};
use tempfile::TempDir;

/// Time between two grades in a simulated sitting
pub const DEFAULT_THINK_TIME_SECS: i64 = 20;

/// Manager for test snapshot stores
///
/// # Example
///
/// ```rust,ignore
/// let mut db = TestDeckManager::new_temp();
/// let mut session = db.open_session("spanish", TestItems::spanish(10), SrsConfig::default());
/// db.study(&mut session, 50, |_| Grade::Good);
/// db.save("spanish", &session);
/// ```
pub struct TestDeckManager {
    pub store: SqliteStore,
    _temp_dir: TempDir,
    db_path: PathBuf,
    clock: DateTime<Utc>,
    think_time: Duration,
}

impl TestDeckManager {
    /// Fresh database in a temporary directory, clock at a fixed morning.
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_mnemos.db");
        let store = SqliteStore::open(Some(db_path.clone())).expect("Failed to create test store");

        let clock = DateTime::parse_from_rfc3339("2026-03-02T08:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);

        Self {
            store,
            _temp_dir: temp_dir,
            db_path,
            clock,
            think_time: Duration::seconds(DEFAULT_THINK_TIME_SECS),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    // ========================================================================
    // CLOCK
    // ========================================================================

    pub fn now(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn advance(&mut self, by: Duration) {
        self.clock += by;
    }

    pub fn set_think_time(&mut self, think_time: Duration) {
        self.think_time = think_time;
    }

    // ========================================================================
    // SESSIONS
    // ========================================================================

    /// Restore `deck_id` from the database, or start it fresh.
    pub fn open_session<I: StudyItem>(&self, deck_id: &str, items: Vec<I>, config: SrsConfig) -> ReviewSession<I> {
        let snapshot = load_snapshot(&self.store, deck_id).expect("Failed to load snapshot");
        ReviewSession::restore(snapshot, items, config, self.clock)
    }

    pub fn save<I: StudyItem>(&self, deck_id: &str, session: &ReviewSession<I>) {
        save_snapshot(&self.store, deck_id, &session.snapshot(self.clock)).expect("Failed to save snapshot");
    }

    /// Grade whatever the session offers until only practice remains or
    /// `max_events` grades have been given. The clock advances by the think
    /// time after every grade.
    pub fn study<I, F>(&mut self, session: &mut ReviewSession<I>, max_events: usize, mut grade_for: F) -> Vec<GradeOutcome>
    where
        I: StudyItem,
        F: FnMut(&CardState) -> Grade,
    {
        let mut outcomes = Vec::new();

        while outcomes.len() < max_events {
            session.refresh(self.clock);
            if matches!(
                session.selection().source,
                SelectionSource::Practice | SelectionSource::Complete
            ) {
                break;
            }
            let Some(card) = session.current_card().cloned() else {
                break;
            };

            let outcome = session
                .handle_grade(&card.key, grade_for(&card), self.clock)
                .expect("current card is always known");
            outcomes.push(outcome);
            self.clock += self.think_time;
        }

        outcomes
    }

    // ========================================================================
    // RAW STORE ACCESS
    // ========================================================================

    /// Simulate a process restart: drop the connection and reopen the file.
    pub fn reopen(&mut self) {
        self.store = SqliteStore::open(Some(self.db_path.clone())).expect("Failed to reopen test store");
    }

    pub fn write_raw(&self, deck_id: &str, body: &str) {
        self.store.save(deck_id, body).expect("Failed to write raw snapshot");
    }

    pub fn deck_ids(&self) -> Vec<String> {
        self.store.list().expect("Failed to list decks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_database_creation() {
        let db = TestDeckManager::new_temp();
        assert!(db.path().exists());
        assert!(db.deck_ids().is_empty());
    }

    #[test]
    fn test_study_stops_at_practice() {
        let mut db = TestDeckManager::new_temp();
        let items: Vec<String> = ["uno", "dos"].iter().map(|k| k.to_string()).collect();
        let mut session = db.open_session("numbers", items, SrsConfig::default());

        let outcomes = db.study(&mut session, 100, |_| Grade::Good);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(session.selection().source, SelectionSource::Practice);
        assert_eq!(db.now(), DateTime::parse_from_rfc3339("2026-03-02T08:00:40Z").unwrap());
    }

    #[test]
    fn test_saved_deck_survives_reopen() {
        let mut db = TestDeckManager::new_temp();
        let session = db.open_session("numbers", vec!["uno".to_string()], SrsConfig::default());
        db.save("numbers", &session);

        db.reopen();
        assert_eq!(db.deck_ids(), vec!["numbers".to_string()]);
    }
}
