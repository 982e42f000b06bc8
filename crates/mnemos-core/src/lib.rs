//! # Mnemos Core
//!
//! Spaced repetition scheduler that blends a short-term learning box with a
//! long-term memory-decay model:
//!
//! - **Learning Box**: Leitner-style step ladder (1 min, 10 min by default)
//!   that every new item climbs before the long-term model takes over
//! - **Power-Law Decay**: `R = exp(-(t/S)^beta)` retrievability with
//!   FSRS-style stability and difficulty updates
//! - **Interleaving**: a card never repeats while other due or waiting cards
//!   are available
//! - **Load-Bounded Introduction**: new items enter only while the learning
//!   box is below target, or after a streak of easy grades
//! - **Practice Mode**: weakest-first drilling once nothing is due
//!
//! The engine is pure: every operation takes "now" as an argument and
//! returns new state. [`ReviewSession`] wraps the engine in a single
//! grade-event transaction, and [`storage`] persists sessions as versioned
//! snapshots.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use mnemos_core::{Grade, ReviewSession, SrsConfig};
//!
//! let items = vec!["hola".to_string(), "adiós".to_string(), "gracias".to_string()];
//! let mut session = ReviewSession::new(items, SrsConfig::default(), Utc::now());
//!
//! let key = session.current_card().map(|c| c.key.clone()).unwrap();
//! let outcome = session.handle_grade(&key, Grade::Good, Utc::now()).unwrap();
//! println!("next up: {:?} ({})", outcome.next_key(), outcome.selection.source);
//! ```
//!
//! ## Persistence
//!
//! ```rust
//! use chrono::Utc;
//! use mnemos_core::storage::{load_snapshot, save_snapshot, SqliteStore};
//! use mnemos_core::{ReviewSession, SrsConfig};
//!
//! # fn main() -> mnemos_core::storage::Result<()> {
//! let store = SqliteStore::open_in_memory()?;
//! let items = vec!["hola".to_string()];
//!
//! let snapshot = load_snapshot(&store, "spanish")?;
//! let session = ReviewSession::restore(snapshot, items, SrsConfig::default(), Utc::now());
//! save_snapshot(&store, "spanish", &session.snapshot(Utc::now()))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): compile SQLite into the binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod config;
pub mod decay;
pub mod engine;
pub mod session;
pub mod storage;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use card::{
    CardState, CardStore, DeckState, DeckStats, Grade, Item, LearningState, Phase, StudyItem,
};
pub use config::SrsConfig;
pub use decay::{format_interval, MemoryModel, MemoryUpdate, PowerDecayModel};
pub use engine::{
    compute_retention, compute_stats, grade_card, initialize_deck, introduce_next, select_next,
    KeyFilter, RetentionSummary, Selection, SelectionSource, Transition, TransitionKind,
};
pub use session::{GradeOutcome, RecentWindow, ReviewSession};
pub use storage::{
    load_snapshot, save_snapshot, MemoryStore, Result, Snapshot, SnapshotError, SnapshotStore,
    SqliteStore, StoreError, SNAPSHOT_VERSION,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CardState, DeckStats, Grade, GradeOutcome, Item, MemoryModel, Phase, PowerDecayModel,
        ReviewSession, Selection, SelectionSource, SnapshotStore, SqliteStore, SrsConfig,
        StudyItem,
    };
}
