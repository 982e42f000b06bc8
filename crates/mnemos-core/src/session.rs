//! Review Session
//!
//! Owns one deck's card store and deck state and runs each grade event as a
//! single transaction:
//!
//! 1. phase transition for the graded card
//! 2. selection of the next card
//! 3. introduction of a new item when the selection asks for one, then a
//!    second selection
//! 4. stats recomputation
//!
//! Callers only ever observe the settled state after step 4. A session does
//! no I/O; persistence goes through [`Snapshot`] at session boundaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::card::{is_high_effort, CardState, CardStore, DeckState, DeckStats, Grade, StudyItem};
use crate::config::SrsConfig;
use crate::decay::{MemoryModel, MemoryUpdate, PowerDecayModel};
use crate::engine::{
    compute_retention, compute_stats, grade_card, initialize_deck, introduce_next, select_next,
    RetentionSummary, Selection, SelectionSource, TransitionKind,
};
use crate::storage::{Snapshot, SNAPSHOT_VERSION};

// ============================================================================
// RECENT WINDOW
// ============================================================================

/// The last few keys shown, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentWindow {
    capacity: usize,
    keys: Vec<String>,
}

impl RecentWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Record `key` as the most recent. A key already in the window moves to
    /// the end instead of appearing twice.
    pub fn push(&mut self, key: &str) {
        if self.capacity == 0 {
            return;
        }
        self.keys.retain(|k| k != key);
        self.keys.push(key.to_string());
        if self.keys.len() > self.capacity {
            let excess = self.keys.len() - self.capacity;
            self.keys.drain(..excess);
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

// ============================================================================
// GRADE OUTCOME
// ============================================================================

/// Settled result of one [`ReviewSession::handle_grade`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    /// The graded card after its transition
    pub card: CardState,
    pub kind: TransitionKind,
    /// Item admitted to the learning box during this event
    pub introduced: Option<String>,
    pub selection: Selection,
    pub stats: DeckStats,
}

impl GradeOutcome {
    pub fn next_key(&self) -> Option<&str> {
        self.selection.next_key.as_deref()
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// A single learner's session over one deck.
#[derive(Debug, Clone)]
pub struct ReviewSession<I: StudyItem, M: MemoryModel = PowerDecayModel> {
    items: Vec<I>,
    config: SrsConfig,
    model: M,
    store: CardStore,
    deck: DeckState,
    recent: RecentWindow,
    selection: Selection,
}

impl<I: StudyItem> ReviewSession<I, PowerDecayModel> {
    /// Fresh deck over `items`.
    pub fn new(items: Vec<I>, config: SrsConfig, now: DateTime<Utc>) -> Self {
        let config = config.sanitized();
        let model = PowerDecayModel::from_config(&config);
        Self::with_model(items, config, model, now)
    }

    /// Resume from a stored snapshot, or start fresh when there is none or it
    /// cannot be used.
    pub fn restore(
        snapshot: Option<Snapshot>,
        items: Vec<I>,
        config: SrsConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let config = config.sanitized();
        let model = PowerDecayModel::from_config(&config);
        Self::restore_with_model(snapshot, items, config, model, now)
    }
}

impl<I: StudyItem, M: MemoryModel> ReviewSession<I, M> {
    /// Fresh deck scheduled by a custom memory model.
    pub fn with_model(items: Vec<I>, config: SrsConfig, model: M, now: DateTime<Utc>) -> Self {
        let config = config.sanitized();
        let (store, deck) = initialize_deck(&items, &config, now);
        let recent = RecentWindow::new(config.recent_window());
        Self::assemble(items, config, model, store, deck, recent, now)
    }

    pub fn restore_with_model(
        snapshot: Option<Snapshot>,
        items: Vec<I>,
        config: SrsConfig,
        model: M,
        now: DateTime<Utc>,
    ) -> Self {
        let config = config.sanitized();
        let Some(snapshot) = snapshot else {
            return Self::with_model(items, config, model, now);
        };

        let recent_keys = snapshot.recent_keys.clone();
        match snapshot.into_deck(&items, &config) {
            Ok((store, deck)) => {
                info!("Restored deck with {} cards", store.len());
                let mut recent = RecentWindow::new(config.recent_window());
                for key in recent_keys.iter().filter(|k| store.contains(k)) {
                    recent.push(key);
                }
                Self::assemble(items, config, model, store, deck, recent, now)
            }
            Err(e) => {
                warn!("Discarding snapshot: {}", e);
                Self::with_model(items, config, model, now)
            }
        }
    }

    fn assemble(
        items: Vec<I>,
        config: SrsConfig,
        model: M,
        store: CardStore,
        deck: DeckState,
        recent: RecentWindow,
        now: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            items,
            config,
            model,
            store,
            deck,
            recent,
            selection: Selection {
                next_key: None,
                should_introduce_new: false,
                source: SelectionSource::Complete,
                all_complete: false,
            },
        };
        session.settle(now);
        session
    }

    /// Select, introduce if asked, reselect, refresh stats.
    ///
    /// Returns the key introduced, if any.
    fn settle(&mut self, now: DateTime<Utc>) -> Option<String> {
        let mut selection = self.select(now);
        let mut introduced = None;

        if selection.should_introduce_new {
            introduced = introduce_next(&mut self.store, &self.items, &self.config, None, now);
            if introduced.is_some() {
                if self.deck.consecutive_easy_count >= self.config.consecutive_easy_threshold {
                    debug!(
                        "Easy streak of {} consumed by introduction",
                        self.deck.consecutive_easy_count
                    );
                    self.deck.consecutive_easy_count = 0;
                }
                selection = self.select(now);
            }
        }

        self.deck.current_card_key = selection.next_key.clone();
        self.deck.stats = compute_stats(&self.store, self.items.len(), None, now);
        self.selection = selection;
        introduced
    }

    fn select(&self, now: DateTime<Utc>) -> Selection {
        select_next(
            &self.store,
            &self.deck,
            &self.items,
            &self.config,
            self.recent.keys(),
            None,
            now,
        )
    }

    /// Apply `grade` to the card `key` and settle the deck.
    ///
    /// Unknown keys leave the session untouched and return `None`.
    pub fn handle_grade(&mut self, key: &str, grade: Grade, now: DateTime<Utc>) -> Option<GradeOutcome> {
        let Some(card) = self.store.get(key) else {
            warn!("Ignoring {} grade for unknown card {}", grade, key);
            return None;
        };

        let high_effort = is_high_effort(&self.items, key);
        let transition = grade_card(card, &self.deck, grade, &self.config, &self.model, high_effort, now);

        self.store.insert(transition.card.clone());
        self.deck = transition.deck;
        self.recent.push(key);

        let introduced = self.settle(now);

        Some(GradeOutcome {
            card: transition.card,
            kind: transition.kind,
            introduced,
            selection: self.selection.clone(),
            stats: self.deck.stats,
        })
    }

    /// Re-run selection at `now` without grading, e.g. once a waiting card's
    /// step has come due.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> &Selection {
        self.settle(now);
        &self.selection
    }

    /// Throw away all progress and start over from the item list.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        let (store, deck) = initialize_deck(&self.items, &self.config, now);
        self.store = store;
        self.deck = deck;
        self.recent.clear();
        self.settle(now);
        info!("Deck reset");
    }

    /// Persistable state as of `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot::capture(&self.store, &self.deck, self.recent.keys(), now)
    }

    /// Card the learner should see now
    pub fn current_card(&self) -> Option<&CardState> {
        self.selection
            .next_key
            .as_deref()
            .and_then(|key| self.store.get(key))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stats(&self) -> DeckStats {
        self.deck.stats
    }

    pub fn deck(&self) -> &DeckState {
        &self.deck
    }

    pub fn cards(&self) -> &CardStore {
        &self.store
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn config(&self) -> &SrsConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn recent_keys(&self) -> &[String] {
        self.recent.keys()
    }

    /// Retrievability distribution of reviewed cards.
    pub fn retention(&self, now: DateTime<Utc>) -> RetentionSummary {
        compute_retention(&self.store, &self.model, None, now)
    }

    /// What each grade would do to `key`'s memory state.
    pub fn preview(&self, key: &str, now: DateTime<Utc>) -> Option<[MemoryUpdate; 4]> {
        self.store.get(key).map(|card| self.model.preview(card, now))
    }
}

impl ReviewSession<String, PowerDecayModel> {
    /// Practice session over the graduated cards of several decks.
    ///
    /// Nothing new is ever introduced. When the same key appears in more than
    /// one snapshot the first occurrence wins. Invalid snapshots are skipped.
    pub fn practice<S>(snapshots: S, config: SrsConfig, now: DateTime<Utc>) -> Self
    where
        S: IntoIterator<Item = Snapshot>,
    {
        let config = config.sanitized();
        let mut cards: BTreeMap<String, CardState> = BTreeMap::new();

        for snapshot in snapshots {
            if snapshot.version != SNAPSHOT_VERSION {
                warn!("Skipping snapshot version {} in practice deck", snapshot.version);
                continue;
            }
            for (key, mut card) in snapshot.cards {
                if key != card.key || !card.is_graduated() {
                    continue;
                }
                card.clamp_to_bounds(&config);
                cards.entry(key).or_insert(card);
            }
        }

        let items: Vec<String> = cards.keys().cloned().collect();
        let store: CardStore = cards.into_values().collect();
        info!("Practice deck with {} graduated cards", store.len());

        let model = PowerDecayModel::from_config(&config);
        let recent = RecentWindow::new(config.recent_window());
        Self::assemble(items, config, model, store, DeckState::new(), recent, now)
    }
}
