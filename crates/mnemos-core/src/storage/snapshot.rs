//! Deck snapshots
//!
//! The persisted form of a session: every card plus the deck state, tagged
//! with a format version. A snapshot is all-or-nothing. A wrong version or a
//! structurally invalid record is discarded, never partially migrated.
//! Out-of-range numbers inside an otherwise valid record are clamped.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Result, SnapshotStore};
use crate::card::{CardState, CardStore, DeckState, StudyItem};
use crate::config::SrsConfig;

/// Current snapshot format. Older generations lack learning-box fields.
pub const SNAPSHOT_VERSION: u32 = 3;

/// Why a snapshot was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Version tag missing or different
    #[error("Snapshot version {found:?} does not match {expected}")]
    VersionMismatch { found: Option<u64>, expected: u32 },
    /// Not valid JSON, or a required field is missing
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A card stored under a key other than its own
    #[error("Card {card_key} stored under key {map_key}")]
    KeyMismatch { map_key: String, card_key: String },
    /// None of the stored cards belong to the current item pool
    #[error("No stored card matches the available items")]
    NoMatchingCards,
}

/// Serialized scheduler state of one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub cards: BTreeMap<String, CardState>,
    pub deck: DeckState,
    /// Keys shown most recently, oldest first
    #[serde(default)]
    pub recent_keys: Vec<String>,
}

impl Snapshot {
    pub fn capture(store: &CardStore, deck: &DeckState, recent_keys: &[String], now: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: now,
            cards: store.iter().map(|c| (c.key.clone(), c.clone())).collect(),
            deck: deck.clone(),
            recent_keys: recent_keys.to_vec(),
        }
    }

    /// Parse a stored body. The version tag is checked before the record is
    /// deserialized, so an old format is reported as a version mismatch.
    pub fn parse(body: &str) -> std::result::Result<Self, SnapshotError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        let found = value.get("version").and_then(serde_json::Value::as_u64);
        if found != Some(u64::from(SNAPSHOT_VERSION)) {
            return Err(SnapshotError::VersionMismatch {
                found,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a card store for `items`.
    ///
    /// Numeric fields are clamped, cards for items no longer offered are
    /// dropped, and the deck's current card is cleared if it was dropped.
    pub fn into_deck<I: StudyItem>(
        self,
        items: &[I],
        config: &SrsConfig,
    ) -> std::result::Result<(CardStore, DeckState), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: Some(u64::from(self.version)),
                expected: SNAPSHOT_VERSION,
            });
        }

        let offered: HashSet<&str> = items.iter().map(StudyItem::key).collect();
        let total = self.cards.len();
        let mut store = CardStore::new();

        for (map_key, mut card) in self.cards {
            if map_key != card.key {
                return Err(SnapshotError::KeyMismatch {
                    map_key,
                    card_key: card.key,
                });
            }
            if !offered.contains(card.key.as_str()) {
                continue;
            }
            card.clamp_to_bounds(config);
            store.insert(card);
        }

        if store.is_empty() && total > 0 {
            return Err(SnapshotError::NoMatchingCards);
        }
        if store.len() < total {
            warn!("Dropped {} cards no longer in the item pool", total - store.len());
        }

        let mut deck = self.deck;
        if deck
            .current_card_key
            .as_deref()
            .is_some_and(|key| !store.contains(key))
        {
            deck.current_card_key = None;
        }

        Ok((store, deck))
    }
}

/// Load the snapshot for `deck_id`.
///
/// A body that fails to parse is logged, removed from the store, and
/// reported as absent so the caller starts a fresh deck.
pub fn load_snapshot<S: SnapshotStore + ?Sized>(store: &S, deck_id: &str) -> Result<Option<Snapshot>> {
    let Some(body) = store.load(deck_id)? else {
        return Ok(None);
    };

    match Snapshot::parse(&body) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) => {
            warn!("Discarding snapshot for deck {}: {}", deck_id, e);
            store.remove(deck_id)?;
            Ok(None)
        }
    }
}

/// Persist `snapshot` as the current state of `deck_id`.
pub fn save_snapshot<S: SnapshotStore + ?Sized>(store: &S, deck_id: &str, snapshot: &Snapshot) -> Result<()> {
    store.save(deck_id, &snapshot.to_json()?)
}
