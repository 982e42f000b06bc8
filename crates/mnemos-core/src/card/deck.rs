//! Deck-level state

use serde::{Deserialize, Serialize};

/// Aggregate counts over a deck, recomputed after every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    /// Learning cards past `step_due` plus graduated cards past `due`
    pub due_count: usize,
    pub learning_count: usize,
    pub graduated_count: usize,
    /// Cards created so far
    pub total_introduced: usize,
    /// Items the deck could ever introduce
    pub total_available: usize,
}

impl DeckStats {
    /// Items not yet introduced
    pub fn remaining(&self) -> usize {
        self.total_available.saturating_sub(self.total_introduced)
    }
}

/// Session-wide state persisted next to the card store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckState {
    /// Card currently presented to the learner
    pub current_card_key: Option<String>,
    /// Easy grades in a row across all cards
    #[serde(default, deserialize_with = "super::state::saturating_u32")]
    pub consecutive_easy_count: u32,
    #[serde(default)]
    pub stats: DeckStats,
}

impl DeckState {
    pub fn new() -> Self {
        Self::default()
    }
}
