//! Introducer
//!
//! Admits not-yet-seen items to the learning box, in the caller's item order.

use chrono::{DateTime, Utc};
use tracing::info;

use super::selector::KeyFilter;
use super::stats::compute_stats;
use crate::card::{CardState, CardStore, DeckState, StudyItem};
use crate::config::SrsConfig;

/// Fresh deck holding the first `min(target_learning_count, items)` items.
pub fn initialize_deck<I: StudyItem>(
    items: &[I],
    config: &SrsConfig,
    now: DateTime<Utc>,
) -> (CardStore, DeckState) {
    let mut store = CardStore::new();
    let mut first_key = None;

    while store.len() < config.target_learning_count {
        match introduce_next(&mut store, items, config, None, now) {
            Some(key) => {
                first_key.get_or_insert(key);
            }
            None => break,
        }
    }

    let deck = DeckState {
        current_card_key: first_key,
        consecutive_easy_count: 0,
        stats: compute_stats(&store, items.len(), None, now),
    };

    info!("Initialized deck with {} of {} items", store.len(), items.len());
    (store, deck)
}

/// Create a card for the first item without one. Returns its key, or `None`
/// once every in-scope item has been introduced.
pub fn introduce_next<I: StudyItem>(
    store: &mut CardStore,
    items: &[I],
    config: &SrsConfig,
    filter: KeyFilter<'_>,
    now: DateTime<Utc>,
) -> Option<String> {
    let item = items.iter().find(|item| {
        let key = item.key();
        !store.contains(key) && filter.is_none_or(|f| f(key))
    })?;

    let key = item.key().to_string();
    store.insert(CardState::new(key.clone(), now, config));
    info!("Introduced {} ({} cards)", key, store.len());
    Some(key)
}
