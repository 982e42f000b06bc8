//! Card Store
//!
//! Mapping from item key to [`CardState`]. Keys are unique and iteration order
//! is unspecified; anything that needs a stable order sorts explicitly.

use std::collections::HashMap;
use std::collections::hash_map;

use crate::card::CardState;

/// Owned by exactly one session at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardStore {
    cards: HashMap<String, CardState>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CardState> {
        self.cards.get(key)
    }

    /// Insert or replace the card stored under `card.key`.
    pub fn insert(&mut self, card: CardState) -> Option<CardState> {
        self.cards.insert(card.key.clone(), card)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cards.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> hash_map::Values<'_, String, CardState> {
        self.cards.values()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, String, CardState> {
        self.cards.keys()
    }
}

impl FromIterator<CardState> for CardStore {
    fn from_iter<T: IntoIterator<Item = CardState>>(iter: T) -> Self {
        Self {
            cards: iter.into_iter().map(|card| (card.key.clone(), card)).collect(),
        }
    }
}

impl IntoIterator for CardStore {
    type Item = CardState;
    type IntoIter = hash_map::IntoValues<String, CardState>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_values()
    }
}

impl<'a> IntoIterator for &'a CardStore {
    type Item = &'a CardState;
    type IntoIter = hash_map::Values<'a, String, CardState>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.values()
    }
}
