//! Study items
//!
//! The scheduler only needs two facts about a learnable item: its unique key
//! and whether it is "high effort" (long phrases, sentence patterns) and so
//! deserves extra learning-box practice before graduating.

use serde::{Deserialize, Serialize};

/// Anything the scheduler can introduce as a card.
pub trait StudyItem {
    /// Unique item key
    fn key(&self) -> &str;

    /// High-effort items are not graduated by a single easy grade.
    fn is_high_effort(&self) -> bool {
        false
    }
}

impl StudyItem for String {
    fn key(&self) -> &str {
        self
    }
}

impl StudyItem for &str {
    fn key(&self) -> &str {
        self
    }
}

/// Concrete item with an explicit effort flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub key: String,
    #[serde(default)]
    pub high_effort: bool,
}

impl Item {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            high_effort: false,
        }
    }

    pub fn high_effort(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            high_effort: true,
        }
    }
}

impl StudyItem for Item {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_high_effort(&self) -> bool {
        self.high_effort
    }
}

/// Effort flag for `key`, `false` when the item is not in `items`.
pub fn is_high_effort<I: StudyItem>(items: &[I], key: &str) -> bool {
    items
        .iter()
        .find(|item| item.key() == key)
        .is_some_and(StudyItem::is_high_effort)
}
