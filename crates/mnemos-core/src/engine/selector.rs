//! Card Selector
//!
//! Picks the next card to show. Cards are partitioned into tiers and the
//! first non-empty tier wins:
//!
//! 1. learning cards whose step is due, earliest first
//! 2. graduated cards that are due, earliest first
//! 3. room in the learning box (or an easy streak) and un-introduced items
//!    remain: ask the caller to introduce one
//! 4. learning cards still waiting on their step, earliest first
//! 5. practice: graduated cards not yet due, weakest first
//! 6. nothing at all: the deck is complete
//!
//! Keys shown recently are skipped while any other due or waiting card
//! exists. Ties are always broken by key, so the result depends only on the
//! inputs.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::{CardState, CardStore, DeckState, StudyItem};
use crate::config::SrsConfig;

/// Optional restriction of the cards and items in scope, by key.
pub type KeyFilter<'a> = Option<&'a dyn Fn(&str) -> bool>;

/// Which tier produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionSource {
    Learning,
    Review,
    New,
    LearningWaiting,
    Practice,
    Complete,
}

impl SelectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionSource::Learning => "learning",
            SelectionSource::Review => "review",
            SelectionSource::New => "new",
            SelectionSource::LearningWaiting => "learning-waiting",
            SelectionSource::Practice => "practice",
            SelectionSource::Complete => "complete",
        }
    }
}

impl std::fmt::Display for SelectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next-card decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub next_key: Option<String>,
    /// The caller should run the introducer, then select again
    pub should_introduce_new: bool,
    pub source: SelectionSource,
    pub all_complete: bool,
}

impl Selection {
    fn pick(card: &CardState, source: SelectionSource, should_introduce_new: bool) -> Self {
        Self {
            next_key: Some(card.key.clone()),
            should_introduce_new,
            source,
            all_complete: false,
        }
    }
}

#[derive(Default)]
struct Tiers<'a> {
    learning_due: Vec<&'a CardState>,
    waiting: Vec<&'a CardState>,
    review_due: Vec<&'a CardState>,
    practice: Vec<&'a CardState>,
}

fn by_time_then_key(
    time: fn(&CardState) -> DateTime<Utc>,
) -> impl Fn(&&CardState, &&CardState) -> Ordering {
    move |a: &&CardState, b: &&CardState| time(a).cmp(&time(b)).then_with(|| a.key.cmp(&b.key))
}

fn by_stability_then_key(a: &&CardState, b: &&CardState) -> Ordering {
    a.stability
        .total_cmp(&b.stability)
        .then_with(|| a.key.cmp(&b.key))
}

fn partition<'a>(
    store: &'a CardStore,
    filter: KeyFilter<'_>,
    config: &SrsConfig,
    now: DateTime<Utc>,
) -> Tiers<'a> {
    let mut tiers = Tiers::default();
    let mut not_due = Vec::new();

    for card in store.iter() {
        if filter.is_some_and(|f| !f(&card.key)) {
            continue;
        }
        match (card.is_learning(), card.is_due(now)) {
            (true, true) => tiers.learning_due.push(card),
            (true, false) => tiers.waiting.push(card),
            (false, true) => tiers.review_due.push(card),
            (false, false) => not_due.push(card),
        }
    }

    tiers.learning_due.sort_by(by_time_then_key(|c| c.step_due));
    tiers.waiting.sort_by(by_time_then_key(|c| c.step_due));
    tiers.review_due.sort_by(by_time_then_key(|c| c.due));

    let almost_due: Vec<&CardState> = match config.almost_due_threshold() {
        Some(window) => not_due
            .iter()
            .copied()
            .filter(|c| c.due <= now + window)
            .collect(),
        None => Vec::new(),
    };
    tiers.practice = if almost_due.is_empty() { not_due } else { almost_due };
    tiers.practice.sort_by(by_stability_then_key);

    tiers
}

/// Choose the next card.
///
/// `recent_keys` lists the keys shown most recently, oldest first. Only the
/// last `min_interleave_count` of them are considered.
pub fn select_next<I: StudyItem>(
    store: &CardStore,
    deck: &DeckState,
    items: &[I],
    config: &SrsConfig,
    recent_keys: &[String],
    filter: KeyFilter<'_>,
    now: DateTime<Utc>,
) -> Selection {
    let mut tiers = partition(store, filter, config, now);

    let learning_count = tiers.learning_due.len() + tiers.waiting.len();
    let remaining_items = items.iter().any(|item| {
        let key = item.key();
        !store.contains(key) && filter.is_none_or(|f| f(key))
    });
    let streak_forces_introduction = deck.consecutive_easy_count >= config.consecutive_easy_threshold;
    let should_introduce_new = remaining_items
        && (learning_count < config.target_learning_count || streak_forces_introduction);

    let window = config.recent_window();
    let recent: HashSet<&str> = recent_keys
        .iter()
        .skip(recent_keys.len().saturating_sub(window))
        .map(String::as_str)
        .collect();

    if !recent.is_empty() {
        let is_fresh = |c: &&CardState| !recent.contains(c.key.as_str());
        let has_fresh_candidate = tiers.learning_due.iter().any(is_fresh)
            || tiers.review_due.iter().any(is_fresh)
            || tiers.waiting.iter().any(is_fresh);

        if has_fresh_candidate {
            tiers.learning_due.retain(is_fresh);
            tiers.review_due.retain(is_fresh);
            tiers.waiting.retain(is_fresh);
        }
        if tiers.practice.iter().any(is_fresh) {
            tiers.practice.retain(is_fresh);
        }
    }

    let selection = if let Some(card) = tiers.learning_due.first() {
        Selection::pick(card, SelectionSource::Learning, should_introduce_new)
    } else if let Some(card) = tiers.review_due.first() {
        Selection::pick(card, SelectionSource::Review, should_introduce_new)
    } else if should_introduce_new {
        Selection {
            next_key: None,
            should_introduce_new: true,
            source: SelectionSource::New,
            all_complete: false,
        }
    } else if let Some(card) = tiers.waiting.first() {
        Selection::pick(card, SelectionSource::LearningWaiting, should_introduce_new)
    } else if let Some(card) = tiers.practice.first() {
        Selection::pick(card, SelectionSource::Practice, should_introduce_new)
    } else {
        Selection {
            next_key: None,
            should_introduce_new: false,
            source: SelectionSource::Complete,
            all_complete: true,
        }
    };

    debug!(
        "Selected {:?} from {} (learning {}, introduce {})",
        selection.next_key, selection.source, learning_count, selection.should_introduce_new
    );

    selection
}
