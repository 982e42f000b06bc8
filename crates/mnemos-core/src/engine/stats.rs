//! Stats Aggregator
//!
//! Pure scans over a card store. Nothing here is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::selector::KeyFilter;
use crate::card::{CardStore, DeckStats};
use crate::decay::MemoryModel;

/// Recall probability below which a card counts as at risk
pub const AT_RISK_RETRIEVABILITY: f64 = 0.5;

/// Recall probability at or above which a card counts as strong
pub const STRONG_RETRIEVABILITY: f64 = 0.9;

/// Deck counts at `now`.
pub fn compute_stats(
    store: &CardStore,
    total_available: usize,
    filter: KeyFilter<'_>,
    now: DateTime<Utc>,
) -> DeckStats {
    let mut stats = DeckStats {
        total_available,
        ..Default::default()
    };

    for card in store.iter().filter(|c| filter.is_none_or(|f| f(&c.key))) {
        stats.total_introduced += 1;
        if card.is_learning() {
            stats.learning_count += 1;
        } else {
            stats.graduated_count += 1;
        }
        if card.is_due(now) {
            stats.due_count += 1;
        }
    }

    stats
}

/// Forgetting risk across reviewed cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSummary {
    /// Cards graded at least once
    pub reviewed_count: usize,
    /// Mean recall probability over reviewed cards, 0 when none
    pub average_retrievability: f64,
    #[serde(default)]
    pub strong_count: usize,
    /// Between at-risk and strong
    #[serde(default)]
    pub fading_count: usize,
    /// Reviewed cards more likely forgotten than not
    pub at_risk_count: usize,
}

impl RetentionSummary {
    /// Mean probability of forgetting
    pub fn average_risk(&self) -> f64 {
        if self.reviewed_count == 0 {
            0.0
        } else {
            1.0 - self.average_retrievability
        }
    }
}

/// Retrievability distribution of the reviewed cards in scope.
pub fn compute_retention<M: MemoryModel + ?Sized>(
    store: &CardStore,
    model: &M,
    filter: KeyFilter<'_>,
    now: DateTime<Utc>,
) -> RetentionSummary {
    let mut summary = RetentionSummary::default();
    let mut total = 0.0;

    for card in store
        .iter()
        .filter(|c| c.last_review.is_some() && filter.is_none_or(|f| f(&c.key)))
    {
        let r = model.retrievability(card, now);
        summary.reviewed_count += 1;
        total += r;
        if r >= STRONG_RETRIEVABILITY {
            summary.strong_count += 1;
        } else if r >= AT_RISK_RETRIEVABILITY {
            summary.fading_count += 1;
        } else {
            summary.at_risk_count += 1;
        }
    }

    if summary.reviewed_count > 0 {
        summary.average_retrievability = total / summary.reviewed_count as f64;
    }
    summary
}
