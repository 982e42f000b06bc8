//! Memory Model strategy
//!
//! The phase engine and selector only talk to [`MemoryModel`], so another
//! decay model can be swapped in without touching them.

use chrono::{DateTime, Utc};

use super::algorithm;
use super::{days_between, days_to_duration};
use crate::card::{CardState, Grade, LearningState};
use crate::config::SrsConfig;

// ============================================================================
// MEMORY UPDATE
// ============================================================================

/// Memory-model fields after one grade.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryUpdate {
    pub grade: Grade,
    /// Recall probability at the moment of grading
    pub retrievability: f64,
    pub stability: f64,
    pub difficulty: f64,
    pub state: LearningState,
    pub reps: u32,
    pub lapses: u32,
    pub due: DateTime<Utc>,
    pub scheduled_days: f64,
    pub last_review: DateTime<Utc>,
}

impl MemoryUpdate {
    /// Write the memory-model fields into `card`. Learning-box fields are
    /// left untouched.
    pub fn apply_to(&self, card: &mut CardState) {
        card.stability = self.stability;
        card.difficulty = self.difficulty;
        card.state = self.state;
        card.reps = self.reps;
        card.lapses = self.lapses;
        card.due = self.due;
        card.scheduled_days = self.scheduled_days;
        card.last_review = Some(self.last_review);
    }
}

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// A memory-decay model.
pub trait MemoryModel {
    /// Recall probability in `[0, 1]`. Never-reviewed cards return `0.0`.
    fn retrievability(&self, card: &CardState, now: DateTime<Utc>) -> f64;

    /// Outcome of grading `card` at `now`. Infallible: inputs are clamped.
    fn grade(&self, card: &CardState, grade: Grade, now: DateTime<Utc>) -> MemoryUpdate;

    /// Long-term interval granted to a card with `stability`.
    fn interval_days(&self, stability: f64) -> f64;

    /// Outcome for each grade, weakest first.
    fn preview(&self, card: &CardState, now: DateTime<Utc>) -> [MemoryUpdate; 4] {
        Grade::ALL.map(|grade| self.grade(card, grade, now))
    }
}

// ============================================================================
// POWER DECAY MODEL
// ============================================================================

/// `R = exp(-(t/S)^beta)` with FSRS-style stability growth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerDecayModel {
    pub beta: f64,
    pub retention: f64,
    pub stability_floor: f64,
    pub stability_ceiling: f64,
    pub min_interval_days: f64,
    pub max_interval_days: f64,
}

impl Default for PowerDecayModel {
    fn default() -> Self {
        Self::from_config(&SrsConfig::default())
    }
}

impl PowerDecayModel {
    pub fn from_config(config: &SrsConfig) -> Self {
        Self {
            beta: config.beta,
            retention: config.retention,
            stability_floor: config.stability_floor,
            stability_ceiling: config.stability_ceiling,
            min_interval_days: config.min_interval_days,
            max_interval_days: config.max_interval_days,
        }
    }

    fn clamp_stability(&self, stability: f64) -> f64 {
        if stability.is_nan() {
            return self.stability_floor;
        }
        stability.clamp(self.stability_floor, self.stability_ceiling)
    }
}

impl MemoryModel for PowerDecayModel {
    fn retrievability(&self, card: &CardState, now: DateTime<Utc>) -> f64 {
        match card.last_review {
            None => 0.0,
            Some(last) => algorithm::retrievability(
                days_between(last, now),
                card.stability,
                self.beta,
                self.stability_floor,
            ),
        }
    }

    fn grade(&self, card: &CardState, grade: Grade, now: DateTime<Utc>) -> MemoryUpdate {
        let r = self.retrievability(card, now);

        let (stability, difficulty) = if card.last_review.is_none() {
            (
                algorithm::initial_stability(grade),
                algorithm::initial_difficulty(grade),
            )
        } else {
            let s = self.clamp_stability(card.stability);
            let stability = if grade.is_success() {
                algorithm::next_recall_stability(card.difficulty, s, r, grade)
            } else {
                algorithm::next_forget_stability(card.difficulty, s, r)
            };
            (stability, algorithm::next_difficulty(card.difficulty, grade))
        };
        let stability = self.clamp_stability(stability);

        let state = card.state.after(grade);
        let lapses = if state == LearningState::Relearning && card.state == LearningState::Review {
            card.lapses.saturating_add(1)
        } else {
            card.lapses
        };

        let scheduled_days = self.interval_days(stability);

        MemoryUpdate {
            grade,
            retrievability: r,
            stability,
            difficulty,
            state,
            reps: card.reps.saturating_add(1),
            lapses,
            due: now + days_to_duration(scheduled_days),
            scheduled_days,
            last_review: now,
        }
    }

    fn interval_days(&self, stability: f64) -> f64 {
        let raw = algorithm::interval_days(self.clamp_stability(stability), self.retention, self.beta);
        if raw.is_nan() {
            return self.min_interval_days;
        }
        raw.clamp(self.min_interval_days, self.max_interval_days)
    }
}
