//! Card State - one scheduling record per learnable item
//!
//! Each card carries two clocks:
//! - `step_due`, the learning-box clock, authoritative while `phase` is learning
//! - `due`, the memory-model clock, authoritative once the card has graduated
//!
//! Memory-model fields (stability, difficulty, reps, lapses) are updated on
//! every grade in every phase, so a card graduates with a warmed-up model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::card::Grade;
use crate::config::SrsConfig;

/// Difficulty given to a card before its first grade
pub const INITIAL_DIFFICULTY: f64 = 5.0;

/// Difficulty bounds
pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

// ============================================================================
// PHASE
// ============================================================================

/// Scheduler phase of a card.
///
/// `Review` and `Graduated` are the same terminal phase for every scheduling
/// decision; both spellings exist in stored data. The legacy spelling
/// `consolidation` is read as `Review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Short-term step ladder
    Learning,
    /// Long-term scheduling (written by older decks)
    #[serde(alias = "consolidation")]
    Review,
    /// Long-term scheduling
    Graduated,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Learning => "learning",
            Phase::Review => "review",
            Phase::Graduated => "graduated",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "learning" => Some(Phase::Learning),
            "review" | "consolidation" => Some(Phase::Review),
            "graduated" => Some(Phase::Graduated),
            _ => None,
        }
    }

    /// True for either spelling of the terminal phase
    #[inline]
    pub fn is_graduated(self) -> bool {
        matches!(self, Phase::Review | Phase::Graduated)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// LEARNING STATE
// ============================================================================

/// Memory-model state, independent of the scheduler [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningState {
    /// Never graded
    #[default]
    New,
    /// Graded, not yet recalled well
    Learning,
    /// Recalled at least once at good or better
    Review,
    /// Forgotten after having been in review
    Relearning,
}

impl LearningState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningState::New => "new",
            LearningState::Learning => "learning",
            LearningState::Review => "review",
            LearningState::Relearning => "relearning",
        }
    }

    /// Memory-model state after `grade`.
    pub fn after(self, grade: Grade) -> Self {
        match (self, grade) {
            (LearningState::Review, Grade::Fail) => LearningState::Relearning,
            (LearningState::Review, _) => LearningState::Review,
            (LearningState::Relearning, Grade::Fail | Grade::Hard) => LearningState::Relearning,
            (_, Grade::Fail | Grade::Hard) => LearningState::Learning,
            (_, Grade::Good | Grade::Easy) => LearningState::Review,
        }
    }
}

impl std::fmt::Display for LearningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CARD STATE
// ============================================================================

/// Scheduling state of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Item key
    pub key: String,

    // ========== Memory model ==========
    /// Days until recall probability falls to the reference threshold
    pub stability: f64,
    /// Inherent difficulty (1.0 = easy, 10.0 = hard)
    pub difficulty: f64,
    /// Number of grades applied
    #[serde(deserialize_with = "saturating_u32")]
    pub reps: u32,
    /// Number of times forgotten after reaching review
    #[serde(deserialize_with = "saturating_u32")]
    pub lapses: u32,
    pub state: LearningState,
    /// Long-term due date
    pub due: DateTime<Utc>,
    /// Interval granted by the last long-term schedule (days)
    pub scheduled_days: f64,
    pub last_review: Option<DateTime<Utc>>,

    // ========== Learning box ==========
    pub phase: Phase,
    /// Index into the configured step ladder
    #[serde(deserialize_with = "saturating_usize")]
    pub learning_step: usize,
    /// Next learning-box exposure
    pub step_due: DateTime<Utc>,

    // ========== Bookkeeping ==========
    pub introduced_at: DateTime<Utc>,
    #[serde(default)]
    pub last_grade: Option<Grade>,
    /// Easy grades in a row on this card
    #[serde(default, deserialize_with = "saturating_u32")]
    pub consecutive_easy_count: u32,
}

/// Reads a stored counter, clamping negative or oversized values into range.
pub(crate) fn saturating_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

pub(crate) fn saturating_usize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(usize::try_from(value.max(0)).unwrap_or(usize::MAX))
}

impl CardState {
    /// Fresh learning-box card, due immediately.
    pub fn new(key: impl Into<String>, now: DateTime<Utc>, config: &SrsConfig) -> Self {
        Self {
            key: key.into(),
            stability: config.stability_floor,
            difficulty: INITIAL_DIFFICULTY,
            reps: 0,
            lapses: 0,
            state: LearningState::New,
            due: now,
            scheduled_days: 0.0,
            last_review: None,
            phase: Phase::Learning,
            learning_step: 0,
            step_due: now,
            introduced_at: now,
            last_grade: None,
            consecutive_easy_count: 0,
        }
    }

    /// Never graded
    #[inline]
    pub fn is_new(&self) -> bool {
        self.reps == 0 && self.last_review.is_none()
    }

    #[inline]
    pub fn is_learning(&self) -> bool {
        self.phase == Phase::Learning
    }

    #[inline]
    pub fn is_graduated(&self) -> bool {
        self.phase.is_graduated()
    }

    /// The clock that governs this card in its current phase.
    pub fn due_at(&self) -> DateTime<Utc> {
        if self.is_learning() {
            self.step_due
        } else {
            self.due
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at() <= now
    }

    /// Pull numeric fields back into range.
    ///
    /// Returns `true` when anything was changed.
    pub fn clamp_to_bounds(&mut self, config: &SrsConfig) -> bool {
        let before = self.clone();

        self.stability = if self.stability.is_nan() {
            config.stability_floor
        } else {
            self.stability.clamp(config.stability_floor, config.stability_ceiling)
        };
        self.difficulty = if self.difficulty.is_nan() {
            INITIAL_DIFFICULTY
        } else {
            self.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
        };
        if !(self.scheduled_days.is_finite() && self.scheduled_days >= 0.0) {
            self.scheduled_days = 0.0;
        }
        self.learning_step = self.learning_step.min(config.max_step());

        let changed = *self != before;
        if changed {
            tracing::warn!("Clamped out-of-range state on card {}", self.key);
        }
        changed
    }
}
