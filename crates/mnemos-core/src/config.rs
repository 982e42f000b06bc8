//! Scheduler Configuration
//!
//! A single [`SrsConfig`] value is built once per session and threaded into
//! every engine call. The engine never reads configuration from anywhere else.
//!
//! Every field carries a safe default, so a partial TOML/JSON document (or an
//! empty one) always produces a usable config. Unknown keys are ignored.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::decay::days_to_duration;

// ============================================================================
// DEFAULTS
// ============================================================================

/// Learning-box ladder: 1 minute, then 10 minutes
pub const DEFAULT_LEARNING_STEPS_SECS: [i64; 2] = [60, 600];

/// Desired number of cards concurrently in the learning box
pub const DEFAULT_TARGET_LEARNING_COUNT: usize = 5;

/// Minimum number of other cards shown before a card may repeat
pub const DEFAULT_MIN_INTERLEAVE_COUNT: usize = 2;

/// Cap on the first long-term interval after graduation (days)
pub const DEFAULT_MAX_GRADUATING_INTERVAL_DAYS: f64 = 4.0;

/// Forgetting curve shape: `R = exp(-(t/S)^beta)`
pub const DEFAULT_BETA: f64 = 1.0;

/// Target recall probability at the moment a card comes due
pub const DEFAULT_RETENTION: f64 = 0.92;

/// Lower bound for stability (days)
pub const DEFAULT_STABILITY_FLOOR: f64 = 0.1;

/// Upper bound for stability (days)
pub const DEFAULT_STABILITY_CEILING: f64 = 36500.0;

/// Shortest long-term interval (days)
pub const DEFAULT_MIN_INTERVAL_DAYS: f64 = 1.0;

/// Longest long-term interval (days)
pub const DEFAULT_MAX_INTERVAL_DAYS: f64 = 60.0;

/// Deck-wide easy streak that forces a new introduction
pub const DEFAULT_CONSECUTIVE_EASY_THRESHOLD: u32 = 4;

/// Practice mode prefers graduated cards coming due within this window (4h)
pub const DEFAULT_ALMOST_DUE_THRESHOLD_SECS: i64 = 4 * 60 * 60;

// ============================================================================
// CONFIG
// ============================================================================

/// Tunable scheduler parameters.
///
/// | Option | Effect |
/// |--------|--------|
/// | `learning_steps_secs` | Delays of the learning-box ladder, in order |
/// | `target_learning_count` | Below this many learning cards, new items are introduced |
/// | `min_interleave_count` | Distinct cards shown between repeats of one card |
/// | `max_graduating_interval_days` | Cap on the interval granted at graduation |
/// | `beta` | Shape of the decay curve |
/// | `retention` | Recall probability targeted when scheduling reviews |
/// | `stability_floor` / `stability_ceiling` | Bounds on memory stability |
/// | `min_interval_days` / `max_interval_days` | Bounds on long-term intervals |
/// | `consecutive_easy_threshold` | Easy streak that forces an introduction |
/// | `almost_due_threshold_secs` | Practice-mode look-ahead (0 disables) |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrsConfig {
    pub learning_steps_secs: Vec<i64>,
    pub target_learning_count: usize,
    pub min_interleave_count: usize,
    pub max_graduating_interval_days: f64,
    pub beta: f64,
    pub retention: f64,
    pub stability_floor: f64,
    pub stability_ceiling: f64,
    pub min_interval_days: f64,
    pub max_interval_days: f64,
    pub consecutive_easy_threshold: u32,
    pub almost_due_threshold_secs: i64,
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            learning_steps_secs: DEFAULT_LEARNING_STEPS_SECS.to_vec(),
            target_learning_count: DEFAULT_TARGET_LEARNING_COUNT,
            min_interleave_count: DEFAULT_MIN_INTERLEAVE_COUNT,
            max_graduating_interval_days: DEFAULT_MAX_GRADUATING_INTERVAL_DAYS,
            beta: DEFAULT_BETA,
            retention: DEFAULT_RETENTION,
            stability_floor: DEFAULT_STABILITY_FLOOR,
            stability_ceiling: DEFAULT_STABILITY_CEILING,
            min_interval_days: DEFAULT_MIN_INTERVAL_DAYS,
            max_interval_days: DEFAULT_MAX_INTERVAL_DAYS,
            consecutive_easy_threshold: DEFAULT_CONSECUTIVE_EASY_THRESHOLD,
            almost_due_threshold_secs: DEFAULT_ALMOST_DUE_THRESHOLD_SECS,
        }
    }
}

impl SrsConfig {
    /// Config with a custom learning ladder, everything else default.
    pub fn with_steps(steps_secs: &[i64]) -> Self {
        Self {
            learning_steps_secs: steps_secs.to_vec(),
            ..Default::default()
        }
    }

    /// Replace out-of-range values with the nearest valid setting.
    ///
    /// Never fails: a nonsensical option degrades to its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.learning_steps_secs.retain(|s| *s >= 0);
        if self.learning_steps_secs.is_empty() {
            tracing::warn!("Empty learning step ladder, using defaults");
            self.learning_steps_secs = defaults.learning_steps_secs;
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            tracing::warn!("Invalid beta {}, using {}", self.beta, DEFAULT_BETA);
            self.beta = DEFAULT_BETA;
        }
        if !(self.retention > 0.0 && self.retention < 1.0) {
            tracing::warn!("Retention {} outside (0, 1), using {}", self.retention, DEFAULT_RETENTION);
            self.retention = DEFAULT_RETENTION;
        }
        if !(self.stability_floor.is_finite() && self.stability_floor > 0.0) {
            self.stability_floor = DEFAULT_STABILITY_FLOOR;
        }
        if !(self.stability_ceiling.is_finite() && self.stability_ceiling >= self.stability_floor) {
            self.stability_ceiling = DEFAULT_STABILITY_CEILING.max(self.stability_floor);
        }
        if !(self.min_interval_days.is_finite() && self.min_interval_days >= 0.0) {
            self.min_interval_days = DEFAULT_MIN_INTERVAL_DAYS;
        }
        if !(self.max_interval_days.is_finite() && self.max_interval_days >= self.min_interval_days) {
            self.max_interval_days = DEFAULT_MAX_INTERVAL_DAYS.max(self.min_interval_days);
        }
        if !(self.max_graduating_interval_days.is_finite() && self.max_graduating_interval_days >= 0.0) {
            self.max_graduating_interval_days = DEFAULT_MAX_GRADUATING_INTERVAL_DAYS;
        }
        self.almost_due_threshold_secs = self.almost_due_threshold_secs.max(0);
        self
    }

    /// Index of the last rung of the learning ladder.
    #[inline]
    pub fn max_step(&self) -> usize {
        self.learning_steps_secs.len().saturating_sub(1)
    }

    /// Delay for a learning step. Indices past the ladder use the last rung.
    pub fn learning_step(&self, index: usize) -> Duration {
        let secs = self
            .learning_steps_secs
            .get(index.min(self.max_step()))
            .copied()
            .unwrap_or(DEFAULT_LEARNING_STEPS_SECS[0]);
        Duration::seconds(secs.max(0))
    }

    /// Cap on the interval granted at graduation.
    pub fn max_graduating_interval(&self) -> Duration {
        days_to_duration(self.max_graduating_interval_days)
    }

    /// Practice look-ahead, `None` when disabled.
    pub fn almost_due_threshold(&self) -> Option<Duration> {
        (self.almost_due_threshold_secs > 0).then(|| Duration::seconds(self.almost_due_threshold_secs))
    }

    /// Number of recently shown keys the interleave filter looks at.
    #[inline]
    pub fn recent_window(&self) -> usize {
        self.min_interleave_count
    }
}
