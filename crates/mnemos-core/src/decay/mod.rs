//! Memory Decay Module
//!
//! Long-term memory model behind graduated cards.
//!
//! ## Core Formulas:
//! - Retrievability: `R = exp(-(t/S)^beta)`
//! - Interval: `t = S * (-ln retention)^(1/beta)`, clamped to configured bounds
//! - Stability growth on success scales with how unexpected the recall was

mod algorithm;
mod model;

use chrono::{DateTime, Duration, Utc};

pub use algorithm::{
    initial_difficulty, initial_stability, interval_days, next_difficulty, next_forget_stability,
    next_recall_stability, retrievability, WEIGHTS,
};
pub use model::{MemoryModel, MemoryUpdate, PowerDecayModel};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Longest duration produced from a day count (about 1000 years)
const MAX_DURATION_DAYS: f64 = 365_000.0;

/// Fractional days from `from` to `to`. Negative when `to` is earlier.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Fractional days as a duration. Non-finite or negative input gives zero.
pub fn days_to_duration(days: f64) -> Duration {
    if !days.is_finite() || days <= 0.0 {
        return Duration::zero();
    }
    Duration::milliseconds((days.min(MAX_DURATION_DAYS) * MILLIS_PER_DAY).round() as i64)
}

/// Compact human-readable interval: `now`, `10m`, `4h`, `3d`, `2w`, `5mo`, `1y`.
pub fn format_interval(days: f64) -> String {
    if !days.is_finite() || days <= 0.0 {
        return "now".to_string();
    }

    let minutes = (days * 24.0 * 60.0).round() as i64;
    if minutes < 1 {
        return "now".to_string();
    }
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    if days < 1.0 {
        return format!("{}h", (minutes as f64 / 60.0).round() as i64);
    }

    let whole = days.round() as i64;
    if whole < 7 {
        format!("{}d", whole)
    } else if whole < 30 {
        format!("{}w", whole / 7)
    } else if whole < 365 {
        format!("{}mo", whole / 30)
    } else {
        format!("{}y", whole / 365)
    }
}
