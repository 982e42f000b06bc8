//! Power-law decay formulas
//!
//! Pure functions. The forgetting curve is `R = exp(-(t/S)^beta)`; stability
//! and difficulty updates use the standard FSRS weight vector.

use crate::card::{Grade, MAX_DIFFICULTY, MIN_DIFFICULTY};

// ============================================================================
// CONSTANTS
// ============================================================================

/// FSRS weights (w0..w18)
pub const WEIGHTS: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192, 1.01925,
    1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
];

/// Grade as the 1-4 rating the weights are fitted against
#[inline]
fn rating(grade: Grade) -> f64 {
    f64::from(grade.value()) + 1.0
}

#[inline]
fn clamp_difficulty(d: f64) -> f64 {
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

// ============================================================================
// RETRIEVABILITY
// ============================================================================

/// Recall probability after `elapsed_days` at `stability`.
///
/// Negative elapsed time counts as zero; stability is floored at `floor`.
pub fn retrievability(elapsed_days: f64, stability: f64, beta: f64, floor: f64) -> f64 {
    let t = if elapsed_days.is_finite() { elapsed_days.max(0.0) } else { 0.0 };
    let s = if stability.is_nan() { floor } else { stability.max(floor) };
    (-(t / s).powf(beta)).exp().clamp(0.0, 1.0)
}

/// Days until retrievability falls to `retention`: `S * (-ln retention)^(1/beta)`.
pub fn interval_days(stability: f64, retention: f64, beta: f64) -> f64 {
    stability * (-retention.ln()).powf(1.0 / beta)
}

// ============================================================================
// INITIAL STATE
// ============================================================================

/// Stability after the very first grade
pub fn initial_stability(grade: Grade) -> f64 {
    WEIGHTS[grade.value() as usize]
}

/// Difficulty after the very first grade
pub fn initial_difficulty(grade: Grade) -> f64 {
    clamp_difficulty(WEIGHTS[4] - (WEIGHTS[5] * (rating(grade) - 1.0)).exp() + 1.0)
}

// ============================================================================
// UPDATES
// ============================================================================

/// Stability after a successful recall at retrievability `r`.
///
/// Growth is larger the lower `r` was. Never below `stability`.
pub fn next_recall_stability(difficulty: f64, stability: f64, r: f64, grade: Grade) -> f64 {
    let hard_penalty = if grade == Grade::Hard { WEIGHTS[15] } else { 1.0 };
    let easy_bonus = if grade == Grade::Easy { WEIGHTS[16] } else { 1.0 };

    let growth = WEIGHTS[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-WEIGHTS[9])
        * ((WEIGHTS[10] * (1.0 - r)).exp() - 1.0)
        * hard_penalty
        * easy_bonus;

    (stability * (1.0 + growth)).max(stability)
}

/// Stability after a lapse at retrievability `r`. Never above `stability`.
pub fn next_forget_stability(difficulty: f64, stability: f64, r: f64) -> f64 {
    let forget = WEIGHTS[11]
        * difficulty.powf(-WEIGHTS[12])
        * ((stability + 1.0).powf(WEIGHTS[13]) - 1.0)
        * (WEIGHTS[14] * (1.0 - r)).exp();
    forget.min(stability)
}

/// Difficulty after `grade`, with mean reversion toward the easy seed.
pub fn next_difficulty(difficulty: f64, grade: Grade) -> f64 {
    let delta = -WEIGHTS[6] * (rating(grade) - 3.0);
    let damped = difficulty + delta * ((MAX_DIFFICULTY - difficulty) / 9.0);
    clamp_difficulty(WEIGHTS[7] * initial_difficulty(Grade::Easy) + (1.0 - WEIGHTS[7]) * damped)
}
