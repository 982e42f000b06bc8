//! Phase Transition Engine
//!
//! Applies one grade to one card:
//!
//! | Phase | Grade | Effect |
//! |-------|-------|--------|
//! | learning | fail | back to step 0 |
//! | learning | hard | retry the current step |
//! | learning | good | advance 2 steps when new, else 1; past the ladder graduates |
//! | learning | easy | new low-effort items graduate, new high-effort items jump 3 steps, others advance 2 |
//! | graduated | fail | regress to learning step 0 |
//! | graduated | other | memory model schedules the next review |
//!
//! The memory model is consulted on every grade so stability and difficulty
//! are already meaningful when a card graduates.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::card::{CardState, DeckState, Grade, Phase};
use crate::config::SrsConfig;
use crate::decay::MemoryModel;

/// What a grade did to the card's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Moved forward on the learning ladder
    Stepped,
    /// Repeats the same learning step
    Retried,
    /// Sent back to the first learning step
    Reset,
    /// Left the learning box
    Graduated,
    /// Fell from graduated back into learning
    Regressed,
    /// Stayed graduated with a new due date
    Reviewed,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Stepped => "stepped",
            TransitionKind::Retried => "retried",
            TransitionKind::Reset => "reset",
            TransitionKind::Graduated => "graduated",
            TransitionKind::Regressed => "regressed",
            TransitionKind::Reviewed => "reviewed",
        }
    }
}

/// Result of [`grade_card`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub card: CardState,
    pub deck: DeckState,
    pub kind: TransitionKind,
}

/// Apply `grade` to `card` at `now`.
///
/// Pure: returns new card and deck values, the inputs are not modified.
pub fn grade_card<M: MemoryModel + ?Sized>(
    card: &CardState,
    deck: &DeckState,
    grade: Grade,
    config: &SrsConfig,
    model: &M,
    is_high_effort: bool,
    now: DateTime<Utc>,
) -> Transition {
    let is_new = card.is_new();

    let mut next = card.clone();
    model.grade(card, grade, now).apply_to(&mut next);
    next.last_grade = Some(grade);

    let mut deck = deck.clone();
    if grade == Grade::Easy {
        next.consecutive_easy_count = next.consecutive_easy_count.saturating_add(1);
        deck.consecutive_easy_count = deck.consecutive_easy_count.saturating_add(1);
    } else {
        next.consecutive_easy_count = 0;
        deck.consecutive_easy_count = 0;
    }

    let kind = if card.is_graduated() {
        if grade == Grade::Fail {
            set_step(&mut next, 0, config, now);
            next.phase = Phase::Learning;
            TransitionKind::Regressed
        } else {
            TransitionKind::Reviewed
        }
    } else {
        match grade {
            Grade::Fail => {
                set_step(&mut next, 0, config, now);
                TransitionKind::Reset
            }
            Grade::Hard => {
                let step = next.learning_step.min(config.max_step());
                set_step(&mut next, step, config, now);
                TransitionKind::Retried
            }
            Grade::Good => advance(&mut next, if is_new { 2 } else { 1 }, config, now),
            Grade::Easy if is_new && !is_high_effort => {
                graduate(&mut next, config, now);
                TransitionKind::Graduated
            }
            Grade::Easy if is_new => {
                let step = (next.learning_step + 3).min(config.max_step());
                set_step(&mut next, step, config, now);
                TransitionKind::Stepped
            }
            Grade::Easy => advance(&mut next, 2, config, now),
        }
    };

    match kind {
        TransitionKind::Graduated => info!(
            "Card {} graduated, due in {:.2} days",
            next.key, next.scheduled_days
        ),
        TransitionKind::Regressed => info!("Card {} regressed to learning", next.key),
        _ => debug!(
            "Card {} graded {}: {} (step {}, stability {:.3})",
            next.key,
            grade,
            kind.as_str(),
            next.learning_step,
            next.stability
        ),
    }

    Transition {
        card: next,
        deck,
        kind,
    }
}

fn set_step(card: &mut CardState, step: usize, config: &SrsConfig, now: DateTime<Utc>) {
    card.learning_step = step;
    card.step_due = now + config.learning_step(step);
}

fn advance(card: &mut CardState, by: usize, config: &SrsConfig, now: DateTime<Utc>) -> TransitionKind {
    let target = card.learning_step + by;
    if target > config.max_step() {
        graduate(card, config, now);
        TransitionKind::Graduated
    } else {
        set_step(card, target, config, now);
        TransitionKind::Stepped
    }
}

/// Leave the learning box. The memory model's due date is capped so a fresh
/// card comes back within `max_graduating_interval_days`.
fn graduate(card: &mut CardState, config: &SrsConfig, now: DateTime<Utc>) {
    card.phase = Phase::Graduated;
    card.learning_step = config.max_step();

    let cap = now + config.max_graduating_interval();
    if card.due > cap {
        card.due = cap;
        card.scheduled_days = config.max_graduating_interval_days;
    }
}
