//! Scheduling Engine
//!
//! Pure functions over plain data. Every call takes "now" explicitly; nothing
//! here reads the clock, performs I/O, or holds state between calls.

mod introducer;
mod selector;
mod stats;
mod transition;

pub use introducer::{initialize_deck, introduce_next};
pub use selector::{select_next, KeyFilter, Selection, SelectionSource};
pub use stats::{
    compute_retention, compute_stats, RetentionSummary, AT_RISK_RETRIEVABILITY, STRONG_RETRIEVABILITY,
};
pub use transition::{grade_card, Transition, TransitionKind};
