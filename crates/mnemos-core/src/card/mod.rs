//! Card Data Model
//!
//! - [`Grade`]: the four-valued learner response
//! - [`CardState`]: per-item scheduling state with its [`Phase`]
//! - [`CardStore`]: key to card mapping owned by a session
//! - [`DeckState`]: deck-wide counters and cached [`DeckStats`]
//! - [`StudyItem`]: what the caller hands the scheduler to introduce

mod deck;
mod grade;
mod item;
mod state;
mod store;

pub use deck::{DeckState, DeckStats};
pub use grade::Grade;
pub use item::{is_high_effort, Item, StudyItem};
pub use state::{
    CardState, LearningState, Phase, INITIAL_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
pub use store::CardStore;
