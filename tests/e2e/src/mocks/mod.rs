mod fixtures;

pub use fixtures::{Learner, TestItems};
