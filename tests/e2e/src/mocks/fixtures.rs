//! Test Data Factory
//!
//! Item pools and scripted learners for journey tests. Learners decide a
//! grade from the card alone, so every run is deterministic.

use mnemos_core::{CardState, Grade, Item};

const SPANISH_WORDS: [&str; 16] = [
    "hola", "adiós", "gracias", "por favor", "perro", "gato", "casa", "agua",
    "libro", "mesa", "ventana", "cocina", "camino", "ciudad", "tiempo", "noche",
];

/// Factory for item pools
pub struct TestItems;

impl TestItems {
    /// `count` distinct vocabulary items, in a stable order.
    pub fn spanish(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| {
                let word = SPANISH_WORDS[i % SPANISH_WORDS.len()];
                match i / SPANISH_WORDS.len() {
                    0 => Item::new(word),
                    round => Item::new(format!("{word} {round}")),
                }
            })
            .collect()
    }

    /// Bare keys `prefix-0`, `prefix-1`, ...
    pub fn keys(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{prefix}-{i}")).collect()
    }

    /// Like [`TestItems::spanish`], with every `every`-th item high effort.
    pub fn with_high_effort(count: usize, every: usize) -> Vec<Item> {
        Self::spanish(count)
            .into_iter()
            .enumerate()
            .map(|(i, item)| Item {
                high_effort: every > 0 && i % every == 0,
                ..item
            })
            .collect()
    }
}

/// Scripted learner behaviour
#[derive(Debug, Clone)]
pub enum Learner {
    /// Always "good"
    Steady,
    /// Always "easy"
    Confident,
    /// Fails the first sight, struggles on the second, then recalls
    Struggling,
    /// Recalls everything except graduated reviews of one key
    Forgets(String),
}

impl Learner {
    pub fn grade(&self, card: &CardState) -> Grade {
        match self {
            Learner::Steady => Grade::Good,
            Learner::Confident => Grade::Easy,
            Learner::Struggling => match card.reps {
                0 => Grade::Fail,
                1 => Grade::Hard,
                _ => Grade::Good,
            },
            Learner::Forgets(key) if card.key == *key && card.is_graduated() => Grade::Fail,
            Learner::Forgets(_) => Grade::Good,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mnemos_core::{SrsConfig, StudyItem};

    #[test]
    fn test_spanish_keys_unique() {
        let items = TestItems::spanish(40);
        let mut keys: Vec<&str> = items.iter().map(StudyItem::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 40);
        assert_eq!(items[16].key, "hola 1");
    }

    #[test]
    fn test_high_effort_spacing() {
        let items = TestItems::with_high_effort(6, 3);
        let flags: Vec<bool> = items.iter().map(|i| i.high_effort).collect();
        assert_eq!(flags, vec![true, false, false, true, false, false]);
    }

    #[test]
    fn test_struggling_learner_script() {
        let mut card = CardState::new("perro", Utc::now(), &SrsConfig::default());
        assert_eq!(Learner::Struggling.grade(&card), Grade::Fail);
        card.reps = 1;
        assert_eq!(Learner::Struggling.grade(&card), Grade::Hard);
        card.reps = 4;
        assert_eq!(Learner::Struggling.grade(&card), Grade::Good);
    }
}
