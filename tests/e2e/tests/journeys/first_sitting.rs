//! Journey Test: First Sitting
//!
//! A learner opens a brand new deck and works through it in one go.

use chrono::Duration;
use mnemos_core::{GradeOutcome, SelectionSource, SrsConfig, TransitionKind};
use mnemos_e2e_tests::harness::TestDeckManager;
use mnemos_e2e_tests::mocks::{Learner, TestItems};

const DECK: &str = "spanish";

/// With more learning cards than the interleave window, a graded card is
/// never offered again straight away.
fn assert_interleaved(outcomes: &[GradeOutcome], config: &SrsConfig) {
    for outcome in outcomes {
        if outcome.stats.learning_count > config.min_interleave_count {
            assert_ne!(
                outcome.next_key(),
                Some(outcome.card.key.as_str()),
                "{} repeated with {} cards in the learning box",
                outcome.card.key,
                outcome.stats.learning_count
            );
        }
    }
}

#[test]
fn test_steady_learner_graduates_every_item() {
    let mut db = TestDeckManager::new_temp();
    let config = SrsConfig::default();
    let mut session = db.open_session(DECK, TestItems::spanish(10), config.clone());

    assert_eq!(session.cards().len(), config.target_learning_count);
    assert_eq!(session.selection().source, SelectionSource::Learning);

    let outcomes = db.study(&mut session, 200, |card| Learner::Steady.grade(card));

    assert_eq!(outcomes.len(), 10);
    assert!(outcomes.iter().all(|o| o.kind == TransitionKind::Graduated));

    let stats = session.stats();
    assert_eq!(stats.total_introduced, 10);
    assert_eq!(stats.graduated_count, 10);
    assert_eq!(stats.learning_count, 0);
    assert_eq!(stats.remaining(), 0);
    assert_eq!(session.selection().source, SelectionSource::Practice);

    let cap = db.now() + Duration::days(4);
    for card in session.cards() {
        assert!(card.is_graduated());
        assert!(card.due > db.now() - Duration::minutes(10));
        assert!(card.due <= cap);
        assert_eq!(card.lapses, 0);
    }
}

#[test]
fn test_items_introduced_in_list_order() {
    let mut db = TestDeckManager::new_temp();
    let items = TestItems::spanish(8);
    let mut session = db.open_session(DECK, items.clone(), SrsConfig::default());

    let outcomes = db.study(&mut session, 200, |card| Learner::Steady.grade(card));
    let introduced: Vec<&str> = outcomes.iter().filter_map(|o| o.introduced.as_deref()).collect();

    let expected: Vec<&str> = items[5..].iter().map(|i| i.key.as_str()).collect();
    assert_eq!(introduced, expected);
}

#[test]
fn test_struggling_learner_climbs_the_ladder() {
    let mut db = TestDeckManager::new_temp();
    db.set_think_time(Duration::seconds(30));
    let config = SrsConfig::default();
    let mut session = db.open_session(DECK, TestItems::spanish(8), config.clone());

    let outcomes = db.study(&mut session, 500, |card| Learner::Struggling.grade(card));

    // Fail, hard, good, good for every card
    assert_eq!(outcomes.len(), 8 * 4);
    for kind in [
        TransitionKind::Reset,
        TransitionKind::Retried,
        TransitionKind::Stepped,
        TransitionKind::Graduated,
    ] {
        assert_eq!(outcomes.iter().filter(|o| o.kind == kind).count(), 8, "{kind:?}");
    }
    assert_interleaved(&outcomes, &config);

    assert_eq!(session.stats().graduated_count, 8);
    assert!(session.cards().iter().all(|c| c.reps == 4 && c.lapses == 0));
}

#[test]
fn test_learning_box_never_exceeds_target_without_easy_streak() {
    let mut db = TestDeckManager::new_temp();
    let config = SrsConfig {
        target_learning_count: 3,
        ..Default::default()
    };
    let mut session = db.open_session(DECK, TestItems::spanish(12), config.clone());

    let outcomes = db.study(&mut session, 500, |card| Learner::Struggling.grade(card));

    assert!(outcomes.iter().all(|o| o.stats.learning_count <= 3));
    assert_interleaved(&outcomes, &config);
    assert_eq!(session.stats().graduated_count, 12);
}

#[test]
fn test_easy_streak_forces_introduction() {
    let mut db = TestDeckManager::new_temp();
    let config = SrsConfig::default();
    let items = TestItems::with_high_effort(12, 1);
    let mut session = db.open_session(DECK, items.clone(), config.clone());

    // High-effort cards stay in the box on a first easy, so the box is full
    // until the streak reaches the threshold.
    let outcomes = db.study(&mut session, 4, |card| Learner::Confident.grade(card));

    assert!(outcomes.iter().all(|o| o.kind == TransitionKind::Stepped));
    assert!(outcomes[..3].iter().all(|o| o.introduced.is_none()));
    assert_eq!(outcomes[3].introduced.as_deref(), Some(items[5].key.as_str()));
    assert_eq!(session.deck().consecutive_easy_count, 0);
    assert_eq!(session.cards().len(), 6);

    let outcomes = db.study(&mut session, 500, |card| Learner::Confident.grade(card));
    assert!(!outcomes.is_empty());
    assert_eq!(session.stats().graduated_count, 12);
}

#[test]
fn test_unknown_key_is_ignored() {
    let db = TestDeckManager::new_temp();
    let mut session = db.open_session(DECK, TestItems::spanish(3), SrsConfig::default());
    let before = session.selection().clone();

    assert!(session.handle_grade("not-a-card", mnemos_core::Grade::Good, db.now()).is_none());
    assert_eq!(session.selection(), &before);
    assert!(session.cards().iter().all(|c| c.is_new()));
}
