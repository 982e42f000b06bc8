//! Journey Test: Multi-Day Study
//!
//! One sitting a day, with the deck saved and restored in between.

use chrono::Duration;
use mnemos_core::{GradeOutcome, Item, ReviewSession, SrsConfig, TransitionKind};
use mnemos_e2e_tests::harness::TestDeckManager;
use mnemos_e2e_tests::mocks::{Learner, TestItems};

const DECK: &str = "spanish";

fn sitting(db: &mut TestDeckManager, items: &[Item], learner: &Learner) -> (ReviewSession<Item>, Vec<GradeOutcome>) {
    let mut session = db.open_session(DECK, items.to_vec(), SrsConfig::default());
    let outcomes = db.study(&mut session, 500, |card| learner.grade(card));
    db.save(DECK, &session);
    (session, outcomes)
}

fn count(outcomes: &[GradeOutcome], kind: TransitionKind) -> usize {
    outcomes.iter().filter(|o| o.kind == kind).count()
}

#[test]
fn test_reviews_spread_out_over_a_month() {
    let mut db = TestDeckManager::new_temp();
    let items = TestItems::spanish(6);
    let learner = Learner::Steady;

    let (_, day0) = sitting(&mut db, &items, &learner);
    assert_eq!(count(&day0, TransitionKind::Graduated), 6);

    db.advance(Duration::days(1));
    let (session, day1) = sitting(&mut db, &items, &learner);
    assert_eq!(day1.len(), 6);
    assert_eq!(count(&day1, TransitionKind::Reviewed), 6);
    assert_eq!(session.stats().due_count, 0);

    // A successful review more than doubles the interval
    db.advance(Duration::days(1));
    let (_, day2) = sitting(&mut db, &items, &learner);
    assert!(day2.is_empty());

    let mut reviews = day1.len();
    let mut last = None;
    for _ in 3..30 {
        db.advance(Duration::days(1));
        let (session, outcomes) = sitting(&mut db, &items, &learner);
        assert_eq!(session.stats().due_count, 0);
        assert_eq!(count(&outcomes, TransitionKind::Reviewed), outcomes.len());
        reviews += outcomes.len();
        last = Some(session);
    }

    assert!(reviews < 6 * 28, "{reviews} reviews in four weeks");
    let session = last.expect("at least one sitting");
    for card in session.cards() {
        assert!(card.is_graduated());
        assert!(card.scheduled_days > 1.0, "{} at {} days", card.key, card.scheduled_days);
        assert_eq!(card.lapses, 0);
    }
}

#[test]
fn test_forgotten_card_relearns() {
    let mut db = TestDeckManager::new_temp();
    let items = TestItems::spanish(3);
    let learner = Learner::Forgets("hola".into());

    let (_, day0) = sitting(&mut db, &items, &learner);
    assert_eq!(count(&day0, TransitionKind::Graduated), 3);

    db.advance(Duration::days(1));
    let (session, day1) = sitting(&mut db, &items, &learner);

    let hola: Vec<TransitionKind> = day1
        .iter()
        .filter(|o| o.card.key == "hola")
        .map(|o| o.kind)
        .collect();
    assert_eq!(
        hola,
        vec![
            TransitionKind::Regressed,
            TransitionKind::Stepped,
            TransitionKind::Graduated
        ]
    );

    let regressed = day1
        .iter()
        .find(|o| o.kind == TransitionKind::Regressed)
        .expect("hola regressed");
    assert!(regressed.card.is_learning());
    assert_eq!(regressed.card.learning_step, 0);
    assert_eq!(regressed.card.lapses, 1);

    let card = session.cards().get("hola").expect("hola exists");
    assert!(card.is_graduated());
    assert_eq!(card.lapses, 1);
    for key in ["adiós", "gracias"] {
        assert_eq!(session.cards().get(key).map(|c| c.lapses), Some(0));
    }
}

#[test]
fn test_retention_tracks_elapsed_time() {
    let mut db = TestDeckManager::new_temp();
    let items = TestItems::spanish(4);
    let (session, _) = sitting(&mut db, &items, &Learner::Steady);

    let fresh = session.retention(db.now());
    assert_eq!(fresh.reviewed_count, 4);
    assert!(fresh.average_retrievability > 0.99);
    assert_eq!(fresh.at_risk_count, 0);

    let later = session.retention(db.now() + Duration::days(10));
    assert!(later.average_retrievability < fresh.average_retrievability);
    assert_eq!(later.at_risk_count, 4);
}
