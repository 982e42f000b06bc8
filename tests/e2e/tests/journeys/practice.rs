//! Journey Test: Practice Mode
//!
//! Once nothing is due, graduated cards from any number of decks can be
//! drilled weakest first.

use chrono::Duration;
use mnemos_core::storage::load_snapshot;
use mnemos_core::{Grade, ReviewSession, SelectionSource, SrsConfig, TransitionKind};
use mnemos_e2e_tests::harness::TestDeckManager;
use mnemos_e2e_tests::mocks::{Learner, TestItems};

fn words(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn test_practice_merges_graduated_cards() {
    let mut db = TestDeckManager::new_temp();

    let mut spanish = db.open_session("spanish", words(&["hola", "gato", "agua"]), SrsConfig::default());
    db.study(&mut spanish, 100, |card| Learner::Steady.grade(card));
    db.save("spanish", &spanish);

    let mut review = db.open_session("review", words(&["hola", "mesa"]), SrsConfig::default());
    db.study(&mut review, 100, |card| Learner::Confident.grade(card));
    db.save("review", &review);

    let first = load_snapshot(&db.store, "spanish").unwrap().expect("spanish saved");
    let second = load_snapshot(&db.store, "review").unwrap().expect("review saved");
    let hola_stability = first.cards["hola"].stability;
    assert!(second.cards["hola"].stability > hola_stability);

    let mut practice = ReviewSession::practice(vec![first, second], SrsConfig::default(), db.now());

    assert_eq!(practice.items(), words(&["agua", "gato", "hola", "mesa"]).as_slice());
    assert_eq!(practice.cards().get("hola").map(|c| c.stability), Some(hola_stability));

    let selection = practice.selection().clone();
    assert_eq!(selection.source, SelectionSource::Practice);
    assert!(!selection.should_introduce_new);
    assert!(!selection.all_complete);
    // Equal stabilities fall back to key order
    assert_eq!(selection.next_key.as_deref(), Some("agua"));

    let outcome = practice.handle_grade("agua", Grade::Good, db.now()).expect("agua exists");
    assert_eq!(outcome.kind, TransitionKind::Reviewed);
    assert!(outcome.introduced.is_none());
    assert_eq!(outcome.next_key(), Some("gato"));
    assert_eq!(outcome.stats.total_introduced, 4);
    assert_eq!(outcome.stats.graduated_count, 4);
}

#[test]
fn test_practice_skips_learning_cards() {
    let mut db = TestDeckManager::new_temp();
    let mut session = db.open_session("words", TestItems::keys("w", 4), SrsConfig::default());

    for key in ["w-0", "w-1"] {
        session.handle_grade(key, Grade::Good, db.now()).expect("seeded");
    }
    session.handle_grade("w-2", Grade::Fail, db.now()).expect("seeded");
    db.save("words", &session);

    let snapshot = load_snapshot(&db.store, "words").unwrap().expect("saved");
    let practice = ReviewSession::practice([snapshot], SrsConfig::default(), db.now());

    let mut keys: Vec<&str> = practice.cards().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["w-0", "w-1"]);
    assert_eq!(practice.stats().learning_count, 0);
}

#[test]
fn test_practice_prefers_almost_due_cards() {
    let mut db = TestDeckManager::new_temp();
    let start = db.now();
    let mut session = db.open_session("words", words(&["gato", "mesa"]), SrsConfig::default());

    // gato: high stability, due in about 31 hours
    session.handle_grade("gato", Grade::Easy, start).expect("seeded");
    // mesa: low stability, due 34 hours from start
    session.handle_grade("mesa", Grade::Good, start + Duration::hours(10)).expect("seeded");
    let snapshot = session.snapshot(start + Duration::hours(10));

    let practice_at = start + Duration::hours(28);
    let practice = ReviewSession::practice([snapshot.clone()], SrsConfig::default(), practice_at);
    assert_eq!(practice.selection().next_key.as_deref(), Some("gato"));

    // Without a look-ahead window the weakest card wins
    let config = SrsConfig {
        almost_due_threshold_secs: 0,
        ..Default::default()
    };
    let practice = ReviewSession::practice([snapshot], config, practice_at);
    assert_eq!(practice.selection().next_key.as_deref(), Some("mesa"));
    assert_eq!(practice.selection().source, SelectionSource::Practice);
}

#[test]
fn test_practice_with_nothing_graduated() {
    let db = TestDeckManager::new_temp();
    let session = db.open_session("fresh", TestItems::spanish(4), SrsConfig::default());

    let practice = ReviewSession::practice([session.snapshot(db.now())], SrsConfig::default(), db.now());

    assert!(practice.cards().is_empty());
    assert!(practice.current_card().is_none());
    assert!(practice.selection().all_complete);
    assert_eq!(practice.selection().source, SelectionSource::Complete);
}
