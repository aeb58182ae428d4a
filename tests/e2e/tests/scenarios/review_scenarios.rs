//! Review Scenario Tests
//!
//! Concrete outcomes for the reference weight table
//! [0.4, 0.6, 2.4, 5.8, 4.93, 0.94, 0.86, 0.01, 1.49, 0.14, 0.94, 2.18, 0.05, 0.34, 1.26, 0.29, 2.61].

use retain_core::{FSRS_VERSION, Rating, SchedulingEngine, fsrs, retrievability};
use retain_e2e_tests::TestCardFactory;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

// ============================================================================
// FIRST REVIEWS
// ============================================================================

#[test]
fn test_new_card_rated_good() {
    let engine = TestCardFactory::engine();
    let result = engine.review(&TestCardFactory::new_card(), 3).unwrap();

    assert_eq!(result.card.stability, 2.4);
    assert_eq!(result.card.scheduled_days, 2);
    assert_eq!(result.card.reps, 1);
    assert_eq!(result.card.lapses, 0);
    assert!(approx_eq(result.card.difficulty, 4.93, 1e-9));
}

#[test]
fn test_new_card_rated_again() {
    let engine = TestCardFactory::engine();
    let card = TestCardFactory::new_card();
    let result = engine.review(&card, 1).unwrap();

    assert_eq!(result.card.scheduled_days, 1);
    assert_eq!(result.card.reps, 0);
    assert_eq!(result.card.lapses, card.lapses);
}

#[test]
fn test_new_card_rated_easy() {
    let engine = TestCardFactory::engine();
    let good = engine.review(&TestCardFactory::new_card(), 3).unwrap();
    let easy = engine.review(&TestCardFactory::new_card(), 4).unwrap();

    assert_eq!(easy.card.stability, 5.8);
    assert_eq!(easy.card.scheduled_days, 6);
    assert!(approx_eq(easy.card.difficulty, 3.99, 1e-9));
    assert!(easy.card.scheduled_days >= good.card.scheduled_days);
}

#[test]
fn test_new_card_rated_hard() {
    let engine = TestCardFactory::engine();
    let good = engine.review(&TestCardFactory::new_card(), 3).unwrap();
    let hard = engine.review(&TestCardFactory::new_card(), 2).unwrap();

    assert_eq!(hard.card.stability, 0.6);
    assert_eq!(hard.card.scheduled_days, 1);
    assert!(approx_eq(hard.card.difficulty, 5.87, 1e-9));
    assert!(hard.card.scheduled_days <= good.card.scheduled_days);
}

// ============================================================================
// LEARNED CARDS
// ============================================================================

#[test]
fn test_learned_card_lapse() {
    let engine = TestCardFactory::engine();
    let result = engine.review(&TestCardFactory::reference_card(), 1).unwrap();

    assert_eq!(result.card.lapses, 1);
    assert_eq!(result.card.reps, 3);
    assert_eq!(result.card.scheduled_days, 1);
}

#[test]
fn test_learned_card_good() {
    let engine = TestCardFactory::engine();
    let result = engine.review(&TestCardFactory::reference_card(), 3).unwrap();

    assert_eq!(result.card.reps, 4);
    assert!(result.card.stability >= 10.0);
    assert!(result.card.difficulty >= 1.0 && result.card.difficulty <= 10.0);
}

#[test]
fn test_lapse_always_one_day_for_learned_cards() {
    let engine = TestCardFactory::engine();
    for card in [
        TestCardFactory::reference_card(),
        TestCardFactory::mature_card(),
        TestCardFactory::leech_card(),
    ] {
        let result = engine.review(&card, 1).unwrap();
        assert_eq!(result.card.scheduled_days, 1);
        assert_eq!(result.card.lapses, card.lapses + 1);
        assert_eq!(result.card.reps, card.reps);
    }
}

#[test]
fn test_mature_card_lapse_loses_most_stability() {
    let engine = TestCardFactory::engine();
    let card = TestCardFactory::mature_card();
    let result = engine.review(&card, Rating::Again).unwrap();
    assert!(result.card.stability < card.stability / 4.0);
    assert!(result.card.stability >= fsrs::MIN_STABILITY);
}

#[test]
fn test_leech_card_difficulty_stays_bounded() {
    let engine = TestCardFactory::engine();
    let mut card = TestCardFactory::leech_card();
    for _ in 0..20 {
        card = engine.review(&card, 1).unwrap().card;
        assert!(card.difficulty <= fsrs::MAX_DIFFICULTY);
        assert!(card.stability >= fsrs::MIN_STABILITY);
    }
    assert_eq!(card.lapses, 28);
    assert_eq!(card.reps, 2);
}

// ============================================================================
// BOUNDARIES
// ============================================================================

#[test]
fn test_stability_defines_ninety_percent_recall() {
    for s in [0.5, 2.4, 10.0, 90.0] {
        assert!(approx_eq(retrievability(s, s), 0.9, 1e-9));
    }
}

#[test]
fn test_invalid_qualities_fail_without_touching_card() {
    let engine = TestCardFactory::engine();
    let card = TestCardFactory::reference_card();
    let before = card.clone();

    for q in [0i64, 5, -1, 42] {
        assert!(engine.review(&card, q).unwrap_err().is_invalid_quality());
    }
    for q in [1.5f64, 2.999, f64::NAN] {
        assert!(engine.review(&card, q).unwrap_err().is_invalid_quality());
    }

    assert_eq!(card, before);
}

#[test]
fn test_due_date_is_day_boundary_after_interval() {
    let engine = TestCardFactory::engine();
    let result = engine.review(&TestCardFactory::new_card(), 4).unwrap();
    // epoch is 2026-03-02 10:15 UTC, Easy plans 6 days
    assert_eq!(result.due_date, TestCardFactory::midnight(2026, 3, 8));
}

#[test]
fn test_results_stamped_with_calibration() {
    let engine = SchedulingEngine::new();
    let result = engine.review(&TestCardFactory::new_card(), 3).unwrap();
    assert_eq!(result.parameters_version, fsrs::DEFAULT_PARAMETERS_VERSION);
    assert_eq!(FSRS_VERSION, "4.5");
}

#[test]
fn test_result_serializes_for_store() {
    let engine = TestCardFactory::engine();
    let result = engine.review(&TestCardFactory::reference_card(), 3).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["card"]["reps"], 4);
    assert_eq!(json["rating"], "good");
    assert!(json["dueDate"].as_str().unwrap().starts_with("2026-"));
    assert_eq!(json["parametersVersion"], "fsrs-4.5");
}
