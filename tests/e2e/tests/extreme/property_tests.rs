//! Property-Based Tests for the Scheduling Engine
//!
//! Tests the following invariants:
//! - Forgetting curve: R(0, S) = 1, monotone in t, zero for S <= 0
//! - Bounded difficulty after every review
//! - Successful recall never shrinks stability
//! - Minimum stability and interval after every review
//! - Counters never decrease; input cards are never mutated
//! - Out-of-domain qualities always fail

use proptest::prelude::*;

use retain_core::fsrs::{MAX_DIFFICULTY, MIN_DIFFICULTY, MIN_STABILITY};
use retain_core::{MemoryCard, Rating, retrievability};
use retain_e2e_tests::TestCardFactory;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_stability() -> impl Strategy<Value = f64> {
    (1u64..=3_650_000u64).prop_map(|v| v as f64 / 1000.0)
}

fn arb_elapsed() -> impl Strategy<Value = f64> {
    (0u64..=1_000_000u64).prop_map(|v| v as f64 / 1000.0)
}

fn arb_rating() -> impl Strategy<Value = Rating> {
    prop_oneof![
        Just(Rating::Again),
        Just(Rating::Hard),
        Just(Rating::Good),
        Just(Rating::Easy),
    ]
}

fn arb_success() -> impl Strategy<Value = Rating> {
    prop_oneof![Just(Rating::Hard), Just(Rating::Good), Just(Rating::Easy)]
}

fn arb_learned_card() -> impl Strategy<Value = MemoryCard> {
    (
        (100u64..=36_500_000u64).prop_map(|v| v as f64 / 1000.0), // stability
        (1.0f64..=10.0f64),                                       // difficulty
        arb_elapsed(),                                            // elapsed_days
        (1u32..=3650u32),                                         // scheduled_days
        (1u32..=500u32),                                          // reps
        (0u32..=100u32),                                          // lapses
    )
        .prop_map(
            |(stability, difficulty, elapsed_days, scheduled_days, reps, lapses)| MemoryCard {
                stability,
                difficulty,
                elapsed_days,
                scheduled_days,
                reps,
                lapses,
            },
        )
}

fn arb_any_card() -> impl Strategy<Value = MemoryCard> {
    prop_oneof![Just(MemoryCard::new()), arb_learned_card()]
}

// ============================================================================
// Forgetting curve
// ============================================================================

proptest! {
    #[test]
    fn prop_retrievability_starts_at_one(s in arb_stability()) {
        prop_assert_eq!(retrievability(0.0, s), 1.0);
    }

    #[test]
    fn prop_retrievability_monotone(s in arb_stability(), t1 in arb_elapsed(), dt in arb_elapsed()) {
        let t2 = t1 + dt;
        prop_assert!(retrievability(t1, s) >= retrievability(t2, s));
    }

    #[test]
    fn prop_retrievability_zero_without_stability(t in arb_elapsed(), s in -1000.0f64..=0.0f64) {
        prop_assert_eq!(retrievability(t, s), 0.0);
    }

    #[test]
    fn prop_retrievability_in_unit_interval(s in arb_stability(), t in arb_elapsed()) {
        let r = retrievability(t, s);
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn prop_stability_is_ninety_percent_point(s in arb_stability()) {
        prop_assert!((retrievability(s, s) - 0.9).abs() < 1e-9);
    }
}

// ============================================================================
// Review invariants
// ============================================================================

proptest! {
    #[test]
    fn prop_difficulty_bounded(card in arb_any_card(), rating in arb_rating()) {
        let result = TestCardFactory::engine().review(&card, rating).unwrap();
        prop_assert!(result.card.difficulty >= MIN_DIFFICULTY);
        prop_assert!(result.card.difficulty <= MAX_DIFFICULTY);
    }

    #[test]
    fn prop_success_never_shrinks_stability(card in arb_learned_card(), rating in arb_success()) {
        let result = TestCardFactory::engine().review(&card, rating).unwrap();
        prop_assert!(result.card.stability >= card.stability);
    }

    #[test]
    fn prop_minimum_stability_and_interval(card in arb_any_card(), rating in arb_rating()) {
        let result = TestCardFactory::engine().review(&card, rating).unwrap();
        prop_assert!(result.card.stability >= MIN_STABILITY);
        prop_assert!(result.card.scheduled_days >= 1);
    }

    #[test]
    fn prop_counters_never_decrease(card in arb_any_card(), rating in arb_rating()) {
        let result = TestCardFactory::engine().review(&card, rating).unwrap();
        prop_assert!(result.card.reps >= card.reps);
        prop_assert!(result.card.lapses >= card.lapses);
    }

    #[test]
    fn prop_input_not_mutated(card in arb_any_card(), rating in arb_rating()) {
        let before = card.clone();
        let _ = TestCardFactory::engine().review(&card, rating).unwrap();
        prop_assert_eq!(card, before);
    }

    #[test]
    fn prop_elapsed_days_carried_through(card in arb_any_card(), rating in arb_rating()) {
        let result = TestCardFactory::engine().review(&card, rating).unwrap();
        prop_assert_eq!(result.card.elapsed_days, card.elapsed_days);
    }

    #[test]
    fn prop_learned_lapse_is_one_day(card in arb_learned_card()) {
        let result = TestCardFactory::engine().review(&card, Rating::Again).unwrap();
        prop_assert_eq!(result.card.scheduled_days, 1);
        prop_assert_eq!(result.card.lapses, card.lapses + 1);
        prop_assert_eq!(result.card.reps, card.reps);
    }
}

// ============================================================================
// Invalid input
// ============================================================================

proptest! {
    #[test]
    fn prop_out_of_range_integer_rejected(q in prop_oneof![i64::MIN..=0i64, 5i64..=i64::MAX]) {
        let card = TestCardFactory::reference_card();
        let err = TestCardFactory::engine().review(&card, q).unwrap_err();
        prop_assert!(err.is_invalid_quality());
    }

    #[test]
    fn prop_non_integer_rejected(whole in 0i32..=5i32, frac in 0.001f64..0.999f64) {
        let card = TestCardFactory::reference_card();
        let q = whole as f64 + frac;
        let err = TestCardFactory::engine().review(&card, q).unwrap_err();
        prop_assert!(err.is_invalid_quality());
    }
}
