//! FSRS-4.5 formulas
//!
//! Pure functions over `f64`. Each `*_with_weights` variant takes the weight
//! table explicitly; the plain variants use [`FSRS45_WEIGHTS`].

use super::parameters::{FSRS45_WEIGHTS, WEIGHT_COUNT};
use super::scheduler::Rating;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Retrievability at which a card is considered due
pub const TARGET_RETENTION: f64 = 0.9;

/// Power-law decay exponent of the forgetting curve
pub const DECAY: f64 = -1.0;

/// Lower bound on stability after any review
pub const MIN_STABILITY: f64 = 0.1;

/// Lower bound on difficulty
pub const MIN_DIFFICULTY: f64 = 1.0;

/// Upper bound on difficulty
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Shortest interval the planner will produce
pub const MIN_INTERVAL_DAYS: u32 = 1;

/// Longest interval the planner will produce (about a century)
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

type Weights = [f64; WEIGHT_COUNT];

/// Curve factor chosen so that R(S, S) == TARGET_RETENTION.
///
/// FACTOR = TARGET^(1/DECAY) - 1, which is 1/9 for TARGET = 0.9, DECAY = -1.
#[inline]
pub fn decay_factor() -> f64 {
    TARGET_RETENTION.powf(1.0 / DECAY) - 1.0
}

// ============================================================================
// RETRIEVABILITY
// ============================================================================

/// Probability of recall after `elapsed_days` for a card of given stability.
///
/// R = (1 + FACTOR * t / S)^DECAY. A non-positive (or NaN) stability means
/// the card was never learned and returns 0.
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    if !(stability > 0.0) {
        return 0.0;
    }
    let t = elapsed_days.max(0.0);
    (1.0 + decay_factor() * t / stability)
        .powf(DECAY)
        .clamp(0.0, 1.0)
}

// ============================================================================
// INTERVAL
// ============================================================================

/// Whole-day interval after which retrievability falls to TARGET_RETENTION.
///
/// Inverting the forgetting curve gives I = S / FACTOR * (TARGET^(1/DECAY) - 1).
/// Since FACTOR is defined from the same target and decay, the two terms
/// cancel and I == S for the current constants. Keep the full form: changing
/// either constant independently breaks the shortcut.
pub fn next_interval(stability: f64) -> u32 {
    let raw = stability / decay_factor() * (TARGET_RETENTION.powf(1.0 / DECAY) - 1.0);
    // NaN.clamp yields NaN, which `as u32` maps to 0
    let days = raw
        .round()
        .clamp(MIN_INTERVAL_DAYS as f64, MAX_INTERVAL_DAYS as f64);
    (days as u32).max(MIN_INTERVAL_DAYS)
}

// ============================================================================
// STABILITY
// ============================================================================

/// Stability after the very first review
pub fn initial_stability(rating: Rating) -> f64 {
    initial_stability_with_weights(rating, &FSRS45_WEIGHTS)
}

/// Stability after the very first review, custom weights
pub fn initial_stability_with_weights(rating: Rating, w: &Weights) -> f64 {
    w[rating.index()].max(MIN_STABILITY)
}

/// Stability after a successful (Hard/Good/Easy) recall
pub fn next_recall_stability(difficulty: f64, stability: f64, r: f64, rating: Rating) -> f64 {
    next_recall_stability_with_weights(difficulty, stability, r, rating, &FSRS45_WEIGHTS)
}

/// Stability after a successful recall, custom weights.
///
/// S' = S * (1 + e^w8 * (11 - D) * S^-w9 * (e^(w10 * (1 - R)) - 1) * h * b)
///
/// Never returns less than `stability`.
pub fn next_recall_stability_with_weights(
    difficulty: f64,
    stability: f64,
    r: f64,
    rating: Rating,
    w: &Weights,
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };

    let growth = w[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-w[9])
        * (w[10] * (1.0 - r)).exp_m1()
        * hard_penalty
        * easy_bonus;

    let new_s = stability * (1.0 + growth);
    new_s.max(stability).max(MIN_STABILITY)
}

/// Stability after a lapse (Again on a learned card)
pub fn next_forget_stability(difficulty: f64, stability: f64, r: f64) -> f64 {
    next_forget_stability_with_weights(difficulty, stability, r, &FSRS45_WEIGHTS)
}

/// Stability after a lapse, custom weights.
///
/// S' = w11 * D^-w12 * ((S + 1)^w13 - 1) * e^(w14 * (1 - R))
///
/// Only floored at MIN_STABILITY; a lapse may shrink stability.
pub fn next_forget_stability_with_weights(
    difficulty: f64,
    stability: f64,
    r: f64,
    w: &Weights,
) -> f64 {
    let new_s = w[11]
        * difficulty.powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * (w[14] * (1.0 - r)).exp();
    new_s.max(MIN_STABILITY)
}

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Difficulty after the very first review
pub fn initial_difficulty(rating: Rating) -> f64 {
    initial_difficulty_with_weights(rating, &FSRS45_WEIGHTS)
}

/// D0(G) = w4 - w5 * (G - 3), clamped to [1, 10]
pub fn initial_difficulty_with_weights(rating: Rating, w: &Weights) -> f64 {
    (w[4] - w[5] * rating.offset_from_good()).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Difficulty after any later review
pub fn next_difficulty(difficulty: f64, rating: Rating) -> f64 {
    next_difficulty_with_weights(difficulty, rating, &FSRS45_WEIGHTS)
}

/// Mean reversion toward D0(Good):
/// D' = w6 * D0(3) + (1 - w6) * (D - w7 * (G - 3)), clamped to [1, 10]
pub fn next_difficulty_with_weights(difficulty: f64, rating: Rating, w: &Weights) -> f64 {
    let anchor = initial_difficulty_with_weights(Rating::Good, w);
    let stepped = difficulty - w[7] * rating.offset_from_good();
    (w[6] * anchor + (1.0 - w[6]) * stepped).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}
