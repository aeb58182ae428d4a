//! FSRS-4.5 (Free Spaced Repetition Scheduler) Module
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki/wiki/The-Algorithm
//!
//! ## Core Formulas:
//! - Retrievability: R = (1 + FACTOR * t / S)^DECAY with DECAY = -1, FACTOR = 0.9^(1/DECAY) - 1
//! - Interval: t = S / FACTOR * (R^(1/DECAY) - 1), which is S at R = 0.9
//! - Initial difficulty: D0(G) = w4 - w5 * (G - 3)
//! - Difficulty update: D' = w6 * D0(3) + (1 - w6) * (D - w7 * (G - 3))
//! - Recall stability: S' = S * (1 + e^w8 * (11 - D) * S^-w9 * (e^(w10 * (1 - R)) - 1) * h * b)
//! - Forget stability: S' = w11 * D^-w12 * ((S + 1)^w13 - 1) * e^(w14 * (1 - R))

mod algorithm;
mod parameters;
mod scheduler;

pub use algorithm::{
    decay_factor,
    initial_difficulty,
    initial_difficulty_with_weights,
    initial_stability,
    initial_stability_with_weights,
    next_difficulty,
    next_difficulty_with_weights,
    next_forget_stability,
    next_forget_stability_with_weights,
    next_interval,
    next_recall_stability,
    next_recall_stability_with_weights,
    // Core functions
    retrievability,
    // Constants
    DECAY,
    MAX_DIFFICULTY,
    MAX_INTERVAL_DAYS,
    MIN_DIFFICULTY,
    MIN_INTERVAL_DAYS,
    MIN_STABILITY,
    TARGET_RETENTION,
};

pub use parameters::{DEFAULT_PARAMETERS_VERSION, FSRS45_WEIGHTS, FsrsParameters, WEIGHT_COUNT};

pub use scheduler::{
    CardPhase, MemoryCard, NEW_CARD_DIFFICULTY, PreviewResults, Rating, SchedulingEngine,
    SchedulingResult, new_card,
};
