//! # Retain Core
//!
//! Spaced repetition scheduling engine. Given a learner's recall rating for a
//! memorized item, computes the item's new memory strength and the day it is
//! next due.
//!
//! - **FSRS-4.5**: 17-weight stability/difficulty model with a power-law forgetting curve
//! - **Explicit phases**: new vs. learned cards are an exhaustive enum, not a counter check
//! - **Versioned calibration**: one immutable weight table per engine, stamped on every result
//! - **Injected clock**: due dates are computed from a [`Clock`], so tests are deterministic
//!
//! Persistence, queue selection and transport belong to the caller. The engine
//! reads a [`MemoryCard`] and returns a new one; it never mutates its input.
//!
//! ## Quick Start
//!
//! ```rust
//! use retain_core::{Rating, SchedulingEngine, new_card};
//!
//! let engine = SchedulingEngine::new();
//!
//! // First review of a new card
//! let first = engine.review(&new_card(), Rating::Good)?;
//! assert_eq!(first.card.scheduled_days, 2);
//!
//! // Ten days later the learner recalls it again
//! let card = first.card.with_elapsed_days(10.0);
//! let second = engine.review(&card, 3)?;
//! assert!(second.card.stability >= card.stability);
//!
//! // Out-of-range ratings are rejected before anything is computed
//! assert!(engine.review(&card, 5).is_err());
//! # Ok::<(), retain_core::SchedulerError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod clock;
pub mod error;
pub mod fsrs;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use clock::{Clock, FixedClock, SystemClock, days_between, due_date};
pub use error::{Result, SchedulerError};

// FSRS-4.5 algorithm
pub use fsrs::{
    CardPhase,
    FsrsParameters,
    MemoryCard,
    PreviewResults,
    Rating,
    SchedulingEngine,
    SchedulingResult,
    initial_difficulty,
    initial_stability,
    new_card,
    next_difficulty,
    next_forget_stability,
    next_interval,
    next_recall_stability,
    // Core functions for advanced usage
    retrievability,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// FSRS algorithm version (4.5 = 17 parameters)
pub const FSRS_VERSION: &str = "4.5";

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Clock, FixedClock, FsrsParameters, MemoryCard, Rating, Result, SchedulerError,
        SchedulingEngine, SchedulingResult, SystemClock, new_card,
    };
}
