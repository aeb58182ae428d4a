//! FSRS Scheduler
//!
//! Turns a learner's rating into the next memory card state and due date.
//!
//! | Phase   | Rating     | Effect                                                   |
//! |---------|------------|----------------------------------------------------------|
//! | New     | Again      | first-review S/D, 1 day, reps and lapses untouched       |
//! | New     | Hard..Easy | first-review S/D, reps = 1, planned interval             |
//! | Learned | Again      | forget S, reverted D, lapses + 1, 1 day                  |
//! | Learned | Hard..Easy | recall S (never shrinks), reverted D, reps + 1, interval |

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::algorithm::{
    MAX_DIFFICULTY, MIN_DIFFICULTY, MIN_STABILITY, initial_difficulty_with_weights,
    initial_stability_with_weights, next_difficulty_with_weights,
    next_forget_stability_with_weights, next_interval, next_recall_stability_with_weights,
    retrievability,
};
use super::parameters::FsrsParameters;
use crate::clock::{Clock, SystemClock, due_date};
use crate::error::{Result, SchedulerError};

// ============================================================================
// RATING
// ============================================================================

/// Learner's self-reported recall quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rating {
    /// Failed to recall
    Again = 1,
    /// Recalled with serious effort
    Hard = 2,
    /// Recalled normally
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

impl Rating {
    /// All ratings, worst first
    pub fn all() -> [Rating; 4] {
        [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy]
    }

    /// Integer quality 1-4
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Create from integer quality
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    /// Name shown to learners
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }

    /// Whether this rating counts as a successful recall
    pub fn is_success(self) -> bool {
        self != Rating::Again
    }

    /// Zero-based index into the initial-stability weights
    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }

    /// G - 3
    pub(crate) fn offset_from_good(self) -> f64 {
        f64::from(self.value()) - 3.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

macro_rules! rating_try_from_int {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for Rating {
                type Error = SchedulerError;

                fn try_from(value: $ty) -> Result<Self> {
                    i64::try_from(value)
                        .ok()
                        .and_then(Rating::from_i64)
                        .ok_or_else(|| SchedulerError::InvalidQuality(value.to_string()))
                }
            }
        )*
    };
}

rating_try_from_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl TryFrom<f64> for Rating {
    type Error = SchedulerError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(SchedulerError::InvalidQuality(value.to_string()));
        }
        Rating::from_i64(value as i64)
            .ok_or_else(|| SchedulerError::InvalidQuality(value.to_string()))
    }
}

// ============================================================================
// MEMORY CARD
// ============================================================================

/// Difficulty a never-reviewed card carries until its first rating
pub const NEW_CARD_DIFFICULTY: f64 = 5.0;

/// Scheduling state of one memorized item, as persisted by a card store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCard {
    /// Days until retrievability decays to 90%; 0 means never reviewed
    pub stability: f64,
    /// Intrinsic difficulty, 1 to 10
    pub difficulty: f64,
    /// Days since the review that produced `stability`
    pub elapsed_days: f64,
    /// Interval planned at the last review
    pub scheduled_days: u32,
    /// Successful or neutral reviews (not incremented on lapse)
    pub reps: u32,
    /// Failed recalls after leaving the new phase
    pub lapses: u32,
}

impl Default for MemoryCard {
    fn default() -> Self {
        Self {
            stability: 0.0,
            difficulty: NEW_CARD_DIFFICULTY,
            elapsed_days: 0.0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
        }
    }
}

impl MemoryCard {
    /// A never-reviewed card
    pub fn new() -> Self {
        Self::default()
    }

    /// Same card, `days` after its last review
    pub fn with_elapsed_days(mut self, days: f64) -> Self {
        self.elapsed_days = days;
        self
    }

    /// Which branch of the state machine this card is in
    pub fn phase(&self) -> CardPhase {
        match NonZeroU32::new(self.reps) {
            None => CardPhase::New,
            Some(reps) => CardPhase::Learned {
                reps,
                lapses: self.lapses,
            },
        }
    }

    /// Whether the card has never left the new phase
    pub fn is_new(&self) -> bool {
        self.reps == 0
    }

    /// Probability of recall at `elapsed_days`
    pub fn retrievability(&self) -> f64 {
        retrievability(self.elapsed_days, self.stability)
    }
}

/// Factory for a never-reviewed card
pub fn new_card() -> MemoryCard {
    MemoryCard::new()
}

/// Learning phase derived from the persisted counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    /// Never successfully reviewed
    New,
    /// Reviewed at least once
    Learned {
        /// Successful reviews so far
        reps: NonZeroU32,
        /// Lapses so far
        lapses: u32,
    },
}

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingResult {
    /// The new card state
    pub card: MemoryCard,
    /// Midnight UTC of the day the card is next due
    pub due_date: DateTime<Utc>,
    /// Instant the review was computed at
    pub reviewed_at: DateTime<Utc>,
    /// Rating that produced this result
    pub rating: Rating,
    /// Retrievability of the input card at review time
    pub retrievability: f64,
    /// Version of the weight table used
    pub parameters_version: String,
}

impl SchedulingResult {
    /// Interval planned by this review
    pub fn interval_days(&self) -> u32 {
        self.card.scheduled_days
    }
}

/// Outcome of each possible rating for one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResults {
    /// Result if rated Again
    pub again: SchedulingResult,
    /// Result if rated Hard
    pub hard: SchedulingResult,
    /// Result if rated Good
    pub good: SchedulingResult,
    /// Result if rated Easy
    pub easy: SchedulingResult,
}

impl PreviewResults {
    /// Result for a given rating
    pub fn get(&self, rating: Rating) -> &SchedulingResult {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// FSRS scheduling engine
///
/// Holds one immutable weight table and a clock. `review` is pure apart from
/// reading the clock, so one engine can serve any number of threads.
///
/// ```
/// use retain_core::{SchedulingEngine, new_card};
///
/// let engine = SchedulingEngine::new();
/// let result = engine.review(&new_card(), 3).unwrap();
/// assert_eq!(result.card.reps, 1);
/// assert_eq!(result.card.scheduled_days, 2);
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingEngine<C = SystemClock> {
    parameters: FsrsParameters,
    clock: C,
}

impl Default for SchedulingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingEngine {
    /// Engine with the FSRS-4.5 defaults and the wall clock
    pub fn new() -> Self {
        Self {
            parameters: FsrsParameters::default(),
            clock: SystemClock,
        }
    }

    /// Engine with a custom weight table and the wall clock
    pub fn with_parameters(parameters: FsrsParameters) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            parameters,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> SchedulingEngine<C> {
    /// Swap the time source
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SchedulingEngine<C2> {
        SchedulingEngine {
            parameters: self.parameters,
            clock,
        }
    }

    /// Weight table in use
    pub fn parameters(&self) -> &FsrsParameters {
        &self.parameters
    }

    /// Time source in use
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// A never-reviewed card
    pub fn new_card(&self) -> MemoryCard {
        MemoryCard::new()
    }

    /// Current retrievability of a stored card
    pub fn retrievability_of(&self, card: &MemoryCard) -> f64 {
        card.retrievability()
    }

    /// Apply one rating to a card, due date counted from the engine clock.
    ///
    /// `quality` may be a [`Rating`], any integer, or an `f64`. Anything other
    /// than an integer 1-4 fails with [`SchedulerError::InvalidQuality`]
    /// before any state is computed.
    pub fn review<Q>(&self, card: &MemoryCard, quality: Q) -> Result<SchedulingResult>
    where
        Q: TryInto<Rating>,
        SchedulerError: From<Q::Error>,
    {
        let rating: Rating = quality.try_into()?;
        Ok(self.schedule(card, rating, self.clock.now()))
    }

    /// Apply one rating to a card at an explicit instant
    pub fn review_at<Q>(
        &self,
        card: &MemoryCard,
        quality: Q,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult>
    where
        Q: TryInto<Rating>,
        SchedulerError: From<Q::Error>,
    {
        let rating: Rating = quality.try_into()?;
        Ok(self.schedule(card, rating, now))
    }

    /// Outcome of every rating, all computed at the same instant
    pub fn preview(&self, card: &MemoryCard) -> PreviewResults {
        let now = self.clock.now();
        PreviewResults {
            again: self.schedule(card, Rating::Again, now),
            hard: self.schedule(card, Rating::Hard, now),
            good: self.schedule(card, Rating::Good, now),
            easy: self.schedule(card, Rating::Easy, now),
        }
    }

    fn schedule(&self, card: &MemoryCard, rating: Rating, now: DateTime<Utc>) -> SchedulingResult {
        let w = &self.parameters.weights;
        let r = card.retrievability();
        tracing::trace!(
            "retrievability {:.4} at {:.2} days (S = {:.3})",
            r,
            card.elapsed_days,
            card.stability
        );

        let next = match card.phase() {
            CardPhase::New => {
                let stability = initial_stability_with_weights(rating, w);
                let difficulty = initial_difficulty_with_weights(rating, w);
                let (reps, scheduled_days) = match rating {
                    Rating::Again => (0, 1),
                    _ => (1, next_interval(stability)),
                };
                MemoryCard {
                    stability,
                    difficulty,
                    elapsed_days: card.elapsed_days,
                    scheduled_days,
                    reps,
                    lapses: card.lapses,
                }
            }
            CardPhase::Learned { reps, lapses } => {
                let (prior_s, prior_d) = sanitize(card);
                let difficulty = next_difficulty_with_weights(prior_d, rating, w);
                match rating {
                    Rating::Again => MemoryCard {
                        stability: next_forget_stability_with_weights(prior_d, prior_s, r, w),
                        difficulty,
                        elapsed_days: card.elapsed_days,
                        scheduled_days: 1,
                        reps: reps.get(),
                        lapses: lapses.saturating_add(1),
                    },
                    Rating::Hard | Rating::Good | Rating::Easy => {
                        let stability =
                            next_recall_stability_with_weights(prior_d, prior_s, r, rating, w);
                        MemoryCard {
                            stability,
                            difficulty,
                            elapsed_days: card.elapsed_days,
                            scheduled_days: next_interval(stability),
                            reps: reps.get().saturating_add(1),
                            lapses,
                        }
                    }
                }
            }
        };

        tracing::debug!(
            rating = rating.value(),
            new_card = card.is_new(),
            "review: S {:.3} -> {:.3}, D {:.3} -> {:.3}, interval {} days",
            card.stability,
            next.stability,
            card.difficulty,
            next.difficulty,
            next.scheduled_days
        );

        SchedulingResult {
            due_date: due_date(now, next.scheduled_days),
            reviewed_at: now,
            rating,
            retrievability: r,
            parameters_version: self.parameters.version.clone(),
            card: next,
        }
    }
}

/// Bring a stored card's stability and difficulty back into the formulas' domain
fn sanitize(card: &MemoryCard) -> (f64, f64) {
    let stability = if card.stability >= MIN_STABILITY {
        card.stability
    } else {
        MIN_STABILITY
    };
    let difficulty = if card.difficulty.is_nan() {
        NEW_CARD_DIFFICULTY
    } else {
        card.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    };

    if stability != card.stability || difficulty != card.difficulty {
        tracing::warn!(
            "Card with reps {} had out-of-range state (S = {}, D = {}); using S = {}, D = {}",
            card.reps,
            card.stability,
            card.difficulty,
            stability,
            difficulty
        );
    }

    (stability, difficulty)
}
