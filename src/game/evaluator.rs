//! Guess Evaluation
//!
//! Pure mapping from `(state, raw input)` to `(verdict, next state)`.
//! Input is validated before anything is recorded: a rejected guess
//! never consumes an attempt.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::GameConfig;
use crate::game::state::GameState;

/// Reasons a raw guess is rejected without consuming an attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// Input is not an integer.
    #[error("Invalid number.")]
    NotANumber,
    /// Integer outside `1..=max_number`.
    #[error("Pick a number between 1 and {max_number}.")]
    OutOfRange {
        /// Parsed guess.
        guess: i64,
        /// Upper bound of the game.
        max_number: u32,
    },
    /// All attempts already used.
    #[error("This game is already over.")]
    GameOver,
}

/// Outcome of one accepted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Guess below the target; game continues.
    TooLow,
    /// Guess above the target; game continues.
    TooHigh,
    /// Guess equals the target.
    Win {
        /// Points awarded.
        points: u64,
    },
    /// Attempts exhausted without a hit.
    Lose {
        /// The revealed target.
        target: u32,
    },
}

impl Verdict {
    /// Win or lose.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Verdict::Win { .. } | Verdict::Lose { .. })
    }

    /// Wire status for this verdict.
    pub fn status(&self) -> GuessStatus {
        match self {
            Verdict::TooLow | Verdict::TooHigh => GuessStatus::Continue,
            Verdict::Win { .. } => GuessStatus::Win,
            Verdict::Lose { .. } => GuessStatus::Lose,
        }
    }

    /// Direction hint for a miss.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Verdict::TooLow => Some("Higher"),
            Verdict::TooHigh => Some("Lower"),
            _ => None,
        }
    }
}

/// Status reported to the client for a guess submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessStatus {
    /// Input rejected, attempt not consumed.
    Warning,
    /// Miss, game continues.
    Continue,
    /// Game won.
    Win,
    /// Game lost.
    Lose,
}

/// Result of evaluating an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// The parsed guess.
    pub guess: u32,
    /// Verdict for the guess.
    pub verdict: Verdict,
    /// State after the guess.
    pub state: GameState,
}

/// Evaluates guesses under a fixed rule set.
#[derive(Debug, Clone)]
pub struct GuessEvaluator {
    config: Arc<GameConfig>,
}

impl GuessEvaluator {
    /// Create an evaluator.
    pub fn new(config: Arc<GameConfig>) -> Self {
        Self { config }
    }

    /// Evaluate a raw guess against `state`.
    ///
    /// On `Err` the caller keeps `state` unchanged.
    pub fn evaluate(&self, state: &GameState, raw: &str) -> Result<Evaluation, InvalidInput> {
        if state.is_exhausted() {
            return Err(InvalidInput::GameOver);
        }

        let parsed = parse_guess(raw)?;
        if !state.in_bounds(parsed) {
            return Err(InvalidInput::OutOfRange {
                guess: parsed,
                max_number: state.max_number(),
            });
        }
        // in_bounds guarantees 1..=u32 range
        let guess = parsed as u32;

        let mut next = state.clone();
        next.record_guess(guess);

        let verdict = if guess == next.target() {
            let base = self.config.settings(next.difficulty()).base_points;
            Verdict::Win {
                points: points_for(base, next.max_attempts(), next.guess_count()),
            }
        } else if next.is_exhausted() {
            Verdict::Lose { target: next.target() }
        } else if guess < next.target() {
            Verdict::TooLow
        } else {
            Verdict::TooHigh
        };

        Ok(Evaluation { guess, verdict, state: next })
    }
}

/// Parse raw client input as an integer.
pub fn parse_guess(raw: &str) -> Result<i64, InvalidInput> {
    raw.trim().parse::<i64>().map_err(|_| InvalidInput::NotANumber)
}

/// Points for a win on attempt `guess_count`.
///
/// `base + base * unused_attempts / max_attempts`: a first-try win earns up
/// to twice the base, a last-attempt win earns exactly the base.
pub fn points_for(base: u64, max_attempts: u32, guess_count: u32) -> u64 {
    if max_attempts == 0 {
        return base;
    }
    let unused = u64::from(max_attempts.saturating_sub(guess_count));
    base + base * unused / u64::from(max_attempts)
}
