//! Game State
//!
//! The authoritative state of one game. It is never kept on the server
//! between requests: it travels round-trip inside the encrypted game token,
//! so the only code that changes it is the guess evaluator.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::{Difficulty, DifficultySettings};

/// Errors building a game state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// Target does not lie in `1..=max_number`.
    #[error("target {target} outside 1..={max_number}")]
    TargetOutOfRange {
        /// Requested target.
        target: u32,
        /// Upper bound.
        max_number: u32,
    },
    /// Difficulty has a zero bound or zero attempts.
    #[error("difficulty bounds must be non-zero")]
    EmptyBounds,
}

/// One in-progress game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    target: u32,
    max_number: u32,
    max_attempts: u32,
    guess_count: u32,
    history: Vec<u32>,
    difficulty: Difficulty,
    /// Unix seconds.
    started_at: i64,
}

impl GameState {
    /// Start a game with a target drawn uniformly from `1..=max_number`.
    pub fn start<R: Rng>(
        difficulty: Difficulty,
        settings: &DifficultySettings,
        rng: &mut R,
        started_at: i64,
    ) -> Result<Self, StateError> {
        if settings.max_number == 0 || settings.max_attempts == 0 {
            return Err(StateError::EmptyBounds);
        }
        let target = rng.gen_range(1..=settings.max_number);
        Self::with_target(difficulty, settings, target, started_at)
    }

    /// Start a game with a known target.
    pub fn with_target(
        difficulty: Difficulty,
        settings: &DifficultySettings,
        target: u32,
        started_at: i64,
    ) -> Result<Self, StateError> {
        if settings.max_number == 0 || settings.max_attempts == 0 {
            return Err(StateError::EmptyBounds);
        }
        if target == 0 || target > settings.max_number {
            return Err(StateError::TargetOutOfRange {
                target,
                max_number: settings.max_number,
            });
        }
        Ok(Self {
            target,
            max_number: settings.max_number,
            max_attempts: settings.max_attempts,
            guess_count: 0,
            history: Vec::new(),
            difficulty,
            started_at,
        })
    }

    /// The secret number.
    #[inline]
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Upper bound (inclusive).
    #[inline]
    pub fn max_number(&self) -> u32 {
        self.max_number
    }

    /// Guesses allowed in this game.
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Guesses accepted so far.
    #[inline]
    pub fn guess_count(&self) -> u32 {
        self.guess_count
    }

    /// Accepted guesses in submission order.
    #[inline]
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Difficulty the game was started with.
    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Start time (unix seconds).
    #[inline]
    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    /// Guesses still available.
    pub fn attempts_left(&self) -> u32 {
        self.max_attempts.saturating_sub(self.guess_count)
    }

    /// All attempts used.
    pub fn is_exhausted(&self) -> bool {
        self.guess_count >= self.max_attempts
    }

    /// Whether `guess` lies within this game's bounds.
    pub fn in_bounds(&self, guess: i64) -> bool {
        guess >= 1 && guess <= i64::from(self.max_number)
    }

    /// Check the structural invariants.
    pub fn is_consistent(&self) -> bool {
        self.max_number >= 1
            && self.max_attempts >= 1
            && (1..=self.max_number).contains(&self.target)
            && self.guess_count as usize == self.history.len()
            && self.guess_count <= self.max_attempts
            && self.history.iter().all(|g| (1..=self.max_number).contains(g))
    }

    /// Append an accepted guess.
    pub(crate) fn record_guess(&mut self, guess: u32) {
        self.history.push(guess);
        self.guess_count += 1;
    }
}
