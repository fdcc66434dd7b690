//! Score Ledger
//!
//! Durable per-player totals. The ledger applies each finished game as one
//! atomic upsert: concurrent finishes for the same player never lose an
//! update.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SCORE LEDGER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScoreLedger     - atomic upsert + ranked reads (trait)     │
//! │  memory.rs       - in-process table (also offline stand-in) │
//! │  file.rs         - JSON file, persisted on every write      │
//! │  scoreboard.rs   - caller side: fallback, cache, titles     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;
pub mod file;
pub mod scoreboard;

pub use memory::InMemoryLedger;
pub use file::FileLedger;
pub use scoreboard::{Leaderboard, LeaderboardEntry, PlayerStats, RecordedOutcome, Scoreboard};

/// Cumulative totals of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Unique key.
    pub username: String,
    /// Cumulative points.
    pub points: u64,
    /// Games won.
    pub correct_guesses: u64,
    /// Games finished (won, lost or forfeited).
    pub total_games: u64,
    /// Registration order; lower registered earlier.
    pub registered_seq: u64,
    /// First recorded game.
    pub registered_at: DateTime<Utc>,
    /// Last recorded game.
    pub updated_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Empty record for a new player.
    pub fn new(username: impl Into<String>, registered_seq: u64) -> Self {
        let now = Utc::now();
        Self {
            username: username.into(),
            points: 0,
            correct_guesses: 0,
            total_games: 0,
            registered_seq,
            registered_at: now,
            updated_at: now,
        }
    }

    /// Apply one finished game.
    pub fn apply(&mut self, outcome: GameOutcome) {
        self.points = self.points.saturating_add(outcome.points);
        self.total_games += 1;
        if outcome.won {
            self.correct_guesses += 1;
        }
        self.updated_at = Utc::now();
    }
}

/// One finished game, as reported to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Points to add.
    pub points: u64,
    /// Whether the game was won.
    pub won: bool,
}

impl GameOutcome {
    /// A win worth `points`.
    pub fn win(points: u64) -> Self {
        Self { points, won: true }
    }

    /// A loss or forfeit.
    pub fn loss() -> Self {
        Self { points: 0, won: false }
    }
}

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Backend cannot be reached.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    /// Persistence failed.
    #[error("ledger io: {0}")]
    Io(#[from] std::io::Error),
    /// Stored data could not be parsed.
    #[error("ledger data corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The external score store.
///
/// Implementations must make `record_outcome` atomic per player.
pub trait ScoreLedger: Send + Sync {
    /// Add a finished game to `username`'s totals, creating the row if needed.
    fn record_outcome(&self, username: &str, outcome: GameOutcome) -> Result<PlayerRecord, LedgerError>;

    /// Totals of one player.
    fn player(&self, username: &str) -> Result<Option<PlayerRecord>, LedgerError>;

    /// Best players first, see [`leaderboard_order`].
    fn top_players(&self, limit: usize) -> Result<Vec<PlayerRecord>, LedgerError>;
}

/// Points descending, then earliest registration.
pub fn leaderboard_order(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(a.registered_seq.cmp(&b.registered_seq))
}
