//! Scoreboard
//!
//! Caller side of the ledger. Records each finished game exactly once,
//! diverts to a transient local ledger when the primary one is down, caches
//! ranked reads and derives titles.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::core::config::GameConfig;
use crate::core::title::display_title;

use super::memory::InMemoryLedger;
use super::{GameOutcome, LedgerError, ScoreLedger};

/// Result of recording a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedOutcome {
    /// Player's cumulative points after the game.
    pub points: u64,
    /// Title after the game.
    pub title: Option<String>,
    /// Recorded in the local stand-in instead of the ledger.
    pub offline: bool,
}

/// A player's totals as shown to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Cumulative points.
    pub points: u64,
    /// Games finished.
    pub total_games: u64,
    /// Games won.
    pub correct_guesses: u64,
    /// Current title.
    pub title: Option<String>,
    /// Read from the local stand-in; ledger unreachable.
    pub offline: bool,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank.
    pub rank: usize,
    /// Player name.
    pub username: String,
    /// Cumulative points.
    pub points: u64,
    /// Title.
    pub title: Option<String>,
}

/// Ranked players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Best first.
    pub entries: Vec<LeaderboardEntry>,
    /// Ledger unreachable; entries are stale or empty.
    pub offline: bool,
}

struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Clone> Cached<T> {
    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.fetched_at.elapsed() < ttl).then(|| self.value.clone())
    }
}

/// Ledger client used by the request handlers.
pub struct Scoreboard {
    primary: Arc<dyn ScoreLedger>,
    fallback: InMemoryLedger,
    config: Arc<GameConfig>,
    leaderboard: Mutex<Option<Cached<Vec<LeaderboardEntry>>>>,
    leader: Mutex<Option<Cached<Option<String>>>>,
}

impl Scoreboard {
    /// Create a scoreboard over `primary`.
    pub fn new(primary: Arc<dyn ScoreLedger>, config: Arc<GameConfig>) -> Self {
        Self {
            primary,
            fallback: InMemoryLedger::new(),
            config,
            leaderboard: Mutex::new(None),
            leader: Mutex::new(None),
        }
    }

    /// Record one finished game. Called exactly once per game; never retried.
    pub fn record(&self, username: &str, outcome: GameOutcome) -> RecordedOutcome {
        match self.primary.record_outcome(username, outcome) {
            Ok(record) => {
                self.invalidate();
                let is_leader = self.is_leader(username).unwrap_or(false);
                RecordedOutcome {
                    points: record.points,
                    title: display_title(&self.config.titles, record.points, is_leader),
                    offline: false,
                }
            }
            Err(e) => {
                warn!("Ledger write failed for {}, recording locally: {}", username, e);
                let points = match self.fallback.record_outcome(username, outcome) {
                    Ok(record) => record.points,
                    Err(e) => {
                        error!("Local ledger write failed for {}: {}", username, e);
                        outcome.points
                    }
                };
                RecordedOutcome {
                    points,
                    title: display_title(&self.config.titles, points, false),
                    offline: true,
                }
            }
        }
    }

    /// Totals of one player, from the ledger or, if it is down, the local stand-in.
    pub fn stats(&self, username: &str) -> PlayerStats {
        match self.primary.player(username) {
            Ok(Some(record)) => {
                let is_leader = self.is_leader(username).unwrap_or(false);
                PlayerStats {
                    points: record.points,
                    total_games: record.total_games,
                    correct_guesses: record.correct_guesses,
                    title: display_title(&self.config.titles, record.points, is_leader),
                    offline: false,
                }
            }
            Ok(None) => PlayerStats {
                points: 0,
                total_games: 0,
                correct_guesses: 0,
                title: display_title(&self.config.titles, 0, false),
                offline: false,
            },
            Err(e) => {
                warn!("Ledger read failed for {}: {}", username, e);
                let local = self.fallback.player(username).ok().flatten();
                let (points, total_games, correct_guesses) = local
                    .map(|r| (r.points, r.total_games, r.correct_guesses))
                    .unwrap_or_default();
                PlayerStats {
                    points,
                    total_games,
                    correct_guesses,
                    title: display_title(&self.config.titles, points, false),
                    offline: true,
                }
            }
        }
    }

    /// Top players with titles; the first row is "THE ONE".
    pub fn leaderboard(&self) -> Leaderboard {
        let ttl = self.config.leaderboard_cache_ttl;
        let mut cache = self.leaderboard.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entries) = cache.as_ref().and_then(|c| c.fresh(ttl)) {
            debug!("Leaderboard served from cache");
            return Leaderboard { entries, offline: false };
        }

        match self.primary.top_players(self.config.leaderboard_size) {
            Ok(rows) => {
                let entries: Vec<LeaderboardEntry> = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, row)| LeaderboardEntry {
                        rank: i + 1,
                        title: display_title(&self.config.titles, row.points, i == 0),
                        username: row.username,
                        points: row.points,
                    })
                    .collect();
                *cache = Some(Cached { value: entries.clone(), fetched_at: Instant::now() });
                Leaderboard { entries, offline: false }
            }
            Err(e) => {
                warn!("Leaderboard read failed: {}", e);
                let entries = cache.as_ref().map(|c| c.value.clone()).unwrap_or_default();
                Leaderboard { entries, offline: true }
            }
        }
    }

    /// Whether `username` currently leads the ledger.
    fn is_leader(&self, username: &str) -> Result<bool, LedgerError> {
        let ttl = self.config.leaderboard_cache_ttl;
        let mut cache = self.leader.lock().unwrap_or_else(|e| e.into_inner());
        let leader = match cache.as_ref().and_then(|c| c.fresh(ttl)) {
            Some(leader) => leader,
            None => {
                let leader = self
                    .primary
                    .top_players(1)?
                    .into_iter()
                    .next()
                    .map(|r| r.username);
                *cache = Some(Cached { value: leader.clone(), fetched_at: Instant::now() });
                leader
            }
        };
        Ok(leader.as_deref() == Some(username))
    }

    /// Drop cached ranked reads after a write.
    fn invalidate(&self) {
        *self.leaderboard.lock().unwrap_or_else(|e| e.into_inner()) = None;
        *self.leader.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
