//! Game Configuration
//!
//! Immutable rule tables for the game: difficulty bounds, points,
//! title thresholds, the guess rate limit and token lifetimes.
//! Built once at start-up and shared by `Arc` with every component.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// DIFFICULTY
// =============================================================================

/// Difficulty level selected by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[derive(Default)]
pub enum Difficulty {
    /// 1..=10, 3 attempts.
    #[default]
    Easy = 0,
    /// 1..=100, 8 attempts.
    Medium = 1,
    /// 1..=1000, 15 attempts.
    Hard = 2,
    /// 1..=100000, 25 attempts.
    Impossible = 3,
    /// 1..=1000000, 50 attempts.
    Million = 4,
}

impl Difficulty {
    /// All difficulties, in ascending order.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Impossible,
        Difficulty::Million,
    ];

    /// Wire name (snake_case).
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Impossible => "impossible",
            Difficulty::Million => "million",
        }
    }

    /// Capitalised name for player-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Impossible => "Impossible",
            Difficulty::Million => "Million",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownDifficulty(s.to_string()))
    }
}

/// Rules for one difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Upper bound of the secret number (inclusive, lower bound is 1).
    pub max_number: u32,
    /// Guesses allowed before the game is lost.
    pub max_attempts: u32,
    /// Points for a win on the last allowed attempt.
    pub base_points: u64,
}

impl DifficultySettings {
    /// Create settings.
    pub const fn new(max_number: u32, max_attempts: u32, base_points: u64) -> Self {
        Self { max_number, max_attempts, base_points }
    }
}

// =============================================================================
// TITLES
// =============================================================================

/// One rung of the title ladder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleTier {
    /// Display name.
    pub name: String,
    /// Minimum cumulative points to hold this title.
    pub threshold: u64,
}

impl TitleTier {
    /// Create a tier.
    pub fn new(name: impl Into<String>, threshold: u64) -> Self {
        Self { name: name.into(), threshold }
    }
}

/// Default ladder: Newbie → Rookie → Pro → Legend → Champion.
pub fn default_titles() -> Vec<TitleTier> {
    vec![
        TitleTier::new("Newbie", 100),
        TitleTier::new("Rookie", 500),
        TitleTier::new("Pro", 2500),
        TitleTier::new("Legend", 5000),
        TitleTier::new("Champion", 10000),
    ]
}

// =============================================================================
// GAME CONFIG
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: String,
        /// Raw value.
        value: String,
    },
    /// Unknown difficulty name.
    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
    /// A rule table is inconsistent.
    #[error("invalid rule: {0}")]
    InvalidRule(String),
}

/// Immutable game rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Indexed by `Difficulty as usize`.
    difficulties: [DifficultySettings; 5],
    /// Title ladder, ascending thresholds.
    pub titles: Vec<TitleTier>,
    /// Minimum time between two guesses of the same player.
    pub guess_min_interval: Duration,
    /// Lifetime of an encrypted game token.
    pub game_token_ttl: Duration,
    /// How long leaderboard and top-player reads are cached.
    pub leaderboard_cache_ttl: Duration,
    /// Number of leaderboard rows returned.
    pub leaderboard_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulties: [
                DifficultySettings::new(10, 3, 3),
                DifficultySettings::new(100, 8, 10),
                DifficultySettings::new(1_000, 15, 20),
                DifficultySettings::new(100_000, 25, 45),
                DifficultySettings::new(1_000_000, 50, 150),
            ],
            titles: default_titles(),
            guess_min_interval: Duration::from_millis(333),
            game_token_ttl: Duration::from_secs(3600),
            leaderboard_cache_ttl: Duration::from_secs(60),
            leaderboard_size: 100,
        }
    }
}

impl GameConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = env_parse::<u64>("GUESS_MIN_INTERVAL_MS")? {
            config.guess_min_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = env_parse::<u64>("GAME_TOKEN_TTL_SECS")? {
            config.game_token_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("LEADERBOARD_CACHE_SECS")? {
            config.leaderboard_cache_ttl = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }

    /// Rules for a difficulty.
    #[inline]
    pub fn settings(&self, difficulty: Difficulty) -> &DifficultySettings {
        &self.difficulties[difficulty as usize]
    }

    /// Replace the rules of one difficulty.
    pub fn with_settings(mut self, difficulty: Difficulty, settings: DifficultySettings) -> Self {
        self.difficulties[difficulty as usize] = settings;
        self
    }

    /// Check the tables are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for difficulty in Difficulty::ALL {
            let s = self.settings(difficulty);
            if s.max_number == 0 || s.max_attempts == 0 {
                return Err(ConfigError::InvalidRule(format!(
                    "{difficulty} needs max_number >= 1 and max_attempts >= 1"
                )));
            }
        }
        if self.titles.windows(2).any(|w| w[0].threshold >= w[1].threshold) {
            return Err(ConfigError::InvalidRule(
                "title thresholds must be strictly ascending".into(),
            ));
        }
        if self.game_token_ttl.is_zero() {
            return Err(ConfigError::InvalidRule("game token ttl must be non-zero".into()));
        }
        Ok(())
    }
}

/// Read and parse an optional environment variable.
pub(crate) fn env_parse<T: FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var: var.to_string(), value }),
        Err(_) => Ok(None),
    }
}
