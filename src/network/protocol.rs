//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket.
//! All messages are JSON objects tagged by `"type"`.

use serde::{Deserialize, Serialize};

use crate::core::config::Difficulty;
use crate::game::evaluator::GuessStatus;
use crate::ledger::{LeaderboardEntry, PlayerStats};

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Log in with a username.
    Login(LoginRequest),

    /// Re-attach a new connection to an existing session.
    Resume {
        /// Session token from an earlier login.
        session_token: String,
    },

    /// Choose the difficulty for future games.
    SetDifficulty {
        /// New difficulty.
        difficulty: Difficulty,
    },

    /// Start a new game.
    StartGame,

    /// Submit a guess.
    Guess(GuessRequest),

    /// Own totals.
    GetStats,

    /// Top players.
    GetLeaderboard,

    /// End the session.
    Logout,

    /// Ping for latency measurement.
    Ping {
        /// Client timestamp, echoed back.
        timestamp: u64,
    },
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Desired username.
    pub username: String,
}

/// Guess submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    /// Token returned by `game_started` or the previous `guess_result`.
    #[serde(default)]
    pub game_token: Option<String>,
    /// Raw guess as typed: a JSON number or string.
    #[serde(default)]
    pub guess: serde_json::Value,
}

impl GuessRequest {
    /// Raw guess text handed to the evaluator.
    pub fn raw_guess(&self) -> String {
        match &self.guess {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Login or resume result.
    LoginResult(LoginResult),

    /// Difficulty changed.
    DifficultySet {
        /// Human-readable confirmation.
        message: String,
        /// New difficulty.
        difficulty: Difficulty,
        /// Upper bound of future games.
        max_number: u32,
    },

    /// A new game is running.
    GameStarted(GameStarted),

    /// Verdict for a guess.
    GuessResult(GuessResult),

    /// Own totals.
    Stats(PlayerStats),

    /// Top players.
    Leaderboard {
        /// Best first.
        entries: Vec<LeaderboardEntry>,
        /// Ledger unreachable.
        offline: bool,
    },

    /// Session ended.
    LoggedOut,

    /// Pong response.
    Pong {
        /// Echoed client timestamp.
        timestamp: u64,
        /// Server time (ms since epoch).
        server_time: u64,
    },

    /// Error message.
    Error(ServerError),
}

/// Login result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// Whether login succeeded.
    pub success: bool,
    /// Normalised username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Session token for `resume`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// Cumulative points.
    pub points: u64,
    /// Current title.
    pub title: Option<String>,
    /// Ledger unreachable.
    pub offline: bool,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server version.
    pub server_version: String,
}

/// Game start confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStarted {
    /// Greeting.
    pub message: String,
    /// Encrypted game state to send back with each guess.
    pub game_token: String,
    /// Difficulty of this game.
    pub difficulty: Difficulty,
    /// Upper bound of the secret number.
    pub max_number: u32,
    /// Guesses allowed.
    pub max_attempts: u32,
}

/// Verdict for one guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessResult {
    /// warning / continue / win / lose.
    pub status: GuessStatus,
    /// Human-readable verdict.
    pub message: String,
    /// Accepted guesses so far.
    pub history: Vec<u32>,
    /// Guesses remaining.
    pub attempts_left: u32,
    /// Next game token; absent once the game is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_token: Option<String>,
    /// Points won by this game.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<u64>,
    /// Cumulative points after a win.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_points: Option<u64>,
    /// Title after a win.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_title: Option<String>,
    /// Result stored in the offline stand-in.
    pub offline: bool,
}

/// Server error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ServerError {
    /// Build an error message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No valid session; log in again.
    Unauthorized,
    /// Guessing too fast.
    RateLimited,
    /// No game in progress (missing, expired or invalid game token).
    NoActiveGame,
    /// Malformed request.
    InvalidRequest,
    /// Internal error.
    InternalError,
    /// Server is shutting down.
    Shutdown,
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Build an error message.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error(ServerError::new(code, message))
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
