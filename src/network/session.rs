//! Player Sessions
//!
//! One `PlayerSession` per WebSocket connection. It owns only the
//! authenticated claims, the chosen difficulty and whether a game is in
//! progress; the game itself travels inside the encrypted game token.
//!
//! Shared services (codec, evaluator, scoreboard, limiter) live in a
//! [`GameContext`] handed to every connection.

use std::sync::Arc;

use rand::rngs::OsRng;
use tracing::{debug, error, info, warn};

use crate::core::config::{Difficulty, GameConfig};
use crate::game::codec::SessionCodec;
use crate::game::evaluator::{GuessEvaluator, GuessStatus, Verdict};
use crate::game::state::GameState;
use crate::ledger::{GameOutcome, ScoreLedger, Scoreboard};
use crate::network::auth::{self, AuthConfig, SessionClaims};
use crate::network::protocol::{
    ClientMessage, ErrorCode, GameStarted, GuessRequest, GuessResult, LoginResult, ServerMessage,
};
use crate::network::rate_limit::RateLimiter;

// =============================================================================
// SHARED CONTEXT
// =============================================================================

/// Services shared by all connections.
pub struct GameContext {
    config: Arc<GameConfig>,
    auth: AuthConfig,
    codec: SessionCodec,
    evaluator: GuessEvaluator,
    scoreboard: Scoreboard,
    limiter: RateLimiter,
    version: String,
}

impl GameContext {
    /// Wire the services together.
    ///
    /// `auth` must carry a secret; see [`AuthConfig::ensure_secret`].
    pub fn new(
        config: Arc<GameConfig>,
        auth: AuthConfig,
        codec: SessionCodec,
        ledger: Arc<dyn ScoreLedger>,
    ) -> Self {
        Self {
            evaluator: GuessEvaluator::new(config.clone()),
            scoreboard: Scoreboard::new(ledger, config.clone()),
            limiter: RateLimiter::new(config.guess_min_interval),
            auth,
            codec,
            config,
            version: crate::VERSION.to_string(),
        }
    }

    /// Game rules.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Game token codec.
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Ledger client.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Guess rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

// =============================================================================
// PER-CONNECTION SESSION
// =============================================================================

/// Request handler bound to one connection.
pub struct PlayerSession {
    ctx: Arc<GameContext>,
    claims: Option<SessionClaims>,
    difficulty: Difficulty,
    game_active: bool,
}

impl PlayerSession {
    /// New anonymous session.
    pub fn new(ctx: Arc<GameContext>) -> Self {
        Self {
            ctx,
            claims: None,
            difficulty: Difficulty::default(),
            game_active: false,
        }
    }

    /// Logged-in player, if any.
    pub fn username(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.username())
    }

    /// Selected difficulty for the next game.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether a started game has not yet finished.
    pub fn has_active_game(&self) -> bool {
        self.game_active
    }

    /// Handle one client message and produce the reply.
    pub fn handle(&mut self, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::Login(req) => self.login(&req.username),
            ClientMessage::Resume { session_token } => self.resume(&session_token),
            ClientMessage::SetDifficulty { difficulty } => self.set_difficulty(difficulty),
            ClientMessage::StartGame => self.start_game(),
            ClientMessage::Guess(req) => self.guess(&req),
            ClientMessage::GetStats => self.stats(),
            ClientMessage::GetLeaderboard => self.leaderboard(),
            ClientMessage::Logout => self.logout(),
            ClientMessage::Ping { timestamp } => ServerMessage::Pong {
                timestamp,
                server_time: u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0),
            },
        }
    }

    fn login(&mut self, raw_username: &str) -> ServerMessage {
        let username = match auth::validate_username(raw_username) {
            Ok(u) => u,
            Err(e) => {
                debug!("Rejected login: {}", e);
                return ServerMessage::LoginResult(LoginResult {
                    success: false,
                    username: None,
                    session_token: None,
                    points: 0,
                    title: None,
                    offline: false,
                    message: Some(e.to_string()),
                    server_version: self.ctx.version.clone(),
                });
            }
        };

        // Switching players on one connection ends the previous player's game
        self.forfeit();

        let (token, claims) = match auth::issue_token(&username, &self.ctx.auth) {
            Ok(issued) => issued,
            Err(e) => {
                error!("Failed to issue session for {}: {}", username, e);
                return ServerMessage::error(ErrorCode::InternalError, "Could not start a session.");
            }
        };
        info!("Player {} logged in", username);
        self.claims = Some(claims);
        self.login_result(token)
    }

    fn resume(&mut self, session_token: &str) -> ServerMessage {
        match auth::validate_token(session_token, &self.ctx.auth) {
            Ok(claims) => {
                if self.username() != Some(claims.username()) {
                    self.forfeit();
                }
                debug!("Player {} resumed session", claims.username());
                self.claims = Some(claims);
                self.login_result(session_token.to_string())
            }
            Err(e) => {
                debug!("Rejected session token: {}", e);
                ServerMessage::error(ErrorCode::Unauthorized, "Session expired. Please log in again.")
            }
        }
    }

    fn login_result(&self, session_token: String) -> ServerMessage {
        let username = self.username().unwrap_or_default().to_string();
        let stats = self.ctx.scoreboard.stats(&username);
        ServerMessage::LoginResult(LoginResult {
            success: true,
            username: Some(username),
            session_token: Some(session_token),
            points: stats.points,
            title: stats.title,
            offline: stats.offline,
            message: None,
            server_version: self.ctx.version.clone(),
        })
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) -> ServerMessage {
        if let Err(reply) = self.authorize() {
            return reply;
        }
        self.forfeit();
        self.difficulty = difficulty;
        ServerMessage::DifficultySet {
            message: format!("Difficulty set to {}.", difficulty.label()),
            difficulty,
            max_number: self.ctx.config.settings(difficulty).max_number,
        }
    }

    fn start_game(&mut self) -> ServerMessage {
        let username = match self.authorize() {
            Ok(u) => u,
            Err(reply) => return reply,
        };
        self.forfeit();

        let settings = *self.ctx.config.settings(self.difficulty);
        let now = chrono::Utc::now().timestamp();
        let state = match GameState::start(self.difficulty, &settings, &mut OsRng, now) {
            Ok(s) => s,
            Err(e) => {
                error!("Cannot start {} game: {}", self.difficulty, e);
                return ServerMessage::error(ErrorCode::InternalError, "Could not start a game.");
            }
        };
        let game_token = match self.ctx.codec.encode(&state, &username) {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to encode game for {}: {}", username, e);
                return ServerMessage::error(ErrorCode::InternalError, "Could not start a game.");
            }
        };

        self.game_active = true;
        debug!("Player {} started a {} game", username, self.difficulty);
        ServerMessage::GameStarted(GameStarted {
            message: "Game Started!".into(),
            game_token,
            difficulty: self.difficulty,
            max_number: settings.max_number,
            max_attempts: settings.max_attempts,
        })
    }

    fn guess(&mut self, req: &GuessRequest) -> ServerMessage {
        let username = match self.authorize() {
            Ok(u) => u,
            Err(reply) => return reply,
        };

        if let Err(e) = self.ctx.limiter.check(&username) {
            debug!("Guess from {} rate limited: {}", username, e);
            return ServerMessage::error(ErrorCode::RateLimited, "Too many guesses. Slow down.");
        }

        let Some(token) = req.game_token.as_deref() else {
            self.game_active = false;
            return no_active_game();
        };
        let state = match self.ctx.codec.decode(token, &username) {
            Ok(s) => s,
            Err(_) => {
                warn!("Rejected game token from {}", username);
                self.game_active = false;
                return no_active_game();
            }
        };
        self.game_active = true;

        let evaluation = match self.ctx.evaluator.evaluate(&state, &req.raw_guess()) {
            Ok(e) => e,
            Err(e) => {
                return ServerMessage::GuessResult(GuessResult {
                    status: GuessStatus::Warning,
                    message: e.to_string(),
                    history: state.history().to_vec(),
                    attempts_left: state.attempts_left(),
                    game_token: Some(token.to_string()),
                    points_awarded: None,
                    new_points: None,
                    new_title: None,
                    offline: false,
                });
            }
        };

        let next = &evaluation.state;
        let mut result = GuessResult {
            status: evaluation.verdict.status(),
            message: String::new(),
            history: next.history().to_vec(),
            attempts_left: next.attempts_left(),
            game_token: None,
            points_awarded: None,
            new_points: None,
            new_title: None,
            offline: false,
        };

        match evaluation.verdict {
            Verdict::TooLow | Verdict::TooHigh => {
                match self.ctx.codec.encode(next, &username) {
                    Ok(t) => result.game_token = Some(t),
                    Err(e) => {
                        error!("Failed to encode game for {}: {}", username, e);
                        return ServerMessage::error(ErrorCode::InternalError, "Could not save the game.");
                    }
                }
                result.message = format!("❌ Wrong. ⬆️ {}", evaluation.verdict.hint().unwrap_or_default());
            }
            Verdict::Win { points } => {
                self.game_active = false;
                let recorded = self.ctx.scoreboard.record(&username, GameOutcome::win(points));
                let elapsed = (chrono::Utc::now().timestamp() - next.started_at()).max(0);
                info!("Player {} won {} points on {}", username, points, next.difficulty());
                result.message = format!("✅ The number was {} ({}s).", next.target(), elapsed);
                result.points_awarded = Some(points);
                result.new_points = Some(recorded.points);
                result.new_title = recorded.title;
                result.offline = recorded.offline;
            }
            Verdict::Lose { target } => {
                self.game_active = false;
                let recorded = self.ctx.scoreboard.record(&username, GameOutcome::loss());
                debug!("Player {} lost on {}", username, next.difficulty());
                result.message = format!("❌ Game Over! The number was {}.", target);
                result.points_awarded = Some(0);
                result.offline = recorded.offline;
            }
        }

        ServerMessage::GuessResult(result)
    }

    fn stats(&mut self) -> ServerMessage {
        match self.authorize() {
            Ok(username) => ServerMessage::Stats(self.ctx.scoreboard.stats(&username)),
            Err(reply) => reply,
        }
    }

    fn leaderboard(&self) -> ServerMessage {
        let board = self.ctx.scoreboard.leaderboard();
        ServerMessage::Leaderboard {
            entries: board.entries,
            offline: board.offline,
        }
    }

    fn logout(&mut self) -> ServerMessage {
        self.forfeit();
        if let Some(claims) = self.claims.take() {
            info!("Player {} logged out", claims.username());
        }
        ServerMessage::LoggedOut
    }

    /// Current username, or the unauthorized reply.
    fn authorize(&mut self) -> Result<String, ServerMessage> {
        match &self.claims {
            Some(claims) if !claims.is_expired() => Ok(claims.username().to_string()),
            Some(claims) => {
                debug!("Session of {} expired", claims.username());
                self.claims = None;
                self.game_active = false;
                Err(ServerMessage::error(
                    ErrorCode::Unauthorized,
                    "Session expired. Please log in again.",
                ))
            }
            None => Err(ServerMessage::error(ErrorCode::Unauthorized, "Please log in first.")),
        }
    }

    /// End an unfinished game as a loss.
    fn forfeit(&mut self) {
        if !std::mem::take(&mut self.game_active) {
            return;
        }
        if let Some(username) = self.username().map(str::to_string) {
            info!("Player {} forfeited a game", username);
            self.ctx.scoreboard.record(&username, GameOutcome::loss());
        }
    }
}

fn no_active_game() -> ServerMessage {
    ServerMessage::error(ErrorCode::NoActiveGame, "No active game. Start a new game.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::network::protocol::LoginRequest;
    use std::time::Duration;

    fn context(config: GameConfig) -> (Arc<GameContext>, Arc<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let mut auth = AuthConfig::default();
        auth.ensure_secret();
        let codec = SessionCodec::generate(config.game_token_ttl);
        let ctx = GameContext::new(Arc::new(config), auth, codec, ledger.clone());
        (Arc::new(ctx), ledger)
    }

    fn unlimited() -> GameConfig {
        let mut config = GameConfig::default();
        config.guess_min_interval = Duration::ZERO;
        config
    }

    fn logged_in(ctx: &Arc<GameContext>, name: &str) -> PlayerSession {
        let mut session = PlayerSession::new(ctx.clone());
        let reply = session.handle(ClientMessage::Login(LoginRequest { username: name.into() }));
        assert!(matches!(reply, ServerMessage::LoginResult(LoginResult { success: true, .. })));
        session
    }

    fn start(session: &mut PlayerSession) -> GameStarted {
        match session.handle(ClientMessage::StartGame) {
            ServerMessage::GameStarted(g) => g,
            other => panic!("Expected game_started, got {:?}", other),
        }
    }

    fn guess(session: &mut PlayerSession, token: &str, value: &str) -> ServerMessage {
        session.handle(ClientMessage::Guess(GuessRequest {
            game_token: Some(token.to_string()),
            guess: serde_json::Value::String(value.to_string()),
        }))
    }

    fn guess_result(msg: ServerMessage) -> GuessResult {
        match msg {
            ServerMessage::GuessResult(r) => r,
            other => panic!("Expected guess_result, got {:?}", other),
        }
    }

    fn error_code(msg: &ServerMessage) -> Option<ErrorCode> {
        match msg {
            ServerMessage::Error(e) => Some(e.code),
            _ => None,
        }
    }

    fn target_of(ctx: &GameContext, token: &str, owner: &str) -> u32 {
        ctx.codec().decode(token, owner).unwrap().target()
    }

    #[test]
    fn test_invalid_username_rejected() {
        let (ctx, _) = context(unlimited());
        let mut session = PlayerSession::new(ctx);
        let reply = session.handle(ClientMessage::Login(LoginRequest { username: "Hacker$$$".into() }));
        match reply {
            ServerMessage::LoginResult(r) => {
                assert!(!r.success);
                assert_eq!(r.message.as_deref(), Some("Invalid username."));
            }
            other => panic!("Wrong message type: {:?}", other),
        }
        assert!(session.username().is_none());
    }

    #[test]
    fn test_requests_need_login() {
        let (ctx, _) = context(unlimited());
        let mut session = PlayerSession::new(ctx);
        assert_eq!(error_code(&session.handle(ClientMessage::StartGame)), Some(ErrorCode::Unauthorized));
        assert_eq!(error_code(&session.handle(ClientMessage::GetStats)), Some(ErrorCode::Unauthorized));
        let reply = guess(&mut session, "whatever", "5");
        assert_eq!(error_code(&reply), Some(ErrorCode::Unauthorized));
    }

    #[test]
    fn test_win_records_points_once() {
        let (ctx, ledger) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        let game = start(&mut session);
        assert_eq!(game.max_number, 10);
        assert!(session.has_active_game());

        let target = target_of(&ctx, &game.game_token, "alice");
        let result = guess_result(guess(&mut session, &game.game_token, &target.to_string()));
        assert_eq!(result.status, GuessStatus::Win);
        assert!(result.message.starts_with(&format!("✅ The number was {} (", target)));
        assert!(result.game_token.is_none());
        // First-try win on easy: 3 + 3 * 2 / 3
        assert_eq!(result.points_awarded, Some(5));
        assert_eq!(result.new_points, Some(5));
        assert!(!session.has_active_game());

        let record = ledger.player("alice").unwrap().unwrap();
        assert_eq!(record.points, 5);
        assert_eq!(record.total_games, 1);
        assert_eq!(record.correct_guesses, 1);
    }

    #[test]
    fn test_miss_returns_fresh_token_and_hint() {
        let (ctx, _) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        let game = start(&mut session);
        let target = target_of(&ctx, &game.game_token, "alice");
        let miss = if target == 10 { 1 } else { 10 };

        let result = guess_result(guess(&mut session, &game.game_token, &miss.to_string()));
        assert_eq!(result.status, GuessStatus::Continue);
        assert_eq!(result.history, vec![miss]);
        assert_eq!(result.attempts_left, 2);
        let expected = if miss < target { "❌ Wrong. ⬆️ Higher" } else { "❌ Wrong. ⬆️ Lower" };
        assert_eq!(result.message, expected);

        let next = result.game_token.unwrap();
        assert_ne!(next, game.game_token);
        assert_eq!(ctx.codec().decode(&next, "alice").unwrap().guess_count(), 1);
    }

    #[test]
    fn test_exhausted_attempts_lose() {
        let (ctx, ledger) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        let game = start(&mut session);
        let target = target_of(&ctx, &game.game_token, "alice");
        let miss = if target == 10 { 1 } else { 10 };

        let mut token = game.game_token;
        for _ in 0..2 {
            let r = guess_result(guess(&mut session, &token, &miss.to_string()));
            assert_eq!(r.status, GuessStatus::Continue);
            token = r.game_token.unwrap();
        }
        let last = guess_result(guess(&mut session, &token, &miss.to_string()));
        assert_eq!(last.status, GuessStatus::Lose);
        assert_eq!(last.message, format!("❌ Game Over! The number was {}.", target));
        assert_eq!(last.attempts_left, 0);
        assert!(last.game_token.is_none());

        let record = ledger.player("alice").unwrap().unwrap();
        assert_eq!(record.points, 0);
        assert_eq!(record.total_games, 1);
        assert_eq!(record.correct_guesses, 0);
    }

    #[test]
    fn test_invalid_guess_is_warning() {
        let (ctx, _) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        let game = start(&mut session);

        let result = guess_result(guess(&mut session, &game.game_token, "abc"));
        assert_eq!(result.status, GuessStatus::Warning);
        assert_eq!(result.message, "Invalid number.");
        assert!(result.history.is_empty());
        assert_eq!(result.attempts_left, 3);
        assert_eq!(result.game_token.as_deref(), Some(game.game_token.as_str()));

        let result = guess_result(guess(&mut session, &game.game_token, "11"));
        assert_eq!(result.status, GuessStatus::Warning);
        assert_eq!(result.attempts_left, 3);
    }

    #[test]
    fn test_tampered_token_means_no_game() {
        let (ctx, _) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        let game = start(&mut session);

        let mut forged = game.game_token.clone();
        let last = forged.pop().unwrap();
        forged.push(if last == 'A' { 'B' } else { 'A' });

        let reply = guess(&mut session, &forged, "5");
        assert_eq!(error_code(&reply), Some(ErrorCode::NoActiveGame));
        assert!(!session.has_active_game());

        let reply = session.handle(ClientMessage::Guess(GuessRequest {
            game_token: None,
            guess: serde_json::json!(5),
        }));
        assert_eq!(error_code(&reply), Some(ErrorCode::NoActiveGame));
    }

    #[test]
    fn test_token_of_other_player_rejected() {
        let (ctx, _) = context(unlimited());
        let mut alice = logged_in(&ctx, "alice");
        let mut bob = logged_in(&ctx, "bob");
        let game = start(&mut alice);

        let reply = guess(&mut bob, &game.game_token, "5");
        assert_eq!(error_code(&reply), Some(ErrorCode::NoActiveGame));
    }

    #[test]
    fn test_rate_limit_blocks_before_evaluation() {
        let (ctx, _) = context(GameConfig::default());
        let mut session = logged_in(&ctx, "alice");
        let game = start(&mut session);

        let first = guess_result(guess(&mut session, &game.game_token, "abc"));
        assert_eq!(first.status, GuessStatus::Warning);

        let reply = guess(&mut session, &game.game_token, "5");
        assert_eq!(error_code(&reply), Some(ErrorCode::RateLimited));
        // The game is untouched
        let state = ctx.codec().decode(&game.game_token, "alice").unwrap();
        assert_eq!(state.guess_count(), 0);
    }

    #[test]
    fn test_new_game_forfeits_active_one() {
        let (ctx, ledger) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        start(&mut session);
        start(&mut session);

        let record = ledger.player("alice").unwrap().unwrap();
        assert_eq!(record.total_games, 1);
        assert_eq!(record.points, 0);
    }

    #[test]
    fn test_difficulty_change_forfeits_and_applies() {
        let (ctx, ledger) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        start(&mut session);

        match session.handle(ClientMessage::SetDifficulty { difficulty: Difficulty::Hard }) {
            ServerMessage::DifficultySet { message, max_number, .. } => {
                assert_eq!(message, "Difficulty set to Hard.");
                assert_eq!(max_number, 1000);
            }
            other => panic!("Wrong message type: {:?}", other),
        }
        assert_eq!(ledger.player("alice").unwrap().unwrap().total_games, 1);
        assert_eq!(session.difficulty(), Difficulty::Hard);

        let game = start(&mut session);
        assert_eq!(game.max_number, 1000);
        assert_eq!(game.max_attempts, 15);
        // Nothing was active this time
        assert_eq!(ledger.player("alice").unwrap().unwrap().total_games, 1);
    }

    #[test]
    fn test_logout_forfeits_and_clears_session() {
        let (ctx, ledger) = context(unlimited());
        let mut session = logged_in(&ctx, "alice");
        start(&mut session);

        assert!(matches!(session.handle(ClientMessage::Logout), ServerMessage::LoggedOut));
        assert!(session.username().is_none());
        assert_eq!(ledger.player("alice").unwrap().unwrap().total_games, 1);
        assert_eq!(error_code(&session.handle(ClientMessage::GetStats)), Some(ErrorCode::Unauthorized));
    }

    #[test]
    fn test_resume_on_new_connection() {
        let (ctx, _) = context(unlimited());
        let mut first = PlayerSession::new(ctx.clone());
        let token = match first.handle(ClientMessage::Login(LoginRequest { username: "alice".into() })) {
            ServerMessage::LoginResult(r) => r.session_token.unwrap(),
            other => panic!("Wrong message type: {:?}", other),
        };
        let game = start(&mut first);

        let mut second = PlayerSession::new(ctx.clone());
        let reply = second.handle(ClientMessage::Resume { session_token: token });
        assert!(matches!(reply, ServerMessage::LoginResult(LoginResult { success: true, .. })));
        assert_eq!(second.username(), Some("alice"));

        // The game token keeps working across connections
        let reply = guess_result(guess(&mut second, &game.game_token, "abc"));
        assert_eq!(reply.status, GuessStatus::Warning);

        let reply = second.handle(ClientMessage::Resume { session_token: "forged".into() });
        assert_eq!(error_code(&reply), Some(ErrorCode::Unauthorized));
    }

    #[test]
    fn test_returning_player_sees_points() {
        let (ctx, _) = context(unlimited());
        ctx.scoreboard().record("alice", GameOutcome::win(120));

        let mut session = PlayerSession::new(ctx);
        match session.handle(ClientMessage::Login(LoginRequest { username: "  alice  ".into() })) {
            ServerMessage::LoginResult(r) => {
                assert_eq!(r.username.as_deref(), Some("alice"));
                assert_eq!(r.points, 120);
                assert_eq!(r.title.as_deref(), Some(crate::core::title::THE_ONE));
            }
            other => panic!("Wrong message type: {:?}", other),
        }
    }

    #[test]
    fn test_stats_and_leaderboard() {
        let (ctx, _) = context(unlimited());
        ctx.scoreboard().record("bob", GameOutcome::win(600));
        let mut session = logged_in(&ctx, "alice");

        match session.handle(ClientMessage::GetStats) {
            ServerMessage::Stats(stats) => {
                assert_eq!(stats.points, 0);
                assert_eq!(stats.total_games, 0);
            }
            other => panic!("Wrong message type: {:?}", other),
        }

        match session.handle(ClientMessage::GetLeaderboard) {
            ServerMessage::Leaderboard { entries, offline } => {
                assert!(!offline);
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].username, "bob");
            }
            other => panic!("Wrong message type: {:?}", other),
        }
    }
}
