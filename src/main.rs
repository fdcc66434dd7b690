//! Guess It Game Server
//!
//! Reads configuration from the environment and serves the game over
//! WebSocket until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use guess_it::{
    game::codec::key_from_config,
    network::AuthConfig,
    FileLedger, GameConfig, GameContext, GameServer, InMemoryLedger, ScoreLedger, ServerConfig,
    SessionCodec, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Guess It Server v{}", VERSION);

    let server_config = ServerConfig::from_env().context("invalid server configuration")?;
    let game_config = Arc::new(GameConfig::from_env().context("invalid game configuration")?);
    let mut auth_config = AuthConfig::from_env().context("invalid auth configuration")?;

    if auth_config.ensure_secret() {
        warn!("SESSION_SECRET not set, using a random secret; sessions end with this process");
    }

    let codec = match &server_config.game_state_key {
        Some(value) => SessionCodec::new(&key_from_config(value), game_config.game_token_ttl),
        None => {
            warn!("GAME_STATE_KEY not set, using a random key; games end with this process");
            SessionCodec::generate(game_config.game_token_ttl)
        }
    };

    let ledger: Arc<dyn ScoreLedger> = match &server_config.ledger_path {
        Some(path) => Arc::new(
            FileLedger::open(path)
                .with_context(|| format!("failed to open ledger {}", path.display()))?,
        ),
        None => {
            info!("LEDGER_PATH not set, scores are kept in memory");
            Arc::new(InMemoryLedger::new())
        }
    };

    for difficulty in guess_it::Difficulty::ALL {
        let s = game_config.settings(difficulty);
        info!(
            "{}: 1..={} in {} attempts, {} base points",
            difficulty, s.max_number, s.max_attempts, s.base_points
        );
    }

    let context = Arc::new(GameContext::new(game_config, auth_config, codec, ledger));
    let server = Arc::new(GameServer::new(server_config, context));

    let running = server.clone();
    let mut handle = tokio::spawn(async move { running.run().await });

    tokio::select! {
        result = &mut handle => {
            result.context("server task panicked")??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            server.shutdown();
            handle.await.context("server task panicked")??;
        }
    }

    Ok(())
}
