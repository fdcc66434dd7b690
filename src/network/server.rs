//! WebSocket Game Server
//!
//! Async WebSocket server for player connections. Each connection gets a
//! reader loop driving a [`PlayerSession`] and a writer task draining its
//! outbound queue.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::{interval, timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use crate::core::config::{env_parse, ConfigError};
use crate::network::protocol::{ClientMessage, ErrorCode, ServerMessage};
use crate::network::session::{GameContext, PlayerSession};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Connections silent for longer are closed.
    pub idle_timeout: Duration,
    /// Codec key material (64 hex chars or a passphrase). Generated if unset.
    pub game_state_key: Option<String>,
    /// JSON ledger file. In-memory ledger if unset.
    pub ledger_path: Option<PathBuf>,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_connections: 1000,
            idle_timeout: Duration::from_secs(300),
            game_state_key: None,
            ledger_path: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(addr) = env_parse::<SocketAddr>("BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(max) = env_parse::<usize>("MAX_CONNECTIONS")? {
            config.max_connections = max;
        }
        if let Some(secs) = env_parse::<u64>("IDLE_TIMEOUT_SECS")? {
            config.idle_timeout = Duration::from_secs(secs);
        }
        config.game_state_key = std::env::var("GAME_STATE_KEY").ok().filter(|k| !k.is_empty());
        config.ledger_path = std::env::var("LEDGER_PATH").ok().filter(|p| !p.is_empty()).map(PathBuf::from);
        Ok(config)
    }
}

/// Game server errors.
#[derive(Debug, thiserror::Error)]
pub enum GameServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Connected client state.
struct ConnectedClient {
    /// Logged-in player, if any.
    username: Option<String>,
    /// Connection time.
    connected_at: Instant,
    /// Last activity.
    last_activity: Instant,
}

/// The game server.
pub struct GameServer {
    /// Server configuration.
    config: ServerConfig,
    /// Shared game services.
    context: Arc<GameContext>,
    /// Connected clients.
    clients: Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl GameServer {
    /// Create a new game server.
    pub fn new(config: ServerConfig, context: Arc<GameContext>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            context,
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            shutdown_tx,
        }
    }

    /// Bind the configured address and run the server.
    #[instrument(skip(self), fields(addr = %self.config.bind_addr))]
    pub async fn run(&self) -> Result<(), GameServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Accept connections on `listener` until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GameServerError> {
        info!("Game server listening on {}", listener.local_addr()?);

        let cleanup_clients = self.clients.clone();
        let cleanup_context = self.context.clone();
        let cleanup_handle = tokio::spawn(async move {
            Self::run_cleanup_loop(cleanup_clients, cleanup_context).await;
        });

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let clients_count = self.clients.read().await.len();
                            if clients_count >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            debug!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        cleanup_handle.abort();

        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let clients = self.clients.clone();
        let context = self.context.clone();
        let idle_timeout = self.config.idle_timeout;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    debug!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (msg_tx, mut msg_rx) = mpsc::channel::<Message>(64);

            // Register client
            {
                let mut clients = clients.write().await;
                clients.insert(addr, ConnectedClient {
                    username: None,
                    connected_at: Instant::now(),
                    last_activity: Instant::now(),
                });
            }

            // Spawn message sender task
            let sender_task = tokio::spawn(async move {
                while let Some(msg) = msg_rx.recv().await {
                    if ws_sender.send(msg).await.is_err() {
                        break;
                    }
                }
                let _ = ws_sender.close().await;
            });

            let mut session = PlayerSession::new(context);

            // Handle incoming messages
            loop {
                tokio::select! {
                    msg = timeout(idle_timeout, ws_receiver.next()) => {
                        let msg = match msg {
                            Ok(msg) => msg,
                            Err(_) => {
                                debug!("Client {} idle, closing", addr);
                                break;
                            }
                        };
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let reply = match ClientMessage::from_json(&text) {
                                    Ok(client_msg) => session.handle(client_msg),
                                    Err(e) => {
                                        debug!("Invalid message from {}: {}", addr, e);
                                        ServerMessage::error(ErrorCode::InvalidRequest, "Invalid message format")
                                    }
                                };

                                // Update activity
                                {
                                    let mut clients = clients.write().await;
                                    if let Some(client) = clients.get_mut(&addr) {
                                        client.last_activity = Instant::now();
                                        client.username = session.username().map(str::to_string);
                                    }
                                }

                                if !send(&msg_tx, &reply).await {
                                    break;
                                }
                            }
                            Some(Ok(Message::Binary(_))) => {
                                let reply = ServerMessage::error(ErrorCode::InvalidRequest, "Expected a text frame");
                                if !send(&msg_tx, &reply).await {
                                    break;
                                }
                            }
                            Some(Ok(Message::Ping(payload))) => {
                                let _ = msg_tx.send(Message::Pong(payload)).await;
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                debug!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let reply = ServerMessage::error(ErrorCode::Shutdown, "Server shutting down");
                        send(&msg_tx, &reply).await;
                        break;
                    }
                }
            }

            // Let the writer flush queued replies, then close
            drop(msg_tx);
            let _ = sender_task.await;

            // Remove client
            let removed = clients.write().await.remove(&addr);
            if let Some(client) = removed {
                debug!(
                    "Client {} ({}) cleaned up after {:?}",
                    addr,
                    client.username.as_deref().unwrap_or("anonymous"),
                    client.connected_at.elapsed()
                );
            }
        });
    }

    /// Run cleanup loop.
    async fn run_cleanup_loop(
        clients: Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>,
        context: Arc<GameContext>,
    ) {
        let mut interval = interval(Duration::from_secs(60));

        loop {
            interval.tick().await;

            let pruned = context.limiter().prune(Instant::now());
            let (connected, players) = {
                let clients = clients.read().await;
                let players = clients.values().filter(|c| c.username.is_some()).count();
                (clients.len(), players)
            };
            debug!(
                "Cleanup: {} connections, {} logged in, {} idle limiter entries pruned",
                connected, players, pruned
            );
        }
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub async fn connection_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Get count of connections with a logged-in player.
    pub async fn player_count(&self) -> usize {
        self.clients
            .read()
            .await
            .values()
            .filter(|c| c.username.is_some())
            .count()
    }
}

/// Queue a reply for the writer task. Returns false once the writer is gone.
async fn send(tx: &mpsc::Sender<Message>, msg: &ServerMessage) -> bool {
    match msg.to_json() {
        Ok(text) => tx.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            error!("Failed to serialize message: {}", e);
            true
        }
    }
}
