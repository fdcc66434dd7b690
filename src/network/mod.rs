//! Network Layer
//!
//! WebSocket server, message protocol and the per-connection request
//! handler. Game rules live in `game/`; this layer only authenticates,
//! rate-limits and routes.

pub mod auth;
pub mod protocol;
pub mod rate_limit;
pub mod session;
pub mod server;

pub use auth::{AuthConfig, AuthError, SessionClaims, validate_token};
pub use protocol::{ClientMessage, ErrorCode, ServerMessage};
pub use rate_limit::{RateLimited, RateLimiter};
pub use session::{GameContext, PlayerSession};
pub use server::{GameServer, GameServerError, ServerConfig};
