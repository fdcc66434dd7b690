//! # Guess It Game Server
//!
//! Number-guessing game with a server-side score ledger. The state of a
//! running game is never stored on the server: it is sealed into an
//! encrypted token the client sends back with every guess.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GUESS IT SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Rules                                    │
//! │  ├── config.rs    - Difficulty table, limits, env config     │
//! │  └── title.rs     - Titles from points, "THE ONE"            │
//! │                                                              │
//! │  game/            - One game, no server-side storage         │
//! │  ├── state.rs     - GameState value type                     │
//! │  ├── evaluator.rs - Verdicts and points                      │
//! │  └── codec.rs     - XChaCha20-Poly1305 game tokens           │
//! │                                                              │
//! │  ledger/          - Cumulative scores                        │
//! │  ├── memory.rs    - In-process ledger                        │
//! │  ├── file.rs      - JSON file ledger                         │
//! │  └── scoreboard.rs- Offline fallback, caching, titles        │
//! │                                                              │
//! │  network/         - WebSocket transport                      │
//! │  ├── server.rs    - Accept loop, connection tasks            │
//! │  ├── protocol.rs  - Message types                            │
//! │  ├── session.rs   - Per-connection request handling          │
//! │  ├── auth.rs      - Usernames and session tokens             │
//! │  └── rate_limit.rs- Guess rate limiting                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Game Token Guarantees
//!
//! A game token decodes only under the server key, for the player it was
//! issued to, before it expires. Any other token reads as "no active game":
//! - Flipped bits fail authentication
//! - A token copied to another account fails authentication
//! - Tokens from before a key rotation fail authentication

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod ledger;
pub mod network;

// Re-export commonly used types
pub use core::config::{Difficulty, GameConfig};
pub use game::codec::SessionCodec;
pub use game::evaluator::{GuessEvaluator, Verdict};
pub use game::state::GameState;
pub use ledger::{FileLedger, InMemoryLedger, ScoreLedger, Scoreboard};
pub use network::{GameContext, GameServer, ServerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
