//! Game Logic Module
//!
//! Everything needed to play one game without server-side storage.
//!
//! ## Module Structure
//!
//! - `state`: Game state value type and target drawing
//! - `evaluator`: Guess validation, verdicts and points
//! - `codec`: Authenticated encryption of state into client-held tokens

pub mod state;
pub mod evaluator;
pub mod codec;

// Re-export key types
pub use state::{GameState, StateError};
pub use evaluator::{Evaluation, GuessEvaluator, GuessStatus, InvalidInput, Verdict};
pub use codec::{CodecError, SessionCodec, TamperError};
