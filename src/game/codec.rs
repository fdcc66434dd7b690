//! Game Token Codec
//!
//! Seals a [`GameState`] into an opaque, URL-safe token held by the client.
//!
//! ## Token layout
//!
//! ```text
//! base64url( version:u8 | nonce:[u8; 24] | XChaCha20-Poly1305(envelope) )
//! envelope  = bincode { expires_at: i64, state: GameState }
//! aad       = "guess-it/game/v1:" ++ owner username
//! ```
//!
//! The target never leaves the server in plaintext, and any change to the
//! token (or presenting it under another username) fails authentication.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::game::state::GameState;

/// Token format version.
pub const TOKEN_VERSION: u8 = 1;

/// Codec key length (256 bits).
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;
const AAD_DOMAIN: &[u8] = b"guess-it/game/v1:";

/// Token rejected. Carries no reason on purpose.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid game token")]
pub struct TamperError;

/// Token could not be produced.
#[derive(Debug, Error)]
pub enum CodecError {
    /// State failed to serialize.
    #[error("serialize game state: {0}")]
    Serialize(#[from] bincode::Error),
    /// Encryption failed.
    #[error("encrypt game state")]
    Encrypt,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    expires_at: i64,
    state: GameState,
}

/// Encrypts and authenticates game state under one process-wide key.
#[derive(Clone)]
pub struct SessionCodec {
    cipher: XChaCha20Poly1305,
    ttl: Duration,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Create a codec from a 256-bit key.
    pub fn new(key: &[u8; KEY_LEN], ttl: Duration) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(Key::from_slice(key)),
            ttl,
        }
    }

    /// Create a codec with a fresh random key.
    ///
    /// Tokens issued by it die with the process.
    pub fn generate(ttl: Duration) -> Self {
        Self::new(&generate_key(), ttl)
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Seal `state` for `owner`.
    pub fn encode(&self, state: &GameState, owner: &str) -> Result<String, CodecError> {
        self.encode_at(state, owner, chrono::Utc::now().timestamp())
    }

    /// Seal `state` for `owner` as of unix time `now`.
    pub fn encode_at(&self, state: &GameState, owner: &str, now: i64) -> Result<String, CodecError> {
        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let envelope = Envelope {
            expires_at: now.saturating_add(ttl_secs),
            state: state.clone(),
        };
        let plaintext = bincode::serialize(&envelope)?;

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let aad = associated_data(owner);
        let sealed = self
            .cipher
            .encrypt(XNonce::from_slice(&nonce), Payload { msg: &plaintext, aad: &aad })
            .map_err(|_| CodecError::Encrypt)?;

        let mut raw = Vec::with_capacity(1 + NONCE_LEN + sealed.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&sealed);
        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Open a token issued to `owner`.
    pub fn decode(&self, token: &str, owner: &str) -> Result<GameState, TamperError> {
        self.decode_at(token, owner, chrono::Utc::now().timestamp())
    }

    /// Open a token issued to `owner` as of unix time `now`.
    pub fn decode_at(&self, token: &str, owner: &str, now: i64) -> Result<GameState, TamperError> {
        let raw = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| {
            debug!("game token rejected: not base64url");
            TamperError
        })?;

        if raw.len() < 1 + NONCE_LEN + TAG_LEN {
            debug!("game token rejected: {} bytes is too short", raw.len());
            return Err(TamperError);
        }
        if raw[0] != TOKEN_VERSION {
            debug!("game token rejected: version {}", raw[0]);
            return Err(TamperError);
        }

        let (nonce, sealed) = raw[1..].split_at(NONCE_LEN);
        let aad = associated_data(owner);
        let plaintext = self
            .cipher
            .decrypt(XNonce::from_slice(nonce), Payload { msg: sealed, aad: &aad })
            .map_err(|_| {
                debug!("game token rejected: authentication failed");
                TamperError
            })?;

        let envelope: Envelope = bincode::deserialize(&plaintext).map_err(|_| {
            debug!("game token rejected: undecodable payload");
            TamperError
        })?;

        if now >= envelope.expires_at {
            debug!("game token rejected: expired at {}", envelope.expires_at);
            return Err(TamperError);
        }
        if !envelope.state.is_consistent() {
            debug!("game token rejected: inconsistent state");
            return Err(TamperError);
        }

        Ok(envelope.state)
    }
}

/// Fresh random key from the OS RNG.
pub fn generate_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

/// Key from configuration: 64 hex characters are used verbatim,
/// anything else is treated as a passphrase and hashed with SHA-256.
pub fn key_from_config(value: &str) -> [u8; KEY_LEN] {
    let value = value.trim();
    if let Ok(bytes) = hex::decode(value) {
        if let Ok(key) = <[u8; KEY_LEN]>::try_from(bytes.as_slice()) {
            return key;
        }
    }
    let mut hasher = Sha256::new();
    hasher.update(b"guess-it-game-key:");
    hasher.update(value.as_bytes());
    hasher.finalize().into()
}

fn associated_data(owner: &str) -> Vec<u8> {
    let mut aad = Vec::with_capacity(AAD_DOMAIN.len() + owner.len());
    aad.extend_from_slice(AAD_DOMAIN);
    aad.extend_from_slice(owner.as_bytes());
    aad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Difficulty, DifficultySettings, GameConfig};
    use crate::game::evaluator::GuessEvaluator;
    use proptest::prelude::*;
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000;

    fn codec() -> SessionCodec {
        SessionCodec::new(&[7u8; KEY_LEN], Duration::from_secs(3600))
    }

    fn sample_state() -> GameState {
        let config = Arc::new(GameConfig::default());
        let settings = *config.settings(Difficulty::Hard);
        let state = GameState::with_target(Difficulty::Hard, &settings, 421, NOW).unwrap();
        let eval = GuessEvaluator::new(config);
        let state = eval.evaluate(&state, "500").unwrap().state;
        eval.evaluate(&state, "250").unwrap().state
    }

    #[test]
    fn test_roundtrip() {
        let codec = codec();
        let state = sample_state();
        let token = codec.encode_at(&state, "alice", NOW).unwrap();
        assert_eq!(codec.decode_at(&token, "alice", NOW + 10), Ok(state));
    }

    #[test]
    fn test_token_is_url_safe() {
        let codec = codec();
        let state = sample_state();
        let token = codec.encode_at(&state, "alice", NOW).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_fresh_nonce_per_encode() {
        let codec = codec();
        let state = sample_state();
        let a = codec.encode_at(&state, "alice", NOW).unwrap();
        let b = codec.encode_at(&state, "alice", NOW).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_owner_rejected() {
        let codec = codec();
        let token = codec.encode_at(&sample_state(), "alice", NOW).unwrap();
        assert_eq!(codec.decode_at(&token, "mallory", NOW), Err(TamperError));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = codec().encode_at(&sample_state(), "alice", NOW).unwrap();
        let other = SessionCodec::new(&[8u8; KEY_LEN], Duration::from_secs(3600));
        assert_eq!(other.decode_at(&token, "alice", NOW), Err(TamperError));
    }

    #[test]
    fn test_expired_rejected() {
        let codec = SessionCodec::new(&[7u8; KEY_LEN], Duration::from_secs(60));
        let token = codec.encode_at(&sample_state(), "alice", NOW).unwrap();
        assert!(codec.decode_at(&token, "alice", NOW + 59).is_ok());
        assert_eq!(codec.decode_at(&token, "alice", NOW + 60), Err(TamperError));
    }

    #[test]
    fn test_malformed_rejected() {
        let codec = codec();
        assert_eq!(codec.decode_at("", "alice", NOW), Err(TamperError));
        assert_eq!(codec.decode_at("not a token!", "alice", NOW), Err(TamperError));
        assert_eq!(codec.decode_at("AAAA", "alice", NOW), Err(TamperError));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let codec = codec();
        let token = codec.encode_at(&sample_state(), "alice", NOW).unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(&token).unwrap();
        raw[0] = 2;
        let forged = URL_SAFE_NO_PAD.encode(raw);
        assert_eq!(codec.decode_at(&forged, "alice", NOW), Err(TamperError));
    }

    #[test]
    fn test_key_from_config() {
        let hex_key = "00".repeat(31) + "ff";
        let key = key_from_config(&hex_key);
        assert_eq!(key[31], 0xff);
        assert_eq!(key[0], 0);

        let a = key_from_config("correct horse battery staple");
        let b = key_from_config("correct horse battery staple");
        assert_eq!(a, b);
        assert_ne!(a, key_from_config("another passphrase"));
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(generate_key(), generate_key());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            target in 1u32..=1000,
            raw_guesses in proptest::collection::vec(1u32..=1000, 0..10),
            owner in "[A-Za-z0-9]{1,12}",
        ) {
            let codec = codec();
            let settings = DifficultySettings::new(1000, 15, 20);
            let config = Arc::new(GameConfig::default().with_settings(Difficulty::Hard, settings));
            let eval = GuessEvaluator::new(config);
            let mut state = GameState::with_target(Difficulty::Hard, &settings, target, NOW).unwrap();
            for g in raw_guesses {
                let result = eval.evaluate(&state, &g.to_string()).unwrap();
                if result.verdict.is_terminal() {
                    break;
                }
                state = result.state;
            }

            let token = codec.encode_at(&state, &owner, NOW).unwrap();
            prop_assert_eq!(codec.decode_at(&token, &owner, NOW), Ok(state));
        }

        #[test]
        fn prop_bit_flip_rejected(byte_seed in any::<usize>(), bit in 0u8..8) {
            let codec = codec();
            let token = codec.encode_at(&sample_state(), "alice", NOW).unwrap();
            let mut raw = URL_SAFE_NO_PAD.decode(&token).unwrap();
            let idx = byte_seed % raw.len();
            raw[idx] ^= 1 << bit;
            let forged = URL_SAFE_NO_PAD.encode(raw);
            prop_assert_eq!(codec.decode_at(&forged, "alice", NOW), Err(TamperError));
        }

        #[test]
        fn prop_truncation_rejected(cut in 1usize..40) {
            let codec = codec();
            let token = codec.encode_at(&sample_state(), "alice", NOW).unwrap();
            let truncated = &token[..token.len().saturating_sub(cut)];
            prop_assert_eq!(codec.decode_at(truncated, "alice", NOW), Err(TamperError));
        }
    }
}
