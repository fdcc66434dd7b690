//! Session Authentication
//!
//! Login validates a username and issues a signed session token (JWT, HS256)
//! naming the player. Every protected request re-checks the claims, so an
//! expired session is reported as unauthorized rather than as a bad guess.

use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::{env_parse, ConfigError};

/// Longest accepted username; longer input is truncated.
pub const MAX_USERNAME_LEN: usize = 12;

/// Authentication configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Issuer claim ("iss") written and required.
    pub issuer: String,
    /// HS256 secret. `None` means sessions cannot be issued.
    pub secret: Option<String>,
    /// Lifetime of a session token.
    pub session_ttl: Duration,
    /// Whether to skip expiry validation (for testing only).
    pub skip_expiry: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "guess-it".into(),
            secret: None,
            session_ttl: Duration::from_secs(24 * 3600),
            skip_expiry: false,
        }
    }
}

impl AuthConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(issuer) = std::env::var("AUTH_ISSUER") {
            config.issuer = issuer;
        }
        config.secret = std::env::var("SESSION_SECRET").ok().filter(|s| !s.is_empty());
        if let Some(secs) = env_parse::<u64>("SESSION_TTL_SECS")? {
            config.session_ttl = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Fill in a random secret if none is configured.
    ///
    /// Returns true if one was generated.
    pub fn ensure_secret(&mut self) -> bool {
        if self.secret.is_some() {
            return false;
        }
        self.secret = Some(hex::encode(crate::game::codec::generate_key()));
        true
    }

    /// Check if authentication is configured.
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the player's username.
    pub sub: String,
    /// Session identifier.
    pub sid: String,
    /// Expiry timestamp (Unix seconds).
    #[serde(default)]
    pub exp: u64,
    /// Issued at timestamp.
    #[serde(default)]
    pub iat: u64,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
}

impl SessionClaims {
    /// The player's username.
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Whether the session has expired at `now` (Unix seconds).
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.exp > 0 && now >= self.exp
    }

    /// Whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }
}

/// Authentication errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No authentication configured on server.
    #[error("authentication not configured")]
    NotConfigured,
    /// Username empty or not alphanumeric.
    #[error("Invalid username.")]
    InvalidUsername,
    /// Token format is invalid.
    #[error("invalid token format")]
    InvalidFormat,
    /// Token signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,
    /// Token has expired.
    #[error("token expired")]
    Expired,
    /// Issuer claim doesn't match expected value.
    #[error("invalid issuer")]
    InvalidIssuer,
    /// Required claim is missing.
    #[error("missing required claim: {0}")]
    MissingClaim(String),
    /// JWT encoding/decoding error.
    #[error("token error: {0}")]
    TokenError(String),
}

/// Normalise and validate a login username.
///
/// Whitespace is trimmed and input is cut to [`MAX_USERNAME_LEN`] characters;
/// the rest must be ASCII letters and digits.
pub fn validate_username(raw: &str) -> Result<String, AuthError> {
    let username: String = raw.trim().chars().take(MAX_USERNAME_LEN).collect();
    if username.is_empty() || !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AuthError::InvalidUsername);
    }
    Ok(username)
}

/// Issue a session token for `username`.
pub fn issue_token(username: &str, config: &AuthConfig) -> Result<(String, SessionClaims), AuthError> {
    let secret = config.secret.as_ref().ok_or(AuthError::NotConfigured)?;
    let now = unix_now();
    let claims = SessionClaims {
        sub: username.to_string(),
        sid: uuid::Uuid::new_v4().to_string(),
        exp: now + config.session_ttl.as_secs(),
        iat: now,
        iss: Some(config.issuer.clone()),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenError(e.to_string()))?;
    Ok((token, claims))
}

/// Validate a session token and extract claims.
pub fn validate_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AuthError> {
    let secret = config.secret.as_ref().ok_or(AuthError::NotConfigured)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = std::collections::HashSet::new();
    validation.set_issuer(&[&config.issuer]);
    validation.validate_aud = false;
    if config.skip_expiry {
        validation.validate_exp = false;
    }

    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data: TokenData<SessionClaims> =
        decode(token, &key, &validation).map_err(map_jwt_error)?;
    let claims = token_data.claims;

    if claims.sub.is_empty() {
        return Err(AuthError::MissingClaim("sub".into()));
    }
    if validate_username(&claims.sub).as_deref() != Ok(claims.sub.as_str()) {
        return Err(AuthError::InvalidUsername);
    }

    // Manual expiry check (the library allows clock leeway)
    if !config.skip_expiry && claims.is_expired() {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}

/// Map JWT library errors to our error type.
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) => AuthError::InvalidFormat,
        _ => AuthError::TokenError(err.to_string()),
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

// =============================================================================
// TESTS
// =============================================================================
