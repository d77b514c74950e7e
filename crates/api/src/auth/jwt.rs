//! Unlock-token generation and validation.
//!
//! A successful unlock yields an HS256-signed JWT carrying [`Claims`]. There
//! is no per-user identity; the token only proves the shared password was
//! presented recently.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject of every unlock token.
pub const UNLOCK_SUBJECT: &str = "helpdesk-unlock";

/// JWT claims embedded in every unlock token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Always [`UNLOCK_SUBJECT`].
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Unlock token lifetime in minutes (default: 480).
    pub unlock_token_expiry_mins: i64,
}

/// Default unlock token expiry in minutes (one working day).
const DEFAULT_UNLOCK_EXPIRY_MINS: i64 = 480;

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `JWT_SECRET`                | **yes**  | --      |
    /// | `UNLOCK_TOKEN_EXPIRY_MINS`  | no       | `480`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let unlock_token_expiry_mins: i64 = std::env::var("UNLOCK_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_UNLOCK_EXPIRY_MINS.to_string())
            .parse()
            .expect("UNLOCK_TOKEN_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            unlock_token_expiry_mins,
        }
    }
}

/// Generate an HS256 unlock token.
pub fn generate_unlock_token(config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: UNLOCK_SUBJECT.to_string(),
        exp: now + config.unlock_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an unlock token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration; tokens with another subject are rejected.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.sub = Some(UNLOCK_SUBJECT.to_string());
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
