use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;
use crate::auth::password::hash_password;

/// Server configuration loaded from environment variables.
///
/// All fields except the unlock credential and JWT secret have defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory of ticket signature PNGs, served under `/signatures`.
    pub signature_dir: PathBuf,
    /// Directory of staff signature PNGs. Never served; must not sit inside
    /// `signature_dir`.
    pub staff_signature_dir: PathBuf,
    /// Argon2id PHC hash of the shared unlock password.
    pub unlock_password_hash: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SIGNATURE_DIR`        | `static/signatures`        |
    /// | `STAFF_SIGNATURE_DIR`  | `data/staff_signatures`    |
    /// | `UNLOCK_PASSWORD`      | required                   |
    ///
    /// The unlock password is hashed once here; the plaintext is not kept.
    ///
    /// # Panics
    ///
    /// Panics if `UNLOCK_PASSWORD` is missing or empty, a numeric value
    /// does not parse, or the staff signature directory lies inside the
    /// served signature directory.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let signature_dir = PathBuf::from(
            std::env::var("SIGNATURE_DIR").unwrap_or_else(|_| "static/signatures".into()),
        );

        let staff_signature_dir = PathBuf::from(
            std::env::var("STAFF_SIGNATURE_DIR")
                .unwrap_or_else(|_| "data/staff_signatures".into()),
        );
        assert!(
            !staff_signature_dir.starts_with(&signature_dir),
            "STAFF_SIGNATURE_DIR must not be inside SIGNATURE_DIR"
        );

        let unlock_password = std::env::var("UNLOCK_PASSWORD")
            .expect("UNLOCK_PASSWORD must be set in the environment");
        assert!(!unlock_password.is_empty(), "UNLOCK_PASSWORD must not be empty");
        let unlock_password_hash =
            hash_password(&unlock_password).expect("Failed to hash UNLOCK_PASSWORD");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            signature_dir,
            staff_signature_dir,
            unlock_password_hash,
            jwt,
        }
    }
}
