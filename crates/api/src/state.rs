use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::SignatureStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: helpdesk_db::DbPool,
    /// Server configuration (unlock credential, token settings).
    pub config: Arc<ServerConfig>,
    /// Signature image storage on local disk.
    pub signatures: Arc<SignatureStore>,
}
