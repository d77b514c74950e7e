//! Handler for the `/auth` resource.
//!
//! The application has a single shared password. Presenting it yields a
//! bearer token that unlocks every other `/api/v1` route.

use axum::extract::State;
use axum::Json;
use helpdesk_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_unlock_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/unlock`.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

/// Successful unlock response.
#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /api/v1/auth/unlock
///
/// Exchange the shared password for an unlock token.
pub async fn unlock(
    State(state): State<AppState>,
    Json(input): Json<UnlockRequest>,
) -> AppResult<Json<UnlockResponse>> {
    let valid = verify_password(&input.password, &state.config.unlock_password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !valid {
        tracing::warn!("Unlock attempt with wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    let access_token = generate_unlock_token(&state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!("Unlock token issued");

    Ok(Json(UnlockResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.unlock_token_expiry_mins * 60,
    }))
}
