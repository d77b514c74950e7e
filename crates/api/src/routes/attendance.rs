//! Route definitions for the `/attendance` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// GET  /                          -> list_attendance
/// POST /check-in                  -> check_in
/// POST /check-out                 -> check_out
/// PUT  /signatures/{staff_name}   -> put_staff_signature
/// GET  /export                    -> export_attendance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(attendance::list_attendance))
        .route("/check-in", post(attendance::check_in))
        .route("/check-out", post(attendance::check_out))
        .route(
            "/signatures/{staff_name}",
            put(attendance::put_staff_signature),
        )
        .route("/export", get(attendance::export_attendance))
}
