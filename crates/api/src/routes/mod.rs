pub mod assets;
pub mod attendance;
pub mod auth;
pub mod departments;
pub mod health;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/unlock                          shared password -> token (public)
///
/// /departments                          directory
///
/// /reports                              list, create
/// /reports/{id}                         get, update, delete
/// /reports/{id}/copy                    copy (POST)
/// /reports/summary                      monthly summary
/// /reports/summary/export               monthly summary xlsx
/// /reports/compare                      staff comparison
/// /reports/export                       ticket log xlsx
///
/// /attendance                           month list
/// /attendance/check-in                  check in (POST)
/// /attendance/check-out                 check out (POST)
/// /attendance/signatures/{staff_name}   store staff signature (PUT)
/// /attendance/export                    month sheet xlsx
///
/// /assets                               list, create
/// /assets/{id}                          get, update, delete
/// /assets/import                        bulk import (POST)
/// /assets/reset-status                  bulk status reset (POST)
/// /assets/summary                       summary
/// /assets/export                        inventory xlsx
/// /assets/summary/export                summary table xlsx
/// ```
///
/// Everything except `/auth/unlock` requires an unlock token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/departments", departments::router())
        .nest("/reports", reports::router())
        .nest("/attendance", attendance::router())
        .nest("/assets", assets::router())
}
