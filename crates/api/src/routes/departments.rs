use axum::routing::get;
use axum::Router;

use crate::handlers::departments;
use crate::state::AppState;

/// Routes mounted at `/departments`.
///
/// ```text
/// GET /  -> list_departments
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(departments::list_departments))
}
