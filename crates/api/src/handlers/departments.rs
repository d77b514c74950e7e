//! Handlers for the department directory.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_db::repositories::DepartmentRepo;

use crate::error::AppResult;
use crate::middleware::auth::Unlocked;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/departments
///
/// Active directory entries ordered by short code.
pub async fn list_departments(
    _unlocked: Unlocked,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let departments = DepartmentRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: departments }))
}
