//! Route definitions for the `/reports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /                -> list_reports
/// POST   /                -> create_report
/// GET    /summary         -> monthly_summary
/// GET    /summary/export  -> export_monthly_summary
/// GET    /compare         -> compare_staff
/// GET    /export          -> export_report_log
/// GET    /{id}            -> get_report
/// PUT    /{id}            -> update_report
/// DELETE /{id}            -> delete_report
/// POST   /{id}/copy       -> copy_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reports::list_reports).post(reports::create_report),
        )
        .route("/summary", get(reports::monthly_summary))
        .route("/summary/export", get(reports::export_monthly_summary))
        .route("/compare", get(reports::compare_staff))
        .route("/export", get(reports::export_report_log))
        .route(
            "/{id}",
            get(reports::get_report)
                .put(reports::update_report)
                .delete(reports::delete_report),
        )
        .route("/{id}/copy", post(reports::copy_report))
}
