//! Route definitions for the `/assets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /                -> list_assets
/// POST   /                -> create_asset
/// POST   /import          -> import_assets
/// POST   /reset-status    -> reset_status
/// GET    /summary         -> asset_summary
/// GET    /summary/export  -> export_asset_summary
/// GET    /export          -> export_assets
/// GET    /{id}            -> get_asset
/// PUT    /{id}            -> update_asset
/// DELETE /{id}            -> delete_asset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route("/import", post(assets::import_assets))
        .route("/reset-status", post(assets::reset_status))
        .route("/summary", get(assets::asset_summary))
        .route("/summary/export", get(assets::export_asset_summary))
        .route("/export", get(assets::export_assets))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
}
