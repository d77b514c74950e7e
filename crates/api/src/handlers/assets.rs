//! Handlers for the `/assets` resource (IT inventory).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use helpdesk_core::asset::{self as rules, AssetSummary};
use helpdesk_core::clock;
use helpdesk_core::department;
use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::asset::{
    Asset, AssetInput, AssetListParams, AssetSummaryParams, ImportAssets, ResetOutcome,
};
use helpdesk_db::repositories::{AssetRepo, DepartmentRepo};

use super::ensure_department;
use crate::error::{AppError, AppResult};
use crate::export::{sheets, XlsxDownload};
use crate::middleware::auth::Unlocked;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Asset", id })
}

/// `YYYYMMDD` of the civil date, for export filenames.
fn date_stamp() -> String {
    clock::civil_now().format("%Y%m%d").to_string()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/assets
///
/// `?dept=&status=` filters; rows are in inventory order.
pub async fn list_assets(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<impl IntoResponse> {
    let assets = AssetRepo::list(
        &state.pool,
        params.department().as_deref(),
        params.status().as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/assets
pub async fn create_asset(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Json(input): Json<AssetInput>,
) -> AppResult<impl IntoResponse> {
    let fields = input.to_fields()?;
    ensure_department(&state.pool, &fields.department).await?;

    let asset = AssetRepo::create(&state.pool, &fields).await?;

    tracing::info!(
        asset_id = asset.id,
        asset_no = %asset.asset_no,
        department = %asset.department,
        "Asset created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: asset }))
}

/// PUT /api/v1/assets/{id}
pub async fn update_asset(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssetInput>,
) -> AppResult<impl IntoResponse> {
    let fields = input.to_fields()?;
    ensure_department(&state.pool, &fields.department).await?;

    let asset = AssetRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(asset_id = id, asset_no = %asset.asset_no, "Asset updated");

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete_asset(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(asset_id = id, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Bulk operations
// ---------------------------------------------------------------------------

/// POST /api/v1/assets/import
///
/// Insert parsed rows under one department (short code or full name). Rows
/// with a blank asset number or violating a constraint are skipped.
pub async fn import_assets(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Json(input): Json<ImportAssets>,
) -> AppResult<impl IntoResponse> {
    let requested = department::normalize_code(&input.department)?;
    let dept = DepartmentRepo::resolve(&state.pool, &requested)
        .await?
        .ok_or_else(|| department::unknown_code(&requested))?;

    let rows: Vec<_> = input
        .rows
        .iter()
        .map(|row| row.to_fields(&dept.short_code))
        .collect();
    let outcome = AssetRepo::import(&state.pool, &rows).await?;

    tracing::info!(
        department = %dept.short_code,
        imported = outcome.imported,
        skipped = outcome.skipped,
        "Assets imported",
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/assets/reset-status
///
/// Mark every in-use asset as unverified ahead of a physical check.
pub async fn reset_status(
    _unlocked: Unlocked,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let updated = AssetRepo::reset_status(&state.pool).await?;

    tracing::info!(updated, "Asset statuses reset to unverified");

    Ok(Json(DataResponse {
        data: ResetOutcome { updated },
    }))
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counts per department and type, plus the asset matching `q` exactly.
#[derive(Debug, Serialize)]
pub struct AssetSummaryResponse {
    pub summary: AssetSummary,
    pub detail: Option<Asset>,
}

/// GET /api/v1/assets/summary
///
/// With `?q=` the counts cover asset numbers containing `q`, and `detail`
/// holds the asset whose number equals `q`.
pub async fn asset_summary(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<AssetSummaryParams>,
) -> AppResult<impl IntoResponse> {
    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let pairs = AssetRepo::type_pairs(&state.pool, q).await?;
    let detail = match q {
        Some(asset_no) => AssetRepo::find_by_asset_no(&state.pool, asset_no).await?,
        None => None,
    };

    Ok(Json(DataResponse {
        data: AssetSummaryResponse {
            summary: rules::summarize(pairs),
            detail,
        },
    }))
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// GET /api/v1/assets/export
///
/// Inventory sheet for the same filters as the list.
pub async fn export_assets(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<XlsxDownload> {
    let dept = params.department();
    let assets = AssetRepo::list(&state.pool, dept.as_deref(), params.status().as_deref()).await?;
    let directory = DepartmentRepo::directory_map(&state.pool).await?;

    let workbook = sheets::asset_inventory(dept.as_deref(), &directory, &assets);

    tracing::info!(department = ?dept, rows = assets.len(), "Asset inventory exported");
    XlsxDownload::new(&workbook, format!("assets_{}.xlsx", date_stamp()))
}

/// GET /api/v1/assets/summary/export
pub async fn export_asset_summary(
    _unlocked: Unlocked,
    State(state): State<AppState>,
) -> AppResult<XlsxDownload> {
    let pairs = AssetRepo::type_pairs(&state.pool, None).await?;
    let (rows, totals) = rules::summary_table(pairs);

    let workbook = sheets::asset_summary_table(&rows, &totals);

    tracing::info!(departments = rows.len(), total = totals.total, "Asset summary exported");
    XlsxDownload::new(&workbook, format!("asset_summary_{}.xlsx", date_stamp()))
}
