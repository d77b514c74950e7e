//! Handlers for the `/attendance` resource.
//!
//! Work days and clock times come from the civil clock at request time;
//! clients never send timestamps.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Datelike;
use serde::Serialize;

use helpdesk_core::attendance::{normalize_staff_name, work_day};
use helpdesk_core::clock;
use helpdesk_core::error::CoreError;
use helpdesk_core::signature;
use helpdesk_core::thai_date;
use helpdesk_db::models::attendance::{
    AttendanceExportParams, AttendanceListParams, CheckInOut, CheckOutResult,
    StaffSignatureUpload,
};
use helpdesk_db::repositories::AttendanceRepo;

use crate::error::{AppError, AppResult};
use crate::export::{sheets, XlsxDownload};
use crate::middleware::auth::Unlocked;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::StoreError;

/// GET /api/v1/attendance
///
/// `?staff_name=&year=&month=`; month defaults to the current civil month.
pub async fn list_attendance(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<AttendanceListParams>,
) -> AppResult<impl IntoResponse> {
    let (cur_year, cur_month) = clock::year_month(&clock::civil_now());
    let year = params.year.unwrap_or(cur_year);
    let month = params.month.unwrap_or(cur_month);
    let (first, next) = clock::month_bounds(year, month)
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month}")))?;

    let staff_name = params
        .staff_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let rows = AttendanceRepo::list_for_month(&state.pool, staff_name, first, next).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/attendance/check-in
///
/// Record (or overwrite) today's time in.
pub async fn check_in(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Json(input): Json<CheckInOut>,
) -> AppResult<impl IntoResponse> {
    let staff_name = normalize_staff_name(&input.staff_name)?;
    let (work_date, time_in) = work_day(clock::civil_now());

    let row = AttendanceRepo::check_in(&state.pool, &staff_name, work_date, time_in).await?;

    tracing::info!(
        staff_name = %staff_name,
        %work_date,
        %time_in,
        "Checked in",
    );

    Ok(Json(DataResponse { data: row }))
}

/// POST /api/v1/attendance/check-out
///
/// Set today's time out. Without a check-in today nothing is written and
/// `updated` is false.
pub async fn check_out(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Json(input): Json<CheckInOut>,
) -> AppResult<impl IntoResponse> {
    let staff_name = normalize_staff_name(&input.staff_name)?;
    let (work_date, time_out) = work_day(clock::civil_now());

    let row = AttendanceRepo::check_out(&state.pool, &staff_name, work_date, time_out).await?;

    if row.is_some() {
        tracing::info!(staff_name = %staff_name, %work_date, %time_out, "Checked out");
    } else {
        tracing::info!(staff_name = %staff_name, %work_date, "Check-out without check-in ignored");
    }

    Ok(Json(DataResponse {
        data: CheckOutResult {
            updated: row.is_some(),
            attendance: row,
        },
    }))
}

/// Stored staff signature.
#[derive(Debug, Serialize)]
pub struct StaffSignatureStored {
    pub staff_name: String,
    pub bytes: usize,
}

/// PUT /api/v1/attendance/signatures/{staff_name}
///
/// Store or replace a staff member's signature image.
pub async fn put_staff_signature(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(staff_name): Path<String>,
    Json(input): Json<StaffSignatureUpload>,
) -> AppResult<impl IntoResponse> {
    let staff_name = normalize_staff_name(&staff_name)?;
    let png = signature::decode_data_url(&input.signature).ok_or_else(|| {
        AppError::BadRequest("signature must be a base64 PNG data URL".into())
    })?;

    state
        .signatures
        .save_staff_signature(&staff_name, &png)
        .await
        .map_err(|e| match e {
            StoreError::Core(core) => AppError::Core(core),
            StoreError::Io(io) => {
                AppError::InternalError(format!("Failed to store staff signature: {io}"))
            }
        })?;

    tracing::info!(staff_name = %staff_name, bytes = png.len(), "Staff signature stored");

    Ok((
        StatusCode::OK,
        Json(DataResponse {
            data: StaffSignatureStored {
                staff_name,
                bytes: png.len(),
            },
        }),
    ))
}

/// GET /api/v1/attendance/export
///
/// Month sheet for one staff member covering the current civil month.
pub async fn export_attendance(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<AttendanceExportParams>,
) -> AppResult<XlsxDownload> {
    let staff_name = params
        .staff_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("staff_name is required".into()))?
        .to_string();

    let today = clock::civil_now().date();
    let (year, month) = (today.year(), today.month());
    let (first, next) = clock::month_bounds(year, month)
        .ok_or_else(|| AppError::InternalError(format!("Invalid month {year}-{month}")))?;
    let days = clock::days_in_month(year, month)
        .ok_or_else(|| AppError::InternalError(format!("Invalid month {year}-{month}")))?;

    let rows = AttendanceRepo::list_for_month(&state.pool, Some(&staff_name), first, next).await?;
    let signature_png = state.signatures.load_staff_signature(&staff_name).await;
    let has_signature = signature_png.is_some();

    let workbook = sheets::attendance_month(&staff_name, year, month, days, &rows, signature_png);
    let download = XlsxDownload::new(&workbook, format!("attendance_{year}{month:02}.xlsx"))?
        .with_display_filename(format!(
            "ใบลงเวลา_{staff_name}_{}.xlsx",
            thai_date::month_year(year, month)
        ));

    tracing::info!(
        staff_name = %staff_name,
        year,
        month,
        rows = rows.len(),
        has_signature,
        "Attendance sheet exported",
    );

    Ok(download)
}
