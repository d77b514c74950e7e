//! Handlers for the `/reports` resource (helpdesk tickets).
//!
//! Tickets get a `SSSMMYY` work number at creation and on copy. The number is
//! derived from the greatest one already stored for the civil month; two
//! concurrent creates can derive the same number, in which case the unique
//! index rejects the second insert and the caller sees 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use helpdesk_core::clock;
use helpdesk_core::error::CoreError;
use helpdesk_core::report::{self as rules, MonthlySummary, ReceiveWindow};
use helpdesk_core::thai_date;
use helpdesk_core::types::DbId;
use helpdesk_core::work_no;
use helpdesk_db::models::report::{
    CompareParams, CreateReport, DateRangeParams, MonthParams, ReportInput, ReportListParams,
};
use helpdesk_db::repositories::ReportRepo;
use helpdesk_db::{is_unique_violation, DbPool};

use super::ensure_department;
use crate::error::{AppError, AppResult};
use crate::export::{sheets, XlsxDownload};
use crate::middleware::auth::Unlocked;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Report",
        id,
    })
}

/// Next free work number for the month containing `date`.
async fn allocate_work_no(pool: &DbPool, date: NaiveDate) -> AppResult<String> {
    let latest = ReportRepo::latest_in_bucket(pool, &work_no::month_suffix(date)).await?;
    Ok(work_no::next_work_no(latest.as_deref(), date)?)
}

/// Map an insert failure; a duplicate work number is a retryable conflict.
fn insert_error(err: sqlx::Error, work_no: &str) -> AppError {
    if is_unique_violation(&err) {
        tracing::warn!(work_no = %work_no, "Work number collision on insert");
        AppError::Core(CoreError::Conflict(format!(
            "Work number {work_no} was taken by a concurrent request, please retry"
        )))
    } else {
        AppError::Database(err)
    }
}

/// Year and month from query params, defaulting to the current civil month.
fn month_or_current(params: &MonthParams) -> (i32, u32) {
    let (year, month) = clock::year_month(&clock::civil_now());
    (params.year.unwrap_or(year), params.month.unwrap_or(month))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/reports
///
/// Filtered, paginated list. Without `date_from` and `date_to` only the
/// current civil month is returned.
pub async fn list_reports(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<ReportListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.filter(clock::civil_now())?;
    let page = ReportRepo::list(&state.pool, &filter, params.page).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/reports
///
/// Create a ticket. An optional `signature` data URL is stored as a PNG; a
/// payload that is not a PNG is dropped.
pub async fn create_report(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Json(input): Json<CreateReport>,
) -> AppResult<impl IntoResponse> {
    let fields = input.report.to_fields()?;
    ensure_department(&state.pool, &fields.department).await?;

    let signature = match input.signature.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(payload) => state
            .signatures
            .save_ticket_signature(payload)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store signature: {e}")))?,
        None => None,
    };

    let created_at = Utc::now();
    let work_no = match allocate_work_no(&state.pool, clock::to_civil(created_at).date()).await {
        Ok(n) => n,
        Err(e) => {
            if let Some(name) = &signature {
                state.signatures.remove_ticket_signature(name).await;
            }
            return Err(e);
        }
    };

    let report = match ReportRepo::create(
        &state.pool,
        &work_no,
        &fields,
        signature.as_deref(),
        created_at,
    )
    .await
    {
        Ok(report) => report,
        Err(err) => {
            if let Some(name) = &signature {
                state.signatures.remove_ticket_signature(name).await;
            }
            return Err(insert_error(err, &work_no));
        }
    };

    tracing::info!(
        report_id = report.id,
        work_no = %report.work_no,
        department = %report.department,
        has_signature = report.signature.is_some(),
        "Report created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/reports/{id}
pub async fn get_report(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = ReportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: report }))
}

/// PUT /api/v1/reports/{id}
///
/// Replace the editable fields. Work number, signature and creation time
/// are kept.
pub async fn update_report(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReportInput>,
) -> AppResult<impl IntoResponse> {
    let fields = input.to_fields()?;
    ensure_department(&state.pool, &fields.department).await?;

    let report = ReportRepo::update(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(report_id = id, work_no = %report.work_no, "Report updated");

    Ok(Json(DataResponse { data: report }))
}

/// DELETE /api/v1/reports/{id}
///
/// Delete the row, then its signature file. A file that cannot be removed is
/// only logged.
pub async fn delete_report(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let report = ReportRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(name) = report.signature.as_deref() {
        state.signatures.remove_ticket_signature(name).await;
    }

    tracing::info!(report_id = id, work_no = %report.work_no, "Report deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/reports/{id}/copy
///
/// Duplicate a ticket under a fresh work number, without its signature.
pub async fn copy_report(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ReportRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let created_at = Utc::now();
    let work_no = allocate_work_no(&state.pool, clock::to_civil(created_at).date()).await?;

    let report = ReportRepo::copy(&state.pool, id, &work_no, created_at)
        .await
        .map_err(|e| insert_error(e, &work_no))?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        source_id = id,
        report_id = report.id,
        work_no = %report.work_no,
        "Report copied",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Monthly department by job type counts.
#[derive(Debug, Serialize)]
pub struct MonthlySummaryResponse {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub summary: MonthlySummary,
}

async fn load_monthly_summary(pool: &DbPool, year: i32, month: u32) -> AppResult<MonthlySummary> {
    let window = ReceiveWindow::month(year, month)?;
    let groups = ReportRepo::group_counts(pool, &window).await?;
    Ok(rules::summarize_by_department(groups))
}

/// GET /api/v1/reports/summary
///
/// `?year=&month=`, defaulting to the current civil month.
pub async fn monthly_summary(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> AppResult<impl IntoResponse> {
    let (year, month) = month_or_current(&params);
    let summary = load_monthly_summary(&state.pool, year, month).await?;
    Ok(Json(DataResponse {
        data: MonthlySummaryResponse {
            year,
            month,
            summary,
        },
    }))
}

/// GET /api/v1/reports/summary/export
pub async fn export_monthly_summary(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> AppResult<XlsxDownload> {
    let (year, month) = month_or_current(&params);
    let summary = load_monthly_summary(&state.pool, year, month).await?;

    let workbook = sheets::monthly_summary(year, month, &summary);
    let download = XlsxDownload::new(&workbook, format!("monthly_summary_{year}{month:02}.xlsx"))?
        .with_display_filename(format!(
            "ตารางสรุปงานรายเดือน_{}.xlsx",
            thai_date::month_year(year, month)
        ));

    tracing::info!(year, month, "Monthly summary exported");
    Ok(download)
}

/// GET /api/v1/reports/compare
///
/// Closed-ticket counts per job type for two staff members. Both names are
/// needed for a meaningful comparison; with either missing all counts are 0.
pub async fn compare_staff(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    let person1 = params.person1.as_deref().map(str::trim).unwrap_or_default();
    let person2 = params.person2.as_deref().map(str::trim).unwrap_or_default();

    let groups = if person1.is_empty() || person2.is_empty() {
        Vec::new()
    } else {
        let window = ReceiveWindow::resolve(params.date_from, params.date_to, clock::civil_now())?;
        ReportRepo::staff_counts(&state.pool, &window, person1, person2).await?
    };

    let comparison = rules::compare_staff(groups, person1, person2);
    Ok(Json(DataResponse { data: comparison }))
}

/// GET /api/v1/reports/export
///
/// Ticket log for `date_from..=date_to`; both bounds are required.
pub async fn export_report_log(
    _unlocked: Unlocked,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<XlsxDownload> {
    let (Some(from), Some(to)) = (params.date_from, params.date_to) else {
        return Err(AppError::BadRequest(
            "date_from and date_to are required".into(),
        ));
    };

    let reports = ReportRepo::log_for_window(&state.pool, &ReceiveWindow::days(from, to)).await?;
    let workbook = sheets::ticket_log(&reports);

    tracing::info!(%from, %to, rows = reports.len(), "Report log exported");
    XlsxDownload::new(&workbook, format!("report_{from}_to_{to}.xlsx"))
}
