//! Staff attendance entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use helpdesk_core::types::DbId;

/// A row from the `attendance` table: one per staff member and work day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attendance {
    pub id: DbId,
    pub staff_name: String,
    pub work_date: NaiveDate,
    pub time_in: Option<NaiveTime>,
    pub time_out: Option<NaiveTime>,
    pub note: Option<String>,
}

/// Body for check-in and check-out.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInOut {
    pub staff_name: String,
}

/// Result of a check-out; `updated` is false when there was no check-in that day.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutResult {
    pub updated: bool,
    pub attendance: Option<Attendance>,
}

/// `?staff_name=&year=&month=` for the monthly list; defaults to the current civil month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceListParams {
    pub staff_name: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// `?staff_name=` for the month sheet export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceExportParams {
    pub staff_name: Option<String>,
}

/// Body for storing a staff member's signature image.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffSignatureUpload {
    /// `data:image/png;base64,...`
    pub signature: String,
}
