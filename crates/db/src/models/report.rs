//! Ticket ("report") entity model and DTOs.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use helpdesk_core::error::CoreError;
use helpdesk_core::report::{self as rules, ReceiveWindow};
use helpdesk_core::search;
use helpdesk_core::types::{CivilDateTime, DbId, Timestamp};

use super::{require_text, trim_opt, validate_input};

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub work_no: String,
    pub receive_datetime: Option<NaiveDateTime>,
    pub department: String,
    pub reporter: String,
    pub job_type: String,
    pub asset_no: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub completed_datetime: Option<NaiveDateTime>,
    pub close_note: Option<String>,
    pub confirm_name: Option<String>,
    pub signature: Option<String>,
    pub created_at: Timestamp,
}

/// Mutable ticket fields as submitted by the form.
///
/// Used as the update body; creation wraps it in [`CreateReport`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReportInput {
    pub receive_date: Option<NaiveDate>,
    pub receive_time: Option<NaiveTime>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub department: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub reporter: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub job_type: String,
    #[validate(length(max = 200))]
    pub asset_no: Option<String>,
    #[validate(length(max = 10000))]
    pub problem: Option<String>,
    #[validate(length(max = 10000))]
    pub solution: Option<String>,
    pub complete_date: Option<NaiveDate>,
    pub complete_time: Option<NaiveTime>,
    #[validate(length(max = 10000))]
    pub close_note: Option<String>,
    #[validate(length(max = 200))]
    pub confirm_name: Option<String>,
}

/// Body for creating a ticket: the form fields plus an optional
/// `data:image/png;base64,...` signature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReport {
    #[serde(flatten)]
    pub report: ReportInput,
    pub signature: Option<String>,
}

/// Normalised, validated ticket fields written by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFields {
    pub receive_datetime: Option<NaiveDateTime>,
    pub department: String,
    pub reporter: String,
    pub job_type: String,
    pub asset_no: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub completed_datetime: Option<NaiveDateTime>,
    pub close_note: Option<String>,
    pub confirm_name: Option<String>,
}

impl ReportInput {
    /// Validate and normalise into [`ReportFields`].
    ///
    /// The department code is only checked for presence here; directory
    /// membership needs the database and is checked by the caller.
    pub fn to_fields(&self) -> Result<ReportFields, CoreError> {
        validate_input(self)?;
        Ok(ReportFields {
            receive_datetime: rules::combine_date_time(self.receive_date, self.receive_time),
            department: require_text(&self.department, "department")?,
            reporter: require_text(&self.reporter, "reporter")?,
            job_type: require_text(&self.job_type, "job_type")?,
            asset_no: trim_opt(self.asset_no.as_deref()),
            problem: trim_opt(self.problem.as_deref()),
            solution: trim_opt(self.solution.as_deref()),
            completed_datetime: rules::combine_date_time(self.complete_date, self.complete_time),
            close_note: trim_opt(self.close_note.as_deref()),
            confirm_name: rules::normalize_confirm_name(self.confirm_name.as_deref())?,
        })
    }
}

/// Query parameters for the ticket list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportListParams {
    pub q: Option<String>,
    pub job_type: Option<String>,
    /// Exact `confirm_name` of the closing staff member.
    pub staff: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<i64>,
}

/// Resolved list filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilter {
    pub tokens: Vec<String>,
    pub job_type: Option<String>,
    pub staff: Option<String>,
    pub window: ReceiveWindow,
}

impl ReportListParams {
    /// Resolve the filter; without a full date range the window is the civil month of `now`.
    pub fn filter(&self, now: CivilDateTime) -> Result<ReportFilter, CoreError> {
        Ok(ReportFilter {
            tokens: search::tokenize(self.q.as_deref().unwrap_or_default())
                .into_iter()
                .map(str::to_string)
                .collect(),
            job_type: trim_opt(self.job_type.as_deref()),
            staff: trim_opt(self.staff.as_deref()),
            window: ReceiveWindow::resolve(self.date_from, self.date_to, now)?,
        })
    }
}

/// One page of tickets.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub items: Vec<Report>,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
}

/// `?year=&month=` for the monthly summary; defaults to the current civil month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Query parameters for comparing two staff members' closed tickets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareParams {
    pub person1: Option<String>,
    pub person2: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Required date range for the ticket-log export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_input() -> ReportInput {
        ReportInput {
            department: "ศพท.".into(),
            reporter: "Nok".into(),
            job_type: "Hardware".into(),
            ..ReportInput::default()
        }
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let input = ReportInput::default();
        assert_matches!(input.to_fields(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_reporter_fails_validation() {
        let input = ReportInput {
            reporter: "   ".into(),
            ..valid_input()
        };
        assert_matches!(input.to_fields(), Err(CoreError::Validation(msg)) if msg.contains("reporter"));
    }

    #[test]
    fn fields_are_trimmed() {
        let input = ReportInput {
            confirm_name: Some("  Somchai ".into()),
            asset_no: Some("   ".into()),
            ..valid_input()
        };
        let fields = input.to_fields().unwrap();
        assert_eq!(fields.confirm_name.as_deref(), Some("Somchai"));
        assert_eq!(fields.asset_no, None);
        assert_eq!(fields.receive_datetime, None);
    }

    #[test]
    fn create_body_flattens_form_fields() {
        let body: CreateReport = serde_json::from_value(serde_json::json!({
            "department": "ศพท.",
            "reporter": "Nok",
            "job_type": "Network",
            "receive_date": "2024-03-15",
            "receive_time": "09:30:00",
            "signature": "data:image/png;base64,AAAA"
        }))
        .unwrap();
        assert_eq!(body.report.job_type, "Network");
        assert_eq!(body.signature.as_deref(), Some("data:image/png;base64,AAAA"));
        let fields = body.report.to_fields().unwrap();
        assert!(fields.receive_datetime.is_some());
    }

    #[test]
    fn list_filter_defaults_to_current_month() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let params = ReportListParams {
            q: Some(" printer  jam ".into()),
            staff: Some(" ".into()),
            ..ReportListParams::default()
        };
        let filter = params.filter(now).unwrap();
        assert_eq!(filter.tokens, vec!["printer".to_string(), "jam".to_string()]);
        assert_eq!(filter.staff, None);
        assert_eq!(filter.window, ReceiveWindow::month(2024, 3).unwrap());
    }
}
