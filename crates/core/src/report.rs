//! Ticket ("report") rules: job types, field normalisation, the receive-date
//! window used by list queries, and the summary/comparison aggregations.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::clock;
use crate::error::CoreError;
use crate::types::CivilDateTime;

// ---------------------------------------------------------------------------
// Job types
// ---------------------------------------------------------------------------

pub const JOB_SOFTWARE: &str = "Software";
pub const JOB_HARDWARE: &str = "Hardware";
pub const JOB_NETWORK: &str = "Network";
pub const JOB_OTHER: &str = "Other";

/// Job types that summaries break out; anything else counts as [`JOB_OTHER`].
pub const SUMMARY_JOB_TYPES: [&str; 4] = [JOB_SOFTWARE, JOB_HARDWARE, JOB_NETWORK, JOB_OTHER];

/// Label for tickets stored without a department.
pub const UNSPECIFIED_DEPARTMENT: &str = "ไม่ระบุ";

/// Tickets per page in the list view.
pub const REPORT_PAGE_SIZE: i64 = 10;

/// Map a stored job type onto one of [`SUMMARY_JOB_TYPES`].
///
/// Matching ignores surrounding whitespace and letter case; blank and unknown
/// values fold into `Other`.
pub fn summary_bucket(job_type: Option<&str>) -> &'static str {
    let trimmed = job_type.map(str::trim).unwrap_or_default();
    SUMMARY_JOB_TYPES
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(trimmed))
        .unwrap_or(JOB_OTHER)
}

// ---------------------------------------------------------------------------
// Field normalisation
// ---------------------------------------------------------------------------

/// Trim the closing staff member's name.
///
/// Blank names become `None`. A value that looks like an image filename is
/// rejected: legacy rows had the signature filename written into this column
/// and new writes must not recreate that shape.
pub fn normalize_confirm_name(name: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = name.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if trimmed.to_ascii_lowercase().ends_with(".png") {
        return Err(CoreError::Validation(
            "confirm_name must be a person's name, not an image filename".into(),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Combine separate date and time form fields; both are needed.
pub fn combine_date_time(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Option<NaiveDateTime> {
    match (date, time) {
        (Some(d), Some(t)) => Some(d.and_time(clock::truncate_to_minute(t))),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Receive-date window
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` window on `receive_datetime`.
///
/// Rows with a null or empty receive time never fall inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReceiveWindow {
    /// Whole days from `from` through `to`, inclusive.
    pub fn days(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            start: from.and_time(NaiveTime::MIN),
            end: (to + Duration::days(1)).and_time(NaiveTime::MIN),
        }
    }

    /// The calendar month containing `at`.
    pub fn month_of(at: CivilDateTime) -> Result<Self, CoreError> {
        let (year, month) = clock::year_month(&at);
        Self::month(year, month)
    }

    /// A calendar month by number.
    pub fn month(year: i32, month: u32) -> Result<Self, CoreError> {
        let (first, next) = clock::month_bounds(year, month)
            .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month}")))?;
        Ok(Self {
            start: first.and_time(NaiveTime::MIN),
            end: next.and_time(NaiveTime::MIN),
        })
    }

    /// Explicit range when both ends are given, otherwise the month of `now`.
    pub fn resolve(
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        now: CivilDateTime,
    ) -> Result<Self, CoreError> {
        match (date_from, date_to) {
            (Some(from), Some(to)) => Ok(Self::days(from, to)),
            _ => Self::month_of(now),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Ticket counts per summary job type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobTypeCounts {
    pub software: i64,
    pub hardware: i64,
    pub network: i64,
    pub other: i64,
    pub total: i64,
}

impl JobTypeCounts {
    pub fn add(&mut self, bucket: &str, count: i64) {
        match bucket {
            JOB_SOFTWARE => self.software += count,
            JOB_HARDWARE => self.hardware += count,
            JOB_NETWORK => self.network += count,
            _ => self.other += count,
        }
        self.total += count;
    }

    /// Counts in [`SUMMARY_JOB_TYPES`] order.
    pub fn as_array(&self) -> [i64; 4] {
        [self.software, self.hardware, self.network, self.other]
    }
}

/// Department × job type matrix for one month.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlySummary {
    pub departments: BTreeMap<String, JobTypeCounts>,
    pub grand_total: JobTypeCounts,
}

/// Fold `(department, job_type, count)` groups into a [`MonthlySummary`].
pub fn summarize_by_department<I>(groups: I) -> MonthlySummary
where
    I: IntoIterator<Item = (Option<String>, Option<String>, i64)>,
{
    let mut summary = MonthlySummary::default();
    for (department, job_type, count) in groups {
        let department = department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| UNSPECIFIED_DEPARTMENT.to_string());
        let bucket = summary_bucket(job_type.as_deref());

        summary
            .departments
            .entry(department)
            .or_default()
            .add(bucket, count);
        summary.grand_total.add(bucket, count);
    }
    summary
}

/// Side-by-side job counts for two staff members.
#[derive(Debug, Clone, Serialize)]
pub struct StaffComparison {
    pub labels: [&'static str; 4],
    pub person1: [i64; 4],
    pub person2: [i64; 4],
    pub diff: [i64; 4],
    pub total1: i64,
    pub total2: i64,
    pub diff_total: i64,
}

/// Build a [`StaffComparison`] from `(confirm_name, job_type, count)` groups.
///
/// Job types outside [`SUMMARY_JOB_TYPES`] are not counted. Comparing a
/// person with themselves yields identical columns.
pub fn compare_staff<I>(groups: I, person1: &str, person2: &str) -> StaffComparison
where
    I: IntoIterator<Item = (String, String, i64)>,
{
    let mut p1 = [0_i64; 4];
    let mut p2 = [0_i64; 4];

    for (name, job_type, count) in groups {
        let Some(idx) = SUMMARY_JOB_TYPES.iter().position(|t| *t == job_type) else {
            continue;
        };
        if name == person1 {
            p1[idx] = count;
        }
        if name == person2 {
            p2[idx] = count;
        }
    }

    let diff = [p1[0] - p2[0], p1[1] - p2[1], p1[2] - p2[2], p1[3] - p2[3]];
    StaffComparison {
        labels: SUMMARY_JOB_TYPES,
        person1: p1,
        person2: p2,
        diff,
        total1: p1.iter().sum(),
        total2: p2.iter().sum(),
        diff_total: diff.iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets_ignore_case_and_whitespace() {
        assert_eq!(summary_bucket(Some(" software ")), JOB_SOFTWARE);
        assert_eq!(summary_bucket(Some("NETWORK")), JOB_NETWORK);
        assert_eq!(summary_bucket(Some("Printer ink")), JOB_OTHER);
        assert_eq!(summary_bucket(None), JOB_OTHER);
    }

    #[test]
    fn confirm_name_is_trimmed() {
        assert_eq!(
            normalize_confirm_name(Some("  Somchai  ")).unwrap().as_deref(),
            Some("Somchai")
        );
        assert_eq!(normalize_confirm_name(Some("   ")).unwrap(), None);
        assert_eq!(normalize_confirm_name(None).unwrap(), None);
    }

    #[test]
    fn confirm_name_rejects_image_filenames() {
        assert_matches!(
            normalize_confirm_name(Some("3f2a.PNG")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn date_and_time_need_both_parts() {
        let d = date(2024, 3, 15);
        let t = NaiveTime::from_hms_opt(9, 30, 12).unwrap();
        assert_eq!(
            combine_date_time(Some(d), Some(t)),
            Some(d.and_hms_opt(9, 30, 0).unwrap())
        );
        assert_eq!(combine_date_time(Some(d), None), None);
        assert_eq!(combine_date_time(None, Some(t)), None);
    }

    #[test]
    fn explicit_range_covers_whole_days() {
        let w = ReceiveWindow::days(date(2024, 3, 1), date(2024, 3, 5));
        assert_eq!(w.start, date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(w.end, date(2024, 3, 6).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn missing_range_end_falls_back_to_current_month() {
        let now = date(2024, 2, 10).and_hms_opt(12, 0, 0).unwrap();
        let w = ReceiveWindow::resolve(Some(date(2024, 1, 1)), None, now).unwrap();
        assert_eq!(w.start, date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(w.end, date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn invalid_month_is_validation_error() {
        assert_matches!(ReceiveWindow::month(2024, 0), Err(CoreError::Validation(_)));
    }

    #[test]
    fn monthly_summary_folds_unknowns() {
        let summary = summarize_by_department(vec![
            (Some("ศพท.".into()), Some("Software".into()), 3),
            (Some("ศพท.".into()), Some("hardware".into()), 1),
            (Some("กกม.".into()), Some("Scanner".into()), 2),
            (None, None, 1),
        ]);

        let it = &summary.departments["ศพท."];
        assert_eq!(it.software, 3);
        assert_eq!(it.hardware, 1);
        assert_eq!(it.total, 4);
        assert_eq!(summary.departments["กกม."].other, 2);
        assert_eq!(summary.departments[UNSPECIFIED_DEPARTMENT].other, 1);
        assert_eq!(summary.grand_total.total, 7);
        assert_eq!(summary.grand_total.as_array(), [3, 1, 0, 3]);
    }

    #[test]
    fn staff_comparison_skips_unknown_job_types() {
        let cmp = compare_staff(
            vec![
                ("A".to_string(), "Software".to_string(), 4),
                ("A".to_string(), "Network".to_string(), 1),
                ("B".to_string(), "Software".to_string(), 2),
                ("B".to_string(), "Printer".to_string(), 9),
            ],
            "A",
            "B",
        );
        assert_eq!(cmp.person1, [4, 0, 1, 0]);
        assert_eq!(cmp.person2, [2, 0, 0, 0]);
        assert_eq!(cmp.diff, [2, 0, 1, 0]);
        assert_eq!(cmp.total1, 5);
        assert_eq!(cmp.total2, 2);
        assert_eq!(cmp.diff_total, 3);
    }

    #[test]
    fn staff_compared_with_themselves_has_no_difference() {
        let cmp = compare_staff(
            vec![
                ("A".to_string(), "Software".to_string(), 4),
                ("A".to_string(), "Hardware".to_string(), 2),
            ],
            "A",
            "A",
        );
        assert_eq!(cmp.person1, [4, 2, 0, 0]);
        assert_eq!(cmp.person2, cmp.person1);
        assert_eq!(cmp.diff, [0; 4]);
        assert_eq!(cmp.diff_total, 0);
    }
}
