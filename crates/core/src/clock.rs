//! Civil time helpers.
//!
//! Day and month boundaries (attendance work days, the default ticket list
//! window, work-number month buckets) are computed in a single fixed zone,
//! UTC+07:00, regardless of the server locale. The zone has no daylight
//! saving, so a constant offset is exact.

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};

use crate::types::{CivilDateTime, Timestamp};

/// Offset of the civil zone from UTC, in hours.
pub const CIVIL_OFFSET_HOURS: i32 = 7;

/// The civil zone as a chrono offset.
pub fn civil_offset() -> FixedOffset {
    FixedOffset::east_opt(CIVIL_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

/// Convert a UTC instant to civil wall-clock time.
pub fn to_civil(ts: Timestamp) -> CivilDateTime {
    ts.with_timezone(&civil_offset()).naive_local()
}

/// The current civil wall-clock time.
pub fn civil_now() -> CivilDateTime {
    to_civil(chrono::Utc::now())
}

/// Drop seconds and sub-second precision; attendance is kept at minute resolution.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// First day of the month and first day of the following month.
///
/// Returns `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next))
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (first, next) = month_bounds(year, month)?;
    u32::try_from((next - first).num_days()).ok()
}

/// Year and month of a civil date-time.
pub fn year_month(at: &CivilDateTime) -> (i32, u32) {
    (at.year(), at.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn civil_time_is_seven_hours_ahead() {
        let utc = chrono::Utc.with_ymd_and_hms(2024, 3, 31, 18, 30, 0).unwrap();
        let civil = to_civil(utc);
        assert_eq!(civil.date(), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(civil.time(), NaiveTime::from_hms_opt(1, 30, 0).unwrap());
        assert_eq!(civil_offset().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn truncation_drops_seconds() {
        let t = NaiveTime::from_hms_milli_opt(8, 15, 42, 500).unwrap();
        assert_eq!(truncate_to_minute(t), NaiveTime::from_hms_opt(8, 15, 0).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (first, next) = month_bounds(2024, 12).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 13), None);
    }
}
