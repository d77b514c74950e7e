//! Attendance rules.

use chrono::{NaiveDate, NaiveTime};

use crate::clock;
use crate::error::CoreError;
use crate::types::CivilDateTime;

/// Trim and require a staff name.
pub fn normalize_staff_name(staff_name: &str) -> Result<String, CoreError> {
    let trimmed = staff_name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("staff_name is required".into()));
    }
    Ok(trimmed.to_string())
}

/// Work day and minute-resolution clock time of a civil instant.
pub fn work_day(at: CivilDateTime) -> (NaiveDate, NaiveTime) {
    (at.date(), clock::truncate_to_minute(at.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_day_splits_date_and_minute() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(8, 29, 59)
            .unwrap();
        let (day, time) = work_day(at);
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(8, 29, 0).unwrap());
    }

    #[test]
    fn staff_name_is_required() {
        assert!(normalize_staff_name(" \t").is_err());
        assert_eq!(normalize_staff_name(" Nok ").unwrap(), "Nok");
    }
}
