//! Thai calendar formatting for printed exports.
//!
//! Years are shown in the Buddhist era (Gregorian + 543).

use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

const BUDDHIST_ERA_OFFSET: i32 = 543;

pub fn buddhist_year(year: i32) -> i32 {
    year + BUDDHIST_ERA_OFFSET
}

fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| THAI_MONTHS.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// `มีนาคม 2567`
pub fn month_year(year: i32, month: u32) -> String {
    format!("{} {}", month_name(month), buddhist_year(year))
}

/// `15 มีนาคม 2567`
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_name(date.month()),
        buddhist_year(date.year())
    )
}

/// `15/03/2567 09:30`
pub fn short_date_time(at: NaiveDateTime) -> String {
    format!(
        "{:02}/{:02}/{} {}",
        at.day(),
        at.month(),
        buddhist_year(at.year()),
        at.format("%H:%M")
    )
}
