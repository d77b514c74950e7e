//! Work-order numbering.
//!
//! A work number is `SSSMMYY`: a 3-digit sequence followed by the zero-padded
//! month and two-digit year of the civil creation time. The sequence restarts
//! at `001` every month. The repository finds the greatest existing number in
//! the month bucket (string order, which matches numeric order while all
//! sequences are 3 digits) and this module derives the successor.

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;

/// Width of the sequence field.
pub const SEQUENCE_WIDTH: usize = 3;

/// Largest sequence the 3-digit field can hold.
pub const MAX_SEQUENCE: u32 = 999;

/// Month bucket suffix for a civil date: `MMYY`.
pub fn month_suffix(date: NaiveDate) -> String {
    format!("{:02}{:02}", date.month(), date.year().rem_euclid(100))
}

/// SQL `LIKE` pattern selecting every work number in the bucket.
pub fn bucket_pattern(suffix: &str) -> String {
    format!("%{suffix}")
}

/// Parse the leading sequence digits of a work number.
pub fn parse_sequence(work_no: &str) -> Option<u32> {
    let head = work_no.get(..SEQUENCE_WIDTH)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// Derive the next work number given the greatest number already in the bucket.
///
/// Fails with `Conflict` once the month has used all 999 sequences, and with
/// `Internal` if the stored maximum is not a well-formed work number.
pub fn next_work_no(latest_in_bucket: Option<&str>, date: NaiveDate) -> Result<String, CoreError> {
    let suffix = month_suffix(date);

    let next_seq = match latest_in_bucket {
        None => 1,
        Some(latest) => {
            let seq = parse_sequence(latest).ok_or_else(|| {
                CoreError::Internal(format!("Malformed work number in store: '{latest}'"))
            })?;
            seq + 1
        }
    };

    if next_seq > MAX_SEQUENCE {
        return Err(CoreError::Conflict(format!(
            "Work number sequence exhausted for month bucket {suffix}"
        )));
    }

    Ok(format!("{next_seq:03}{suffix}"))
}
