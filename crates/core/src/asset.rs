//! Asset inventory rules: status markers, type ordering, asset-number
//! collation and the summary aggregations.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status markers
// ---------------------------------------------------------------------------

/// Asset is in use. Default status for new and imported assets.
pub const STATUS_IN_USE: &str = "ใช้งาน";
/// Asset has not been checked in the current inspection cycle.
pub const STATUS_UNVERIFIED: &str = "ยังไม่ได้ตรวจสอบ";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

pub const TYPE_COMPUTER: &str = "Computer";
pub const TYPE_NOTEBOOK: &str = "Notebook";
pub const TYPE_PRINTER: &str = "Printer";
pub const TYPE_SCANNER: &str = "Scanner";
pub const TYPE_TABLET: &str = "Tablet";
pub const TYPE_UPS: &str = "UPS";
pub const TYPE_DISPLAY: &str = "Display";
/// Thai label for public displays, used by older records.
pub const TYPE_DISPLAY_TH: &str = "จอประชาสัมพันธ์";

/// Types with a fixed position in listings and a column in the summary table.
pub const ORDERED_TYPES: [&str; 7] = [
    TYPE_COMPUTER,
    TYPE_NOTEBOOK,
    TYPE_PRINTER,
    TYPE_SCANNER,
    TYPE_TABLET,
    TYPE_UPS,
    TYPE_DISPLAY,
];

/// Priority used for anything outside [`ORDERED_TYPES`].
pub const OTHER_TYPE_PRIORITY: u8 = 99;

/// Index of `asset_type` in [`ORDERED_TYPES`].
pub fn type_index(asset_type: &str) -> Option<usize> {
    if asset_type == TYPE_DISPLAY_TH {
        return Some(ORDERED_TYPES.len() - 1);
    }
    ORDERED_TYPES.iter().position(|t| *t == asset_type)
}

/// Listing priority: Computer = 1 ... Display = 7, everything else last.
pub fn type_priority(asset_type: &str) -> u8 {
    type_index(asset_type)
        .and_then(|i| u8::try_from(i + 1).ok())
        .unwrap_or(OTHER_TYPE_PRIORITY)
}

// ---------------------------------------------------------------------------
// Asset-number collation
// ---------------------------------------------------------------------------

/// Length-based ordering key for an asset number.
///
/// Asset numbers look like `III/OOO`, where runs of `I` and `O` pad the two
/// segments. The key is `(len(after '/' without 'O'), len(before '/' without
/// 'I'))`, counted in characters. Without a `/` the "before" segment is empty
/// and the "after" segment is the whole number. This approximates numeric
/// order without parsing; equal lengths tie regardless of digit values.
pub fn asset_no_key(asset_no: &str) -> (usize, usize) {
    let (before, after) = match asset_no.split_once('/') {
        Some((before, after)) => (before, after),
        None => ("", asset_no),
    };
    let after_len = after.chars().filter(|c| *c != 'O').count();
    let before_len = before.chars().filter(|c| *c != 'I').count();
    (after_len, before_len)
}

/// Full listing key: type priority, then the asset-number key.
pub fn sort_key(asset_type: &str, asset_no: &str) -> (u8, usize, usize) {
    let (after, before) = asset_no_key(asset_no);
    (type_priority(asset_type), after, before)
}

/// Compare two assets for listing; `id` breaks ties so the order is total.
pub fn compare_listing(
    a: (&str, &str, i64),
    b: (&str, &str, i64),
) -> Ordering {
    sort_key(a.0, a.1)
        .cmp(&sort_key(b.0, b.1))
        .then(a.2.cmp(&b.2))
}

// ---------------------------------------------------------------------------
// Field normalisation
// ---------------------------------------------------------------------------

/// Trim and require an asset number.
pub fn normalize_asset_no(asset_no: &str) -> Result<String, CoreError> {
    let trimmed = asset_no.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("asset_no is required".into()));
    }
    Ok(trimmed.to_string())
}

/// Status to store: the given one when non-blank, otherwise in-use.
pub fn status_or_default(status: Option<&str>) -> String {
    status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(STATUS_IN_USE)
        .to_string()
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Per-department counts for one department.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DepartmentAssetCounts {
    pub items: BTreeMap<String, i64>,
    pub total: i64,
}

/// Department × asset type counts with per-type and grand totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetSummary {
    pub types: Vec<String>,
    pub departments: BTreeMap<String, DepartmentAssetCounts>,
    pub type_total: BTreeMap<String, i64>,
    pub grand_total: i64,
}

/// Aggregate `(department, asset_type)` pairs, one per asset.
pub fn summarize<I>(rows: I) -> AssetSummary
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut summary = AssetSummary::default();
    let mut types = BTreeSet::new();

    for (department, asset_type) in rows {
        let dept = summary.departments.entry(department).or_default();
        *dept.items.entry(asset_type.clone()).or_default() += 1;
        dept.total += 1;

        *summary.type_total.entry(asset_type.clone()).or_default() += 1;
        summary.grand_total += 1;
        types.insert(asset_type);
    }

    summary.types = types.into_iter().collect();
    summary
}

/// One line of the fixed-column summary table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTableRow {
    pub department: String,
    /// Counts in [`ORDERED_TYPES`] order.
    pub counts: [i64; 7],
    /// All assets of the department, including types without a column.
    pub total: i64,
}

/// Build the per-department summary table and its totals row.
///
/// Departments are sorted by code.
pub fn summary_table<I>(rows: I) -> (Vec<SummaryTableRow>, SummaryTableRow)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut by_dept: BTreeMap<String, SummaryTableRow> = BTreeMap::new();
    let mut totals = SummaryTableRow::default();

    for (department, asset_type) in rows {
        let row = by_dept
            .entry(department.clone())
            .or_insert_with(|| SummaryTableRow {
                department,
                ..SummaryTableRow::default()
            });
        if let Some(i) = type_index(&asset_type) {
            row.counts[i] += 1;
            totals.counts[i] += 1;
        }
        row.total += 1;
        totals.total += 1;
    }

    (by_dept.into_values().collect(), totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_priorities_follow_fixed_order() {
        assert_eq!(type_priority("Computer"), 1);
        assert_eq!(type_priority("Printer"), 3);
        assert_eq!(type_priority("Display"), 7);
        assert_eq!(type_priority(TYPE_DISPLAY_TH), 7);
        assert_eq!(type_priority("Router"), OTHER_TYPE_PRIORITY);
        assert!(type_priority("UPS") < type_priority("Router"));
    }

    #[test]
    fn asset_no_key_strips_marker_letters() {
        assert_eq!(asset_no_key("III1/OO12"), (2, 1));
        assert_eq!(asset_no_key("7440-001/65"), (2, 8));
        assert_eq!(asset_no_key("no-slash"), (8, 0));
    }

    #[test]
    fn asset_no_key_counts_characters_not_bytes() {
        assert_eq!(asset_no_key("ก/ขค"), (2, 1));
    }

    #[test]
    fn key_is_length_based_not_numeric() {
        // Same stripped lengths tie even though the digits differ.
        assert_eq!(asset_no_key("1/9"), asset_no_key("1/1"));
        assert!(asset_no_key("1/10") > asset_no_key("1/9"));
    }

    #[test]
    fn computers_sort_before_printers() {
        let mut rows = vec![
            ("Printer", "A/1", 1_i64),
            ("Computer", "A/12345", 2),
            ("Computer", "A/1", 3),
        ];
        rows.sort_by(|a, b| compare_listing(*a, *b));
        assert_eq!(rows.iter().map(|r| r.2).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn ties_fall_back_to_id() {
        let mut rows = vec![("Scanner", "X/1", 9_i64), ("Scanner", "Y/2", 4)];
        rows.sort_by(|a, b| compare_listing(*a, *b));
        assert_eq!(rows[0].2, 4);
    }

    #[test]
    fn status_defaults_to_in_use() {
        assert_eq!(status_or_default(None), STATUS_IN_USE);
        assert_eq!(status_or_default(Some("  ")), STATUS_IN_USE);
        assert_eq!(status_or_default(Some("ชำรุด")), "ชำรุด");
    }

    #[test]
    fn asset_no_is_required() {
        assert!(normalize_asset_no("   ").is_err());
        assert_eq!(normalize_asset_no(" 7440/1 ").unwrap(), "7440/1");
    }

    #[test]
    fn summary_counts_by_department_and_type() {
        let s = summarize(vec![
            ("ศพท.".to_string(), "Computer".to_string()),
            ("ศพท.".to_string(), "Computer".to_string()),
            ("กกม.".to_string(), "Printer".to_string()),
        ]);
        assert_eq!(s.types, vec!["Computer".to_string(), "Printer".to_string()]);
        assert_eq!(s.departments["ศพท."].items["Computer"], 2);
        assert_eq!(s.departments["ศพท."].total, 2);
        assert_eq!(s.type_total["Printer"], 1);
        assert_eq!(s.grand_total, 3);
    }

    #[test]
    fn summary_table_has_fixed_columns_and_totals() {
        let (rows, totals) = summary_table(vec![
            ("กกม.".to_string(), "Computer".to_string()),
            ("กกม.".to_string(), "Router".to_string()),
            ("ศพท.".to_string(), TYPE_DISPLAY_TH.to_string()),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].department, "กกม.");
        assert_eq!(rows[0].counts, [1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[1].counts[6], 1);
        assert_eq!(totals.total, 3);
        assert_eq!(totals.counts[0], 1);
    }
}
