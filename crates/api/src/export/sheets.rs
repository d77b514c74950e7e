//! Printable worksheets for the export endpoints.
//!
//! Each builder lays out one sheet from already-queried rows; the handlers
//! own the database access and the HTTP response.

use std::collections::HashMap;

use chrono::{Datelike, NaiveTime};

use helpdesk_core::asset::{SummaryTableRow, ORDERED_TYPES, TYPE_DISPLAY, TYPE_DISPLAY_TH};
use helpdesk_core::department;
use helpdesk_core::report::{MonthlySummary, SUMMARY_JOB_TYPES};
use helpdesk_core::thai_date;
use helpdesk_db::models::asset::Asset;
use helpdesk_db::models::attendance::Attendance;
use helpdesk_db::models::report::Report;

use super::xlsx::{Style, Workbook};

/// Organisation name printed under attendance sheet titles.
pub const ORGANISATION_NAME: &str = "กรมคุ้มครองสิทธิและเสรีภาพ";

/// Title of the asset inventory when no department filter is applied.
pub const ALL_ASSETS_TITLE: &str = "รายการครุภัณฑ์ทั้งหมด";

/// Label of totals rows.
pub const GRAND_TOTAL_LABEL: &str = "รวมทั้งหมด";

/// Pixel size of the staff signature drawn on each worked day.
const SIGNATURE_WIDTH_PX: u32 = 160;
const SIGNATURE_HEIGHT_PX: u32 = 16;

fn hh_mm(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Attendance month sheet
// ---------------------------------------------------------------------------

/// First row of the day table header on the attendance sheet.
pub const ATTENDANCE_HEADER_ROW: u32 = 6;

/// One row per day of the month with check-in/out times.
///
/// The staff signature, when available, is drawn on every day that has a
/// time in or a time out.
pub fn attendance_month(
    staff_name: &str,
    year: i32,
    month: u32,
    days_in_month: u32,
    rows: &[Attendance],
    signature_png: Option<Vec<u8>>,
) -> Workbook {
    let mut wb = Workbook::new("ใบลงเวลา");

    wb.merge(1, 1, 1, 5);
    wb.text(1, 1, "ใบลงเวลาปฏิบัติงานของเจ้าหน้าที่ประจำหน่วยงาน", Style::Title);
    wb.merge(2, 1, 2, 5);
    wb.text(2, 1, ORGANISATION_NAME, Style::Centered);
    wb.merge(3, 1, 3, 5);
    wb.text(
        3,
        1,
        format!("ประจำเดือน {}", thai_date::month_year(year, month)),
        Style::Centered,
    );
    wb.merge(4, 2, 4, 5);
    wb.text(4, 2, format!("ชื่อเจ้าหน้าที่ : {staff_name}"), Style::Normal);
    wb.row_height(1, 26.0);
    wb.row_height(2, 22.0);
    wb.row_height(3, 20.0);
    wb.row_height(4, 20.0);

    let header_row = ATTENDANCE_HEADER_ROW;
    wb.text_row(
        header_row,
        1,
        &["วันที่", "เวลาเข้า", "เวลาออก", "ลายมือชื่อ", "หมายเหตุ"],
        Style::Header,
    );
    wb.row_height(header_row, 22.0);
    for (col, width) in [(1, 6.0), (2, 12.0), (3, 12.0), (4, 22.0), (5, 22.0)] {
        wb.column_width(col, width);
    }

    let by_day: HashMap<u32, &Attendance> =
        rows.iter().map(|r| (r.work_date.day(), r)).collect();
    let signature = signature_png.map(|png| wb.add_png(png));

    for day in 1..=days_in_month {
        let row = header_row + day;
        wb.number(row, 1, i64::from(day), Style::Cell);

        let record = by_day.get(&day);
        let time_in = record.and_then(|r| r.time_in);
        let time_out = record.and_then(|r| r.time_out);
        wb.text(row, 2, hh_mm(time_in), Style::Cell);
        wb.text(row, 3, hh_mm(time_out), Style::Cell);
        wb.text(row, 4, "", Style::Cell);
        wb.text(
            row,
            5,
            record.and_then(|r| r.note.clone()).unwrap_or_default(),
            Style::Cell,
        );

        if let Some(sig) = signature {
            if time_in.is_some() || time_out.is_some() {
                wb.place_image(sig, row, 4, SIGNATURE_WIDTH_PX, SIGNATURE_HEIGHT_PX);
            }
        }
    }

    let sign_row = header_row + days_in_month + 2;
    wb.merge(sign_row, 2, sign_row, 5);
    wb.text(
        sign_row,
        2,
        "ลายเซ็นเจ้าหน้าที่ .............................................................",
        Style::Centered,
    );
    wb.row_height(sign_row, 24.0);
    wb.merge(sign_row + 1, 2, sign_row + 1, 5);
    wb.text(
        sign_row + 1,
        2,
        format!("( {staff_name} )"),
        Style::Centered,
    );

    wb
}

// ---------------------------------------------------------------------------
// Ticket log
// ---------------------------------------------------------------------------

/// Tickets in receive order, one per row, with Thai dates.
pub fn ticket_log(reports: &[Report]) -> Workbook {
    let mut wb = Workbook::new("รายงานแจ้งปัญหา");

    wb.text_row(
        1,
        1,
        &[
            "ลำดับ",
            "วันที่",
            "เวลา",
            "เลขครุภัณฑ์",
            "หน่วยงาน",
            "ผู้แจ้ง",
            "ประเภทงาน",
            "ปัญหา",
            "วิธีแก้ไข",
        ],
        Style::Header,
    );
    wb.row_height(1, 28.0);

    for (idx, report) in reports.iter().enumerate() {
        let row = idx as u32 + 2;
        let (date, time) = match report.receive_datetime {
            Some(at) => (
                thai_date::long_date(at.date()),
                at.format("%H:%M").to_string(),
            ),
            None => (String::new(), String::new()),
        };
        wb.number(row, 1, idx as i64 + 1, Style::Cell);
        wb.text(row, 2, date, Style::Cell);
        wb.text(row, 3, time, Style::Cell);
        wb.text(row, 4, report.asset_no.clone().unwrap_or_default(), Style::Cell);
        wb.text(row, 5, report.department.as_str(), Style::Cell);
        wb.text(row, 6, report.reporter.as_str(), Style::Cell);
        wb.text(row, 7, report.job_type.as_str(), Style::Cell);
        wb.text(row, 8, report.problem.clone().unwrap_or_default(), Style::Cell);
        wb.text(row, 9, report.solution.clone().unwrap_or_default(), Style::Cell);
        wb.row_height(row, 28.0);
    }

    for (col, width) in [
        (1, 8.0),
        (2, 20.0),
        (3, 10.0),
        (4, 20.0),
        (5, 14.0),
        (6, 18.0),
        (7, 14.0),
        (8, 40.0),
        (9, 40.0),
    ] {
        wb.column_width(col, width);
    }

    wb
}

// ---------------------------------------------------------------------------
// Monthly ticket summary
// ---------------------------------------------------------------------------

/// Department by job type counts for one month, with a totals row.
pub fn monthly_summary(year: i32, month: u32, summary: &MonthlySummary) -> Workbook {
    let mut wb = Workbook::new("Monthly Summary");
    let last_col = 3 + SUMMARY_JOB_TYPES.len() as u32;

    wb.merge(1, 1, 1, last_col);
    wb.text(1, 1, "ตารางสรุปงานรายเดือน", Style::Title);
    wb.row_height(1, 34.0);
    wb.merge(2, 1, 2, last_col);
    wb.text(
        2,
        1,
        format!("ประจำเดือน {}", thai_date::month_year(year, month)),
        Style::Centered,
    );
    wb.row_height(2, 26.0);

    let mut headers = vec!["ลำดับ", "หน่วยงาน"];
    headers.extend(SUMMARY_JOB_TYPES);
    headers.push("รวม");
    wb.text_row(3, 1, &headers, Style::Header);
    wb.row_height(3, 30.0);

    let mut row = 4;
    for (idx, (dept, counts)) in summary.departments.iter().enumerate() {
        wb.number(row, 1, idx as i64 + 1, Style::Cell);
        wb.text(row, 2, dept.as_str(), Style::Cell);
        for (i, count) in counts.as_array().iter().enumerate() {
            wb.number(row, 3 + i as u32, *count, Style::Cell);
        }
        wb.number(row, last_col, counts.total, Style::Cell);
        wb.row_height(row, 26.0);
        row += 1;
    }

    wb.text(row, 1, "", Style::Total);
    wb.text(row, 2, GRAND_TOTAL_LABEL, Style::Total);
    for (i, count) in summary.grand_total.as_array().iter().enumerate() {
        wb.number(row, 3 + i as u32, *count, Style::Total);
    }
    wb.number(row, last_col, summary.grand_total.total, Style::Total);

    wb.column_width(1, 8.0);
    wb.column_width(2, 24.0);
    for col in 3..=last_col {
        wb.column_width(col, 12.0);
    }

    wb
}

// ---------------------------------------------------------------------------
// Asset inventory
// ---------------------------------------------------------------------------

/// Inventory list (already in listing order) under a department title.
pub fn asset_inventory(
    department_filter: Option<&str>,
    directory: &HashMap<String, String>,
    assets: &[Asset],
) -> Workbook {
    let mut wb = Workbook::new("รายการครุภัณฑ์");
    let title = match department_filter {
        Some(code) => department::display_name(code, directory),
        None => ALL_ASSETS_TITLE,
    };

    wb.merge(1, 1, 1, 9);
    wb.text(1, 1, title, Style::Title);
    wb.row_height(1, 28.0);
    wb.row_height(2, 16.0);

    wb.text_row(
        3,
        1,
        &[
            "ลำดับ",
            "เลขครุภัณฑ์",
            "ประเภท",
            "รุ่น",
            "Serial",
            "ชื่อเครื่อง",
            "ผู้ครอบครอง",
            "หน่วยงาน",
            "ตำแหน่ง",
        ],
        Style::Header,
    );
    wb.row_height(3, 24.0);

    for (idx, asset) in assets.iter().enumerate() {
        let row = idx as u32 + 4;
        wb.number(row, 1, idx as i64 + 1, Style::Cell);
        wb.text(row, 2, asset.asset_no.as_str(), Style::Cell);
        wb.text(row, 3, asset.asset_type.as_str(), Style::Cell);
        for (col, value) in [
            (4, &asset.asset_model),
            (5, &asset.serial_no),
            (6, &asset.hostname),
            (7, &asset.owner_name),
        ] {
            wb.text(row, col, value.clone().unwrap_or_default(), Style::Cell);
        }
        wb.text(row, 8, asset.department.as_str(), Style::Cell);
        wb.text(row, 9, asset.position.clone().unwrap_or_default(), Style::Cell);
        wb.row_height(row, 20.0);
    }

    let sign_row = assets.len() as u32 + 3 + 3;
    wb.merge(sign_row, 1, sign_row, 9);
    wb.text(
        sign_row,
        1,
        "ลายเซ็นผู้ตรวจสอบ .............................................................",
        Style::Normal,
    );
    wb.row_height(sign_row, 26.0);

    for (col, width) in [6.0, 20.0, 12.0, 18.0, 16.0, 18.0, 20.0, 10.0, 14.0]
        .into_iter()
        .enumerate()
    {
        wb.column_width(col as u32 + 1, width);
    }

    wb
}

// ---------------------------------------------------------------------------
// Asset summary table
// ---------------------------------------------------------------------------

/// Fixed-column department summary with a totals row.
pub fn asset_summary_table(rows: &[SummaryTableRow], totals: &SummaryTableRow) -> Workbook {
    let mut wb = Workbook::new("ตารางสรุปครุภัณฑ์");
    let total_col = ORDERED_TYPES.len() as u32 + 2;

    let mut headers = vec!["หน่วยงาน"];
    // The display column is labelled in Thai on printed sheets.
    headers.extend(
        ORDERED_TYPES
            .iter()
            .map(|&t| if t == TYPE_DISPLAY { TYPE_DISPLAY_TH } else { t }),
    );
    headers.push("รวม");
    wb.text_row(1, 1, &headers, Style::Header);

    for (idx, line) in rows.iter().enumerate() {
        summary_line(&mut wb, idx as u32 + 2, line, &line.department, Style::Cell);
    }
    summary_line(
        &mut wb,
        rows.len() as u32 + 2,
        totals,
        GRAND_TOTAL_LABEL,
        Style::Total,
    );
    wb.row_height(1, 20.0);

    wb.column_width(1, 12.0);
    for col in 2..total_col {
        wb.column_width(col, 9.0);
    }
    wb.column_width(total_col - 1, 14.0);
    wb.column_width(total_col, 9.0);

    wb
}

fn summary_line(wb: &mut Workbook, row: u32, line: &SummaryTableRow, label: &str, style: Style) {
    let total_col = ORDERED_TYPES.len() as u32 + 2;
    wb.text(row, 1, label, style);
    for (i, count) in line.counts.iter().enumerate() {
        wb.number(row, 2 + i as u32, *count, style);
    }
    wb.number(row, total_col, line.total, style);
    wb.row_height(row, 20.0);
}
