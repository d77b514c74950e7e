//! Repository for the `reports` (ticket) table.

use sqlx::SqlitePool;

use helpdesk_core::report::{ReceiveWindow, REPORT_PAGE_SIZE};
use helpdesk_core::search;
use helpdesk_core::types::{DbId, Timestamp};

use crate::models::report::{Report, ReportFields, ReportFilter, ReportPage};

/// Column list for `reports` queries.
const COLUMNS: &str = "\
    id, work_no, receive_datetime, department, reporter, job_type, \
    asset_no, problem, solution, completed_datetime, close_note, \
    confirm_name, signature, created_at";

/// Columns matched by free-text search tokens.
const SEARCH_COLUMNS: [&str; 7] = [
    "work_no",
    "department",
    "reporter",
    "job_type",
    "asset_no",
    "problem",
    "solution",
];

/// Provides CRUD, listing and aggregate queries for tickets.
pub struct ReportRepo;

impl ReportRepo {
    /// Highest work number ending with `suffix` (`MMYY`), if any.
    pub async fn latest_in_bucket(
        pool: &SqlitePool,
        suffix: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT work_no FROM reports WHERE work_no LIKE ?1 ORDER BY work_no DESC LIMIT 1",
        )
        .bind(helpdesk_core::work_no::bucket_pattern(suffix))
        .fetch_optional(pool)
        .await
    }

    /// Insert a ticket, returning the full row.
    ///
    /// `signature` is the basename of an already stored PNG.
    pub async fn create(
        pool: &SqlitePool,
        work_no: &str,
        fields: &ReportFields,
        signature: Option<&str>,
        created_at: Timestamp,
    ) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports \
                (work_no, receive_datetime, department, reporter, job_type, \
                 asset_no, problem, solution, completed_datetime, close_note, \
                 confirm_name, signature, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(work_no)
            .bind(fields.receive_datetime)
            .bind(&fields.department)
            .bind(&fields.reporter)
            .bind(&fields.job_type)
            .bind(&fields.asset_no)
            .bind(&fields.problem)
            .bind(&fields.solution)
            .bind(fields.completed_datetime)
            .bind(&fields.close_note)
            .bind(&fields.confirm_name)
            .bind(signature)
            .bind(created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = ?1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the mutable fields of a ticket.
    ///
    /// `work_no`, `signature` and `created_at` are never touched. Returns
    /// `None` if the ticket does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        fields: &ReportFields,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "UPDATE reports SET \
                receive_datetime = ?2, department = ?3, reporter = ?4, job_type = ?5, \
                asset_no = ?6, problem = ?7, solution = ?8, completed_datetime = ?9, \
                close_note = ?10, confirm_name = ?11 \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(fields.receive_datetime)
            .bind(&fields.department)
            .bind(&fields.reporter)
            .bind(&fields.job_type)
            .bind(&fields.asset_no)
            .bind(&fields.problem)
            .bind(&fields.solution)
            .bind(fields.completed_datetime)
            .bind(&fields.close_note)
            .bind(&fields.confirm_name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a ticket, returning the removed row so its signature file can be cleaned up.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("DELETE FROM reports WHERE id = ?1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Duplicate a ticket under a new work number and creation time.
    ///
    /// The copy never carries a signature. Returns `None` if the source
    /// ticket does not exist.
    pub async fn copy(
        pool: &SqlitePool,
        id: DbId,
        work_no: &str,
        created_at: Timestamp,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports \
                (work_no, receive_datetime, department, reporter, job_type, \
                 asset_no, problem, solution, completed_datetime, close_note, \
                 confirm_name, signature, created_at) \
             SELECT ?2, receive_datetime, department, reporter, job_type, \
                 asset_no, problem, solution, completed_datetime, close_note, \
                 confirm_name, NULL, ?3 \
             FROM reports WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(work_no)
            .bind(created_at)
            .fetch_optional(pool)
            .await
    }

    /// One page of tickets matching `filter`, newest receive time first.
    ///
    /// The requested page is clamped into `[1, total_pages]`.
    pub async fn list(
        pool: &SqlitePool,
        filter: &ReportFilter,
        page: Option<i64>,
    ) -> Result<ReportPage, sqlx::Error> {
        // ?1 and ?2 are the window bounds; optional filters follow.
        let mut conditions = vec![
            "receive_datetime >= ?1".to_string(),
            "receive_datetime < ?2".to_string(),
        ];
        let mut param_idx: usize = 3;

        for _ in &filter.tokens {
            let any_column = SEARCH_COLUMNS
                .iter()
                .map(|col| format!("{col} LIKE ?{param_idx}"))
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({any_column})"));
            param_idx += 1;
        }
        if filter.job_type.is_some() {
            conditions.push(format!("job_type = ?{param_idx}"));
            param_idx += 1;
        }
        if filter.staff.is_some() {
            conditions.push(format!("confirm_name = ?{param_idx}"));
            param_idx += 1;
        }
        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_query = format!("SELECT COUNT(*) FROM reports {where_clause}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(filter.window.start)
            .bind(filter.window.end);
        for token in &filter.tokens {
            count_q = count_q.bind(search::like_term(token));
        }
        if let Some(job_type) = &filter.job_type {
            count_q = count_q.bind(job_type);
        }
        if let Some(staff) = &filter.staff {
            count_q = count_q.bind(staff);
        }
        let total = count_q.fetch_one(pool).await?;

        let total_pages = search::total_pages(total, REPORT_PAGE_SIZE);
        let page = search::clamp_page(page, total_pages);

        let query = format!(
            "SELECT {COLUMNS} FROM reports {where_clause} \
             ORDER BY receive_datetime DESC, id DESC \
             LIMIT ?{param_idx} OFFSET ?{}",
            param_idx + 1
        );
        let mut q = sqlx::query_as::<_, Report>(&query)
            .bind(filter.window.start)
            .bind(filter.window.end);
        for token in &filter.tokens {
            q = q.bind(search::like_term(token));
        }
        if let Some(job_type) = &filter.job_type {
            q = q.bind(job_type);
        }
        if let Some(staff) = &filter.staff {
            q = q.bind(staff);
        }
        let items = q
            .bind(REPORT_PAGE_SIZE)
            .bind(search::page_offset(page, REPORT_PAGE_SIZE))
            .fetch_all(pool)
            .await?;

        Ok(ReportPage {
            items,
            page,
            total_pages,
            total,
        })
    }

    /// `(department, job_type, count)` groups for tickets received inside `window`.
    pub async fn group_counts(
        pool: &SqlitePool,
        window: &ReceiveWindow,
    ) -> Result<Vec<(Option<String>, Option<String>, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT department, job_type, COUNT(*) FROM reports \
             WHERE receive_datetime >= ?1 AND receive_datetime < ?2 \
             GROUP BY department, job_type",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await
    }

    /// `(confirm_name, job_type, count)` groups for two staff members inside `window`.
    pub async fn staff_counts(
        pool: &SqlitePool,
        window: &ReceiveWindow,
        person1: &str,
        person2: &str,
    ) -> Result<Vec<(String, String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT confirm_name, job_type, COUNT(*) FROM reports \
             WHERE confirm_name IN (?1, ?2) \
               AND receive_datetime >= ?3 AND receive_datetime < ?4 \
             GROUP BY confirm_name, job_type",
        )
        .bind(person1)
        .bind(person2)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await
    }

    /// Every ticket received inside `window`, oldest first, for the ticket log.
    pub async fn log_for_window(
        pool: &SqlitePool,
        window: &ReceiveWindow,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports \
             WHERE receive_datetime >= ?1 AND receive_datetime < ?2 \
             ORDER BY receive_datetime ASC, id ASC"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(pool)
            .await
    }
}
