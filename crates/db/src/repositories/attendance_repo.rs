//! Repository for the `attendance` table.

use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use crate::models::attendance::Attendance;

/// Column list for `attendance` queries.
const COLUMNS: &str = "id, staff_name, work_date, time_in, time_out, note";

/// Check-in/out bookkeeping, one row per staff member and work day.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Record a check-in, overwriting `time_in` when the day's row already exists.
    pub async fn check_in(
        pool: &SqlitePool,
        staff_name: &str,
        work_date: NaiveDate,
        time_in: NaiveTime,
    ) -> Result<Attendance, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE attendance SET time_in = ?3 \
             WHERE staff_name = ?1 AND work_date = ?2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Attendance>(&update)
            .bind(staff_name)
            .bind(work_date)
            .bind(time_in)
            .fetch_all(&mut *tx)
            .await?;

        let row = match updated.into_iter().next() {
            Some(row) => row,
            None => {
                let insert = format!(
                    "INSERT INTO attendance (staff_name, work_date, time_in) \
                     VALUES (?1, ?2, ?3) \
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, Attendance>(&insert)
                    .bind(staff_name)
                    .bind(work_date)
                    .bind(time_in)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(row)
    }

    /// Record a check-out on the day's row. Returns `None` when there was no check-in.
    pub async fn check_out(
        pool: &SqlitePool,
        staff_name: &str,
        work_date: NaiveDate,
        time_out: NaiveTime,
    ) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance SET time_out = ?3 \
             WHERE staff_name = ?1 AND work_date = ?2 \
             RETURNING {COLUMNS}"
        );
        let rows = sqlx::query_as::<_, Attendance>(&query)
            .bind(staff_name)
            .bind(work_date)
            .bind(time_out)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Rows dated in `[first, next)`, newest day first, then by staff name.
    pub async fn list_for_month(
        pool: &SqlitePool,
        staff_name: Option<&str>,
        first: NaiveDate,
        next: NaiveDate,
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        let staff_clause = if staff_name.is_some() {
            "AND staff_name = ?3"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM attendance \
             WHERE work_date >= ?1 AND work_date < ?2 {staff_clause} \
             ORDER BY work_date DESC, staff_name ASC, id ASC"
        );
        let mut q = sqlx::query_as::<_, Attendance>(&query)
            .bind(first)
            .bind(next);
        if let Some(name) = staff_name {
            q = q.bind(name);
        }
        q.fetch_all(pool).await
    }
}
