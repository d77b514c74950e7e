//! Repository for the `departments` directory.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::models::department::Department;

/// Column list for `departments` queries.
const COLUMNS: &str = "id, short_code, full_name, active";

/// Read access to the department directory. Rows are seeded by migration.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// Active departments ordered by short code.
    pub async fn list_active(pool: &SqlitePool) -> Result<Vec<Department>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM departments WHERE active = 1 ORDER BY short_code");
        sqlx::query_as::<_, Department>(&query).fetch_all(pool).await
    }

    /// Find a department (active or not) by short code.
    pub async fn find_by_short_code(
        pool: &SqlitePool,
        code: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE short_code = ?1");
        sqlx::query_as::<_, Department>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Find a department (active or not) by full name.
    pub async fn find_by_full_name(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE full_name = ?1 LIMIT 1");
        sqlx::query_as::<_, Department>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Whether `code` is an active short code.
    pub async fn is_active_code(pool: &SqlitePool, code: &str) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM departments WHERE short_code = ?1 AND active = 1",
        )
        .bind(code)
        .fetch_optional(pool)
        .await?;
        Ok(found.is_some())
    }

    /// Resolve an active department given either its short code or its full name.
    pub async fn resolve(
        pool: &SqlitePool,
        code_or_name: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM departments \
             WHERE active = 1 AND (short_code = ?1 OR full_name = ?1) \
             ORDER BY short_code = ?1 DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(code_or_name)
            .fetch_optional(pool)
            .await
    }

    /// Short code to full name for every directory entry, used to label exports.
    pub async fn directory_map(pool: &SqlitePool) -> Result<HashMap<String, String>, sqlx::Error> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT short_code, full_name FROM departments")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }
}
