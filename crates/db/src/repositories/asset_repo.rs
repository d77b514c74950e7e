//! Repository for the `assets` table.

use sqlx::SqlitePool;

use helpdesk_core::asset::{self as rules, STATUS_IN_USE, STATUS_UNVERIFIED};
use helpdesk_core::search;
use helpdesk_core::types::DbId;

use crate::is_constraint_violation;
use crate::models::asset::{Asset, AssetFields, ImportOutcome};

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, asset_no, asset_type, asset_model, serial_no, mac_address, \
    hostname, owner_name, position, department, status, note";

/// Provides CRUD, listing and bulk operations for inventory assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert an asset, returning the full row.
    pub async fn create(pool: &SqlitePool, fields: &AssetFields) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets \
                (asset_no, asset_type, asset_model, serial_no, mac_address, \
                 hostname, owner_name, position, department, status, note) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&fields.asset_no)
            .bind(&fields.asset_type)
            .bind(&fields.asset_model)
            .bind(&fields.serial_no)
            .bind(&fields.mac_address)
            .bind(&fields.hostname)
            .bind(&fields.owner_name)
            .bind(&fields.position)
            .bind(&fields.department)
            .bind(&fields.status)
            .bind(&fields.note)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = ?1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an asset by its exact asset number.
    pub async fn find_by_asset_no(
        pool: &SqlitePool,
        asset_no: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE asset_no = ?1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_no)
            .fetch_optional(pool)
            .await
    }

    /// Replace every mutable column. Returns `None` if the asset does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        fields: &AssetFields,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                asset_no = ?2, asset_type = ?3, asset_model = ?4, serial_no = ?5, \
                mac_address = ?6, hostname = ?7, owner_name = ?8, position = ?9, \
                department = ?10, status = ?11, note = ?12 \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&fields.asset_no)
            .bind(&fields.asset_type)
            .bind(&fields.asset_model)
            .bind(&fields.serial_no)
            .bind(&fields.mac_address)
            .bind(&fields.hostname)
            .bind(&fields.owner_name)
            .bind(&fields.position)
            .bind(&fields.department)
            .bind(&fields.status)
            .bind(&fields.note)
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assets filtered by department and status, in inventory order.
    ///
    /// The order (type priority, then asset-number segment lengths, then id)
    /// is applied in Rust since it does not map onto a collation.
    pub async fn list(
        pool: &SqlitePool,
        department: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if department.is_some() {
            conditions.push(format!("department = ?{param_idx}"));
            param_idx += 1;
        }
        if status.is_some() {
            conditions.push(format!("status = ?{param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT {COLUMNS} FROM assets {where_clause}");
        let mut q = sqlx::query_as::<_, Asset>(&query);
        if let Some(d) = department {
            q = q.bind(d);
        }
        if let Some(s) = status {
            q = q.bind(s);
        }

        let mut assets = q.fetch_all(pool).await?;
        assets.sort_by(|a, b| {
            rules::compare_listing(
                (a.asset_type.as_str(), a.asset_no.as_str(), a.id),
                (b.asset_type.as_str(), b.asset_no.as_str(), b.id),
            )
        });
        Ok(assets)
    }

    /// Mark every in-use asset as unverified. Returns the number changed.
    pub async fn reset_status(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE assets SET status = ?1 WHERE status = ?2")
            .bind(STATUS_UNVERIFIED)
            .bind(STATUS_IN_USE)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Insert each row independently inside one transaction.
    ///
    /// Rows that violate a constraint (e.g. duplicate asset number) and rows
    /// without an asset number are skipped and counted. Any other error
    /// aborts the whole import.
    pub async fn import(
        pool: &SqlitePool,
        rows: &[Option<AssetFields>],
    ) -> Result<ImportOutcome, sqlx::Error> {
        let insert = "INSERT INTO assets \
                (asset_no, asset_type, asset_model, serial_no, mac_address, \
                 hostname, owner_name, position, department, status, note) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

        let mut outcome = ImportOutcome::default();
        let mut tx = pool.begin().await?;

        for fields in rows {
            let Some(fields) = fields else {
                outcome.skipped += 1;
                continue;
            };
            let result = sqlx::query(insert)
                .bind(&fields.asset_no)
                .bind(&fields.asset_type)
                .bind(&fields.asset_model)
                .bind(&fields.serial_no)
                .bind(&fields.mac_address)
                .bind(&fields.hostname)
                .bind(&fields.owner_name)
                .bind(&fields.position)
                .bind(&fields.department)
                .bind(&fields.status)
                .bind(&fields.note)
                .execute(&mut *tx)
                .await;
            match result {
                Ok(_) => outcome.imported += 1,
                Err(e) if is_constraint_violation(&e) => {
                    tracing::debug!(asset_no = %fields.asset_no, error = %e, "Import row skipped");
                    outcome.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }

    /// `(department, asset_type)` per asset, optionally restricted to asset
    /// numbers containing `q`.
    pub async fn type_pairs(
        pool: &SqlitePool,
        q: Option<&str>,
    ) -> Result<Vec<(String, String)>, sqlx::Error> {
        match q {
            Some(term) => {
                sqlx::query_as("SELECT department, asset_type FROM assets WHERE asset_no LIKE ?1")
                    .bind(search::like_term(term))
                    .fetch_all(pool)
                    .await
            }
            None => {
                sqlx::query_as("SELECT department, asset_type FROM assets")
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
