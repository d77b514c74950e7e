//! Department directory entity.

use serde::Serialize;
use sqlx::FromRow;
use helpdesk_core::types::DbId;

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub short_code: String,
    pub full_name: String,
    pub active: bool,
}
