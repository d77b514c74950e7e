//! Asset inventory entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use helpdesk_core::asset as rules;
use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;

use super::{require_text, trim_opt, validate_input};

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub asset_no: String,
    pub asset_type: String,
    pub asset_model: Option<String>,
    pub serial_no: Option<String>,
    pub mac_address: Option<String>,
    pub hostname: Option<String>,
    pub owner_name: Option<String>,
    pub position: Option<String>,
    pub department: String,
    pub status: String,
    pub note: Option<String>,
}

/// Create/update body for an asset. Every mutable column is replaced on update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AssetInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub asset_no: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub asset_type: String,
    #[validate(length(max = 200))]
    pub asset_model: Option<String>,
    #[validate(length(max = 200))]
    pub serial_no: Option<String>,
    #[validate(length(max = 100))]
    pub mac_address: Option<String>,
    #[validate(length(max = 200))]
    pub hostname: Option<String>,
    #[validate(length(max = 200))]
    pub owner_name: Option<String>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub department: String,
    #[validate(length(max = 100))]
    pub status: Option<String>,
    #[validate(length(max = 10000))]
    pub note: Option<String>,
}

/// Normalised asset columns written by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetFields {
    pub asset_no: String,
    pub asset_type: String,
    pub asset_model: Option<String>,
    pub serial_no: Option<String>,
    pub mac_address: Option<String>,
    pub hostname: Option<String>,
    pub owner_name: Option<String>,
    pub position: Option<String>,
    pub department: String,
    pub status: String,
    pub note: Option<String>,
}

impl AssetInput {
    /// Validate and normalise; blank status becomes in-use.
    pub fn to_fields(&self) -> Result<AssetFields, CoreError> {
        validate_input(self)?;
        Ok(AssetFields {
            asset_no: rules::normalize_asset_no(&self.asset_no)?,
            asset_type: require_text(&self.asset_type, "asset_type")?,
            asset_model: trim_opt(self.asset_model.as_deref()),
            serial_no: trim_opt(self.serial_no.as_deref()),
            mac_address: trim_opt(self.mac_address.as_deref()),
            hostname: trim_opt(self.hostname.as_deref()),
            owner_name: trim_opt(self.owner_name.as_deref()),
            position: trim_opt(self.position.as_deref()),
            department: require_text(&self.department, "department")?,
            status: rules::status_or_default(self.status.as_deref()),
            note: trim_opt(self.note.as_deref()),
        })
    }
}

/// `?dept=&status=` list filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetListParams {
    pub dept: Option<String>,
    pub status: Option<String>,
}

impl AssetListParams {
    /// Trimmed department filter; blank means all.
    pub fn department(&self) -> Option<String> {
        trim_opt(self.dept.as_deref())
    }

    /// Trimmed status filter; blank means all.
    pub fn status(&self) -> Option<String> {
        trim_opt(self.status.as_deref())
    }
}

/// One row of a bulk import. Status is always in-use for imported rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportAssetRow {
    #[serde(default)]
    pub asset_no: String,
    #[serde(default)]
    pub asset_type: String,
    pub asset_model: Option<String>,
    pub serial_no: Option<String>,
    pub mac_address: Option<String>,
    pub hostname: Option<String>,
    pub owner_name: Option<String>,
    pub position: Option<String>,
    pub note: Option<String>,
}

impl ImportAssetRow {
    /// Columns for this row under a resolved department code; `None` for a blank asset number.
    pub fn to_fields(&self, department: &str) -> Option<AssetFields> {
        let asset_no = trim_opt(Some(&self.asset_no))?;
        Some(AssetFields {
            asset_no,
            asset_type: self.asset_type.trim().to_string(),
            asset_model: trim_opt(self.asset_model.as_deref()),
            serial_no: trim_opt(self.serial_no.as_deref()),
            mac_address: trim_opt(self.mac_address.as_deref()),
            hostname: trim_opt(self.hostname.as_deref()),
            owner_name: trim_opt(self.owner_name.as_deref()),
            position: trim_opt(self.position.as_deref()),
            department: department.to_string(),
            status: rules::STATUS_IN_USE.to_string(),
            note: trim_opt(self.note.as_deref()),
        })
    }
}

/// Body for bulk import: the department (short code or full name) and parsed rows.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportAssets {
    pub department: String,
    #[serde(default)]
    pub rows: Vec<ImportAssetRow>,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub imported: u64,
    pub skipped: u64,
}

/// `?q=` for the asset summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetSummaryParams {
    pub q: Option<String>,
}

/// Count of assets whose status changed in a bulk reset.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResetOutcome {
    pub updated: u64,
}
