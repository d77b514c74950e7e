//! Signature images on local disk.
//!
//! Ticket signatures live in the served signature directory under random
//! `<32 hex>.png` names. Staff signatures live in a separate, unserved
//! directory, one `<staff name>.png` per person.

use std::io;
use std::path::{Path, PathBuf};

use helpdesk_core::error::CoreError;
use helpdesk_core::signature;

/// Filesystem-backed signature store.
#[derive(Debug, Clone)]
pub struct SignatureStore {
    root: PathBuf,
    staff_root: PathBuf,
}

impl SignatureStore {
    pub fn new(root: impl Into<PathBuf>, staff_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staff_root: staff_root.into(),
        }
    }

    /// Directory served under `/signatures`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a stored ticket signature.
    pub fn ticket_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Path of a staff member's signature image.
    pub fn staff_path(&self, staff_name: &str) -> Result<PathBuf, CoreError> {
        Ok(self.staff_root.join(signature::staff_filename(staff_name)?))
    }

    /// Decode a data-URL payload and store it under a fresh name.
    ///
    /// Returns `Ok(None)` when the payload is not a valid PNG; only I/O
    /// failures are errors.
    pub async fn save_ticket_signature(&self, data_url: &str) -> io::Result<Option<String>> {
        let Some(bytes) = signature::decode_data_url(data_url) else {
            tracing::debug!("Signature payload is not a PNG data URL, ignoring");
            return Ok(None);
        };

        tokio::fs::create_dir_all(&self.root).await?;
        let filename = signature::new_ticket_filename();
        tokio::fs::write(self.ticket_path(&filename), &bytes).await?;
        tracing::debug!(filename = %filename, bytes = bytes.len(), "Ticket signature stored");
        Ok(Some(filename))
    }

    /// Delete a ticket signature. Failures are logged and swallowed.
    ///
    /// Names that were not generated by this store are never touched.
    pub async fn remove_ticket_signature(&self, filename: &str) {
        if !signature::is_ticket_filename(filename) {
            tracing::warn!(filename = %filename, "Refusing to delete unexpected signature name");
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.ticket_path(filename)).await {
            tracing::warn!(filename = %filename, error = %e, "Failed to delete ticket signature");
        }
    }

    /// Store (or replace) a staff member's signature image.
    pub async fn save_staff_signature(
        &self,
        staff_name: &str,
        png: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let path = self.staff_path(staff_name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }

    /// A staff member's signature image, if one has been stored.
    pub async fn load_staff_signature(&self, staff_name: &str) -> Option<Vec<u8>> {
        let path = self.staff_path(staff_name).ok()?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read staff signature");
                None
            }
        }
    }
}

/// Failure storing a staff signature.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Signature I/O failed: {0}")]
    Io(#[from] io::Error),
}
