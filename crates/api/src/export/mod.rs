//! Spreadsheet exports.

pub mod sheets;
pub mod xlsx;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use xlsx::{Workbook, XlsxError, XLSX_CONTENT_TYPE};

/// An `.xlsx` file sent as an attachment.
///
/// `filename` must be ASCII; `display_filename` may carry a Thai name and is
/// sent percent-encoded in `filename*`.
#[derive(Debug)]
pub struct XlsxDownload {
    pub filename: String,
    pub display_filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl XlsxDownload {
    pub fn new(workbook: &Workbook, filename: impl Into<String>) -> Result<Self, AppError> {
        let bytes = workbook.to_bytes().map_err(xlsx_error)?;
        Ok(Self {
            filename: filename.into(),
            display_filename: None,
            bytes,
        })
    }

    pub fn with_display_filename(mut self, name: impl Into<String>) -> Self {
        self.display_filename = Some(name.into());
        self
    }

    fn disposition(&self) -> String {
        let mut value = format!("attachment; filename=\"{}\"", self.filename);
        if let Some(display) = &self.display_filename {
            value.push_str("; filename*=UTF-8''");
            value.push_str(&urlencoding::encode(display));
        }
        value
    }
}

impl IntoResponse for XlsxDownload {
    fn into_response(self) -> Response {
        let disposition = match HeaderValue::from_str(&self.disposition()) {
            Ok(value) => value,
            Err(_) => HeaderValue::from_static("attachment"),
        };
        (
            [
                (CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
                (CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

fn xlsx_error(err: XlsxError) -> AppError {
    tracing::error!(error = %err, "Failed to build xlsx export");
    AppError::InternalError("Failed to build export".into())
}
