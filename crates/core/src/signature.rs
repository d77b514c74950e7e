//! Signature image payloads and filenames.
//!
//! Browsers submit signatures as `data:image/png;base64,<payload>` URLs.
//! Ticket signatures are stored under a random name; staff signatures are
//! stored once per staff member under the staff name.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

use crate::error::CoreError;

/// Extension of every stored signature image.
pub const SIGNATURE_EXTENSION: &str = "png";

/// Decode a data-URL signature payload into PNG bytes.
///
/// Returns `None` for anything that is not a well-formed base64 PNG; callers
/// treat that as "no signature" rather than an error.
pub fn decode_data_url(payload: &str) -> Option<Vec<u8>> {
    let (_, encoded) = payload.split_once(',')?;
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    matches!(image::guess_format(&bytes), Ok(ImageFormat::Png)).then_some(bytes)
}

/// Fresh random filename for a ticket signature.
pub fn new_ticket_filename() -> String {
    format!("{}.{SIGNATURE_EXTENSION}", uuid::Uuid::new_v4().simple())
}

/// Whether `name` has the shape produced by [`new_ticket_filename`].
pub fn is_ticket_filename(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".png") else {
        return false;
    };
    stem.len() == 32 && stem.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Filename of a staff member's signature.
///
/// Staff names end up on the filesystem, so separators, parent references
/// and control characters are rejected.
pub fn staff_filename(staff_name: &str) -> Result<String, CoreError> {
    let name = staff_name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("staff_name is required".into()));
    }
    if name.contains(['/', '\\']) || name.contains("..") || name.chars().any(char::is_control) {
        return Err(CoreError::Validation(format!(
            "staff_name '{name}' cannot be used as a signature filename"
        )));
    }
    Ok(format!("{name}.{SIGNATURE_EXTENSION}"))
}
