//! Department directory rules.
//!
//! Departments are reference data seeded by migration. Reports and assets
//! store the short code; codes are checked against the directory when a
//! record is written.

use std::collections::HashMap;

use crate::error::CoreError;

/// Trim and require a department code or name.
pub fn normalize_code(code: &str) -> Result<String, CoreError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("department is required".into()));
    }
    Ok(trimmed.to_string())
}

/// Error for a code that is not an active directory entry.
pub fn unknown_code(code: &str) -> CoreError {
    CoreError::Validation(format!("Unknown department code '{code}'"))
}

/// Full name for `code`, falling back to the code itself.
pub fn display_name<'a>(code: &'a str, directory: &'a HashMap<String, String>) -> &'a str {
    directory.get(code).map(String::as_str).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_code() {
        let mut dir = HashMap::new();
        dir.insert("ศพท.".to_string(), "ศูนย์ข้อมูลและพัฒนาระบบเทคโนโลยีสารสนเทศ".to_string());
        assert_eq!(
            display_name("ศพท.", &dir),
            "ศูนย์ข้อมูลและพัฒนาระบบเทคโนโลยีสารสนเทศ"
        );
        assert_eq!(display_name("XYZ", &dir), "XYZ");
    }

    #[test]
    fn blank_code_is_rejected() {
        assert!(normalize_code("  ").is_err());
        assert_eq!(normalize_code(" กกม. ").unwrap(), "กกม.");
    }
}
