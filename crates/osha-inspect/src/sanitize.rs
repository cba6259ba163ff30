//! Checks applied to inspection identifiers before they reach the
//! filesystem or a URL, and helpers for keeping span fields short.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::StorageError;

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// Returns the trimmed identifier if it is safe to use as a file stem.
///
/// Inspection numbers are digits with an optional `.suffix`
/// (`1437214.015`); anything with a path separator or `..` is rejected.
pub fn validate_identifier(identifier: &str) -> Result<&str, StorageError> {
    let trimmed = identifier.trim();
    if !IDENTIFIER_PATTERN.is_match(trimmed) || trimmed.contains("..") {
        return Err(StorageError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(trimmed)
}

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for id in ["317191393", "1437214.015", " 1234 ", "abc-12_3"] {
            assert_eq!(validate_identifier(id).unwrap(), id.trim(), "input {:?}", id);
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for id in ["", "  ", "../etc/passwd", "a/b", "a\\b", ".hidden", "1..2", "12 34"] {
            assert!(
                matches!(
                    validate_identifier(id),
                    Err(StorageError::InvalidIdentifier(_))
                ),
                "input {:?}",
                id
            );
        }
    }

    #[test]
    fn test_redact_path_returns_filename() {
        assert_eq!(
            redact_path(Path::new("/data/Inspections/317191393.html")),
            "317191393.html"
        );
    }

    #[test]
    fn test_redact_path_no_filename() {
        assert_eq!(redact_path(Path::new("/")), "<unknown>");
    }
}
