//! Label-prefix extraction for the detail page's text blocks.
//!
//! The page renders fields as `"Label: value"` lines inside fixed blocks.
//! All string slicing against that layout lives here, so a change in the
//! page shape breaks one helper and its tests instead of a whole record.

pub const CASE_STATUS: &str = "Case Status: ";
pub const UNION_STATUS: &str = "Union Status: ";
pub const NAICS: &str = "NAICS: ";
pub const INSPECTION_TYPE: &str = "Inspection Type: ";
pub const SCOPE: &str = "Scope: ";
pub const ADVANCE_NOTICE: &str = "Advanced Notice: ";
pub const OWNERSHIP: &str = "Ownership: ";
pub const SAFETY_HEALTH: &str = "Safety/Health: ";

pub const EMPLOYER_SEPARATOR: &str = " - ";
pub const VIOLATION_SUMMARY: &str = "Violation Summary";

const NBSP: char = '\u{a0}';

/// Raw value of the first line in `block` starting with `label`.
///
/// Only ASCII whitespace is stripped from the line, so a trailing
/// non-breaking space survives for callers that care about it.
pub fn raw_value_after_label<'a>(block: &'a str, label: &str) -> Option<&'a str> {
    block
        .lines()
        .map(|line| line.trim_matches(|c: char| c.is_ascii_whitespace()))
        .find_map(|line| line.strip_prefix(label))
}

/// Trimmed value of the first line in `block` starting with `label`.
pub fn value_after_label<'a>(block: &'a str, label: &str) -> Option<&'a str> {
    raw_value_after_label(block, label).map(str::trim)
}

/// Employer name from the page header, which reads `"<case no> - <name>"`.
/// Only the first separator splits; the name may contain more.
pub fn employer_from_header(header: &str) -> Option<&str> {
    header
        .split_once(EMPLOYER_SEPARATOR)
        .map(|(_, name)| name.trim())
}

/// `(code, name)` from a `"NAICS: 491110/Postal Service"` line. The name is
/// `None` when the line has no `/`.
pub fn naics_parts(block: &str) -> Option<(&str, Option<&str>)> {
    let value = value_after_label(block, NAICS)?;
    Some(match value.split_once('/') {
        Some((code, name)) => (code.trim(), Some(name.trim())),
        None => (value, None),
    })
}

/// Ownership value, or `None` when the line is absent or ends in a
/// non-breaking space. The page renders an unset ownership that way.
// Unverified: the NBSP may be an upstream data-quality quirk rather than a
// deliberate "unset" marker. Kept as observed.
pub fn ownership_value(block: &str) -> Option<&str> {
    let raw = raw_value_after_label(block, OWNERSHIP)?;
    if raw.ends_with(NBSP) {
        return None;
    }
    Some(raw.trim())
}
