//! Scalar conversions: currency text and NAICS classification.

use crate::error::FormatError;
use crate::mapping::MappingTables;

pub const NON_CLASSIFIABLE: &str = "Non-classifiable";

/// `"$2,892,400.00"` -> `2892400.0`.
///
/// Accepts an optional leading `-` and `$`, comma thousands separators and
/// surrounding whitespace. Anything else in the remainder is a
/// [`FormatError`].
pub fn currency_to_number(text: &str) -> Result<f64, FormatError> {
    let invalid = || FormatError::InvalidCurrency(text.to_string());

    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits: String = unsigned
        .strip_prefix('$')
        .unwrap_or(unsigned)
        .chars()
        .filter(|&c| c != ',')
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }

    let value: f64 = digits.parse().map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

/// `2892400.0` -> `"$2,892,400.00"`. Rounds to whole cents.
pub fn number_to_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    // Saturating cast; NaN renders as $0.00.
    let cents = (value.abs() * 100.0).round() as u64;

    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// NAICS sector name from the first two digits of `code`.
pub fn naics_to_two_digit_name(code: Option<&str>, tables: &MappingTables) -> String {
    let Some(code) = present(code) else {
        return NON_CLASSIFIABLE.to_string();
    };

    tables
        .two_digit_naics()
        .get(prefix(code, 2))
        .unwrap_or(NON_CLASSIFIABLE)
        .to_string()
}

/// NAICS industry-group name from the first four digits of `code`, falling
/// back to `"Other <sector>"` for groups the table does not list.
pub fn naics_to_four_digit_name(code: Option<&str>, tables: &MappingTables) -> String {
    let Some(code) = present(code) else {
        return NON_CLASSIFIABLE.to_string();
    };

    match tables.four_digit_naics().get(prefix(code, 4)) {
        Some(name) => name.to_string(),
        None => format!("Other {}", naics_to_two_digit_name(Some(code), tables)),
    }
}

fn present(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|code| !code.is_empty())
}

fn prefix(code: &str, len: usize) -> &str {
    code.char_indices()
        .nth(len)
        .map(|(end, _)| &code[..end])
        .unwrap_or(code)
}
