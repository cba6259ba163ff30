//! Row filters over a cleaned [`Dataset`].

use log::warn;

use crate::dataset::{parse_number, Dataset};
use crate::error::DatasetError;
use crate::mapping::{audit, MappingTables};

/// Selection value meaning "no restriction".
pub const ALL: &str = "ALL";

pub const STATE_COLUMN: &str = "state";
pub const YEAR_COLUMN: &str = "year_filing_for";
pub const NAICS_COLUMN: &str = "naics_code";
pub const ESTABLISHMENT_TYPE_COLUMN: &str = "establishment_type";

/// Ownership labels and the `establishment_type` code each one selects.
pub const OWNERSHIP_CODES: [(&str, &str); 3] = [
    ("Not a government entity", "1"),
    ("State Government entity", "2"),
    ("Local Government entity", "3"),
];

/// Numeric columns offered for range filters and chart axes, with their
/// display labels.
pub const QUANTITATIVE_COLUMNS: [(&str, &str); 8] = [
    ("Days away from work", "total_dafw_days"),
    ("Total hours worked", "total_hours_worked"),
    ("Annual average employees", "annual_average_employees"),
    ("Days of job transfer or restriction", "total_djtr_days"),
    ("Total Deaths", "total_deaths"),
    ("Cases with days away from work", "total_dafw_cases"),
    ("Cases with job transfer or restriction", "total_djtr_cases"),
    ("Number of injuries", "total_injuries"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Cell is one of `selected`. A selection containing [`ALL`] keeps
    /// every row; an empty one keeps none.
    Categorical { column: String, selected: Vec<String> },
    /// `low <= cell <= high`. Cells that are not numbers never match.
    Range { column: String, low: f64, high: f64 },
    /// Cell starts with one of `prefixes`.
    Prefix { column: String, prefixes: Vec<String> },
}

impl Predicate {
    pub fn categorical<S: Into<String>>(column: &str, selected: impl IntoIterator<Item = S>) -> Self {
        Predicate::Categorical {
            column: column.to_string(),
            selected: selected.into_iter().map(Into::into).collect(),
        }
    }

    pub fn range(column: &str, low: f64, high: f64) -> Self {
        Predicate::Range {
            column: column.to_string(),
            low,
            high,
        }
    }

    pub fn prefix<S: Into<String>>(column: &str, prefixes: impl IntoIterator<Item = S>) -> Self {
        Predicate::Prefix {
            column: column.to_string(),
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::Categorical { column, .. }
            | Predicate::Range { column, .. }
            | Predicate::Prefix { column, .. } => column,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Predicate::Categorical { selected, .. } if selected.iter().any(|s| s == ALL))
    }

    pub fn matches(&self, cell: &str) -> bool {
        match self {
            Predicate::Categorical { selected, .. } => {
                self.is_unrestricted() || selected.iter().any(|value| same_value(cell, value))
            }
            Predicate::Range { low, high, .. } => {
                parse_number(cell).is_some_and(|value| *low <= value && value <= *high)
            }
            Predicate::Prefix { prefixes, .. } => {
                let cell = cell.trim();
                prefixes.iter().any(|prefix| cell.starts_with(prefix.as_str()))
            }
        }
    }
}

/// Numbers compare by value so a year of `2020` selects `2020.0`.
fn same_value(cell: &str, selected: &str) -> bool {
    match (parse_number(cell), parse_number(selected)) {
        (Some(a), Some(b)) => a == b,
        _ => cell == selected,
    }
}

/// Rows matching every predicate, in their original order.
pub fn apply(dataset: &Dataset, predicates: &[Predicate]) -> Result<Dataset, DatasetError> {
    let mut active = Vec::with_capacity(predicates.len());
    for predicate in predicates.iter().filter(|p| !p.is_unrestricted()) {
        active.push((dataset.require_column(predicate.column())?, predicate));
    }

    let mut view = dataset.clone();
    view.retain_rows(|row| {
        active
            .iter()
            .all(|(index, predicate)| predicate.matches(&row[*index]))
    });
    Ok(view)
}

/// NAICS sector filter from sector names. `None` when `names` contains
/// [`ALL`].
pub fn naics_sector_predicate<S: AsRef<str>>(
    names: &[S],
    tables: &MappingTables,
) -> Option<Predicate> {
    if names.iter().any(|name| name.as_ref() == ALL) {
        return None;
    }
    Some(Predicate::prefix(
        NAICS_COLUMN,
        audit::sector_codes_for_names(names, tables),
    ))
}

/// `establishment_type` filter from ownership labels. `None` when `labels`
/// contains [`ALL`]. Unknown labels are skipped.
pub fn ownership_predicate<S: AsRef<str>>(labels: &[S]) -> Option<Predicate> {
    if labels.iter().any(|label| label.as_ref() == ALL) {
        return None;
    }

    let codes: Vec<&str> = labels
        .iter()
        .filter_map(|label| {
            let label = label.as_ref();
            let code = ownership_code(label);
            if code.is_none() {
                warn!("Unknown ownership label '{}'", label);
            }
            code
        })
        .collect();
    Some(Predicate::categorical(ESTABLISHMENT_TYPE_COLUMN, codes))
}

pub fn ownership_code(label: &str) -> Option<&'static str> {
    OWNERSHIP_CODES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, code)| *code)
}

/// Column name for a quantitative display label.
pub fn quantitative_column(label: &str) -> Option<&'static str> {
    QUANTITATIVE_COLUMNS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, column)| *column)
}

/// `(min, max)` over the numeric cells of `column`, or `None` if it has
/// none. Used as the default bounds of a range filter.
pub fn column_bounds(dataset: &Dataset, column: &str) -> Result<Option<(f64, f64)>, DatasetError> {
    let index = dataset.require_column(column)?;
    Ok(dataset
        .rows()
        .iter()
        .filter_map(|row| parse_number(&row[index]))
        .fold(None, |bounds, value| match bounds {
            None => Some((value, value)),
            Some((low, high)) => Some((f64::min(low, value), f64::max(high, value))),
        }))
}

/// Range filter on a quantitative column given by name or display label.
/// A missing bound defaults to the column's own minimum or maximum, so an
/// open range keeps every numeric row.
pub fn range_predicate(
    dataset: &Dataset,
    column: &str,
    low: Option<f64>,
    high: Option<f64>,
) -> Result<Predicate, DatasetError> {
    let column = quantitative_column(column).unwrap_or(column);
    let (min, max) = match (low, high) {
        (Some(low), Some(high)) => (low, high),
        _ => column_bounds(dataset, column)?.unwrap_or((f64::NEG_INFINITY, f64::INFINITY)),
    };
    Ok(Predicate::range(column, low.unwrap_or(min), high.unwrap_or(max)))
}
