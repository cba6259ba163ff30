use log::info;

use crate::dataset::table::{parse_number, Dataset};
use crate::error::DatasetError;

/// Columns the analysis never reads.
pub const DROPPED_COLUMNS: [&str; 12] = [
    "id",
    "street_address",
    "zip_code",
    "no_injuries_illnesses",
    "total_other_cases",
    "total_skin_disorders",
    "total_poisonings",
    "total_respiratory_conditions",
    "total_hearing_loss",
    "total_other_illnesses",
    "created_timestamp",
    "change_reason",
];

pub const YEAR_COLUMN: &str = "year_filing_for";
pub const EMPLOYEES_COLUMN: &str = "annual_average_employees";
/// Establishments reporting this many employees or more are data-entry
/// errors.
pub const MAX_ANNUAL_AVERAGE_EMPLOYEES: f64 = 1_000_000.0;
pub const NON_NEGATIVE_COLUMNS: [&str; 3] =
    ["total_hours_worked", "total_dafw_days", "total_djtr_days"];

/// Drops unused columns and invalid rows. Surviving rows keep their
/// relative order.
pub fn clean(mut dataset: Dataset) -> Result<Dataset, DatasetError> {
    let before = dataset.len();
    dataset.drop_columns(&DROPPED_COLUMNS);

    let year = dataset.require_column(YEAR_COLUMN)?;
    let employees = dataset.require_column(EMPLOYEES_COLUMN)?;
    let non_negative = NON_NEGATIVE_COLUMNS
        .iter()
        .map(|name| dataset.require_column(name))
        .collect::<Result<Vec<_>, _>>()?;

    dataset.retain_rows(|row| {
        !row[year].trim().is_empty()
            && parse_number(&row[employees])
                .is_some_and(|value| value < MAX_ANNUAL_AVERAGE_EMPLOYEES)
            && non_negative
                .iter()
                .all(|&index| parse_number(&row[index]).is_some_and(|value| value >= 0.0))
    });

    info!(
        "Cleaned dataset: kept {} of {} rows, {} columns",
        dataset.len(),
        before,
        dataset.width()
    );
    Ok(dataset)
}
