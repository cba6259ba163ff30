use std::collections::BTreeSet;
use std::sync::Arc;

use log::info;

use crate::batch::{BatchOrchestrator, BatchReport};
use crate::dataset::table::Dataset;
use crate::error::DatasetError;
use crate::fetch::PageFetcher;
use crate::inspection::Inspection;
use crate::mapping::MappingTables;
use crate::unify::unify_employer_name;

pub const EMPLOYER_NAME_COLUMN: &str = "employer_name";

/// Appends the inspection columns to `dataset`, matched on `id_column`.
/// Rows with no parsed page get [`Inspection::null_row`].
pub fn attach_inspections(
    dataset: &mut Dataset,
    id_column: &str,
    report: &BatchReport,
) -> Result<(), DatasetError> {
    let id_index = dataset.require_column(id_column)?;
    let records = report.records_by_identifier();
    let mut matched = 0usize;

    dataset.add_columns(&Inspection::FIELD_NAMES, |row| {
        match records.get(row[id_index].trim()) {
            Some(inspection) => {
                matched += 1;
                inspection.to_row()
            }
            None => Inspection::null_row(),
        }
    });

    info!(
        "Attached inspection details to {} of {} rows",
        matched,
        dataset.len()
    );
    Ok(())
}

/// Distinct non-empty identifiers of `id_column`, sorted.
pub fn unique_identifiers(dataset: &Dataset, id_column: &str) -> Result<Vec<String>, DatasetError> {
    let identifiers: BTreeSet<&str> = dataset
        .column(id_column)?
        .into_iter()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    Ok(identifiers.into_iter().map(str::to_string).collect())
}

/// Fetches and parses the page of every inspection `dataset` references,
/// attaches the inspection columns and unifies the employer names.
///
/// Works on any table with an identifier column; pages that fail leave
/// their rows with sentinel values and show up in the returned report.
pub fn enrich_with_inspections(
    dataset: &mut Dataset,
    id_column: &str,
    fetcher: Arc<dyn PageFetcher>,
    worker_count: usize,
    tables: &MappingTables,
) -> Result<BatchReport, DatasetError> {
    let identifiers = unique_identifiers(dataset, id_column)?;
    let report = BatchOrchestrator::new(fetcher)
        .with_workers(worker_count)
        .process_many(&identifiers);

    attach_inspections(dataset, id_column, &report)?;
    dataset.map_column(EMPLOYER_NAME_COLUMN, |name| unify_employer_name(name, tables))?;
    Ok(report)
}
