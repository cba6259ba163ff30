use std::path::Path;

use log::info;
use serde::de::DeserializeOwned;

use crate::error::MappingError;
use crate::mapping::tables::MappingTables;

pub const EMPLOYER_NAMES_FILE: &str = "EMPLOYER_NORMALIZED_NAMES.json";
pub const FATALITY_NAMES_FILE: &str = "FATALITY_OR_CATASTROPHE_NAMES.json";
pub const TWO_DIGIT_NAICS_FILE: &str = "TWO_DIGIT_NAICS.json";
pub const FOUR_DIGIT_NAICS_FILE: &str = "FOUR_DIGIT_NAICS.json";
pub const STATE_NAMES_FILE: &str = "STATE_NAMES.json";

/// Loads every mapping file from `directory`. A missing or malformed file
/// fails the whole load.
pub fn load_mapping_tables<P: AsRef<Path>>(directory: P) -> Result<MappingTables, MappingError> {
    let directory = directory.as_ref();

    let tables = MappingTables::new(
        read_table(directory, EMPLOYER_NAMES_FILE)?,
        read_table(directory, FATALITY_NAMES_FILE)?,
        read_table(directory, TWO_DIGIT_NAICS_FILE)?,
        read_table(directory, FOUR_DIGIT_NAICS_FILE)?,
        read_table(directory, STATE_NAMES_FILE)?,
    );

    info!(
        "Loaded mapping tables from {}: {} employers, {} fatality labels, {} sectors, {} industry groups, {} states",
        directory.display(),
        tables.employer_names().len(),
        tables.fatality_names().len(),
        tables.two_digit_naics().len(),
        tables.four_digit_naics().len(),
        tables.state_names().len(),
    );

    Ok(tables)
}

fn read_table<T: DeserializeOwned>(directory: &Path, file_name: &str) -> Result<T, MappingError> {
    let path = directory.join(file_name);
    let content = std::fs::read_to_string(&path).map_err(|e| MappingError::ReadFile {
        path: path.clone(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| MappingError::ParseJson { path, source: e })
}
