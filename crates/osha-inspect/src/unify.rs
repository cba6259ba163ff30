//! Label unification. Every function here falls back to the input label, so
//! unifying can never fail or lose data.

use crate::mapping::{MappingTables, VariantTable};

pub fn unify(raw_label: &str, table: &VariantTable) -> String {
    table.canonical_for(raw_label).unwrap_or(raw_label).to_string()
}

/// Folds the many spellings of one company into a single name so that
/// grouping by employer works.
pub fn unify_employer_name(raw_name: &str, tables: &MappingTables) -> String {
    unify(raw_name, tables.employer_names())
}

pub fn unify_fatality_label(raw_label: &str, tables: &MappingTables) -> String {
    unify(raw_label, tables.fatality_names())
}

/// `"CA"` -> `"California"`; unknown codes pass through.
pub fn expand_state_name(abbreviation: &str, tables: &MappingTables) -> String {
    tables
        .state_names()
        .get(abbreviation)
        .unwrap_or(abbreviation)
        .to_string()
}
