//! Tabular OSHA injury data: loading, cleaning and enrichment.

pub mod attach;
pub mod clean;
pub mod loader;
pub mod table;

pub use attach::{attach_inspections, enrich_with_inspections, unique_identifiers, EMPLOYER_NAME_COLUMN};
pub use clean::{clean, DROPPED_COLUMNS};
pub use loader::{load_csv, load_input, load_inputs, load_zip, read_csv, save_csv, write_csv};
pub use table::{parse_number, Dataset};
