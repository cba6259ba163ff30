pub mod audit;
pub mod loader;
pub mod tables;

pub use loader::load_mapping_tables;
pub use tables::{CodeTable, MappingTables, VariantTable};
