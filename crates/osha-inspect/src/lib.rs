pub mod batch;
pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod inspection;
pub mod logging;
pub mod mapping;
pub mod sanitize;
pub mod unify;

pub use batch::{BatchOrchestrator, BatchReport, FailedItem, FailureKind, RefreshReport};
pub use config::{load_config, Config};
pub use convert::{
    currency_to_number, naics_to_four_digit_name, naics_to_two_digit_name, number_to_currency,
};
pub use dataset::Dataset;
pub use error::{
    ConfigError, DatasetError, FetchError, FormatError, MappingError, OshaError, ParseError,
    Result, StorageError, WorkerError,
};
pub use fetch::{HttpFetcher, PageCache, PageFetcher};
pub use filter::{Predicate, ALL};
pub use inspection::{parse_inspection, Inspection};
pub use mapping::{load_mapping_tables, MappingTables};
pub use unify::{expand_state_name, unify, unify_employer_name, unify_fatality_label};
