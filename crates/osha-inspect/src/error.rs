use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OshaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mapping table error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Mapping tables are loaded once at startup; any of these is fatal.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Failed to read mapping file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse mapping file '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Not a currency amount: '{0}'")]
    InvalidCurrency(String),
}

/// Document-level failures. Field-level gaps never surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Document has no employer header")]
    MissingEmployerHeader,

    #[error("Employer header has no case-number separator: '{0}'")]
    MalformedEmployerHeader(String),

    #[error("Document has {found} layout blocks, expected at least {expected}")]
    MissingLayoutBlocks { found: usize, expected: usize },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request for inspection {identifier} failed: {source}")]
    Request {
        identifier: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Inspection {identifier} returned HTTP {status}")]
    Status { identifier: String, status: u16 },

    #[error("Inspection {0} is not cached")]
    NotCached(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid inspection identifier: '{0}'")]
    InvalidIdentifier(String),
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV from '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read ZIP archive '{path}': {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Unsupported input file: {0}")]
    UnsupportedInput(PathBuf),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Failed to write CSV: {0}")]
    Write(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("Worker {0} panicked")]
    Panicked(usize),
}

pub type Result<T> = std::result::Result<T, OshaError>;
