use serde::{Deserialize, Serialize};

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://www.osha.gov/ords/imis/establishment.inspection_detail?id={id}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// Directory holding the five mapping-table JSON files.
    pub mapping_directory: String,
    /// Page cache; one `<inspection number>.html` per inspection.
    #[serde(default = "default_inspections_directory")]
    pub inspections_directory: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            mapping_directory: "mappings".to_string(),
            inspections_directory: default_inspections_directory(),
            worker_count: default_worker_count(),
            fetch: FetchConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

fn default_inspections_directory() -> String {
    "Inspections".to_string()
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_url_template")]
    pub url_template: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Sleep after each successful request.
    #[serde(default)]
    pub request_pause_ms: u64,
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("osha-inspect/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            request_pause_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// CSV files or ZIP archives of CSV files, concatenated in order.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Column holding the inspection number used to attach parsed pages.
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

fn default_id_column() -> String {
    "Inspection Number".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            id_column: default_id_column(),
        }
    }
}
