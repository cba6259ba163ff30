use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "osha-inspect")]
#[command(about = "Parse OSHA inspection-detail pages and normalize injury data", version)]
pub struct Cli {
    /// Configuration file. Defaults to ./osha-inspect.json when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Text, global = true)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse local detail pages and print the records as JSON.
    Parse(ParseArgs),
    /// Download detail pages into the page cache.
    Fetch(IdentifierArgs),
    /// Fetch and parse many inspections.
    Batch(BatchArgs),
    /// Re-download cached pages whose case is not closed.
    Refresh,
    /// Load and clean the establishment injury dataset.
    Clean(CleanArgs),
    /// Append parsed inspection-detail columns to any table keyed by
    /// inspection number.
    Attach(AttachArgs),
    /// Filter a cleaned dataset and write the view as CSV.
    Filter(FilterArgs),
    /// NAICS sector and industry-group names for a code.
    Classify(ClassifyArgs),
    /// Consistency reports over the mapping tables.
    Audit(AuditArgs),
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// HTML files; the file stem is used as the inspection number.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct IdentifierArgs {
    /// Inspection numbers.
    pub identifiers: Vec<String>,
    /// File with one inspection number per line.
    #[arg(long, value_name = "FILE")]
    pub ids_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub ids: IdentifierArgs,
    /// Parse cached pages only; never touch the network.
    #[arg(long, default_value_t = false)]
    pub from_cache: bool,
    /// Worker threads. Overrides the configured worker_count.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Write parsed records as CSV.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// CSV or ZIP inputs. Defaults to the configured dataset inputs.
    pub inputs: Vec<PathBuf>,
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct AttachArgs {
    /// CSV or ZIP table with an inspection-number column.
    pub input: PathBuf,
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,
    /// Column holding inspection numbers. Defaults to dataset.id_column.
    #[arg(long, value_name = "COLUMN")]
    pub id_column: Option<String>,
    /// Download pages missing from the cache instead of leaving their
    /// rows empty.
    #[arg(long, default_value_t = false)]
    pub fetch_missing: bool,
    /// Worker threads. Overrides the configured worker_count.
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Cleaned CSV dataset.
    pub input: PathBuf,
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,
    /// State abbreviations; ALL disables the filter.
    #[arg(long = "state", default_value = "ALL")]
    pub states: Vec<String>,
    /// Filing years; ALL disables the filter.
    #[arg(long = "year", default_value = "ALL")]
    pub years: Vec<String>,
    /// NAICS sector names; ALL disables the filter.
    #[arg(long = "sector", default_value = "ALL")]
    pub sectors: Vec<String>,
    /// Ownership labels such as "Local Government entity".
    #[arg(long = "ownership", default_value = "ALL")]
    pub ownership: Vec<String>,
    /// Inclusive numeric range, `column=low:high`. Either bound may be left
    /// empty to use the column's own minimum or maximum. The column may also
    /// be given by its display label.
    #[arg(long = "range", value_name = "COLUMN=LOW:HIGH", value_parser = parse_range)]
    pub ranges: Vec<RangeArg>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeArg {
    pub column: String,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

fn parse_range(value: &str) -> Result<RangeArg, String> {
    let (column, bounds) = value
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=LOW:HIGH, got '{}'", value))?;
    let (low, high) = bounds
        .split_once(':')
        .ok_or_else(|| format!("expected LOW:HIGH, got '{}'", bounds))?;
    let low = parse_bound(low).map_err(|_| format!("invalid lower bound '{}'", low))?;
    let high = parse_bound(high).map_err(|_| format!("invalid upper bound '{}'", high))?;
    if let (Some(low), Some(high)) = (low, high) {
        if low > high {
            return Err(format!("lower bound {} exceeds upper bound {}", low, high));
        }
    }
    Ok(RangeArg {
        column: column.trim().to_string(),
        low,
        high,
    })
}

fn parse_bound(text: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some)
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    pub codes: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: AuditCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantTableArg {
    Employers,
    Fatalities,
}

#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Number of raw variants folded into each canonical name.
    Counts {
        #[arg(value_enum)]
        table: VariantTableArg,
    },
    /// Variants that never appear in a dataset column.
    Absent {
        #[arg(value_enum)]
        table: VariantTableArg,
        /// CSV file holding the column.
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        column: String,
    },
    /// Distinct values of a column with their share of rows.
    Shares {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        column: String,
    },
    /// Two-digit NAICS codes for sector names.
    Sectors { names: Vec<String> },
}
