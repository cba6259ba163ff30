use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::Serialize;

use osha_inspect::batch::{
    download_many, refresh_open_cases, BatchOrchestrator, BatchReport, FailedItem, FailureKind,
    NoopProgress,
};
use osha_inspect::config::{load_config, Config};
use osha_inspect::convert::{naics_to_four_digit_name, naics_to_two_digit_name};
use osha_inspect::dataset::{self, clean, enrich_with_inspections, Dataset};
use osha_inspect::fetch::{
    CacheFirstFetcher, CachedPageFetcher, CachingFetcher, HttpFetcher, PageCache, PageFetcher,
};
use osha_inspect::filter::{self, Predicate, STATE_COLUMN, YEAR_COLUMN};
use osha_inspect::inspection::{parse_inspection, Inspection};
use osha_inspect::mapping::{audit, load_mapping_tables, MappingTables, VariantTable};

use crate::cli::{
    AttachArgs, AuditCommand, BatchArgs, CleanArgs, Commands, FilterArgs, IdentifierArgs, ParseArgs,
    VariantTableArg,
};

const DEFAULT_CONFIG_FILE: &str = "osha-inspect.json";
const IDENTIFIER_COLUMN: &str = "identifier";

pub(crate) fn run(config_path: Option<&Path>, command: Commands) -> Result<()> {
    let config = resolve_config(config_path)?;

    match command {
        Commands::Parse(args) => run_parse(args),
        Commands::Fetch(args) => run_fetch(&config, args),
        Commands::Batch(args) => run_batch(&config, args),
        Commands::Refresh => run_refresh(&config),
        Commands::Clean(args) => run_clean(&config, args),
        Commands::Attach(args) => run_attach(&config, args),
        Commands::Filter(args) => run_filter(&config, args),
        Commands::Classify(args) => {
            let tables = load_tables(&config)?;
            let rows: Vec<Classification> = args
                .codes
                .iter()
                .map(|code| Classification {
                    code: code.clone(),
                    sector: naics_to_two_digit_name(Some(code.as_str()), &tables),
                    industry_group: naics_to_four_digit_name(Some(code.as_str()), &tables),
                })
                .collect();
            print_json(&rows)
        }
        Commands::Audit(args) => run_audit(&config, args.command),
    }
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => load_config(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("failed to load config {}", DEFAULT_CONFIG_FILE)),
        None => Ok(Config::default()),
    }
}

fn load_tables(config: &Config) -> Result<MappingTables> {
    load_mapping_tables(&config.mapping_directory).with_context(|| {
        format!(
            "failed to load mapping tables from {}",
            config.mapping_directory
        )
    })
}

#[derive(Debug, Serialize)]
struct Classification {
    code: String,
    sector: String,
    industry_group: String,
}

#[derive(Debug, Serialize)]
struct ParsedPage<'a> {
    identifier: &'a str,
    #[serde(flatten)]
    inspection: &'a Inspection,
}

#[derive(Debug, Serialize)]
struct BatchSummary<'a> {
    parsed: usize,
    failed: usize,
    started_at: String,
    finished_at: String,
    failures: &'a [FailedItem],
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    records: Vec<ParsedPage<'a>>,
    failures: Vec<FailedItem>,
}

fn run_parse(args: ParseArgs) -> Result<()> {
    let mut parsed = Vec::new();
    let mut failures = Vec::new();

    for path in &args.files {
        let identifier = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let html = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        match parse_inspection(&html) {
            Ok(inspection) => parsed.push((identifier, inspection)),
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                failures.push(FailedItem {
                    identifier,
                    kind: FailureKind::Parse,
                    reason: e.to_string(),
                });
            }
        }
    }

    print_json(&ParseOutput {
        records: parsed
            .iter()
            .map(|(identifier, inspection)| ParsedPage {
                identifier,
                inspection,
            })
            .collect(),
        failures,
    })
}

fn run_fetch(config: &Config, args: IdentifierArgs) -> Result<()> {
    let identifiers = collect_identifiers(&args)?;
    let cache = PageCache::new(&config.inspections_directory);
    let fetcher = HttpFetcher::new(&config.fetch)?;

    let failures = download_many(&fetcher, &cache, &identifiers, &NoopProgress);
    print_json(&failures)
}

fn run_batch(config: &Config, args: BatchArgs) -> Result<()> {
    let identifiers = collect_identifiers(&args.ids)?;
    let cache = PageCache::new(&config.inspections_directory);

    let fetcher: Arc<dyn PageFetcher> = if args.from_cache {
        Arc::new(CachedPageFetcher::new(cache))
    } else {
        let http: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.fetch)?);
        Arc::new(CachingFetcher::new(http, cache))
    };

    let report = BatchOrchestrator::new(fetcher)
        .with_workers(args.workers.unwrap_or(config.worker_count))
        .process_many(&identifiers);

    if let Some(output) = &args.output {
        dataset::save_csv(&records_dataset(&report), output)
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    print_json(&BatchSummary {
        parsed: report.success_count(),
        failed: report.failure_count(),
        started_at: report.started_at.to_rfc3339(),
        finished_at: report.finished_at.to_rfc3339(),
        failures: report.failures(),
    })
}

fn records_dataset(report: &BatchReport) -> Dataset {
    let headers = std::iter::once(IDENTIFIER_COLUMN)
        .chain(Inspection::FIELD_NAMES)
        .map(str::to_string)
        .collect();
    let rows = report
        .records()
        .iter()
        .map(|(identifier, inspection)| {
            let mut row = vec![identifier.clone()];
            row.extend(inspection.to_row());
            row
        })
        .collect();
    Dataset::new(headers, rows)
}

fn run_refresh(config: &Config) -> Result<()> {
    let cache = PageCache::new(&config.inspections_directory);
    let fetcher = HttpFetcher::new(&config.fetch)?;

    let report = refresh_open_cases(&fetcher, &cache, &NoopProgress)?;
    info!(
        "Refreshed {} open cases, {} failed",
        report.requeued.len(),
        report.failures.len()
    );
    print_json(&serde_json::json!({
        "requeued": report.requeued,
        "failed": report.failed_identifiers(),
    }))
}

fn run_clean(config: &Config, args: CleanArgs) -> Result<()> {
    let inputs: Vec<PathBuf> = if args.inputs.is_empty() {
        config.dataset.inputs.iter().map(PathBuf::from).collect()
    } else {
        args.inputs
    };
    if inputs.is_empty() {
        bail!("no dataset inputs given and none configured");
    }

    let data = clean(dataset::load_inputs(&inputs)?)?;

    dataset::save_csv(&data, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn run_attach(config: &Config, args: AttachArgs) -> Result<()> {
    let tables = load_tables(config)?;
    let id_column = args
        .id_column
        .unwrap_or_else(|| config.dataset.id_column.clone());
    let mut data = dataset::load_input(&args.input)?;

    let cache = PageCache::new(&config.inspections_directory);
    let fetcher: Arc<dyn PageFetcher> = if args.fetch_missing {
        Arc::new(CacheFirstFetcher::new(
            Arc::new(HttpFetcher::new(&config.fetch)?),
            cache,
        ))
    } else {
        Arc::new(CachedPageFetcher::new(cache))
    };

    let report = enrich_with_inspections(
        &mut data,
        &id_column,
        fetcher,
        args.workers.unwrap_or(config.worker_count),
        &tables,
    )?;
    info!(
        "Attached {} inspections, {} unavailable",
        report.success_count(),
        report.failure_count()
    );

    dataset::save_csv(&data, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    print_json(&report.failures())
}

fn run_filter(config: &Config, args: FilterArgs) -> Result<()> {
    let data = dataset::load_csv(&args.input)?;

    let mut predicates = vec![
        Predicate::categorical(STATE_COLUMN, args.states),
        Predicate::categorical(YEAR_COLUMN, args.years),
    ];
    if !args.sectors.iter().any(|s| s == filter::ALL) {
        let tables = load_tables(config)?;
        predicates.extend(filter::naics_sector_predicate(&args.sectors, &tables));
    }
    predicates.extend(filter::ownership_predicate(&args.ownership));
    for range in &args.ranges {
        predicates.push(filter::range_predicate(
            &data,
            &range.column,
            range.low,
            range.high,
        )?);
    }

    let view = filter::apply(&data, &predicates)?;
    info!("Filter kept {} of {} rows", view.len(), data.len());
    dataset::save_csv(&view, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn run_audit(config: &Config, command: AuditCommand) -> Result<()> {
    match command {
        AuditCommand::Counts { table } => {
            let tables = load_tables(config)?;
            print_json(&audit::variant_counts(variant_table(&tables, table)))
        }
        AuditCommand::Absent {
            table,
            input,
            column,
        } => {
            let tables = load_tables(config)?;
            let data = dataset::load_input(&input)?;
            let absent =
                audit::variants_absent_from(variant_table(&tables, table), data.column(&column)?);
            print_json(&absent)
        }
        AuditCommand::Shares { input, column } => {
            let data = dataset::load_input(&input)?;
            let total = data.len().max(1) as f64;
            let shares: Vec<serde_json::Value> = data
                .value_counts(&column)?
                .into_iter()
                .map(|(value, count)| {
                    serde_json::json!({
                        "value": value,
                        "count": count,
                        "percent": (10_000.0 * count as f64 / total).round() / 100.0,
                    })
                })
                .collect();
            print_json(&shares)
        }
        AuditCommand::Sectors { names } => {
            let tables = load_tables(config)?;
            if names.is_empty() {
                return print_json(&audit::sector_choices(&tables));
            }
            print_json(&audit::sector_codes_for_names(&names, &tables))
        }
    }
}

fn variant_table(tables: &MappingTables, table: VariantTableArg) -> &VariantTable {
    match table {
        VariantTableArg::Employers => tables.employer_names(),
        VariantTableArg::Fatalities => tables.fatality_names(),
    }
}

/// Positional identifiers followed by those in `--ids-file`, one per line.
fn collect_identifiers(args: &IdentifierArgs) -> Result<Vec<String>> {
    let mut identifiers = args.identifiers.clone();
    if let Some(path) = &args.ids_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        identifiers.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if identifiers.is_empty() {
        bail!("no inspection numbers given");
    }
    Ok(identifiers)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
