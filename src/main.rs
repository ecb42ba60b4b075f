// src/main.rs
mod extractors;
mod lookup;
mod report;
mod storage;
mod utils;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use extractors::{lines_from_text, Extraction, ExtractorSettings, RolloverPolicy, StatementExtractor};
use lookup::{CategoryConfig, MerchantMap};
use report::StatementSummary;
use storage::StorageManager;
use utils::AppError;

/// Infers transaction records from extracted bank/credit-card statement text
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text files holding statement text already extracted from PDFs, one visual line per line
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for extracted records and summaries
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// JSON object mapping merchant spellings to canonical names
    #[arg(long, default_value = "merchant_map.json")]
    merchant_map: PathBuf,

    /// JSON object mapping category names to keyword patterns
    #[arg(long, default_value = "category.json")]
    categories: PathBuf,

    /// Month moved into the following year when a statement spans New Year
    #[arg(long, value_enum, default_value_t = RolloverPolicy::December)]
    rollover: RolloverPolicy,

    /// Use this statement year instead of detecting it
    #[arg(long, value_parser = clap::value_parser!(i32).range(2000..=9998))]
    year: Option<i32>,

    /// Calendar year used to bound year detection (defaults to the local year)
    #[arg(long, value_parser = clap::value_parser!(i32).range(2000..=9998))]
    current_year: Option<i32>,
}

impl Args {
    fn settings(&self) -> ExtractorSettings {
        let mut settings = ExtractorSettings {
            rollover: self.rollover,
            year_override: self.year,
            ..ExtractorSettings::default()
        };
        if let Some(year) = self.current_year {
            settings.current_year = year;
        }
        settings
    }
}

/// Reads one statement text file into trimmed, non-empty lines.
async fn load_statement_lines(path: &Path) -> Result<Vec<String>, AppError> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(lines_from_text(&text))
}

/// Loads and extracts one statement; the CPU-bound pipeline runs off the async workers.
async fn process_statement(path: PathBuf, extractor: Arc<StatementExtractor>) -> Result<Extraction, AppError> {
    let lines = load_statement_lines(&path).await?;
    tracing::info!("Loaded {} lines from {}", lines.len(), path.display());

    tokio::task::spawn_blocking(move || extractor.extract(&lines))
        .await
        .map_err(|e| AppError::Processing(format!("Extraction task for {} failed: {}", path.display(), e)))
}

/// Label used for output files: the statement period, or the input file stem.
fn output_label(path: &Path, extraction: &Extraction) -> String {
    report::period_label(&extraction.records).unwrap_or_else(|| file_stem(path))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string())
}

/// Returns `label`, or a variant suffixed with the input's file stem (and a
/// counter if needed) when an earlier input in this run already claimed it.
fn claim_label(label: String, path: &Path, used: &mut HashSet<String>) -> String {
    if used.insert(label.clone()) {
        return label;
    }

    let base = format!("{}_{}", label, file_stem(path));
    let mut candidate = base.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    tracing::warn!(
        "Output label {} already used in this run, writing {} as {}",
        label,
        path.display(),
        candidate
    );
    candidate
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);
    let settings = args.settings();

    // 3. Load presentation lookups and initialize storage
    let merchants = MerchantMap::load(&args.merchant_map)?;
    let categories = CategoryConfig::load(&args.categories)?;
    tracing::debug!("Loaded {} merchant aliases and {} categories", merchants.len(), categories.len());
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Extract every statement independently
    let extractor = Arc::new(StatementExtractor::new(settings));
    let handles: Vec<_> = args
        .inputs
        .iter()
        .cloned()
        .map(|path| tokio::spawn(process_statement(path, Arc::clone(&extractor))))
        .collect();

    // 5. Save results in input order
    let mut success_count = 0;
    let mut failure_count = 0;
    let mut used_labels = HashSet::new();

    for (path, handle) in args.inputs.iter().zip(handles) {
        let extraction = match handle.await {
            Ok(Ok(extraction)) => extraction,
            Ok(Err(e)) => {
                tracing::error!("Failed to process {}: {}", path.display(), e);
                failure_count += 1;
                continue;
            }
            Err(e) => {
                tracing::error!("Processing task for {} panicked: {}", path.display(), e);
                failure_count += 1;
                continue;
            }
        };

        if extraction.records.is_empty() {
            tracing::warn!("No transactions extracted from {}", path.display());
            failure_count += 1;
            continue;
        }

        let label = claim_label(output_label(path, &extraction), path, &mut used_labels);
        let summary = StatementSummary::build(&extraction.records, &merchants, &categories);

        match storage.save_records(&label, &extraction.records) {
            Ok(saved) => tracing::info!("Saved records to: {}", saved.display()),
            Err(e) => tracing::error!("Failed to save records: {}", e),
        }
        match storage.save_summary(&label, path, &extraction, &summary) {
            Ok(saved) => tracing::info!("Saved summary to: {}", saved.display()),
            Err(e) => tracing::error!("Failed to save summary: {}", e),
        }

        println!(
            "{}: {} transactions, outcome ${:.2}, refund ${:.2}, net ${:.2}",
            label, summary.transaction_count, summary.total_outcome, summary.total_refund, summary.net_spend
        );
        success_count += 1;
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract transactions from any of {} statements",
            failure_count
        )));
    }

    Ok(())
}
