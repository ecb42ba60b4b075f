// src/extractors/mod.rs
pub mod line_token;
pub mod records;
pub mod shape;
pub mod text_runs;
pub mod year_context;

use chrono::Datelike;
use serde::Serialize;

// Re-export key extraction types for convenience
pub use records::{RolloverPolicy, TransactionRecord};
pub use shape::Shape;
pub use year_context::YearContext;

use records::extract_records;
use shape::discover_shape;
use text_runs::{merge_text_runs, TokenizedLines};
use year_context::resolve_year_context;

/// Knobs for the pattern-discovery pipeline.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub rollover: RolloverPolicy,
    /// Forces the primary year instead of voting on the document's year mentions.
    pub year_override: Option<i32>,
    /// Upper bound (plus one) and fallback for year detection.
    pub current_year: i32,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            rollover: RolloverPolicy::default(),
            year_override: None,
            current_year: chrono::Local::now().year(),
        }
    }
}

/// Result of running the pipeline over one statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub year_context: YearContext,
    /// `None` when no recurring transaction pattern was found.
    pub shape: Option<Shape>,
    pub records: Vec<TransactionRecord>,
}

/// Template-free transaction extractor for statement text.
pub struct StatementExtractor {
    settings: ExtractorSettings,
}

impl StatementExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    /// Runs year resolution, classification, text-run merging, shape discovery
    /// and record extraction over one statement's lines.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Extraction {
        let mut year_context = resolve_year_context(lines, self.settings.current_year);
        if let Some(year) = self.settings.year_override {
            tracing::debug!("Overriding detected year {} with {}", year_context.primary_year, year);
            year_context.primary_year = year;
        }

        if lines.is_empty() {
            tracing::warn!("Statement has no text lines");
            return Extraction { year_context, shape: None, records: Vec::new() };
        }

        let merged = merge_text_runs(&TokenizedLines::classify(lines));
        let Some(shape) = discover_shape(merged.tokens()) else {
            tracing::warn!("{}", crate::utils::error::ExtractError::NoPatternFound);
            return Extraction { year_context, shape: None, records: Vec::new() };
        };
        tracing::info!(
            "Detected transaction shape {} (year {}, spans two years: {})",
            shape,
            year_context.primary_year,
            year_context.spans_two_years
        );

        let records = extract_records(&merged, &shape, &year_context, self.settings.rollover);
        Extraction { year_context, shape: Some(shape), records }
    }
}

/// Splits extracted statement text into trimmed, non-empty lines in reading order.
pub fn lines_from_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
