// src/extractors/records.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use super::line_token::LineToken;
use super::shape::Shape;
use super::text_runs::TokenizedLines;
use super::year_context::YearContext;
use crate::utils::error::ExtractError;

/// One transaction recovered from a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// `None` when the month/day/year combination is not a real date.
    pub date: Option<NaiveDate>,
    pub merchant: String,
    pub amount: Decimal,
}

/// Which month is moved into the following year when a statement spans New Year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RolloverPolicy {
    /// December lines get `primary_year + 1`.
    #[default]
    December,
    /// January lines get `primary_year + 1`.
    January,
}

impl RolloverPolicy {
    fn month_abbrev(self) -> &'static str {
        match self {
            RolloverPolicy::December => "DEC",
            RolloverPolicy::January => "JAN",
        }
    }

    /// Year for a DATE line whose month abbreviation is `month`.
    pub fn year_for(self, month: &str, ctx: &YearContext) -> i32 {
        if ctx.spans_two_years && month.eq_ignore_ascii_case(self.month_abbrev()) {
            ctx.primary_year.saturating_add(1)
        } else {
            ctx.primary_year
        }
    }
}

/// Parses an AMOUNT line such as `-$1,234.56` into a signed decimal.
pub fn parse_amount(raw: &str) -> Result<Decimal, ExtractError> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    Decimal::from_str(&cleaned).map_err(|_| ExtractError::UnparsableAmount(raw.to_string()))
}

/// Builds a calendar date from a `Mon D` line and a year; `None` if the day
/// does not exist in that month.
pub fn compose_date(date_line: &str, year: i32) -> Option<NaiveDate> {
    let mut parts = date_line.split_whitespace();
    let month = parts.next()?;
    let day = parts.next()?;
    NaiveDate::parse_from_str(&format!("{} {} {}", month, day, year), "%b %d %Y").ok()
}

/// Walks the merged lines, emitting one record per non-overlapping occurrence
/// of `shape`. Unmatched positions are skipped one at a time.
pub fn extract_records(
    merged: &TokenizedLines,
    shape: &Shape,
    ctx: &YearContext,
    rollover: RolloverPolicy,
) -> Vec<TransactionRecord> {
    let (date_slot, amount_slot) = match (shape.position(LineToken::Date), shape.position(LineToken::Amount)) {
        (Some(d), Some(a)) => (d, a),
        _ => return Vec::new(),
    };

    let tokens = merged.tokens();
    let lines = merged.lines();
    let width = shape.len();
    let mut records = Vec::new();
    let mut cursor = 0;

    while cursor + width <= tokens.len() {
        if !shape.matches(&tokens[cursor..cursor + width]) {
            cursor += 1;
            continue;
        }

        let window = &lines[cursor..cursor + width];
        let date_line = &window[date_slot];
        let amount_line = &window[amount_slot];

        let merchant = shape
            .tokens()
            .iter()
            .zip(window)
            .filter(|(token, _)| **token == LineToken::Text)
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        match parse_amount(amount_line) {
            Ok(amount) => {
                let month = date_line.split_whitespace().next().unwrap_or_default();
                let year = rollover.year_for(month, ctx);
                let date = compose_date(date_line, year);
                if date.is_none() {
                    tracing::warn!("Could not compose a date from '{}' in {}", date_line, year);
                }
                records.push(TransactionRecord { date, merchant, amount });
            }
            Err(e) => {
                tracing::warn!("Skipping transaction at line {}: {}", cursor, e);
            }
        }
        cursor += width;
    }

    tracing::debug!("Extracted {} records using shape {}", records.len(), shape);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::text_runs::merge_text_runs;
    use LineToken::{Amount as A, Date as D, Text as T};

    fn ctx(primary_year: i32, spans_two_years: bool) -> YearContext {
        YearContext { primary_year, spans_two_years }
    }

    fn merged(lines: &[&str]) -> TokenizedLines {
        merge_text_runs(&TokenizedLines::classify(lines))
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("-$1,234.56").unwrap(), Decimal::new(-123456, 2));
        assert_eq!(parse_amount("45.00").unwrap(), Decimal::new(4500, 2));
        assert_eq!(parse_amount("45.00").unwrap().to_string(), "45.00");
        assert!(matches!(parse_amount("$,"), Err(ExtractError::UnparsableAmount(_))));
    }

    #[test]
    fn test_compose_date() {
        assert_eq!(compose_date("Jan 5", 2024), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(compose_date("dec 31", 2023), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(compose_date("Feb 29", 2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(compose_date("Feb 29", 2023), None);
        assert_eq!(compose_date("Jan", 2023), None);
    }

    #[test]
    fn test_extracts_non_overlapping_windows() {
        let lines = merged(&["Header", "Jan 10", "WALMART", "45.67", "Jan 15", "AMAZON.CA", "-12.00", "Footer"]);
        let shape = Shape::new(&[D, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].merchant, "WALMART");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(records[1].amount, Decimal::new(-1200, 2));
    }

    #[test]
    fn test_merchant_joins_every_text_slot() {
        let lines = merged(&["Jan 3", "COFFEE", "1234567890", "VANCOUVER", "4.50"]);
        let shape = Shape::new(&[D, T, LineToken::IdNumber, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].merchant, "COFFEE VANCOUVER");
    }

    #[test]
    fn test_uses_first_date_slot() {
        let lines = merged(&["Jan 3", "Jan 5", "STORE", "9.99"]);
        let shape = Shape::new(&[D, D, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn test_invalid_date_keeps_record() {
        let lines = merged(&["Feb 30", "STORE", "9.99"]);
        let shape = Shape::new(&[D, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].amount, Decimal::new(999, 2));
    }

    #[test]
    fn test_unparsable_amount_skips_record() {
        // Non-ASCII digits satisfy the AMOUNT pattern but are not a decimal number
        let lines = merged(&["Jan 1", "BAD", "\u{664}\u{665}.\u{660}\u{660}", "Jan 2", "GOOD", "1.00"]);
        assert_eq!(lines.tokens()[2], A);
        let shape = Shape::new(&[D, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].merchant, "GOOD");
    }

    #[test]
    fn test_december_rollover_policy() {
        let lines = merged(&["Dec 28", "SHOP", "1.00", "Jan 15", "SHOP", "2.00"]);
        let shape = Shape::new(&[D, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, true), RolloverPolicy::December);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 12, 28));
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_january_rollover_policy() {
        let lines = merged(&["Dec 28", "SHOP", "1.00", "Jan 15", "SHOP", "2.00"]);
        let shape = Shape::new(&[D, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, true), RolloverPolicy::January);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 12, 28));
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2025, 1, 15));
    }

    #[test]
    fn test_rollover_needs_year_span() {
        let lines = merged(&["Dec 28", "SHOP", "1.00"]);
        let shape = Shape::new(&[D, T, A]).unwrap();
        let records = extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 12, 28));
    }

    #[test]
    fn test_window_at_end_of_sequence() {
        let lines = merged(&["Jan 1", "A", "1.00"]);
        let shape = Shape::new(&[D, T, A]).unwrap();
        assert_eq!(extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December).len(), 1);

        let lines = merged(&["Jan 1", "A"]);
        assert!(extract_records(&lines, &shape, &ctx(2024, false), RolloverPolicy::December).is_empty());
    }
}
