// src/extractors/year_context.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use super::line_token::is_month_day;

// --- Constants ---
/// Lines within this distance of a "DUE" mention are ignored when voting for the year.
const DUE_EXCLUSION_RADIUS: usize = 5;
/// Earliest year accepted as a statement year.
const MIN_STATEMENT_YEAR: i32 = 2000;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})\b").expect("Failed to compile YEAR_RE")
});

/// Reference year of a statement and whether its period crosses New Year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearContext {
    pub primary_year: i32,
    pub spans_two_years: bool,
}

/// Infers the statement's reference year from the most frequent plausible year
/// outside due-date neighbourhoods, and flags Dec/Jan spanning periods.
pub fn resolve_year_context<S: AsRef<str>>(lines: &[S], current_year: i32) -> YearContext {
    let excluded = due_date_neighbourhood(lines);
    tracing::trace!("Excluding {} lines near due-date mentions", excluded.len());

    // Tally in first-seen order so ties resolve to the earliest candidate.
    let mut tally: Vec<(i32, usize)> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if excluded.contains(&idx) {
            continue;
        }
        for caps in YEAR_RE.captures_iter(line.as_ref()) {
            let year = match caps[1].parse::<i32>() {
                Ok(year) => year,
                Err(_) => continue,
            };
            if !(MIN_STATEMENT_YEAR..=current_year.saturating_add(1)).contains(&year) {
                continue;
            }
            match tally.iter_mut().find(|(seen, _)| *seen == year) {
                Some((_, count)) => *count += 1,
                None => tally.push((year, 1)),
            }
        }
    }

    let mut best: Option<(i32, usize)> = None;
    for &(year, count) in &tally {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((year, count));
        }
    }
    let primary_year = match best {
        Some((year, count)) => {
            tracing::debug!("Primary statement year {} ({} mentions)", year, count);
            year
        }
        None => {
            tracing::debug!("No plausible year found, falling back to {}", current_year);
            current_year
        }
    };

    let mut found_jan = false;
    let mut found_dec = false;
    for line in lines {
        let line = line.as_ref();
        if !is_month_day(line) {
            continue;
        }
        let upper = line.to_uppercase();
        if upper.starts_with("JAN") {
            found_jan = true;
        } else if upper.starts_with("DEC") {
            found_dec = true;
        }
    }

    YearContext {
        primary_year,
        spans_two_years: found_jan && found_dec,
    }
}

/// Indices of every line within `DUE_EXCLUSION_RADIUS` of a line mentioning "DUE".
fn due_date_neighbourhood<S: AsRef<str>>(lines: &[S]) -> HashSet<usize> {
    let mut excluded = HashSet::new();
    for (idx, line) in lines.iter().enumerate() {
        if !line.as_ref().to_uppercase().contains("DUE") {
            continue;
        }
        let start = idx.saturating_sub(DUE_EXCLUSION_RADIUS);
        let end = (idx + DUE_EXCLUSION_RADIUS).min(lines.len() - 1);
        excluded.extend(start..=end);
    }
    excluded
}
