// src/lookup/mod.rs
//! Read-only merchant and category tables used when presenting extracted records.
//! The extraction pipeline never consults them.

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::utils::error::LookupError;

/// Category assigned to merchants no keyword matches.
pub const UNCATEGORIZED: &str = "Other";

/// Maps merchant spellings seen on statements to one canonical name.
#[derive(Debug, Clone, Default)]
pub struct MerchantMap {
    map: HashMap<String, String>,
}

impl MerchantMap {
    /// Loads a JSON object of `variant -> canonical`. A missing file gives an empty map.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        match read_table(path.as_ref())? {
            Some(map) => Ok(Self { map }),
            None => Ok(Self::default()),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Canonical name for `merchant`, or `merchant` itself when unmapped.
    pub fn canonical<'a>(&'a self, merchant: &'a str) -> &'a str {
        self.map.get(merchant).map(String::as_str).unwrap_or(merchant)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// Keyword patterns per spending category.
#[derive(Debug, Clone, Default)]
pub struct CategoryConfig {
    // File order is kept: a later category overrides an earlier match.
    categories: Vec<(String, Regex)>,
}

impl CategoryConfig {
    /// Loads a JSON object of `category -> [pattern, ...]`. A missing file gives
    /// an empty configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Category file {} not found, using no categories", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let invalid = |source: serde_json::Error| LookupError::InvalidTable {
            path: path.display().to_string(),
            source,
        };
        // `preserve_order` keeps the file's key order in `Map`.
        let table: Map<String, Value> = serde_json::from_str(&raw).map_err(invalid)?;
        let mut entries = Vec::with_capacity(table.len());
        for (category, patterns) in table {
            let patterns: Vec<String> = serde_json::from_value(patterns).map_err(invalid)?;
            entries.push((category, patterns));
        }
        Self::from_entries(entries)
    }

    pub fn from_entries<I, K, P>(entries: I) -> Result<Self, LookupError>
    where
        I: IntoIterator<Item = (K, Vec<P>)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        let mut categories = Vec::new();
        for (category, patterns) in entries {
            let category = category.into();
            // A category with no keywords can never match.
            if patterns.is_empty() {
                continue;
            }
            let alternation = patterns.iter().map(|p| p.as_ref()).collect::<Vec<_>>().join("|");
            let re = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|e| LookupError::InvalidPattern {
                    category: category.clone(),
                    message: e.to_string(),
                })?;
            categories.push((category, re));
        }
        Ok(Self { categories })
    }

    /// Category of `merchant`; the last matching category wins.
    pub fn categorize(&self, merchant: &str) -> &str {
        self.categories
            .iter()
            .rev()
            .find(|(_, re)| re.is_match(merchant))
            .map(|(name, _)| name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

fn read_table(path: &Path) -> Result<Option<HashMap<String, String>>, LookupError> {
    if !path.exists() {
        tracing::debug!("Lookup file {} not found, using an empty table", path.display());
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    let table = serde_json::from_str(&raw).map_err(|source| LookupError::InvalidTable {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(table))
}
