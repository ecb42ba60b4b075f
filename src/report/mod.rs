// src/report/mod.rs

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::extractors::TransactionRecord;
use crate::lookup::{CategoryConfig, MerchantMap};

/// Net amount attributed to one merchant or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedTotal {
    pub name: String,
    pub amount: Decimal,
}

/// Spending overview of one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    pub transaction_count: usize,
    /// Credits and refunds, reported as a positive number.
    pub total_refund: Decimal,
    pub total_outcome: Decimal,
    pub net_spend: Decimal,
    /// Sorted by category name.
    pub by_category: Vec<NamedTotal>,
    /// Canonical merchants by net amount, largest first.
    pub favorite_stores: Vec<NamedTotal>,
}

impl StatementSummary {
    pub fn build(records: &[TransactionRecord], merchants: &MerchantMap, categories: &CategoryConfig) -> Self {
        let mut total_refund = Decimal::ZERO;
        let mut total_outcome = Decimal::ZERO;
        let mut by_category: HashMap<&str, Decimal> = HashMap::new();
        let mut by_merchant: HashMap<&str, Decimal> = HashMap::new();

        for record in records {
            if record.amount < Decimal::ZERO {
                total_refund -= record.amount;
            } else {
                total_outcome += record.amount;
            }
            let merchant = merchants.canonical(&record.merchant);
            *by_merchant.entry(merchant).or_default() += record.amount;
            *by_category.entry(categories.categorize(merchant)).or_default() += record.amount;
        }

        let mut by_category = into_totals(by_category);
        by_category.sort_by(|a, b| a.name.cmp(&b.name));

        let mut favorite_stores = into_totals(by_merchant);
        favorite_stores.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));

        Self {
            transaction_count: records.len(),
            total_refund,
            total_outcome,
            net_spend: total_outcome - total_refund,
            by_category,
            favorite_stores,
        }
    }
}

fn into_totals(map: HashMap<&str, Decimal>) -> Vec<NamedTotal> {
    map.into_iter()
        .map(|(name, amount)| NamedTotal { name: name.to_string(), amount })
        .collect()
}

/// `{first}_to_{last}` from the first and last dated records, if any.
pub fn period_label(records: &[TransactionRecord]) -> Option<String> {
    let first = records.iter().find_map(|r| r.date)?;
    let last = records.iter().rev().find_map(|r| r.date)?;
    Some(format!("{}_to_{}", first, last))
}
