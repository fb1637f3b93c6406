use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::calendar::Quarter;
use crate::schema::SalesRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyTrendRow {
    pub quarter: Quarter,
    pub amount: f64,
    pub transactions: u64,
    /// Distinct companies with at least one sale in the quarter.
    pub active_clients: usize,
    /// Distinct sales managers with at least one sale in the quarter.
    pub sams: usize,
    pub admins: u64,
    pub designers: u64,
    pub servers: u64,
}

#[derive(Default)]
struct QuarterAccumulator<'a> {
    amount: f64,
    transactions: u64,
    companies: BTreeSet<&'a str>,
    managers: BTreeSet<&'a str>,
    admins: u64,
    designers: u64,
    servers: u64,
}

/// Per-quarter aggregates over the whole record set, one row per quarter
/// with data, ascending by `(year, number)`.
pub fn quarterly_trend(records: &[SalesRecord]) -> Vec<QuarterlyTrendRow> {
    let mut groups: BTreeMap<Quarter, QuarterAccumulator> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry(Quarter::containing(record.date))
            .or_default();
        entry.amount += record.amount;
        entry.transactions += record.transactions;
        entry.companies.insert(&record.company);
        entry.managers.insert(&record.sales_manager);
        entry.admins += record.admins;
        entry.designers += record.designers;
        entry.servers += record.servers;
    }

    groups
        .into_iter()
        .map(|(quarter, acc)| QuarterlyTrendRow {
            quarter,
            amount: acc.amount,
            transactions: acc.transactions,
            active_clients: acc.companies.len(),
            sams: acc.managers.len(),
            admins: acc.admins,
            designers: acc.designers,
            servers: acc.servers,
        })
        .collect()
}
