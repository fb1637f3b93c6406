use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::SalesRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTotal {
    /// Region code or city name, depending on the rollup.
    pub name: String,
    pub amount: f64,
    /// Tiered display string ("$451K", "$1.2M", "$999").
    pub formatted_amount: String,
}

/// Total sales per region, largest first.
pub fn country_performance(records: &[SalesRecord]) -> Vec<LocationTotal> {
    totals_by(records, |r| r.region.as_str())
}

/// Total sales per city, largest first.
pub fn city_performance(records: &[SalesRecord]) -> Vec<LocationTotal> {
    totals_by(records, |r| r.city.as_str())
}

fn totals_by<'a, F>(records: &'a [SalesRecord], key: F) -> Vec<LocationTotal>
where
    F: Fn(&'a SalesRecord) -> &'a str,
{
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *groups.entry(key(record)).or_insert(0.0) += record.amount;
    }

    let mut rows: Vec<LocationTotal> = groups
        .into_iter()
        .map(|(name, amount)| LocationTotal {
            name: name.to_string(),
            amount,
            formatted_amount: format_amount(amount),
        })
        .collect();

    // Descending by amount; the BTreeMap iteration order makes ties resolve
    // ascending by name.
    rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    rows
}

/// Tiered dashboard formatting: millions to one decimal, thousands to whole
/// K, smaller amounts as whole dollars.
pub fn format_amount(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("${:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("${:.0}K", amount / 1_000.0)
    } else {
        format!("${:.0}", amount)
    }
}
