use serde::{Deserialize, Serialize};

use crate::schema::SalesRecord;

/// One line of the "latest orders" widget feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentOrder {
    pub company: String,
    pub amount: f64,
}

/// The `n` most recent orders, newest first. Records sharing a date keep
/// their input order.
pub fn last_n_orders(records: &[SalesRecord], n: usize) -> Vec<RecentOrder> {
    let mut by_date: Vec<&SalesRecord> = records.iter().collect();
    by_date.sort_by(|a, b| b.date.cmp(&a.date));

    by_date
        .into_iter()
        .take(n)
        .map(|record| RecentOrder {
            company: record.company.clone(),
            amount: record.amount,
        })
        .collect()
}
