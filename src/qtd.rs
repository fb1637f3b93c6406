use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{days_left_in_quarter, Quarter};
use crate::schema::SalesRecord;

/// Quarter-to-date KPI block. Every field is an aggregate over the records
/// falling in `[quarter start, as-of date]`; an empty window yields zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtdMetrics {
    pub quarter: Quarter,
    pub as_of: NaiveDate,
    pub days_left_eoq: i64,
    pub qtd_transactions: u64,
    /// Distinct companies with at least one sale in the window.
    pub qtd_active_clients: usize,
    /// Distinct sales managers with at least one sale in the window.
    pub qtd_sams: usize,
    pub qtd_sales: f64,
    pub admins: u64,
    pub designers: u64,
    pub servers: u64,
}

/// Computes the QTD block as of `as_of`.
///
/// The quarter window is always derived here from `as_of` and applied to the
/// full record set, so callers must not pre-window the input; pre-filtering
/// by product/region/license type is fine.
pub fn calculate_qtd_metrics(records: &[SalesRecord], as_of: NaiveDate) -> QtdMetrics {
    let quarter = Quarter::containing(as_of);
    let quarter_start = quarter.start_date();

    let mut qtd_transactions = 0u64;
    let mut qtd_sales = 0f64;
    let mut admins = 0u64;
    let mut designers = 0u64;
    let mut servers = 0u64;
    let mut companies: BTreeSet<&str> = BTreeSet::new();
    let mut managers: BTreeSet<&str> = BTreeSet::new();

    for record in records {
        if record.date < quarter_start || record.date > as_of {
            continue;
        }
        qtd_transactions += record.transactions;
        qtd_sales += record.amount;
        admins += record.admins;
        designers += record.designers;
        servers += record.servers;
        companies.insert(&record.company);
        managers.insert(&record.sales_manager);
    }

    QtdMetrics {
        quarter,
        as_of,
        days_left_eoq: days_left_in_quarter(as_of),
        qtd_transactions,
        qtd_active_clients: companies.len(),
        qtd_sams: managers.len(),
        qtd_sales,
        admins,
        designers,
        servers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::builtin_dataset;

    #[test]
    fn test_empty_record_set_is_all_zero() {
        let as_of = NaiveDate::from_ymd_opt(2016, 4, 15).unwrap();
        let metrics = calculate_qtd_metrics(&[], as_of);

        assert_eq!(metrics.qtd_transactions, 0);
        assert_eq!(metrics.qtd_active_clients, 0);
        assert_eq!(metrics.qtd_sams, 0);
        assert_eq!(metrics.qtd_sales, 0.0);
        assert_eq!(metrics.admins, 0);
        assert_eq!(metrics.designers, 0);
        assert_eq!(metrics.servers, 0);
        assert_eq!(metrics.days_left_eoq, 76);
    }

    #[test]
    fn test_window_excludes_records_after_as_of() {
        let dataset = builtin_dataset();
        let as_of = NaiveDate::from_ymd_opt(2016, 4, 15).unwrap();
        let metrics = calculate_qtd_metrics(&dataset.records, as_of);

        // Four of the six built-in records fall on or before April 15.
        assert_eq!(metrics.qtd_transactions, 4);
        assert_eq!(metrics.qtd_active_clients, 4);
        assert_eq!(metrics.qtd_sams, 3);
        assert_eq!(metrics.qtd_sales, 1500.0 + 2000.0 + 500.0 + 1200.0);
        assert_eq!(metrics.admins, 5 + 2 + 0 + 3);
    }

    #[test]
    fn test_window_is_derived_from_as_of_not_caller() {
        // Records from a different quarter must not leak in even when the
        // caller passes them.
        let dataset = builtin_dataset();
        let as_of = NaiveDate::from_ymd_opt(2016, 8, 10).unwrap();
        let metrics = calculate_qtd_metrics(&dataset.records, as_of);

        assert_eq!(metrics.quarter, Quarter::new(2016, 3).unwrap());
        assert_eq!(metrics.qtd_sales, 0.0);
        assert_eq!(metrics.qtd_active_clients, 0);
    }

    #[test]
    fn test_full_quarter_window() {
        let dataset = builtin_dataset();
        let as_of = NaiveDate::from_ymd_opt(2016, 6, 30).unwrap();
        let metrics = calculate_qtd_metrics(&dataset.records, as_of);

        assert_eq!(metrics.days_left_eoq, 0);
        assert_eq!(metrics.qtd_transactions, 6);
        assert_eq!(metrics.qtd_sales, 8500.0);
        assert_eq!(metrics.qtd_active_clients, 6);
        assert_eq!(metrics.qtd_sams, 3);
    }
}
