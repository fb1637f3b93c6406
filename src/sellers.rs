use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::{period_of, Period};
use crate::schema::{LicenseType, SalesRecord, TimeGranularity};

/// One cell of the static seller breakdown: total sales for a
/// (manager, region, product, license type) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerBreakdownRow {
    pub sales_manager: String,
    pub region: String,
    pub product: String,
    pub license_type: LicenseType,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerPeriodRow {
    pub sales_manager: String,
    pub period: Period,
    /// Display form of the period ("2016Q2" or "2016-04").
    pub period_label: String,
    pub amount: f64,
}

/// Sales per (manager, region, product, license type), largest first.
pub fn seller_performance(records: &[SalesRecord]) -> Vec<SellerBreakdownRow> {
    let mut groups: BTreeMap<(&str, &str, &str, LicenseType), f64> = BTreeMap::new();
    for record in records {
        let key = (
            record.sales_manager.as_str(),
            record.region.as_str(),
            record.product.as_str(),
            record.license_type,
        );
        *groups.entry(key).or_insert(0.0) += record.amount;
    }

    let mut rows: Vec<SellerBreakdownRow> = groups
        .into_iter()
        .map(
            |((sales_manager, region, product, license_type), amount)| SellerBreakdownRow {
                sales_manager: sales_manager.to_string(),
                region: region.to_string(),
                product: product.to_string(),
                license_type,
                amount,
            },
        )
        .collect();

    // Descending by amount; ties keep the ascending group-key order from the
    // BTreeMap so output is a pure function of the input set.
    rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    rows
}

/// Sales per (manager, period) at the requested granularity, ascending by
/// manager then by period. Period ordering is date-derived, so month labels
/// sort correctly across year boundaries.
pub fn seller_performance_over_time(
    records: &[SalesRecord],
    granularity: TimeGranularity,
) -> Vec<SellerPeriodRow> {
    let mut groups: BTreeMap<(&str, Period), f64> = BTreeMap::new();
    for record in records {
        let key = (
            record.sales_manager.as_str(),
            period_of(record.date, granularity),
        );
        *groups.entry(key).or_insert(0.0) += record.amount;
    }

    groups
        .into_iter()
        .map(|((sales_manager, period), amount)| SellerPeriodRow {
            sales_manager: sales_manager.to_string(),
            period,
            period_label: period.to_string(),
            amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::builtin_dataset;
    use chrono::NaiveDate;

    #[test]
    fn test_seller_performance_groups_and_sorts() {
        let dataset = builtin_dataset();
        let rows = seller_performance(&dataset.records);

        // Six records, six distinct (manager, region, product, type) keys.
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].sales_manager, "Seller_3");
        assert_eq!(rows[0].amount, 2500.0);
        for pair in rows.windows(2) {
            assert!(pair[0].amount >= pair[1].amount);
        }
    }

    #[test]
    fn test_seller_performance_merges_equal_keys() {
        let mut records = builtin_dataset().records;
        let mut repeat = records[0].clone();
        repeat.date = NaiveDate::from_ymd_opt(2016, 5, 2).unwrap();
        repeat.amount = 700.0;
        records.push(repeat);

        let rows = seller_performance(&records);
        assert_eq!(rows.len(), 6);
        let merged = rows
            .iter()
            .find(|r| r.sales_manager == "Seller_1" && r.region == "UK" && r.amount == 2200.0);
        assert!(merged.is_some());
    }

    #[test]
    fn test_over_time_quarter_granularity() {
        let dataset = builtin_dataset();
        let rows = seller_performance_over_time(&dataset.records, TimeGranularity::Quarter);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].sales_manager, "Seller_1");
        assert_eq!(rows[0].period_label, "2016Q2");
        assert_eq!(rows[0].amount, 1500.0 + 1200.0);
        assert_eq!(rows[1].sales_manager, "Seller_2");
        assert_eq!(rows[1].amount, 2000.0 + 800.0);
        assert_eq!(rows[2].sales_manager, "Seller_3");
        assert_eq!(rows[2].amount, 500.0 + 2500.0);
    }

    #[test]
    fn test_over_time_month_ordering_across_year_boundary() {
        let mut records = builtin_dataset().records;
        for record in records.iter_mut() {
            record.sales_manager = "Seller_1".to_string();
        }
        records[0].date = NaiveDate::from_ymd_opt(2012, 9, 10).unwrap();
        records[1].date = NaiveDate::from_ymd_opt(2012, 10, 10).unwrap();
        records[2].date = NaiveDate::from_ymd_opt(2013, 1, 10).unwrap();
        records.truncate(3);

        let rows = seller_performance_over_time(&records, TimeGranularity::Month);
        let labels: Vec<&str> = rows.iter().map(|r| r.period_label.as_str()).collect();
        assert_eq!(labels, vec!["2012-09", "2012-10", "2013-01"]);
    }

    #[test]
    fn test_over_time_sorted_by_manager_then_period() {
        let mut records = builtin_dataset().records;
        let mut later = records[5].clone();
        later.date = NaiveDate::from_ymd_opt(2016, 7, 2).unwrap();
        records.push(later);

        let rows = seller_performance_over_time(&records, TimeGranularity::Quarter);
        let keys: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.sales_manager.clone(), r.period_label.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
