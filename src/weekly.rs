use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::calendar::{week_of_quarter, Quarter};
use crate::schema::SalesRecord;

/// A quarter has at most ~13 seven-day weeks; anything past this is a stray
/// date and is dropped rather than skewing the tail of the series.
const MAX_WEEKS_PER_QUARTER: u32 = 14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRunningTotal {
    pub quarter: Quarter,
    /// 1-based seven-day week index within the quarter.
    pub week_number: u32,
    /// Sales booked in this week alone.
    pub weekly_sales: f64,
    /// Cumulative sales from the quarter start through this week.
    pub running_total: f64,
}

/// Weekly cumulative sales for each requested quarter.
///
/// Quarters are deduplicated and processed ascending. Weeks with no sales
/// produce no row; the cumulative total only advances on weeks with
/// activity. Quarters with no matching records contribute nothing, and an
/// empty quarter list yields an empty result.
pub fn running_totals_by_week(
    records: &[SalesRecord],
    quarters: &[Quarter],
) -> Vec<WeeklyRunningTotal> {
    let selection: BTreeSet<Quarter> = quarters.iter().copied().collect();

    let mut rows = Vec::new();
    for quarter in selection {
        let mut weekly: BTreeMap<u32, f64> = BTreeMap::new();
        for record in records {
            if Quarter::containing(record.date) != quarter {
                continue;
            }
            let week = week_of_quarter(record.date);
            if week > MAX_WEEKS_PER_QUARTER {
                continue;
            }
            *weekly.entry(week).or_insert(0.0) += record.amount;
        }

        let mut running_total = 0.0;
        for (week_number, weekly_sales) in weekly {
            running_total += weekly_sales;
            rows.push(WeeklyRunningTotal {
                quarter,
                week_number,
                weekly_sales,
                running_total,
            });
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::builtin_dataset;

    #[test]
    fn test_empty_selection_gives_empty_result() {
        let dataset = builtin_dataset();
        assert!(running_totals_by_week(&dataset.records, &[]).is_empty());
    }

    #[test]
    fn test_quarter_without_records_contributes_nothing() {
        let dataset = builtin_dataset();
        let q3 = Quarter::new(2016, 3).unwrap();
        assert!(running_totals_by_week(&dataset.records, &[q3]).is_empty());
    }

    #[test]
    fn test_weekly_grouping_and_cumsum() {
        let dataset = builtin_dataset();
        let q2 = Quarter::new(2016, 2).unwrap();
        let rows = running_totals_by_week(&dataset.records, &[q2]);

        // Apr 1 & 5 -> week 1, Apr 10 -> week 2, Apr 15 & 20 -> week 3,
        // Apr 25 -> week 4.
        let weeks: Vec<u32> = rows.iter().map(|r| r.week_number).collect();
        assert_eq!(weeks, vec![1, 2, 3, 4]);

        assert_eq!(rows[0].weekly_sales, 1500.0 + 2000.0);
        assert_eq!(rows[1].weekly_sales, 500.0);
        assert_eq!(rows[2].weekly_sales, 1200.0 + 800.0);
        assert_eq!(rows[3].weekly_sales, 2500.0);

        for pair in rows.windows(2) {
            assert!(pair[1].running_total >= pair[0].running_total);
        }
        assert_eq!(rows.last().unwrap().running_total, 8500.0);
    }

    #[test]
    fn test_final_running_total_equals_quarter_sum() {
        let dataset = builtin_dataset();
        let q2 = Quarter::new(2016, 2).unwrap();
        let rows = running_totals_by_week(&dataset.records, &[q2]);

        let quarter_total: f64 = dataset
            .records
            .iter()
            .filter(|r| Quarter::containing(r.date) == q2)
            .map(|r| r.amount)
            .sum();
        assert_eq!(rows.last().unwrap().running_total, quarter_total);
    }

    #[test]
    fn test_selection_is_deduplicated_and_sorted() {
        let mut dataset = builtin_dataset();
        // Push one record into 2015Q4 so two quarters have data.
        let mut old = dataset.records[0].clone();
        old.date = chrono::NaiveDate::from_ymd_opt(2015, 11, 3).unwrap();
        dataset.records.push(old);

        let q2 = Quarter::new(2016, 2).unwrap();
        let q4_2015 = Quarter::new(2015, 4).unwrap();
        let rows = running_totals_by_week(&dataset.records, &[q2, q4_2015, q2]);

        assert_eq!(rows.first().unwrap().quarter, q4_2015);
        assert_eq!(rows.last().unwrap().quarter, q2);
        let q2_rows = rows.iter().filter(|r| r.quarter == q2).count();
        assert_eq!(q2_rows, 4);
    }
}
