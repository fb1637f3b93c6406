//! # Sales Report Builder
//!
//! A library for turning a flat log of software-license sales transactions
//! into the time-windowed and dimensional rollups a sales dashboard
//! presents.
//!
//! ## Core Concepts
//!
//! - **Sales Record**: one immutable sale event (date, product, license
//!   type, region/city, customer, amounts, license-unit counts)
//! - **Quarter Calendar**: typed quarter and period values with date-derived
//!   ordering; quarter boundary arithmetic and week numbering
//! - **Rollups**: pure aggregations recomputed per call (QTD KPIs, weekly
//!   running totals, quarterly trend, location totals, seller breakdowns)
//! - **Report Query**: an explicit, immutable filter/window struct replacing
//!   any notion of session-wide UI state
//!
//! Loading data (CSV, Excel, database) and rendering charts are external
//! collaborators; the engine only exchanges in-memory tabular rows.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_report_builder::*;
//! use chrono::NaiveDate;
//!
//! let dataset = samples::builtin_dataset();
//! let query = ReportQuery {
//!     product: Some("Product 1".to_string()),
//!     region: Some("UK".to_string()),
//!     as_of: NaiveDate::from_ymd_opt(2016, 4, 15),
//!     ..ReportQuery::new()
//! };
//!
//! let report = build_dashboard_report(&dataset, &query).unwrap();
//! println!("QTD sales: {}", report.qtd.unwrap().qtd_sales);
//! ```

pub mod calendar;
pub mod error;
pub mod ingestion;
pub mod location;
pub mod orders;
pub mod qtd;
pub mod samples;
pub mod schema;
pub mod sellers;
pub mod trend;
pub mod weekly;

pub use calendar::{
    available_quarters, days_left_in_quarter, default_quarter_selection, period_of,
    week_of_quarter, Period, Quarter,
};
pub use error::{Result, SalesReportError};
pub use ingestion::{convert_row, convert_rows_to_dataset, RawRecord};
pub use location::{city_performance, country_performance, format_amount, LocationTotal};
pub use orders::{last_n_orders, RecentOrder};
pub use qtd::{calculate_qtd_metrics, QtdMetrics};
pub use samples::{builtin_dataset, simulated_dataset};
pub use schema::{LicenseType, ReportQuery, SalesDataset, SalesRecord, TimeGranularity};
pub use sellers::{
    seller_performance, seller_performance_over_time, SellerBreakdownRow, SellerPeriodRow,
};
pub use trend::{quarterly_trend, QuarterlyTrendRow};
pub use weekly::{running_totals_by_week, WeeklyRunningTotal};

use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Every rollup the dashboard shows, computed in one pass over a filtered
/// record set. Rows are plain data; rendering belongs to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Quarters present in the filtered data, ascending.
    pub available_quarters: Vec<Quarter>,
    /// The quarters the running-totals series covers (explicit selection or
    /// the last-four default), ascending without duplicates.
    pub selected_quarters: Vec<Quarter>,
    /// None when no as-of date could be resolved (empty dataset, no
    /// explicit date).
    pub qtd: Option<QtdMetrics>,
    pub running_totals: Vec<WeeklyRunningTotal>,
    pub quarterly_trend: Vec<QuarterlyTrendRow>,
    pub country_performance: Vec<LocationTotal>,
    pub city_performance: Vec<LocationTotal>,
    pub seller_performance: Vec<SellerBreakdownRow>,
    pub seller_performance_over_time: Vec<SellerPeriodRow>,
    pub recent_orders: Vec<RecentOrder>,
}

pub struct SalesReportProcessor;

impl SalesReportProcessor {
    pub fn process(dataset: &SalesDataset, query: &ReportQuery) -> Result<DashboardReport> {
        validate_dataset(dataset)?;

        info!(
            "Building dashboard report over {} records",
            dataset.records.len()
        );

        let filtered: Vec<SalesRecord> = dataset
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        debug!(
            "{} records remain after product/license/region filters",
            filtered.len()
        );

        let available = available_quarters(&filtered);

        let selected: Vec<Quarter> = if query.selected_quarters.is_empty() {
            default_quarter_selection(&available)
        } else {
            let unique: BTreeSet<Quarter> = query.selected_quarters.iter().copied().collect();
            unique.into_iter().collect()
        };

        let as_of = resolve_as_of(query, &selected, &available);
        debug!("QTD as-of date resolved to {:?}", as_of);
        let qtd = as_of.map(|date| calculate_qtd_metrics(&filtered, date));

        Ok(DashboardReport {
            running_totals: running_totals_by_week(&filtered, &selected),
            quarterly_trend: quarterly_trend(&filtered),
            country_performance: country_performance(&filtered),
            city_performance: city_performance(&filtered),
            seller_performance: seller_performance(&filtered),
            seller_performance_over_time: seller_performance_over_time(
                &filtered,
                query.granularity,
            ),
            recent_orders: last_n_orders(&filtered, query.recent_orders),
            available_quarters: available,
            selected_quarters: selected,
            qtd,
        })
    }
}

pub fn build_dashboard_report(
    dataset: &SalesDataset,
    query: &ReportQuery,
) -> Result<DashboardReport> {
    SalesReportProcessor::process(dataset, query)
}

/// The QTD anchor: an explicit as-of date wins, then the end of the latest
/// selected quarter, then the end of the latest quarter with data.
fn resolve_as_of(
    query: &ReportQuery,
    selected: &[Quarter],
    available: &[Quarter],
) -> Option<NaiveDate> {
    query
        .as_of
        .or_else(|| selected.last().map(|quarter| quarter.end_date()))
        .or_else(|| available.last().map(|quarter| quarter.end_date()))
}

fn validate_dataset(dataset: &SalesDataset) -> Result<()> {
    for (index, record) in dataset.records.iter().enumerate() {
        if !record.amount.is_finite() || record.amount < 0.0 {
            return Err(SalesReportError::InvalidInput(format!(
                "record {} ({}): amount {} must be a non-negative number",
                index, record.company, record.amount
            )));
        }
        if record.transactions == 0 {
            return Err(SalesReportError::InvalidInput(format!(
                "record {} ({}): transaction count must be at least 1",
                index, record.company
            )));
        }
    }
    Ok(())
}
