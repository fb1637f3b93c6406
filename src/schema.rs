use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calendar::Quarter;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
pub enum LicenseType {
    #[serde(rename = "License")]
    #[schemars(description = "A new license sale")]
    License,

    #[serde(rename = "Maintenance Renewal")]
    #[schemars(description = "A renewal of an existing maintenance contract")]
    MaintenanceRenewal,
}

impl std::fmt::Display for LicenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseType::License => write!(f, "License"),
            LicenseType::MaintenanceRenewal => write!(f, "Maintenance Renewal"),
        }
    }
}

/// Aggregation granularity for time-series breakdowns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    Month,
    Quarter,
}

/// One sale event. Field names mirror the columns the loader supplies, so a
/// record set round-trips through serde without a mapping layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SalesRecord {
    #[serde(rename = "Date")]
    #[schemars(description = "Calendar date of the transaction, YYYY-MM-DD")]
    pub date: NaiveDate,

    #[serde(rename = "Product")]
    #[schemars(description = "Product identifier (e.g. 'Product 1')")]
    pub product: String,

    #[serde(rename = "License_Type")]
    #[schemars(description = "Whether this is a new license sale or a maintenance renewal")]
    pub license_type: LicenseType,

    #[serde(rename = "Region")]
    #[schemars(description = "Country/region code (e.g. 'UK', 'US')")]
    pub region: String,

    #[serde(rename = "City")]
    #[schemars(
        description = "City the sale is attributed to. Associated with the region but not validated against it."
    )]
    pub city: String,

    #[serde(rename = "Company")]
    #[schemars(description = "Customer identifier")]
    pub company: String,

    #[serde(rename = "Amount")]
    #[schemars(description = "Monetary value of the sale. Must be non-negative; currency is implied by the product.")]
    pub amount: f64,

    #[serde(rename = "Transactions")]
    #[schemars(description = "Count of underlying transactions this record represents. Must be at least 1.")]
    pub transactions: u64,

    #[serde(rename = "Active_Clients")]
    #[schemars(description = "1 if the customer counts as active, 0 otherwise")]
    pub active_clients: u64,

    #[serde(rename = "Sales_Manager")]
    #[schemars(description = "Salesperson identifier")]
    pub sales_manager: String,

    #[serde(rename = "Admins")]
    #[schemars(description = "Administrator license units sold")]
    pub admins: u64,

    #[serde(rename = "Designers")]
    #[schemars(description = "Designer license units sold")]
    pub designers: u64,

    #[serde(rename = "Servers")]
    #[schemars(description = "Server license units sold")]
    pub servers: u64,
}

/// Explicit, immutable query passed into every report build. Replaces the
/// kind of session-wide filter state a dashboard UI would otherwise hold.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportQuery {
    #[schemars(description = "Keep only records for this product. None keeps all products.")]
    pub product: Option<String>,

    #[schemars(description = "Keep only records with this license type. None keeps both.")]
    pub license_type: Option<LicenseType>,

    #[schemars(description = "Keep only records from this region. None keeps all regions.")]
    pub region: Option<String>,

    #[schemars(
        description = "Quarters to compute weekly running totals for. Empty falls back to the last four quarters present in the filtered data."
    )]
    pub selected_quarters: Vec<Quarter>,

    #[schemars(description = "Granularity of the per-seller time series")]
    pub granularity: TimeGranularity,

    #[schemars(
        description = "As-of date for the QTD block. None derives the end of the latest selected (or available) quarter."
    )]
    pub as_of: Option<NaiveDate>,

    #[schemars(description = "How many recent orders to list")]
    pub recent_orders: usize,
}

impl ReportQuery {
    pub fn new() -> Self {
        Self {
            product: None,
            license_type: None,
            region: None,
            selected_quarters: Vec::new(),
            granularity: TimeGranularity::Quarter,
            as_of: None,
            recent_orders: 5,
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(product) = &self.product {
            if &record.product != product {
                return false;
            }
        }
        if let Some(license_type) = self.license_type {
            if record.license_type != license_type {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if &record.region != region {
                return false;
            }
        }
        true
    }
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded record set. The loader (CSV, Excel, database, simulated) is an
/// external collaborator; this is the shape it must deliver.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SalesDataset {
    #[schemars(description = "All sale events, one record per row. Order does not matter.")]
    pub records: Vec<SalesRecord>,
}

impl SalesDataset {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SalesDataset)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
