use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Result, SalesReportError};
use crate::schema::{LicenseType, SalesDataset, SalesRecord};

/// One loosely-typed row as delivered by a loader (CSV, Excel, database).
/// Keys are the canonical column names; values may be JSON strings or
/// numbers depending on the source.
pub type RawRecord = BTreeMap<String, Value>;

/// Converts loader rows into a typed dataset.
///
/// A required column that is absent (or null) fails with `MissingField`; a
/// value that cannot be read as its column's type fails with
/// `InvalidInput`. Nothing is defaulted.
pub fn convert_rows_to_dataset(rows: &[RawRecord]) -> Result<SalesDataset> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            convert_row(row).map_err(|e| match e {
                SalesReportError::InvalidInput(msg) => {
                    SalesReportError::InvalidInput(format!("row {}: {}", index, msg))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<SalesRecord>>>()?;

    Ok(SalesDataset::new(records))
}

pub fn convert_row(row: &RawRecord) -> Result<SalesRecord> {
    Ok(SalesRecord {
        date: date_field(row, "Date")?,
        product: string_field(row, "Product")?,
        license_type: license_type_field(row, "License_Type")?,
        region: string_field(row, "Region")?,
        city: string_field(row, "City")?,
        company: string_field(row, "Company")?,
        amount: f64_field(row, "Amount")?,
        transactions: u64_field(row, "Transactions")?,
        active_clients: u64_field(row, "Active_Clients")?,
        sales_manager: string_field(row, "Sales_Manager")?,
        admins: u64_field(row, "Admins")?,
        designers: u64_field(row, "Designers")?,
        servers: u64_field(row, "Servers")?,
    })
}

fn raw_field<'a>(row: &'a RawRecord, field: &str) -> Result<&'a Value> {
    match row.get(field) {
        None | Some(Value::Null) => Err(SalesReportError::MissingField(field.to_string())),
        Some(value) => Ok(value),
    }
}

fn string_field(row: &RawRecord, field: &str) -> Result<String> {
    match raw_field(row, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(SalesReportError::InvalidInput(format!(
            "column '{}' is not a string: {}",
            field, other
        ))),
    }
}

fn date_field(row: &RawRecord, field: &str) -> Result<NaiveDate> {
    let raw = string_field(row, field)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        SalesReportError::InvalidInput(format!(
            "column '{}' is not a YYYY-MM-DD date: '{}'",
            field, raw
        ))
    })
}

fn f64_field(row: &RawRecord, field: &str) -> Result<f64> {
    let value = raw_field(row, field)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        // CSV loaders deliver every cell as a string.
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SalesReportError::InvalidInput(format!("column '{}' is not a number: {}", field, value))
    })
}

fn u64_field(row: &RawRecord, field: &str) -> Result<u64> {
    let value = raw_field(row, field)?;
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SalesReportError::InvalidInput(format!(
            "column '{}' is not a non-negative integer: {}",
            field, value
        ))
    })
}

fn license_type_field(row: &RawRecord, field: &str) -> Result<LicenseType> {
    let raw = string_field(row, field)?;
    match raw.as_str() {
        "License" => Ok(LicenseType::License),
        "Maintenance Renewal" => Ok(LicenseType::MaintenanceRenewal),
        other => Err(SalesReportError::InvalidInput(format!(
            "column '{}' has unknown license type '{}'",
            field, other
        ))),
    }
}
