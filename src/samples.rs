use chrono::{Days, NaiveDate};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::Normal;

use crate::schema::{LicenseType, SalesDataset, SalesRecord};

/// Region mix used by the simulated generator, weighted roughly like a
/// European software vendor with a US presence. Cities stay consistent with
/// their region.
const REGIONS: &[(&str, f64, &[&str])] = &[
    ("UK", 0.15, &["London", "Manchester", "Edinburgh"]),
    ("NO", 0.12, &["Oslo", "Bergen"]),
    ("GR", 0.08, &["Athens", "Thessaloniki"]),
    ("IT", 0.08, &["Rome", "Milan", "Naples"]),
    ("SP", 0.07, &["Madrid", "Barcelona", "Seville"]),
    ("LU", 0.05, &["Luxembourg City"]),
    ("US", 0.15, &["New York", "Los Angeles", "Chicago", "Houston"]),
    ("CA", 0.10, &["Toronto", "Vancouver", "Montreal"]),
    ("DE", 0.10, &["Berlin", "Munich", "Hamburg"]),
    ("FR", 0.10, &["Paris", "Marseille", "Lyon"]),
];

const PRODUCTS: &[&str] = &["Product 1", "Product 2"];
const NUM_COMPANIES: u32 = 20;
const NUM_SALES_MANAGERS: u32 = 15;

/// A small fixed dataset for demos and tests: six April 2016 sales.
pub fn builtin_dataset() -> SalesDataset {
    fn record(
        date: (i32, u32, u32),
        product: &str,
        license_type: LicenseType,
        region: &str,
        city: &str,
        company: &str,
        amount: f64,
        sales_manager: &str,
        units: (u64, u64, u64),
    ) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            product: product.to_string(),
            license_type,
            region: region.to_string(),
            city: city.to_string(),
            company: company.to_string(),
            amount,
            transactions: 1,
            active_clients: 1,
            sales_manager: sales_manager.to_string(),
            admins: units.0,
            designers: units.1,
            servers: units.2,
        }
    }

    use LicenseType::{License, MaintenanceRenewal};
    SalesDataset::new(vec![
        record(
            (2016, 4, 1),
            "Product 1",
            License,
            "UK",
            "London",
            "Company A",
            1500.0,
            "Seller_1",
            (5, 3, 1),
        ),
        record(
            (2016, 4, 5),
            "Product 2",
            MaintenanceRenewal,
            "NO",
            "Oslo",
            "Company B",
            2000.0,
            "Seller_2",
            (2, 1, 0),
        ),
        record(
            (2016, 4, 10),
            "Product 1",
            License,
            "GR",
            "Athens",
            "Company C",
            500.0,
            "Seller_3",
            (0, 0, 0),
        ),
        record(
            (2016, 4, 15),
            "Product 1",
            License,
            "UK",
            "Manchester",
            "Company D",
            1200.0,
            "Seller_1",
            (3, 2, 1),
        ),
        record(
            (2016, 4, 20),
            "Product 2",
            License,
            "IT",
            "Rome",
            "Company E",
            800.0,
            "Seller_2",
            (1, 0, 0),
        ),
        record(
            (2016, 4, 25),
            "Product 1",
            MaintenanceRenewal,
            "SP",
            "Madrid",
            "Company F",
            2500.0,
            "Seller_3",
            (4, 2, 1),
        ),
    ])
}

/// Generates a seeded random dataset spanning 2012-01-01 through 2016-06-15,
/// the window the dashboard was designed around. The same seed always yields
/// the same dataset.
pub fn simulated_dataset(num_records: usize, seed: u64) -> SalesDataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let start = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2016, 6, 15).unwrap();
    let span_days = (end - start).num_days() as u64;

    let region_weights: Vec<f64> = REGIONS.iter().map(|(_, weight, _)| *weight).collect();
    let region_index = WeightedIndex::new(&region_weights).unwrap();
    let amount_distribution = Normal::<f64>::new(2_050.0, 1_150.0).unwrap();

    let mut records = Vec::with_capacity(num_records);
    for _ in 0..num_records {
        let date = start + Days::new(rng.gen_range(0..=span_days));
        let (region, _, cities) = REGIONS[region_index.sample(&mut rng)];
        let city = *cities.choose(&mut rng).unwrap();
        let amount: f64 = amount_distribution
            .sample(&mut rng)
            .clamp(100.0, 5_000.0)
            .round();

        records.push(SalesRecord {
            date,
            product: (*PRODUCTS.choose(&mut rng).unwrap()).to_string(),
            license_type: if rng.gen_bool(0.5) {
                LicenseType::License
            } else {
                LicenseType::MaintenanceRenewal
            },
            region: region.to_string(),
            city: city.to_string(),
            company: format!("Company {}", rng.gen_range(1..=NUM_COMPANIES)),
            amount,
            transactions: rng.gen_range(1..=4),
            active_clients: rng.gen_range(0..=1),
            sales_manager: format!("Seller_{}", rng.gen_range(1..=NUM_SALES_MANAGERS)),
            admins: rng.gen_range(0..10),
            designers: rng.gen_range(0..8),
            servers: rng.gen_range(0..5),
        });
    }

    SalesDataset::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dataset_shape() {
        let dataset = builtin_dataset();
        assert_eq!(dataset.records.len(), 6);

        let total: f64 = dataset.records.iter().map(|r| r.amount).sum();
        assert_eq!(total, 8500.0);

        assert!(dataset
            .records
            .iter()
            .all(|r| r.date.format("%Y-%m").to_string() == "2016-04"));
    }

    #[test]
    fn test_simulated_dataset_is_deterministic_per_seed() {
        let a = simulated_dataset(200, 42);
        let b = simulated_dataset(200, 42);
        let a_json = serde_json::to_string(&a).unwrap();
        let b_json = serde_json::to_string(&b).unwrap();
        assert_eq!(a_json, b_json);

        let c = simulated_dataset(200, 7);
        assert_ne!(a_json, serde_json::to_string(&c).unwrap());
    }

    #[test]
    fn test_simulated_dataset_respects_bounds() {
        let dataset = simulated_dataset(500, 42);
        assert_eq!(dataset.records.len(), 500);

        let start = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2016, 6, 15).unwrap();
        for record in &dataset.records {
            assert!(record.date >= start && record.date <= end);
            assert!((100.0..=5_000.0).contains(&record.amount));
            assert!((1..=4).contains(&record.transactions));
            assert!(record.active_clients <= 1);
            let known_region = REGIONS.iter().any(|(name, _, cities)| {
                *name == record.region && cities.contains(&record.city.as_str())
            });
            assert!(known_region, "unknown region/city {}", record.city);
        }
    }
}
