//! Synthetic daily sales/cost records for demos and tests.
//!
//! Generates a roster of `companies × warehouses` units and, for each unit and
//! day of the range, either no activity (with probability `skip_prob`) or a
//! sales figure with a cost between 50% and 110% of it, so some days lose
//! money. Output is fully determined by the seed.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{DateRange, OrgUnit, ProfitRecord, SampleConfig};
use crate::error::AppError;

const COMPANY_NAMES: [&str; 6] = [
    "Aoba Trading",
    "Hikari Foods",
    "Kaede Logistics",
    "Minato Supply",
    "Sakura Retail",
    "Tsubasa Goods",
];
const WAREHOUSE_NAMES: [&str; 5] = ["Chiba", "Kawasaki", "Osaka", "Saitama", "Yokohama"];

const COST_RATIO_MIN: f64 = 0.5;
const COST_RATIO_MAX: f64 = 1.1;

#[derive(Debug, Clone)]
pub struct SampleData {
    pub units: Vec<OrgUnit>,
    pub records: Vec<ProfitRecord>,
}

pub fn generate_sample(config: &SampleConfig, range: DateRange) -> Result<SampleData, AppError> {
    if config.companies == 0 || config.warehouses == 0 {
        return Err(AppError::new(2, "Sample company and warehouse counts must be > 0."));
    }
    if !(0.0..1.0).contains(&config.skip_prob) {
        return Err(AppError::new(2, "Sample skip probability must be in [0, 1)."));
    }
    if !(config.sales_min.is_finite() && config.sales_max.is_finite() && config.sales_min <= config.sales_max) {
        return Err(AppError::new(2, "Invalid sample sales range."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let units: Vec<OrgUnit> = (0..config.companies)
        .flat_map(|c| (0..config.warehouses).map(move |w| (c, w)))
        .map(|(c, w)| OrgUnit::new(c as i64 + 1, name_for(&COMPANY_NAMES, c), w as i64 + 1, name_for(&WAREHOUSE_NAMES, w)))
        .collect();

    let mut records = Vec::with_capacity(units.len() * range.len_days());
    for unit in &units {
        for date in range.days() {
            if rng.gen_bool(config.skip_prob) {
                continue;
            }
            let sales = rng.gen_range(config.sales_min..=config.sales_max).round();
            let cost = (sales * rng.gen_range(COST_RATIO_MIN..=COST_RATIO_MAX)).round();
            records.push(ProfitRecord::new(unit.clone(), date, sales, cost));
        }
    }

    Ok(SampleData { units, records })
}

/// Names cycle through the list with a numeric suffix once it runs out.
fn name_for(names: &[&str], idx: usize) -> String {
    let base = names[idx % names.len()];
    match idx / names.len() {
        0 => base.to_string(),
        round => format!("{base} {}", round + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn same_seed_same_records() {
        let cfg = SampleConfig::default();
        let a = generate_sample(&cfg, range()).unwrap();
        let b = generate_sample(&cfg, range()).unwrap();
        assert_eq!(a.records, b.records);

        let other = generate_sample(&SampleConfig { seed: 7, ..cfg }, range()).unwrap();
        assert_ne!(a.records, other.records);
    }

    #[test]
    fn roster_covers_every_pair_and_records_stay_in_range() {
        let cfg = SampleConfig {
            companies: 3,
            warehouses: 2,
            ..SampleConfig::default()
        };
        let data = generate_sample(&cfg, range()).unwrap();
        assert_eq!(data.units.len(), 6);
        assert!(data.records.iter().all(|r| range().contains(r.date)));
        assert!(data.records.len() < 6 * range().len_days());
        for r in &data.records {
            assert!(r.cost() >= r.sales() * COST_RATIO_MIN - 1.0);
            assert!(r.cost() <= r.sales() * COST_RATIO_MAX + 1.0);
        }
    }

    #[test]
    fn zero_skip_probability_fills_every_day() {
        let cfg = SampleConfig {
            companies: 1,
            warehouses: 1,
            skip_prob: 0.0,
            ..SampleConfig::default()
        };
        let data = generate_sample(&cfg, range()).unwrap();
        assert_eq!(data.records.len(), range().len_days());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let bad = SampleConfig {
            skip_prob: 1.0,
            ..SampleConfig::default()
        };
        assert_eq!(generate_sample(&bad, range()).unwrap_err().exit_code(), 2);

        let bad = SampleConfig {
            companies: 0,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&bad, range()).is_err());
    }

    #[test]
    fn names_cycle_with_suffix() {
        assert_eq!(name_for(&WAREHOUSE_NAMES, 0), "Chiba");
        assert_eq!(name_for(&WAREHOUSE_NAMES, 5), "Chiba 2");
    }
}
