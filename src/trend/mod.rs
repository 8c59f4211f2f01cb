//! Trend aggregation.
//!
//! Responsibilities:
//!
//! - group raw records by unit and sort them by date (`aggregate`)
//! - expand each group into a gap-free daily series (`fill`)
//! - compute per-series statistics (`stats`)

pub mod aggregate;
pub mod fill;
pub mod stats;

pub use aggregate::*;
pub use fill::*;
pub use stats::*;

use crate::domain::{DateRange, OrgUnit, ProfitRecord, ProfitSeries};

/// Run grouping, gap-filling and statistics for every unit.
///
/// The result is in display order (see [`order_series`]).
pub fn build_series(records: Vec<ProfitRecord>, roster: &[OrgUnit], range: DateRange) -> Vec<ProfitSeries> {
    let groups = group_by_unit(records, roster);

    let series = groups
        .into_values()
        .map(|group| {
            let unit = group.unit.clone();
            let records = fill_unit(group, range);
            let stats = compute_stats(&records);
            ProfitSeries { unit, records, stats }
        })
        .collect();

    order_series(series)
}
