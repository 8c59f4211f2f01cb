//! Grouping of raw daily records by organizational unit.

use std::collections::HashMap;

use crate::domain::{OrgUnit, ProfitRecord, ProfitSeries, UnitKey};

/// All records of one unit, date-ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitGroup {
    pub unit: OrgUnit,
    pub records: Vec<ProfitRecord>,
}

/// Group records by `(company_id, warehouse_id)`.
///
/// Roster units without records become empty groups. A group's identity is
/// taken from its first record when it has one, otherwise from the roster.
///
/// Records are sorted with a stable sort, so two records of the same unit on
/// the same date stay in input order and both are kept.
pub fn group_by_unit(records: Vec<ProfitRecord>, roster: &[OrgUnit]) -> HashMap<UnitKey, UnitGroup> {
    let mut grouped: HashMap<UnitKey, UnitGroup> = HashMap::new();

    for record in records {
        let group = grouped.entry(record.unit.key()).or_insert_with(|| UnitGroup {
            unit: record.unit.clone(),
            records: Vec::new(),
        });
        group.records.push(record);
    }

    for unit in roster {
        grouped.entry(unit.key()).or_insert_with(|| UnitGroup {
            unit: unit.clone(),
            records: Vec::new(),
        });
    }

    for group in grouped.values_mut() {
        group.records.sort_by_key(|r| r.date);
    }

    grouped
}

/// Sort series by company name, then warehouse name.
///
/// The key breaks ties between units that share both names so the order never
/// depends on map iteration.
pub fn order_series(mut series: Vec<ProfitSeries>) -> Vec<ProfitSeries> {
    series.sort_by(|a, b| {
        a.unit
            .company_name
            .cmp(&b.unit.company_name)
            .then_with(|| a.unit.warehouse_name.cmp(&b.unit.warehouse_name))
            .then_with(|| a.unit.key().cmp(&b.unit.key()))
    });
    series
}
