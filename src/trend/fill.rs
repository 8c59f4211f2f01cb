//! Gap-filling: one record per calendar day of the analysis range.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{DateRange, OrgUnit, ProfitRecord};
use crate::trend::aggregate::UnitGroup;

/// Expand a date-ordered record list into a contiguous daily series.
///
/// Missing days become zero records that copy the identity of the first input
/// record. An empty input has no identity to copy and is returned unchanged.
pub fn fill_missing_dates(records: Vec<ProfitRecord>, range: DateRange) -> Vec<ProfitRecord> {
    let Some(template) = records.first().map(|r| r.unit.clone()) else {
        return records;
    };
    fill_with_template(&template, records, range)
}

/// Gap-fill a group using the group's own identity as the template.
///
/// Unlike [`fill_missing_dates`], a group without records still yields a full
/// zero series for its unit.
pub fn fill_unit(group: UnitGroup, range: DateRange) -> Vec<ProfitRecord> {
    let UnitGroup { unit, records } = group;
    fill_with_template(&unit, records, range)
}

fn fill_with_template(template: &OrgUnit, records: Vec<ProfitRecord>, range: DateRange) -> Vec<ProfitRecord> {
    // Later records win on duplicate dates.
    let mut by_date: HashMap<NaiveDate, ProfitRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_date.insert(record.date, record);
    }

    range
        .days()
        .map(|date| {
            by_date
                .remove(&date)
                .unwrap_or_else(|| ProfitRecord::zero(template.clone(), date))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn unit() -> OrgUnit {
        OrgUnit::new(1, "Acme", 5, "West")
    }

    #[test]
    fn fills_every_day_in_range_with_zero_records() {
        let range = DateRange::new(day(1), day(5)).unwrap();
        let records = vec![
            ProfitRecord::new(unit(), day(2), 100.0, 30.0),
            ProfitRecord::new(unit(), day(4), 50.0, 80.0),
        ];

        let filled = fill_missing_dates(records, range);
        assert_eq!(filled.len(), range.len_days());

        let dates: Vec<_> = filled.iter().map(|r| r.date).collect();
        assert_eq!(dates, range.days().collect::<Vec<_>>());

        let profits: Vec<_> = filled.iter().map(|r| r.profit()).collect();
        assert_eq!(profits, vec![0.0, 70.0, 0.0, -30.0, 0.0]);

        let synthetic = &filled[0];
        assert_eq!(synthetic.unit, unit());
        assert_eq!((synthetic.sales(), synthetic.cost()), (0.0, 0.0));
    }

    #[test]
    fn empty_input_is_returned_unchanged() {
        let range = DateRange::new(day(1), day(3)).unwrap();
        assert!(fill_missing_dates(Vec::new(), range).is_empty());
    }

    #[test]
    fn records_outside_range_are_dropped() {
        let range = DateRange::new(day(2), day(3)).unwrap();
        let records = vec![
            ProfitRecord::new(unit(), day(1), 999.0, 0.0),
            ProfitRecord::new(unit(), day(3), 10.0, 0.0),
        ];
        let profits: Vec<_> = fill_missing_dates(records, range).iter().map(|r| r.profit()).collect();
        assert_eq!(profits, vec![0.0, 10.0]);
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(day(9), day(9)).unwrap();
        let filled = fill_missing_dates(vec![ProfitRecord::new(unit(), day(1), 1.0, 0.0)], range);
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].date, day(9));
        assert_eq!(filled[0].profit(), 0.0);
    }

    #[test]
    fn empty_group_fills_from_its_unit() {
        let range = DateRange::new(day(1), day(3)).unwrap();
        let group = UnitGroup { unit: unit(), records: Vec::new() };
        let filled = fill_unit(group, range);
        assert_eq!(filled.len(), 3);
        assert!(filled.iter().all(|r| r.profit() == 0.0 && r.unit == unit()));
    }
}
