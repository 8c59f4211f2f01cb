//! Reporting utilities: cross-unit summary and formatted terminal output.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ProfitSeries;

pub mod format;

pub use format::*;

/// A unit's place in the top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUnit {
    pub name: String,
    pub total_profit: f64,
}

/// Statistics folded across every series of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_profit: f64,
    /// `total_profit` divided by the summed day counts of all series.
    pub avg_profit: f64,
    pub max_profit: f64,
    pub max_date: Option<NaiveDate>,
    pub min_profit: f64,
    pub min_date: Option<NaiveDate>,
    pub unit_count: usize,
    pub total_days: usize,
    /// Highest total profit first.
    pub top: Vec<RankedUnit>,
}

/// Fold per-series stats into a summary.
///
/// `series` must already be in display order: the overall extremes start from
/// the first series and only move on a strict improvement, so an equal value
/// in a later series keeps the earlier date.
pub fn summarize(series: &[ProfitSeries], top_n: usize) -> Summary {
    let Some(first) = series.first() else {
        return Summary::default();
    };

    let mut summary = Summary {
        max_profit: first.stats.max_profit,
        max_date: first.stats.max_date,
        min_profit: first.stats.min_profit,
        min_date: first.stats.min_date,
        unit_count: series.len(),
        ..Summary::default()
    };

    for s in series {
        summary.total_profit += s.stats.total_profit;
        summary.total_days += s.stats.days_count;

        if s.stats.max_profit > summary.max_profit {
            summary.max_profit = s.stats.max_profit;
            summary.max_date = s.stats.max_date;
        }
        if s.stats.min_profit < summary.min_profit {
            summary.min_profit = s.stats.min_profit;
            summary.min_date = s.stats.min_date;
        }
    }

    if summary.total_days > 0 {
        summary.avg_profit = summary.total_profit / summary.total_days as f64;
    }

    summary.top = rank_by_total(series, top_n);
    summary
}

/// Top `top_n` units by total profit. Equal totals keep their input order.
pub fn rank_by_total(series: &[ProfitSeries], top_n: usize) -> Vec<RankedUnit> {
    let mut ranked: Vec<RankedUnit> = series
        .iter()
        .map(|s| RankedUnit {
            name: s.display_name(),
            total_profit: s.stats.total_profit,
        })
        .collect();
    ranked.sort_by(|a, b| b.total_profit.partial_cmp(&a.total_profit).unwrap_or(Ordering::Equal));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrgUnit, Stats};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(name: &str, stats: Stats) -> ProfitSeries {
        ProfitSeries {
            unit: OrgUnit::new(1, name, 1, "Main"),
            records: Vec::new(),
            stats,
        }
    }

    fn stats(total: f64, days: usize, max: (f64, u32), min: (f64, u32)) -> Stats {
        Stats {
            max_profit: max.0,
            max_date: Some(day(max.1)),
            min_profit: min.0,
            min_date: Some(day(min.1)),
            avg_profit: total / days as f64,
            total_profit: total,
            days_count: days,
        }
    }

    #[test]
    fn folds_totals_average_and_extremes() {
        let all = vec![
            series("A", stats(300.0, 3, (200.0, 2), (20.0, 1))),
            series("B", stats(-60.0, 3, (10.0, 1), (-50.0, 3))),
        ];
        let summary = summarize(&all, 3);
        assert_eq!(summary.total_profit, 240.0);
        assert_eq!(summary.total_days, 6);
        assert_eq!(summary.avg_profit, 40.0);
        assert_eq!((summary.max_profit, summary.max_date), (200.0, Some(day(2))));
        assert_eq!((summary.min_profit, summary.min_date), (-50.0, Some(day(3))));
        assert_eq!(summary.unit_count, 2);
    }

    #[test]
    fn equal_extremes_keep_the_earlier_series() {
        let all = vec![
            series("A", stats(0.0, 2, (5.0, 2), (0.0, 2))),
            series("B", stats(0.0, 2, (5.0, 1), (0.0, 1))),
        ];
        let summary = summarize(&all, 3);
        assert_eq!(summary.max_date, Some(day(2)));
        assert_eq!(summary.min_date, Some(day(2)));
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let all = vec![
            series("A", stats(10.0, 1, (10.0, 1), (10.0, 1))),
            series("B", stats(30.0, 1, (30.0, 1), (30.0, 1))),
            series("C", stats(10.0, 1, (10.0, 1), (10.0, 1))),
            series("D", stats(20.0, 1, (20.0, 1), (20.0, 1))),
        ];
        let names: Vec<_> = rank_by_total(&all, 10).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["B - Main", "D - Main", "A - Main", "C - Main"]);

        assert_eq!(rank_by_total(&all, 2).len(), 2);
    }

    #[test]
    fn empty_input_gives_zero_summary() {
        let summary = summarize(&[], 3);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.avg_profit, 0.0);
    }
}
