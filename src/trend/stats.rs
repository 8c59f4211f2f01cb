//! Descriptive statistics for one series.

use crate::domain::{ProfitRecord, Stats};

/// Single forward scan over `records`.
///
/// Max/min use strict comparisons, so the earliest record holding the extreme
/// keeps its date. An empty slice yields zeroed `Stats`.
pub fn compute_stats(records: &[ProfitRecord]) -> Stats {
    let Some(first) = records.first() else {
        return Stats::default();
    };

    let mut stats = Stats {
        max_profit: first.profit(),
        max_date: Some(first.date),
        min_profit: first.profit(),
        min_date: Some(first.date),
        avg_profit: 0.0,
        total_profit: 0.0,
        days_count: records.len(),
    };

    for r in records {
        stats.total_profit += r.profit();
        if r.profit() > stats.max_profit {
            stats.max_profit = r.profit();
            stats.max_date = Some(r.date);
        }
        if r.profit() < stats.min_profit {
            stats.min_profit = r.profit();
            stats.min_date = Some(r.date);
        }
    }

    stats.avg_profit = stats.total_profit / stats.days_count as f64;
    stats
}
