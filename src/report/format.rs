//! Formatted terminal output for a report run.
//!
//! All report text is assembled here; aggregation and charting return data
//! or single chart blocks only.

use crate::domain::{ChartConfig, DateRange, ProfitSeries};
use crate::plot::{fmt_day, render_profit_chart};
use crate::report::Summary;

const RULE_WIDTH: usize = 80;
const NAME_WIDTH: usize = 32;

/// Run header: title, analysis range, and how much data was found.
pub fn format_run_header(range: &DateRange, records: usize, units: usize) -> String {
    let mut out = String::new();
    out.push_str("=== Profit Trend Report ===\n");
    out.push_str(&format!(
        "Period: {} to {} ({} days)\n",
        range.start(),
        range.end(),
        range.len_days()
    ));
    out.push_str(&format!("Records: {records} | Units: {units}\n"));
    out
}

/// Every unit's chart block followed by the summary.
pub fn format_full_report(series: &[ProfitSeries], summary: &Summary, chart: &ChartConfig) -> String {
    let mut out = String::new();
    let n = series.len();

    for (i, s) in series.iter().enumerate() {
        out.push_str(&format!("({}/{}) ", i + 1, n));
        out.push_str(&render_profit_chart(s, chart));
        if i + 1 < n {
            out.push_str(&"-".repeat(RULE_WIDTH));
            out.push_str("\n\n");
        }
    }

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format_summary(summary, series));
    out
}

/// The cross-unit summary block.
pub fn format_summary(summary: &Summary, series: &[ProfitSeries]) -> String {
    let mut out = String::new();
    out.push_str("=== Profit Trend Summary ===\n\n");

    if series.is_empty() {
        out.push_str("No data to display.\n");
        return out;
    }

    out.push_str("Overall:\n");
    out.push_str(&format!("  Total profit: {:>10.0}\n", summary.total_profit));
    out.push_str(&format!("  Avg profit:   {:>10.0}\n", summary.avg_profit));
    out.push_str(&format!(
        "  Max profit:   {:>10.0} ({})\n",
        summary.max_profit,
        fmt_day(summary.max_date)
    ));
    out.push_str(&format!(
        "  Min profit:   {:>10.0} ({})\n",
        summary.min_profit,
        fmt_day(summary.min_date)
    ));
    out.push_str(&format!("  Units:        {}\n", summary.unit_count));
    out.push('\n');

    out.push_str("By unit:\n");
    for s in series {
        out.push_str(&format!(
            "  {}: total={:.0}, avg={:.0}\n",
            s.display_name(),
            s.stats.total_profit,
            s.stats.avg_profit
        ));
    }

    if !summary.top.is_empty() {
        out.push('\n');
        out.push_str(&format!("Top {} by total profit:\n", summary.top.len()));
        for (rank, unit) in summary.top.iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {:<w$} {:>12.0}\n",
                rank + 1,
                truncate(&unit.name, NAME_WIDTH),
                unit.total_profit,
                w = NAME_WIDTH
            ));
        }
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{OrgUnit, ProfitRecord};
    use crate::report::summarize;
    use crate::trend::compute_stats;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(company: &str, profits: &[f64]) -> ProfitSeries {
        let unit = OrgUnit::new(1, company, 1, "Main");
        let records: Vec<_> = profits
            .iter()
            .enumerate()
            .map(|(i, &p)| ProfitRecord::new(unit.clone(), day(i as u32 + 1), p, 0.0))
            .collect();
        let stats = compute_stats(&records);
        ProfitSeries { unit, records, stats }
    }

    #[test]
    fn summary_block_layout() {
        let all = vec![series("Acme", &[60.0, 0.0, 50.0]), series("Bolt", &[0.0, 0.0, 0.0])];
        let summary = summarize(&all, 1);
        let txt = format_summary(&summary, &all);

        let expected = concat!(
            "=== Profit Trend Summary ===\n",
            "\n",
            "Overall:\n",
            "  Total profit:        110\n",
            "  Avg profit:           18\n",
            "  Max profit:           60 (01/01)\n",
            "  Min profit:            0 (01/02)\n",
            "  Units:        2\n",
            "\n",
            "By unit:\n",
            "  Acme - Main: total=110, avg=37\n",
            "  Bolt - Main: total=0, avg=0\n",
            "\n",
            "Top 1 by total profit:\n",
            "   1. Acme - Main                               110\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_summary_says_so() {
        let txt = format_summary(&Summary::default(), &[]);
        assert_eq!(txt, "=== Profit Trend Summary ===\n\nNo data to display.\n");
    }

    #[test]
    fn full_report_separates_charts_and_ends_with_summary() {
        let all = vec![series("Acme", &[1.0, 2.0]), series("Bolt", &[3.0, 4.0])];
        let summary = summarize(&all, 3);
        let txt = format_full_report(&all, &summary, &ChartConfig::default());

        assert!(txt.starts_with("(1/2) [Acme - Main] Profit trend (2 days)\n"));
        assert!(txt.contains("(2/2) [Bolt - Main] Profit trend (2 days)\n"));
        assert_eq!(txt.matches(&"-".repeat(RULE_WIDTH)).count(), 1);
        assert!(txt.contains(&format!("{}\n=== Profit Trend Summary ===", "=".repeat(RULE_WIDTH))));
    }

    #[test]
    fn run_header_reports_period() {
        let range = DateRange::new(day(1), day(3)).unwrap();
        assert_eq!(
            format_run_header(&range, 4, 2),
            "=== Profit Trend Report ===\nPeriod: 2024-01-01 to 2024-01-03 (3 days)\nRecords: 4 | Units: 2\n"
        );
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
