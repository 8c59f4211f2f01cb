//! Command-line parsing for the profit trend reporter.
//!
//! Parsing and dispatch stay here; aggregation and charting never see clap types.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_TOP_N};

pub mod picker;

/// Default analysis window when no explicit range is given.
pub const DEFAULT_DAYS: u32 = 30;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "profit-trend",
    version,
    about = "Daily profit trends per company/warehouse, drawn as ASCII charts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every unit's chart followed by the cross-unit summary.
    Report(RunArgs),
    /// Print the summary block only.
    Summary(RunArgs),
    /// Browse the unit charts in an interactive terminal UI.
    Tui(RunArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    /// Number of days to analyse, ending at `--end` (same as `--days`).
    #[arg(value_name = "DAYS", conflicts_with = "days")]
    pub days_positional: Option<u32>,

    /// Number of days to analyse, ending at `--end`.
    #[arg(short = 'd', long)]
    pub days: Option<u32>,

    /// First day of an explicit range (YYYY-MM-DD). Overrides `--days`.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// CSV file of daily sales/cost rows.
    #[arg(short = 'i', long, value_name = "CSV", conflicts_with = "sample")]
    pub input: Option<PathBuf>,

    /// Use generated sample data instead of a CSV file.
    #[arg(long)]
    pub sample: bool,

    /// Random seed for `--sample`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of companies for `--sample`.
    #[arg(long, default_value_t = 2)]
    pub companies: usize,

    /// Warehouses per company for `--sample`.
    #[arg(long, default_value_t = 2)]
    pub warehouses: usize,

    /// Chart width (columns).
    #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = DEFAULT_CHART_HEIGHT)]
    pub height: usize,

    /// Fixed lower bound of the y axis (0 together with `--max 0` = auto).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub min: f64,

    /// Fixed upper bound of the y axis (0 together with `--min 0` = auto).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub max: f64,

    /// Hide the vertical gridlines.
    #[arg(long)]
    pub no_grid: bool,

    /// Hide the per-chart statistics block.
    #[arg(long)]
    pub no_stats: bool,

    /// Number of units listed in the top-N ranking.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Post the summary (or the failure) to the Slack webhook in `SLACK_HOOK`.
    #[arg(long)]
    pub notify: bool,
}

impl RunArgs {
    /// The requested day count, from `--days` or the positional form.
    pub fn day_count(&self) -> u32 {
        self.days.or(self.days_positional).unwrap_or(DEFAULT_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn run_args(cli: Cli) -> RunArgs {
        match cli.command {
            Command::Report(a) | Command::Summary(a) | Command::Tui(a) => a,
        }
    }

    #[test]
    fn defaults() {
        let args = run_args(parse(&["profit-trend", "report"]));
        assert_eq!(args.day_count(), DEFAULT_DAYS);
        assert_eq!(args.width, DEFAULT_CHART_WIDTH);
        assert_eq!(args.height, DEFAULT_CHART_HEIGHT);
        assert_eq!(args.top, DEFAULT_TOP_N);
        assert_eq!((args.min, args.max), (0.0, 0.0));
        assert!(!args.sample && !args.notify && !args.no_grid);
    }

    #[test]
    fn days_as_flag_or_positional() {
        assert_eq!(run_args(parse(&["profit-trend", "summary", "7"])).day_count(), 7);
        assert_eq!(run_args(parse(&["profit-trend", "summary", "--days", "14"])).day_count(), 14);
        assert!(Cli::try_parse_from(["profit-trend", "summary", "7", "--days", "14"]).is_err());
    }

    #[test]
    fn negative_bounds_and_dates_parse() {
        let args = run_args(parse(&[
            "profit-trend", "tui", "--min", "-500", "--max", "1000", "--start", "2024-01-01", "--end", "2024-01-31",
        ]));
        assert_eq!((args.min, args.max), (-500.0, 1000.0));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn input_and_sample_are_exclusive() {
        assert!(Cli::try_parse_from(["profit-trend", "report", "--sample", "--input", "a.csv"]).is_err());
    }
}
