//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments into a `ReportConfig`
//! - loads CSV or sample records
//! - runs the aggregation pipeline
//! - prints the report or hands it to the TUI
//! - optionally posts the outcome to Slack

use std::io::IsTerminal;

use chrono::Local;
use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Command, RunArgs};
use crate::domain::{ChartConfig, DateRange, OutputMode, RecordSource, ReportConfig, SampleConfig};
use crate::error::AppError;
use crate::notify::{Notifier, SlackNotifier};

pub mod pipeline;

/// Entry point for the `profit-trend` binary.
pub fn run() -> Result<(), AppError> {
    // `profit-trend` and `profit-trend --sample` behave like `profit-trend report ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Summary(args) => handle_report(args, OutputMode::SummaryOnly),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_report(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let mut config = report_config_from_args(&args)?;
    config.mode = mode;

    let notifier = notifier_for(&config)?;
    let notifier = notifier.as_ref().map(|n| n as &dyn Notifier);
    let text = finish_report(&config, execute(&config), notifier)?;
    print!("{text}");
    Ok(())
}

/// Report text for a finished run, with the outcome posted to `notifier`.
///
/// A failed run posts an error message and returns the run's own error. A
/// failed post is only logged. Runs without data post nothing.
fn finish_report(
    config: &ReportConfig,
    outcome: Result<pipeline::RunOutput, AppError>,
    notifier: Option<&dyn Notifier>,
) -> Result<String, AppError> {
    let run = match outcome {
        Ok(run) => run,
        Err(err) => {
            if let Some(notifier) = notifier {
                if let Err(send_err) = notifier.send_error(&err) {
                    warn!("failed to send error notification: {send_err}");
                }
            }
            return Err(err);
        }
    };

    let text = render_report(config, &run);

    match notifier {
        Some(_) if run.series.is_empty() => info!("no data in range; skipping summary notification"),
        Some(notifier) => match notifier.send_summary(&run.summary, run.range.len_days()) {
            Ok(()) => info!("sent summary notification"),
            Err(err) => warn!("failed to send summary notification: {err}"),
        },
        None => {}
    }

    Ok(text)
}

/// Terminal output for `mode`: run header plus every chart, or the summary alone.
pub fn render_report(config: &ReportConfig, run: &pipeline::RunOutput) -> String {
    match config.mode {
        OutputMode::Full => format!(
            "{}\n{}",
            crate::report::format_run_header(&run.range, run.records_read, run.series.len()),
            crate::report::format_full_report(&run.series, &run.summary, &config.chart)
        ),
        OutputMode::SummaryOnly => crate::report::format_summary(&run.summary, &run.series),
    }
}

fn handle_tui(args: RunArgs) -> Result<(), AppError> {
    let config = report_config_from_args(&args)?;
    let run = execute(&config)?;
    crate::tui::run(&config, run)
}

fn execute(config: &ReportConfig) -> Result<pipeline::RunOutput, AppError> {
    info!(
        start = %config.range.start(),
        end = %config.range.end(),
        days = config.range.len_days(),
        "starting profit trend analysis"
    );
    let loaded = pipeline::load_source(&config.source, config.range)?;
    let run = pipeline::run_report(loaded, config.range, config.top_n);
    if run.series.is_empty() {
        warn!("no data found for the requested period");
    }
    info!(units = run.series.len(), records = run.records_read, "analysis complete");
    Ok(run)
}

fn notifier_for(config: &ReportConfig) -> Result<Option<SlackNotifier>, AppError> {
    if !config.notify {
        return Ok(None);
    }
    let notifier = SlackNotifier::from_env()?;
    if notifier.is_none() {
        warn!("--notify given but SLACK_HOOK is not set; skipping notifications");
    }
    Ok(notifier)
}

/// Validate CLI flags and build the run configuration.
///
/// Without `--input` or `--sample` this prompts for a CSV file when stdin is
/// a terminal.
pub fn report_config_from_args(args: &RunArgs) -> Result<ReportConfig, AppError> {
    let today = Local::now().date_naive();
    let source = match (&args.input, args.sample) {
        (_, true) => RecordSource::Sample(SampleConfig {
            seed: args.seed,
            companies: args.companies,
            warehouses: args.warehouses,
            ..SampleConfig::default()
        }),
        (Some(path), false) => RecordSource::Csv(path.clone()),
        (None, false) => {
            if !std::io::stdin().is_terminal() {
                return Err(AppError::new(
                    2,
                    "No input given. Pass `--input <file.csv>` or `--sample`.",
                ));
            }
            RecordSource::Csv(crate::cli::picker::prompt_for_csv_path()?)
        }
    };
    config_with_source(args, source, today)
}

fn config_with_source(
    args: &RunArgs,
    source: RecordSource,
    today: chrono::NaiveDate,
) -> Result<ReportConfig, AppError> {
    let end = args.end.unwrap_or(today);
    let range = match args.start {
        Some(start) => DateRange::new(start, end)?,
        None => DateRange::last_n_days(end, args.day_count())?,
    };

    let auto_bounds = args.min == 0.0 && args.max == 0.0;
    if !auto_bounds && args.min >= args.max {
        return Err(AppError::new(
            2,
            format!("--min ({}) must be below --max ({}).", args.min, args.max),
        ));
    }

    let chart = ChartConfig::builder()
        .width(args.width)
        .height(args.height)
        .bounds(args.min, args.max)
        .show_grid(!args.no_grid)
        .show_stats(!args.no_stats)
        .build();

    Ok(ReportConfig {
        source,
        range,
        chart,
        top_n: args.top,
        mode: OutputMode::Full,
        notify: args.notify,
    })
}

/// Rewrite argv so `profit-trend` defaults to `profit-trend report`.
///
/// Rules:
/// - `profit-trend`                      -> `profit-trend report`
/// - `profit-trend --sample ...`         -> `profit-trend report --sample ...`
/// - `profit-trend 7`                    -> `profit-trend report 7`
/// - `profit-trend --help/--version/-h`  -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "summary" | "tui");
    if is_subcommand {
        return argv;
    }

    let is_flag_or_day_count = arg1.starts_with('-') || arg1.parse::<u32>().is_ok();
    if is_flag_or_day_count {
        argv.insert(1, "report".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use chrono::NaiveDate;
    use crate::app::pipeline::{LoadedRecords, RunOutput, run_report};
    use crate::domain::{OrgUnit, ProfitRecord};
    use crate::report::Summary;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sample_args() -> RunArgs {
        RunArgs {
            sample: true,
            seed: 7,
            companies: 1,
            warehouses: 2,
            ..RunArgs::default()
        }
    }

    #[test]
    fn rewrite_defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["pt"])), argv(&["pt", "report"]));
        assert_eq!(rewrite_args(argv(&["pt", "--sample"])), argv(&["pt", "report", "--sample"]));
        assert_eq!(rewrite_args(argv(&["pt", "14"])), argv(&["pt", "report", "14"]));
        assert_eq!(rewrite_args(argv(&["pt", "tui", "-d", "3"])), argv(&["pt", "tui", "-d", "3"]));
        assert_eq!(rewrite_args(argv(&["pt", "--help"])), argv(&["pt", "--help"]));
        assert_eq!(rewrite_args(argv(&["pt", "bogus"])), argv(&["pt", "bogus"]));
    }

    #[test]
    fn range_ends_today_by_default() {
        let today = day(3, 10);
        let config = config_with_source(&sample_args(), RecordSource::Csv("x.csv".into()), today).unwrap();
        // RunArgs::default() has no day count, so the CLI default applies.
        assert_eq!(config.range.end(), today);
        assert_eq!(config.range.len_days(), crate::cli::DEFAULT_DAYS as usize);
        assert_eq!(config.chart, ChartConfig::default());
    }

    #[test]
    fn explicit_start_and_end_win_over_days() {
        let args = RunArgs {
            start: Some(day(1, 1)),
            end: Some(day(1, 7)),
            days: Some(90),
            ..sample_args()
        };
        let config = config_with_source(&args, RecordSource::Csv("x.csv".into()), day(6, 1)).unwrap();
        assert_eq!((config.range.start(), config.range.end()), (day(1, 1), day(1, 7)));
    }

    #[test]
    fn invalid_ranges_and_bounds_fail_with_code_2() {
        let today = day(3, 10);
        let source = || RecordSource::Csv("x.csv".into());

        let reversed = RunArgs { start: Some(day(2, 1)), end: Some(day(1, 1)), ..sample_args() };
        assert_eq!(config_with_source(&reversed, source(), today).unwrap_err().exit_code(), 2);

        let zero_days = RunArgs { days: Some(0), ..sample_args() };
        assert_eq!(config_with_source(&zero_days, source(), today).unwrap_err().exit_code(), 2);

        let bad_bounds = RunArgs { min: 10.0, max: 5.0, ..sample_args() };
        assert_eq!(config_with_source(&bad_bounds, source(), today).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn chart_flags_flow_into_config() {
        let args = RunArgs {
            width: 40,
            height: 8,
            min: -100.0,
            max: 100.0,
            no_grid: true,
            top: 5,
            notify: true,
            ..sample_args()
        };
        let config = config_with_source(&args, RecordSource::Csv("x.csv".into()), day(3, 10)).unwrap();
        assert_eq!((config.chart.width(), config.chart.height()), (40, 8));
        assert_eq!(config.chart.bounds(), Some((-100.0, 100.0)));
        assert!(!config.chart.show_grid && config.chart.show_stats);
        assert_eq!(config.top_n, 5);
        assert!(config.notify);
    }

    #[test]
    fn sample_flag_selects_generator() {
        let config = report_config_from_args(&sample_args()).unwrap();
        match config.source {
            RecordSource::Sample(sample) => {
                assert_eq!((sample.seed, sample.companies, sample.warehouses), (7, 1, 2));
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    /// Records every post; fails them all when `fail` is set.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn send_summary(&self, summary: &Summary, period_days: usize) -> Result<(), AppError> {
            self.sent
                .borrow_mut()
                .push(format!("summary: {} units, {period_days} days", summary.unit_count));
            if self.fail { Err(AppError::new(5, "webhook down")) } else { Ok(()) }
        }

        fn send_error(&self, err: &AppError) -> Result<(), AppError> {
            self.sent.borrow_mut().push(format!("error: {err}"));
            if self.fail { Err(AppError::new(5, "webhook down")) } else { Ok(()) }
        }
    }

    fn report_config(mode: OutputMode) -> ReportConfig {
        let mut config = config_with_source(&sample_args(), RecordSource::Csv("x.csv".into()), day(1, 3)).unwrap();
        config.range = DateRange::new(day(1, 1), day(1, 3)).unwrap();
        config.mode = mode;
        config
    }

    fn two_unit_run(range: DateRange) -> RunOutput {
        let a = OrgUnit::new(1, "Acme", 10, "North");
        let b = OrgUnit::new(2, "Bolt", 20, "South");
        let loaded = LoadedRecords {
            records: vec![
                ProfitRecord::new(a.clone(), day(1, 1), 100.0, 40.0),
                ProfitRecord::new(a.clone(), day(1, 3), 200.0, 150.0),
            ],
            units: vec![a, b],
        };
        run_report(loaded, range, 3)
    }

    fn empty_run(range: DateRange) -> RunOutput {
        run_report(LoadedRecords { records: Vec::new(), units: Vec::new() }, range, 3)
    }

    #[test]
    fn summary_mode_prints_only_the_summary() {
        let config = report_config(OutputMode::SummaryOnly);
        let txt = render_report(&config, &two_unit_run(config.range));

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
            "  Acme - North: total=110, avg=37\n",
            "  Bolt - South: total=0, avg=0\n",
            "\n",
            "Top 2 by total profit:\n",
            "   1. Acme - North                              110\n",
            "   2. Bolt - South                                0\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn full_mode_starts_with_run_header() {
        let config = report_config(OutputMode::Full);
        let txt = render_report(&config, &two_unit_run(config.range));
        assert!(txt.starts_with(
            "=== Profit Trend Report ===\nPeriod: 2024-01-01 to 2024-01-03 (3 days)\nRecords: 2 | Units: 2\n\n(1/2) [Acme - North]"
        ));
    }

    #[test]
    fn empty_run_prints_no_data_and_posts_nothing() {
        let config = report_config(OutputMode::Full);
        let notifier = RecordingNotifier::default();
        let txt = finish_report(&config, Ok(empty_run(config.range)), Some(&notifier)).unwrap();

        assert!(txt.contains("Records: 0 | Units: 0\n"));
        assert!(txt.ends_with("=== Profit Trend Summary ===\n\nNo data to display.\n"));
        assert!(notifier.sent.borrow().is_empty());

        let summary_only = report_config(OutputMode::SummaryOnly);
        let txt = render_report(&summary_only, &empty_run(config.range));
        assert_eq!(txt, "=== Profit Trend Summary ===\n\nNo data to display.\n");
    }

    #[test]
    fn successful_run_posts_summary() {
        let config = report_config(OutputMode::SummaryOnly);
        let notifier = RecordingNotifier::default();
        finish_report(&config, Ok(two_unit_run(config.range)), Some(&notifier)).unwrap();
        assert_eq!(*notifier.sent.borrow(), vec!["summary: 2 units, 3 days".to_string()]);
    }

    #[test]
    fn failed_post_does_not_fail_the_run() {
        let config = report_config(OutputMode::SummaryOnly);
        let notifier = RecordingNotifier { fail: true, ..RecordingNotifier::default() };
        let txt = finish_report(&config, Ok(two_unit_run(config.range)), Some(&notifier)).unwrap();
        assert!(txt.starts_with("=== Profit Trend Summary ==="));
        assert_eq!(notifier.sent.borrow().len(), 1);
    }

    #[test]
    fn failed_run_posts_error_and_keeps_its_exit_code() {
        let config = report_config(OutputMode::Full);
        let notifier = RecordingNotifier { fail: true, ..RecordingNotifier::default() };
        let err = finish_report(&config, Err(AppError::new(2, "Failed to open CSV 'x.csv'")), Some(&notifier))
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(*notifier.sent.borrow(), vec!["error: Failed to open CSV 'x.csv'".to_string()]);

        let err = finish_report(&config, Err(AppError::new(2, "bad")), None).unwrap_err();
        assert_eq!(err.message(), "bad");
    }
}
