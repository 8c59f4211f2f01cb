//! Shared report pipeline used by both the printing and the TUI front-ends.
//!
//! load records -> group by unit -> gap-fill -> per-unit stats -> summary
//!
//! The front-ends only decide how the result is presented.

use tracing::{debug, info, warn};

use crate::data::generate_sample;
use crate::domain::{DateRange, OrgUnit, ProfitRecord, ProfitSeries, RecordSource};
use crate::error::AppError;
use crate::report::{Summary, summarize};

/// Raw input of a run, before aggregation.
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<ProfitRecord>,
    pub units: Vec<OrgUnit>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub range: DateRange,
    /// Activity records that fed the aggregation.
    pub records_read: usize,
    /// One gap-filled series per unit, in display order.
    pub series: Vec<ProfitSeries>,
    pub summary: Summary,
}

/// Load records from the configured source.
///
/// CSV row errors are logged and skipped; they never fail the run.
pub fn load_source(source: &RecordSource, range: DateRange) -> Result<LoadedRecords, AppError> {
    match source {
        RecordSource::Csv(path) => {
            let data = crate::io::load_records(path)?;
            for err in &data.row_errors {
                warn!(line = err.line, "skipping CSV row: {}", err.message);
            }
            info!(
                path = %path.display(),
                rows = data.rows_read,
                records = data.records.len(),
                units = data.units.len(),
                "loaded CSV"
            );
            Ok(LoadedRecords {
                records: data.records,
                units: data.units,
            })
        }
        RecordSource::Sample(config) => {
            let sample = generate_sample(config, range)?;
            info!(
                seed = config.seed,
                records = sample.records.len(),
                units = sample.units.len(),
                "generated sample data"
            );
            Ok(LoadedRecords {
                records: sample.records,
                units: sample.units,
            })
        }
    }
}

/// Aggregate loaded records into per-unit series and the overall summary.
///
/// Records dated outside `range` do not contribute to any series. Input
/// without units yields no series and a zero summary.
pub fn run_report(loaded: LoadedRecords, range: DateRange, top_n: usize) -> RunOutput {
    let LoadedRecords { records, units } = loaded;
    let records: Vec<ProfitRecord> = records.into_iter().filter(|r| range.contains(r.date)).collect();
    let records_read = records.len();

    let series = crate::trend::build_series(records, &units, range);
    debug!(units = series.len(), days = range.len_days(), "built series");

    let summary = summarize(&series, top_n);
    debug!(total_profit = summary.total_profit, top = summary.top.len(), "summarized");

    RunOutput {
        range,
        records_read,
        series,
        summary,
    }
}
