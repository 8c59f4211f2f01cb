//! Shared domain types.
//!
//! Everything here is created fresh for one report run and dropped after the
//! report is printed. The only derived values are the record profit (computed
//! at construction) and the per-series `Stats`.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::AppError;

/// Default chart width in character columns.
pub const DEFAULT_CHART_WIDTH: usize = 60;
/// Default chart height in character rows.
pub const DEFAULT_CHART_HEIGHT: usize = 15;
/// Smallest width/height the renderer accepts (keeps `n - 1` divisors non-zero).
pub const MIN_CHART_SIZE: usize = 2;
/// Default length of the top-N ranking.
pub const DEFAULT_TOP_N: usize = 3;

/// Grouping key of an organizational unit: `(company_id, warehouse_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitKey {
    pub company_id: i64,
    pub warehouse_id: i64,
}

/// Identity of a company × warehouse pair.
///
/// Names are carried for display only; grouping uses [`UnitKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgUnit {
    pub company_id: i64,
    pub company_name: String,
    pub warehouse_id: i64,
    pub warehouse_name: String,
}

impl OrgUnit {
    pub fn new(
        company_id: i64,
        company_name: impl Into<String>,
        warehouse_id: i64,
        warehouse_name: impl Into<String>,
    ) -> Self {
        Self {
            company_id,
            company_name: company_name.into(),
            warehouse_id,
            warehouse_name: warehouse_name.into(),
        }
    }

    pub fn key(&self) -> UnitKey {
        UnitKey {
            company_id: self.company_id,
            warehouse_id: self.warehouse_id,
        }
    }

    /// `"<company> - <warehouse>"`.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.company_name, self.warehouse_name)
    }
}

/// One unit's figures for one calendar day.
///
/// `profit` is always `sales - cost`. The amounts are private so the invariant
/// holds for the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitRecord {
    pub unit: OrgUnit,
    pub date: NaiveDate,
    sales: f64,
    cost: f64,
    profit: f64,
}

impl ProfitRecord {
    pub fn new(unit: OrgUnit, date: NaiveDate, sales: f64, cost: f64) -> Self {
        Self {
            unit,
            date,
            sales,
            cost,
            profit: sales - cost,
        }
    }

    /// A no-activity day for `unit`.
    pub fn zero(unit: OrgUnit, date: NaiveDate) -> Self {
        Self::new(unit, date, 0.0, 0.0)
    }

    pub fn sales(&self) -> f64 {
        self.sales
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }
}

/// Descriptive statistics of one series.
///
/// `max_date`/`min_date` are `None` only for an empty series, in which case
/// every numeric field is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub max_profit: f64,
    pub max_date: Option<NaiveDate>,
    pub min_profit: f64,
    pub min_date: Option<NaiveDate>,
    pub avg_profit: f64,
    pub total_profit: f64,
    pub days_count: usize,
}

/// A unit's gap-filled history plus its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitSeries {
    pub unit: OrgUnit,
    pub records: Vec<ProfitRecord>,
    pub stats: Stats,
}

impl ProfitSeries {
    pub fn display_name(&self) -> String {
        self.unit.display_name()
    }
}

/// Sign class of a plotted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSymbol {
    Positive,
    Zero,
    Negative,
}

impl PointSymbol {
    pub fn classify(value: f64) -> Self {
        if value > 0.0 {
            PointSymbol::Positive
        } else if value < 0.0 {
            PointSymbol::Negative
        } else {
            PointSymbol::Zero
        }
    }

    pub fn glyph(self) -> char {
        match self {
            PointSymbol::Positive => '●',
            PointSymbol::Zero => '○',
            PointSymbol::Negative => '▼',
        }
    }
}

/// One plotted value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub symbol: PointSymbol,
}

impl ChartPoint {
    pub fn from_record(record: &ProfitRecord) -> Self {
        Self {
            date: record.date,
            value: record.profit(),
            symbol: PointSymbol::classify(record.profit()),
        }
    }
}

/// Chart rendering parameters.
///
/// Construct through [`ChartConfig::builder`]; zero sizes become the defaults
/// and explicit bounds of `(0, 0)` mean auto-scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    width: usize,
    height: usize,
    bounds: Option<(f64, f64)>,
    pub show_grid: bool,
    pub show_stats: bool,
}

impl ChartConfig {
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder::default()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Explicit `(min, max)` override, if any.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// Builder pre-filled with this config's values.
    pub fn to_builder(&self) -> ChartConfigBuilder {
        let (min_value, max_value) = self.bounds.unwrap_or((0.0, 0.0));
        ChartConfigBuilder {
            width: self.width,
            height: self.height,
            min_value,
            max_value,
            show_grid: self.show_grid,
            show_stats: self.show_stats,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct ChartConfigBuilder {
    width: usize,
    height: usize,
    min_value: f64,
    max_value: f64,
    show_grid: bool,
    show_stats: bool,
}

impl Default for ChartConfigBuilder {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            min_value: 0.0,
            max_value: 0.0,
            show_grid: true,
            show_stats: true,
        }
    }
}

impl ChartConfigBuilder {
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Explicit value range. `(0, 0)` keeps auto-scaling.
    pub fn bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    pub fn show_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn show_stats(mut self, show: bool) -> Self {
        self.show_stats = show;
        self
    }

    pub fn build(self) -> ChartConfig {
        let width = if self.width == 0 { DEFAULT_CHART_WIDTH } else { self.width };
        let height = if self.height == 0 { DEFAULT_CHART_HEIGHT } else { self.height };
        let bounds = if self.min_value == 0.0 && self.max_value == 0.0 {
            None
        } else {
            Some((self.min_value, self.max_value))
        };
        ChartConfig {
            width: width.max(MIN_CHART_SIZE),
            height: height.max(MIN_CHART_SIZE),
            bounds,
            show_grid: self.show_grid,
            show_stats: self.show_stats,
        }
    }
}

/// Inclusive `[start, end]` day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::new(
                2,
                format!("Invalid date range: start {start} is after end {end}."),
            ));
        }
        Ok(Self { start, end })
    }

    /// The `days` calendar days ending on (and including) `end`.
    pub fn last_n_days(end: NaiveDate, days: u32) -> Result<Self, AppError> {
        if days == 0 {
            return Err(AppError::new(2, "Day count must be > 0."));
        }
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| AppError::new(2, format!("Day count {days} reaches before the calendar start.")))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included.
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date of the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Where raw records come from.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSource {
    Csv(PathBuf),
    Sample(SampleConfig),
}

/// Synthetic data generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub seed: u64,
    pub companies: usize,
    pub warehouses: usize,
    /// Probability that a unit has no activity on a given day.
    pub skip_prob: f64,
    pub sales_min: f64,
    pub sales_max: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            companies: 2,
            warehouses: 2,
            skip_prob: 0.2,
            sales_min: 10_000.0,
            sales_max: 120_000.0,
        }
    }
}

/// What the report run prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Full,
    SummaryOnly,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub source: RecordSource,
    pub range: DateRange,
    pub chart: ChartConfig,
    pub top_n: usize,
    pub mode: OutputMode,
    pub notify: bool,
}
