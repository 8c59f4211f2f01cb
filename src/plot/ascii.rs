//! ASCII/Unicode profit charts for terminal output.
//!
//! Fixed-size character grid; the same series and config always render the
//! same text.
//!
//! Plot elements:
//! - profit points: `●` (positive), `○` (zero), `▼` (negative)
//! - optional vertical gridlines every 10 columns: `┊`
//! - a value axis on the left and a `MM/DD` date axis underneath

use crate::domain::{ChartConfig, ChartPoint, ProfitSeries, Stats};

/// Width of the right-justified row value label.
const Y_LABEL_WIDTH: usize = 7;
/// Columns before the first plot column: label, a space, the border glyph.
const PLOT_MARGIN: usize = Y_LABEL_WIDTH + 2;
/// Approximate number of date labels across the axis.
const DATE_LABELS: usize = 8;
const GRID_EVERY: usize = 10;
const GRID_GLYPH: char = '┊';

/// Value range mapped onto the chart rows (top row = `max`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    /// Divisor used for row mapping; a flat explicit range maps as if it spanned 1.
    fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 { 1.0 } else { span }
    }
}

/// Render one unit's chart block: header, grid, date axis and optional stats.
pub fn render_profit_chart(series: &ProfitSeries, config: &ChartConfig) -> String {
    if series.records.is_empty() {
        return "No data available for this unit\n".to_string();
    }

    let points: Vec<ChartPoint> = series.records.iter().map(ChartPoint::from_record).collect();
    let bounds = scale_bounds(&points, config);

    let mut out = String::new();
    let header = format!(
        "[{}] Profit trend ({} days)",
        series.display_name(),
        series.records.len()
    );
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"=".repeat(header.chars().count()));
    out.push_str("\n\n");

    for line in render_grid(&points, bounds, config) {
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&render_date_axis(&points, config.width()));
    out.push_str("\n\n");

    if config.show_stats {
        out.push_str(&render_stats(&series.stats));
    }

    out.push('\n');
    out
}

/// Effective value range for one render call.
///
/// Explicit bounds from the config win. Otherwise the data range is padded by
/// 10% on each side; a flat series falls back to `[-100, 100]` when its value
/// is zero and to `[v * 0.9, v * 1.1]` otherwise.
pub fn scale_bounds(points: &[ChartPoint], config: &ChartConfig) -> ScaleBounds {
    if let Some((min, max)) = config.bounds() {
        return ScaleBounds { min, max };
    }

    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for p in points {
        min_v = min_v.min(p.value);
        max_v = max_v.max(p.value);
    }
    if !(min_v.is_finite() && max_v.is_finite()) {
        return ScaleBounds { min: -100.0, max: 100.0 };
    }

    let range = max_v - min_v;
    if range > 0.0 {
        let pad = range * 0.1;
        return ScaleBounds {
            min: min_v - pad,
            max: max_v + pad,
        };
    }

    if max_v == 0.0 {
        ScaleBounds { min: -100.0, max: 100.0 }
    } else {
        // Ordered so a negative flat value still yields min < max.
        let (a, b) = (max_v * 0.9, max_v * 1.1);
        ScaleBounds { min: a.min(b), max: a.max(b) }
    }
}

/// Plot column of the `index`-th of `count` points.
pub fn map_x(index: usize, count: usize, width: usize) -> usize {
    let width = width.max(1);
    let x = if count > 1 {
        (index as f64 / (count - 1) as f64 * (width - 1) as f64) as usize
    } else {
        width / 2
    };
    x.min(width - 1)
}

/// Plot row of `value`, or `None` when it falls outside the grid.
pub fn map_y(value: f64, bounds: ScaleBounds, height: usize) -> Option<usize> {
    let rows = height.max(2) - 1;
    let pos = ((bounds.max - value) / bounds.span() * rows as f64).trunc();
    if pos.is_finite() && pos >= 0.0 && pos <= rows as f64 {
        Some(pos as usize)
    } else {
        None
    }
}

/// Grid rows including the value labels and the left border.
pub fn render_grid(points: &[ChartPoint], bounds: ScaleBounds, config: &ChartConfig) -> Vec<String> {
    let width = config.width();
    let height = config.height();
    let mut grid = vec![vec![' '; width]; height];

    // Later points win when two land in the same cell.
    for (i, p) in points.iter().enumerate() {
        if let Some(row) = map_y(p.value, bounds, height) {
            grid[row][map_x(i, points.len(), width)] = p.symbol.glyph();
        }
    }

    if config.show_grid {
        for row in grid.iter_mut().take(height - 1).skip(1) {
            for col in (0..width).step_by(GRID_EVERY) {
                if row[col] == ' ' {
                    row[col] = GRID_GLYPH;
                }
            }
        }
    }

    let span = bounds.span();
    grid.into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let row_value = bounds.max - (row as f64 / (height - 1) as f64) * span;
            let border = if row == 0 {
                '┬'
            } else if row == height - 1 {
                '└'
            } else {
                '┤'
            };
            let cells: String = cells.into_iter().collect();
            format!("{row_value:>w$.0} {border}{cells}", w = Y_LABEL_WIDTH)
        })
        .collect()
}

/// Horizontal rule with ticks, and a `MM/DD` label line beneath it.
///
/// Labels that would start left of the plot area or run past the line's end
/// are left out.
pub fn render_date_axis(points: &[ChartPoint], width: usize) -> String {
    if points.is_empty() {
        return String::new();
    }

    let line_len = width + PLOT_MARGIN;
    let mut axis = vec![' '; line_len];
    for c in axis.iter_mut().skip(PLOT_MARGIN - 1) {
        *c = '─';
    }
    let mut labels = vec![' '; line_len];

    let step = (points.len() / DATE_LABELS).max(1);
    for i in (0..points.len()).step_by(step) {
        let x = map_x(i, points.len(), width) + PLOT_MARGIN;
        if x < line_len {
            axis[x] = '┬';
        }

        let label: Vec<char> = points[i].date.format("%m/%d").to_string().chars().collect();
        let start = x.saturating_sub(label.len() / 2);
        if start >= PLOT_MARGIN && start + label.len() <= line_len {
            labels[start..start + label.len()].copy_from_slice(&label);
        }
    }

    let axis: String = axis.into_iter().collect();
    let labels: String = labels.into_iter().collect();
    format!("{axis}\n{labels}")
}

/// The per-unit statistics block.
pub fn render_stats(stats: &Stats) -> String {
    let mut out = String::new();
    out.push_str("Statistics:\n");
    out.push_str(&format!(
        "  Max profit:   {:>10.0} ({})\n",
        stats.max_profit,
        fmt_day(stats.max_date)
    ));
    out.push_str(&format!(
        "  Min profit:   {:>10.0} ({})\n",
        stats.min_profit,
        fmt_day(stats.min_date)
    ));
    out.push_str(&format!("  Avg profit:   {:>10.0}\n", stats.avg_profit));
    out.push_str(&format!("  Total profit: {:>10.0}\n", stats.total_profit));
    out.push_str(&format!("  Days:         {}\n", stats.days_count));
    out
}

/// `MM/DD`, or `-` when there is no date.
pub fn fmt_day(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%m/%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
