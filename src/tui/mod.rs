//! Ratatui-based terminal UI.
//!
//! Lists the units of a finished run on the left and shows the selected unit's
//! ASCII chart on the right. The chart text is exactly what the `report`
//! subcommand prints for that unit.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::domain::{ChartConfig, ReportConfig};
use crate::error::AppError;
use crate::plot::render_profit_chart;
use crate::report::format_summary;

/// Start the TUI over a finished run.
pub fn run(config: &ReportConfig, output: RunOutput) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config.chart.clone(), output);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    chart: ChartConfig,
    output: RunOutput,
    /// Index into `output.series`; `len()` selects the summary page.
    selected: usize,
    status: String,
}

impl App {
    fn new(chart: ChartConfig, output: RunOutput) -> Self {
        let status = format!("{} unit(s) loaded", output.series.len());
        Self {
            chart,
            output,
            selected: 0,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a key press. Returns `true` when the UI should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected < self.output.series.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('g') => {
                self.chart = self.chart.to_builder().show_grid(!self.chart.show_grid).build();
                self.status = format!("gridlines: {}", on_off(self.chart.show_grid));
            }
            KeyCode::Char('s') => {
                self.chart = self.chart.to_builder().show_stats(!self.chart.show_stats).build();
                self.status = format!("stats: {}", on_off(self.chart.show_stats));
            }
            _ => {}
        }
        false
    }

    /// Text of the right-hand pane for the current selection.
    fn page_text(&self) -> String {
        match self.output.series.get(self.selected) {
            Some(series) => render_profit_chart(series, &self.chart),
            None => format_summary(&self.output.summary, &self.output.series),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let range = &self.output.range;
        let lines = vec![
            Line::from(vec![
                Span::styled("profit-trend", Style::default().fg(Color::Cyan)),
                Span::raw(" | daily profit per company/warehouse"),
            ]),
            Line::from(Span::styled(
                format!(
                    "period: {} to {} ({} days) | units: {} | total profit: {:.0}",
                    range.start(),
                    range.end(),
                    range.len_days(),
                    self.output.series.len(),
                    self.output.summary.total_profit,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        self.draw_units(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_units(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items: Vec<ListItem> = self
            .output
            .series
            .iter()
            .map(|s| ListItem::new(s.display_name()))
            .collect();
        items.push(ListItem::new("Summary").style(Style::default().add_modifier(Modifier::ITALIC)));

        let list = List::new(items)
            .block(Block::default().title("Units").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match self.output.series.get(self.selected) {
            Some(_) => "Chart",
            None => "Summary",
        };
        let p = Paragraph::new(self.page_text()).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  g grid  s stats  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
