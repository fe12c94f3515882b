//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a settings panel for choosing the report mode and year,
//! then renders the four report charts in a 2x2 grid. Chart drawing goes
//! through Plotters (`plotters_chart`); pie slots are rendered as a
//! percentage-share breakdown, which reads better than pie sectors on a
//! low-resolution cell grid.

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
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::agg::ScatterPoint;
use crate::app::pipeline::{self, LoadedData};
use crate::cli::DataArgs;
use crate::domain::SelectorState;
use crate::error::AppError;
use crate::report::{ChartData, ChartKind, ChartSlot, build_charts};

mod plotters_chart;

use plotters_chart::{ScatterChart, ScatterDot, SeriesBarChart, SeriesLineChart};

/// Ratatui colors matching the Plotters category palette, in the same order.
const LEGEND_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::LightRed,
    Color::LightBlue,
];

/// Start the TUI.
///
/// The dataset is loaded before the terminal is put into raw mode so a fatal
/// load error prints like any other CLI failure.
pub fn run(args: DataArgs) -> Result<(), AppError> {
    let loaded = pipeline::load_data(&args)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(loaded);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
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
    loaded: LoadedData,
    selector: SelectorState,
    selected_field: usize,
    status: String,
    slots: [ChartSlot; 4],
}

impl App {
    fn new(loaded: LoadedData) -> Self {
        let selector = SelectorState::initial(&loaded.dataset);
        let slots = build_charts(&loaded.dataset, &selector);
        let status = format!("Loaded {} rows from {}", loaded.dataset.len(), loaded.source);
        Self {
            loaded,
            selector,
            selected_field: 0,
            status,
            slots,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('m') => {
                self.selector.mode = self.selector.mode.toggled();
                self.recompute();
                self.status = format!(
                    "report: {} | {}",
                    self.selector.mode.display_name(),
                    self.selector.year_selector_help()
                );
            }
            KeyCode::Char('r') => {
                self.recompute();
                self.status = "Recomputed charts.".to_string();
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                // Two modes, so any adjustment is a toggle.
                self.selector.mode = self.selector.mode.toggled();
                self.recompute();
                self.status = format!(
                    "report: {} | {}",
                    self.selector.mode.display_name(),
                    self.selector.year_selector_help()
                );
            }
            1 => {
                if !self.selector.year_selector_enabled() {
                    self.status = self.selector.year_selector_help().to_string();
                    return;
                }
                let years = self.loaded.dataset.years();
                if years.is_empty() {
                    self.status = "No years available in the dataset.".to_string();
                    return;
                }
                let current = self
                    .selector
                    .effective_year(&self.loaded.dataset)
                    .unwrap_or(years[years.len() - 1]);
                let idx = years.iter().position(|&y| y == current).unwrap_or(years.len() - 1);
                let next = if delta >= 0 {
                    (idx + 1).min(years.len() - 1)
                } else {
                    idx.saturating_sub(1)
                };
                self.selector.selected_year = Some(years[next]);
                self.recompute();
                self.status = format!("year: {}", years[next]);
            }
            _ => {}
        }
    }

    /// One synchronous recomputation of all four charts, as a pure function
    /// of the immutable dataset and the selector state.
    fn recompute(&mut self) {
        self.slots = build_charts(&self.loaded.dataset, &self.selector);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let year_label = if self.selector.year_selector_enabled() {
            self.selector
                .effective_year(&self.loaded.dataset)
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string())
        } else {
            "disabled".to_string()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("salesdash", Style::default().fg(Color::Cyan)),
                Span::raw(" — Historical Automobile Sales"),
            ]),
            Line::from(Span::styled(
                format!(
                    "report: {} | year: {year_label} | rows: {}",
                    self.selector.mode.display_name(),
                    self.loaded.dataset.len(),
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
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(area);

        self.draw_settings(frame, chunks[0]);
        self.draw_grid(frame, chunks[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let year_label = if self.selector.year_selector_enabled() {
            self.selector
                .effective_year(&self.loaded.dataset)
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string())
        } else {
            "disabled".to_string()
        };

        let year_style = if self.selector.year_selector_enabled() {
            Style::default()
        } else {
            // Greyed out while the Recession report is active.
            Style::default().fg(Color::DarkGray)
        };

        let items = vec![
            ListItem::new(format!("Report: {}", self.selector.mode.display_name())),
            ListItem::new(Text::styled(format!("Year: {year_label}"), year_style)),
            ListItem::new(Text::styled(
                self.selector.year_selector_help(),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let list = List::new(items)
            .block(Block::default().title("Controls").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_grid(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (row_idx, row) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row);
            for (col_idx, col) in cols.iter().enumerate() {
                self.draw_slot(frame, *col, &self.slots[row_idx * 2 + col_idx]);
            }
        }
    }

    fn draw_slot(&self, frame: &mut ratatui::Frame<'_>, area: Rect, slot: &ChartSlot) {
        let block = Block::default()
            .title(slot.spec.title.clone())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        match (&slot.data, slot.spec.kind) {
            (ChartData::NoData, _) => draw_no_data(frame, inner),
            (ChartData::Series(series), ChartKind::Pie) => draw_share_list(frame, inner, series),
            (ChartData::Series(series), ChartKind::Bar) => {
                let labels: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();
                let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
                let widget = SeriesBarChart {
                    values: &values,
                    labels: &labels,
                    y_bounds: bar_bounds(&values),
                    x_label: slot.spec.x_field,
                    y_label: slot.spec.y_field,
                };
                frame.render_widget(widget, inner);
            }
            (ChartData::Series(series), _) => {
                let labels: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();
                let points: Vec<(f64, f64)> = series
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| (i as f64, *v))
                    .collect();
                let widget = SeriesLineChart {
                    points: &points,
                    labels: &labels,
                    x_bounds: [0.0, (points.len().saturating_sub(1)).max(1) as f64],
                    y_bounds: value_bounds(points.iter().map(|&(_, y)| y)),
                    x_label: slot.spec.x_field,
                    y_label: slot.spec.y_field,
                };
                frame.render_widget(widget, inner);
            }
            (ChartData::Points(points), _) => self.draw_scatter(frame, inner, slot, points),
        }
    }

    fn draw_scatter(
        &self,
        frame: &mut ratatui::Frame<'_>,
        inner: Rect,
        slot: &ChartSlot,
        points: &[ScatterPoint],
    ) {
        let types = distinct_types(points);

        // One legend line above the plot; the palette is keyed by type order.
        let mut legend_spans: Vec<Span> = Vec::new();
        for (idx, name) in types.iter().enumerate() {
            if idx > 0 {
                legend_spans.push(Span::raw(" "));
            }
            legend_spans.push(Span::styled(
                format!("●{name}"),
                Style::default().fg(LEGEND_COLORS[idx % LEGEND_COLORS.len()]),
            ));
        }
        let legend_area = Rect {
            height: 1,
            ..inner
        };
        frame.render_widget(Paragraph::new(Line::from(legend_spans)), legend_area);

        let chart_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        if chart_area.height == 0 {
            return;
        }

        let sales_max = points.iter().map(|p| p.sales).fold(0.0_f64, f64::max);
        let dots: Vec<ScatterDot> = points
            .iter()
            .map(|p| ScatterDot {
                x: p.unemployment_rate,
                y: p.sales,
                color_index: types.iter().position(|t| t == &p.vehicle_type).unwrap_or(0),
                size_level: size_level(p.sales, sales_max),
            })
            .collect();

        let widget = ScatterChart {
            dots: &dots,
            x_bounds: value_bounds(points.iter().map(|p| p.unemployment_rate)),
            y_bounds: value_bounds(points.iter().map(|p| p.sales)),
            x_label: slot.spec.x_field,
            y_label: slot.spec.y_field,
        };
        frame.render_widget(widget, chart_area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  m mode  r recompute  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// The explicit placeholder for empty aggregations.
fn draw_no_data(frame: &mut ratatui::Frame<'_>, inner: Rect) {
    let msg = Paragraph::new("No data available")
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(ratatui::layout::Alignment::Center);
    let rect = Rect {
        y: inner.y + inner.height / 2,
        height: 1,
        ..inner
    };
    frame.render_widget(msg, rect);
}

/// Render a pie-slot series as a percentage-share breakdown.
fn draw_share_list(frame: &mut ratatui::Frame<'_>, inner: Rect, series: &[(String, f64)]) {
    let total: f64 = series.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        draw_no_data(frame, inner);
        return;
    }

    let label_width = series
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(16);
    let bar_width = (inner.width as usize).saturating_sub(label_width + 10).max(4);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, (label, value)) in series.iter().enumerate() {
        let share = value.max(0.0) / total;
        let filled = ((share * bar_width as f64).round() as usize).min(bar_width);
        let color = LEGEND_COLORS[idx % LEGEND_COLORS.len()];
        lines.push(Line::from(vec![
            Span::raw(format!("{label:<label_width$.label_width$} ")),
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::raw(format!(" {:>5.1}%", share * 100.0)),
        ]));
    }

    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

/// Distinct vehicle types in encounter order; fixes the palette assignment.
fn distinct_types(points: &[ScatterPoint]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for p in points {
        if !types.contains(&p.vehicle_type) {
            types.push(p.vehicle_type.clone());
        }
    }
    types
}

/// Coarse size encoding for scatter points: 0..=2 by share of the max sales.
fn size_level(sales: f64, max: f64) -> u8 {
    if max <= 0.0 {
        return 0;
    }
    let share = sales / max;
    if share > 2.0 / 3.0 {
        2
    } else if share > 1.0 / 3.0 {
        1
    } else {
        0
    }
}

/// Padded bounds for a value axis; degenerate input falls back to [0, 1].
fn value_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if max <= min {
        let pad = min.abs().max(1.0) * 0.05;
        return [min - pad, min + pad];
    }
    let pad = (max - min) * 0.05;
    [min - pad, max + pad]
}

/// Bar charts are anchored at zero.
fn bar_bounds(values: &[f64]) -> [f64; 2] {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 { [0.0, 1.0] } else { [0.0, max * 1.05] }
}
