//! Ratatui-based terminal UI.
//!
//! Four screens mirror the dashboard: a main menu with the sea level and sea
//! temperature charts, the coral bleaching page, the climate problems page
//! and the environmental actions calculator. Key presses become
//! `Interaction`s applied to `DashboardState`; drawing only reads state.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::pipeline::Dashboard;
use crate::app::state::{DashboardState, Interaction};
use crate::data::{TREND_CORAL, TREND_HABITAT, TREND_PH, TREND_SEA_LEVEL, TREND_SEA_TEMP, TREND_TEMP_RISE};
use crate::domain::{Navigation, TrendCurve, View};
use crate::error::AppError;
use crate::report::{NumberStyle, format_magnitude, format_metric, format_trend_value};

mod plotters_chart;

use plotters_chart::{ChartSeries, TrendChart};

const RED: RGBColor = RGBColor(255, 80, 80);
const BLUE: RGBColor = RGBColor(80, 160, 255);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const CYAN: RGBColor = RGBColor(0, 255, 255);

const MAIN_INTRO: &str = "Global warming is raising sea level and sea temperature quickly, driving coral \
bleaching, shifting fish habitats and acidifying the ocean. Knowing what is happening is the first \
step; young people and adults alike can take part in protecting the environment. Pick a topic to explore.";

const BLEACH_NOTE: &str = "Coral bleaching happens when rising water temperature or sudden changes in \
the ocean make corals expel their symbiotic algae and turn white, a serious threat to their survival. \
Reefs are home to countless species and underpin fisheries, so their collapse upsets the balance of \
the whole marine ecosystem.";

const CLIMATE_NOTE: &str = "Warmer water and ocean acidification damage coral reefs and many other \
species, kill fish, destroy habitats and reduce biodiversity. Long marine heatwaves make the collapse \
worse; cutting carbon emissions, expanding marine protected areas and restoring reefs are urgent.";

const ACTIONS_NOTE: &str = "Everyone can help stop the ocean crisis. Small habits such as taking public \
transport, refusing plastic and saving energy add up to large carbon savings when many people join in.";

/// Start the TUI.
pub fn run(dash: Dashboard, year: Option<i32>, style: NumberStyle) -> Result<(), AppError> {
    let mut app = App::new(dash, year, style);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    tracing::info!("tui started");
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
    dash: Dashboard,
    state: DashboardState,
    style: NumberStyle,
    status: String,
}

impl App {
    fn new(dash: Dashboard, year: Option<i32>, style: NumberStyle) -> Self {
        let mut state = DashboardState::new(&dash);
        if let Some(year) = year {
            state = state.with_year(&dash, year);
        }
        Self {
            dash,
            state,
            style,
            status: "Ready.".to_string(),
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
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        tracing::info!("tui closed");
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if code == KeyCode::Char('q') {
            return true;
        }
        if code == KeyCode::Char('e') {
            self.export_report();
            return false;
        }

        let Some(interaction) = key_to_interaction(self.state.view, code) else {
            return false;
        };

        let before = self.state.view;
        self.state = self.state.clone().apply(interaction, &self.dash);
        if self.state.view != before {
            tracing::debug!(from = ?before, to = ?self.state.view, "view changed");
            self.status = self.state.view.title().to_string();
        }
        false
    }

    fn export_report(&mut self) {
        let year = match self.state.view {
            View::Bleach => self.state.bleach_year,
            View::Climate => self.state.climate_year,
            View::Main | View::Actions => self.dash.data.default_year,
        };
        let scenario = self.state.scenario(&self.dash);
        self.status = match crate::io::report::write_markdown_report(None, &self.dash, year, &scenario, self.style) {
            Ok(path) => format!("Wrote report: {}", path.display()),
            Err(err) => {
                tracing::warn!(%err, "report export failed");
                format!("Report failed: {err}")
            }
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.state.view {
            View::Main => self.draw_main(frame, chunks[1]),
            View::Bleach => self.draw_bleach(frame, chunks[1]),
            View::Climate => self.draw_climate(frame, chunks[1]),
            View::Actions => self.draw_actions(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("ocean", Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled(
                self.state.view.title(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (illustrative data)", Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_main(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        let intro = Paragraph::new(MAIN_INTRO)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(intro, rows[0]);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4), Constraint::Ratio(3, 4)])
            .split(rows[1]);

        let items: Vec<ListItem> = View::MENU
            .iter()
            .enumerate()
            .map(|(i, v)| ListItem::new(format!("{}. {}", i + 1, v.menu_label())))
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Menu").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.state.menu_cursor));
        frame.render_stateful_widget(list, cols[0], &mut state);

        let charts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(cols[1]);
        self.draw_trend_chart(frame, charts[0], TREND_SEA_LEVEL, CYAN);
        self.draw_trend_chart(frame, charts[1], TREND_SEA_TEMP, ORANGE);
    }

    fn draw_bleach(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(5)])
            .split(area);

        let year = self.state.bleach_year;
        let (Ok(spec), Ok(curve)) = (self.dash.spec(TREND_CORAL), self.dash.curve(TREND_CORAL)) else {
            frame.render_widget(Paragraph::new("Coral data unavailable."), rows[1]);
            return;
        };
        let remainder = curve.remainder();

        let mut lines = vec![year_slider_line(year, curve.range.start(), curve.range.end())];
        if let Some(v) = curve.value_at(year) {
            lines.push(Line::from(Span::styled(
                format!("{year} {}: {}", spec.label.to_lowercase(), format_trend_value(spec, v)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
        if let (Some(rem), Some(label)) = (remainder.as_ref(), spec.remainder_label.as_deref()) {
            if let Some(v) = rem.value_at(year) {
                lines.push(Line::from(Span::styled(
                    format!("{year} {}: {}", label.to_lowercase(), format_trend_value(spec, v)),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                )));
            }
        }
        frame.render_widget(Paragraph::new(Text::from(lines)), rows[0]);

        let bleached = curve.series();
        let remaining = remainder.as_ref().map(|r| r.series()).unwrap_or_default();
        let series = [
            ChartSeries { points: &bleached, color: RED },
            ChartSeries { points: &remaining, color: BLUE },
        ];
        let markers = year_markers(year, &[(bleached.as_slice(), RED), (remaining.as_slice(), BLUE)]);
        let x_bounds = [f64::from(curve.range.start()) - 1.0, f64::from(curve.range.end()) + 1.0];
        render_chart(frame, rows[1], "Coral (%)", &series, &markers, x_bounds, [0.0, 105.0], "ratio (%)");

        let note = Paragraph::new(BLEACH_NOTE)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(note, rows[2]);
    }

    fn draw_climate(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let note = Paragraph::new(CLIMATE_NOTE)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(note, rows[0]);

        let year = self.state.climate_year;
        let keys = [(TREND_PH, RED, Color::Red), (TREND_TEMP_RISE, ORANGE, Color::Yellow), (TREND_HABITAT, BLUE, Color::Blue)];

        let mut lines = Vec::new();
        let mut owned: Vec<(Vec<(f64, f64)>, RGBColor)> = Vec::new();
        let mut curves = Vec::new();
        let mut range = None;
        for (key, rgb, color) in keys {
            let (Ok(spec), Ok(curve)) = (self.dash.spec(key), self.dash.curve(key)) else {
                continue;
            };
            range.get_or_insert(curve.range);
            if let Some(v) = curve.value_at(year) {
                lines.push(Line::from(Span::styled(
                    format!("{year} {}: {}", spec.label.to_lowercase(), format_trend_value(spec, v)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
            }
            owned.push((curve.series(), rgb));
            curves.push(curve);
        }
        let Some(range) = range else {
            frame.render_widget(Paragraph::new("Climate data unavailable."), rows[2]);
            return;
        };
        lines.insert(0, year_slider_line(year, range.start(), range.end()));
        frame.render_widget(Paragraph::new(Text::from(lines)), rows[1]);

        let series: Vec<ChartSeries> = owned
            .iter()
            .map(|(points, color)| ChartSeries { points, color: *color })
            .collect();
        let refs: Vec<(&[(f64, f64)], RGBColor)> = owned.iter().map(|(p, c)| (p.as_slice(), *c)).collect();
        let markers = year_markers(year, &refs);
        let x_bounds = [f64::from(range.start()), f64::from(range.end())];
        let y_bounds = y_bounds_for(curves);
        render_chart(frame, rows[2], "Indicators", &series, &markers, x_bounds, y_bounds, "value");
    }

    fn draw_actions(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let note = Paragraph::new(ACTIONS_NOTE)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(note, rows[0]);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(2, 5), Constraint::Ratio(3, 5)])
            .split(rows[1]);

        let catalog = self.dash.aggregator.catalog();
        let items: Vec<ListItem> = catalog
            .actions()
            .iter()
            .map(|a| {
                let mark = if self.state.selected.contains(&a.name) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {}", a.name))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Actions (space to toggle)").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.state.action_cursor));
        frame.render_stateful_widget(list, cols[0], &mut state);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(cols[1]);

        let population = self.state.population(&self.dash);
        let options: Vec<Span> = self
            .dash
            .data
            .populations
            .iter()
            .enumerate()
            .flat_map(|(i, &p)| {
                let label = format_magnitude(p, self.style);
                let style = if i == self.state.population_index {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                [Span::styled(format!(" {label} "), style), Span::raw(" ")]
            })
            .collect();
        let pop = Paragraph::new(Line::from(options))
            .block(Block::default().title("People (←/→)").borders(Borders::ALL));
        frame.render_widget(pop, right[0]);

        let block = Block::default()
            .title(format!("Effect for {} people", format_magnitude(population, self.style)))
            .borders(Borders::ALL);

        if self.state.selected.is_empty() {
            let hint = Paragraph::new("Select one or more actions to see their combined effect.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(hint, right[1]);
            return;
        }

        let totals = match self.dash.aggregate(&self.state.scenario(&self.dash)) {
            Ok(t) => t,
            Err(err) => {
                frame.render_widget(Paragraph::new(err.to_string()).block(block), right[1]);
                return;
            }
        };

        let table_rows: Vec<Row> = totals
            .totals
            .iter()
            .filter_map(|(key, value)| {
                let metric = catalog.metric(key)?;
                Some(Row::new(vec![
                    Cell::from(metric.label.clone()),
                    Cell::from(format_metric(metric, *value, self.style)),
                ]))
            })
            .collect();
        let table = Table::new(table_rows, [Constraint::Percentage(55), Constraint::Percentage(45)])
            .header(
                Row::new(vec!["Metric", "Effect"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(block);
        frame.render_widget(table, right[1]);
    }

    fn draw_trend_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, key: &str, color: RGBColor) {
        let (Ok(spec), Ok(curve)) = (self.dash.spec(key), self.dash.curve(key)) else {
            frame.render_widget(Paragraph::new(format!("No data for '{key}'.")), area);
            return;
        };
        let points = curve.series();
        let series = [ChartSeries { points: &points, color }];
        let markers = year_markers(curve.range.end(), &[(points.as_slice(), color)]);
        let x_bounds = [f64::from(curve.range.start()), f64::from(curve.range.end())];
        let y_bounds = y_bounds_for([curve]);
        let title = format!("{} ({})", spec.label, spec.unit);
        render_chart(frame, area, &title, &series, &markers, x_bounds, y_bounds, &spec.unit);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.state.view {
            View::Main => "↑/↓ select  Enter open  1-3 jump  e report  q quit",
            View::Bleach | View::Climate => "←/→ year  PgUp/PgDn ±5  Home/End  Esc back  e report  q quit",
            View::Actions => "↑/↓ move  space toggle  ←/→ people  c clear  Esc back  e report  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Map a key press to an interaction for the current view.
fn key_to_interaction(view: View, code: KeyCode) -> Option<Interaction> {
    let back = Some(Interaction::Navigate(Navigation::Back));
    match (view, code) {
        (View::Main, KeyCode::Up) => Some(Interaction::MenuMove(-1)),
        (View::Main, KeyCode::Down) => Some(Interaction::MenuMove(1)),
        (View::Main, KeyCode::Enter) => Some(Interaction::MenuOpen),
        (View::Main, KeyCode::Char(c @ '1'..='3')) => {
            let idx = c as usize - '1' as usize;
            Some(Interaction::Navigate(Navigation::Open(View::MENU[idx])))
        }
        (View::Main, _) => None,
        (_, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b')) => back,
        (View::Bleach | View::Climate, KeyCode::Left) => Some(Interaction::YearStep(-1)),
        (View::Bleach | View::Climate, KeyCode::Right) => Some(Interaction::YearStep(1)),
        (View::Bleach | View::Climate, KeyCode::PageDown) => Some(Interaction::YearStep(-5)),
        (View::Bleach | View::Climate, KeyCode::PageUp) => Some(Interaction::YearStep(5)),
        (View::Bleach | View::Climate, KeyCode::Home) => Some(Interaction::YearStep(i32::MIN / 2)),
        (View::Bleach | View::Climate, KeyCode::End) => Some(Interaction::YearStep(i32::MAX / 2)),
        (View::Actions, KeyCode::Up) => Some(Interaction::ActionMove(-1)),
        (View::Actions, KeyCode::Down) => Some(Interaction::ActionMove(1)),
        (View::Actions, KeyCode::Char(' ') | KeyCode::Enter) => Some(Interaction::ToggleAction),
        (View::Actions, KeyCode::Left) => Some(Interaction::PopulationStep(-1)),
        (View::Actions, KeyCode::Right) => Some(Interaction::PopulationStep(1)),
        (View::Actions, KeyCode::Char('c')) => Some(Interaction::ClearActions),
        _ => None,
    }
}

fn year_slider_line(year: i32, start: i32, end: i32) -> Line<'static> {
    Line::from(vec![
        Span::styled("Year: ", Style::default().fg(Color::Gray)),
        Span::styled(format!("◀ {year} ▶"), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  ({start}-{end})"), Style::default().fg(Color::Gray)),
    ])
}

/// Points at `year` on each series, colored like the series.
fn year_markers(year: i32, series: &[(&[(f64, f64)], RGBColor)]) -> Vec<((f64, f64), RGBColor)> {
    let x = f64::from(year);
    series
        .iter()
        .filter_map(|(points, color)| points.iter().find(|(px, _)| *px == x).map(|&p| (p, *color)))
        .collect()
}

/// Padded y bounds covering every curve.
fn y_bounds_for<'a>(curves: impl IntoIterator<Item = &'a TrendCurve>) -> [f64; 2] {
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for curve in curves {
        y_min = y_min.min(curve.min());
        y_max = y_max.max(curve.max());
    }

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    [y_min - pad, y_max + pad]
}

#[allow(clippy::too_many_arguments)]
fn render_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    series: &[ChartSeries<'_>],
    markers: &[((f64, f64), RGBColor)],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    y_label: &str,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let (chart_rect, insets) = chart_layout(inner);
    let widget = TrendChart {
        series,
        markers,
        x_bounds,
        y_bounds,
        x_label: "year",
        y_label,
        fmt_x: fmt_axis_year,
        fmt_y: fmt_axis_value,
    };
    frame.render_widget(widget, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, y_label);
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 10.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    y_label: &str,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_year(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_value(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("year")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(y_label.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    use crate::app::pipeline::build_dashboard;
    use crate::data::DashboardData;
    use crate::trend::Extrapolation;

    fn app() -> App {
        let dash = build_dashboard(DashboardData::builtin().unwrap(), Extrapolation::Reject).unwrap();
        App::new(dash, None, NumberStyle::Korean)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn keys_drive_navigation() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('1')));
        assert_eq!(app.state.view, View::Bleach);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.state.bleach_year, 2001);
        app.handle_key(KeyCode::End);
        assert_eq!(app.state.bleach_year, 2024);
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.state.view, View::Main);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn y_bounds_cover_every_curve() {
        let app = app();
        let ph = app.dash.curve(TREND_PH).unwrap();
        let habitat = app.dash.curve(TREND_HABITAT).unwrap();
        let [lo, hi] = y_bounds_for([ph, habitat]);
        assert!(lo < 0.0 && hi > 30.0, "[{lo}, {hi}]");
        assert!((hi - lo - 30.0 * 1.1).abs() < 1e-9);

        let [lo, hi] = y_bounds_for(Vec::<&TrendCurve>::new());
        assert!(lo < 0.0 && hi > 1.0);
    }

    #[test]
    fn number_keys_only_work_on_main() {
        assert_eq!(key_to_interaction(View::Actions, KeyCode::Char('1')), None);
        assert_eq!(
            key_to_interaction(View::Main, KeyCode::Char('3')),
            Some(Interaction::Navigate(Navigation::Open(View::Actions)))
        );
    }

    #[test]
    fn bleach_view_shows_selected_year_values() {
        let mut app = app();
        app.handle_key(KeyCode::Char('1'));
        for _ in 0..24 {
            app.handle_key(KeyCode::Right);
        }
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("2024 bleached coral: 84.00%"), "{text}");
        assert!(text.contains("2024 remaining coral: 16.00%"));
    }

    #[test]
    fn actions_view_shows_totals() {
        let mut app = app();
        app.handle_key(KeyCode::Char('3'));
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Right);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("[x] bicycle 30 min"), "{text}");
        assert!(text.contains("30.00 kg"), "{text}");
        assert!(text.contains("200 km"), "{text}");
    }
}
