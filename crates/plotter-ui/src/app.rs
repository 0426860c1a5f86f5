//! Application state and TUI event loop for the plotter.
//!
//! [`App`] owns the theme, the aggregated points and the current view. It
//! derives chart series on demand when the chart kind changes.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::Text,
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{debug, warn};

use plotter_core::models::{AggregatedPoint, ChartKind, ChartSeries};
use plotter_core::series::chart_series;

use crate::chart_view;
use crate::components::header::{key_hints, Header};
use crate::table_view::{self, TableRowData};
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Chart,
    Table,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the plotter TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub chart_kind: ChartKind,
    /// Moving-average window in days.
    pub window: usize,
    /// Region label, e.g. `New York, US`.
    pub region: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    points: Vec<AggregatedPoint>,
    rows: Vec<TableRowData>,
    /// Series for `chart_kind`, or the message explaining why there are none.
    series: Result<Vec<ChartSeries>, String>,
}

impl App {
    pub fn new(
        theme_name: &str,
        region: String,
        points: Vec<AggregatedPoint>,
        chart_kind: ChartKind,
        window: usize,
    ) -> Self {
        let rows = table_view::rows_from_points(&points);
        let mut app = Self {
            theme: Theme::from_name(theme_name),
            view_mode: ViewMode::Chart,
            chart_kind,
            window,
            region,
            should_quit: false,
            points,
            rows,
            series: Ok(Vec::new()),
        };
        app.refresh_series();
        app
    }

    /// Chart title, e.g. `Daily New York, US Cases`.
    pub fn title(&self) -> String {
        format!("{} {} Cases", self.chart_kind.label(), self.region)
    }

    pub fn series(&self) -> Result<&[ChartSeries], &str> {
        self.series.as_deref().map_err(String::as_str)
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.view_mode = ViewMode::Chart;
        if self.chart_kind != kind {
            self.chart_kind = kind;
            self.refresh_series();
        }
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Chart => ViewMode::Table,
            ViewMode::Table => ViewMode::Chart,
        };
    }

    /// Apply one key press. Returns `true` once the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return self.should_quit;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('t') => self.set_chart_kind(ChartKind::Totals),
            KeyCode::Char('d') => self.set_chart_kind(ChartKind::Daily),
            KeyCode::Char('a') => self.set_chart_kind(ChartKind::Average),
            KeyCode::Char('v') => self.toggle_view(),
            _ => {}
        }
        self.should_quit
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the TUI until `q`, `Esc` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so resizes are
    /// redrawn without a key press.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if self.handle_key(key) {
                            break Ok(());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn refresh_series(&mut self) {
        self.series = chart_series(&self.points, self.chart_kind, self.window).map_err(|e| {
            warn!("Cannot chart {}: {}", self.chart_kind.label(), e);
            e.to_string()
        });
        debug!("Chart kind set to {:?}", self.chart_kind);
    }

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let [header_area, body, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(&self.region, self.chart_kind, self.window, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);
        frame.render_widget(Paragraph::new(key_hints(&self.theme)), footer);

        if self.points.is_empty() {
            table_view::render_no_data(frame, body, &self.region, &self.theme);
            return;
        }

        let title = self.title();
        match (self.view_mode, self.series()) {
            (ViewMode::Table, _) => {
                table_view::render_table_view(frame, body, &title, &self.rows, &self.theme)
            }
            (ViewMode::Chart, Ok(series)) => {
                chart_view::render_chart_view(frame, body, &title, series, &self.theme)
            }
            (ViewMode::Chart, Err(message)) => {
                chart_view::render_chart_message(
                    frame,
                    body,
                    &title,
                    message,
                    self.theme.error,
                    &self.theme,
                )
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
