//! Line chart of the aggregated case series.
//!
//! One braille line per metric, x axis in reporting days, y axis in cases.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use plotter_core::formatting::format_axis;
use plotter_core::models::{ChartSeries, SnapshotDate};

use crate::themes::Theme;

/// Axis ranges `(x_bounds, y_bounds)` covering every point of `series`.
///
/// The y range always includes zero. Degenerate ranges are widened by one
/// unit so the chart never divides by zero. `None` when there are no points.
pub fn chart_bounds(series: &[ChartSeries]) -> Option<([f64; 2], [f64; 2])> {
    let (x_lo, x_hi) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(x, _)| x))
        .fold(None, |acc: Option<(f64, f64)>, x| match acc {
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            None => Some((x, x)),
        })?;

    let (y_lo, y_hi) = series
        .iter()
        .filter_map(ChartSeries::value_bounds)
        .fold((0.0_f64, 0.0_f64), |(lo, hi), (l, h)| (lo.min(l), hi.max(h)));

    Some((widen(x_lo, x_hi), widen(y_lo, y_hi)))
}

fn widen(lo: f64, hi: f64) -> [f64; 2] {
    if hi > lo {
        [lo, hi]
    } else {
        [lo, lo + 1.0]
    }
}

/// `MM-DD` label for a fractional day offset.
fn day_label(day_offset: f64) -> String {
    SnapshotDate::from_day_offset(day_offset.round() as i64)
        .map(|d| d.date.format("%m-%d").to_string())
        .unwrap_or_else(|| format!("{day_offset:.0}"))
}

/// Evenly spaced labels at the start, middle and end of `bounds`.
fn axis_labels(bounds: [f64; 2], format: fn(f64) -> String) -> Vec<Line<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Line::from(format(v)))
        .collect()
}

/// Render `series` as a line chart titled `title`.
///
/// Falls back to [`render_chart_message`] when no series has any point.
pub fn render_chart_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &[ChartSeries],
    theme: &Theme,
) {
    let Some((x_bounds, y_bounds)) = chart_bounds(series) else {
        render_chart_message(
            frame,
            area,
            title,
            "No data points in the selected range",
            theme.warning,
            theme,
        );
        return;
    };

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.metric.label())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.metric_style(s.metric))
                .data(&s.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(Span::styled(format!(" {} ", title), theme.header)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme.label))
                .style(theme.axis)
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, day_label)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Cases", theme.label))
                .style(theme.axis)
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, format_axis)),
        );

    frame.render_widget(chart, area);
}

/// Render a bordered message in place of the chart, e.g. when the moving
/// average cannot be computed for the loaded range. `style` colours the
/// message line.
pub fn render_chart_message(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    style: Style,
    theme: &Theme,
) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), style)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 't' for totals, 'v' for the table or 'q' to exit",
            theme.dim,
        )),
    ]);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(Span::styled(format!(" {} ", title), theme.header)),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
