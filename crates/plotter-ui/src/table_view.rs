//! Tabular view of the aggregated points.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per snapshot,
//! and the same rows as aligned plain text for non-interactive output.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use plotter_core::formatting::{format_count, format_delta};
use plotter_core::models::AggregatedPoint;
use plotter_core::series::deltas;

use crate::themes::Theme;

const HEADERS: [&str; 7] = [
    "Date",
    "Day",
    "Confirmed",
    "New",
    "Deaths",
    "New Deaths",
    "Recovered",
];

/// Data for a single row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub day_offset: i64,
    pub confirmed: u64,
    /// Change from the previous row; `None` on the first row.
    pub new_confirmed: Option<i64>,
    pub deaths: u64,
    pub new_deaths: Option<i64>,
    pub recovered: u64,
}

impl TableRowData {
    fn cells(&self) -> [String; 7] {
        let delta = |d: Option<i64>| d.map(format_delta).unwrap_or_else(|| "-".to_string());
        [
            self.date.clone(),
            self.day_offset.to_string(),
            format_count(self.confirmed),
            delta(self.new_confirmed),
            format_count(self.deaths),
            delta(self.new_deaths),
            format_count(self.recovered),
        ]
    }
}

/// Build table rows from the aggregated points, in order.
pub fn rows_from_points(points: &[AggregatedPoint]) -> Vec<TableRowData> {
    let confirmed: Vec<u64> = points.iter().map(|p| p.confirmed).collect();
    let deaths: Vec<u64> = points.iter().map(|p| p.deaths).collect();
    let new_confirmed = deltas(&confirmed);
    let new_deaths = deltas(&deaths);

    points
        .iter()
        .enumerate()
        .map(|(i, p)| TableRowData {
            date: p.date.date.format("%Y-%m-%d").to_string(),
            day_offset: p.date.day_offset,
            confirmed: p.confirmed,
            new_confirmed: i.checked_sub(1).map(|j| new_confirmed[j]),
            deaths: p.deaths,
            new_deaths: i.checked_sub(1).map(|j| new_deaths[j]),
            recovered: p.recovered,
        })
        .collect()
}

/// Render the table into `area` under `title`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[TableRowData],
    theme: &Theme,
) {
    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let [date, day, confirmed, new_confirmed, deaths, new_deaths, recovered] = row.cells();
            Row::new(vec![
                Cell::from(date),
                Cell::from(day),
                Cell::from(confirmed),
                Cell::from(new_confirmed)
                    .style(theme.delta_style(row.new_confirmed.unwrap_or(0))),
                Cell::from(deaths),
                Cell::from(new_deaths).style(theme.delta_style(row.new_deaths.unwrap_or(0))),
                Cell::from(recovered),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(14),
    ];

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when there are no points to show.
pub fn render_no_data(frame: &mut Frame, area: Rect, region: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No daily reports matched {region}"),
            theme.warning,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Check the data path and the day range.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" COVID-19 Plotter "),
        ),
        area,
    );
}

/// Format rows as a right-aligned text table for stdout.
pub fn format_plain_table(rows: &[TableRowData]) -> String {
    let cells: Vec<[String; 7]> = rows.iter().map(TableRowData::cells).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_plain_row(&mut out, HEADERS.iter().copied(), &widths);
    for row in &cells {
        push_plain_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_plain_row<'a>(out: &mut String, values: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = values
        .zip(widths)
        .map(|(v, &w)| format!("{v:>w$}"))
        .collect();
    out.push_str(&line.join("  "));
    out.push('\n');
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use plotter_core::models::SnapshotDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn point(day: u32, confirmed: u64, deaths: u64) -> AggregatedPoint {
        AggregatedPoint {
            date: SnapshotDate::from_ymd(2020, 3, day).unwrap(),
            confirmed,
            deaths,
            recovered: 0,
        }
    }

    fn make_rows() -> Vec<TableRowData> {
        rows_from_points(&[point(1, 75, 1), point(2, 100, 6), point(3, 1_224, 4)])
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    // ── rows_from_points ──────────────────────────────────────────────────────

    #[test]
    fn test_rows_from_points_deltas() {
        let rows = make_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, "2020-03-01");
        assert_eq!(rows[0].day_offset, 39);
        assert_eq!(rows[0].new_confirmed, None);
        assert_eq!(rows[1].new_confirmed, Some(25));
        assert_eq!(rows[2].new_confirmed, Some(1_124));
        assert_eq!(rows[2].new_deaths, Some(-2));
    }

    #[test]
    fn test_rows_from_points_empty() {
        assert!(rows_from_points(&[]).is_empty());
    }

    #[test]
    fn test_row_cells_format_counts() {
        let cells = make_rows()[2].cells();
        assert_eq!(cells[2], "1,224");
        assert_eq!(cells[3], "+1,124");
        assert_eq!(cells[5], "-2");
        assert_eq!(make_rows()[0].cells()[3], "-");
    }

    // ── format_plain_table ────────────────────────────────────────────────────

    #[test]
    fn test_plain_table_is_aligned() {
        let text = format_plain_table(&make_rows());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("Date"));
        assert!(lines[3].contains("2020-03-03"));
        assert!(lines[3].contains("+1,124"));
        let width = lines[0].len();
        assert!(lines.iter().all(|l| l.len() == width));
    }

    #[test]
    fn test_plain_table_header_only_when_empty() {
        let text = format_plain_table(&[]);
        assert_eq!(text.lines().count(), 1);
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_table_view_shows_rows() {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        let theme = Theme::dark();
        let rows = make_rows();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, "Total US Cases", &rows, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Total US Cases"));
        assert!(text.contains("2020-03-02"));
        assert!(text.contains("1,224"));
    }

    #[test]
    fn test_render_table_view_empty_rows_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        let theme = Theme::light();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, "Total US Cases", &[], &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data_names_region() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, "Atlantis", &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No daily reports matched Atlantis"));
    }
}
