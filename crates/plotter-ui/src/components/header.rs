use plotter_core::models::ChartKind;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Decorative marker placed either side of the application title.
pub const MARKERS: &str = "◆ ◇";

/// Plotter header, four lines:
///
/// 1. Application title between markers.
/// 2. A 60-column `=` separator.
/// 3. `[ region | chart kind | window ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// Region label, e.g. `New York, US`.
    pub region: &'a str,
    pub kind: ChartKind,
    /// Moving-average window in days.
    pub window: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(region: &'a str, kind: ChartKind, window: usize, theme: &'a Theme) -> Self {
        Self {
            region,
            kind,
            window,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut info = vec![
            Span::styled("[ ", self.theme.label),
            Span::styled(self.region, self.theme.value),
            Span::styled(" | ", self.theme.label),
            Span::styled(self.kind.label().to_lowercase(), self.theme.value),
        ];
        if self.kind == ChartKind::Average {
            info.push(Span::styled(" | ", self.theme.label));
            info.push(Span::styled(format!("{}-day window", self.window), self.theme.value));
        }
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(vec![
                Span::styled(MARKERS, self.theme.header_accent),
                Span::styled(" COVID-19 DAILY REPORTS ", self.theme.header),
                Span::styled(MARKERS, self.theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(info),
            Line::from(""),
        ]
    }
}

/// Single-line key legend shown under the chart or table.
pub fn key_hints(theme: &Theme) -> Line<'static> {
    let keys = [
        ("t", "totals"),
        ("d", "daily"),
        ("a", "average"),
        ("v", "table"),
        ("q", "quit"),
    ];
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, action) in keys {
        spans.push(Span::styled(format!(" {key} "), theme.value));
        spans.push(Span::styled(format!("{action} "), theme.dim));
    }
    Line::from(spans)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
