use clap::Parser;
use std::path::PathBuf;

use crate::models::ChartKind;
use crate::series::DEFAULT_WINDOW;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Chart COVID-19 case counts from the JHU CSSE daily reports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "covid-plotter",
    about = "Chart COVID-19 case counts from the JHU CSSE daily reports",
    version
)]
pub struct Settings {
    /// Path to a checkout of the JHU CSSE COVID-19 repository
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Country to gather data for
    #[arg(long, default_value = "US")]
    pub country: String,

    /// Province or state within the country
    #[arg(long)]
    pub province: Option<String>,

    /// County within the province (requires --province)
    #[arg(long)]
    pub county: Option<String>,

    /// First day (offset from 2020-01-22) to include
    #[arg(long, allow_negative_numbers = true)]
    pub min_day: Option<i64>,

    /// Last day (offset from 2020-01-22) to include
    #[arg(long, allow_negative_numbers = true)]
    pub max_day: Option<i64>,

    /// Moving-average window in days
    #[arg(long, default_value_t = DEFAULT_WINDOW as u32, value_parser = clap::value_parser!(u32).range(1..))]
    pub window: u32,

    /// Chart shown first
    #[arg(long, default_value = "totals", value_parser = ["totals", "daily", "average"])]
    pub chart: String,

    /// Output mode
    #[arg(long, default_value = "tui", value_parser = ["tui", "table", "json"])]
    pub output: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Chart selected with `--chart`.
    pub fn chart_kind(&self) -> ChartKind {
        ChartKind::from_name(&self.chart)
    }

    /// Moving-average window as a length.
    pub fn window_len(&self) -> usize {
        self.window as usize
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
