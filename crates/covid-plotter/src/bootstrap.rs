use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directory name of a JHU CSSE COVID-19 repository checkout.
pub const DATA_DIR_NAME: &str = "COVID-19";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name onto an [`EnvFilter`] directive.
///
/// Unrecognised names pass through unchanged so `RUST_LOG`-style directives
/// such as `plotter_data=debug` keep working.
pub fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to `log_file` when given (appending, no ANSI colours) and to
/// stderr otherwise. Unknown level names fall back to `warn`.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging is already initialised")?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Places a `COVID-19` checkout is looked for, in order:
/// 1. next to the executable,
/// 2. the current directory,
/// 3. the home directory.
pub fn data_path_candidates() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    [exe_dir, Some(PathBuf::from(".")), dirs::home_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .collect()
}

fn first_existing(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.exists())
}

/// Locate the data root, defaulting to `./COVID-19` when no candidate
/// exists so the loader reports an empty corpus for that path.
pub fn discover_data_path() -> PathBuf {
    first_existing(data_path_candidates()).unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
