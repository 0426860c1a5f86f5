//! Shared domain layer for the COVID-19 plotter.
//!
//! Holds the snapshot and aggregate types, the error taxonomy, CLI settings,
//! the series transforms (daily deltas, moving averages) and number
//! formatting used by the data and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod series;
pub mod settings;

pub use error::{PlotterError, Result};
