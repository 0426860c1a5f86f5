//! Data layer for the COVID-19 plotter.
//!
//! Discovers and parses the CSSE daily report CSVs, recognises their header
//! layouts, normalizes rows into case records, aggregates them by region and
//! runs the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod normalizer;
pub mod reader;
pub mod schema;

pub use plotter_core as core;
