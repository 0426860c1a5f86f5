//! Top-level pipeline: load the report corpus and aggregate it for one region.
//!
//! Returns an [`AnalysisResult`] ready for the UI layer or JSON output.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use plotter_core::error::Result;
use plotter_core::models::AggregatedPoint;
use serde::Serialize;
use tracing::info;

use crate::aggregator::{aggregate, DayRange, RegionFilter};
use crate::reader::SnapshotReader;

// ── Public types ──────────────────────────────────────────────────────────────

/// What to load and how to slice it.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Repository root containing the daily report directory.
    pub root: PathBuf,
    pub filter: RegionFilter,
    pub range: DayRange,
}

/// Metadata produced alongside the aggregated points.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// Human-readable region, e.g. `New York, US`.
    pub region: String,
    pub snapshots_loaded: usize,
    pub records_loaded: usize,
    /// Number of points after the day range was applied.
    pub points: usize,
    /// Wall-clock seconds spent reading and parsing the reports.
    pub load_time_seconds: f64,
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub points: Vec<AggregatedPoint>,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the pipeline with the built-in layouts and aliases.
pub fn analyze(request: &AnalysisRequest) -> Result<AnalysisResult> {
    analyze_with(&SnapshotReader::default(), request)
}

/// Run the pipeline with a caller-supplied reader.
pub fn analyze_with(reader: &SnapshotReader, request: &AnalysisRequest) -> Result<AnalysisResult> {
    let load_start = Instant::now();
    let corpus = reader.load_corpus(&request.root)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let points = aggregate(&corpus, &request.filter, request.range)?;
    info!(
        "Aggregated {} points for {} in {:.3}s",
        points.len(),
        request.filter.label(),
        load_time
    );

    let metadata = AnalysisMetadata {
        region: request.filter.label(),
        snapshots_loaded: corpus.len(),
        records_loaded: corpus.record_count(),
        points: points.len(),
        load_time_seconds: load_time,
        generated_at: Utc::now().to_rfc3339(),
    };

    Ok(AnalysisResult { points, metadata })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
