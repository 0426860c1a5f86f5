//! Daily report discovery and loading.
//!
//! Reads the CSSE `csse_covid_19_daily_reports/*.csv` files under a data root
//! and converts each into a [`Snapshot`]. Loading is all-or-nothing: the first
//! file that fails to ingest aborts the whole corpus.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use csv::StringRecord;
use plotter_core::error::{PlotterError, Result};
use plotter_core::models::{CaseRecord, Corpus, Snapshot, SnapshotDate};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::normalizer::RecordNormalizer;
use crate::schema::{strip_bom, SchemaRegistry};

/// Location of the daily reports relative to the data root.
pub const DAILY_REPORTS_DIR: &str = "csse_covid_19_data/csse_covid_19_daily_reports";

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the `*.csv` files directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list. An entry that cannot be walked,
/// such as a dangling symlink, fails with [`PlotterError::FileRead`] naming it.
pub fn find_report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!("Report directory does not exist: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| PlotterError::FileRead {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let is_report = {
            let name = entry.file_name().to_string_lossy();
            entry.file_type().is_file() && !name.starts_with('.') && name.ends_with(".csv")
        };
        if is_report {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Derive the reporting date from a `MM-DD-YYYY.csv` file name.
///
/// Month and day may be unpadded.
pub fn parse_snapshot_date(path: &Path) -> Result<SnapshotDate> {
    let invalid = || PlotterError::InvalidFilename(path.to_path_buf());

    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let caps = filename_pattern().captures(name).ok_or_else(invalid)?;

    let month: u32 = caps[1].parse().map_err(|_| invalid())?;
    let day: u32 = caps[2].parse().map_err(|_| invalid())?;
    let year: i32 = caps[3].parse().map_err(|_| invalid())?;

    SnapshotDate::from_ymd(year, month, day).ok_or_else(invalid)
}

/// Ingests report files with a fixed schema registry and normalizer.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReader {
    registry: SchemaRegistry,
    normalizer: RecordNormalizer,
}

impl SnapshotReader {
    pub fn new(registry: SchemaRegistry, normalizer: RecordNormalizer) -> Self {
        Self {
            registry,
            normalizer,
        }
    }

    /// Read one report into a [`Snapshot`].
    ///
    /// Every data row must normalize; errors carry the file path and, for row
    /// failures, the 1-based line number.
    pub fn ingest_file(&self, path: &Path) -> Result<Snapshot> {
        let date = parse_snapshot_date(path)?;
        let snapshot = self
            .read_records(path)
            .map(|records| Snapshot {
                date,
                records,
                source: path.to_path_buf(),
            })
            .map_err(|e| e.in_file(path))?;

        debug!(
            "Ingested {}: {} records for {}",
            path.display(),
            snapshot.records.len(),
            snapshot.date
        );
        Ok(snapshot)
    }

    /// Load every daily report under `root`, sorted by date.
    ///
    /// An empty or missing report directory gives an empty corpus. Any file
    /// that fails to ingest fails the whole load.
    pub fn load_corpus(&self, root: &Path) -> Result<Corpus> {
        let dir = root.join(DAILY_REPORTS_DIR);
        let files = find_report_files(&dir)?;
        if files.is_empty() {
            warn!("No daily reports found in {}", dir.display());
            return Ok(Corpus::default());
        }

        let snapshots = files
            .iter()
            .map(|path| {
                self.ingest_file(path).map_err(|e| match e {
                    PlotterError::InvalidFilename(_) => e.in_file(path),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut corpus = Corpus::new(snapshots);
        corpus.sort_by_date();

        info!(
            "Loaded {} snapshots ({} records) from {}",
            corpus.len(),
            corpus.record_count(),
            dir.display()
        );
        Ok(corpus)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn read_records(&self, path: &Path) -> Result<Vec<CaseRecord>> {
        let file = File::open(path).map_err(|source| PlotterError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file)
            .into_records();

        let header = match rows.next() {
            Some(record) => record?,
            None => StringRecord::new(),
        };
        let header_text = header.iter().collect::<Vec<_>>().join(",");
        let layout = self.registry.resolve(strip_bom(&header_text))?;
        debug!("{} uses the {} layout", path.display(), layout.name);

        let mut records = Vec::new();
        for row in rows {
            let row = row?;
            let line = row.position().map_or(0, |p| p.line());
            let fields: Vec<&str> = row.iter().collect();
            let record = self
                .normalizer
                .normalize(layout, &fields)
                .map_err(|e| e.at_line(line))?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Load the corpus under `root` with the built-in layouts and aliases.
pub fn load_corpus(root: &Path) -> Result<Corpus> {
    SnapshotReader::default().load_corpus(root)
}

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})\.csv$").expect("regex is valid"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
