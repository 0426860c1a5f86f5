//! Case-count aggregation by region and reporting day.

use plotter_core::error::{PlotterError, Result};
use plotter_core::models::{AggregatedPoint, CaseRecord, Corpus, Snapshot};

// ── RegionFilter ──────────────────────────────────────────────────────────────

/// Geographic selection applied to every record. Matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionFilter {
    Country(String),
    Province {
        country: String,
        province: String,
    },
    County {
        country: String,
        province: String,
        county: String,
    },
}

impl RegionFilter {
    /// Narrowest filter the given names allow.
    ///
    /// A county needs its province; anything else is a configuration error.
    pub fn from_parts(
        country: impl Into<String>,
        province: Option<String>,
        county: Option<String>,
    ) -> Result<Self> {
        let country = country.into();
        match (province, county) {
            (None, None) => Ok(RegionFilter::Country(country)),
            (Some(province), None) => Ok(RegionFilter::Province { country, province }),
            (Some(province), Some(county)) => Ok(RegionFilter::County {
                country,
                province,
                county,
            }),
            (None, Some(county)) => Err(PlotterError::Config(format!(
                "county {county:?} requires a province"
            ))),
        }
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        match self {
            RegionFilter::Country(country) => record.country == *country,
            RegionFilter::Province { country, province } => {
                record.country == *country && record.province == *province
            }
            RegionFilter::County {
                country,
                province,
                county,
            } => {
                record.country == *country
                    && record.province == *province
                    && record.local_area == *county
            }
        }
    }

    /// Human-readable region, most specific first: `Kings, New York, US`.
    pub fn label(&self) -> String {
        match self {
            RegionFilter::Country(country) => country.clone(),
            RegionFilter::Province { country, province } => format!("{province}, {country}"),
            RegionFilter::County {
                country,
                province,
                county,
            } => format!("{county}, {province}, {country}"),
        }
    }

    /// Chart title, e.g. `Total US Cases`.
    pub fn title(&self) -> String {
        format!("Total {} Cases", self.label())
    }
}

// ── DayRange ──────────────────────────────────────────────────────────────────

/// Inclusive, optionally open-ended range of day offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl DayRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// Range containing every day.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, day_offset: i64) -> bool {
        self.min.map_or(true, |min| day_offset >= min)
            && self.max.map_or(true, |max| day_offset <= max)
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

/// Sum matching records of one snapshot. Snapshots without a match give a
/// zero point rather than being skipped.
///
/// Fails with [`PlotterError::CountOverflow`] when a metric's total does not
/// fit in a `u64`.
pub fn aggregate_snapshot(snapshot: &Snapshot, filter: &RegionFilter) -> Result<AggregatedPoint> {
    let overflow = |field: &'static str| PlotterError::CountOverflow {
        field,
        date: snapshot.date.date.format("%Y-%m-%d").to_string(),
    };

    snapshot
        .records
        .iter()
        .filter(|record| filter.matches(record))
        .try_fold(
            AggregatedPoint {
                date: snapshot.date,
                confirmed: 0,
                deaths: 0,
                recovered: 0,
            },
            |mut acc, record| {
                acc.confirmed = acc
                    .confirmed
                    .checked_add(record.confirmed)
                    .ok_or_else(|| overflow("Confirmed"))?;
                acc.deaths = acc
                    .deaths
                    .checked_add(record.deaths)
                    .ok_or_else(|| overflow("Deaths"))?;
                acc.recovered = acc
                    .recovered
                    .checked_add(record.recovered)
                    .ok_or_else(|| overflow("Recovered"))?;
                Ok(acc)
            },
        )
}

/// One point per snapshot inside `range`, in corpus order.
pub fn aggregate(
    corpus: &Corpus,
    filter: &RegionFilter,
    range: DayRange,
) -> Result<Vec<AggregatedPoint>> {
    corpus
        .iter()
        .filter(|snapshot| range.contains(snapshot.date.day_offset))
        .map(|snapshot| aggregate_snapshot(snapshot, filter))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
