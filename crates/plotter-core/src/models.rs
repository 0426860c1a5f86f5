use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// `NaiveDate::num_days_from_ce` of 2020-01-22, the first daily report.
const EPOCH_DAYS_FROM_CE: i64 = 737_446;

/// Reporting date of one snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotDate {
    /// Whole days since 2020-01-22. Declared first so the derived ordering
    /// sorts by it.
    pub day_offset: i64,
    /// Calendar date taken from the file name.
    pub date: NaiveDate,
}

impl SnapshotDate {
    /// Build a snapshot date, computing its offset from the epoch.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            day_offset: i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE,
            date,
        }
    }

    /// Build from calendar components; `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::new)
    }

    /// Inverse of the offset computation; used to label chart axes.
    pub fn from_day_offset(day_offset: i64) -> Option<Self> {
        let days = i32::try_from(day_offset.checked_add(EPOCH_DAYS_FROM_CE)?).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days).map(Self::new)
    }
}

impl fmt::Display for SnapshotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {})", self.date.format("%Y-%m-%d"), self.day_offset)
    }
}

/// One normalized row of a daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Province or state; may be empty.
    pub province: String,
    /// Country or region after alias resolution.
    pub country: String,
    /// Last-update timestamp exactly as written in the file.
    pub last_update: String,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    /// Active cases, only reported by the FIPS layout.
    #[serde(default)]
    pub active: Option<u64>,
    /// County (`Admin2`); empty when the layout has no such column.
    #[serde(default)]
    pub local_area: String,
}

/// All records of one reporting date.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub date: SnapshotDate,
    pub records: Vec<CaseRecord>,
    /// File the snapshot was ingested from.
    pub source: PathBuf,
}

/// Every snapshot loaded in one run.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub snapshots: Vec<Snapshot>,
}

impl Corpus {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    /// Order snapshots by reporting date so consecutive entries are
    /// consecutive days.
    pub fn sort_by_date(&mut self) {
        self.snapshots.sort_by_key(|s| s.date);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Total number of records across every snapshot.
    pub fn record_count(&self) -> usize {
        self.snapshots.iter().map(|s| s.records.len()).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

/// Case totals for one snapshot date after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    pub date: SnapshotDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

impl AggregatedPoint {
    /// Read one metric column.
    pub fn value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
        }
    }
}

/// A case-count column of an aggregated series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Deaths, Metric::Recovered];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
        }
    }
}

/// Which derived series a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Cumulative totals per snapshot.
    Totals,
    /// Day-over-day change of the totals.
    Daily,
    /// Trailing moving average of the daily change.
    Average,
}

impl ChartKind {
    /// Parse a CLI value; unknown names fall back to `Totals`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "daily" => ChartKind::Daily,
            "average" => ChartKind::Average,
            _ => ChartKind::Totals,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Totals => "Total",
            ChartKind::Daily => "Daily",
            ChartKind::Average => "Average Daily",
        }
    }
}

/// Plottable `(day_offset, value)` pairs for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub points: Vec<(f64, f64)>,
}

impl ChartSeries {
    /// `(min, max)` of the y values, `None` when empty.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|&(_, y)| y);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, confirmed: u64) -> AggregatedPoint {
        AggregatedPoint {
            date: SnapshotDate::from_ymd(2020, 3, day).unwrap(),
            confirmed,
            deaths: confirmed / 10,
            recovered: confirmed / 2,
        }
    }

    #[test]
    fn test_epoch_has_offset_zero() {
        let d = SnapshotDate::from_ymd(2020, 1, 22).unwrap();
        assert_eq!(d.day_offset, 0);
    }

    #[test]
    fn test_day_offset_march_fifth() {
        let d = SnapshotDate::from_ymd(2020, 3, 5).unwrap();
        assert_eq!(d.day_offset, 43);
    }

    #[test]
    fn test_day_offset_across_year_boundary() {
        let d = SnapshotDate::from_ymd(2021, 1, 22).unwrap();
        // 2020 is a leap year.
        assert_eq!(d.day_offset, 366);
    }

    #[test]
    fn test_from_ymd_rejects_impossible_date() {
        assert!(SnapshotDate::from_ymd(2020, 2, 30).is_none());
    }

    #[test]
    fn test_from_day_offset_inverts_offset() {
        let date = SnapshotDate::from_day_offset(43).unwrap();
        assert_eq!(date, SnapshotDate::from_ymd(2020, 3, 5).unwrap());
        assert_eq!(SnapshotDate::from_day_offset(-1).unwrap().date.to_string(), "2020-01-21");
        assert!(SnapshotDate::from_day_offset(i64::MAX).is_none());
    }

    #[test]
    fn test_snapshot_date_display() {
        let d = SnapshotDate::from_ymd(2020, 3, 5).unwrap();
        assert_eq!(d.to_string(), "2020-03-05 (day 43)");
    }

    #[test]
    fn test_corpus_sort_by_date() {
        let mk = |day| Snapshot {
            date: SnapshotDate::from_ymd(2020, 2, day).unwrap(),
            records: vec![],
            source: PathBuf::new(),
        };
        let mut corpus = Corpus::new(vec![mk(10), mk(2), mk(5)]);
        corpus.sort_by_date();
        let days: Vec<u32> = corpus.iter().map(|s| s.date.date.day()).collect();
        assert_eq!(days, vec![2, 5, 10]);
    }

    #[test]
    fn test_aggregated_point_value() {
        let p = point(1, 100);
        assert_eq!(p.value(Metric::Confirmed), 100);
        assert_eq!(p.value(Metric::Deaths), 10);
        assert_eq!(p.value(Metric::Recovered), 50);
    }

    #[test]
    fn test_chart_kind_from_name() {
        assert_eq!(ChartKind::from_name("daily"), ChartKind::Daily);
        assert_eq!(ChartKind::from_name("average"), ChartKind::Average);
        assert_eq!(ChartKind::from_name("totals"), ChartKind::Totals);
        assert_eq!(ChartKind::from_name("bogus"), ChartKind::Totals);
    }

    #[test]
    fn test_chart_series_value_bounds() {
        let s = ChartSeries {
            metric: Metric::Deaths,
            points: vec![(0.0, 4.0), (1.0, -2.0), (2.0, 9.0)],
        };
        assert_eq!(s.value_bounds(), Some((-2.0, 9.0)));
        let empty = ChartSeries {
            metric: Metric::Deaths,
            points: vec![],
        };
        assert_eq!(empty.value_bounds(), None);
    }

    #[test]
    fn test_aggregated_point_serializes_with_offset() {
        let json = serde_json::to_value(point(5, 20)).unwrap();
        assert_eq!(json["date"]["day_offset"], 43);
        assert_eq!(json["date"]["date"], "2020-03-05");
        assert_eq!(json["confirmed"], 20);
    }
}
