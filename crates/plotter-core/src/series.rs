//! Derived series: daily deltas and trailing moving averages.
//!
//! All transforms work on one metric at a time; [`chart_series`] applies them
//! to each [`Metric`] of an aggregated series with the same index alignment.

use crate::error::{PlotterError, Result};
use crate::models::{AggregatedPoint, ChartKind, ChartSeries, Metric};

/// Default moving-average window in days.
pub const DEFAULT_WINDOW: usize = 7;

/// Differences between consecutive cumulative values.
///
/// `out[i] = series[i + 1] - series[i]`. Negative values are kept: reports
/// are sometimes revised downward. Differences beyond the `i64` range
/// saturate at `i64::MIN` / `i64::MAX`.
pub fn deltas(series: &[u64]) -> Vec<i64> {
    series
        .windows(2)
        .map(|pair| {
            let diff = i128::from(pair[1]) - i128::from(pair[0]);
            i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
        })
        .collect()
}

/// Unweighted trailing mean over every contiguous window of `window` values.
///
/// Returns `series.len() - window + 1` values.
pub fn moving_average(series: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 || window > series.len() {
        return Err(PlotterError::InvalidWindow {
            window,
            len: series.len(),
        });
    }

    let mut out = Vec::with_capacity(series.len() - window + 1);
    let mut sum: f64 = series[..window].iter().sum();
    out.push(sum / window as f64);
    for i in window..series.len() {
        sum += series[i] - series[i - window];
        out.push(sum / window as f64);
    }
    Ok(out)
}

/// Build one plottable series per metric for `kind`.
///
/// * `Totals`  – x is each point's day offset.
/// * `Daily`   – `delta[i]` is plotted at the day of `points[i + 1]`.
/// * `Average` – each mean is plotted at the day of the window's last delta.
///
/// `window` is only consulted for `Average`.
pub fn chart_series(
    points: &[AggregatedPoint],
    kind: ChartKind,
    window: usize,
) -> Result<Vec<ChartSeries>> {
    let days: Vec<f64> = points.iter().map(|p| p.date.day_offset as f64).collect();

    Metric::ALL
        .iter()
        .map(|&metric| {
            let totals: Vec<u64> = points.iter().map(|p| p.value(metric)).collect();
            let values: Vec<(f64, f64)> = match kind {
                ChartKind::Totals => days
                    .iter()
                    .zip(&totals)
                    .map(|(&x, &y)| (x, y as f64))
                    .collect(),
                ChartKind::Daily => {
                    let daily = deltas(&totals);
                    days.iter()
                        .skip(1)
                        .zip(&daily)
                        .map(|(&x, &y)| (x, y as f64))
                        .collect()
                }
                ChartKind::Average => {
                    let daily: Vec<f64> = deltas(&totals).into_iter().map(|d| d as f64).collect();
                    let averaged = moving_average(&daily, window)?;
                    days.iter()
                        .skip(window)
                        .zip(&averaged)
                        .map(|(&x, &y)| (x, y))
                        .collect()
                }
            };
            Ok(ChartSeries {
                metric,
                points: values,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnapshotDate;

    fn points(confirmed: &[u64]) -> Vec<AggregatedPoint> {
        confirmed
            .iter()
            .enumerate()
            .map(|(i, &c)| AggregatedPoint {
                date: SnapshotDate::from_ymd(2020, 3, 1 + i as u32).unwrap(),
                confirmed: c,
                deaths: c / 10,
                recovered: 0,
            })
            .collect()
    }

    // ── deltas ────────────────────────────────────────────────────────────────

    #[test]
    fn test_deltas_basic() {
        assert_eq!(deltas(&[10, 15, 15, 20]), vec![5, 0, 5]);
    }

    #[test]
    fn test_deltas_downward_revision_is_negative() {
        assert_eq!(deltas(&[100, 90, 95]), vec![-10, 5]);
    }

    #[test]
    fn test_deltas_saturate_beyond_i64() {
        assert_eq!(deltas(&[0, u64::MAX]), vec![i64::MAX]);
        assert_eq!(deltas(&[u64::MAX, 0]), vec![i64::MIN]);
        assert_eq!(deltas(&[u64::MAX - 1, u64::MAX]), vec![1]);
    }

    #[test]
    fn test_deltas_short_input() {
        assert!(deltas(&[]).is_empty());
        assert!(deltas(&[42]).is_empty());
    }

    // ── moving_average ────────────────────────────────────────────────────────

    #[test]
    fn test_moving_average_basic() {
        let avg = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(avg, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_moving_average_window_equals_len() {
        let avg = moving_average(&[2.0, 4.0, 6.0], 3).unwrap();
        assert_eq!(avg, vec![4.0]);
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let avg = moving_average(&[3.0, -1.0, 7.5], 1).unwrap();
        assert_eq!(avg, vec![3.0, -1.0, 7.5]);
    }

    #[test]
    fn test_moving_average_window_too_large() {
        let err = moving_average(&[1.0, 2.0], 3).unwrap_err();
        assert!(matches!(
            err,
            PlotterError::InvalidWindow { window: 3, len: 2 }
        ));
    }

    #[test]
    fn test_moving_average_zero_window() {
        let err = moving_average(&[1.0, 2.0], 0).unwrap_err();
        assert!(matches!(err, PlotterError::InvalidWindow { window: 0, .. }));
    }

    // ── chart_series ──────────────────────────────────────────────────────────

    #[test]
    fn test_chart_series_totals_alignment() {
        let series = chart_series(&points(&[10, 15, 15, 20]), ChartKind::Totals, 7).unwrap();
        assert_eq!(series.len(), 3);
        let confirmed = &series[0];
        assert_eq!(confirmed.metric, Metric::Confirmed);
        // 2020-03-01 is day 39.
        assert_eq!(
            confirmed.points,
            vec![(39.0, 10.0), (40.0, 15.0), (41.0, 15.0), (42.0, 20.0)]
        );
    }

    #[test]
    fn test_chart_series_daily_alignment() {
        let series = chart_series(&points(&[10, 15, 15, 20]), ChartKind::Daily, 7).unwrap();
        assert_eq!(
            series[0].points,
            vec![(40.0, 5.0), (41.0, 0.0), (42.0, 5.0)]
        );
    }

    #[test]
    fn test_chart_series_average_alignment() {
        let series =
            chart_series(&points(&[0, 10, 30, 60, 100]), ChartKind::Average, 2).unwrap();
        // deltas: 10, 20, 30, 40 -> means 15, 25, 35 at days 41, 42, 43.
        assert_eq!(
            series[0].points,
            vec![(41.0, 15.0), (42.0, 25.0), (43.0, 35.0)]
        );
    }

    #[test]
    fn test_chart_series_metrics_share_alignment() {
        let series = chart_series(&points(&[0, 100, 300]), ChartKind::Daily, 7).unwrap();
        let xs: Vec<Vec<f64>> = series
            .iter()
            .map(|s| s.points.iter().map(|p| p.0).collect())
            .collect();
        assert_eq!(xs[0], xs[1]);
        assert_eq!(xs[1], xs[2]);
        assert_eq!(series[1].points[1].1, 20.0);
    }

    #[test]
    fn test_chart_series_average_window_too_large() {
        let err = chart_series(&points(&[1, 2, 3]), ChartKind::Average, 7).unwrap_err();
        assert!(matches!(err, PlotterError::InvalidWindow { window: 7, len: 2 }));
    }
}
