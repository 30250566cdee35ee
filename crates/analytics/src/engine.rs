use crate::report::{ExtremePoint, Extremes, MetricsSnapshot, RangeSummary, TrendIndicator};
use crate::stats;
use chrono::{Datelike, NaiveDate};
use core_types::{SeriesPoint, TrendDirection};

/// A stateless calculator for deriving rate statistics from a dense daily series.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the metrics snapshot.
    ///
    /// # Arguments
    ///
    /// * `series` - The displayed dense series, ascending by date.
    ///
    /// # Returns
    ///
    /// A fresh `MetricsSnapshot`. An empty series yields `MetricsSnapshot::empty()`.
    pub fn compute_metrics(&self, series: &[SeriesPoint]) -> MetricsSnapshot {
        if series.is_empty() {
            return MetricsSnapshot::empty();
        }

        // Carried-over points would flatten returns and streaks, so prefer the
        // real observations whenever there are enough of them.
        let observed: Vec<SeriesPoint> = series.iter().filter(|p| !p.filled).copied().collect();
        let observed_only = observed.len() >= 2;
        let basis: &[SeriesPoint] = if observed_only { &observed } else { series };
        let values: Vec<f64> = basis.iter().map(|p| p.value).collect();

        let returns = stats::step_returns(&values);
        let streaks = stats::streaks(&values);
        let slope = stats::regression_slope(&values);
        let first = values[0];

        let snapshot = MetricsSnapshot {
            observations: values.len(),
            observed_only,
            return_count: returns.len(),
            mean: stats::mean(&values),
            median: stats::median(&values),
            ma7: stats::trailing_average(&values, 7),
            ma30: stats::trailing_average(&values, 30),
            ma90: stats::trailing_average(&values, 90),
            volatility: Some(stats::population_std_dev(&returns).unwrap_or(0.0)),
            max_drawdown: Some(stats::max_drawdown(&values)),
            best_return: returns.iter().copied().reduce(f64::max),
            worst_return: returns.iter().copied().reduce(f64::min),
            longest_up_streak: streaks.longest_up,
            longest_down_streak: streaks.longest_down,
            slope,
            slope_pct: slope.filter(|_| first != 0.0).map(|s| s / first),
            z_score: stats::z_score_of_last(&values),
            percentile_rank: stats::percentile_rank_of_last(&values),
            mtd_return: month_to_date(basis),
            ytd_return: year_to_date(basis),
        };

        tracing::debug!(
            observations = snapshot.observations,
            observed_only,
            returns = snapshot.return_count,
            "Computed metrics snapshot."
        );

        snapshot
    }

    /// First/last/min/max of the displayed series. `None` when it is empty.
    pub fn summarize_range(&self, series: &[SeriesPoint]) -> Option<RangeSummary> {
        let first = series.first()?.value;
        let last = series.last()?.value;
        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
                (min.min(p.value), max.max(p.value))
            });
        let change = last - first;
        let change_pct = if first != 0.0 { change / first } else { 0.0 };
        Some(RangeSummary { first, last, min, max, change, change_pct })
    }

    /// The headline trend over the displayed series, filled points included.
    pub fn compute_trend(&self, series: &[SeriesPoint]) -> Option<TrendIndicator> {
        let summary = self.summarize_range(series)?;
        Some(TrendIndicator {
            direction: TrendDirection::from_change(summary.change),
            change: summary.change,
            change_pct: summary.change_pct,
            magnitude: (summary.change_pct.abs() * 400.0 + 10.0).clamp(10.0, 100.0),
        })
    }

    /// Locates the first highest and first lowest point of the displayed series.
    pub fn find_extremes(&self, series: &[SeriesPoint]) -> Option<Extremes> {
        let first = series.first()?;
        let start = ExtremePoint { index: 0, date: first.date, value: first.value };
        let (high, low) = series.iter().enumerate().skip(1).fold(
            (start, start),
            |(mut high, mut low), (index, p)| {
                if p.value > high.value {
                    high = ExtremePoint { index, date: p.date, value: p.value };
                }
                if p.value < low.value {
                    low = ExtremePoint { index, date: p.date, value: p.value };
                }
                (high, low)
            },
        );
        Some(Extremes { high, low })
    }
}

fn month_to_date(points: &[SeriesPoint]) -> Option<f64> {
    let latest = points.last()?;
    period_return(points, latest.date.with_day(1)?)
}

fn year_to_date(points: &[SeriesPoint]) -> Option<f64> {
    let latest = points.last()?;
    period_return(points, NaiveDate::from_ymd_opt(latest.date.year(), 1, 1)?)
}

/// Return of the latest value against the first point on or after `period_start`.
///
/// Only defined when the series starts on or before `period_start`; a series
/// that begins mid-period cannot tell where the period opened.
fn period_return(points: &[SeriesPoint], period_start: NaiveDate) -> Option<f64> {
    let earliest = points.first()?;
    let latest = points.last()?;
    if earliest.date > period_start {
        return None;
    }
    let anchor = points.iter().find(|p| p.date >= period_start)?;
    if anchor.value == 0.0 {
        return None;
    }
    Some((latest.value - anchor.value) / anchor.value)
}
