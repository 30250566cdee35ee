use chrono::NaiveDate;
use core_types::TrendDirection;
use serde::{Deserialize, Serialize};

/// The full set of descriptive statistics for one refresh.
///
/// Optional metrics are `None` whenever their precondition fails (too few
/// values, a zero denominator, no returns). `None` is never the same as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // I. Basis
    /// Number of values the metrics were computed over.
    pub observations: usize,
    /// `true` when carried-over points were excluded from the basis.
    pub observed_only: bool,
    /// Number of step returns behind volatility and best/worst.
    pub return_count: usize,

    // II. Level
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub ma7: Option<f64>,
    pub ma30: Option<f64>,
    pub ma90: Option<f64>,

    // III. Risk
    pub volatility: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub best_return: Option<f64>,
    pub worst_return: Option<f64>,

    // IV. Direction
    pub longest_up_streak: usize,
    pub longest_down_streak: usize,
    pub slope: Option<f64>,
    /// Slope relative to the first value.
    pub slope_pct: Option<f64>,

    // V. Position of the latest value
    pub z_score: Option<f64>,
    pub percentile_rank: Option<f64>,
    pub mtd_return: Option<f64>,
    pub ytd_return: Option<f64>,
}

impl MetricsSnapshot {
    /// The snapshot of an empty series: every optional metric absent.
    pub fn empty() -> Self {
        Self {
            observations: 0,
            observed_only: false,
            return_count: 0,
            mean: None,
            median: None,
            ma7: None,
            ma30: None,
            ma90: None,
            volatility: None,
            max_drawdown: None,
            best_return: None,
            worst_return: None,
            longest_up_streak: 0,
            longest_down_streak: 0,
            slope: None,
            slope_pct: None,
            z_score: None,
            percentile_rank: None,
            mtd_return: None,
            ytd_return: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }

    /// The trailing average for one of the standard windows (7, 30, 90).
    pub fn moving_average(&self, window: usize) -> Option<f64> {
        match window {
            7 => self.ma7,
            30 => self.ma30,
            90 => self.ma90,
            _ => None,
        }
    }
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// The headline trend badge: first vs. last value of the displayed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendIndicator {
    pub direction: TrendDirection,
    /// Absolute change, last minus first.
    pub change: f64,
    /// Change relative to the first value; 0 when the first value is 0.
    pub change_pct: f64,
    /// Visual intensity of the trend bar, in `[10, 100]`.
    pub magnitude: f64,
}

/// First/last/min/max of the displayed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub first: f64,
    pub last: f64,
    pub min: f64,
    pub max: f64,
    pub change: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremePoint {
    /// Index into the displayed series.
    pub index: usize,
    pub date: NaiveDate,
    pub value: f64,
}

/// The high and low markers of the displayed range (first occurrence of each).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub high: ExtremePoint,
    pub low: ExtremePoint,
}
