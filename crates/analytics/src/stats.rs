//! Descriptive statistics over a plain sequence of rate values.
//!
//! Every function is total: inputs too short for a statistic yield `None`
//! (or the documented neutral value), never a panic or a NaN.

use serde::{Deserialize, Serialize};

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Middle value of the sorted sequence; the mean of the central pair when the length is even.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted_copy(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Mean of the last `window` values, `None` if fewer are available.
pub fn trailing_average(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Population standard deviation.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Relative change between consecutive values. Steps from a zero value are skipped.
pub fn step_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// The most negative decline from a running peak, as a fraction of that peak.
///
/// Returns 0 for an empty or never-declining sequence.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_drawdown = 0.0;
    for &value in values {
        if value > peak {
            peak = value;
        }
        let drawdown = if peak != 0.0 { (value - peak) / peak } else { 0.0 };
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
    }
    max_drawdown
}

/// Longest runs of strictly rising and strictly falling steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub longest_up: usize,
    pub longest_down: usize,
}

/// Counts streaks in steps; an unchanged value ends both kinds of run.
pub fn streaks(values: &[f64]) -> Streaks {
    let mut result = Streaks::default();
    let (mut up, mut down) = (0, 0);
    for w in values.windows(2) {
        if w[1] > w[0] {
            up += 1;
            down = 0;
        } else if w[1] < w[0] {
            down += 1;
            up = 0;
        } else {
            up = 0;
            down = 0;
        }
        result.longest_up = result.longest_up.max(up);
        result.longest_down = result.longest_down.max(down);
    }
    result
}

/// Ordinary least-squares slope of the values against their index `0..n`.
pub fn regression_slope(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    Some((n * sum_xy - sum_x * sum_y) / denominator)
}

/// How many population standard deviations the last value sits from the mean.
pub fn z_score_of_last(values: &[f64]) -> Option<f64> {
    let last = *values.last()?;
    let mean = mean(values)?;
    let std_dev = population_std_dev(values)?;
    if std_dev == 0.0 {
        return None;
    }
    Some((last - mean) / std_dev)
}

/// Rank of the last value within the whole sequence, in `[0, 1]`.
///
/// Counts values `<=` the last one, the last one included, so ties rank high.
pub fn percentile_rank_of_last(values: &[f64]) -> Option<f64> {
    if values.len() <= 1 {
        return None;
    }
    let last = *values.last()?;
    let at_or_below = values.iter().filter(|&&v| v <= last).count();
    Some((at_or_below - 1) as f64 / (values.len() - 1) as f64)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}
