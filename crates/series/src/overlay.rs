use crate::window::SeriesWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The moving-average windows drawn on the chart by default.
pub const DEFAULT_WINDOWS: [usize; 3] = [7, 30, 90];

/// One point of a moving-average line, positioned on the visible series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    /// Index into the visible series.
    pub index: usize,
    pub date: NaiveDate,
    pub value: f64,
}

/// A moving-average line over the visible range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageOverlay {
    pub window: usize,
    pub points: Vec<OverlayPoint>,
}

impl MovingAverageOverlay {
    /// The average at the right edge of the chart, if the line reaches it.
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }
}

/// Computes a `window`-day moving average across the extended series and keeps
/// the points that land inside the visible range.
///
/// Lookback history in `series.full()` seeds the first visible averages, so a
/// visible point is emitted as soon as `window` days of history exist behind it.
pub fn moving_average_overlay(series: &SeriesWindow, window: usize) -> MovingAverageOverlay {
    let mut overlay = MovingAverageOverlay { window, points: Vec::new() };
    let full = series.full();
    if window == 0 || full.len() < window {
        return overlay;
    }

    let start_index = series.start_index();
    let mut sum = 0.0;
    for (i, point) in full.iter().enumerate() {
        sum += point.value;
        if i >= window {
            sum -= full[i - window].value;
        }
        if i + 1 < window || i < start_index {
            continue;
        }
        overlay.points.push(OverlayPoint {
            index: i - start_index,
            date: point.date,
            value: sum / window as f64,
        });
    }

    tracing::debug!(
        window,
        points = overlay.points.len(),
        "Computed moving-average overlay."
    );
    overlay
}
