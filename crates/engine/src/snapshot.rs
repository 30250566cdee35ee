use crate::error::EngineError;
use analytics::{Extremes, MetricsSnapshot, RangeSummary, TrendIndicator};
use api_client::Freshness;
use chrono::NaiveDate;
use configuration::DashboardSettings;
use core_types::{CurrencyPair, DateRange, RangePreset, SeriesPoint};
use serde::{Deserialize, Serialize};
use series::{MovingAverageOverlay, SeriesWindow};

/// What the caller wants to see. Read-only input to a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub pair: CurrencyPair,
    pub range: RangePreset,
    /// The last day of the visible range, normally `core_types::today()`.
    pub today: NaiveDate,
    /// Moving-average windows to compute overlays for.
    pub moving_averages: Vec<usize>,
    pub show_extremes: bool,
}

impl RefreshRequest {
    /// The request the dashboard opens with, ending on `today`.
    pub fn from_settings(settings: &DashboardSettings, today: NaiveDate) -> Result<Self, EngineError> {
        Ok(Self {
            pair: settings.pair()?,
            range: settings.range,
            today,
            moving_averages: settings.moving_averages.clone(),
            show_extremes: settings.show_extremes,
        })
    }
}

/// Everything the presentation layer needs from one refresh.
///
/// A snapshot is immutable and self-contained; the next refresh produces a
/// new one rather than updating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub pair: CurrencyPair,
    pub range: RangePreset,
    /// The visible window.
    pub window: DateRange,
    /// The window actually fetched, visible window plus lookback.
    pub fetched: DateRange,
    pub series: SeriesWindow,
    pub summary: Option<RangeSummary>,
    pub metrics: MetricsSnapshot,
    pub trend: Option<TrendIndicator>,
    pub overlays: Vec<MovingAverageOverlay>,
    pub extremes: Option<Extremes>,
    /// `Cached` when the provider was unreachable and older data was served.
    pub freshness: Freshness,
}

impl DashboardSnapshot {
    pub fn visible(&self) -> &[SeriesPoint] {
        self.series.visible()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Cached { .. })
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.visible().last()
    }

    pub fn overlay(&self, window: usize) -> Option<&MovingAverageOverlay> {
        self.overlays.iter().find(|o| o.window == window)
    }
}
