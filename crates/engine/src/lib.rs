use crate::error::EngineError;
use analytics::AnalyticsEngine;
use api_client::{Fetched, Freshness, RateProvider};
use configuration::DashboardSettings;
use core_types::{DateRange, RateObservation};
use series::{SeriesWindow, build_daily_series, moving_average_overlay};
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod error;
pub mod snapshot;

pub use snapshot::{DashboardSnapshot, RefreshRequest};

/// The refresh orchestrator: fetch, fill, analyse.
///
/// The engine keeps no state between refreshes. Two refreshes running at the
/// same time are independent; whichever result the caller stores last is what
/// it displays.
pub struct Engine {
    provider: Arc<dyn RateProvider>,
    analytics: AnalyticsEngine,
    lookback_days: u32,
}

impl Engine {
    /// Creates a new `Engine` on top of a rate provider.
    pub fn new(provider: Arc<dyn RateProvider>, settings: &DashboardSettings) -> Self {
        Self {
            provider,
            analytics: AnalyticsEngine::new(),
            lookback_days: settings.lookback_days,
        }
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// Fetches the provider's currency list (code to display name).
    pub async fn load_currencies(&self) -> Result<Fetched<BTreeMap<String, String>>, EngineError> {
        let currencies = self.provider.fetch_currencies().await?;
        tracing::info!(
            count = currencies.data.len(),
            stale = currencies.is_stale(),
            "Loaded currency list."
        );
        Ok(currencies)
    }

    /// Runs one full refresh for `request`.
    ///
    /// Provider failures surface as `EngineError::DataUnavailable`; sparse or
    /// empty data never fails and yields an empty snapshot instead. Data the
    /// provider served from its cache is marked in `DashboardSnapshot::freshness`.
    pub async fn refresh(&self, request: &RefreshRequest) -> Result<DashboardSnapshot, EngineError> {
        let window = request.range.window_ending(request.today);
        let fetched = window.extended_back(self.lookback_days);

        tracing::info!(
            pair = %request.pair,
            range = %request.range,
            start = %window.start(),
            end = %window.end(),
            "Refreshing rates."
        );

        let response = self
            .provider
            .fetch_rates(&request.pair, fetched.start(), fetched.end())
            .await?;

        Ok(self.assemble(request, window, fetched, &response.data, response.freshness))
    }

    /// Builds the snapshot from already-fetched observations.
    pub fn assemble(
        &self,
        request: &RefreshRequest,
        window: DateRange,
        fetched: DateRange,
        observations: &[RateObservation],
        freshness: Freshness,
    ) -> DashboardSnapshot {
        let full = build_daily_series(observations, &fetched);
        let series = SeriesWindow::split(full, window.start());
        let visible = series.visible();

        let overlays = request
            .moving_averages
            .iter()
            .map(|&w| moving_average_overlay(&series, w))
            .collect();

        let extremes = if request.show_extremes {
            self.analytics.find_extremes(visible)
        } else {
            None
        };

        let snapshot = DashboardSnapshot {
            pair: request.pair.clone(),
            range: request.range,
            window,
            fetched,
            summary: self.analytics.summarize_range(visible),
            metrics: self.analytics.compute_metrics(visible),
            trend: self.analytics.compute_trend(visible),
            overlays,
            extremes,
            series,
            freshness,
        };

        if snapshot.is_empty() {
            tracing::warn!(pair = %request.pair, "No rate data in the requested range.");
        } else {
            tracing::info!(
                points = snapshot.visible().len(),
                observations = observations.len(),
                stale = snapshot.is_stale(),
                "Refresh complete."
            );
        }

        snapshot
    }
}
