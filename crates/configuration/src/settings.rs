use core_types::{CoreError, CurrencyPair, RangePreset};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

/// Contains parameters for the remote exchange-rate provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Root URL of the Frankfurter-compatible REST service.
    pub base_url: String,
    /// Request timeout handed to the HTTP client (e.g. "10s").
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Serve the last good response when the provider cannot be reached.
    pub offline_cache: bool,
    /// Where the last good responses are kept between runs.
    pub cache_dir: PathBuf,
}

/// Contains the defaults for what the dashboard shows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Base currency code (the "1 unit of" side).
    pub base: String,
    /// Quote currency code.
    pub quote: String,
    pub range: RangePreset,
    /// Extra calendar days fetched before the visible range to seed moving averages.
    pub lookback_days: u32,
    /// Moving-average windows drawn over the rate line.
    pub moving_averages: Vec<usize>,
    /// Draw the high/low markers.
    pub show_extremes: bool,
}

/// Contains parameters for log output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.frankfurter.app".to_string(),
            timeout: Duration::from_secs(10),
            offline_cache: true,
            cache_dir: PathBuf::from(".ratewatch/cache"),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base: "CZK".to_string(),
            quote: "EUR".to_string(),
            range: RangePreset::ThreeMonths,
            lookback_days: 104,
            moving_averages: vec![7, 30, 90],
            show_extremes: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl DashboardSettings {
    /// The configured default currency pair.
    pub fn pair(&self) -> Result<CurrencyPair, CoreError> {
        CurrencyPair::new(&self.base, &self.quote)
    }
}
