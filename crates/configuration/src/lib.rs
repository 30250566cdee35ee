use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DashboardSettings, LoggingSettings, ProviderSettings};

/// The file read by `load_config` when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `RATEWATCH__PROVIDER__BASE_URL`.
pub const ENV_PREFIX: &str = "RATEWATCH";

/// The shortest lookback that still seeds the widest standard moving average.
pub const MIN_LOOKBACK_DAYS: u32 = 90;

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the configuration from `path`, then applies environment overrides.
///
/// A missing file is not an error: every setting has a default. The result
/// is validated before it is returned.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dashboard.moving_averages")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

impl Config {
    /// Checks the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                key: "provider.base_url",
                reason: "must not be empty".to_string(),
            });
        }

        if self.provider.offline_cache && self.provider.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                key: "provider.cache_dir",
                reason: "must not be empty while offline_cache is enabled".to_string(),
            });
        }

        self.dashboard.pair()?;

        let windows = &self.dashboard.moving_averages;
        if windows.contains(&0) {
            return Err(ConfigError::ValidationError {
                key: "dashboard.moving_averages",
                reason: "windows must be at least one day".to_string(),
            });
        }

        let widest = windows.iter().copied().max().unwrap_or(0);
        let lookback = self.dashboard.lookback_days;
        if lookback < MIN_LOOKBACK_DAYS || (lookback as usize) < widest {
            return Err(ConfigError::ValidationError {
                key: "dashboard.lookback_days",
                reason: format!(
                    "{} is too short; need at least {} and at least the widest moving average ({})",
                    lookback, MIN_LOOKBACK_DAYS, widest
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::RangePreset;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config_from(Path::new("/nonexistent/ratewatch.toml")).unwrap();
        assert_eq!(config.provider.base_url, "https://api.frankfurter.app");
        assert_eq!(config.provider.timeout, Duration::from_secs(10));
        assert_eq!(config.dashboard.range, RangePreset::ThreeMonths);
        assert_eq!(config.dashboard.lookback_days, 104);
        assert_eq!(config.dashboard.moving_averages, vec![7, 30, 90]);
        assert!(config.provider.offline_cache);
        assert_eq!(config.provider.cache_dir, std::path::PathBuf::from(".ratewatch/cache"));
    }

    #[test]
    fn cache_dir_is_read_and_required_when_caching() {
        let file = write_config("[provider]\ncache_dir = \"/var/cache/ratewatch\"\n");
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.provider.cache_dir, std::path::PathBuf::from("/var/cache/ratewatch"));

        let mut config = Config::default();
        config.provider.cache_dir = std::path::PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { key: "provider.cache_dir", .. })
        ));
        config.provider.offline_cache = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [provider]
            timeout = "2s 500ms"
            offline_cache = false

            [dashboard]
            base = "usd"
            quote = "jpy"
            range = "1y"
            moving_averages = [7, 30]
            "#,
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.provider.timeout, Duration::from_millis(2500));
        assert!(!config.provider.offline_cache);
        assert_eq!(config.dashboard.range, RangePreset::OneYear);
        assert_eq!(config.dashboard.moving_averages, vec![7, 30]);
        let pair = config.dashboard.pair().unwrap();
        assert_eq!((pair.base.as_str(), pair.quote.as_str()), ("USD", "JPY"));
        // Untouched sections keep their defaults.
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn short_lookback_is_rejected() {
        let file = write_config("[dashboard]\nlookback_days = 30\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { key: "dashboard.lookback_days", .. }));
    }

    #[test]
    fn lookback_must_cover_the_widest_window() {
        let mut config = Config::default();
        config.dashboard.moving_averages = vec![7, 200];
        assert!(config.validate().is_err());
        config.dashboard.lookback_days = 200;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut config = Config::default();
        config.dashboard.moving_averages = vec![0, 7];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { key: "dashboard.moving_averages", .. })
        ));
    }

    #[test]
    fn bad_currency_is_rejected() {
        let mut config = Config::default();
        config.dashboard.quote = "EURO".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDefault(_))));
    }

    #[test]
    fn unknown_range_fails_to_load() {
        let file = write_config("[dashboard]\nrange = \"5d\"\n");
        assert!(matches!(load_config_from(file.path()), Err(ConfigError::LoadError(_))));
    }
}
