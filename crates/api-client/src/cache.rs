use crate::RateProvider;
use crate::error::ApiError;
use crate::fetched::Fetched;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{CurrencyPair, RateObservation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

const CURRENCIES_FILE: &str = "currencies.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCurrencies {
    stored_at: DateTime<Utc>,
    currencies: BTreeMap<String, String>,
}

/// The last good rates response for one pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRates {
    pair: CurrencyPair,
    start: NaiveDate,
    end: NaiveDate,
    stored_at: DateTime<Utc>,
    observations: Vec<RateObservation>,
}

impl StoredRates {
    /// The stored observations inside `[start, end]`, `None` if there are none.
    fn within(&self, start: NaiveDate, end: NaiveDate) -> Option<Vec<RateObservation>> {
        let observations: Vec<RateObservation> = self
            .observations
            .iter()
            .filter(|o| start <= o.date && o.date <= end)
            .copied()
            .collect();
        (!observations.is_empty()).then_some(observations)
    }
}

fn rates_file(pair: &CurrencyPair) -> String {
    format!("rates-{}-{}.json", pair.base, pair.quote)
}

async fn write_json<T: Serialize>(directory: &Path, name: &str, value: &T) -> std::io::Result<()> {
    tokio::fs::create_dir_all(directory).await?;
    let bytes = serde_json::to_vec_pretty(value)?;
    let path = directory.join(name);
    let partial = path.with_extension("json.partial");
    tokio::fs::write(&partial, bytes).await?;
    tokio::fs::rename(&partial, &path).await
}

/// A network-first provider that falls back to the last good response.
///
/// Every live response is remembered, one entry per pair (plus the currency
/// list), in memory and, when a directory is given, as JSON files so a later
/// process can still serve it. When the wrapped provider fails, the remembered
/// response is returned tagged `Freshness::Cached`; without one, the original
/// error is returned.
pub struct FallbackCache {
    inner: Arc<dyn RateProvider>,
    directory: Option<PathBuf>,
    currencies: RwLock<Option<StoredCurrencies>>,
    rates: RwLock<HashMap<CurrencyPair, StoredRates>>,
}

impl FallbackCache {
    /// A cache that lives only as long as this process.
    pub fn new(inner: Arc<dyn RateProvider>) -> Self {
        Self {
            inner,
            directory: None,
            currencies: RwLock::new(None),
            rates: RwLock::new(HashMap::new()),
        }
    }

    /// A cache that also persists responses under `directory`.
    pub fn with_directory(inner: Arc<dyn RateProvider>, directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            ..Self::new(inner)
        }
    }

    /// Number of pairs with a remembered rates response in memory.
    pub async fn cached_pairs(&self) -> usize {
        self.rates.read().await.len()
    }

    async fn read_file<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.directory.as_ref()?.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable cache file.");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read cache file.");
                None
            }
        }
    }

    async fn write_file<T: Serialize>(&self, name: &str, value: &T) {
        let Some(directory) = &self.directory else {
            return;
        };
        if let Err(e) = write_json(directory, name, value).await {
            tracing::warn!(directory = %directory.display(), file = name, error = %e, "Failed to write cache file.");
        }
    }
}

#[async_trait]
impl RateProvider for FallbackCache {
    async fn fetch_currencies(&self) -> Result<Fetched<BTreeMap<String, String>>, ApiError> {
        match self.inner.fetch_currencies().await {
            Ok(fetched) => {
                if !fetched.is_stale() {
                    let stored = StoredCurrencies {
                        stored_at: Utc::now(),
                        currencies: fetched.data.clone(),
                    };
                    self.write_file(CURRENCIES_FILE, &stored).await;
                    *self.currencies.write().await = Some(stored);
                }
                Ok(fetched)
            }
            Err(e) => {
                let remembered = self.currencies.read().await.clone();
                let stored = match remembered {
                    Some(stored) => Some(stored),
                    None => self.read_file::<StoredCurrencies>(CURRENCIES_FILE).await,
                };
                match stored {
                    Some(stored) => {
                        tracing::warn!(
                            error = %e,
                            stored_at = %stored.stored_at,
                            "Provider unavailable, serving cached currency list."
                        );
                        Ok(Fetched::cached(stored.currencies, stored.stored_at))
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn fetch_rates(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Fetched<Vec<RateObservation>>, ApiError> {
        match self.inner.fetch_rates(pair, start, end).await {
            Ok(fetched) => {
                if !fetched.is_stale() {
                    let stored = StoredRates {
                        pair: pair.clone(),
                        start,
                        end,
                        stored_at: Utc::now(),
                        observations: fetched.data.clone(),
                    };
                    self.write_file(&rates_file(pair), &stored).await;
                    // Replaces the pair's previous entry.
                    self.rates.write().await.insert(pair.clone(), stored);
                }
                Ok(fetched)
            }
            Err(e) => {
                let remembered = self.rates.read().await.get(pair).cloned();
                let stored = match remembered {
                    Some(stored) => Some(stored),
                    None => self.read_file::<StoredRates>(&rates_file(pair)).await,
                };
                let Some(stored) = stored.filter(|s| &s.pair == pair) else {
                    return Err(e);
                };
                let Some(observations) = stored.within(start, end) else {
                    return Err(e);
                };
                tracing::warn!(
                    error = %e,
                    pair = %pair,
                    %start,
                    %end,
                    cached_start = %stored.start,
                    cached_end = %stored.end,
                    stored_at = %stored.stored_at,
                    "Provider unavailable, serving cached rates."
                );
                Ok(Fetched::cached(observations, stored.stored_at))
            }
        }
    }
}
