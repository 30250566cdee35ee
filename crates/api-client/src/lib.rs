use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::ProviderSettings;
use core_types::{CurrencyPair, RateObservation, format_date};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

pub mod cache;
pub mod error;
pub mod fetched;
pub mod responses;
// --- Public API ---
pub use cache::FallbackCache;
pub use fetched::{Fetched, Freshness};
pub use responses::{ApiErrorResponse, CurrenciesResponse, TimeSeriesResponse};

/// The abstract interface for an exchange-rate provider.
/// This trait is the contract the refresh engine uses, allowing the
/// underlying implementation (live, cached or mock) to be swapped out.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches every supported currency code with its display name.
    async fn fetch_currencies(&self) -> Result<Fetched<BTreeMap<String, String>>, ApiError>;

    /// Fetches the published daily rates of `pair.quote` per one `pair.base`
    /// for the inclusive date range. Days without a published rate are absent.
    async fn fetch_rates(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Fetched<Vec<RateObservation>>, ApiError>;
}

/// A concrete implementation of the `RateProvider` for the Frankfurter API.
#[derive(Clone)]
pub struct FrankfurterClient {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("ratewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "Requesting rate provider.");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            Err(ApiError::Status {
                status: status.as_u16(),
                url,
                message,
            })
        }
    }
}

#[async_trait]
impl RateProvider for FrankfurterClient {
    async fn fetch_currencies(&self) -> Result<Fetched<BTreeMap<String, String>>, ApiError> {
        let currencies = self.get_json::<CurrenciesResponse>("/currencies", &[]).await?;
        Ok(Fetched::live(currencies))
    }

    async fn fetch_rates(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Fetched<Vec<RateObservation>>, ApiError> {
        let path = format!("/{}..{}", format_date(start), format_date(end));
        let response = self
            .get_json::<TimeSeriesResponse>(&path, &[("from", pair.base.as_str()), ("to", pair.quote.as_str())])
            .await?;

        let observations = response.into_observations(&pair.quote)?;
        tracing::debug!(
            pair = %pair,
            count = observations.len(),
            "Fetched rate observations."
        );
        Ok(Fetched::live(observations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let settings = ProviderSettings {
            base_url: "https://example.test/".to_string(),
            ..ProviderSettings::default()
        };
        let client = FrankfurterClient::new(&settings).unwrap();
        assert_eq!(client.base_url, "https://example.test");
    }
}
