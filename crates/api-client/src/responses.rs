use crate::error::ApiError;
use core_types::{RateObservation, parse_date};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// The response from `GET /currencies`: currency code to display name.
pub type CurrenciesResponse = BTreeMap<String, String>;

/// The response from a `GET /{start}..{end}?from=..&to=..` time-series request.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesResponse {
    pub amount: f64,
    pub base: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Keyed by `YYYY-MM-DD`, then by quote currency code.
    pub rates: BTreeMap<String, HashMap<String, f64>>,
}

impl TimeSeriesResponse {
    /// Extracts the `quote` rate of every published date, ascending by date.
    ///
    /// Dates that carry no rate for `quote` are skipped.
    pub fn into_observations(self, quote: &str) -> Result<Vec<RateObservation>, ApiError> {
        let mut observations = self
            .rates
            .into_iter()
            .filter_map(|(date, rates)| rates.get(quote).map(|&value| (date, value)))
            .map(|(date, value)| {
                let date = parse_date(&date).map_err(|e| ApiError::InvalidData(e.to_string()))?;
                Ok(RateObservation::new(date, value))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;
        observations.sort_by_key(|obs| obs.date);
        Ok(observations)
    }
}

/// Represents an error body from the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}
