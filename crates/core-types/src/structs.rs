use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single provider-reported exchange rate for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: NaiveDate,
    /// Units of the quote currency per one unit of the base currency.
    pub value: f64,
}

impl RateObservation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// One calendar day of a dense series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// `true` when the value was carried over from a neighbouring observation.
    pub filled: bool,
}

/// Ascending, gap-free daily points. One step is exactly one calendar day.
pub type DenseSeries = Vec<SeriesPoint>;

/// A base/quote currency pair, e.g. `CZK/EUR` (EUR per 1 CZK).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    /// Builds a pair from two currency codes, normalising them to upper case.
    pub fn new(base: &str, quote: &str) -> Result<Self, CoreError> {
        Ok(Self {
            base: normalize_code(base)?,
            quote: normalize_code(quote)?,
        })
    }

    pub fn swapped(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.base, self.quote)
    }
}

fn normalize_code(code: &str) -> Result<String, CoreError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::InvalidInput(
            "currency".to_string(),
            format!("'{}' is not a three-letter currency code", code),
        ));
    }
    Ok(code.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_codes_are_upper_cased() {
        let pair = CurrencyPair::new("czk", " eur ").unwrap();
        assert_eq!(pair.base, "CZK");
        assert_eq!(pair.quote, "EUR");
        assert_eq!(pair.to_string(), "CZK → EUR");
    }

    #[test]
    fn swapped_inverts_the_pair() {
        let pair = CurrencyPair::new("CZK", "EUR").unwrap().swapped();
        assert_eq!((pair.base.as_str(), pair.quote.as_str()), ("EUR", "CZK"));
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert!(CurrencyPair::new("EURO", "USD").is_err());
        assert!(CurrencyPair::new("E1R", "USD").is_err());
        assert!(CurrencyPair::new("", "USD").is_err());
    }

    #[test]
    fn points_serialize_dates_as_iso_strings() {
        let point = SeriesPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            value: 30.0,
            filled: false,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-10","value":30.0,"filled":false}"#);
    }
}
