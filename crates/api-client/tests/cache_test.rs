//! Tests for the network-first fallback cache.

use api_client::error::ApiError;
use api_client::{FallbackCache, Fetched, Freshness, RateProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{CurrencyPair, RateObservation, parse_date};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ==================== Test Provider ====================

/// A provider whose connectivity can be switched off mid-test.
/// It publishes one observation per day of the requested range.
struct SwitchableProvider {
    online: AtomicBool,
    calls: AtomicUsize,
}

impl SwitchableProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            online: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        })
    }

    fn offline() -> Arc<Self> {
        let provider = Self::new();
        provider.go_offline();
        provider
    }

    fn go_offline(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ApiError::InvalidData("offline".to_string()))
        }
    }
}

#[async_trait]
impl RateProvider for SwitchableProvider {
    async fn fetch_currencies(&self) -> Result<Fetched<BTreeMap<String, String>>, ApiError> {
        self.check()?;
        Ok(Fetched::live(BTreeMap::from([("EUR".to_string(), "Euro".to_string())])))
    }

    async fn fetch_rates(
        &self,
        _pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Fetched<Vec<RateObservation>>, ApiError> {
        self.check()?;
        let observations = start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| RateObservation::new(date, 0.04))
            .collect();
        Ok(Fetched::live(observations))
    }
}

fn d(value: &str) -> NaiveDate {
    parse_date(value).unwrap()
}

fn czk_eur() -> CurrencyPair {
    CurrencyPair::new("CZK", "EUR").unwrap()
}

// ==================== In-Memory Fallback ====================

#[tokio::test]
async fn test_serves_stale_rates_when_offline() {
    let provider = SwitchableProvider::new();
    let cache = FallbackCache::new(provider.clone());
    let pair = czk_eur();

    let fresh = cache.fetch_rates(&pair, d("2024-01-01"), d("2024-01-31")).await.unwrap();
    assert_eq!(fresh.freshness, Freshness::Live);

    provider.go_offline();
    let stale = cache.fetch_rates(&pair, d("2024-01-01"), d("2024-01-31")).await.unwrap();

    assert!(stale.is_stale());
    assert_eq!(fresh.data, stale.data);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_fallback_is_clipped_to_the_requested_range() {
    let provider = SwitchableProvider::new();
    let cache = FallbackCache::new(provider.clone());
    let pair = czk_eur();

    cache.fetch_rates(&pair, d("2024-01-01"), d("2024-01-31")).await.unwrap();
    provider.go_offline();

    let next_day = cache.fetch_rates(&pair, d("2024-01-02"), d("2024-02-01")).await.unwrap();
    assert!(next_day.is_stale());
    assert_eq!(next_day.data.len(), 30);
    assert_eq!(next_day.data[0].date, d("2024-01-02"));
    assert_eq!(next_day.data.last().unwrap().date, d("2024-01-31"));

    let disjoint = cache.fetch_rates(&pair, d("2024-03-01"), d("2024-03-31")).await;
    assert!(matches!(disjoint, Err(ApiError::InvalidData(_))));

    let other_pair = cache.fetch_rates(&pair.swapped(), d("2024-01-01"), d("2024-01-31")).await;
    assert!(other_pair.is_err());
}

#[tokio::test]
async fn test_only_the_latest_response_per_pair_is_kept() {
    let provider = SwitchableProvider::new();
    let cache = FallbackCache::new(provider.clone());
    let pair = czk_eur();

    cache.fetch_rates(&pair, d("2024-01-01"), d("2024-01-31")).await.unwrap();
    cache.fetch_rates(&pair, d("2024-01-02"), d("2024-02-01")).await.unwrap();
    cache.fetch_rates(&pair, d("2024-01-03"), d("2024-02-02")).await.unwrap();
    assert_eq!(cache.cached_pairs().await, 1);

    provider.go_offline();
    let stale = cache.fetch_rates(&pair, d("2024-01-01"), d("2024-02-02")).await.unwrap();
    assert_eq!(stale.data[0].date, d("2024-01-03"));
}

#[tokio::test]
async fn test_network_is_always_tried_first() {
    let provider = SwitchableProvider::new();
    let cache = FallbackCache::new(provider.clone());

    cache.fetch_currencies().await.unwrap();
    let second = cache.fetch_currencies().await.unwrap();
    assert_eq!(second.freshness, Freshness::Live);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_currencies_fall_back_and_fail_without_history() {
    let cache = FallbackCache::new(SwitchableProvider::offline());
    assert!(cache.fetch_currencies().await.is_err());

    let provider = SwitchableProvider::new();
    let cache = FallbackCache::new(provider.clone());
    cache.fetch_currencies().await.unwrap();
    provider.go_offline();
    let currencies = cache.fetch_currencies().await.unwrap();
    assert!(currencies.is_stale());
    assert_eq!(currencies.data.get("EUR").map(String::as_str), Some("Euro"));
}

// ==================== On-Disk Persistence ====================

#[tokio::test]
async fn test_new_instance_reads_responses_written_by_previous_one() {
    let dir = tempfile::tempdir().unwrap();
    let pair = czk_eur();

    let first = FallbackCache::with_directory(SwitchableProvider::new(), dir.path());
    let fresh = first.fetch_rates(&pair, d("2024-01-01"), d("2024-01-31")).await.unwrap();
    first.fetch_currencies().await.unwrap();
    drop(first);

    assert!(dir.path().join("rates-CZK-EUR.json").exists());
    assert!(dir.path().join("currencies.json").exists());

    let restarted = FallbackCache::with_directory(SwitchableProvider::offline(), dir.path());
    let rates = restarted.fetch_rates(&pair, d("2024-01-01"), d("2024-01-31")).await.unwrap();
    assert!(rates.is_stale());
    assert_eq!(rates.data, fresh.data);

    let currencies = restarted.fetch_currencies().await.unwrap();
    assert!(currencies.is_stale());
    assert_eq!(currencies.data.len(), 1);
}

#[tokio::test]
async fn test_corrupt_cache_file_is_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("rates-CZK-EUR.json"), "not json").unwrap();

    let cache = FallbackCache::with_directory(SwitchableProvider::offline(), dir.path());
    let result = cache.fetch_rates(&czk_eur(), d("2024-01-01"), d("2024-01-31")).await;
    assert!(matches!(result, Err(ApiError::InvalidData(_))));
}
