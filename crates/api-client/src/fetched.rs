use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a provider response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Freshness {
    /// Fetched from the provider just now.
    #[default]
    Live,
    /// The provider failed; this is the last good response, stored at `stored_at`.
    Cached { stored_at: DateTime<Utc> },
}

/// A provider response tagged with its freshness.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub freshness: Freshness,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self { data, freshness: Freshness::Live }
    }

    pub fn cached(data: T, stored_at: DateTime<Utc>) -> Self {
        Self { data, freshness: Freshness::Cached { stored_at } }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Cached { .. })
    }
}
