//! # Ratewatch Analytics Engine
//!
//! This crate derives the descriptive statistics shown next to the rate chart.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** No knowledge of the provider or the presentation layer.
//!   It depends only on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` takes a dense series and
//!   produces a fresh `MetricsSnapshot`. Identical input gives a bit-identical
//!   snapshot.
//! - **Explicit absence:** Metrics that cannot be computed are `None`, never 0.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The calculator (`compute_metrics`, `compute_trend`,
//!   `summarize_range`, `find_extremes`).
//! - `MetricsSnapshot`, `TrendIndicator`, `RangeSummary`, `Extremes`: its outputs.
//! - `stats`: the underlying statistics over plain `f64` slices.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use report::{ExtremePoint, Extremes, MetricsSnapshot, RangeSummary, TrendIndicator};
pub use stats::Streaks;
