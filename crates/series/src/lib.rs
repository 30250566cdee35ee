//! # Series Builder
//!
//! Turns the provider's sparse `(date, rate)` observations into the dense daily
//! series everything downstream works on.
//!
//! - `build_daily_series`: gap-filling over a calendar window.
//! - `SeriesWindow`: the lookback-extended series split at the visible start.
//! - `moving_average_overlay`: sliding-window averages seeded by the lookback history.

pub mod builder;
pub mod overlay;
pub mod window;

pub use builder::build_daily_series;
pub use overlay::{DEFAULT_WINDOWS, MovingAverageOverlay, OverlayPoint, moving_average_overlay};
pub use window::SeriesWindow;
