pub mod calendar;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use calendar::{DateRange, days_in_month, format_date, parse_date, shift_date, today};
pub use enums::{PresetSpan, RangePreset, TrendDirection};
pub use error::CoreError;
pub use structs::{CurrencyPair, DenseSeries, RateObservation, SeriesPoint};
