//! Calendar-day utilities.
//!
//! All dates are `NaiveDate`s interpreted in local civil time. Nothing here
//! touches a time-of-day, so a rate published "on 2024-01-10" stays on that day
//! regardless of the host's UTC offset.

use crate::enums::{PresetSpan, RangePreset};
use crate::error::CoreError;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// The wire and display format for every date exchanged with the provider.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` string back into a date.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| CoreError::InvalidInput("date".to_string(), format!("'{}': {}", value, e)))
}

/// Shifts a date by `delta_days` calendar days. Negative values move backwards.
pub fn shift_date(date: NaiveDate, delta_days: i64) -> NaiveDate {
    date + Duration::days(delta_days)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
    }
}

/// The current calendar day on the host's local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Moves `date` back by whole months, clamping the day to the target month's length.
fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    // The clamped day always exists in the target month.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// An inclusive `[start, end]` window of calendar days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked wire form of `DateRange`; deserialization goes through `DateRange::new`.
#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = CoreError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the window, both endpoints included.
    pub fn len_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates every calendar day from `start` to `end`.
    ///
    /// The iterator is lazy and owns its cursor, so calling `days()` again
    /// restarts from `start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.start.iter_days().take(self.len_days())
    }

    /// The same window extended `days` calendar days further into the past.
    pub fn extended_back(&self, days: u32) -> Self {
        Self {
            start: shift_date(self.start, -(days as i64)),
            end: self.end,
        }
    }
}

impl RangePreset {
    /// The display window for this preset, ending on `end`.
    pub fn window_ending(&self, end: NaiveDate) -> DateRange {
        let start = match self.span() {
            PresetSpan::Days(days) => shift_date(end, -(days as i64 - 1)),
            PresetSpan::Months(months) => months_before(end, months),
        };
        DateRange { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    #[test]
    fn format_and_parse_agree() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
        assert_eq!(parse_date("2024-03-07").unwrap(), date);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_date("07.03.2024"), Err(CoreError::InvalidInput(..))));
    }

    #[test]
    fn shift_crosses_month_and_year() {
        assert_eq!(shift_date(d("2024-03-01"), -1), d("2024-02-29"));
        assert_eq!(shift_date(d("2023-12-31"), 1), d("2024-01-01"));
    }

    #[test]
    fn february_length_follows_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        let err = DateRange::new(d("2024-01-02"), d("2024-01-01")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRange { .. }));
    }

    #[test]
    fn days_iterator_is_inclusive_and_restartable() {
        let range = DateRange::new(d("2024-02-27"), d("2024-03-02")).unwrap();
        let days: Vec<_> = range.days().map(format_date).collect();
        assert_eq!(
            days,
            ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
        assert_eq!(range.days().count(), range.len_days());
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(d("2024-05-05"), d("2024-05-05")).unwrap();
        assert_eq!(range.len_days(), 1);
        assert!(range.contains(d("2024-05-05")));
        assert!(!range.contains(d("2024-05-06")));
    }

    #[test]
    fn two_week_preset_covers_fourteen_days() {
        let window = RangePreset::TwoWeeks.window_ending(d("2024-06-14"));
        assert_eq!(window.start(), d("2024-06-01"));
        assert_eq!(window.len_days(), 14);
    }

    #[test]
    fn month_presets_clamp_to_shorter_months() {
        assert_eq!(
            RangePreset::OneMonth.window_ending(d("2024-03-31")).start(),
            d("2024-02-29")
        );
        assert_eq!(
            RangePreset::ThreeMonths.window_ending(d("2024-05-31")).start(),
            d("2024-02-29")
        );
        assert_eq!(
            RangePreset::OneYear.window_ending(d("2024-02-29")).start(),
            d("2023-02-28")
        );
        assert_eq!(
            RangePreset::ThreeYears.window_ending(d("2024-01-15")).start(),
            d("2021-01-15")
        );
    }

    #[test]
    fn extended_back_keeps_end() {
        let window = RangePreset::TwoWeeks.window_ending(d("2024-06-14"));
        let extended = window.extended_back(104);
        assert_eq!(extended.end(), window.end());
        assert_eq!(extended.len_days(), window.len_days() + 104);
    }

    #[test]
    fn deserialized_range_is_validated() {
        let range: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).unwrap();
        assert_eq!(range.len_days(), 31);

        let inverted = serde_json::from_str::<DateRange>(r#"{"start":"2024-02-01","end":"2024-01-31"}"#);
        assert!(inverted.is_err());
    }
}
