use chrono::NaiveDate;
use core_types::{DateRange, DenseSeries, RateObservation, SeriesPoint};
use std::collections::HashMap;

/// Turns sparse provider observations into one point per calendar day of `window`.
///
/// Days without an observation take the last value seen before them; leading
/// days with nothing before them take the next value seen after them. Both are
/// marked `filled`. A day with no source on either side is left out.
/// Observations dated outside `window` are ignored entirely.
pub fn build_daily_series(observations: &[RateObservation], window: &DateRange) -> DenseSeries {
    if observations.is_empty() {
        return Vec::new();
    }

    let observed: HashMap<NaiveDate, f64> = observations
        .iter()
        .filter(|obs| window.contains(obs.date))
        .map(|obs| (obs.date, obs.value))
        .collect();

    let days: Vec<NaiveDate> = window.days().collect();

    // next_known[i] is the nearest observed value on or after days[i].
    let mut next_known = vec![None; days.len()];
    let mut upcoming = None;
    for (i, day) in days.iter().enumerate().rev() {
        if let Some(&value) = observed.get(day) {
            upcoming = Some(value);
        }
        next_known[i] = upcoming;
    }

    let mut series = Vec::with_capacity(days.len());
    let mut last_known: Option<f64> = None;
    for (day, next) in days.into_iter().zip(next_known) {
        if let Some(&value) = observed.get(&day) {
            last_known = Some(value);
            series.push(SeriesPoint { date: day, value, filled: false });
        } else if let Some(value) = last_known.or(next) {
            series.push(SeriesPoint { date: day, value, filled: true });
        }
    }

    let filled = series.iter().filter(|p| p.filled).count();
    tracing::debug!(
        days = window.len_days(),
        observed = series.len() - filled,
        filled,
        dropped = window.len_days() - series.len(),
        "Built daily series from {} to {}.",
        window.start(),
        window.end()
    );

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::parse_date;

    fn d(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    #[test]
    fn out_of_window_observations_are_not_fill_sources() {
        let window = DateRange::new(d("2024-01-08"), d("2024-01-10")).unwrap();
        let observations = [
            RateObservation::new(d("2024-01-05"), 1.0),
            RateObservation::new(d("2024-01-12"), 2.0),
        ];
        assert!(build_daily_series(&observations, &window).is_empty());
    }

    #[test]
    fn duplicate_dates_keep_the_later_value() {
        let window = DateRange::new(d("2024-01-08"), d("2024-01-08")).unwrap();
        let observations = [
            RateObservation::new(d("2024-01-08"), 1.0),
            RateObservation::new(d("2024-01-08"), 2.0),
        ];
        let series = build_daily_series(&observations, &window);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, 2.0);
    }
}
