use chrono::NaiveDate;
use core_types::{DenseSeries, SeriesPoint};
use serde::{Deserialize, Serialize};

/// A lookback-extended series together with the offset where the visible range begins.
///
/// `full` covers the fetched window (visible range plus lookback history);
/// the visible part is always `full[start_index..]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesWindow {
    full: DenseSeries,
    start_index: usize,
}

impl SeriesWindow {
    /// Splits `full` at the first point dated on or after `visible_start`.
    ///
    /// When no point reaches `visible_start` the visible part is empty.
    pub fn split(full: DenseSeries, visible_start: NaiveDate) -> Self {
        let start_index = full.partition_point(|point| point.date < visible_start);
        Self { full, start_index }
    }

    pub fn full(&self) -> &[SeriesPoint] {
        &self.full
    }

    pub fn visible(&self) -> &[SeriesPoint] {
        &self.full[self.start_index..]
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.visible().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{DateRange, parse_date};

    fn dense(start: &str, values: &[f64]) -> DenseSeries {
        let start = parse_date(start).unwrap();
        start
            .iter_days()
            .zip(values)
            .map(|(date, &value)| SeriesPoint { date, value, filled: false })
            .collect()
    }

    #[test]
    fn visible_is_the_tail_of_full() {
        let full = dense("2024-01-01", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let window = SeriesWindow::split(full, parse_date("2024-01-03").unwrap());
        assert_eq!(window.start_index(), 2);
        assert_eq!(window.visible(), &window.full()[2..]);
        assert_eq!(window.visible()[0].value, 3.0);
    }

    #[test]
    fn start_before_full_shows_everything() {
        let full = dense("2024-01-05", &[1.0, 2.0]);
        let window = SeriesWindow::split(full, parse_date("2024-01-01").unwrap());
        assert_eq!(window.start_index(), 0);
        assert_eq!(window.visible().len(), 2);
    }

    #[test]
    fn start_after_full_shows_nothing() {
        let full = dense("2024-01-01", &[1.0, 2.0]);
        let window = SeriesWindow::split(full, parse_date("2024-02-01").unwrap());
        assert!(window.is_empty());
        assert_eq!(window.start_index(), 2);
    }

    #[test]
    fn empty_full_series() {
        let range = DateRange::new(parse_date("2024-01-01").unwrap(), parse_date("2024-01-31").unwrap())
            .unwrap();
        let window = SeriesWindow::split(Vec::new(), range.start());
        assert!(window.is_empty());
        assert_eq!(window.start_index(), 0);
    }
}
