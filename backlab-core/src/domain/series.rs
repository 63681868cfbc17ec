//! PriceSeries — validated, immutable OHLCV history.
//!
//! Validation happens once, at construction. Downstream code (indicators,
//! strategies, the simulation engine) may assume strictly increasing dates
//! and finite non-negative prices, and the series is safe to share
//! read-only across worker threads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bar;

/// Validation errors raised at series construction.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    EmptySeries,
    #[error("dates not strictly increasing at index {index}: {prev} then {curr}")]
    NonMonotonicDates {
        index: usize,
        prev: NaiveDate,
        curr: NaiveDate,
    },
    #[error("bar at index {index} ({date}) has a non-finite or negative price")]
    InvalidValue { index: usize, date: NaiveDate },
}

/// Validated, ordered sequence of bars.
///
/// Invariants held after construction:
/// - length >= 1
/// - dates strictly increasing (no duplicates)
/// - every price field finite and non-negative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validate and wrap a bar sequence.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(SeriesError::InvalidValue {
                    index: i,
                    date: bar.date,
                });
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(SeriesError::NonMonotonicDates {
                    index: i,
                    prev: bars[i - 1].date,
                    curr: bar.date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &Bar {
        &self.bars[0]
    }

    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    /// Close prices as a contiguous slice-friendly vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Sub-series covering `[start, end]` inclusive.
    ///
    /// Returns `EmptySeries` if no bar falls inside the range.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, SeriesError> {
        let bars: Vec<Bar> = self
            .bars
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();
        PriceSeries::new(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: base + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: (close - 1.0).max(0.0),
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn valid_series_constructs() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.first().close, 100.0);
        assert_eq!(series.last().close, 102.0);
    }

    #[test]
    fn empty_series_rejected() {
        assert!(matches!(
            PriceSeries::new(vec![]),
            Err(SeriesError::EmptySeries)
        ));
    }

    #[test]
    fn duplicate_dates_rejected() {
        let series = make_series(&[100.0, 101.0]);
        let mut bars = series.bars().to_vec();
        bars[1].date = bars[0].date;
        assert!(matches!(
            PriceSeries::new(bars),
            Err(SeriesError::NonMonotonicDates { index: 1, .. })
        ));
    }

    #[test]
    fn out_of_order_dates_rejected() {
        let series = make_series(&[100.0, 101.0]);
        let mut bars = series.bars().to_vec();
        bars.swap(0, 1);
        assert!(matches!(
            PriceSeries::new(bars),
            Err(SeriesError::NonMonotonicDates { .. })
        ));
    }

    #[test]
    fn nan_price_rejected() {
        let series = make_series(&[100.0, 101.0]);
        let mut bars = series.bars().to_vec();
        bars[1].close = f64::NAN;
        assert!(matches!(
            PriceSeries::new(bars),
            Err(SeriesError::InvalidValue { index: 1, .. })
        ));
    }

    #[test]
    fn between_slices_inclusive() {
        let series = make_series(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let start = series.bars()[1].date;
        let end = series.bars()[3].date;
        let sub = series.between(start, end).unwrap();
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.first().close, 101.0);
        assert_eq!(sub.last().close, 103.0);
    }

    #[test]
    fn between_empty_range_fails() {
        let series = make_series(&[100.0, 101.0]);
        let far_future = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let further = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
        assert!(matches!(
            series.between(far_future, further),
            Err(SeriesError::EmptySeries)
        ));
    }

    #[test]
    fn closes_aligned_with_bars() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        assert_eq!(series.closes(), vec![100.0, 101.0, 102.0]);
    }
}
