//! PriceSeries — chronological intraday closes for one ticker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (timestamp, close) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Non-empty, chronologically ordered price series.
///
/// Absence of data is modelled as `Option<PriceSeries>`, never as an empty series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = &'static str;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points).ok_or("price series must have at least one point")
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

impl PriceSeries {
    /// Build a series from provider rows. Returns `None` for zero rows.
    ///
    /// Rows are sorted by timestamp (stable, so equal timestamps keep provider order).
    pub fn new(mut points: Vec<PricePoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        points.sort_by_key(|p| p.timestamp);
        Some(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    /// (min, max) price, for chart bounds.
    pub fn price_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.price), hi.max(p.price))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32, price: f64) -> PricePoint {
        PricePoint::new(Utc.with_ymd_and_hms(2024, 3, 4, 14, minute, 0).unwrap(), price)
    }

    #[test]
    fn empty_rows_are_absent() {
        assert!(PriceSeries::new(Vec::new()).is_none());
    }

    #[test]
    fn rows_are_sorted_chronologically() {
        let series = PriceSeries::new(vec![at(30, 3.0), at(0, 1.0), at(15, 2.0)]).unwrap();
        let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first().price, 1.0);
        assert_eq!(series.last().price, 3.0);
    }

    #[test]
    fn deserializing_goes_through_the_constructor() {
        assert!(serde_json::from_str::<PriceSeries>("[]").is_err());

        let json = serde_json::to_string(&vec![at(15, 2.0), at(0, 1.0)]).unwrap();
        let series: PriceSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(series.first().price, 1.0);
        assert_eq!(series.last().price, 2.0);

        let back = serde_json::to_value(&series).unwrap();
        assert_eq!(back.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn price_range_spans_all_points() {
        let series = PriceSeries::new(vec![at(0, 10.0), at(15, 7.5), at(30, 12.25)]).unwrap();
        assert_eq!(series.price_range(), (7.5, 12.25));
    }
}
