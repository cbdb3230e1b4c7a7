//! Daily price bar representation.

use chrono::NaiveDate;

/// One daily OHLCV bar for a single instrument.
///
/// Bar sequences are ordered ascending by date. A duplicate date is not
/// expected from upstream but is tolerated downstream by keeping the last
/// occurrence (see [`crate::domain::flow::align`]).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// (high + low + close) / 3, the per-day turnover-weighted price proxy.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// typical_price x volume, the per-day traded-value proxy.
    pub fn traded_value(&self) -> f64 {
        self.typical_price() * self.volume as f64
    }
}
