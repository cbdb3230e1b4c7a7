//! Instrument quote data and 52-week-high proximity.

use serde::{Deserialize, Serialize};

/// Current-day quote for one instrument, as supplied by the data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentQuote {
    pub code: String,
    pub name: String,
    pub market: String,
    pub price: f64,
    /// Day-over-day percent change.
    pub change_pct: f64,
    pub volume: i64,
    pub high_52w: f64,
    pub low_52w: f64,
    /// Total market capitalization in the feed's currency unit;
    /// 0 when unknown.
    pub market_cap: f64,
}

/// Proximity of the current price to the 52-week high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewHighFlag {
    /// Within 0.5% of the 52-week high.
    NewHigh,
    /// Within 3% of the 52-week high.
    Near,
    None,
}

impl NewHighFlag {
    pub fn is_new_high(self) -> bool {
        self == NewHighFlag::NewHigh
    }
}

/// Classify price against the 52-week high. An unknown high (<= 0)
/// yields [`NewHighFlag::None`].
pub fn new_high_flag(price: f64, high_52w: f64) -> NewHighFlag {
    if high_52w <= 0.0 {
        return NewHighFlag::None;
    }
    let ratio = price / high_52w * 100.0;
    if ratio >= 99.5 {
        NewHighFlag::NewHigh
    } else if ratio >= 97.0 {
        NewHighFlag::Near
    } else {
        NewHighFlag::None
    }
}
