//! Investor net-buy flow rows and the bar/flow date alignment step.
//!
//! Price bars and investor flows arrive from independent feeds and do not
//! necessarily cover the same dates. [`align`] performs the one normalization
//! step the rest of the engine relies on: a left join anchored on the bar
//! dates with absent flow values filled with zero, so downstream arithmetic
//! never branches on "missing".

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::bar::PriceBar;

/// One day's net buy (+) / net sell (-) figures per investor class.
///
/// Quantities are share counts, amounts are notional in the feed's currency
/// unit. Sign carries the direction.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRow {
    pub date: NaiveDate,
    pub foreign_qty: f64,
    pub inst_qty: f64,
    pub indiv_qty: f64,
    pub foreign_amt: f64,
    pub inst_amt: f64,
    pub indiv_amt: f64,
}

/// A price bar joined with the same date's flow figures.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub foreign_qty: f64,
    pub inst_qty: f64,
    pub indiv_qty: f64,
    pub foreign_amt: f64,
    pub inst_amt: f64,
    pub indiv_amt: f64,
}

impl AlignedRow {
    fn new(bar: &PriceBar, flow: Option<&FlowRow>) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            foreign_qty: flow.map_or(0.0, |f| f.foreign_qty),
            inst_qty: flow.map_or(0.0, |f| f.inst_qty),
            indiv_qty: flow.map_or(0.0, |f| f.indiv_qty),
            foreign_amt: flow.map_or(0.0, |f| f.foreign_amt),
            inst_amt: flow.map_or(0.0, |f| f.inst_amt),
            indiv_amt: flow.map_or(0.0, |f| f.indiv_amt),
        }
    }

    /// (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// typical_price x volume.
    pub fn traded_value(&self) -> f64 {
        self.typical_price() * self.volume as f64
    }
}

/// Left-join `flows` onto `bars` by exact date equality.
///
/// Every bar date is preserved; a bar date with no flow row gets zero flow
/// values. An empty `flows` slice is valid. Duplicate dates on either side
/// keep the last occurrence, so the output has one row per distinct bar
/// date, in the bars' order. Never fails.
pub fn align(bars: &[PriceBar], flows: &[FlowRow]) -> Vec<AlignedRow> {
    let mut flows_by_date: HashMap<NaiveDate, &FlowRow> = HashMap::new();
    for flow in flows {
        flows_by_date.insert(flow.date, flow);
    }

    let mut rows: Vec<AlignedRow> = Vec::with_capacity(bars.len());
    for bar in bars {
        let row = AlignedRow::new(bar, flows_by_date.get(&bar.date).copied());
        match rows.last_mut() {
            Some(last) if last.date == bar.date => *last = row,
            _ => rows.push(row),
        }
    }
    rows
}
