#![allow(dead_code)]

use chrono::NaiveDate;
use phasewatch::domain::bar::PriceBar;
use phasewatch::domain::error::PhasewatchError;
use phasewatch::domain::flow::FlowRow;
use phasewatch::domain::quote::InstrumentQuote;
use phasewatch::ports::data_port::MarketDataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2025, 3, 3)
}

pub fn make_bar(day_offset: i64, close: f64, volume: i64) -> PriceBar {
    PriceBar {
        date: start_date() + chrono::Duration::days(day_offset),
        open: close,
        high: close,
        low: close,
        close,
        volume,
    }
}

pub fn make_flow(day_offset: i64, foreign_qty: f64, inst_qty: f64) -> FlowRow {
    FlowRow {
        date: start_date() + chrono::Duration::days(day_offset),
        foreign_qty,
        inst_qty,
        indiv_qty: -(foreign_qty + inst_qty),
        foreign_amt: foreign_qty * 10_000.0,
        inst_amt: inst_qty * 10_000.0,
        indiv_amt: -(foreign_qty + inst_qty) * 10_000.0,
    }
}

/// Bars shaped so the final day reads as quiet, cheap accumulation: a long
/// run of wide-spread days (typical price well above close) followed by one
/// flat day, with steady volume throughout. Combined with a trailing
/// foreign/institutional buy streak this satisfies the golden rule.
pub fn golden_bars(count: usize) -> Vec<PriceBar> {
    let close = 10_000.0;
    (0..count)
        .map(|i| {
            let last = i == count - 1;
            PriceBar {
                date: start_date() + chrono::Duration::days(i as i64),
                open: close,
                high: if last { close } else { close * 2.0 },
                low: close,
                close,
                volume: 100_000,
            }
        })
        .collect()
}

/// A buy streak covering the last `streak` days of `bars`.
pub fn buy_streak(bars: &[PriceBar], streak: usize) -> Vec<FlowRow> {
    bars[bars.len() - streak..]
        .iter()
        .map(|b| FlowRow {
            date: b.date,
            foreign_qty: 1_000.0,
            inst_qty: 500.0,
            indiv_qty: -1_500.0,
            foreign_amt: 10_000_000.0,
            inst_amt: 5_000_000.0,
            indiv_amt: -15_000_000.0,
        })
        .collect()
}

pub fn make_quote(code: &str, name: &str) -> InstrumentQuote {
    InstrumentQuote {
        code: code.to_string(),
        name: name.to_string(),
        market: "KOSPI".to_string(),
        price: 10_000.0,
        change_pct: 0.0,
        volume: 100_000,
        high_52w: 12_000.0,
        low_52w: 8_000.0,
        market_cap: 1e12,
    }
}

#[derive(Default)]
pub struct MockMarketData {
    pub bars: HashMap<String, Vec<PriceBar>>,
    pub flows: HashMap<String, Vec<FlowRow>>,
    pub quotes: HashMap<String, InstrumentQuote>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument(
        mut self,
        code: &str,
        name: &str,
        bars: Vec<PriceBar>,
        flows: Vec<FlowRow>,
    ) -> Self {
        self.bars.insert(code.to_string(), bars);
        self.flows.insert(code.to_string(), flows);
        self.quotes.insert(code.to_string(), make_quote(code, name));
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_bars(&self, code: &str) -> Result<Vec<PriceBar>, PhasewatchError> {
        self.bars
            .get(code)
            .cloned()
            .ok_or_else(|| PhasewatchError::Data {
                reason: format!("no bars for {code}"),
            })
    }

    fn fetch_flows(&self, code: &str) -> Result<Vec<FlowRow>, PhasewatchError> {
        Ok(self.flows.get(code).cloned().unwrap_or_default())
    }

    fn fetch_quote(&self, code: &str) -> Result<InstrumentQuote, PhasewatchError> {
        self.quotes
            .get(code)
            .cloned()
            .ok_or_else(|| PhasewatchError::Data {
                reason: format!("no quote for {code}"),
            })
    }
}

/// Render bars/flows/quotes as the CSV fixtures the file adapter reads.
pub fn write_csv_fixtures(
    dir: &std::path::Path,
    code: &str,
    name: &str,
    bars: &[PriceBar],
    flows: &[FlowRow],
) {
    let mut bars_csv = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        bars_csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{code}_bars.csv")), bars_csv).unwrap();

    let mut flows_csv =
        String::from("date,foreign_qty,inst_qty,indiv_qty,foreign_amt,inst_amt,indiv_amt\n");
    for f in flows {
        flows_csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            f.date, f.foreign_qty, f.inst_qty, f.indiv_qty, f.foreign_amt, f.inst_amt, f.indiv_amt
        ));
    }
    std::fs::write(dir.join(format!("{code}_flows.csv")), flows_csv).unwrap();

    let quote = make_quote(code, name);
    let quotes_csv = format!(
        "code,name,market,price,change_pct,volume,high_52w,low_52w,market_cap\n\
         {},{},{},{},{},{},{},{},{}\n",
        quote.code,
        quote.name,
        quote.market,
        quote.price,
        quote.change_pct,
        quote.volume,
        quote.high_52w,
        quote.low_52w,
        quote.market_cap
    );
    std::fs::write(dir.join("quotes.csv"), quotes_csv).unwrap();
}
