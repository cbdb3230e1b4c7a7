//! Watch-list scan driver.
//!
//! Iterates the configured instruments, derives each signal through
//! [`crate::domain::signal::classify_instrument`], and assembles the daily
//! snapshot. One instrument failing (no quote, unreadable bars, malformed
//! input) is logged and skipped; the scan itself keeps going.

use crate::domain::error::PhasewatchError;
use crate::domain::indicator::ScaleProxy;
use crate::domain::signal::classify_instrument;
use crate::domain::summary::{DailySnapshot, InstrumentReport, PhaseStats};
use crate::domain::watchlist::Watchlist;
use crate::ports::data_port::MarketDataPort;

#[derive(Debug, Clone)]
pub struct ScanParams {
    pub smp_window: usize,
    /// Normalize SMP against market cap from the quote; otherwise against
    /// the window's own traded value.
    pub use_market_cap: bool,
    pub updated_at: String,
    pub market_open: bool,
}

#[derive(Debug, Clone)]
pub struct SkippedInstrument {
    pub code: String,
    pub reason: String,
}

pub struct ScanOutcome {
    pub snapshot: DailySnapshot,
    pub skipped: Vec<SkippedInstrument>,
}

pub fn run_scan(
    data: &dyn MarketDataPort,
    watchlist: &Watchlist,
    params: &ScanParams,
) -> ScanOutcome {
    let mut stocks: Vec<InstrumentReport> = Vec::with_capacity(watchlist.count());
    let mut skipped: Vec<SkippedInstrument> = Vec::new();

    for code in &watchlist.codes {
        match scan_one(data, code, params) {
            Ok(report) => {
                eprintln!(
                    "  {}: {} | {}",
                    code,
                    report.name,
                    if report.phase_label.is_empty() {
                        "no signal"
                    } else {
                        report.phase_label.as_str()
                    }
                );
                stocks.push(report);
            }
            Err(e) => {
                eprintln!("Warning: skipping {code} ({e})");
                skipped.push(SkippedInstrument {
                    code: code.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let stats = PhaseStats::tally(&stocks);
    ScanOutcome {
        snapshot: DailySnapshot {
            updated_at: params.updated_at.clone(),
            market_open: params.market_open,
            stocks,
            stats,
        },
        skipped,
    }
}

fn scan_one(
    data: &dyn MarketDataPort,
    code: &str,
    params: &ScanParams,
) -> Result<InstrumentReport, PhasewatchError> {
    let quote = data.fetch_quote(code)?;
    let bars = data.fetch_bars(code)?;
    let flows = data.fetch_flows(code)?;

    let scale = if params.use_market_cap {
        ScaleProxy::MarketCap(quote.market_cap)
    } else {
        ScaleProxy::WindowTurnover
    };

    let report = classify_instrument(code, &bars, &flows, params.smp_window, scale)?;
    Ok(InstrumentReport::from_signal(&quote, &report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::PriceBar;
    use crate::domain::flow::FlowRow;
    use crate::domain::quote::InstrumentQuote;
    use crate::domain::watchlist::parse_codes;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    struct FixtureData {
        bars: HashMap<String, Vec<PriceBar>>,
        quotes: HashMap<String, InstrumentQuote>,
    }

    impl MarketDataPort for FixtureData {
        fn fetch_bars(&self, code: &str) -> Result<Vec<PriceBar>, PhasewatchError> {
            self.bars
                .get(code)
                .cloned()
                .ok_or_else(|| PhasewatchError::Data {
                    reason: format!("no bars for {code}"),
                })
        }

        fn fetch_flows(&self, _code: &str) -> Result<Vec<FlowRow>, PhasewatchError> {
            Ok(Vec::new())
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

    fn quote(code: &str) -> InstrumentQuote {
        InstrumentQuote {
            code: code.into(),
            name: format!("Corp {code}"),
            market: "KOSPI".into(),
            price: 10_000.0,
            change_pct: 0.0,
            volume: 1_000,
            high_52w: 12_000.0,
            low_52w: 8_000.0,
            market_cap: 1e12,
        }
    }

    fn bars(count: usize) -> Vec<PriceBar> {
        (0..count)
            .map(|i| PriceBar {
                date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
                    + chrono::Duration::days(i as i64),
                open: 10_000.0,
                high: 10_100.0,
                low: 9_900.0,
                close: 10_000.0,
                volume: 1_000,
            })
            .collect()
    }

    fn params() -> ScanParams {
        ScanParams {
            smp_window: 10,
            use_market_cap: true,
            updated_at: "2025-06-03 16:00".into(),
            market_open: false,
        }
    }

    #[test]
    fn scan_collects_reports_and_stats() {
        let mut data = FixtureData {
            bars: HashMap::new(),
            quotes: HashMap::new(),
        };
        data.bars.insert("005930".into(), bars(30));
        data.quotes.insert("005930".into(), quote("005930"));

        let watchlist = parse_codes("005930").unwrap();
        let outcome = run_scan(&data, &watchlist, &params());

        assert_eq!(outcome.snapshot.stocks.len(), 1);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.snapshot.stats, PhaseStats::default());
        assert_eq!(outcome.snapshot.updated_at, "2025-06-03 16:00");
    }

    #[test]
    fn failing_instrument_is_skipped_not_fatal() {
        let mut data = FixtureData {
            bars: HashMap::new(),
            quotes: HashMap::new(),
        };
        data.bars.insert("005930".into(), bars(30));
        data.quotes.insert("005930".into(), quote("005930"));
        // 000660 has a quote but no bars
        data.quotes.insert("000660".into(), quote("000660"));

        let watchlist = parse_codes("005930,000660").unwrap();
        let outcome = run_scan(&data, &watchlist, &params());

        assert_eq!(outcome.snapshot.stocks.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].code, "000660");
    }
}
