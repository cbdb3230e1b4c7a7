//! Per-run output records: full instrument reports, compact history
//! summaries, and the assembled daily snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::phase::PhaseKey;
use crate::domain::quote::{InstrumentQuote, NewHighFlag, new_high_flag};
use crate::domain::signal::SignalReport;

/// Everything the daily snapshot publishes for one instrument.
///
/// Ratios are rounded to 2 decimals here, at the output boundary; the core
/// keeps full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentReport {
    pub code: String,
    pub name: String,
    pub market: String,
    pub price: f64,
    pub change_pct: f64,
    pub volume: i64,
    pub market_cap: f64,
    pub smp: f64,
    pub muges_ratio: f64,
    pub volume_ratio: f64,
    pub obv_above_ma: bool,
    pub foreign_consec: usize,
    pub inst_consec: usize,
    pub foreign_buying: bool,
    pub inst_buying: bool,
    pub phase_label: String,
    pub phase_key: PhaseKey,
    pub new_high: NewHighFlag,
}

impl InstrumentReport {
    pub fn from_signal(quote: &InstrumentQuote, report: &SignalReport) -> Self {
        Self {
            code: quote.code.clone(),
            name: quote.name.clone(),
            market: quote.market.clone(),
            price: quote.price,
            change_pct: quote.change_pct,
            volume: quote.volume,
            market_cap: quote.market_cap,
            smp: round2(report.indicators.smp),
            muges_ratio: round2(report.indicators.muges_ratio),
            volume_ratio: round2(report.indicators.volume_ratio),
            obv_above_ma: report.indicators.obv_above_ma,
            foreign_consec: report.counts.foreign_days,
            inst_consec: report.counts.inst_days,
            foreign_buying: report.latest_foreign_qty > 0.0,
            inst_buying: report.latest_inst_qty > 0.0,
            phase_label: report.phase.label.clone(),
            phase_key: report.phase.key,
            new_high: new_high_flag(quote.price, quote.high_52w),
        }
    }
}

/// The compact per-instrument record retained per date in the history
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSummary {
    pub code: String,
    pub name: String,
    pub market: String,
    pub price: f64,
    pub change_pct: f64,
    pub phase_label: String,
    pub phase_key: PhaseKey,
    pub new_high: NewHighFlag,
}

impl From<&InstrumentReport> for InstrumentSummary {
    fn from(report: &InstrumentReport) -> Self {
        Self {
            code: report.code.clone(),
            name: report.name.clone(),
            market: report.market.clone(),
            price: report.price,
            change_pct: report.change_pct,
            phase_label: report.phase_label.clone(),
            phase_key: report.phase_key,
            new_high: report.new_high,
        }
    }
}

/// Phase counts across one day's reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub golden: usize,
    pub p1: usize,
    pub p2: usize,
    pub p3: usize,
    pub new_high: usize,
}

impl PhaseStats {
    pub fn tally(reports: &[InstrumentReport]) -> Self {
        let mut stats = Self::default();
        for report in reports {
            match report.phase_key {
                PhaseKey::Golden => stats.golden += 1,
                PhaseKey::P1 => stats.p1 += 1,
                PhaseKey::P2 => stats.p2 += 1,
                PhaseKey::P3 => stats.p3 += 1,
                PhaseKey::None => {}
            }
            if report.new_high.is_new_high() {
                stats.new_high += 1;
            }
        }
        stats
    }
}

/// The full output payload for one scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub updated_at: String,
    pub market_open: bool,
    pub stocks: Vec<InstrumentReport>,
    pub stats: PhaseStats,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
