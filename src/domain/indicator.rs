//! Indicator computations over an aligned bar/flow series.
//!
//! All statistics are taken for the final (most recent) row, using trailing
//! windows over the full series. Sparse or degenerate data never raises an
//! error: short history yields the neutral snapshot, and every division is
//! guarded to a stated default so no NaN or infinity escapes this module.

use serde::Serialize;

use crate::domain::flow::AlignedRow;

/// Minimum aligned rows for a non-neutral snapshot.
pub const MIN_ROWS: usize = 21;

/// Default rolling window for the smart-money proportion.
pub const DEFAULT_SMP_WINDOW: usize = 10;

const OBV_MA_WINDOW: usize = 20;
const VOLUME_MA_WINDOW: usize = 20;
const MUGES_MA_WINDOW: usize = 20;

/// Denominator for SMP normalization.
///
/// The caller supplies whichever figure its feed has: a market
/// capitalization, or nothing, in which case the instrument's own traded
/// value over the SMP window is used. A non-positive market cap means "no
/// SMP available" and yields 0.0, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleProxy {
    MarketCap(f64),
    WindowTurnover,
}

/// Indicator values for the latest aligned row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    /// Cumulative on-balance volume, seeded at 0.
    pub obv: f64,
    /// 20-day simple moving average of OBV.
    pub obv_ma20: f64,
    pub obv_above_ma: bool,
    pub ma5: f64,
    pub ma20: f64,
    pub ma60: f64,
    /// Latest volume over its 20-day mean; 1.0 when the mean is degenerate.
    pub volume_ratio: f64,
    /// Latest turnover-weight value over its own 20-day mean; 1.0 when
    /// either side is undefined.
    pub muges_ratio: f64,
    /// Smart-money proportion, percent; 0.0 when no scale is available.
    pub smp: f64,
    /// Close-over-close percent change; 0.0 with fewer than 2 rows.
    pub change_pct: f64,
}

impl IndicatorSnapshot {
    /// The insufficient-history result: every ratio at its neutral default.
    pub fn neutral() -> Self {
        Self {
            obv: 0.0,
            obv_ma20: 0.0,
            obv_above_ma: false,
            ma5: 0.0,
            ma20: 0.0,
            ma60: 0.0,
            volume_ratio: 1.0,
            muges_ratio: 1.0,
            smp: 0.0,
            change_pct: 0.0,
        }
    }
}

/// Cumulative OBV series over the aligned rows.
///
/// obv[0] = 0; volume is added on an up close, subtracted on a down close,
/// and carried unchanged on a flat close.
pub fn obv_series(rows: &[AlignedRow]) -> Vec<f64> {
    let mut values = Vec::with_capacity(rows.len());
    let mut obv = 0.0_f64;
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            let prev_close = rows[i - 1].close;
            if row.close > prev_close {
                obv += row.volume as f64;
            } else if row.close < prev_close {
                obv -= row.volume as f64;
            }
        }
        values.push(obv);
    }
    values
}

/// Compute the latest row's indicator snapshot.
///
/// Fewer than [`MIN_ROWS`] rows yields [`IndicatorSnapshot::neutral`].
pub fn compute_snapshot(
    rows: &[AlignedRow],
    smp_window: usize,
    scale: ScaleProxy,
) -> IndicatorSnapshot {
    if rows.len() < MIN_ROWS {
        return IndicatorSnapshot::neutral();
    }

    let last = &rows[rows.len() - 1];

    let obv = obv_series(rows);
    let obv_last = *obv.last().unwrap_or(&0.0);
    let obv_ma20 = trailing_mean(&obv, OBV_MA_WINDOW).unwrap_or(0.0);

    let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
    let ma5 = truncated_sma(&closes, 5);
    let ma20 = truncated_sma(&closes, 20);
    let ma60 = truncated_sma(&closes, 60);

    let volumes: Vec<f64> = rows.iter().map(|r| r.volume as f64).collect();
    let volume_ratio = match trailing_mean(&volumes, VOLUME_MA_WINDOW) {
        Some(mean) if mean > 0.0 => last.volume as f64 / mean,
        _ => 1.0,
    };

    let muges: Vec<Option<f64>> = rows.iter().map(muges_value).collect();
    let muges_mean = defined_trailing_mean(&muges, MUGES_MA_WINDOW);
    let muges_ratio = match (muges.last().copied().flatten(), muges_mean) {
        (Some(value), Some(mean)) if mean > 0.0 => value / mean,
        _ => 1.0,
    };

    let smp = smart_money_proportion(rows, smp_window, scale);

    let change_pct = if rows.len() >= 2 {
        let prev_close = rows[rows.len() - 2].close;
        if prev_close > 0.0 {
            (last.close - prev_close) / prev_close * 100.0
        } else {
            0.0
        }
    } else {
        0.0
    };

    IndicatorSnapshot {
        obv: finite_or(obv_last, 0.0),
        obv_ma20: finite_or(obv_ma20, 0.0),
        obv_above_ma: obv_last > obv_ma20,
        ma5: finite_or(ma5, 0.0),
        ma20: finite_or(ma20, 0.0),
        ma60: finite_or(ma60, 0.0),
        volume_ratio: finite_or(volume_ratio, 1.0),
        muges_ratio: finite_or(muges_ratio, 1.0),
        smp: finite_or(smp, 0.0),
        change_pct: finite_or(change_pct, 0.0),
    }
}

/// Per-day turnover weight: typical price over close.
///
/// Undefined on zero-volume (or zero-close) days; undefined days are
/// excluded from the 20-day mean rather than zero-filled into it.
fn muges_value(row: &AlignedRow) -> Option<f64> {
    if row.volume > 0 && row.close > 0.0 {
        Some(row.typical_price() / row.close)
    } else {
        None
    }
}

fn smart_money_proportion(rows: &[AlignedRow], smp_window: usize, scale: ScaleProxy) -> f64 {
    if smp_window == 0 {
        return 0.0;
    }
    let start = rows.len().saturating_sub(smp_window);
    let window = &rows[start..];
    let net_flow: f64 = window.iter().map(|r| r.foreign_amt + r.inst_amt).sum();

    let denominator = match scale {
        ScaleProxy::MarketCap(cap) => cap,
        ScaleProxy::WindowTurnover => window.iter().map(|r| r.traded_value()).sum(),
    };

    if denominator > 0.0 {
        net_flow / denominator * 100.0
    } else {
        0.0
    }
}

/// Mean of the trailing `window` values; `None` when no full window exists.
fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Mean of the trailing window, truncated to the available length.
fn truncated_sma(values: &[f64], window: usize) -> f64 {
    let len = window.min(values.len());
    if len == 0 {
        return 0.0;
    }
    let tail = &values[values.len() - len..];
    tail.iter().sum::<f64>() / len as f64
}

/// Mean over the defined entries within the trailing window.
fn defined_trailing_mean(values: &[Option<f64>], window: usize) -> Option<f64> {
    let start = values.len().saturating_sub(window);
    let defined: Vec<f64> = values[start..].iter().filter_map(|v| *v).collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() { value } else { default }
}
