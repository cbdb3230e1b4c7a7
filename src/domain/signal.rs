//! Per-instrument signal derivation pipeline.
//!
//! [`classify_instrument`] is the single synchronous entry point the
//! orchestration layer calls: validate, align the two feeds, compute the
//! latest indicator snapshot, count trailing net-buy runs, and run the
//! phase cascade.

use serde::Serialize;

use crate::domain::bar::PriceBar;
use crate::domain::consecutive::ConsecutiveCounts;
use crate::domain::error::PhasewatchError;
use crate::domain::flow::{FlowRow, align};
use crate::domain::indicator::{IndicatorSnapshot, ScaleProxy, compute_snapshot};
use crate::domain::phase::{PhaseInputs, PhaseResult, classify};

/// The full derivation result for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReport {
    pub indicators: IndicatorSnapshot,
    pub counts: ConsecutiveCounts,
    pub phase: PhaseResult,
    /// Latest-day foreign net quantity, from the aligned series.
    pub latest_foreign_qty: f64,
    /// Latest-day institutional net quantity, from the aligned series.
    pub latest_inst_qty: f64,
}

/// Derive the phase signal for one instrument.
///
/// Sparse data is not an error: an empty or partial flow series and short
/// bar history degrade to neutral values. Structural problems fail fast:
/// non-finite numeric fields, negative prices or volumes, and a non-empty
/// flow series whose dates are fully disjoint from the bar dates (the
/// signature of mismatched date formats upstream).
pub fn classify_instrument(
    code: &str,
    bars: &[PriceBar],
    flows: &[FlowRow],
    smp_window: usize,
    scale: ScaleProxy,
) -> Result<SignalReport, PhasewatchError> {
    validate_inputs(code, bars, flows)?;

    let rows = align(bars, flows);
    let indicators = compute_snapshot(&rows, smp_window, scale);
    let counts = ConsecutiveCounts::from_rows(&rows);

    let (latest_foreign_qty, latest_inst_qty) = rows
        .last()
        .map(|r| (r.foreign_qty, r.inst_qty))
        .unwrap_or((0.0, 0.0));

    let inputs = PhaseInputs::new(&indicators, &counts, latest_foreign_qty, latest_inst_qty);
    let phase = classify(&inputs);

    Ok(SignalReport {
        indicators,
        counts,
        phase,
        latest_foreign_qty,
        latest_inst_qty,
    })
}

fn validate_inputs(
    code: &str,
    bars: &[PriceBar],
    flows: &[FlowRow],
) -> Result<(), PhasewatchError> {
    for bar in bars {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite() || *p < 0.0) || bar.volume < 0 {
            return Err(PhasewatchError::InputValidation {
                code: code.to_string(),
                reason: format!("malformed bar on {}", bar.date),
            });
        }
    }
    for flow in flows {
        let fields = [
            flow.foreign_qty,
            flow.inst_qty,
            flow.indiv_qty,
            flow.foreign_amt,
            flow.inst_amt,
            flow.indiv_amt,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(PhasewatchError::InputValidation {
                code: code.to_string(),
                reason: format!("malformed flow row on {}", flow.date),
            });
        }
    }

    // a non-empty flow series that matches no bar date at all means the two
    // feeds disagree on date representation; zero-filling it all would
    // silently miscompute
    if !bars.is_empty() && !flows.is_empty() {
        let matched = flows
            .iter()
            .any(|f| bars.iter().any(|b| b.date == f.date));
        if !matched {
            return Err(PhasewatchError::InputValidation {
                code: code.to_string(),
                reason: "no flow date matches any bar date".to_string(),
            });
        }
    }
    Ok(())
}
