//! Phase classification rule cascade.
//!
//! The rules are evaluated strictly in the order they are declared and the
//! first match decides the result, so declaration order is the tie-break
//! between rules whose predicates overlap. Thresholds are calibrated
//! heuristics carried over from the signal set this engine replaces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::consecutive::ConsecutiveCounts;
use crate::domain::indicator::IndicatorSnapshot;

/// Lifecycle phase keys, from strongest accumulation signal to
/// distribution warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKey {
    Golden,
    P1,
    P2,
    P3,
    None,
}

impl fmt::Display for PhaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseKey::Golden => "golden",
            PhaseKey::P1 => "p1",
            PhaseKey::P2 => "p2",
            PhaseKey::P3 => "p3",
            PhaseKey::None => "none",
        };
        write!(f, "{s}")
    }
}

/// Classification outcome: a key plus its human-readable label
/// (empty when no rule matched).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub key: PhaseKey,
    pub label: String,
}

impl PhaseResult {
    pub fn none() -> Self {
        Self {
            key: PhaseKey::None,
            label: String::new(),
        }
    }
}

/// Everything a rule predicate may look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseInputs {
    pub smp: f64,
    pub muges_ratio: f64,
    pub volume_ratio: f64,
    pub obv_above_ma: bool,
    pub change_pct: f64,
    pub foreign_consec: usize,
    /// Latest-day foreign net quantity (signed).
    pub latest_foreign: f64,
    /// Latest-day institutional net quantity (signed).
    pub latest_inst: f64,
}

impl PhaseInputs {
    pub fn new(
        snapshot: &IndicatorSnapshot,
        counts: &ConsecutiveCounts,
        latest_foreign: f64,
        latest_inst: f64,
    ) -> Self {
        Self {
            smp: snapshot.smp,
            muges_ratio: snapshot.muges_ratio,
            volume_ratio: snapshot.volume_ratio,
            obv_above_ma: snapshot.obv_above_ma,
            change_pct: snapshot.change_pct,
            foreign_consec: counts.foreign_days,
            latest_foreign,
            latest_inst,
        }
    }
}

/// One entry of the ordered cascade.
pub struct PhaseRule {
    pub key: PhaseKey,
    pub label: &'static str,
    pub matches: fn(&PhaseInputs) -> bool,
}

/// The cascade, highest priority first.
pub const PHASE_RULES: &[PhaseRule] = &[
    PhaseRule {
        key: PhaseKey::Golden,
        label: "GOLDEN",
        matches: |s| {
            s.smp > 0.0
                && s.foreign_consec >= 3
                && s.latest_inst > 0.0
                && s.muges_ratio < 0.8
                && s.volume_ratio < 1.5
        },
    },
    PhaseRule {
        key: PhaseKey::P2,
        label: "P2 volume breakout",
        matches: |s| s.volume_ratio >= 2.0 && s.latest_foreign > 0.0,
    },
    PhaseRule {
        key: PhaseKey::P2,
        label: "P2 flow acceleration",
        matches: |s| s.foreign_consec >= 5 && s.smp > 0.0 && s.volume_ratio >= 1.2,
    },
    PhaseRule {
        key: PhaseKey::P2,
        label: "P2 early rally",
        matches: |s| {
            s.latest_foreign > 0.0
                && s.latest_inst > 0.0
                && s.volume_ratio >= 1.3
                && s.smp > 0.0
                && s.foreign_consec >= 2
        },
    },
    PhaseRule {
        key: PhaseKey::P1,
        label: "P1 composite flow",
        matches: |s| s.smp > 0.0 && s.foreign_consec >= 3 && s.latest_inst > 0.0,
    },
    PhaseRule {
        key: PhaseKey::P1,
        label: "P1 quiet accumulation",
        matches: |s| s.muges_ratio < 0.5 && s.smp > 0.0 && s.latest_foreign > 0.0,
    },
    PhaseRule {
        key: PhaseKey::P1,
        label: "P1 OBV accumulation",
        matches: |s| s.obv_above_ma && s.change_pct <= 0.0,
    },
    PhaseRule {
        key: PhaseKey::P3,
        label: "P3 distribution warning",
        matches: |s| s.muges_ratio > 3.0 && s.latest_foreign < 0.0,
    },
    PhaseRule {
        key: PhaseKey::P3,
        label: "P3 ownership turnover",
        matches: |s| s.latest_foreign < 0.0 && s.latest_inst < 0.0,
    },
];

/// Walk the cascade; the first matching rule wins, otherwise
/// [`PhaseResult::none`].
pub fn classify(inputs: &PhaseInputs) -> PhaseResult {
    for rule in PHASE_RULES {
        if (rule.matches)(inputs) {
            return PhaseResult {
                key: rule.key,
                label: rule.label.to_string(),
            };
        }
    }
    PhaseResult::none()
}
