//! Trailing consecutive net-buy day counting.

use serde::Serialize;

use crate::domain::flow::AlignedRow;

/// Consecutive positive-net-buy day counts per investor class, measured
/// backward from the most recent aligned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsecutiveCounts {
    pub foreign_days: usize,
    pub inst_days: usize,
}

impl ConsecutiveCounts {
    pub fn from_rows(rows: &[AlignedRow]) -> Self {
        let foreign: Vec<f64> = rows.iter().map(|r| r.foreign_qty).collect();
        let inst: Vec<f64> = rows.iter().map(|r| r.inst_qty).collect();
        Self {
            foreign_days: count_trailing_positive(&foreign),
            inst_days: count_trailing_positive(&inst),
        }
    }
}

/// Count the run of strictly positive values at the end of `values`.
///
/// The scan walks backward from the last element and stops at the first
/// value that is not greater than zero (zero-filled missing days therefore
/// end the run).
pub fn count_trailing_positive(values: &[f64]) -> usize {
    values.iter().rev().take_while(|v| **v > 0.0).count()
}
