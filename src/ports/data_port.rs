//! Market data access port trait.
//!
//! The fetch side (broker API, files, fixtures) lives behind this trait;
//! the core only sees materialized, oldest-first sequences.

use crate::domain::bar::PriceBar;
use crate::domain::error::PhasewatchError;
use crate::domain::flow::FlowRow;
use crate::domain::quote::InstrumentQuote;

pub trait MarketDataPort {
    /// Daily bars for `code`, oldest first.
    fn fetch_bars(&self, code: &str) -> Result<Vec<PriceBar>, PhasewatchError>;

    /// Investor flow rows for `code`, oldest first. An instrument without
    /// flow coverage yields an empty vector, not an error.
    fn fetch_flows(&self, code: &str) -> Result<Vec<FlowRow>, PhasewatchError>;

    /// Current quote for `code`.
    fn fetch_quote(&self, code: &str) -> Result<InstrumentQuote, PhasewatchError>;
}
