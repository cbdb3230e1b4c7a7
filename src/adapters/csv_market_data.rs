//! CSV file market-data adapter.
//!
//! The fetch-layer stand-in: bars and flows live in per-code files
//! (`<code>_bars.csv`, `<code>_flows.csv`) and current quotes in one shared
//! `quotes.csv`, all with header rows. A missing flows file is treated as
//! an instrument without flow coverage, not an error.

use chrono::NaiveDate;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::bar::PriceBar;
use crate::domain::error::PhasewatchError;
use crate::domain::flow::FlowRow;
use crate::domain::quote::InstrumentQuote;
use crate::ports::data_port::MarketDataPort;

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn bars_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{code}_bars.csv"))
    }

    fn flows_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{code}_flows.csv"))
    }

    fn quotes_path(&self) -> PathBuf {
        self.base_path.join("quotes.csv")
    }
}

impl MarketDataPort for CsvMarketData {
    fn fetch_bars(&self, code: &str) -> Result<Vec<PriceBar>, PhasewatchError> {
        let path = self.bars_path(code);
        let mut rdr = open_reader(&path)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_error(&path, e))?;
            bars.push(PriceBar {
                date: parse_date(&record, 0, &path)?,
                open: parse_field(&record, 1, "open", &path)?,
                high: parse_field(&record, 2, "high", &path)?,
                low: parse_field(&record, 3, "low", &path)?,
                close: parse_field(&record, 4, "close", &path)?,
                volume: parse_field(&record, 5, "volume", &path)?,
            });
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn fetch_flows(&self, code: &str) -> Result<Vec<FlowRow>, PhasewatchError> {
        let path = self.flows_path(code);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = open_reader(&path)?;

        let mut flows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_error(&path, e))?;
            flows.push(FlowRow {
                date: parse_date(&record, 0, &path)?,
                foreign_qty: parse_field(&record, 1, "foreign_qty", &path)?,
                inst_qty: parse_field(&record, 2, "inst_qty", &path)?,
                indiv_qty: parse_field(&record, 3, "indiv_qty", &path)?,
                foreign_amt: parse_field(&record, 4, "foreign_amt", &path)?,
                inst_amt: parse_field(&record, 5, "inst_amt", &path)?,
                indiv_amt: parse_field(&record, 6, "indiv_amt", &path)?,
            });
        }
        flows.sort_by_key(|f| f.date);
        Ok(flows)
    }

    fn fetch_quote(&self, code: &str) -> Result<InstrumentQuote, PhasewatchError> {
        let path = self.quotes_path();
        let mut rdr = open_reader(&path)?;

        for result in rdr.records() {
            let record = result.map_err(|e| data_error(&path, e))?;
            if get_field(&record, 0, "code", &path)? != code {
                continue;
            }
            return Ok(InstrumentQuote {
                code: code.to_string(),
                name: get_field(&record, 1, "name", &path)?.to_string(),
                market: get_field(&record, 2, "market", &path)?.to_string(),
                price: parse_field(&record, 3, "price", &path)?,
                change_pct: parse_field(&record, 4, "change_pct", &path)?,
                volume: parse_field(&record, 5, "volume", &path)?,
                high_52w: parse_field(&record, 6, "high_52w", &path)?,
                low_52w: parse_field(&record, 7, "low_52w", &path)?,
                market_cap: parse_field(&record, 8, "market_cap", &path)?,
            });
        }

        Err(PhasewatchError::Data {
            reason: format!("no quote for {code} in {}", path.display()),
        })
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, PhasewatchError> {
    csv::Reader::from_path(path).map_err(|e| PhasewatchError::Data {
        reason: format!("failed to open {}: {e}", path.display()),
    })
}

fn data_error(path: &Path, err: impl Display) -> PhasewatchError {
    PhasewatchError::Data {
        reason: format!("{}: {err}", path.display()),
    }
}

fn get_field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<&'a str, PhasewatchError> {
    record.get(index).ok_or_else(|| PhasewatchError::Data {
        reason: format!("{}: missing {name} column", path.display()),
    })
}

fn parse_field<T: FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<T, PhasewatchError>
where
    T::Err: Display,
{
    let raw = get_field(record, index, name, path)?;
    raw.trim().parse().map_err(|e| PhasewatchError::Data {
        reason: format!("{}: invalid {name} value {raw:?}: {e}", path.display()),
    })
}

fn parse_date(
    record: &csv::StringRecord,
    index: usize,
    path: &Path,
) -> Result<NaiveDate, PhasewatchError> {
    let raw = get_field(record, index, "date", path)?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| PhasewatchError::Data {
        reason: format!("{}: invalid date {raw:?}: {e}", path.display()),
    })
}
