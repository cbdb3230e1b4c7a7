//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_market_data::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_history_store::JsonHistoryStore;
use crate::domain::error::PhasewatchError;
use crate::domain::history::{DEFAULT_MAX_DAYS, HistoryStore};
use crate::domain::indicator::{DEFAULT_SMP_WINDOW, ScaleProxy};
use crate::domain::scan::{ScanParams, run_scan};
use crate::domain::signal::classify_instrument;
use crate::domain::summary::InstrumentSummary;
use crate::domain::trading_hours::is_session_open;
use crate::domain::watchlist::{Watchlist, parse_codes};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::store_port::HistoryStorePort;

#[derive(Parser, Debug)]
#[command(name = "phasewatch", about = "Accumulation/distribution phase scanner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the watch list and record today's phase signals
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the daily snapshot JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Record results under this date instead of today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print one instrument's signal report as JSON
    Inspect {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
    },
    /// List the dates retained in the history store
    History {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            output,
            date,
        } => run_scan_command(&config, output.as_deref(), date),
        Command::Inspect { config, code } => run_inspect(&config, &code),
        Command::History { config } => run_history(&config),
    }
}

/// Scan settings resolved from the config file.
#[derive(Debug)]
pub struct ScanConfig {
    pub csv_dir: PathBuf,
    pub history_file: PathBuf,
    pub watchlist: Watchlist,
    pub smp_window: usize,
    pub history_days: usize,
    pub use_market_cap: bool,
}

impl ScanConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, PhasewatchError> {
        let csv_dir = config
            .get_string("data", "csv_dir")
            .map(PathBuf::from)
            .ok_or_else(|| PhasewatchError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            })?;

        let history_file = config
            .get_string("data", "history_file")
            .map(PathBuf::from)
            .unwrap_or_else(|| csv_dir.join("history.json"));

        let codes = config.get_string("scan", "codes").ok_or_else(|| {
            PhasewatchError::ConfigMissing {
                section: "scan".into(),
                key: "codes".into(),
            }
        })?;
        let watchlist = parse_codes(&codes).map_err(|e| PhasewatchError::ConfigInvalid {
            section: "scan".into(),
            key: "codes".into(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            csv_dir,
            history_file,
            watchlist,
            smp_window: config.get_usize("scan", "smp_window", DEFAULT_SMP_WINDOW),
            history_days: config.get_usize("scan", "history_days", DEFAULT_MAX_DAYS),
            use_market_cap: config.get_bool("scan", "use_market_cap", true),
        })
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PhasewatchError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_scan_config(path: &Path) -> Result<ScanConfig, ExitCode> {
    let adapter = load_config(path)?;
    ScanConfig::from_port(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_scan_command(
    config_path: &Path,
    output_path: Option<&Path>,
    date_override: Option<NaiveDate>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let cfg = match load_scan_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let now = Local::now();
    let date_key = date_override
        .unwrap_or_else(|| now.date_naive())
        .format("%Y-%m-%d")
        .to_string();

    let data = CsvMarketData::new(cfg.csv_dir.clone());
    let params = ScanParams {
        smp_window: cfg.smp_window,
        use_market_cap: cfg.use_market_cap,
        updated_at: now.format("%Y-%m-%d %H:%M").to_string(),
        market_open: is_session_open(now.time()),
    };

    eprintln!("Scanning {} instruments for {date_key}", cfg.watchlist.count());
    let outcome = run_scan(&data, &cfg.watchlist, &params);
    let snapshot = outcome.snapshot;

    if snapshot.stocks.is_empty() {
        let err = PhasewatchError::Data {
            reason: "every instrument failed".to_string(),
        };
        eprintln!("error: {err}");
        return ExitCode::from(&err);
    }

    // retention bookkeeping: one entry per date, bounded store
    let store_port = JsonHistoryStore::new(cfg.history_file.clone());
    let summaries: Vec<InstrumentSummary> =
        snapshot.stocks.iter().map(InstrumentSummary::from).collect();
    if let Err(e) = update_history(&store_port, &date_key, summaries, cfg.history_days) {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }

    let encoded = match serde_json::to_string_pretty(&snapshot) {
        Ok(s) => s,
        Err(e) => {
            let err = PhasewatchError::Data {
                reason: format!("failed to encode snapshot: {e}"),
            };
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };

    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, &encoded) {
            let err = PhasewatchError::Io(e);
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
        eprintln!("Snapshot written to {}", path.display());
    } else {
        println!("{encoded}");
    }

    eprintln!(
        "{} scanned | golden {} | p1 {} | p2 {} | p3 {} | new highs {}",
        snapshot.stocks.len(),
        snapshot.stats.golden,
        snapshot.stats.p1,
        snapshot.stats.p2,
        snapshot.stats.p3,
        snapshot.stats.new_high,
    );
    ExitCode::SUCCESS
}

fn update_history(
    store_port: &dyn HistoryStorePort,
    date_key: &str,
    summaries: Vec<InstrumentSummary>,
    max_days: usize,
) -> Result<(), PhasewatchError> {
    let mut store: HistoryStore = store_port.load()?;
    store.append_and_prune(date_key, summaries, max_days);
    store_port.save(&store)
}

fn run_inspect(config_path: &Path, code: &str) -> ExitCode {
    let cfg = match load_scan_config(config_path) {
        Ok(c) => c,
        Err(exit) => return exit,
    };

    let data = CsvMarketData::new(cfg.csv_dir.clone());
    let result = data.fetch_quote(code).and_then(|quote| {
        let bars = data.fetch_bars(code)?;
        let flows = data.fetch_flows(code)?;
        let scale = if cfg.use_market_cap {
            ScaleProxy::MarketCap(quote.market_cap)
        } else {
            ScaleProxy::WindowTurnover
        };
        classify_instrument(code, &bars, &flows, cfg.smp_window, scale)
    });

    match result {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_history(config_path: &Path) -> ExitCode {
    let cfg = match load_scan_config(config_path) {
        Ok(c) => c,
        Err(exit) => return exit,
    };

    let store = match JsonHistoryStore::new(cfg.history_file.clone()).load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    if store.is_empty() {
        eprintln!("history store is empty");
        return ExitCode::SUCCESS;
    }

    for date in store.dates() {
        let entries = store.get(date).map(|s| s.len()).unwrap_or(0);
        println!("{date}: {entries} instruments");
    }
    ExitCode::SUCCESS
}
