//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_broker::PaperBroker;
use crate::adapters::replay_feed::ReplayFeed;
use crate::domain::backtest::{BacktestConfig, BacktestEngine};
use crate::domain::config_validation::{
    read_bool, read_f64, read_u64, read_usize, validate_all, validate_backtest_config,
    validate_live_config, validate_risk_config, validate_strategy_config,
};
use crate::domain::error::SigtraderError;
use crate::domain::live::{LiveConfig, LiveTrader};
use crate::domain::metrics::PerformanceReport;
use crate::domain::risk::{RiskConfig, RiskManager};
use crate::domain::strategy::{
    EnhancedParams, SimpleParams, StrategyConfig, StrategyKind, build_strategy,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Indicator-driven trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over historical bars
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Historical CSV, overrides [backtest] data_file
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Trade ledger CSV, overrides [backtest] output_file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// simple or enhanced, overrides [strategy] kind
        #[arg(short, long)]
        strategy: Option<StrategyKind>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run the live loop against a replay feed and a paper broker
    Paper {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Poll this many times, defaults to one poll per bar
        #[arg(short, long)]
        iterations: Option<usize>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            output,
            strategy,
        } => run_backtest(&config, data.as_deref(), output.as_deref(), strategy),
        Command::Validate { config } => run_validate(&config),
        Command::Paper {
            config,
            data,
            iterations,
        } => run_paper(&config, data.as_deref(), iterations),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SigtraderError> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    output_override: Option<&Path>,
    kind_override: Option<StrategyKind>,
) -> Result<(), SigtraderError> {
    let adapter = load_config(config_path)?;
    validate_all(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let strategy_config = build_strategy_config(&adapter, kind_override)?;
    let data_path = resolve_data_path(&adapter, data_override)?;
    let output_path = output_override
        .map(Path::to_path_buf)
        .or_else(|| non_empty(&adapter, "backtest", "output_file").map(PathBuf::from));

    let csv = CsvAdapter::new();
    let bars = csv.load_bars(&data_path)?;
    info!("loaded {} bars from {}", bars.len(), data_path.display());

    let mut strategy = build_strategy(&strategy_config);
    let engine = BacktestEngine::new(bt_config);
    let result = engine.run(&bars, strategy.as_mut());

    let report = PerformanceReport::compute(result.initial_capital, &result.trades);
    println!("=== {} ({}) ===", result.symbol, strategy.name());
    println!("Bars Processed:   {}", result.bars_processed);
    println!("Rejected Orders:  {}", result.rejected_orders);
    if let Some(pos) = &result.open_position {
        println!(
            "Open Position:    {} {} @ {}",
            pos.direction, pos.quantity, pos.entry_price
        );
    }
    println!("{report}");

    if let Some(output) = output_path {
        csv.write_ledger(&result.symbol, &result.trades, &output)?;
        info!("trade ledger written to {}", output.display());
    }

    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SigtraderError> {
    let adapter = load_config(config_path)?;
    validate_all(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let strategy_config = build_strategy_config(&adapter, None)?;
    println!("Symbol:           {}", bt_config.symbol);
    println!("Initial Capital:  {:.2}", bt_config.initial_capital);
    println!("Fee:              {}", bt_config.fee);
    println!("Allow Shorting:   {}", bt_config.allow_shorting);
    println!("Strategy:         {}", strategy_config.kind);
    println!("Configuration is valid.");
    Ok(())
}

fn run_paper(
    config_path: &Path,
    data_override: Option<&Path>,
    iterations: Option<usize>,
) -> Result<(), SigtraderError> {
    let adapter = load_config(config_path)?;
    validate_all(&adapter)?;

    let bt_config = build_backtest_config(&adapter)?;
    let strategy_config = build_strategy_config(&adapter, None)?;
    let data_path = resolve_data_path(&adapter, data_override)?;
    let bars = CsvAdapter::new().load_bars(&data_path)?;

    let live_config = build_live_config(&adapter, &bt_config, iterations.or(Some(bars.len())))?;
    let mut trader = LiveTrader::new(
        live_config,
        build_strategy(&strategy_config),
        RiskManager::new(bt_config.risk.clone()),
        ReplayFeed::from_bars(&bt_config.symbol, &bars),
        PaperBroker::new(),
    );
    let summary = trader.run();

    let book = trader.book();
    let report = PerformanceReport::compute(book.initial_capital, &book.ledger);
    println!("=== {} (paper) ===", bt_config.symbol);
    println!("Iterations:       {}", summary.iterations);
    println!("Skipped Ticks:    {}", summary.skipped_ticks);
    println!("Orders Submitted: {}", summary.orders_submitted);
    println!("Orders Rejected:  {}", summary.orders_rejected);
    println!("{report}");
    Ok(())
}

fn non_empty(adapter: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    adapter
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn resolve_data_path(
    adapter: &dyn ConfigPort,
    data_override: Option<&Path>,
) -> Result<PathBuf, SigtraderError> {
    match data_override {
        Some(path) => Ok(path.to_path_buf()),
        None => non_empty(adapter, "backtest", "data_file")
            .map(PathBuf::from)
            .ok_or_else(|| SigtraderError::ConfigMissing {
                section: "backtest".into(),
                key: "data_file".into(),
            }),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SigtraderError> {
    validate_backtest_config(adapter)?;
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        symbol: non_empty(adapter, "backtest", "symbol").unwrap_or(defaults.symbol),
        initial_capital: read_f64(
            adapter,
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        )?,
        fee: read_f64(adapter, "backtest", "fee", defaults.fee)?,
        allow_shorting: read_bool(
            adapter,
            "backtest",
            "allow_shorting",
            defaults.allow_shorting,
        )?,
        risk: build_risk_config(adapter)?,
    })
}

pub fn build_risk_config(adapter: &dyn ConfigPort) -> Result<RiskConfig, SigtraderError> {
    validate_risk_config(adapter)?;
    let d = RiskConfig::default();
    Ok(RiskConfig {
        risk_fraction: read_f64(adapter, "risk", "risk_fraction", d.risk_fraction)?,
        atr_period: read_usize(adapter, "risk", "atr_period", d.atr_period)?,
        atr_stop_multiplier: read_f64(
            adapter,
            "risk",
            "atr_stop_multiplier",
            d.atr_stop_multiplier,
        )?,
        max_position_fraction: read_f64(
            adapter,
            "risk",
            "max_position_fraction",
            d.max_position_fraction,
        )?,
        min_order_size: read_f64(adapter, "risk", "min_order_size", d.min_order_size)?,
    })
}

pub fn build_strategy_config(
    adapter: &dyn ConfigPort,
    kind_override: Option<StrategyKind>,
) -> Result<StrategyConfig, SigtraderError> {
    validate_strategy_config(adapter)?;

    let kind = match kind_override {
        Some(kind) => kind,
        None => match non_empty(adapter, "strategy", "kind") {
            Some(raw) => raw.parse()?,
            None => StrategyConfig::default().kind,
        },
    };

    let s = SimpleParams::default();
    let e = EnhancedParams::default();
    Ok(StrategyConfig {
        kind,
        simple: SimpleParams {
            short_period: read_usize(adapter, "strategy", "short_period", s.short_period)?,
            long_period: read_usize(adapter, "strategy", "long_period", s.long_period)?,
        },
        enhanced: EnhancedParams {
            fast_ema: read_usize(adapter, "strategy", "fast_ema", e.fast_ema)?,
            slow_ema: read_usize(adapter, "strategy", "slow_ema", e.slow_ema)?,
            signal_ema: read_usize(adapter, "strategy", "signal_ema", e.signal_ema)?,
            rsi_period: read_usize(adapter, "strategy", "rsi_period", e.rsi_period)?,
            rsi_overbought: read_f64(adapter, "strategy", "rsi_overbought", e.rsi_overbought)?,
            rsi_oversold: read_f64(adapter, "strategy", "rsi_oversold", e.rsi_oversold)?,
            history_size: read_usize(adapter, "strategy", "history_size", e.history_size)?,
        },
    })
}

pub fn build_live_config(
    adapter: &dyn ConfigPort,
    bt_config: &BacktestConfig,
    max_iterations: Option<usize>,
) -> Result<LiveConfig, SigtraderError> {
    validate_live_config(adapter)?;
    Ok(LiveConfig {
        symbol: bt_config.symbol.clone(),
        initial_capital: bt_config.initial_capital,
        fee: bt_config.fee,
        allow_shorting: bt_config.allow_shorting,
        poll_interval: Duration::from_millis(read_u64(adapter, "live", "poll_interval_ms", 1000)?),
        max_iterations,
    })
}
