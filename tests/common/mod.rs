#![allow(dead_code)]

use sigtrader::domain::backtest::BacktestConfig;
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::Bar;
use sigtrader::domain::position::TradeResult;
use sigtrader::ports::data_port::DataPort;
use sigtrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serves fixed bars regardless of the requested path.
pub struct MockDataPort {
    pub bars: Vec<Bar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn load_bars(&self, _path: &Path) -> Result<Vec<Bar>, SigtraderError> {
        match &self.error {
            Some(reason) => Err(SigtraderError::MalformedHistoricalData {
                line: 2,
                reason: reason.clone(),
            }),
            None => Ok(self.bars.clone()),
        }
    }
}

/// Captures ledgers instead of writing them.
#[derive(Default)]
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(String, Vec<TradeResult>)>>,
}

impl ReportPort for RecordingReportPort {
    fn write_ledger(
        &self,
        symbol: &str,
        trades: &[TradeResult],
        _output_path: &Path,
    ) -> Result<(), SigtraderError> {
        self.written
            .borrow_mut()
            .push((symbol.to_string(), trades.to_vec()));
        Ok(())
    }
}

pub fn make_bar(timestamp: &str, close: f64, volume: f64) -> Bar {
    Bar {
        timestamp: timestamp.to_string(),
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume,
    }
}

/// Closes `start_price + i`, constant volume.
pub fn generate_bars(count: usize, start_price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let timestamp = format!("2024-01-01T{:02}:{:02}", i / 60, i % 60);
            make_bar(&timestamp, start_price + i as f64, 1000.0)
        })
        .collect()
}

/// Drifts down 0.3 per bar with a +2 bump on odd bars; the last three bars
/// carry double volume.
pub fn choppy_downtrend_bars() -> Vec<Bar> {
    (0..61)
        .map(|i| {
            let close = 200.0 - 0.3 * i as f64 + if i % 2 == 1 { 2.0 } else { 0.0 };
            let volume = if i >= 58 { 2000.0 } else { 1000.0 };
            make_bar(&format!("bar-{i}"), close, volume)
        })
        .collect()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig::default()
}

pub fn bars_csv(bars: &[Bar]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.timestamp, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn path_str(path: &Path) -> String {
    path.display().to_string()
}

pub fn temp_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}
