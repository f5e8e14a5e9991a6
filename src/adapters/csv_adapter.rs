//! CSV adapters: historical bars in, trade ledger out.

use std::fs::File;
use std::path::Path;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Bar;
use crate::domain::position::TradeResult;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const LEDGER_HEADER: [&str; 6] = ["Timestamp", "Symbol", "Side", "Price", "Quantity", "PnL"];

/// One row of the trade ledger file.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub timestamp: String,
    pub symbol: String,
    pub side: String,
    pub price: f64,
    pub quantity: f64,
    pub pnl: f64,
}

impl LedgerRow {
    /// Timestamp is the exit time, side the order side that closed the trade.
    pub fn from_trade(symbol: &str, trade: &TradeResult) -> Self {
        LedgerRow {
            timestamp: trade.exit_time.clone(),
            symbol: symbol.to_string(),
            side: trade.direction.exit_side().to_string(),
            price: trade.exit_price,
            quantity: trade.quantity,
            pnl: trade.profit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        CsvAdapter
    }
}

fn reader_for(path: &Path) -> Result<csv::Reader<File>, SigtraderError> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<f64, SigtraderError> {
    let raw = record
        .get(index)
        .ok_or_else(|| SigtraderError::MalformedHistoricalData {
            line,
            reason: format!("missing {} column", name),
        })?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SigtraderError::MalformedHistoricalData {
            line,
            reason: format!("invalid {} value: '{}'", name, raw),
        }),
    }
}

impl DataPort for CsvAdapter {
    fn load_bars(&self, path: &Path) -> Result<Vec<Bar>, SigtraderError> {
        let mut rdr = reader_for(path)?;
        let mut bars = Vec::new();

        for (index, result) in rdr.records().enumerate() {
            let fallback_line = index + 2;
            let record = result.map_err(|e| SigtraderError::MalformedHistoricalData {
                line: e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line),
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(fallback_line);

            let timestamp = match record.get(0) {
                Some(ts) if !ts.is_empty() => ts.to_string(),
                _ => {
                    return Err(SigtraderError::MalformedHistoricalData {
                        line,
                        reason: "missing timestamp column".into(),
                    });
                }
            };

            bars.push(Bar {
                timestamp,
                open: parse_field(&record, 1, "open", line)?,
                high: parse_field(&record, 2, "high", line)?,
                low: parse_field(&record, 3, "low", line)?,
                close: parse_field(&record, 4, "close", line)?,
                volume: parse_field(&record, 5, "volume", line)?,
            });
        }

        Ok(bars)
    }
}

impl ReportPort for CsvAdapter {
    fn write_ledger(
        &self,
        symbol: &str,
        trades: &[TradeResult],
        output_path: &Path,
    ) -> Result<(), SigtraderError> {
        let ledger_err = |e: csv::Error| SigtraderError::LedgerWrite {
            reason: format!("{}: {}", output_path.display(), e),
        };

        let mut wtr = csv::Writer::from_path(output_path).map_err(ledger_err)?;
        wtr.write_record(LEDGER_HEADER).map_err(ledger_err)?;

        for trade in trades {
            let row = LedgerRow::from_trade(symbol, trade);
            wtr.write_record([
                row.timestamp,
                row.symbol,
                row.side,
                row.price.to_string(),
                row.quantity.to_string(),
                row.pnl.to_string(),
            ])
            .map_err(ledger_err)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

/// Read a ledger file written by [`CsvAdapter::write_ledger`].
pub fn read_ledger(path: &Path) -> Result<Vec<LedgerRow>, SigtraderError> {
    let mut rdr = reader_for(path)?;
    let mut rows = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let line = index + 2;
        let record = result.map_err(|e| SigtraderError::MalformedHistoricalData {
            line,
            reason: format!("CSV parse error: {}", e),
        })?;
        let text = |i: usize, name: &str| {
            record
                .get(i)
                .map(str::to_string)
                .ok_or_else(|| SigtraderError::MalformedHistoricalData {
                    line,
                    reason: format!("missing {} column", name),
                })
        };

        rows.push(LedgerRow {
            timestamp: text(0, "Timestamp")?,
            symbol: text(1, "Symbol")?,
            side: text(2, "Side")?,
            price: parse_field(&record, 3, "Price", line)?,
            quantity: parse_field(&record, 4, "Quantity", line)?,
            pnl: parse_field(&record, 5, "PnL", line)?,
        });
    }

    Ok(rows)
}
