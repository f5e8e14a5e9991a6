//! Trade ledger output port trait.

use std::path::Path;

use crate::domain::error::SigtraderError;
use crate::domain::position::TradeResult;

/// Port for persisting the closed-trade ledger of a run.
pub trait ReportPort {
    fn write_ledger(
        &self,
        symbol: &str,
        trades: &[TradeResult],
        output_path: &Path,
    ) -> Result<(), SigtraderError>;
}
