//! Historical data port trait.

use std::path::Path;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Bar;

pub trait DataPort {
    /// Load every bar from `path` in file order. Any malformed row fails the
    /// whole load.
    fn load_bars(&self, path: &Path) -> Result<Vec<Bar>, SigtraderError>;
}
