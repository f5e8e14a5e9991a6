//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("insufficient history: have {have} samples, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("malformed historical data at line {line}: {reason}")]
    MalformedHistoricalData { line: usize, reason: String },

    #[error("invalid order parameters: {reason}")]
    InvalidOrderParameters { reason: String },

    #[error("insufficient samples: have {have} returns, need {need} with non-zero dispersion")]
    InsufficientSamples { have: usize, need: usize },

    #[error("price feed unavailable for {symbol}: {reason}")]
    FeedUnavailable { symbol: String, reason: String },

    #[error("order rejected: {reason}")]
    OrderRejected { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to write trade ledger: {reason}")]
    LedgerWrite { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) | SigtraderError::LedgerWrite { .. } => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::MalformedHistoricalData { .. }
            | SigtraderError::InsufficientHistory { .. }
            | SigtraderError::InsufficientSamples { .. }
            | SigtraderError::FeedUnavailable { .. } => 3,
            SigtraderError::InvalidOrderParameters { .. }
            | SigtraderError::OrderRejected { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
