//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow), 0.0 before index slow-1
//! Signal Line = EMA(signal) of the full MACD line, leading zeros included
//!
//! Default parameters: fast=12, slow=26, signal=9

use crate::domain::indicator::ema::ema_series;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// Both lines at full input length, so callers can compare the last two
/// points to detect crossovers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MacdSeries {
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn last_line(&self) -> Option<f64> {
        self.line.last().copied()
    }

    pub fn last_signal(&self) -> Option<f64> {
        self.signal.last().copied()
    }
}

/// Empty when there are fewer than `slow` prices.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    if fast == 0 || slow == 0 || signal_period == 0 || prices.len() < slow {
        return MacdSeries::default();
    }

    let ema_fast = ema_series(prices, fast);
    let ema_slow = ema_series(prices, slow);

    let line: Vec<f64> = (0..prices.len())
        .map(|i| {
            if i < slow - 1 {
                0.0
            } else {
                ema_fast[i] - ema_slow[i]
            }
        })
        .collect();

    let signal = ema_series(&line, signal_period);

    MacdSeries { line, signal }
}

fn last_two(values: &[f64]) -> Option<(f64, f64)> {
    match values {
        [.., prev, last] => Some((*prev, *last)),
        _ => None,
    }
}

/// MACD line crossed from at-or-below the signal line to above it on the
/// newest point.
pub fn crossed_above(series: &MacdSeries) -> bool {
    match (last_two(&series.line), last_two(&series.signal)) {
        (Some((line_prev, line_last)), Some((sig_prev, sig_last))) => {
            line_prev <= sig_prev && line_last > sig_last
        }
        _ => false,
    }
}

/// MACD line crossed from at-or-above the signal line to below it on the
/// newest point.
pub fn crossed_below(series: &MacdSeries) -> bool {
    match (last_two(&series.line), last_two(&series.signal)) {
        (Some((line_prev, line_last)), Some((sig_prev, sig_last))) => {
            line_prev >= sig_prev && line_last < sig_last
        }
        _ => false,
    }
}
