//! Performance metrics over a closed-trade ledger.
//!
//! Drawdown and Sharpe are measured on the realized capital curve
//! `[initial, initial + p1, initial + p1 + p2, ...]`, one point per closed
//! trade. Open positions do not contribute.

use std::fmt;

use super::error::SigtraderError;
use super::position::TradeResult;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage in [0, 100]; 0 with no trades.
    pub win_rate: f64,
    pub total_pnl: f64,
    /// Percentage of initial capital.
    pub total_return: f64,
    /// Percentage in [0, 100].
    pub max_drawdown: f64,
    /// `None` when undefined (fewer than two trades or zero variance).
    pub sharpe_ratio: Option<f64>,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl PerformanceReport {
    pub fn compute(initial_capital: f64, trades: &[TradeResult]) -> Self {
        let curve = capital_curve(initial_capital, trades);
        let final_capital = curve.last().copied().unwrap_or(initial_capital);
        let total_pnl: f64 = trades.iter().map(|t| t.profit).sum();

        let total_return = if initial_capital > 0.0 {
            (final_capital - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades {
            let pnl = trade.profit;
            if trade.is_win() {
                winning_trades += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                losing_trades += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            }
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if winning_trades > 0 {
            total_wins / winning_trades as f64
        } else {
            0.0
        };

        let avg_loss = if losing_trades > 0 {
            total_losses / losing_trades as f64
        } else {
            0.0
        };

        PerformanceReport {
            initial_capital,
            final_capital,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            total_pnl,
            total_return,
            max_drawdown: max_drawdown(&curve),
            sharpe_ratio: sharpe_ratio(&trade_returns(&curve)).ok(),
            profit_factor,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
        }
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial Capital:  {:.2}", self.initial_capital)?;
        writeln!(f, "Final Capital:    {:.2}", self.final_capital)?;
        writeln!(f, "Total PnL:        {:.2}", self.total_pnl)?;
        writeln!(f, "Total Return:     {:.2}%", self.total_return)?;
        writeln!(f, "Total Trades:     {}", self.total_trades)?;
        writeln!(f, "Winning Trades:   {}", self.winning_trades)?;
        writeln!(f, "Losing Trades:    {}", self.losing_trades)?;
        writeln!(f, "Win Rate:         {:.1}%", self.win_rate)?;
        writeln!(f, "Profit Factor:    {:.2}", self.profit_factor)?;
        writeln!(f, "Max Drawdown:     {:.2}%", self.max_drawdown)?;
        match self.sharpe_ratio {
            Some(sharpe) => write!(f, "Sharpe Ratio:     {:.2}", sharpe),
            None => write!(f, "Sharpe Ratio:     n/a"),
        }
    }
}

pub fn capital_curve(initial_capital: f64, trades: &[TradeResult]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(trades.len() + 1);
    let mut capital = initial_capital;
    curve.push(capital);
    for trade in trades {
        capital += trade.profit;
        curve.push(capital);
    }
    curve
}

/// Largest running-peak percentage drawdown, clamped to [0, 100].
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let Some(&first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in curve {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak * 100.0);
        }
    }
    max_dd.clamp(0.0, 100.0)
}

pub fn trade_returns(curve: &[f64]) -> Vec<f64> {
    curve
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Annualized Sharpe ratio `mean / stddev * sqrt(252)` with population
/// standard deviation and no risk-free rate.
pub fn sharpe_ratio(returns: &[f64]) -> Result<f64, SigtraderError> {
    if returns.len() < 2 {
        return Err(SigtraderError::InsufficientSamples {
            have: returns.len(),
            need: 2,
        });
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if !(stddev > 0.0) {
        return Err(SigtraderError::InsufficientSamples {
            have: returns.len(),
            need: 2,
        });
    }

    Ok(mean / stddev * TRADING_DAYS_PER_YEAR.sqrt())
}
