//! Configuration validation.
//!
//! Every key is optional and falls back to its documented default. A key
//! that is present but unparsable, or a value outside its allowed range,
//! fails with `ConfigInvalid`.

use std::str::FromStr;

use crate::domain::error::SigtraderError;
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_initial_capital(config)?;
    validate_fee(config)?;
    validate_symbol(config)?;
    read_bool(config, "backtest", "allow_shorting", false)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(kind) = non_empty(config, "strategy", "kind") {
        kind.parse::<StrategyKind>()?;
    }
    validate_periods(config)?;
    validate_ordered_periods(config, "short_period", 10, "long_period", 50)?;
    validate_ordered_periods(config, "fast_ema", 12, "slow_ema", 26)?;
    validate_rsi_thresholds(config)?;
    Ok(())
}

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_fraction(config, "risk", "risk_fraction", 0.01)?;
    validate_fraction(config, "risk", "max_position_fraction", 0.10)?;
    validate_positive_usize(config, "risk", "atr_period", 14)?;

    let multiplier = read_f64(config, "risk", "atr_stop_multiplier", 2.0)?;
    if !(multiplier > 0.0) {
        return Err(invalid("risk", "atr_stop_multiplier", "atr_stop_multiplier must be positive"));
    }
    let min_order = read_f64(config, "risk", "min_order_size", 10.0)?;
    if min_order < 0.0 {
        return Err(invalid("risk", "min_order_size", "min_order_size must be non-negative"));
    }
    Ok(())
}

pub fn validate_live_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    read_u64(config, "live", "poll_interval_ms", 1000)?;
    Ok(())
}

pub fn validate_all(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;
    validate_risk_config(config)?;
    validate_live_config(config)?;
    Ok(())
}

pub fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SigtraderError> {
    let value = read_parsed(config, section, key, default, "a number")?;
    if !value.is_finite() {
        return Err(invalid(section, key, &format!("{} must be finite", key)));
    }
    Ok(value)
}

pub fn read_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SigtraderError> {
    read_parsed(config, section, key, default, "a non-negative integer")
}

pub fn read_u64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u64,
) -> Result<u64, SigtraderError> {
    read_parsed(config, section, key, default, "a non-negative integer")
}

pub fn read_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, SigtraderError> {
    match non_empty(config, section, key) {
        None => Ok(default),
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(invalid(
                section,
                key,
                &format!("{} must be true or false, got '{}'", key, raw),
            )),
        },
    }
}

fn read_parsed<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
    expected: &str,
) -> Result<T, SigtraderError> {
    match non_empty(config, section, key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| {
            invalid(section, key, &format!("{} must be {}, got '{}'", key, expected, raw))
        }),
    }
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn invalid(section: &str, key: &str, reason: &str) -> SigtraderError {
    SigtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = read_f64(config, "backtest", "initial_capital", 10_000.0)?;
    if value <= 0.0 {
        return Err(invalid("backtest", "initial_capital", "initial_capital must be positive"));
    }
    Ok(())
}

fn validate_fee(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = read_f64(config, "backtest", "fee", 0.001)?;
    if !(0.0..1.0).contains(&value) {
        return Err(invalid("backtest", "fee", "fee must be in [0, 1)"));
    }
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if s.trim().is_empty() => {
            Err(invalid("backtest", "symbol", "symbol must not be empty"))
        }
        _ => Ok(()),
    }
}

fn validate_fraction(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), SigtraderError> {
    let value = read_f64(config, section, key, default)?;
    if value <= 0.0 || value > 1.0 {
        return Err(invalid(section, key, &format!("{} must be in (0, 1]", key)));
    }
    Ok(())
}

fn validate_positive_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SigtraderError> {
    let value = read_usize(config, section, key, default)?;
    if value == 0 {
        return Err(invalid(section, key, &format!("{} must be at least 1", key)));
    }
    Ok(value)
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    for (key, default) in [("signal_ema", 9), ("rsi_period", 14), ("history_size", 500)] {
        validate_positive_usize(config, "strategy", key, default)?;
    }
    Ok(())
}

fn validate_ordered_periods(
    config: &dyn ConfigPort,
    short_key: &str,
    short_default: usize,
    long_key: &str,
    long_default: usize,
) -> Result<(), SigtraderError> {
    let short = validate_positive_usize(config, "strategy", short_key, short_default)?;
    let long = validate_positive_usize(config, "strategy", long_key, long_default)?;
    if short >= long {
        return Err(invalid(
            "strategy",
            short_key,
            &format!("{} must be less than {}", short_key, long_key),
        ));
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let overbought = read_f64(config, "strategy", "rsi_overbought", 70.0)?;
    let oversold = read_f64(config, "strategy", "rsi_oversold", 30.0)?;
    for (key, value) in [("rsi_overbought", overbought), ("rsi_oversold", oversold)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("strategy", key, &format!("{} must be in [0, 100]", key)));
        }
    }
    if oversold >= overbought {
        return Err(invalid(
            "strategy",
            "rsi_oversold",
            "rsi_oversold must be less than rsi_overbought",
        ));
    }
    Ok(())
}
