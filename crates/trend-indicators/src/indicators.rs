use serde::{Deserialize, Serialize};
use signal_core::{IndicatorSeries, MacdParams, PeriodChange, SignalError};

/// Simple Moving Average
///
/// Each entry is the arithmetic mean of the trailing `window` values ending
/// at that index; entries with fewer than `window` values behind them are
/// undefined. A series shorter than the window yields all-undefined, not an
/// error.
pub fn sma(data: &[f64], window: usize) -> Result<IndicatorSeries, SignalError> {
    if window == 0 {
        return Err(SignalError::InvalidParameter(
            "SMA window must be at least 1".to_string(),
        ));
    }
    let defined: Vec<Option<f64>> = data.iter().map(|&v| Some(v)).collect();
    Ok(IndicatorSeries::new(rolling_mean(&defined, window)))
}

/// Exponential Moving Average
///
/// Unadjusted-seed convention: the first value seeds the recursion directly
/// (no SMA warmup, no delay), then `ema[i] = a*x[i] + (1-a)*ema[i-1]` with
/// `a = 2/(span+1)`.
pub fn ema(data: &[f64], span: usize) -> Result<IndicatorSeries, SignalError> {
    if span == 0 {
        return Err(SignalError::InvalidParameter(
            "EMA span must be at least 1".to_string(),
        ));
    }
    let defined: Vec<Option<f64>> = data.iter().map(|&v| Some(v)).collect();
    Ok(IndicatorSeries::new(exp_smooth(&defined, span)))
}

/// Trailing mean over a possibly-undefined series. An output value is
/// defined only when the full window behind it is defined.
fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        let sum = slice.iter().try_fold(0.0, |acc, v| v.map(|v| acc + v));
        out.push(sum.map(|s| s / window as f64));
    }
    out
}

/// Exponential smoothing over a possibly-undefined series. The first defined
/// value seeds the recursion; undefined inputs stay undefined and force a
/// re-seed at the next defined value.
fn exp_smooth(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for value in values {
        let next = match (value, prev) {
            (Some(x), Some(p)) => Some(alpha * x + (1.0 - alpha) * p),
            (Some(x), None) => Some(*x),
            (None, _) => None,
        };
        out.push(next);
        prev = next;
    }
    out
}

/// Standard EMA-based MACD: macd line, signal line, histogram, all aligned
/// with the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn standard_macd(data: &[f64], params: &MacdParams) -> Result<MacdSeries, SignalError> {
    let ema_fast = ema(data, params.fast())?;
    let ema_slow = ema(data, params.slow())?;

    let macd = ema_fast.sub(&ema_slow);
    let signal = IndicatorSeries::new(exp_smooth(macd.values(), params.signal()));
    let histogram = macd.sub(&signal);

    Ok(MacdSeries {
        macd,
        signal,
        histogram,
    })
}

/// Custom SMA-based MACD family: moving averages at three window lengths,
/// the three pairwise macd lines, and an SMA signal line for each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomMacdSeries {
    pub ma_fast: IndicatorSeries,
    pub ma_slow: IndicatorSeries,
    pub ma_long: IndicatorSeries,
    pub macd_fast_slow: IndicatorSeries,
    pub macd_slow_long: IndicatorSeries,
    pub macd_fast_long: IndicatorSeries,
    pub signal_fast_slow: IndicatorSeries,
    pub signal_slow_long: IndicatorSeries,
    pub signal_fast_long: IndicatorSeries,
}

pub fn custom_macd(data: &[f64], params: &MacdParams) -> Result<CustomMacdSeries, SignalError> {
    let long = params.long().ok_or_else(|| {
        SignalError::InvalidParameter("custom MACD needs a long window".to_string())
    })?;

    let ma_fast = sma(data, params.fast())?;
    let ma_slow = sma(data, params.slow())?;
    let ma_long = sma(data, long)?;

    let macd_fast_slow = ma_fast.sub(&ma_slow);
    let macd_slow_long = ma_slow.sub(&ma_long);
    let macd_fast_long = ma_fast.sub(&ma_long);

    let signal_fast_slow =
        IndicatorSeries::new(rolling_mean(macd_fast_slow.values(), params.signal()));
    let signal_slow_long =
        IndicatorSeries::new(rolling_mean(macd_slow_long.values(), params.signal()));
    let signal_fast_long =
        IndicatorSeries::new(rolling_mean(macd_fast_long.values(), params.signal()));

    Ok(CustomMacdSeries {
        ma_fast,
        ma_slow,
        ma_long,
        macd_fast_slow,
        macd_slow_long,
        macd_fast_long,
        signal_fast_slow,
        signal_slow_long,
        signal_fast_long,
    })
}

/// Absolute and percentage change from `lookback` periods ago to the latest
/// close.
///
/// When the series is too short, the earliest close is used as the reference
/// and the result is flagged via `short_window_used` — the caller decides
/// whether a shortened effective window is acceptable.
pub fn period_change(closes: &[f64], lookback: usize) -> Result<PeriodChange, SignalError> {
    if lookback == 0 {
        return Err(SignalError::InvalidParameter(
            "lookback must be at least 1 period".to_string(),
        ));
    }
    let current = *closes.last().ok_or_else(|| {
        SignalError::InsufficientData("period change over an empty series".to_string())
    })?;

    let short_window_used = closes.len() < lookback + 1;
    let reference = if short_window_used {
        closes[0]
    } else {
        closes[closes.len() - 1 - lookback]
    };

    if reference == 0.0 {
        return Err(SignalError::DivisionByZero(format!(
            "reference close {lookback} periods ago is zero"
        )));
    }

    let absolute_change = current - reference;
    Ok(PeriodChange {
        absolute_change,
        percentage_change: absolute_change / reference * 100.0,
        short_window_used,
    })
}
