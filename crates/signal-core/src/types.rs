use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SignalError;

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Time-ordered price history for one instrument.
///
/// Timestamps must be strictly increasing; gaps are fine (the indicator
/// engines make no frequency assumption). The series is never mutated after
/// construction — every derived computation produces new series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SignalError> {
        let symbol = symbol.into();
        for pair in bars.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(SignalError::InvalidParameter(format!(
                    "{}: bar timestamps must be strictly increasing ({} followed by {})",
                    symbol, pair[0].timestamp, pair[1].timestamp
                )));
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Derived numeric series aligned index-for-index with its input.
///
/// `None` marks indices where the value is undefined (insufficient window).
/// Undefined is explicit and propagates through arithmetic — it is never
/// coerced to zero or backfilled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value at the final index, `None` if the series is empty or the last
    /// entry is undefined.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Pairwise difference. Undefined wherever either input is undefined.
    pub fn sub(&self, other: &IndicatorSeries) -> IndicatorSeries {
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            })
            .collect();
        IndicatorSeries::new(values)
    }
}

/// MACD window configuration.
///
/// `long` is only meaningful for the custom (SMA-based) MACD family; the
/// standard 12/26/9 set leaves it unset. Mis-ordered windows are rejected at
/// construction, never silently reordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    fast: usize,
    slow: usize,
    long: Option<usize>,
    signal: usize,
}

impl MacdParams {
    pub fn new(
        fast: usize,
        slow: usize,
        long: Option<usize>,
        signal: usize,
    ) -> Result<Self, SignalError> {
        if fast == 0 || slow == 0 || signal == 0 || long == Some(0) {
            return Err(SignalError::InvalidParameter(
                "MACD windows must be at least 1".to_string(),
            ));
        }
        if fast >= slow {
            return Err(SignalError::InvalidParameter(format!(
                "fast window ({fast}) must be shorter than slow window ({slow})"
            )));
        }
        if let Some(long) = long {
            if slow >= long {
                return Err(SignalError::InvalidParameter(format!(
                    "slow window ({slow}) must be shorter than long window ({long})"
                )));
            }
        }
        Ok(Self {
            fast,
            slow,
            long,
            signal,
        })
    }

    /// Standard EMA-based MACD windows: 12/26 with a 9-period signal.
    pub fn standard() -> Self {
        Self {
            fast: 12,
            slow: 26,
            long: None,
            signal: 9,
        }
    }

    /// Default custom SMA-based windows: 10/30/60 with a 9-period signal.
    pub fn custom_default() -> Self {
        Self {
            fast: 10,
            slow: 30,
            long: Some(60),
            signal: 9,
        }
    }

    pub fn fast(&self) -> usize {
        self.fast
    }

    pub fn slow(&self) -> usize {
        self.slow
    }

    pub fn long(&self) -> Option<usize> {
        self.long
    }

    pub fn signal(&self) -> usize {
        self.signal
    }
}

/// Price change over a trailing window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodChange {
    pub absolute_change: f64,
    pub percentage_change: f64,
    /// True when the series was shorter than the requested lookback and the
    /// earliest close was used as the reference instead.
    pub short_window_used: bool,
}

/// Discrete trend signal for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl TrendSignal {
    pub fn as_label(&self) -> &'static str {
        match self {
            TrendSignal::Bullish => "Bullish",
            TrendSignal::Bearish => "Bearish",
            TrendSignal::Neutral => "Neutral",
        }
    }
}

/// Cross-sectional view of one instrument at evaluation time — the unit the
/// ranker and summary aggregator operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    pub ticker: String,
    /// Universe membership tag, e.g. "S&P 500" or "NASDAQ 100".
    pub index: String,
    pub current_price: f64,
    pub weekly_price_change: f64,
    pub weekly_percentage_change: f64,
    pub monthly_price_change: f64,
    pub monthly_percentage_change: f64,
    pub last_macd: Option<f64>,
    pub last_signal: Option<f64>,
    pub trend: TrendSignal,
}

/// One entry in a ranked buy or sell list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub ticker: String,
    pub index: String,
    pub current_price: f64,
    pub weekly_price_change: f64,
    pub weekly_percentage_change: f64,
    pub monthly_price_change: f64,
    pub monthly_percentage_change: f64,
    pub reason: String,
}

/// Universe-wide statistics consumed by reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub total_instruments: usize,
    /// Instrument count per membership tag.
    pub index_counts: BTreeMap<String, usize>,
    pub weekly_gainers: usize,
    pub weekly_losers: usize,
    pub monthly_gainers: usize,
    pub monthly_losers: usize,
    pub avg_weekly_change: f64,
    pub avg_monthly_change: f64,
    pub top_weekly_gainer: String,
    pub top_weekly_loser: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: i64, close: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(day),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000_000.0,
        }
    }

    #[test]
    fn test_price_series_accepts_ordered_bars() {
        let series = PriceSeries::new("AAPL", vec![bar(0, 100.0), bar(1, 101.0), bar(3, 99.0)]);
        assert!(series.is_ok());
        assert_eq!(series.unwrap().closes(), vec![100.0, 101.0, 99.0]);
    }

    #[test]
    fn test_price_series_rejects_out_of_order_bars() {
        let result = PriceSeries::new("AAPL", vec![bar(1, 100.0), bar(0, 101.0)]);
        assert!(matches!(result, Err(SignalError::InvalidParameter(_))));
    }

    #[test]
    fn test_price_series_rejects_duplicate_timestamps() {
        let result = PriceSeries::new("AAPL", vec![bar(1, 100.0), bar(1, 101.0)]);
        assert!(matches!(result, Err(SignalError::InvalidParameter(_))));
    }

    #[test]
    fn test_macd_params_rejects_misordered_windows() {
        assert!(MacdParams::new(26, 12, None, 9).is_err());
        assert!(MacdParams::new(12, 12, None, 9).is_err());
        assert!(MacdParams::new(10, 30, Some(30), 9).is_err());
        assert!(MacdParams::new(10, 30, Some(20), 9).is_err());
    }

    #[test]
    fn test_macd_params_rejects_zero_windows() {
        assert!(MacdParams::new(0, 26, None, 9).is_err());
        assert!(MacdParams::new(12, 26, None, 0).is_err());
        assert!(MacdParams::new(12, 26, Some(0), 9).is_err());
    }

    #[test]
    fn test_macd_params_accepts_valid_windows() {
        assert!(MacdParams::new(12, 26, None, 9).is_ok());
        assert!(MacdParams::new(10, 30, Some(60), 9).is_ok());
    }

    #[test]
    fn test_indicator_series_sub_propagates_undefined() {
        let a = IndicatorSeries::new(vec![None, Some(3.0), Some(5.0)]);
        let b = IndicatorSeries::new(vec![Some(1.0), None, Some(2.0)]);
        let diff = a.sub(&b);
        assert_eq!(diff.values(), &[None, None, Some(3.0)]);
    }

    #[test]
    fn test_trend_signal_labels() {
        assert_eq!(TrendSignal::Bullish.as_label(), "Bullish");
        assert_eq!(TrendSignal::Bearish.as_label(), "Bearish");
        assert_eq!(TrendSignal::Neutral.as_label(), "Neutral");
    }

    #[test]
    fn test_indicator_series_last() {
        assert_eq!(IndicatorSeries::new(vec![]).last(), None);
        assert_eq!(IndicatorSeries::new(vec![Some(1.0), None]).last(), None);
        assert_eq!(IndicatorSeries::new(vec![None, Some(2.0)]).last(), Some(2.0));
    }
}
