use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use signal_core::{
    InstrumentSnapshot, MacdParams, MarketSummary, PriceSeries, RecommendationRecord, SignalError,
};
use trend_indicators::{classify, custom_macd, period_change, standard_macd};

use crate::ranker::{rank_buys, rank_sells, RankerThresholds};
use crate::summary::summarize;

/// Everything the evaluation needs, passed explicitly — the engine reads no
/// ambient configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Trailing trading days for the weekly change.
    pub weekly_lookback: usize,
    /// Trailing trading days for the monthly change.
    pub monthly_lookback: usize,
    pub standard_macd: MacdParams,
    pub custom_macd: MacdParams,
    pub thresholds: RankerThresholds,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            weekly_lookback: 5,
            monthly_lookback: 21,
            standard_macd: MacdParams::standard(),
            custom_macd: MacdParams::custom_default(),
            thresholds: RankerThresholds::default(),
        }
    }
}

/// One instrument under evaluation: its price history plus the membership
/// tag of the universe it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseMember {
    pub tag: String,
    pub series: PriceSeries,
}

impl UniverseMember {
    pub fn new(tag: impl Into<String>, series: PriceSeries) -> Self {
        Self {
            tag: tag.into(),
            series,
        }
    }
}

/// Cross-sectional snapshot for a single instrument: trailing changes,
/// latest MACD state, and the trend classification.
pub fn snapshot(
    series: &PriceSeries,
    tag: &str,
    config: &ScreenerConfig,
) -> Result<InstrumentSnapshot, SignalError> {
    let closes = series.closes();
    let current_price = *closes.last().ok_or_else(|| {
        SignalError::InsufficientData(format!("{}: empty price series", series.symbol()))
    })?;

    let weekly = period_change(&closes, config.weekly_lookback)?;
    let monthly = period_change(&closes, config.monthly_lookback)?;

    let standard = standard_macd(&closes, &config.standard_macd)?;
    let custom = custom_macd(&closes, &config.custom_macd)?;
    let trend = classify(&standard, &custom);

    Ok(InstrumentSnapshot {
        ticker: series.symbol().to_string(),
        index: tag.to_string(),
        current_price,
        weekly_price_change: weekly.absolute_change,
        weekly_percentage_change: weekly.percentage_change,
        monthly_price_change: monthly.absolute_change,
        monthly_percentage_change: monthly.percentage_change,
        last_macd: standard.macd.last(),
        last_signal: standard.signal.last(),
        trend,
    })
}

/// Evaluate every instrument in the universe.
///
/// Instruments are independent, so the fan-out runs in parallel; an
/// instrument that fails is logged and skipped rather than failing the run.
/// The result is sorted by ticker, so parallel and sequential execution
/// produce identical output.
pub fn evaluate_universe(
    members: &[UniverseMember],
    config: &ScreenerConfig,
) -> Vec<InstrumentSnapshot> {
    tracing::info!("Evaluating universe of {} instruments", members.len());

    let mut snapshots: Vec<InstrumentSnapshot> = members
        .par_iter()
        .filter_map(|member| match snapshot(&member.series, &member.tag, config) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", member.series.symbol(), e);
                None
            }
        })
        .collect();

    snapshots.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    tracing::info!(
        "Universe evaluation complete: {}/{} instruments",
        snapshots.len(),
        members.len()
    );
    snapshots
}

/// The full evaluation product handed to the (external) presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketReport {
    pub generated_at: DateTime<Utc>,
    pub summary: MarketSummary,
    pub buys: Vec<RecommendationRecord>,
    pub sells: Vec<RecommendationRecord>,
}

/// Assemble summary statistics and the two ranked recommendation lists from
/// an already-evaluated universe.
pub fn build_report(
    universe: &[InstrumentSnapshot],
    thresholds: &RankerThresholds,
    n_recommendations: usize,
) -> Result<MarketReport, SignalError> {
    let summary = summarize(universe)?;
    let buys = rank_buys(universe, thresholds, n_recommendations);
    let sells = rank_sells(universe, thresholds, n_recommendations);

    Ok(MarketReport {
        generated_at: Utc::now(),
        summary,
        buys,
        sells,
    })
}
