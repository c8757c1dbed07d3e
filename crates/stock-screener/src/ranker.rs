use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use signal_core::{InstrumentSnapshot, RecommendationRecord};

/// Thresholds for the actionability filters, always passed explicitly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankerThresholds {
    /// Absolute weekly dollar move an instrument must exceed to be
    /// actionable.
    pub weekly_move: f64,
}

impl Default for RankerThresholds {
    fn default() -> Self {
        Self { weekly_move: 10.0 }
    }
}

/// Buy candidates: a weekly drop past the threshold inside a still-positive
/// monthly trend. Sorted most-negative weekly move first (biggest discount),
/// ties keeping input order.
pub fn rank_buys(
    universe: &[InstrumentSnapshot],
    thresholds: &RankerThresholds,
    n: usize,
) -> Vec<RecommendationRecord> {
    let mut picks: Vec<&InstrumentSnapshot> = universe
        .iter()
        .filter(|s| {
            s.weekly_price_change < -thresholds.weekly_move && s.monthly_percentage_change > 0.0
        })
        .collect();

    // Vec::sort_by is stable, so equal keys keep their universe order.
    picks.sort_by(|a, b| {
        a.weekly_price_change
            .partial_cmp(&b.weekly_price_change)
            .unwrap_or(Ordering::Equal)
    });
    picks.truncate(n);

    picks
        .into_iter()
        .map(|s| {
            let reason = format!(
                "Short-term dip (-{:.2}%) in longer-term uptrend (+{:.2}%)",
                s.weekly_percentage_change.abs(),
                s.monthly_percentage_change
            );
            to_record(s, reason)
        })
        .collect()
}

/// Sell candidates: a weekly rise past the threshold inside a still-negative
/// monthly trend. Sorted largest weekly percentage gain first, ties keeping
/// input order.
pub fn rank_sells(
    universe: &[InstrumentSnapshot],
    thresholds: &RankerThresholds,
    n: usize,
) -> Vec<RecommendationRecord> {
    let mut picks: Vec<&InstrumentSnapshot> = universe
        .iter()
        .filter(|s| {
            s.weekly_price_change > thresholds.weekly_move && s.monthly_percentage_change < 0.0
        })
        .collect();

    picks.sort_by(|a, b| {
        b.weekly_percentage_change
            .partial_cmp(&a.weekly_percentage_change)
            .unwrap_or(Ordering::Equal)
    });
    picks.truncate(n);

    picks
        .into_iter()
        .map(|s| {
            let reason = format!(
                "Short-term spike (+{:.2}%) in longer-term downtrend (-{:.2}%)",
                s.weekly_percentage_change,
                s.monthly_percentage_change.abs()
            );
            to_record(s, reason)
        })
        .collect()
}

fn to_record(s: &InstrumentSnapshot, reason: String) -> RecommendationRecord {
    RecommendationRecord {
        ticker: s.ticker.clone(),
        index: s.index.clone(),
        current_price: s.current_price,
        weekly_price_change: s.weekly_price_change,
        weekly_percentage_change: s.weekly_percentage_change,
        monthly_price_change: s.monthly_price_change,
        monthly_percentage_change: s.monthly_percentage_change,
        reason,
    }
}
