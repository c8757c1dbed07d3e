use std::collections::BTreeMap;

use signal_core::{InstrumentSnapshot, MarketSummary, SignalError};

/// Universe-wide statistics: counts per membership tag, gainer/loser counts,
/// mean changes, and weekly extrema.
///
/// Zero-change instruments are counted as neither gainers nor losers.
/// Extrema ties break toward the first occurrence in input order. An empty
/// universe is an error, not a NaN-valued summary.
pub fn summarize(universe: &[InstrumentSnapshot]) -> Result<MarketSummary, SignalError> {
    if universe.is_empty() {
        return Err(SignalError::EmptyUniverse);
    }

    let mut index_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut weekly_gainers = 0;
    let mut weekly_losers = 0;
    let mut monthly_gainers = 0;
    let mut monthly_losers = 0;
    let mut weekly_sum = 0.0;
    let mut monthly_sum = 0.0;
    let mut top_gainer = &universe[0];
    let mut top_loser = &universe[0];

    for snapshot in universe {
        *index_counts.entry(snapshot.index.clone()).or_insert(0) += 1;

        if snapshot.weekly_percentage_change > 0.0 {
            weekly_gainers += 1;
        } else if snapshot.weekly_percentage_change < 0.0 {
            weekly_losers += 1;
        }
        if snapshot.monthly_percentage_change > 0.0 {
            monthly_gainers += 1;
        } else if snapshot.monthly_percentage_change < 0.0 {
            monthly_losers += 1;
        }

        weekly_sum += snapshot.weekly_percentage_change;
        monthly_sum += snapshot.monthly_percentage_change;

        // Strict comparisons keep the earliest instrument on ties.
        if snapshot.weekly_percentage_change > top_gainer.weekly_percentage_change {
            top_gainer = snapshot;
        }
        if snapshot.weekly_percentage_change < top_loser.weekly_percentage_change {
            top_loser = snapshot;
        }
    }

    let count = universe.len() as f64;
    Ok(MarketSummary {
        total_instruments: universe.len(),
        index_counts,
        weekly_gainers,
        weekly_losers,
        monthly_gainers,
        monthly_losers,
        avg_weekly_change: weekly_sum / count,
        avg_monthly_change: monthly_sum / count,
        top_weekly_gainer: top_gainer.ticker.clone(),
        top_weekly_loser: top_loser.ticker.clone(),
    })
}
