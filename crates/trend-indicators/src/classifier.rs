use signal_core::TrendSignal;

use crate::indicators::{CustomMacdSeries, MacdSeries};

/// Classify an instrument from the latest standard and custom MACD values.
///
/// Rules, first match wins:
/// 1. Bullish: standard macd above its signal, custom fast-slow macd above
///    its own signal, and standard macd positive.
/// 2. Bearish: the symmetric opposite of all three.
/// 3. Neutral otherwise, including whenever any contributing value is still
///    undefined.
///
/// Each comparison pairs a macd line with its own signal line; the standard
/// and custom conditions are evaluated independently.
pub fn classify(standard: &MacdSeries, custom: &CustomMacdSeries) -> TrendSignal {
    let (Some(macd), Some(signal), Some(custom_macd), Some(custom_signal)) = (
        standard.macd.last(),
        standard.signal.last(),
        custom.macd_fast_slow.last(),
        custom.signal_fast_slow.last(),
    ) else {
        return TrendSignal::Neutral;
    };

    if macd > signal && custom_macd > custom_signal && macd > 0.0 {
        TrendSignal::Bullish
    } else if macd < signal && custom_macd < custom_signal && macd < 0.0 {
        TrendSignal::Bearish
    } else {
        TrendSignal::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::IndicatorSeries;

    fn one(value: Option<f64>) -> IndicatorSeries {
        IndicatorSeries::new(vec![value])
    }

    fn standard(macd: Option<f64>, signal: Option<f64>) -> MacdSeries {
        let macd = one(macd);
        let signal = one(signal);
        let histogram = macd.sub(&signal);
        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }

    fn custom(macd: Option<f64>, signal: Option<f64>) -> CustomMacdSeries {
        CustomMacdSeries {
            ma_fast: one(None),
            ma_slow: one(None),
            ma_long: one(None),
            macd_fast_slow: one(macd),
            macd_slow_long: one(None),
            macd_fast_long: one(None),
            signal_fast_slow: one(signal),
            signal_slow_long: one(None),
            signal_fast_long: one(None),
        }
    }

    #[test]
    fn test_bullish_when_both_families_agree() {
        let signal = classify(
            &standard(Some(2.0), Some(1.0)),
            &custom(Some(0.5), Some(0.2)),
        );
        assert_eq!(signal, TrendSignal::Bullish);
    }

    #[test]
    fn test_bearish_when_both_families_agree() {
        let signal = classify(
            &standard(Some(-2.0), Some(-1.0)),
            &custom(Some(-0.5), Some(-0.2)),
        );
        assert_eq!(signal, TrendSignal::Bearish);
    }

    // Standard says bearish but the custom macd sits above its own signal
    // line. A classifier that compared the custom macd against itself would
    // report Bearish here; the correct answer is Neutral.
    #[test]
    fn test_neutral_when_families_disagree() {
        let signal = classify(
            &standard(Some(-2.0), Some(-1.0)),
            &custom(Some(0.5), Some(0.2)),
        );
        assert_eq!(signal, TrendSignal::Neutral);
    }

    #[test]
    fn test_neutral_when_families_disagree_bullish_side() {
        let signal = classify(
            &standard(Some(2.0), Some(1.0)),
            &custom(Some(-0.5), Some(-0.2)),
        );
        assert_eq!(signal, TrendSignal::Neutral);
    }

    #[test]
    fn test_positive_macd_required_for_bullish() {
        // Above the signal line but still negative: not a bullish call.
        let signal = classify(
            &standard(Some(-0.5), Some(-1.0)),
            &custom(Some(0.5), Some(0.2)),
        );
        assert_eq!(signal, TrendSignal::Neutral);
    }

    #[test]
    fn test_neutral_when_any_input_undefined() {
        let signal = classify(&standard(Some(2.0), Some(1.0)), &custom(Some(0.5), None));
        assert_eq!(signal, TrendSignal::Neutral);

        let signal = classify(&standard(None, None), &custom(Some(0.5), Some(0.2)));
        assert_eq!(signal, TrendSignal::Neutral);
    }
}
