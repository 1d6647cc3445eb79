//! Rolling extremum classifier ("hilo") — new N-day closing highs and lows.
//!
//! For each bar, the *high duration* is the number of consecutive bars,
//! ending at and including this one, over which this close is the highest
//! close. A bar is positive when its high duration is at least `lookback`.
//! Negative is the mirror image on the lowest close. Equal closes do not
//! break a streak.
//!
//! Durations come from a monotonic stack of "previous strictly greater"
//! (resp. smaller) closes, so the whole series is processed in linear time
//! and each value only looks backwards.

use crate::domain::InstrumentSeries;
use crate::indicator::{BreadthIndicator, Classification, IndicatorError, Signal};

/// Which extremum a duration series tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Highest,
    Lowest,
}

/// Number of bars (including `i`) for which `closes[i]` has been the
/// highest (or lowest) close.
pub fn extremum_durations(closes: &[f64], extremum: Extremum) -> Vec<usize> {
    let mut result = Vec::with_capacity(closes.len());
    // Indices whose closes are strictly monotonic from bottom to top.
    let mut stack: Vec<usize> = Vec::new();

    for (i, &close) in closes.iter().enumerate() {
        while let Some(&top) = stack.last() {
            let keeps_streak = match extremum {
                Extremum::Highest => closes[top] <= close,
                Extremum::Lowest => closes[top] >= close,
            };
            if !keeps_streak {
                break;
            }
            stack.pop();
        }

        let duration = match stack.last() {
            Some(&blocker) => i - blocker,
            None => i + 1,
        };
        result.push(duration);
        stack.push(i);
    }

    result
}

/// New-high / new-low breadth indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingExtremum;

impl RollingExtremum {
    pub const NAME: &'static str = "hilo";

    pub fn new() -> Self {
        Self
    }
}

impl BreadthIndicator for RollingExtremum {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn classify(
        &self,
        series: &InstrumentSeries,
        lookback: usize,
    ) -> Result<Classification, IndicatorError> {
        if lookback == 0 {
            return Err(IndicatorError::InvalidLookback(lookback));
        }
        if let Some(bar) = series.bars().iter().find(|b| b.close.is_nan()) {
            return Err(IndicatorError::VoidClose { date: bar.date });
        }

        let closes: Vec<f64> = series.closes().collect();
        let highs = extremum_durations(&closes, Extremum::Highest);
        let lows = extremum_durations(&closes, Extremum::Lowest);

        let classification = series
            .bars()
            .iter()
            .zip(highs.iter().zip(lows.iter()))
            .map(|(bar, (&high, &low))| {
                let signal = match (high >= lookback, low >= lookback) {
                    (true, false) => Signal::Positive,
                    (false, true) => Signal::Negative,
                    // Flat window: both or neither.
                    _ => Signal::Neutral,
                };
                (bar.date, signal)
            })
            .collect();

        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    #[test]
    fn high_durations_basic() {
        let d = extremum_durations(&[10.0, 11.0, 12.0, 11.0, 13.0], Extremum::Highest);
        assert_eq!(d, vec![1, 2, 3, 1, 5]);
    }

    #[test]
    fn low_durations_basic() {
        let d = extremum_durations(&[10.0, 11.0, 12.0, 11.0, 13.0], Extremum::Lowest);
        // index 3: previous strictly smaller close is index 0 (10.0)
        assert_eq!(d, vec![1, 1, 1, 3, 1]);
    }

    #[test]
    fn ties_extend_streak() {
        let d = extremum_durations(&[5.0, 5.0, 5.0], Extremum::Highest);
        assert_eq!(d, vec![1, 2, 3]);
    }

    #[test]
    fn classify_lookback_3() {
        let series = make_series("TEST", &[10.0, 11.0, 12.0, 11.0, 13.0]);
        let c = RollingExtremum.classify(&series, 3).unwrap();
        let dates: Vec<_> = series.bars().iter().map(|b| b.date).collect();

        assert_eq!(c.get(dates[0]), Some(Signal::Neutral));
        assert_eq!(c.get(dates[1]), Some(Signal::Neutral));
        assert_eq!(c.get(dates[2]), Some(Signal::Positive));
        assert_eq!(c.get(dates[3]), Some(Signal::Negative));
        assert_eq!(c.get(dates[4]), Some(Signal::Positive));
    }

    #[test]
    fn flat_series_is_neutral() {
        let series = make_series("FLAT", &[7.0, 7.0, 7.0, 7.0]);
        let c = RollingExtremum.classify(&series, 2).unwrap();
        assert_eq!(c.count(Signal::Neutral), 4);
    }

    #[test]
    fn short_history_never_qualifies() {
        let series = make_series("NEW", &[1.0, 2.0, 3.0]);
        let c = RollingExtremum.classify(&series, 4).unwrap();
        assert_eq!(c.positive_dates().count(), 0);
        assert_eq!(c.negative_dates().count(), 0);
    }

    #[test]
    fn nan_close_fails() {
        let mut closes = vec![1.0, 2.0, 3.0];
        closes[1] = f64::NAN;
        let series = make_series("BAD", &closes);
        let err = RollingExtremum.classify(&series, 2).unwrap_err();
        assert!(matches!(err, IndicatorError::VoidClose { .. }));
    }

    #[test]
    fn zero_lookback_rejected() {
        let series = make_series("X", &[1.0]);
        assert_eq!(
            RollingExtremum.classify(&series, 0).unwrap_err(),
            IndicatorError::InvalidLookback(0)
        );
    }
}
