//! Moving-average side classifier ("dma") — close above or below its MA.
//!
//! Reads the precomputed `MA_{lookback}` column. Close >= MA is positive,
//! close < MA is negative. Warmup bars (NaN MA) and void closes are neutral.

use crate::domain::InstrumentSeries;
use crate::indicator::{BreadthIndicator, Classification, IndicatorError, Signal};
use crate::naming::ma_column_name;

#[derive(Debug, Clone, Copy, Default)]
pub struct MovingAverageSide;

impl MovingAverageSide {
    pub const NAME: &'static str = "dma";

    pub fn new() -> Self {
        Self
    }
}

impl BreadthIndicator for MovingAverageSide {
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

        let column = ma_column_name(lookback);
        let ma = series
            .column(&column)
            .ok_or_else(|| IndicatorError::MissingColumn {
                column: column.clone(),
            })?;
        if ma.len() != series.len() {
            return Err(IndicatorError::ColumnLengthMismatch {
                column,
                expected: series.len(),
                actual: ma.len(),
            });
        }

        let classification = series
            .bars()
            .iter()
            .zip(ma)
            .map(|(bar, &avg)| {
                let signal = if avg.is_nan() || bar.close.is_nan() {
                    Signal::Neutral
                } else if bar.close < avg {
                    Signal::Negative
                } else {
                    Signal::Positive
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
    use crate::indicators::{make_series, with_moving_average};

    #[test]
    fn classifies_against_ma_column() {
        let series = make_series("SPY", &[10.0, 12.0, 11.0, 9.0]);
        let series = with_moving_average(series, 2).unwrap();
        // MA_2: NaN, 11.0, 11.5, 10.0
        let c = MovingAverageSide.classify(&series, 2).unwrap();
        let dates: Vec<_> = series.bars().iter().map(|b| b.date).collect();

        assert_eq!(c.get(dates[0]), Some(Signal::Neutral));
        assert_eq!(c.get(dates[1]), Some(Signal::Positive));
        assert_eq!(c.get(dates[2]), Some(Signal::Negative));
        assert_eq!(c.get(dates[3]), Some(Signal::Negative));
    }

    #[test]
    fn close_equal_to_ma_is_positive() {
        let series = make_series("SPY", &[5.0, 5.0])
            .with_column("MA_3", vec![5.0, 5.0])
            .unwrap();
        let c = MovingAverageSide.classify(&series, 3).unwrap();
        assert_eq!(c.count(Signal::Positive), 2);
    }

    #[test]
    fn missing_column_fails() {
        let series = make_series("SPY", &[1.0, 2.0]);
        let err = MovingAverageSide.classify(&series, 200).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::MissingColumn {
                column: "MA_200".into()
            }
        );
    }

    #[test]
    fn wrong_lookback_column_is_missing() {
        let series = with_moving_average(make_series("SPY", &[1.0, 2.0, 3.0]), 2).unwrap();
        assert!(matches!(
            MovingAverageSide.classify(&series, 3),
            Err(IndicatorError::MissingColumn { .. })
        ));
    }
}
