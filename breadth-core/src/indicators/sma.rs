//! Simple Moving Average (SMA) provider.
//!
//! Rolling mean of close prices over a window. The first valid value is at
//! index `period - 1`; earlier values are NaN. [`with_moving_average`]
//! attaches the result to a series under [`ma_column_name`], which is the
//! column the "dma" classifier reads.

use crate::domain::{InstrumentSeries, SeriesError};
use crate::naming::ma_column_name;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let mut sum: f64 = closes[..self.period].iter().sum();
        result[self.period - 1] = sum / self.period as f64;

        for i in self.period..n {
            let leaving = closes[i - self.period];
            let entering = closes[i];

            if leaving.is_nan() || entering.is_nan() || sum.is_nan() {
                // NaN poisons a running sum; rebuild from the window.
                sum = closes[(i + 1 - self.period)..=i].iter().sum();
            } else {
                sum = sum - leaving + entering;
            }
            result[i] = sum / self.period as f64;
        }

        result
    }
}

/// Return `series` with an `MA_{period}` column of closing-price SMA values.
pub fn with_moving_average(
    series: InstrumentSeries,
    period: usize,
) -> Result<InstrumentSeries, SeriesError> {
    let closes: Vec<f64> = series.closes().collect();
    let values = Sma::new(period).compute(&closes);
    series.with_column(ma_column_name(period), values)
}
