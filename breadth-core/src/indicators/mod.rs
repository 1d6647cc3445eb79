//! Concrete breadth indicators and the moving-average provider.
//!
//! `RollingExtremum` ("hilo") and `MovingAverageSide` ("dma") implement
//! `BreadthIndicator`. `Sma` is not a classifier: it precomputes the
//! `MA_{period}` column that "dma" consumes.

pub mod dma;
pub mod hilo;
pub mod sma;

pub use dma::MovingAverageSide;
pub use hilo::{extremum_durations, Extremum, RollingExtremum};
pub use sma::{with_moving_average, Sma};

use crate::indicator::BreadthIndicator;

/// Look up a built-in indicator by name.
pub fn builtin(name: &str) -> Option<Box<dyn BreadthIndicator>> {
    match name {
        RollingExtremum::NAME => Some(Box::new(RollingExtremum)),
        MovingAverageSide::NAME => Some(Box::new(MovingAverageSide)),
        _ => None,
    }
}

/// Create a series on consecutive calendar days from close prices.
///
/// open = close, high = close + 1.0, low = close - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_series(id: &str, closes: &[f64]) -> crate::domain::InstrumentSeries {
    use crate::domain::{Bar, InstrumentSeries};
    let base_date = chrono::NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect();
    InstrumentSeries::new(id, bars).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
