//! Errors that abort a whole breadth run.
//!
//! Per-instrument problems never show up here; the dispatcher records them
//! as [`InstrumentFailure`](crate::dispatcher::InstrumentFailure)s instead.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid range: from {from} is after to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("lookback must be >= 1, got {0}")]
    InvalidLookback(usize),

    #[error("worker budget must be >= 1, got {0}")]
    InvalidWorkers(usize),

    #[error("duplicate instrument identifier '{0}'")]
    DuplicateInstrument(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
