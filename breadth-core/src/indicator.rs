//! Breadth indicator trait and the per-date classification it produces.
//!
//! An indicator looks at one instrument's history and tags each date as
//! positive, negative, or neutral. The tag is a single enum value per date,
//! so a date can never be both a positive and a negative event.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::InstrumentSeries;

/// Outcome of an indicator for one instrument on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Positive,
    Negative,
    Neutral,
}

/// Errors an indicator may raise for a single instrument.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("missing precomputed column '{column}'")]
    MissingColumn { column: String },

    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("void close on {date}")]
    VoidClose { date: NaiveDate },

    #[error("lookback must be >= 1, got {0}")]
    InvalidLookback(usize),

    #[error("{0}")]
    Failed(String),
}

/// Per-date classification for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    signals: BTreeMap<NaiveDate, Signal>,
}

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a date. A later tag for the same date replaces the earlier one.
    pub fn insert(&mut self, date: NaiveDate, signal: Signal) {
        self.signals.insert(date, signal);
    }

    pub fn get(&self, date: NaiveDate) -> Option<Signal> {
        self.signals.get(&date).copied()
    }

    /// Dates tagged [`Signal::Positive`], ascending.
    pub fn positive_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates_with(Signal::Positive)
    }

    /// Dates tagged [`Signal::Negative`], ascending.
    pub fn negative_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates_with(Signal::Negative)
    }

    fn dates_with(&self, wanted: Signal) -> impl Iterator<Item = NaiveDate> + '_ {
        self.signals
            .iter()
            .filter(move |(_, s)| **s == wanted)
            .map(|(d, _)| *d)
    }

    pub fn count(&self, signal: Signal) -> usize {
        self.signals.values().filter(|s| **s == signal).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Signal)> + '_ {
        self.signals.iter().map(|(d, s)| (*d, *s))
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl FromIterator<(NaiveDate, Signal)> for Classification {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Signal)>>(iter: I) -> Self {
        Self {
            signals: iter.into_iter().collect(),
        }
    }
}

/// Trait for breadth indicators.
///
/// Implementations classify every date of one instrument's series using only
/// information available up to that date. They run on worker threads, one
/// instrument per call, so they must be `Send + Sync`.
pub trait BreadthIndicator: Send + Sync {
    /// Short stable name (e.g. "hilo", "dma"). Used in output column names.
    fn name(&self) -> &str;

    /// Classify each date of `series` for the given lookback.
    fn classify(
        &self,
        series: &InstrumentSeries,
        lookback: usize,
    ) -> Result<Classification, IndicatorError>;
}

/// Adapter that turns a named closure into a [`BreadthIndicator`].
pub struct FnIndicator<F> {
    name: String,
    f: F,
}

impl<F> FnIndicator<F>
where
    F: Fn(&InstrumentSeries, usize) -> Result<Classification, IndicatorError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> BreadthIndicator for FnIndicator<F>
where
    F: Fn(&InstrumentSeries, usize) -> Result<Classification, IndicatorError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(
        &self,
        series: &InstrumentSeries,
        lookback: usize,
    ) -> Result<Classification, IndicatorError> {
        (self.f)(series, lookback)
    }
}
