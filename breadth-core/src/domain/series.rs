//! InstrumentSeries — one instrument's ordered bar history plus any
//! precomputed columns attached by upstream collaborators.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use super::Bar;

/// Errors raised while building an [`InstrumentSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("instrument identifier must not be empty")]
    EmptyIdentifier,

    #[error("duplicate bar date {date} in series '{id}'")]
    DuplicateDate { id: String, date: NaiveDate },

    #[error("column '{column}' has {actual} values but series '{id}' has {expected} bars")]
    ColumnLength {
        id: String,
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Date-ordered OHLCV bars for a single instrument.
///
/// Bars are sorted ascending by date and dates are unique. Extra numeric
/// columns (e.g. a moving average) are aligned index-for-index with `bars`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSeries {
    id: String,
    bars: Vec<Bar>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl InstrumentSeries {
    /// Build a series, sorting bars by date.
    pub fn new(id: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SeriesError::EmptyIdentifier);
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SeriesError::DuplicateDate {
                id,
                date: pair[0].date,
            });
        }

        Ok(Self {
            id,
            bars,
            columns: BTreeMap::new(),
        })
    }

    /// Attach (or replace) a named column. Must have one value per bar.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(SeriesError::ColumnLength {
                id: self.id,
                column: name,
                expected: self.bars.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get a precomputed column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Names of all attached columns, sorted.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Close prices in date order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}
