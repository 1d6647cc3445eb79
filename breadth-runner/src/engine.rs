//! Breadth engine — the single entry point: dispatch, then aggregate.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::Dispatch;

use breadth_core::{BreadthIndicator, ColumnNames, InstrumentSeries};

use crate::aggregator::{aggregate, validate_range};
use crate::dispatcher::{Dispatcher, InstrumentFailure, DEFAULT_WORKERS};
use crate::error::EngineError;
use crate::logging::scoped;
use crate::table::BreadthTable;

/// Output of one engine run.
#[derive(Debug, Clone)]
pub struct BreadthReport {
    pub table: BreadthTable,
    /// Instruments excluded from `table`, sorted by identifier.
    pub failures: Vec<InstrumentFailure>,
    /// Number of instruments passed in.
    pub requested: usize,
}

/// Runs a breadth indicator over a universe of instruments.
#[derive(Debug, Clone)]
pub struct BreadthEngine {
    workers: usize,
    log: Option<Dispatch>,
}

impl Default for BreadthEngine {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            log: None,
        }
    }
}

impl BreadthEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Route the engine's log events to a caller-owned dispatch.
    pub fn with_log(mut self, log: Dispatch) -> Self {
        self.log = Some(log);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Compute the breadth table for `series` over `[from, to]`.
    pub fn breadth(
        &self,
        series: &[InstrumentSeries],
        lookback: usize,
        from: NaiveDate,
        to: NaiveDate,
        indicator: &dyn BreadthIndicator,
    ) -> Result<BreadthTable, EngineError> {
        self.run(series, lookback, from, to, indicator)
            .map(|report| report.table)
    }

    /// Like [`breadth`](Self::breadth) but also returns the failed instruments.
    ///
    /// The range and lookback are checked before any instrument is touched.
    pub fn run(
        &self,
        series: &[InstrumentSeries],
        lookback: usize,
        from: NaiveDate,
        to: NaiveDate,
        indicator: &dyn BreadthIndicator,
    ) -> Result<BreadthReport, EngineError> {
        scoped(self.log.as_ref(), || {
            validate_range(from, to)?;
            if lookback == 0 {
                return Err(EngineError::InvalidLookback(lookback));
            }

            let mut dispatcher = Dispatcher::new(self.workers);
            if let Some(log) = &self.log {
                dispatcher = dispatcher.with_log(log.clone());
            }
            let outcome = dispatcher.run(series, lookback, indicator)?;

            tracing::info!(
                succeeded = outcome.results.len(),
                failed = outcome.failures.len(),
                "processing results"
            );
            let started = Instant::now();
            let columns = ColumnNames::new(lookback, indicator.name());
            let table = aggregate(&outcome.results, from, to, columns)?;
            tracing::info!(
                days = table.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "breadth done"
            );

            Ok(BreadthReport {
                table,
                failures: outcome.failures,
                requested: series.len(),
            })
        })
    }
}
