//! Concurrent per-instrument dispatch.
//!
//! Runs one indicator call per instrument on a private, fixed-size rayon
//! pool and collects the classifications keyed by instrument. A failing or
//! panicking instrument is logged and left out; it never aborts siblings or
//! the batch.

use std::collections::{BTreeMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use tracing::Dispatch;

use breadth_core::{BreadthIndicator, Classification, IndicatorError, InstrumentSeries, Symbol};

use crate::error::EngineError;
use crate::logging::scoped;

/// Default number of instruments evaluated at the same time.
pub const DEFAULT_WORKERS: usize = 10;

/// Instrument → classification, for every instrument that succeeded.
pub type ResultsMapping = BTreeMap<Symbol, Classification>;

/// Why a single instrument was dropped from a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeFailure {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("indicator panicked: {0}")]
    Panicked(String),
}

/// One excluded instrument and the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentFailure {
    pub instrument: Symbol,
    pub cause: ComputeFailure,
}

/// Everything a dispatch produced.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub results: ResultsMapping,
    /// Sorted by instrument.
    pub failures: Vec<InstrumentFailure>,
}

/// Bounded worker pool that evaluates one indicator over many instruments.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    workers: usize,
    log: Option<Dispatch>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            log: None,
        }
    }
}

impl Dispatcher {
    pub fn new(workers: usize) -> Self {
        Self { workers, log: None }
    }

    /// Route this dispatcher's events (including worker threads) to `log`.
    pub fn with_log(mut self, log: Dispatch) -> Self {
        self.log = Some(log);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluate `indicator` for every series and collect the successes.
    ///
    /// Blocks until every instrument has finished or failed. Fails only on
    /// setup problems (bad worker budget, duplicate identifiers, pool
    /// creation); per-instrument failures land in
    /// [`DispatchOutcome::failures`].
    pub fn run(
        &self,
        series: &[InstrumentSeries],
        lookback: usize,
        indicator: &dyn BreadthIndicator,
    ) -> Result<DispatchOutcome, EngineError> {
        scoped(self.log.as_ref(), || self.run_inner(series, lookback, indicator))
    }

    fn run_inner(
        &self,
        series: &[InstrumentSeries],
        lookback: usize,
        indicator: &dyn BreadthIndicator,
    ) -> Result<DispatchOutcome, EngineError> {
        if self.workers == 0 {
            return Err(EngineError::InvalidWorkers(self.workers));
        }

        let mut seen = HashSet::with_capacity(series.len());
        for s in series {
            if !seen.insert(s.id()) {
                return Err(EngineError::DuplicateInstrument(s.id().to_string()));
            }
        }

        tracing::info!(
            instruments = series.len(),
            workers = self.workers,
            indicator = indicator.name(),
            lookback,
            "dispatching breadth indicator"
        );

        // Private pool so the budget holds regardless of the global pool.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("breadth-worker-{i}"))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        let evaluated: Vec<(Symbol, Result<Classification, ComputeFailure>)> = pool.install(|| {
            series
                .par_iter()
                .map(|s| {
                    let outcome =
                        scoped(self.log.as_ref(), || evaluate_one(s, lookback, indicator));
                    (s.id().to_string(), outcome)
                })
                .collect()
        });

        let mut outcome = DispatchOutcome::default();
        for (instrument, result) in evaluated {
            match result {
                Ok(classification) => {
                    outcome.results.insert(instrument, classification);
                }
                Err(cause) => outcome.failures.push(InstrumentFailure { instrument, cause }),
            }
        }
        outcome.failures.sort_by(|a, b| a.instrument.cmp(&b.instrument));

        if outcome.results.is_empty() {
            tracing::warn!(
                requested = series.len(),
                failed = outcome.failures.len(),
                "no instrument produced a result; breadth will be all zeros"
            );
        }

        Ok(outcome)
    }
}

fn evaluate_one(
    series: &InstrumentSeries,
    lookback: usize,
    indicator: &dyn BreadthIndicator,
) -> Result<Classification, ComputeFailure> {
    let started = Instant::now();
    let result = match panic::catch_unwind(AssertUnwindSafe(|| indicator.classify(series, lookback)))
    {
        Ok(Ok(classification)) => Ok(classification),
        Ok(Err(e)) => Err(ComputeFailure::from(e)),
        Err(payload) => Err(ComputeFailure::Panicked(panic_message(payload.as_ref()))),
    };

    match &result {
        Ok(classification) => tracing::debug!(
            instrument = %series.id(),
            bars = series.len(),
            dated = classification.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "instrument done"
        ),
        Err(cause) => tracing::warn!(
            instrument = %series.id(),
            error = %cause,
            "instrument failed; excluded from breadth"
        ),
    }

    result
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
