//! Breadth Runner — concurrent dispatch and dense aggregation of breadth
//! indicators across a universe of instruments.
//!
//! This crate builds on `breadth-core` to provide:
//! - A bounded worker-pool dispatcher with per-instrument failure isolation
//! - The dense calendar-day aggregator and `BreadthTable`
//! - The `BreadthEngine` facade (dispatch → aggregate)
//! - TOML run configuration, CSV loading, and table export

pub mod aggregator;
pub mod config;
pub mod data_loader;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod export;
mod logging;
pub mod table;

pub use aggregator::{aggregate, validate_range};
pub use config::{parse_date, BreadthConfig, ConfigError, IndicatorKind};
pub use data_loader::{discover_symbols, load_series, load_universe, LoadError};
pub use dispatcher::{
    ComputeFailure, DispatchOutcome, Dispatcher, InstrumentFailure, ResultsMapping,
    DEFAULT_WORKERS,
};
pub use engine::{BreadthEngine, BreadthReport};
pub use error::EngineError;
pub use export::{export_csv, export_json, save_csv};
pub use table::{percentage, BreadthRow, BreadthTable, Side};
