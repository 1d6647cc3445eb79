//! Breadth Core — domain types, the classification contract, and the
//! reference breadth indicators.
//!
//! This crate contains:
//! - Domain types (bars, instrument series with precomputed columns)
//! - The `BreadthIndicator` trait and per-date `Classification`
//! - Reference indicators: rolling extremum ("hilo") and MA side ("dma")
//! - The SMA provider that precomputes `MA_{period}` columns
//! - Deterministic output column naming

pub mod domain;
pub mod indicator;
pub mod indicators;
pub mod naming;

pub use domain::{Bar, InstrumentSeries, SeriesError, Symbol};
pub use indicator::{BreadthIndicator, Classification, FnIndicator, IndicatorError, Signal};
pub use naming::{ma_column_name, ColumnNames};
