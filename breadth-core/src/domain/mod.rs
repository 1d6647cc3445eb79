//! Domain types for the breadth engine

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{InstrumentSeries, SeriesError};

/// Instrument identifier (ticker).
pub type Symbol = String;
