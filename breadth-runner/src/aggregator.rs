//! Aggregation of per-instrument classifications into a dense breadth table.
//!
//! The table is allocated once for the whole `[from, to]` range. Every
//! positive (negative) date of every instrument increments that day's count
//! by index offset and recomputes the day's percentage from the new count,
//! so counts and percentages always agree and the result does not depend on
//! the order instruments or dates are visited. Dates outside the range are
//! dropped.

use chrono::NaiveDate;

use breadth_core::ColumnNames;

use crate::dispatcher::ResultsMapping;
use crate::error::EngineError;
use crate::table::{BreadthTable, Side};

/// Fail with [`EngineError::InvalidRange`] unless `from <= to`.
pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), EngineError> {
    if from > to {
        return Err(EngineError::InvalidRange { from, to });
    }
    Ok(())
}

/// Build the breadth table for `results` over `[from, to]`.
///
/// Percentages are relative to the number of instruments in `results`,
/// not the number originally requested.
pub fn aggregate(
    results: &ResultsMapping,
    from: NaiveDate,
    to: NaiveDate,
    columns: ColumnNames,
) -> Result<BreadthTable, EngineError> {
    validate_range(from, to)?;

    let mut table = BreadthTable::zeroed(from, to, columns, results.len());
    let mut clipped = 0usize;

    for classification in results.values() {
        for date in classification.positive_dates() {
            if !table.record(date, Side::Positive) {
                clipped += 1;
            }
        }
        for date in classification.negative_dates() {
            if !table.record(date, Side::Negative) {
                clipped += 1;
            }
        }
    }

    tracing::debug!(
        days = table.len(),
        instruments = results.len(),
        clipped,
        "aggregated breadth"
    );

    Ok(table)
}
