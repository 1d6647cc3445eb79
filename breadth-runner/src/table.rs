//! BreadthTable — dense calendar-day table of daily breadth counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use breadth_core::ColumnNames;

/// Which half of the table a count belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Positive,
    Negative,
}

/// One calendar day of breadth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthRow {
    pub date: NaiveDate,
    pub positive: u32,
    pub positive_pct: f64,
    pub negative: u32,
    pub negative_pct: f64,
}

impl BreadthRow {
    fn zero(date: NaiveDate) -> Self {
        Self {
            date,
            positive: 0,
            positive_pct: 0.0,
            negative: 0,
            negative_pct: 0.0,
        }
    }

    pub fn count(&self, side: Side) -> u32 {
        match side {
            Side::Positive => self.positive,
            Side::Negative => self.negative,
        }
    }

    pub fn pct(&self, side: Side) -> f64 {
        match side {
            Side::Positive => self.positive_pct,
            Side::Negative => self.negative_pct,
        }
    }
}

/// `count / total * 100`, or 0.0 for an empty universe.
pub fn percentage(count: u32, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Dense breadth table covering every calendar day in `[from, to]`.
///
/// Row `i` is `from + i days`. Built by the aggregator and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthTable {
    columns: ColumnNames,
    total_instruments: usize,
    rows: Vec<BreadthRow>,
}

impl BreadthTable {
    /// All-zero table over `[from, to]`. Caller guarantees `from <= to`.
    pub(crate) fn zeroed(
        from: NaiveDate,
        to: NaiveDate,
        columns: ColumnNames,
        total_instruments: usize,
    ) -> Self {
        let days = (to - from).num_days() + 1;
        let rows = from
            .iter_days()
            .take(days.max(0) as usize)
            .map(BreadthRow::zero)
            .collect();
        Self {
            columns,
            total_instruments,
            rows,
        }
    }

    /// Count one event on `date` and refresh that side's percentage.
    ///
    /// Returns false (and changes nothing) when `date` is outside the table.
    pub(crate) fn record(&mut self, date: NaiveDate, side: Side) -> bool {
        let Some(idx) = self.index_of(date) else {
            return false;
        };
        let total = self.total_instruments;
        let row = &mut self.rows[idx];
        match side {
            Side::Positive => {
                row.positive += 1;
                row.positive_pct = percentage(row.positive, total);
            }
            Side::Negative => {
                row.negative += 1;
                row.negative_pct = percentage(row.negative, total);
            }
        }
        true
    }

    fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let first = self.rows.first()?.date;
        let offset = (date - first).num_days();
        if offset < 0 || offset as usize >= self.rows.len() {
            None
        } else {
            Some(offset as usize)
        }
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    /// Number of instruments the percentages are relative to.
    pub fn total_instruments(&self) -> usize {
        self.total_instruments
    }

    pub fn rows(&self) -> &[BreadthRow] {
        &self.rows
    }

    pub fn get(&self, date: NaiveDate) -> Option<&BreadthRow> {
        self.index_of(date).map(|i| &self.rows[i])
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn from_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a named output column, one per row.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let c = &self.columns;
        let pick: fn(&BreadthRow) -> f64 = if name == c.positive {
            |r| r.positive as f64
        } else if name == c.positive_pct {
            |r| r.positive_pct
        } else if name == c.negative {
            |r| r.negative as f64
        } else if name == c.negative_pct {
            |r| r.negative_pct
        } else {
            return None;
        };
        Some(self.rows.iter().map(pick).collect())
    }

    /// Row with the highest percentage on `side` (earliest on ties).
    pub fn peak(&self, side: Side) -> Option<&BreadthRow> {
        self.rows.iter().fold(None, |best: Option<&BreadthRow>, row| match best {
            Some(b) if b.pct(side) >= row.pct(side) => Some(b),
            _ => Some(row),
        })
    }
}
