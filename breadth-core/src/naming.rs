//! Deterministic column names for breadth output and precomputed inputs.

use serde::{Deserialize, Serialize};

/// Name of the moving-average column the "dma" indicator reads.
pub fn ma_column_name(period: usize) -> String {
    format!("MA_{period}")
}

/// The four output column names for one `(lookback, indicator)` pair.
///
/// Same inputs always give the same names, so tables from separate runs can
/// be joined column-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnNames {
    pub positive: String,
    pub positive_pct: String,
    pub negative: String,
    pub negative_pct: String,
}

impl ColumnNames {
    pub fn new(lookback: usize, indicator_name: &str) -> Self {
        let prefix = format!("{indicator_name}_{lookback}");
        Self {
            positive: format!("{prefix}_pos"),
            positive_pct: format!("{prefix}_pos_pct"),
            negative: format!("{prefix}_neg"),
            negative_pct: format!("{prefix}_neg_pct"),
        }
    }

    /// Names in table order: positive, positive %, negative, negative %.
    pub fn as_array(&self) -> [&str; 4] {
        [
            &self.positive,
            &self.positive_pct,
            &self.negative,
            &self.negative_pct,
        ]
    }
}
