//! Breadth table export — CSV for spreadsheets/plotting, JSON for tooling.
//!
//! The CSV header is `date` followed by the table's four column names, so
//! files from different runs can be joined on `date`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::table::BreadthTable;

/// Serialize a table to CSV text.
pub fn export_csv(table: &BreadthTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let [pos, pos_pct, neg, neg_pct] = table.columns().as_array();
    wtr.write_record(["date", pos, pos_pct, neg, neg_pct])?;

    for row in table.rows() {
        wtr.write_record([
            &row.date.to_string(),
            &row.positive.to_string(),
            &format!("{:.4}", row.positive_pct),
            &row.negative.to_string(),
            &format!("{:.4}", row.negative_pct),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

/// Write a table as CSV to `path`, creating parent directories.
pub fn save_csv(table: &BreadthTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let csv = export_csv(table)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

/// Serialize a table to pretty JSON.
pub fn export_json(table: &BreadthTable) -> Result<String> {
    serde_json::to_string_pretty(table).context("failed to serialize BreadthTable to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::dispatcher::ResultsMapping;
    use breadth_core::{Classification, ColumnNames, Signal};
    use chrono::NaiveDate;

    fn sample_table() -> BreadthTable {
        let d = |day| NaiveDate::from_ymd_opt(2016, 1, day).unwrap();
        let mut results = ResultsMapping::new();
        results.insert(
            "A".into(),
            [(d(1), Signal::Positive)].into_iter().collect::<Classification>(),
        );
        results.insert(
            "B".into(),
            [(d(2), Signal::Negative)].into_iter().collect::<Classification>(),
        );
        aggregate(&results, d(1), d(2), ColumnNames::new(20, "dma")).unwrap()
    }

    #[test]
    fn csv_has_named_header_and_dense_rows() {
        let csv = export_csv(&sample_table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "date,dma_20_pos,dma_20_pos_pct,dma_20_neg,dma_20_neg_pct",
                "2016-01-01,1,50.0000,0,0.0000",
                "2016-01-02,0,0.0000,1,50.0000",
            ]
        );
    }

    #[test]
    fn save_csv_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/breadth.csv");
        save_csv(&sample_table(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date,dma_20_pos"));
    }

    #[test]
    fn json_roundtrip() {
        let table = sample_table();
        let json = export_json(&table).unwrap();
        let back: BreadthTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
