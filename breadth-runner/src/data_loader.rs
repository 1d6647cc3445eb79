//! Instrument series loading from local CSV files.
//!
//! One file per instrument, named `<SYMBOL>.csv`, with a header row.
//! Recognised columns are `Date`, `Open`, `High`, `Low`, `Close` and an
//! optional `Volume` (case as exported by Yahoo Finance, or lowercase).
//! Other columns such as `Adj Close` are ignored.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use breadth_core::{Bar, InstrumentSeries, SeriesError};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{path} contains no bars")]
    Empty { path: PathBuf },

    #[error("no data file for '{symbol}' in {dir}")]
    MissingSymbol { symbol: String, dir: PathBuf },

    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "date")]
    date: NaiveDate,
    #[serde(rename = "Open", alias = "open")]
    open: f64,
    #[serde(rename = "High", alias = "high")]
    high: f64,
    #[serde(rename = "Low", alias = "low")]
    low: f64,
    #[serde(rename = "Close", alias = "close")]
    close: f64,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.unwrap_or(0.0).max(0.0) as u64,
        }
    }
}

/// Parse bars from any CSV reader.
pub fn read_bars<R: std::io::Read>(reader: R) -> Result<Vec<Bar>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize::<CsvRow>()
        .map(|row| row.map(Bar::from))
        .collect()
}

/// Load one instrument from `path`; the file stem is the identifier.
pub fn load_series(path: &Path) -> Result<InstrumentSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = read_bars(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if bars.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(InstrumentSeries::new(id, bars)?)
}

/// Symbols with a `<SYMBOL>.csv` file in `dir`, sorted.
pub fn discover_symbols(dir: &Path) -> Result<Vec<String>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut symbols = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            if let Some(stem) = path.file_stem() {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    symbols.sort();
    Ok(symbols)
}

/// Load the requested symbols (or every CSV in `dir` when `None`).
pub fn load_universe(
    dir: &Path,
    symbols: Option<&[String]>,
) -> Result<Vec<InstrumentSeries>, LoadError> {
    let symbols = match symbols {
        Some(s) => s.to_vec(),
        None => discover_symbols(dir)?,
    };

    let mut universe = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let path = dir.join(format!("{symbol}.csv"));
        if !path.is_file() {
            return Err(LoadError::MissingSymbol {
                symbol: symbol.clone(),
                dir: dir.to_path_buf(),
            });
        }
        universe.push(load_series(&path)?);
    }

    tracing::info!(
        instruments = universe.len(),
        dir = %dir.display(),
        "loaded instrument series"
    );
    Ok(universe)
}
