//! Serializable breadth run configuration (TOML).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use breadth_core::indicators::{MovingAverageSide, RollingExtremum};
use breadth_core::BreadthIndicator;

use crate::dispatcher::DEFAULT_WORKERS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Built-in indicator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// New N-day closing highs vs. lows.
    Hilo,
    /// Close above vs. below its N-day moving average.
    Dma,
}

impl IndicatorKind {
    pub fn indicator(self) -> Box<dyn BreadthIndicator> {
        match self {
            IndicatorKind::Hilo => Box::new(RollingExtremum),
            IndicatorKind::Dma => Box::new(MovingAverageSide),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IndicatorKind::Hilo => RollingExtremum::NAME,
            IndicatorKind::Dma => MovingAverageSide::NAME,
        }
    }

    /// Whether series need an `MA_{lookback}` column before classification.
    pub fn needs_moving_average(self) -> bool {
        matches!(self, IndicatorKind::Dma)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hilo" => Some(IndicatorKind::Hilo),
            "dma" => Some(IndicatorKind::Dma),
            _ => None,
        }
    }
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Everything needed to reproduce one breadth run.
///
/// Dates are quoted ISO strings in TOML (`from = "2016-01-01"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthConfig {
    /// Directory of per-instrument CSV files (`<SYMBOL>.csv`).
    pub data_dir: PathBuf,

    /// Instruments to include. `None` means every CSV in `data_dir`.
    #[serde(default)]
    pub symbols: Option<Vec<String>>,

    pub indicator: IndicatorKind,

    pub lookback: usize,

    /// First calendar day of the output table (inclusive).
    pub from: NaiveDate,

    /// Last calendar day of the output table (inclusive).
    pub to: NaiveDate,

    /// Concurrent instrument budget.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Where to write the table as CSV.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl BreadthConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback == 0 {
            return Err(ConfigError::Invalid("lookback must be >= 1".into()));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be >= 1".into()));
        }
        if self.from > self.to {
            return Err(ConfigError::Invalid(format!(
                "from {} is after to {}",
                self.from, self.to
            )));
        }
        if let Some(symbols) = &self.symbols {
            if symbols.iter().any(|s| s.trim().is_empty()) {
                return Err(ConfigError::Invalid("symbols must not be blank".into()));
            }
        }
        Ok(())
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDate(s.to_string()))
}
