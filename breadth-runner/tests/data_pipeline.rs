//! Config → CSV loading → moving average → engine → export, on temp files.

use std::path::Path;

use breadth_core::indicators::with_moving_average;
use breadth_runner::{
    export_csv, load_universe, save_csv, BreadthConfig, BreadthEngine, IndicatorKind, Side,
};
use chrono::{Duration, NaiveDate};

fn write_csv(dir: &Path, symbol: &str, closes: &[f64]) {
    let start = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
    let mut text = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for (i, close) in closes.iter().enumerate() {
        let date = start + Duration::days(i as i64);
        text.push_str(&format!(
            "{date},{close},{},{},{close},{close},1000\n",
            close + 1.0,
            close - 1.0
        ));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), text).unwrap();
}

fn config_toml(dir: &Path, indicator: &str, lookback: usize, output: &Path) -> String {
    format!(
        r#"
data_dir = "{}"
indicator = "{indicator}"
lookback = {lookback}
from = "2016-01-04"
to = "2016-01-13"
workers = 3
output = "{}"
"#,
        dir.display(),
        output.display()
    )
}

fn seed_universe(dir: &Path) {
    let rising: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
    let falling: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
    write_csv(dir, "RISE", &rising);
    write_csv(dir, "FALL", &falling);
}

#[test]
fn hilo_pipeline_writes_named_csv() {
    let dir = tempfile::tempdir().unwrap();
    seed_universe(dir.path());
    let out = dir.path().join("out").join("hilo.csv");
    let config = BreadthConfig::from_toml(&config_toml(dir.path(), "hilo", 3, &out)).unwrap();

    let universe = load_universe(&config.data_dir, config.symbols.as_deref()).unwrap();
    assert_eq!(universe.len(), 2);

    let report = BreadthEngine::new()
        .with_workers(config.workers)
        .run(
            &universe,
            config.lookback,
            config.from,
            config.to,
            config.indicator.indicator().as_ref(),
        )
        .unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.table.len(), 10);
    // Third bar onwards: RISE makes 3-day highs, FALL makes 3-day lows.
    let pos = report.table.column("hilo_3_pos_pct").unwrap();
    assert_eq!(pos, vec![0.0, 0.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0, 50.0]);

    save_csv(&report.table, config.output.as_deref().unwrap()).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, export_csv(&report.table).unwrap());
    assert!(written.starts_with("date,hilo_3_pos,hilo_3_pos_pct,hilo_3_neg,hilo_3_neg_pct\n"));
}

#[test]
fn dma_pipeline_adds_moving_average_first() {
    let dir = tempfile::tempdir().unwrap();
    seed_universe(dir.path());
    let out = dir.path().join("dma.csv");
    let config = BreadthConfig::from_toml(&config_toml(dir.path(), "dma", 4, &out)).unwrap();
    assert_eq!(config.indicator, IndicatorKind::Dma);
    assert!(config.indicator.needs_moving_average());

    let universe = load_universe(&config.data_dir, None)
        .unwrap()
        .into_iter()
        .map(|s| with_moving_average(s, config.lookback))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let table = BreadthEngine::new()
        .breadth(
            &universe,
            config.lookback,
            config.from,
            config.to,
            config.indicator.indicator().as_ref(),
        )
        .unwrap();

    // Warmup (first 3 bars) is neutral; afterwards one above, one below.
    let pos: Vec<u32> = table.rows().iter().map(|r| r.positive).collect();
    let neg: Vec<u32> = table.rows().iter().map(|r| r.negative).collect();
    assert_eq!(pos, vec![0, 0, 0, 1, 1, 1, 1, 1, 1, 1]);
    assert_eq!(neg, vec![0, 0, 0, 1, 1, 1, 1, 1, 1, 1]);

    let peak = table.peak(Side::Positive).unwrap();
    assert_eq!(peak.date, NaiveDate::from_ymd_opt(2016, 1, 7).unwrap());
    assert_eq!(peak.positive_pct, 50.0);
}

#[test]
fn explicit_symbol_list_limits_the_universe() {
    let dir = tempfile::tempdir().unwrap();
    seed_universe(dir.path());
    let wanted = vec!["FALL".to_string()];

    let universe = load_universe(dir.path(), Some(&wanted)).unwrap();
    let ids: Vec<&str> = universe.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec!["FALL"]);
}
