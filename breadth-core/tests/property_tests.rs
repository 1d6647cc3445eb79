//! Property tests for indicator invariants.
//!
//! Uses proptest to verify:
//! 1. The linear extremum durations match a brute-force backward scan
//! 2. A date is never both positive and negative (by construction), and
//!    every bar gets exactly one tag
//! 3. "dma" positives and negatives partition the bars with a valid MA

use breadth_core::indicators::{
    extremum_durations, with_moving_average, Extremum, MovingAverageSide, RollingExtremum,
};
use breadth_core::{Bar, BreadthIndicator, InstrumentSeries, Signal};
use chrono::NaiveDate;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    // Coarse price grid so ties are common.
    prop::collection::vec((1u32..40).prop_map(|p| p as f64 * 0.5), 0..120)
}

fn series_from(closes: &[f64]) -> InstrumentSeries {
    let base = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        })
        .collect();
    InstrumentSeries::new("PROP", bars).unwrap()
}

/// Reference: walk back from `i` while the close stays the extremum.
fn brute_force_duration(closes: &[f64], i: usize, extremum: Extremum) -> usize {
    let mut n = 0;
    for j in (0..=i).rev() {
        let ok = match extremum {
            Extremum::Highest => closes[j] <= closes[i],
            Extremum::Lowest => closes[j] >= closes[i],
        };
        if !ok {
            break;
        }
        n += 1;
    }
    n
}

// ── 1. Linear durations == quadratic scan ────────────────────────────

proptest! {
    #[test]
    fn durations_match_brute_force(closes in arb_closes()) {
        for extremum in [Extremum::Highest, Extremum::Lowest] {
            let fast = extremum_durations(&closes, extremum);
            prop_assert_eq!(fast.len(), closes.len());
            for (i, &d) in fast.iter().enumerate() {
                prop_assert_eq!(d, brute_force_duration(&closes, i, extremum));
            }
        }
    }
}

// ── 2. Hilo tags every bar once ──────────────────────────────────────

proptest! {
    #[test]
    fn hilo_tags_every_bar(closes in arb_closes(), lookback in 1usize..30) {
        let series = series_from(&closes);
        let c = RollingExtremum.classify(&series, lookback).unwrap();

        prop_assert_eq!(c.len(), series.len());
        let total = c.count(Signal::Positive) + c.count(Signal::Negative) + c.count(Signal::Neutral);
        prop_assert_eq!(total, series.len());

        // No positive before `lookback` bars of history exist.
        for (i, bar) in series.bars().iter().enumerate() {
            if i + 1 < lookback {
                prop_assert_eq!(c.get(bar.date), Some(Signal::Neutral));
            }
        }
    }
}

// ── 3. Dma partitions bars with a valid MA ───────────────────────────

proptest! {
    #[test]
    fn dma_partitions_valid_bars(closes in arb_closes(), lookback in 1usize..20) {
        let series = with_moving_average(series_from(&closes), lookback).unwrap();
        let c = MovingAverageSide.classify(&series, lookback).unwrap();

        let valid = closes.len().saturating_sub(lookback - 1);
        prop_assert_eq!(c.count(Signal::Positive) + c.count(Signal::Negative), valid);
    }
}
