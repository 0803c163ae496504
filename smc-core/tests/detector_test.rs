//! Detector behavior on longer synthetic paths.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use smc_core::detectors::LiquiditySweepDetector;
use smc_core::domain::Bar;
use smc_core::indicators::RollingWindow;

/// Oscillating path with a bearish candle every third bar.
fn wave(n: usize) -> Vec<Bar> {
    let t0 = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let x = i as f64;
            let mid = 100.0 + 5.0 * (x * 0.7).sin() + 2.0 * (x * 2.3).sin();
            let (open, close) = if i % 3 != 0 {
                (mid - 0.4, mid + 0.4)
            } else {
                (mid + 0.4, mid - 0.4)
            };
            Bar {
                timestamp: t0 + Duration::hours(i as i64),
                open,
                high: mid + 1.0,
                low: mid - 1.0,
                close,
                volume: 1000.0,
                is_final: true,
            }
        })
        .collect()
}

fn sweeps(aggressiveness: u32, bars: &[Bar]) -> BTreeSet<(usize, &'static str)> {
    let detector = LiquiditySweepDetector::new(aggressiveness);
    let mut history = RollingWindow::new(20);
    let mut found = BTreeSet::new();
    for (i, bar) in bars.iter().enumerate() {
        history.push(*bar);
        let flags = detector.evaluate(&history);
        if flags.up {
            found.insert((i, "up"));
        }
        if flags.down {
            found.insert((i, "down"));
        }
    }
    found
}

#[test]
fn aggressiveness_changes_the_sweep_window() {
    let bars = wave(60);
    let narrow = sweeps(8, &bars);
    let wide = sweeps(2, &bars);

    // A break of the 8-bar range is also a break of the 2-bar range
    assert!(wide.is_subset(&narrow));
    assert!(narrow.len() > wide.len());
}

#[test]
fn sweeps_need_a_full_window() {
    let bars = wave(60);
    let wide = sweeps(2, &bars);
    assert!(wide.iter().all(|(i, _)| *i >= 8));
}
