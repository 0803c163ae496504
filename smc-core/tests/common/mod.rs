//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use smc_core::domain::{Bar, Timeframe};
use smc_core::{Pipeline, StrategyConfig};

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn hourly(i: usize, (open, high, low, close): (f64, f64, f64, f64), volume: f64) -> Bar {
    Bar {
        timestamp: t0() + Duration::hours(i as i64),
        open,
        high,
        low,
        close,
        volume,
        is_final: true,
    }
}

/// 4H bar `k`, opening at hour 4k.
pub fn four_hourly(k: usize, close: f64) -> Bar {
    Bar {
        timestamp: t0() + Duration::hours(4 * k as i64),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1.0,
        is_final: true,
    }
}

/// The last 4H bar closed by the close of hourly bar `t`.
pub fn visible_htf_index(t: usize) -> Option<usize> {
    (t >= 3).then(|| (t - 3) / 4)
}

/// 1H base / 4H higher timeframe, everything else default.
pub fn hourly_config() -> StrategyConfig {
    let mut config = StrategyConfig::default();
    config.timeframes.higher = Timeframe::H4;
    config.timeframes.entry = Timeframe::H1;
    config
}

pub fn hourly_pipeline() -> Pipeline {
    Pipeline::new(hourly_config()).unwrap()
}

/// Deterministic pseudo-random walk with realistic bar ranges.
pub fn random_walk(n: usize) -> Vec<Bar> {
    let mut price = 100.0;
    (0..n)
        .map(|i| {
            let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
            let change = ((seed >> 33) % 200) as f64 * 0.01 - 1.0;
            price = (price + change).max(10.0);
            let open = price - change * 0.5;
            let close = price;
            let high = open.max(close) + 0.6;
            let low = open.min(close) - 0.6;
            let volume = 1000.0 + ((seed >> 40) % 900) as f64;
            hourly(i, (open, high, low, close), volume)
        })
        .collect()
}
