//! Rolling-window statistics feeding every detector.
//!
//! Everything here is streaming: one `update`/`push` per committed bar, with
//! state bounded by the indicator's own window. There is no full-series
//! precompute, so no value can depend on a bar that has not arrived yet.

pub mod ema;
pub mod extremum;
pub mod sma;
pub mod window;

pub use ema::Ema;
pub use extremum::Extremum;
pub use sma::Sma;
pub use window::RollingWindow;

use crate::error::NumericError;

/// Trait for streaming indicators.
///
/// The first `lookback()` updates return `None` (warmup). Non-finite inputs
/// are rejected without mutating state.
pub trait StreamingIndicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "sma_20").
    fn name(&self) -> &str;

    /// Number of updates before the indicator produces output, minus one.
    fn lookback(&self) -> usize;

    /// Feed the next value and return the current output.
    fn update(&mut self, x: f64) -> Result<Option<f64>, NumericError>;

    /// Current output without feeding a value.
    fn value(&self) -> Option<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    let data: Vec<(f64, f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    make_bars_ohlc(&data)
}

/// Create hourly synthetic bars from (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_bars_ohlc(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            timestamp: base + chrono::Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
            is_final: true,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
