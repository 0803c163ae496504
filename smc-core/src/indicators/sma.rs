//! Simple Moving Average (SMA), streaming.
//!
//! Mean of the trailing `period` values, current value included.
//! Lookback: period - 1 (first valid value after `period` updates).

use crate::error::NumericError;

use super::window::RollingWindow;
use super::StreamingIndicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
    window: RollingWindow<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
            window: RollingWindow::new(period),
        }
    }
}

impl StreamingIndicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn update(&mut self, x: f64) -> Result<Option<f64>, NumericError> {
        if !x.is_finite() {
            return Err(NumericError::NonFinite {
                what: "sma",
                value: x,
            });
        }
        self.window.push(x);
        Ok(self.value())
    }

    fn value(&self) -> Option<f64> {
        if !self.window.is_full() {
            return None;
        }
        // Summed from the window rather than a running total so long streams
        // do not accumulate add/subtract drift.
        let sum: f64 = self.window.iter().sum();
        Some(sum / self.period as f64)
    }
}
