//! Exponential Moving Average (EMA), streaming.
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[period-1] = SMA of the first `period` values.
//! Lookback: period - 1.
//!
//! State persists across ticks and is only re-seeded by constructing a new
//! instance at stream start.

use crate::error::NumericError;

use super::StreamingIndicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    name: String,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            name: format!("ema_{period}"),
            seed_sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl StreamingIndicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn update(&mut self, x: f64) -> Result<Option<f64>, NumericError> {
        if !x.is_finite() {
            return Err(NumericError::NonFinite {
                what: "ema",
                value: x,
            });
        }
        self.seen += 1;

        self.value = match self.value {
            Some(prev) => Some(self.alpha * x + (1.0 - self.alpha) * prev),
            None => {
                self.seed_sum += x;
                if self.seen == self.period {
                    Some(self.seed_sum / self.period as f64)
                } else {
                    None
                }
            }
        };
        Ok(self.value)
    }

    fn value(&self) -> Option<f64> {
        self.value
    }
}
