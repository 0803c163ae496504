//! Liquidity sweeps: a wick through the prior N-bar extreme that closes back
//! inside it on the same bar.
//!
//! N = 10 - aggressiveness, with aggressiveness clamped to [2, 8], so higher
//! aggressiveness means a shorter window and more detections. The rolling
//! extreme is taken one bar back and never includes the current bar.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::RollingWindow;

pub const MIN_AGGRESSIVENESS: u32 = 2;
pub const MAX_AGGRESSIVENESS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SweepFlags {
    /// Highs swept, rejected down.
    pub up: bool,
    /// Lows swept, rejected up.
    pub down: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct LiquiditySweepDetector {
    window: usize,
}

impl LiquiditySweepDetector {
    pub fn new(aggressiveness: u32) -> Self {
        let clamped = aggressiveness.clamp(MIN_AGGRESSIVENESS, MAX_AGGRESSIVENESS);
        Self {
            window: (10 - clamped) as usize,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn evaluate(&self, history: &RollingWindow<Bar>) -> SweepFlags {
        let Some(cur) = history.get(0) else {
            return SweepFlags::default();
        };
        let prior_high = history.highest(|b| b.high, self.window, 1);
        let prior_low = history.lowest(|b| b.low, self.window, 1);
        let (Some(prior_high), Some(prior_low)) = (prior_high, prior_low) else {
            return SweepFlags::default();
        };

        SweepFlags {
            up: cur.high > prior_high && cur.is_bearish(),
            down: cur.low < prior_low && cur.is_bullish(),
        }
    }
}
