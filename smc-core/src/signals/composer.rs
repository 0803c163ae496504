//! Boolean fusion of detector flags and trend state into entry signals.
//!
//! Setups carry every market condition; entries additionally require the
//! lifecycle gate (flat, not halted, side armed). Both sides are evaluated
//! independently every tick, even though their trend requirements make a
//! simultaneous long and short setup impossible with consistent inputs.

use serde::{Deserialize, Serialize};

use crate::detectors::{DetectorFlags, MAX_LOOKBACK};
use crate::domain::Bar;
use crate::indicators::RollingWindow;
use crate::trend::{TrendSnapshot, TrendState};

/// Bars in the rolling range the composer compares the close against.
pub const RANGE_PERIOD: usize = MAX_LOOKBACK;

/// Rolling 20-bar high/low ("liquidity zones"), current bar included.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LiquidityRange {
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl LiquidityRange {
    pub fn from_history(history: &RollingWindow<Bar>) -> Self {
        Self {
            high: history.highest(|b| b.high, RANGE_PERIOD, 0),
            low: history.lowest(|b| b.low, RANGE_PERIOD, 0),
        }
    }
}

/// Which sides the lifecycle manager would accept an entry on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryGate {
    pub long: bool,
    pub short: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalDecision {
    pub long_setup: bool,
    pub short_setup: bool,
    pub long_entry: bool,
    pub short_entry: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SignalComposer {
    enable_long: bool,
    enable_short: bool,
}

impl SignalComposer {
    pub fn new(enable_long: bool, enable_short: bool) -> Self {
        Self {
            enable_long,
            enable_short,
        }
    }

    pub fn compose(
        &self,
        bar: &Bar,
        flags: &DetectorFlags,
        trend: &TrendSnapshot,
        range: &LiquidityRange,
        gate: EntryGate,
    ) -> SignalDecision {
        let long_setup = self.enable_long
            && trend.higher == TrendState::Bullish
            && trend.entry == TrendState::Bullish
            && (flags.order_blocks.bullish || flags.fvg.up)
            && range.low.is_some_and(|low| bar.close > low)
            && !flags.sweeps.down
            && trend.volume_confirmed;

        let short_setup = self.enable_short
            && trend.higher == TrendState::Bearish
            && trend.entry == TrendState::Bearish
            && (flags.order_blocks.bearish || flags.fvg.down)
            && range.high.is_some_and(|high| bar.close < high)
            && !flags.sweeps.up
            && trend.volume_confirmed;

        SignalDecision {
            long_setup,
            short_setup,
            long_entry: long_setup && gate.long,
            short_entry: short_setup && gate.short,
        }
    }
}
