//! Order-block detection with a bounded zone history per side.
//!
//! Bullish: lowest low over the trailing `lookback` bars (current included)
//! equals the low one bar back, that bar closed above its open, and the
//! current close is above the previous close. Bearish mirrors on highs.
//!
//! The equality against the rolling extremum is exact. The compared bar is
//! inside the window, so a tie with another bar still counts as detected.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Bar, Side};
use crate::indicators::RollingWindow;

/// Zones kept per side before the oldest is evicted.
pub const ZONE_CAPACITY: usize = 5;

/// Price level of a detected order block. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBlockZone {
    pub price: f64,
    pub side: Side,
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
}

/// FIFO of the most recent zones for one side.
#[derive(Debug, Clone)]
pub struct ZoneHistory {
    zones: VecDeque<OrderBlockZone>,
}

impl Default for ZoneHistory {
    fn default() -> Self {
        Self {
            zones: VecDeque::with_capacity(ZONE_CAPACITY),
        }
    }
}

impl ZoneHistory {
    /// Append a zone, returning the evicted oldest one when full.
    pub fn push(&mut self, zone: OrderBlockZone) -> Option<OrderBlockZone> {
        let evicted = if self.zones.len() == ZONE_CAPACITY {
            self.zones.pop_front()
        } else {
            None
        };
        self.zones.push_back(zone);
        evicted
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn latest(&self) -> Option<&OrderBlockZone> {
        self.zones.back()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &OrderBlockZone> {
        self.zones.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderBlockFlags {
    pub bullish: bool,
    pub bearish: bool,
}

#[derive(Debug, Clone)]
pub struct OrderBlockDetector {
    lookback: usize,
    bullish_zones: ZoneHistory,
    bearish_zones: ZoneHistory,
}

impl OrderBlockDetector {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 3, "order-block lookback must include the bar two back");
        Self {
            lookback,
            bullish_zones: ZoneHistory::default(),
            bearish_zones: ZoneHistory::default(),
        }
    }

    /// Pure detection over the trailing window; does not record zones.
    pub fn detect(&self, history: &RollingWindow<Bar>) -> OrderBlockFlags {
        // The first two bars of any stream can never fire.
        if !history.has(self.lookback) {
            return OrderBlockFlags::default();
        }
        let (Some(cur), Some(prev)) = (history.get(0), history.get(1)) else {
            return OrderBlockFlags::default();
        };

        let bullish = history.lowest(|b| b.low, self.lookback, 0) == Some(prev.low)
            && prev.is_bullish()
            && cur.close > prev.close;
        let bearish = history.highest(|b| b.high, self.lookback, 0) == Some(prev.high)
            && prev.is_bearish()
            && cur.close < prev.close;

        OrderBlockFlags { bullish, bearish }
    }

    /// Detect and push the triggering extreme into the side's zone history.
    pub fn evaluate(&mut self, history: &RollingWindow<Bar>, bar_index: usize) -> OrderBlockFlags {
        let flags = self.detect(history);
        let Some(prev) = history.get(1) else {
            return flags;
        };

        if flags.bullish {
            debug!(bar_index, price = prev.low, "bullish order block");
            self.bullish_zones.push(OrderBlockZone {
                price: prev.low,
                side: Side::Long,
                bar_index: bar_index.saturating_sub(1),
                timestamp: prev.timestamp,
            });
        }
        if flags.bearish {
            debug!(bar_index, price = prev.high, "bearish order block");
            self.bearish_zones.push(OrderBlockZone {
                price: prev.high,
                side: Side::Short,
                bar_index: bar_index.saturating_sub(1),
                timestamp: prev.timestamp,
            });
        }
        flags
    }

    pub fn zones(&self, side: Side) -> &ZoneHistory {
        match side {
            Side::Long => &self.bullish_zones,
            Side::Short => &self.bearish_zones,
        }
    }
}
