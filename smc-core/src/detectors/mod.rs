//! Per-bar market-structure detectors.
//!
//! Each detector reads the shared trailing bar window (index 0 = current
//! bar) and reports flags for the current tick. Insufficient history always
//! reads as "no signal". Only the order-block detector keeps state beyond
//! the window: its bounded zone history.

pub mod fvg;
pub mod liquidity;
pub mod order_block;
pub mod structure;

pub use fvg::{FairValueGapDetector, FvgFlags};
pub use liquidity::{LiquiditySweepDetector, SweepFlags, MAX_AGGRESSIVENESS, MIN_AGGRESSIVENESS};
pub use order_block::{OrderBlockDetector, OrderBlockFlags, OrderBlockZone, ZoneHistory};
pub use structure::{MarketStructureDetector, StructureState};

use serde::{Deserialize, Serialize};

/// Maximum bar lookback any detector or the composer needs.
pub const MAX_LOOKBACK: usize = 20;

/// Everything the detectors reported for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetectorFlags {
    pub structure: StructureState,
    pub order_blocks: OrderBlockFlags,
    pub fvg: FvgFlags,
    pub sweeps: SweepFlags,
}
