//! Per-tick output contract consumed by execution and visualization.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::detectors::DetectorFlags;
use crate::domain::PositionState;
use crate::kernel::KernelChannel;
use crate::position_management::OrderIntent;
use crate::signals::{LiquidityRange, SignalDecision};
use crate::trend::TrendSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    /// Computed from a live bar by [`super::Pipeline::preview`]; nothing was committed.
    pub provisional: bool,
    pub flags: DetectorFlags,
    pub trend: TrendSnapshot,
    pub liquidity_range: LiquidityRange,
    pub signals: SignalDecision,
    /// Position state after this tick's transition.
    pub position_state: PositionState,
    pub intent: Option<OrderIntent>,
    /// `None` while the kernel is warming up (endpoint mode only).
    pub kernel: Option<KernelChannel>,
}

impl TickOutput {
    pub fn long_entry(&self) -> bool {
        self.signals.long_entry
    }

    pub fn short_entry(&self) -> bool {
        self.signals.short_entry
    }
}
