//! Batch replay of a recorded bar series through one pipeline.
//!
//! Pairs each OPEN intent with the CLOSE that follows it into a round-trip
//! trade, priced at the intents' price basis. No fills, fees or slippage are
//! simulated; the returns are what the intents imply.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::StrategyConfig;
use crate::domain::{Bar, Side};
use crate::error::EngineError;
use crate::position_management::{ExitReason, IntentAction, OrderIntent};

use super::output::TickOutput;
use super::pipeline::Pipeline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub side: Side,
    pub entry_bar: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_bar: usize,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    pub reason: ExitReason,
    pub return_pct: f64,
}

impl TradeRecord {
    fn from_intents(open: &OrderIntent, close: &OrderIntent, reason: ExitReason) -> Self {
        let (entry, exit) = (open.price_basis, close.price_basis);
        let return_pct = match open.side {
            Side::Long => (exit - entry) / entry * 100.0,
            Side::Short => (entry - exit) / entry * 100.0,
        };
        Self {
            side: open.side,
            entry_bar: open.bar_index,
            entry_time: open.timestamp,
            entry_price: entry,
            exit_bar: close.bar_index,
            exit_time: close.timestamp,
            exit_price: exit,
            reason,
            return_pct,
        }
    }

    pub fn is_win(&self) -> bool {
        self.return_pct > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub bars: usize,
    /// Leading bars on which no entry could fire yet.
    pub warmup_bars: usize,
    pub long_entries: usize,
    pub short_entries: usize,
    pub trades: usize,
    pub wins: usize,
    pub exits: BTreeMap<ExitReason, usize>,
    /// Sum of per-trade returns, in percent.
    pub total_return_pct: f64,
    /// Position still open when the series ended.
    pub open_at_end: bool,
    pub halted: bool,
}

#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub ticks: Vec<TickOutput>,
    pub trades: Vec<TradeRecord>,
    pub summary: ReplaySummary,
}

/// Run `base` through a fresh pipeline. `htf[i]` is the HTF bar visible at
/// `base[i]` (see [`crate::data::align_higher_timeframe`]); missing entries
/// read as `None`.
pub fn replay(
    config: &StrategyConfig,
    base: &[Bar],
    htf: &[Option<Bar>],
) -> Result<ReplayResult, EngineError> {
    let mut pipeline = Pipeline::new(config.clone())?;
    let mut ticks = Vec::with_capacity(base.len());
    let mut trades = Vec::new();
    let mut summary = ReplaySummary::default();
    let mut open: Option<OrderIntent> = None;

    for (i, bar) in base.iter().enumerate() {
        let aligned = htf.get(i).copied().flatten();
        let tick = pipeline.on_bar(bar, aligned.as_ref())?;

        if let Some(intent) = &tick.intent {
            match intent.action {
                IntentAction::Open => {
                    match intent.side {
                        Side::Long => summary.long_entries += 1,
                        Side::Short => summary.short_entries += 1,
                    }
                    open = Some(intent.clone());
                }
                IntentAction::Close => {
                    if let (Some(entry), Some(reason)) = (open.take(), intent.reason) {
                        let trade = TradeRecord::from_intents(&entry, intent, reason);
                        *summary.exits.entry(reason).or_insert(0) += 1;
                        summary.total_return_pct += trade.return_pct;
                        if trade.is_win() {
                            summary.wins += 1;
                        }
                        trades.push(trade);
                    }
                }
            }
        }
        ticks.push(tick);
    }

    summary.bars = pipeline.bars_processed();
    summary.warmup_bars = pipeline.warmup_bars().min(summary.bars);
    summary.trades = trades.len();
    summary.open_at_end = open.is_some();
    summary.halted = pipeline.lifecycle().is_halted();
    info!(
        bars = summary.bars,
        trades = summary.trades,
        total_return_pct = summary.total_return_pct,
        "replay finished"
    );

    Ok(ReplayResult {
        ticks,
        trades,
        summary,
    })
}
