//! Flat / long / short state machine.
//!
//! One transition at most per tick, checked in this order:
//! 1. bar budget (absorbing: once exceeded, flatten and never re-enter)
//! 2. bracket exit, against levels set on earlier bars
//! 3. forced flatten on an opposite-side setup
//! 4. entry, when flat
//!
//! After a forced flatten the side that caused it stays disarmed until its
//! setup has gone false for at least one tick.

use tracing::{info, warn};

use crate::domain::{Bar, Position, PositionState, Side};
use crate::signals::{EntryGate, SignalDecision};

use super::bracket::{BracketSpec, BracketState};
use super::intent::{ExitReason, OrderIntent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleParams {
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
    pub trailing: bool,
    /// Highest bar index that may still hold a position. `None` disables the budget.
    pub bar_budget: Option<usize>,
}

impl Default for LifecycleParams {
    fn default() -> Self {
        Self {
            take_profit_pct: 3.0,
            stop_loss_pct: 1.5,
            trailing: false,
            bar_budget: Some(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PositionLifecycleManager {
    params: LifecycleParams,
    position: Option<Position>,
    bracket: Option<BracketState>,
    long_armed: bool,
    short_armed: bool,
    halted: bool,
}

impl PositionLifecycleManager {
    pub fn new(params: LifecycleParams) -> Self {
        Self {
            params,
            position: None,
            bracket: None,
            long_armed: true,
            short_armed: true,
            halted: false,
        }
    }

    pub fn state(&self) -> PositionState {
        self.position
            .as_ref()
            .map_or(PositionState::Flat, Position::state)
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn bracket(&self) -> Option<&BracketState> {
        self.bracket.as_ref()
    }

    /// True once the bar budget has been exceeded.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn budget_exceeded(&self, bar_index: usize) -> bool {
        self.params.bar_budget.is_some_and(|max| bar_index > max)
    }

    /// Sides that would accept an entry on the tick at `bar_index`.
    pub fn gate(&self, bar_index: usize) -> EntryGate {
        let open = self.position.is_none() && !self.halted && !self.budget_exceeded(bar_index);
        EntryGate {
            long: open && self.long_armed,
            short: open && self.short_armed,
        }
    }

    /// Advance one committed bar. Returns the intent for the transition taken, if any.
    pub fn on_bar(
        &mut self,
        bar: &Bar,
        bar_index: usize,
        decision: &SignalDecision,
    ) -> Option<OrderIntent> {
        let intent = self.transition(bar, bar_index, decision);
        if !decision.long_setup {
            self.long_armed = true;
        }
        if !decision.short_setup {
            self.short_armed = true;
        }
        intent
    }

    fn transition(
        &mut self,
        bar: &Bar,
        bar_index: usize,
        decision: &SignalDecision,
    ) -> Option<OrderIntent> {
        if self.halted {
            return None;
        }

        if self.budget_exceeded(bar_index) {
            self.halted = true;
            info!(bar_index, "bar budget exhausted, trading halted");
            return self.close(bar, bar_index, bar.close, ExitReason::BudgetExhausted);
        }

        if let Some(side) = self.position.as_ref().map(|p| p.side) {
            return self.manage_open(bar, bar_index, side, decision);
        }

        let side = match (decision.long_entry, decision.short_entry) {
            (false, false) => return None,
            (true, true) => {
                warn!(bar_index, "long and short entries on the same bar, ignoring both");
                return None;
            }
            (true, false) => Side::Long,
            (false, true) => Side::Short,
        };
        Some(self.open(bar, bar_index, side))
    }

    fn manage_open(
        &mut self,
        bar: &Bar,
        bar_index: usize,
        side: Side,
        decision: &SignalDecision,
    ) -> Option<OrderIntent> {
        let opened_at = self.position.as_ref()?.opened_at_bar;

        // Brackets go live on the bar after entry
        if bar_index > opened_at {
            if let Some((hit, level)) = self.bracket.as_ref().and_then(|b| b.check(bar)) {
                return self.close(bar, bar_index, level, hit.into());
            }
            if let (Some(position), Some(bracket)) =
                (self.position.as_mut(), self.bracket.as_mut())
            {
                position.observe(bar.high, bar.low);
                bracket.advance(position);
            }
        }

        let opposite_setup = match side {
            Side::Long => decision.short_setup,
            Side::Short => decision.long_setup,
        };
        if opposite_setup {
            match side.opposite() {
                Side::Long => self.long_armed = false,
                Side::Short => self.short_armed = false,
            }
            return self.close(bar, bar_index, bar.close, ExitReason::OppositeSignal);
        }
        None
    }

    fn open(&mut self, bar: &Bar, bar_index: usize, side: Side) -> OrderIntent {
        let entry = bar.close;
        let spec = BracketSpec::for_entry(
            side,
            entry,
            self.params.take_profit_pct,
            self.params.stop_loss_pct,
            self.params.trailing,
        );
        self.position = Some(Position::open(side, entry, bar_index, bar.timestamp));
        self.bracket = Some(BracketState::new(spec, side, entry));
        info!(bar_index, ?side, entry, ?spec, "position opened");
        OrderIntent::open(bar_index, bar.timestamp, side, entry, spec)
    }

    fn close(
        &mut self,
        bar: &Bar,
        bar_index: usize,
        price: f64,
        reason: ExitReason,
    ) -> Option<OrderIntent> {
        let position = self.position.take()?;
        self.bracket = None;
        info!(
            bar_index,
            side = ?position.side,
            entry = position.entry_price,
            exit = price,
            ?reason,
            "position closed"
        );
        Some(OrderIntent::close(
            bar_index,
            bar.timestamp,
            position.side,
            price,
            reason,
        ))
    }
}
