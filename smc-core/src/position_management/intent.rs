//! Declarative order intents handed to the execution collaborator.
//!
//! The core never fills orders. Each lifecycle transition produces exactly
//! one intent describing what should happen at which price basis.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::Side;

use super::bracket::{BracketHit, BracketSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntentAction {
    Open,
    Close,
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    TrailingStop,
    OppositeSignal,
    BudgetExhausted,
}

impl From<BracketHit> for ExitReason {
    fn from(hit: BracketHit) -> Self {
        match hit {
            BracketHit::StopLoss => Self::StopLoss,
            BracketHit::TakeProfit => Self::TakeProfit,
            BracketHit::TrailingStop => Self::TrailingStop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub action: IntentAction,
    /// Side of the position being opened or closed.
    pub side: Side,
    pub price_basis: f64,
    /// Present on `Open` only.
    pub bracket: Option<BracketSpec>,
    /// Present on `Close` only.
    pub reason: Option<ExitReason>,
    /// Pending bracket orders must be cancelled before acting on this intent.
    pub cancel_brackets: bool,
}

impl OrderIntent {
    pub fn open(
        bar_index: usize,
        timestamp: NaiveDateTime,
        side: Side,
        price_basis: f64,
        bracket: BracketSpec,
    ) -> Self {
        Self {
            bar_index,
            timestamp,
            action: IntentAction::Open,
            side,
            price_basis,
            bracket: Some(bracket),
            reason: None,
            cancel_brackets: false,
        }
    }

    pub fn close(
        bar_index: usize,
        timestamp: NaiveDateTime,
        side: Side,
        price_basis: f64,
        reason: ExitReason,
    ) -> Self {
        Self {
            bar_index,
            timestamp,
            action: IntentAction::Close,
            side,
            price_basis,
            bracket: None,
            reason: Some(reason),
            // A bracket hit is the bracket filling; every other close must pull it first
            cancel_brackets: !matches!(
                reason,
                ExitReason::StopLoss | ExitReason::TakeProfit | ExitReason::TrailingStop
            ),
        }
    }

    pub fn is_open(&self) -> bool {
        self.action == IntentAction::Open
    }
}
