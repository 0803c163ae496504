//! Swing-structure classification from the last two bars.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StructureState {
    HigherHigh,
    LowerLow,
    #[default]
    Inside,
}

/// Stateless classifier.
///
/// - HigherHigh: high > prev high and low >= prev low
/// - LowerLow: high <= prev high and low < prev low
/// - Inside: anything else, including the first bar
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketStructureDetector;

impl MarketStructureDetector {
    pub fn classify(current: &Bar, previous: Option<&Bar>) -> StructureState {
        let Some(prev) = previous else {
            return StructureState::Inside;
        };
        if current.high > prev.high && current.low >= prev.low {
            StructureState::HigherHigh
        } else if current.high <= prev.high && current.low < prev.low {
            StructureState::LowerLow
        } else {
            StructureState::Inside
        }
    }

    pub fn evaluate(&self, history: &RollingWindow<Bar>) -> StructureState {
        match history.get(0) {
            Some(current) => Self::classify(&current, history.get(1).as_ref()),
            None => StructureState::Inside,
        }
    }
}
