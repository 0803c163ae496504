//! Position state for the single instrument a pipeline owns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Long => Self::Short,
            Self::Short => Self::Long,
        }
    }
}

/// Lifecycle state reported every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Flat,
    LongOpen,
    ShortOpen,
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Flat => None,
            Self::LongOpen => Some(Side::Long),
            Self::ShortOpen => Some(Side::Short),
        }
    }
}

impl From<Side> for PositionState {
    fn from(side: Side) -> Self {
        match side {
            Side::Long => Self::LongOpen,
            Side::Short => Self::ShortOpen,
        }
    }
}

/// An open position. At most one exists per pipeline (no pyramiding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub opened_at_bar: usize,
    pub opened_at: NaiveDateTime,
    /// Highest high observed on bars after entry.
    pub highest_price_since_entry: f64,
    /// Lowest low observed on bars after entry.
    pub lowest_price_since_entry: f64,
}

impl Position {
    pub fn open(side: Side, entry_price: f64, bar_index: usize, at: NaiveDateTime) -> Self {
        Self {
            side,
            entry_price,
            opened_at_bar: bar_index,
            opened_at: at,
            highest_price_since_entry: entry_price,
            lowest_price_since_entry: entry_price,
        }
    }

    pub fn state(&self) -> PositionState {
        self.side.into()
    }

    /// Extend the since-entry watermarks with a bar's range.
    pub fn observe(&mut self, high: f64, low: f64) {
        self.highest_price_since_entry = self.highest_price_since_entry.max(high);
        self.lowest_price_since_entry = self.lowest_price_since_entry.min(low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn watermarks_start_at_entry_and_extend() {
        let mut pos = Position::open(Side::Long, 100.0, 7, at());
        assert_eq!(pos.highest_price_since_entry, 100.0);
        assert_eq!(pos.lowest_price_since_entry, 100.0);

        pos.observe(104.0, 99.0);
        pos.observe(102.0, 101.0);
        assert_eq!(pos.highest_price_since_entry, 104.0);
        assert_eq!(pos.lowest_price_since_entry, 99.0);
        assert_eq!(pos.opened_at_bar, 7);
    }

    #[test]
    fn state_mapping() {
        assert_eq!(PositionState::from(Side::Short), PositionState::ShortOpen);
        assert_eq!(PositionState::LongOpen.side(), Some(Side::Long));
        assert!(PositionState::Flat.side().is_none());
        assert_eq!(Side::Long.opposite(), Side::Short);
    }
}
