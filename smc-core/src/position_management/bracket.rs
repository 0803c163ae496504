//! Bracket levels attached to an open position.
//!
//! Fixed mode places a take-profit and a stop-loss at percentage offsets from
//! the entry. Trailing mode has no stop until price has moved the activation
//! offset in favor; from then on the stop trails the best price since entry
//! by the trailing distance and is ratcheted so it never loosens.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Position, Side};

use super::ratchet::RatchetState;

/// Declarative bracket parameters handed to the execution collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BracketSpec {
    Fixed {
        take_profit: f64,
        stop_loss: f64,
    },
    Trailing {
        /// Distance the stop trails behind the best price.
        distance: f64,
        /// Favorable move required before the trail arms.
        activation_offset: f64,
    },
}

impl BracketSpec {
    /// Build the bracket for an entry. Percentages are in percent (3.0 = 3 %).
    pub fn for_entry(side: Side, entry: f64, tp_pct: f64, sl_pct: f64, trailing: bool) -> Self {
        if trailing {
            return Self::Trailing {
                distance: entry * sl_pct / 100.0,
                activation_offset: entry * tp_pct / 100.0,
            };
        }
        match side {
            Side::Long => Self::Fixed {
                take_profit: entry * (1.0 + tp_pct / 100.0),
                stop_loss: entry * (1.0 - sl_pct / 100.0),
            },
            Side::Short => Self::Fixed {
                take_profit: entry * (1.0 - tp_pct / 100.0),
                stop_loss: entry * (1.0 + sl_pct / 100.0),
            },
        }
    }
}

/// Why a bracket closed the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketHit {
    StopLoss,
    TakeProfit,
    TrailingStop,
}

/// Live bracket for the current position. Replaced wholesale on every entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketState {
    spec: BracketSpec,
    side: Side,
    entry: f64,
    trail: RatchetState,
    trail_armed: bool,
}

impl BracketState {
    pub fn new(spec: BracketSpec, side: Side, entry: f64) -> Self {
        Self {
            spec,
            side,
            entry,
            trail: RatchetState::new(side),
            trail_armed: false,
        }
    }

    pub fn spec(&self) -> BracketSpec {
        self.spec
    }

    /// Active trailing stop level, once armed.
    pub fn trailing_stop(&self) -> Option<f64> {
        self.trail.current_level()
    }

    /// Check the bar's range against the levels in force before this bar.
    ///
    /// When stop and target are both inside the range the stop wins: intrabar
    /// order is unknown and the adverse path is assumed.
    pub fn check(&self, bar: &Bar) -> Option<(BracketHit, f64)> {
        match (self.spec, self.side) {
            (BracketSpec::Fixed { take_profit, stop_loss }, Side::Long) => {
                if bar.low <= stop_loss {
                    Some((BracketHit::StopLoss, stop_loss))
                } else if bar.high >= take_profit {
                    Some((BracketHit::TakeProfit, take_profit))
                } else {
                    None
                }
            }
            (BracketSpec::Fixed { take_profit, stop_loss }, Side::Short) => {
                if bar.high >= stop_loss {
                    Some((BracketHit::StopLoss, stop_loss))
                } else if bar.low <= take_profit {
                    Some((BracketHit::TakeProfit, take_profit))
                } else {
                    None
                }
            }
            (BracketSpec::Trailing { .. }, side) => {
                let stop = self.trail.current_level()?;
                let breached = match side {
                    Side::Long => bar.low <= stop,
                    Side::Short => bar.high >= stop,
                };
                breached.then_some((BracketHit::TrailingStop, stop))
            }
        }
    }

    /// Move the trail after the position's watermarks absorbed a bar.
    pub fn advance(&mut self, position: &Position) {
        let BracketSpec::Trailing {
            distance,
            activation_offset,
        } = self.spec
        else {
            return;
        };

        let (favorable_move, proposed) = match self.side {
            Side::Long => {
                let best = position.highest_price_since_entry;
                (best - self.entry, best - distance)
            }
            Side::Short => {
                let best = position.lowest_price_since_entry;
                (self.entry - best, best + distance)
            }
        };
        if !self.trail_armed && favorable_move >= activation_offset {
            self.trail_armed = true;
        }
        if self.trail_armed {
            self.trail.apply(proposed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars_ohlc;

    fn bar(high: f64, low: f64) -> Bar {
        make_bars_ohlc(&[(low, high, low, high)])[0]
    }

    #[test]
    fn fixed_levels_long_and_short() {
        assert_eq!(
            BracketSpec::for_entry(Side::Long, 100.0, 3.0, 1.5, false),
            BracketSpec::Fixed {
                take_profit: 103.0,
                stop_loss: 98.5
            }
        );
        assert_eq!(
            BracketSpec::for_entry(Side::Short, 100.0, 3.0, 1.5, false),
            BracketSpec::Fixed {
                take_profit: 97.0,
                stop_loss: 101.5
            }
        );
    }

    #[test]
    fn trailing_spec_distances() {
        assert_eq!(
            BracketSpec::for_entry(Side::Long, 200.0, 3.0, 1.5, true),
            BracketSpec::Trailing {
                distance: 3.0,
                activation_offset: 6.0
            }
        );
    }

    #[test]
    fn long_stop_and_target() {
        let spec = BracketSpec::for_entry(Side::Long, 100.0, 3.0, 1.5, false);
        let state = BracketState::new(spec, Side::Long, 100.0);
        assert_eq!(state.check(&bar(101.0, 99.0)), None);
        assert_eq!(
            state.check(&bar(101.0, 98.0)),
            Some((BracketHit::StopLoss, 98.5))
        );
        assert_eq!(
            state.check(&bar(103.5, 99.0)),
            Some((BracketHit::TakeProfit, 103.0))
        );
    }

    #[test]
    fn both_levels_in_range_resolves_to_stop() {
        let spec = BracketSpec::for_entry(Side::Short, 100.0, 3.0, 1.5, false);
        let state = BracketState::new(spec, Side::Short, 100.0);
        assert_eq!(
            state.check(&bar(102.0, 96.0)),
            Some((BracketHit::StopLoss, 101.5))
        );
    }

    #[test]
    fn trailing_arms_after_activation_then_ratchets() {
        let at = bar(0.0, 0.0).timestamp;
        let spec = BracketSpec::for_entry(Side::Long, 100.0, 3.0, 1.5, true);
        let mut state = BracketState::new(spec, Side::Long, 100.0);
        let mut pos = Position::open(Side::Long, 100.0, 0, at);

        // Not armed yet: no stop, any dip is tolerated
        pos.observe(102.0, 95.0);
        state.advance(&pos);
        assert_eq!(state.trailing_stop(), None);
        assert_eq!(state.check(&bar(101.0, 90.0)), None);

        // +3 reached: armed, stop = 103 - 1.5
        pos.observe(103.0, 101.0);
        state.advance(&pos);
        assert_eq!(state.trailing_stop(), Some(101.5));

        // New high raises the stop
        pos.observe(106.0, 104.0);
        state.advance(&pos);
        assert_eq!(state.trailing_stop(), Some(104.5));

        assert_eq!(
            state.check(&bar(105.0, 104.0)),
            Some((BracketHit::TrailingStop, 104.5))
        );
    }

    #[test]
    fn short_trailing_mirror() {
        let at = bar(0.0, 0.0).timestamp;
        let spec = BracketSpec::for_entry(Side::Short, 100.0, 3.0, 1.5, true);
        let mut state = BracketState::new(spec, Side::Short, 100.0);
        let mut pos = Position::open(Side::Short, 100.0, 0, at);

        pos.observe(100.5, 96.0);
        state.advance(&pos);
        assert_eq!(state.trailing_stop(), Some(97.5));
        assert_eq!(
            state.check(&bar(98.0, 97.0)),
            Some((BracketHit::TrailingStop, 97.5))
        );
    }
}
