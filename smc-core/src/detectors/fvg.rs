//! Three-bar fair-value gap detection, gated on bar confirmation.
//!
//! Up: low two bars back > high one bar back, and close > high two bars back.
//! Down: high two bars back < low one bar back, and close < low two bars back.
//!
//! A live bar (`is_final == false`) always evaluates to no gap, so the flag
//! cannot toggle while the bar is still forming.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FvgFlags {
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FairValueGapDetector;

impl FairValueGapDetector {
    pub fn evaluate(&self, history: &RollingWindow<Bar>) -> FvgFlags {
        let (Some(cur), Some(b1), Some(b2)) = (history.get(0), history.get(1), history.get(2))
        else {
            return FvgFlags::default();
        };
        if !cur.is_final {
            return FvgFlags::default();
        }

        FvgFlags {
            up: b2.low > b1.high && cur.close > b2.high,
            down: b2.high < b1.low && cur.close < b2.low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars_ohlc;

    fn window(bars: Vec<Bar>) -> RollingWindow<Bar> {
        let mut w = RollingWindow::new(20);
        for b in bars {
            w.push(b);
        }
        w
    }

    fn gap_up_bars() -> Vec<Bar> {
        make_bars_ohlc(&[
            (10.0, 11.0, 10.0, 10.8), // low 10.0
            (9.0, 9.5, 8.5, 9.2),     // high 9.5 < 10.0
            (9.2, 11.5, 9.0, 11.2),   // close 11.2 > 11.0
        ])
    }

    #[test]
    fn upward_gap_on_final_bar() {
        let flags = FairValueGapDetector.evaluate(&window(gap_up_bars()));
        assert!(flags.up);
        assert!(!flags.down);
    }

    #[test]
    fn live_bar_never_fires() {
        let mut bars = gap_up_bars();
        bars[2].is_final = false;
        assert_eq!(
            FairValueGapDetector.evaluate(&window(bars)),
            FvgFlags::default()
        );
    }

    #[test]
    fn close_inside_range_does_not_fire() {
        let mut bars = gap_up_bars();
        bars[2].close = 10.9;
        assert!(!FairValueGapDetector.evaluate(&window(bars)).up);
    }

    #[test]
    fn downward_gap_mirror() {
        let bars = make_bars_ohlc(&[
            (10.0, 10.5, 9.5, 10.2), // high 10.5
            (11.5, 12.0, 11.0, 11.8), // low 11.0 > 10.5
            (11.8, 11.9, 9.0, 9.2),  // close 9.2 < 9.5
        ]);
        let flags = FairValueGapDetector.evaluate(&window(bars));
        assert!(flags.down);
        assert!(!flags.up);
    }

    #[test]
    fn needs_three_bars() {
        let bars = gap_up_bars().into_iter().skip(1).collect();
        assert_eq!(
            FairValueGapDetector.evaluate(&window(bars)),
            FvgFlags::default()
        );
    }
}
