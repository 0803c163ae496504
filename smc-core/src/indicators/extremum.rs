//! Rolling highest / lowest over a [`RollingWindow`].
//!
//! `offset` shifts the window back in time: `offset = 1` evaluates the
//! extremum one bar back, excluding the current value.

use super::window::RollingWindow;

/// Which side of the range to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Highest,
    Lowest,
}

impl<T: Copy> RollingWindow<T> {
    /// Extremum of `field` over indices `offset..offset + period`.
    ///
    /// Returns `None` when the window does not yet hold that much history.
    pub fn extremum<F>(&self, field: F, kind: Extremum, period: usize, offset: usize) -> Option<f64>
    where
        F: Fn(&T) -> f64,
    {
        if period == 0 || !self.has(offset + period) {
            return None;
        }
        let values = (offset..offset + period).filter_map(|k| self.get(k).map(|v| field(&v)));
        let out = match kind {
            Extremum::Highest => values.fold(f64::NEG_INFINITY, f64::max),
            Extremum::Lowest => values.fold(f64::INFINITY, f64::min),
        };
        Some(out)
    }

    pub fn highest<F>(&self, field: F, period: usize, offset: usize) -> Option<f64>
    where
        F: Fn(&T) -> f64,
    {
        self.extremum(field, Extremum::Highest, period, offset)
    }

    pub fn lowest<F>(&self, field: F, period: usize, offset: usize) -> Option<f64>
    where
        F: Fn(&T) -> f64,
    {
        self.extremum(field, Extremum::Lowest, period, offset)
    }
}
