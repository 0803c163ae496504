/// Ratchet for trailing stop levels
///
/// **Core Rule:** a trailing stop may tighten, never loosen.
/// - Long: the level only rises (max of current and proposed)
/// - Short: the level only falls (min of current and proposed)
use crate::domain::Side;

#[derive(Debug, Clone, PartialEq)]
pub struct RatchetState {
    current_level: Option<f64>,
    side: Side,
}

impl RatchetState {
    pub fn new(side: Side) -> Self {
        Self {
            current_level: None,
            side,
        }
    }

    /// Apply the ratchet to a proposed level and return the effective level.
    ///
    /// # Example
    /// ```
    /// use smc_core::domain::Side;
    /// use smc_core::position_management::RatchetState;
    ///
    /// let mut ratchet = RatchetState::new(Side::Long);
    /// assert_eq!(ratchet.apply(95.0), 95.0);
    /// assert_eq!(ratchet.apply(100.0), 100.0); // tightened
    /// assert_eq!(ratchet.apply(90.0), 100.0); // loosening blocked
    /// ```
    pub fn apply(&mut self, proposed: f64) -> f64 {
        let level = match (self.current_level, self.side) {
            (None, _) => proposed,
            (Some(current), Side::Long) => current.max(proposed),
            (Some(current), Side::Short) => current.min(proposed),
        };
        self.current_level = Some(level);
        level
    }

    pub fn current_level(&self) -> Option<f64> {
        self.current_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_tightens_only() {
        let mut ratchet = RatchetState::new(Side::Long);
        assert_eq!(ratchet.current_level(), None);
        assert_eq!(ratchet.apply(95.0), 95.0);
        assert_eq!(ratchet.apply(100.0), 100.0);
        assert_eq!(ratchet.apply(90.0), 100.0);
        assert_eq!(ratchet.current_level(), Some(100.0));
    }

    #[test]
    fn short_tightens_only() {
        let mut ratchet = RatchetState::new(Side::Short);
        assert_eq!(ratchet.apply(105.0), 105.0);
        assert_eq!(ratchet.apply(100.0), 100.0);
        assert_eq!(ratchet.apply(110.0), 100.0);
    }
}
