//! Domain types: bars, timeframes, positions.

pub mod bar;
pub mod position;
pub mod timeframe;

pub use bar::Bar;
pub use position::{Position, PositionState, Side};
pub use timeframe::Timeframe;
