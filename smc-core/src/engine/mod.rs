//! Per-instrument tick pipeline and batch replay.

pub mod output;
pub mod pipeline;
pub mod replay;

pub use output::TickOutput;
pub use pipeline::Pipeline;
pub use replay::{replay, ReplayResult, ReplaySummary, TradeRecord};
