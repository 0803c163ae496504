//! SMC Core: streaming smart-money-concepts signal engine.
//!
//! One [`engine::Pipeline`] per instrument consumes final base-timeframe bars
//! (plus the latest closed higher-timeframe bar) and emits per-tick output:
//! - Market-structure detectors (structure, order blocks, FVG, liquidity sweeps)
//! - Multi-timeframe trend alignment and volume confirmation
//! - Composed long/short entry signals
//! - Position lifecycle with fixed or trailing brackets and a bar budget
//! - A Gaussian kernel regression channel (rolling or repainting endpoint fit)
//!
//! The core never fills orders. It emits declarative [`position_management::OrderIntent`]s.

pub mod config;
pub mod data;
pub mod detectors;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod kernel;
pub mod position_management;
pub mod signals;
pub mod trend;

pub use config::StrategyConfig;
pub use engine::{Pipeline, TickOutput};
pub use error::{AlignmentError, ConfigError, EngineError, NumericError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: a pipeline and its output can move across threads,
    /// so independent instruments can be replayed in parallel.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();

        require_send::<Pipeline>();
        require_sync::<Pipeline>();
        require_send::<TickOutput>();
        require_sync::<TickOutput>();
        require_send::<StrategyConfig>();
        require_sync::<StrategyConfig>();
        require_send::<EngineError>();
        require_sync::<EngineError>();

        require_send::<kernel::KernelRegressionChannel>();
        require_sync::<kernel::KernelRegressionChannel>();
        require_send::<position_management::PositionLifecycleManager>();
        require_sync::<position_management::PositionLifecycleManager>();
        require_send::<engine::ReplayResult>();
        require_sync::<engine::ReplayResult>();
    }
}
