//! Error taxonomy for the pipeline.
//!
//! Insufficient history is deliberately absent: detectors report "no signal"
//! for it instead of failing. Everything here is synchronous and local to the
//! tick (or the construction step) where it occurs; nothing is retried.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Invalid configuration, rejected before the first tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("kernel bandwidth must be finite and > 0, got {0}")]
    InvalidBandwidth(f64),

    #[error("kernel multiplier must be finite and >= 0, got {0}")]
    InvalidMultiplier(f64),

    #[error("kernel window must be in [{min}, {max}], got {got}")]
    KernelWindowOutOfRange { got: usize, min: usize, max: usize },

    #[error("take-profit % must be in [0.5, 10], got {0}")]
    TakeProfitOutOfRange(f64),

    #[error("stop-loss % must be in [0.5, 5], got {0}")]
    StopLossOutOfRange(f64),

    #[error("liquidity aggressiveness must be in [2, 8], got {0}")]
    AggressivenessOutOfRange(u32),

    #[error("order-block lookback must be in [3, 20], got {0}")]
    OrderBlockLookback(usize),

    #[error("timeframe identifier is empty")]
    EmptyTimeframe,

    #[error("unknown timeframe '{0}' (expected one of 15min, 1H, 4H, 1D)")]
    UnknownTimeframe(String),

    #[error("higher timeframe {higher} must be coarser than entry timeframe {entry}")]
    TimeframeOrder { higher: String, entry: String },

    #[error("bar budget must be > 0 when enforced")]
    ZeroBarBudget,

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Higher-timeframe data that would leak future information into a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    #[error("higher-timeframe bar closing at {htf_close} is not visible at base close {base_close}")]
    HtfNotClosed {
        htf_close: NaiveDateTime,
        base_close: NaiveDateTime,
    },

    #[error("higher-timeframe bar at {0} is not final")]
    HtfNotFinal(NaiveDateTime),

    #[error("higher-timeframe bar at {got} precedes previously seen bar at {last}")]
    HtfOutOfOrder {
        got: NaiveDateTime,
        last: NaiveDateTime,
    },

    #[error("base bar at {got} does not follow previous bar at {last}")]
    BaseOutOfOrder {
        got: NaiveDateTime,
        last: NaiveDateTime,
    },
}

/// Computation that would otherwise emit NaN/Inf into downstream signals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    #[error("kernel weight sum is degenerate ({0})")]
    DegenerateWeights(f64),

    #[error("non-finite input to {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

/// Umbrella error returned by [`crate::engine::Pipeline`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error(transparent)]
    Numeric(#[from] NumericError),
}
