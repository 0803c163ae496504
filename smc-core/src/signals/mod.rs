//! Entry-signal composition.

pub mod composer;

pub use composer::{EntryGate, LiquidityRange, SignalComposer, SignalDecision, RANGE_PERIOD};
