//! Position lifecycle: entries, bracket exits, forced flattening, bar budget.
//!
//! Everything here emits intents; fills are the execution collaborator's job.

pub mod bracket;
pub mod intent;
pub mod lifecycle;
pub mod ratchet;

pub use bracket::{BracketHit, BracketSpec, BracketState};
pub use intent::{ExitReason, IntentAction, OrderIntent};
pub use lifecycle::{LifecycleParams, PositionLifecycleManager};
pub use ratchet::RatchetState;
