//! Helpers for ingestion collaborators: series cleanup and HTF alignment.

pub mod align;
pub mod canonicalize;

pub use align::{align_higher_timeframe, check_visible, close_time};
pub use canonicalize::canonicalize;
