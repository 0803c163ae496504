//! Cleanup of raw bar series before they reach a pipeline.

use tracing::warn;

use crate::domain::Bar;

/// Sort by timestamp, collapse duplicate timestamps and drop bars that fail
/// the OHLC sanity checks.
///
/// For a duplicated timestamp the first final row wins. When no row is final
/// the latest live row is kept.
pub fn canonicalize(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.timestamp);

    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(kept) if kept.timestamp == bar.timestamp => {
                warn!(at = %bar.timestamp, "dropped duplicate bar");
                if !kept.is_final {
                    *kept = bar;
                }
            }
            _ => deduped.push(bar),
        }
    }

    let before = deduped.len();
    deduped.retain(Bar::is_sane);
    let dropped = before - deduped.len();
    if dropped > 0 {
        warn!(dropped, "dropped malformed bars");
    }
    deduped
}
