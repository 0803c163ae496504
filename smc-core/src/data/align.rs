//! No-lookahead alignment of a higher timeframe onto the base timeframe.
//!
//! Bars are stamped with their open time. A higher-timeframe bar becomes
//! visible to a base bar only once it has closed, i.e. when
//! `htf.timestamp + htf_tf <= base.timestamp + base_tf`. Until then the base
//! bar sees the previous closed HTF bar (or nothing).

use chrono::NaiveDateTime;

use crate::domain::{Bar, Timeframe};
use crate::error::AlignmentError;

/// Close time of a bar on the given timeframe.
pub fn close_time(bar: &Bar, tf: Timeframe) -> NaiveDateTime {
    bar.timestamp + tf.duration()
}

/// Reject an HTF bar a base bar is not allowed to see yet.
pub fn check_visible(
    base: &Bar,
    base_tf: Timeframe,
    htf: &Bar,
    htf_tf: Timeframe,
) -> Result<(), AlignmentError> {
    if !htf.is_final {
        return Err(AlignmentError::HtfNotFinal(htf.timestamp));
    }
    let htf_close = close_time(htf, htf_tf);
    let base_close = close_time(base, base_tf);
    if htf_close > base_close {
        return Err(AlignmentError::HtfNotClosed {
            htf_close,
            base_close,
        });
    }
    Ok(())
}

/// For each base bar, the latest HTF bar closed by the base bar's close.
///
/// Both inputs must be sorted by timestamp. Non-final HTF bars are skipped.
pub fn align_higher_timeframe(
    base: &[Bar],
    base_tf: Timeframe,
    htf: &[Bar],
    htf_tf: Timeframe,
) -> Vec<Option<Bar>> {
    let mut aligned = Vec::with_capacity(base.len());
    let mut next = 0;
    let mut visible: Option<Bar> = None;

    for bar in base {
        let base_close = close_time(bar, base_tf);
        while let Some(candidate) = htf.get(next) {
            if close_time(candidate, htf_tf) > base_close {
                break;
            }
            if candidate.is_final {
                visible = Some(*candidate);
            }
            next += 1;
        }
        aligned.push(visible);
    }
    aligned
}
