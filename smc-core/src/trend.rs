//! Multi-timeframe trend alignment and volume confirmation.
//!
//! - Higher timeframe: close vs its own EMA(20) and vs its close 5 HTF bars back.
//! - Entry timeframe: close vs EMA(14), no lag term.
//! - Volume: current volume strictly above its SMA(20).
//!
//! HTF state only advances when a new (later-timestamped) HTF bar arrives; a
//! repeated HTF bar across several base bars is the same observation. The
//! EMA accumulators are seeded once at stream start and never reset.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Bar;
use crate::error::{AlignmentError, EngineError};
use crate::indicators::{Ema, RollingWindow, Sma, StreamingIndicator};

pub const HTF_EMA_PERIOD: usize = 20;
pub const HTF_LAG_BARS: usize = 5;
pub const ENTRY_EMA_PERIOD: usize = 14;
pub const VOLUME_SMA_PERIOD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrendState {
    Bullish,
    Bearish,
    #[default]
    Ranging,
}

/// Trend view for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub higher: TrendState,
    pub entry: TrendState,
    pub volume_confirmed: bool,
}

#[derive(Debug, Clone)]
pub struct TrendAligner {
    htf_ema: Ema,
    htf_closes: RollingWindow<f64>,
    htf_last: Option<NaiveDateTime>,
    htf_state: TrendState,
    entry_ema: Ema,
    volume_sma: Sma,
}

impl Default for TrendAligner {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendAligner {
    pub fn new() -> Self {
        Self {
            htf_ema: Ema::new(HTF_EMA_PERIOD),
            htf_closes: RollingWindow::new(HTF_LAG_BARS + 1),
            htf_last: None,
            htf_state: TrendState::Ranging,
            entry_ema: Ema::new(ENTRY_EMA_PERIOD),
            volume_sma: Sma::new(VOLUME_SMA_PERIOD),
        }
    }

    /// Timestamp of the last HTF bar folded into the trend state.
    pub fn last_htf_timestamp(&self) -> Option<NaiveDateTime> {
        self.htf_last
    }

    /// Base bars needed before every component can be evaluable.
    pub fn entry_warmup(&self) -> usize {
        self.entry_ema.lookback().max(self.volume_sma.lookback()) + 1
    }

    /// Fold an HTF bar in. Repeats of the last bar are ignored.
    pub fn observe_higher(&mut self, htf: &Bar) -> Result<(), EngineError> {
        match self.htf_last {
            Some(last) if htf.timestamp < last => {
                return Err(AlignmentError::HtfOutOfOrder {
                    got: htf.timestamp,
                    last,
                }
                .into());
            }
            Some(last) if htf.timestamp == last => return Ok(()),
            _ => {}
        }

        let ema = self.htf_ema.update(htf.close)?;
        self.htf_closes.push(htf.close);
        self.htf_last = Some(htf.timestamp);

        let lagged = self.htf_closes.get(HTF_LAG_BARS);
        self.htf_state = match (ema, lagged) {
            (Some(ema), Some(lagged)) if htf.close > ema && htf.close > lagged => {
                TrendState::Bullish
            }
            (Some(ema), Some(lagged)) if htf.close < ema && htf.close < lagged => {
                TrendState::Bearish
            }
            _ => TrendState::Ranging,
        };
        debug!(at = %htf.timestamp, close = htf.close, state = ?self.htf_state, "htf bar");
        Ok(())
    }

    /// Advance with a committed base bar (and its aligned HTF bar, if any).
    pub fn update(&mut self, bar: &Bar, htf: Option<&Bar>) -> Result<TrendSnapshot, EngineError> {
        if let Some(htf) = htf {
            self.observe_higher(htf)?;
        }
        let ema = self.entry_ema.update(bar.close)?;
        let volume_avg = self.volume_sma.update(bar.volume)?;

        let entry = match ema {
            Some(ema) if bar.close > ema => TrendState::Bullish,
            Some(ema) if bar.close < ema => TrendState::Bearish,
            _ => TrendState::Ranging,
        };

        Ok(TrendSnapshot {
            higher: self.htf_state,
            entry,
            volume_confirmed: volume_avg.is_some_and(|avg| bar.volume > avg),
        })
    }
}
