//! Single-instrument, bar-synchronous pipeline.
//!
//! One committed tick per final base bar, evaluated in dependency order:
//! detectors, trend aligner, composer, lifecycle manager, then the kernel
//! channel (which only sees the close). Every input check runs before any
//! state changes, so a rejected tick leaves the pipeline exactly as it was.
//!
//! Pipelines share nothing; run one per instrument, on any thread.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::config::StrategyConfig;
use crate::data::check_visible;
use crate::detectors::{
    DetectorFlags, FairValueGapDetector, LiquiditySweepDetector, MarketStructureDetector,
    OrderBlockDetector, MAX_LOOKBACK,
};
use crate::domain::{Bar, PositionState, Timeframe};
use crate::error::{AlignmentError, EngineError, NumericError};
use crate::indicators::RollingWindow;
use crate::kernel::KernelRegressionChannel;
use crate::position_management::PositionLifecycleManager;
use crate::signals::{LiquidityRange, SignalComposer};
use crate::trend::TrendAligner;

use super::output::TickOutput;

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: StrategyConfig,
    base_tf: Timeframe,
    htf_tf: Timeframe,
    history: RollingWindow<Bar>,
    /// Committed ticks so far; also the index the next bar will get.
    ticks: usize,
    last_timestamp: Option<NaiveDateTime>,
    structure: MarketStructureDetector,
    order_blocks: OrderBlockDetector,
    fvg: FairValueGapDetector,
    sweeps: LiquiditySweepDetector,
    trend: TrendAligner,
    composer: SignalComposer,
    lifecycle: PositionLifecycleManager,
    kernel: KernelRegressionChannel,
}

impl Pipeline {
    /// Validate the configuration and build a fresh pipeline.
    pub fn new(config: StrategyConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let kernel = KernelRegressionChannel::new(config.kernel_mode(), config.kernel.multiplier)?;
        Ok(Self {
            base_tf: config.timeframes.entry,
            htf_tf: config.timeframes.higher,
            history: RollingWindow::new(MAX_LOOKBACK),
            ticks: 0,
            last_timestamp: None,
            structure: MarketStructureDetector,
            order_blocks: OrderBlockDetector::new(config.detectors.order_block_lookback),
            fvg: FairValueGapDetector,
            sweeps: LiquiditySweepDetector::new(config.detectors.liquidity_aggressiveness),
            trend: TrendAligner::new(),
            composer: SignalComposer::new(config.risk.enable_long, config.risk.enable_short),
            lifecycle: PositionLifecycleManager::new(config.lifecycle_params()),
            kernel,
            config,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn bars_processed(&self) -> usize {
        self.ticks
    }

    /// Committed bars before the entry trend and volume filters can all fire.
    pub fn warmup_bars(&self) -> usize {
        self.trend.entry_warmup()
    }

    pub fn position_state(&self) -> PositionState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> &PositionLifecycleManager {
        &self.lifecycle
    }

    /// Kernel channel, e.g. for the repainted curve in endpoint mode.
    pub fn kernel(&self) -> &KernelRegressionChannel {
        &self.kernel
    }

    pub fn order_blocks(&self) -> &OrderBlockDetector {
        &self.order_blocks
    }

    /// Commit one base bar together with the latest closed HTF bar, if any.
    ///
    /// A bar that is not final is not committed: it is evaluated as
    /// [`Pipeline::preview`] would.
    pub fn on_bar(&mut self, bar: &Bar, htf: Option<&Bar>) -> Result<TickOutput, EngineError> {
        if !bar.is_final {
            return self.preview(bar, htf);
        }
        if let Err(err) = self.validate(bar, htf) {
            warn!(at = %bar.timestamp, %err, "tick rejected");
            return Err(err);
        }
        self.advance(bar, htf, true)
    }

    /// Evaluate a live bar against a scratch copy of the state.
    ///
    /// Detectors and signals are reported as if the bar closed now, except
    /// that fair-value gaps never fire on a live bar. No intent is emitted
    /// and the pipeline itself is untouched.
    pub fn preview(&self, bar: &Bar, htf: Option<&Bar>) -> Result<TickOutput, EngineError> {
        self.validate(bar, htf)?;
        let live = Bar {
            is_final: false,
            ..*bar
        };
        let mut scratch = self.clone();
        scratch.advance(&live, htf, false)
    }

    fn validate(&self, bar: &Bar, htf: Option<&Bar>) -> Result<(), EngineError> {
        check_bar_finite(bar)?;
        if let Some(last) = self.last_timestamp {
            if bar.timestamp <= last {
                return Err(AlignmentError::BaseOutOfOrder {
                    got: bar.timestamp,
                    last,
                }
                .into());
            }
        }
        if let Some(htf) = htf {
            check_bar_finite(htf)?;
            check_visible(bar, self.base_tf, htf, self.htf_tf)?;
            if let Some(last) = self.trend.last_htf_timestamp() {
                if htf.timestamp < last {
                    return Err(AlignmentError::HtfOutOfOrder {
                        got: htf.timestamp,
                        last,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn advance(
        &mut self,
        bar: &Bar,
        htf: Option<&Bar>,
        commit: bool,
    ) -> Result<TickOutput, EngineError> {
        let bar_index = self.ticks;
        self.history.push(*bar);

        let flags = DetectorFlags {
            structure: self.structure.evaluate(&self.history),
            order_blocks: self.order_blocks.evaluate(&self.history, bar_index),
            fvg: self.fvg.evaluate(&self.history),
            sweeps: self.sweeps.evaluate(&self.history),
        };
        let trend = self.trend.update(bar, htf)?;
        let liquidity_range = LiquidityRange::from_history(&self.history);

        let gate = self.lifecycle.gate(bar_index);
        let signals = self
            .composer
            .compose(bar, &flags, &trend, &liquidity_range, gate);
        if signals.long_setup && signals.short_setup {
            warn!(bar_index, "long and short setups on the same bar");
        }

        let intent = if commit {
            self.lifecycle.on_bar(bar, bar_index, &signals)
        } else {
            None
        };
        let kernel = self.kernel.update(bar.close)?;

        if commit {
            self.ticks += 1;
            self.last_timestamp = Some(bar.timestamp);
        }
        debug!(bar_index, ?flags, ?trend, ?signals, provisional = !commit, "tick");

        Ok(TickOutput {
            bar_index,
            timestamp: bar.timestamp,
            provisional: !commit,
            flags,
            trend,
            liquidity_range,
            signals,
            position_state: self.lifecycle.state(),
            intent,
            kernel,
        })
    }
}

fn check_bar_finite(bar: &Bar) -> Result<(), NumericError> {
    let fields = [
        ("bar open", bar.open),
        ("bar high", bar.high),
        ("bar low", bar.low),
        ("bar close", bar.close),
        ("bar volume", bar.volume),
    ];
    match fields.into_iter().find(|(_, v)| !v.is_finite()) {
        Some((what, value)) => Err(NumericError::NonFinite { what, value }),
        None => Ok(()),
    }
}
