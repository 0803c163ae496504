//! Strategy configuration, loaded once per run from TOML.
//!
//! Every field has a default, so an empty document is a valid config.
//! `validate` is called by [`crate::engine::Pipeline::new`]; a pipeline never
//! starts with an invalid configuration.

use serde::{Deserialize, Serialize};

use crate::detectors::{MAX_AGGRESSIVENESS, MAX_LOOKBACK, MIN_AGGRESSIVENESS};
use crate::domain::Timeframe;
use crate::error::ConfigError;
use crate::kernel::{KernelMode, MAX_KERNEL_WINDOW, MIN_KERNEL_WINDOW};
use crate::position_management::LifecycleParams;

pub const MIN_ORDER_BLOCK_LOOKBACK: usize = 3;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    pub timeframes: TimeframeConfig,
    pub detectors: DetectorConfig,
    pub risk: RiskConfig,
    pub kernel: KernelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeframeConfig {
    pub higher: Timeframe,
    /// Also the base timeframe the pipeline ticks on.
    pub entry: Timeframe,
}

impl Default for TimeframeConfig {
    fn default() -> Self {
        Self {
            higher: Timeframe::D1,
            entry: Timeframe::H1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub order_block_lookback: usize,
    /// 2 = widest sweep window (10 - 2 = 8 bars), 8 = narrowest (2 bars).
    pub liquidity_aggressiveness: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            order_block_lookback: 3,
            liquidity_aggressiveness: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskConfig {
    pub enable_long: bool,
    pub enable_short: bool,
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
    pub trailing: bool,
    pub bar_budget: usize,
    pub enforce_bar_budget: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            enable_long: true,
            enable_short: true,
            take_profit_pct: 3.0,
            stop_loss_pct: 1.5,
            trailing: false,
            bar_budget: 500,
            enforce_bar_budget: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub bandwidth: f64,
    pub multiplier: f64,
    pub window: usize,
    /// Endpoint (repainting) fit instead of the causal rolling estimate.
    pub repaint: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            bandwidth: 8.0,
            multiplier: 3.0,
            window: 500,
            repaint: false,
        }
    }
}

impl StrategyConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let TimeframeConfig { higher, entry } = self.timeframes;
        if higher <= entry {
            return Err(ConfigError::TimeframeOrder {
                higher: higher.to_string(),
                entry: entry.to_string(),
            });
        }

        let lookback = self.detectors.order_block_lookback;
        if !(MIN_ORDER_BLOCK_LOOKBACK..=MAX_LOOKBACK).contains(&lookback) {
            return Err(ConfigError::OrderBlockLookback(lookback));
        }
        let aggr = self.detectors.liquidity_aggressiveness;
        if !(MIN_AGGRESSIVENESS..=MAX_AGGRESSIVENESS).contains(&aggr) {
            return Err(ConfigError::AggressivenessOutOfRange(aggr));
        }

        let risk = &self.risk;
        if !(0.5..=10.0).contains(&risk.take_profit_pct) {
            return Err(ConfigError::TakeProfitOutOfRange(risk.take_profit_pct));
        }
        if !(0.5..=5.0).contains(&risk.stop_loss_pct) {
            return Err(ConfigError::StopLossOutOfRange(risk.stop_loss_pct));
        }
        if risk.enforce_bar_budget && risk.bar_budget == 0 {
            return Err(ConfigError::ZeroBarBudget);
        }

        let kernel = &self.kernel;
        if !(kernel.bandwidth.is_finite() && kernel.bandwidth > 0.0) {
            return Err(ConfigError::InvalidBandwidth(kernel.bandwidth));
        }
        if !(kernel.multiplier.is_finite() && kernel.multiplier >= 0.0) {
            return Err(ConfigError::InvalidMultiplier(kernel.multiplier));
        }
        if !(MIN_KERNEL_WINDOW..=MAX_KERNEL_WINDOW).contains(&kernel.window) {
            return Err(ConfigError::KernelWindowOutOfRange {
                got: kernel.window,
                min: MIN_KERNEL_WINDOW,
                max: MAX_KERNEL_WINDOW,
            });
        }
        Ok(())
    }

    pub fn lifecycle_params(&self) -> LifecycleParams {
        LifecycleParams {
            take_profit_pct: self.risk.take_profit_pct,
            stop_loss_pct: self.risk.stop_loss_pct,
            trailing: self.risk.trailing,
            bar_budget: self
                .risk
                .enforce_bar_budget
                .then_some(self.risk.bar_budget),
        }
    }

    pub fn kernel_mode(&self) -> KernelMode {
        let KernelConfig {
            bandwidth,
            window,
            repaint,
            ..
        } = self.kernel;
        if repaint {
            KernelMode::Endpoint { bandwidth, window }
        } else {
            KernelMode::Rolling { bandwidth, window }
        }
    }

    /// Content hash identifying this configuration in replay output.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_vec(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(blake3::hash(&json).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = StrategyConfig::from_toml_str("").unwrap();
        assert_eq!(config, StrategyConfig::default());
        assert_eq!(config.timeframes.higher, Timeframe::D1);
        assert_eq!(config.lifecycle_params().bar_budget, Some(500));
        assert!(!config.kernel_mode().is_repainting());
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config = StrategyConfig::from_toml_str(
            r#"
            [timeframes]
            higher = "4H"
            entry = "15min"

            [risk]
            trailing = true
            enforce_bar_budget = false

            [kernel]
            repaint = true
            window = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.timeframes.higher, Timeframe::H4);
        assert_eq!(config.timeframes.entry, Timeframe::M15);
        assert_eq!(config.risk.take_profit_pct, 3.0);
        assert_eq!(config.lifecycle_params().bar_budget, None);
        assert_eq!(
            config.kernel_mode(),
            KernelMode::Endpoint {
                bandwidth: 8.0,
                window: 100
            }
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            ("[kernel]\nbandwidth = 0.0", ConfigError::InvalidBandwidth(0.0)),
            ("[risk]\ntake_profit_pct = 12.0", ConfigError::TakeProfitOutOfRange(12.0)),
            ("[risk]\nstop_loss_pct = 0.1", ConfigError::StopLossOutOfRange(0.1)),
            ("[risk]\nbar_budget = 0", ConfigError::ZeroBarBudget),
            (
                "[detectors]\nliquidity_aggressiveness = 9",
                ConfigError::AggressivenessOutOfRange(9),
            ),
            ("[detectors]\norder_block_lookback = 2", ConfigError::OrderBlockLookback(2)),
        ];
        for (doc, expected) in cases {
            assert_eq!(StrategyConfig::from_toml_str(doc).unwrap_err(), expected, "{doc}");
        }
    }

    #[test]
    fn higher_timeframe_must_be_coarser() {
        let err = StrategyConfig::from_toml_str("[timeframes]\nhigher = \"1H\"\nentry = \"1H\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TimeframeOrder { .. }));
    }

    #[test]
    fn bad_timeframe_and_unknown_keys_are_parse_errors() {
        let err = StrategyConfig::from_toml_str("[timeframes]\nhigher = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("empty")));
        let err = StrategyConfig::from_toml_str("[risk]\ntp = 3.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn fingerprint_tracks_parameters() {
        let a = StrategyConfig::default();
        let mut b = a.clone();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        b.kernel.multiplier = 2.0;
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn toml_round_trip() {
        let config = StrategyConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(StrategyConfig::from_toml_str(&text).unwrap(), config);
    }
}
