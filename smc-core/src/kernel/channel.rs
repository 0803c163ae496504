//! Kernel-smoothed price channel with a mean-absolute-deviation band.
//!
//! Two modes, fixed at construction:
//!
//! - **Rolling**: causal. Each bar's center is the Gaussian-weighted average of
//!   the trailing window (lag 0 weighted highest). A value, once emitted, never
//!   changes.
//! - **Endpoint**: repainting. Every bar refits the whole window with a
//!   symmetric kernel, so the smoothed value for a given historical bar can
//!   differ depending on when it is read. The revised curve is available from
//!   [`KernelRegressionChannel::curve`]. Nothing is emitted until the window
//!   is full.
//!
//! Lags whose weight underflows to exactly zero are skipped, which leaves every
//! sum unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EngineError, NumericError};
use crate::indicators::RollingWindow;

pub const MIN_KERNEL_WINDOW: usize = 2;
/// Endpoint mode refits the whole window per tick, costing
/// `window × min(window, 2 × support)` multiply-adds, where the support is
/// about `38.6 × bandwidth` lags.
pub const MAX_KERNEL_WINDOW: usize = 2000;

/// `exp(-x² / (2h²))`
pub fn gaussian_weight(x: f64, bandwidth: f64) -> f64 {
    (-(x * x) / (bandwidth * bandwidth * 2.0)).exp()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum KernelMode {
    Rolling { bandwidth: f64, window: usize },
    Endpoint { bandwidth: f64, window: usize },
}

impl KernelMode {
    pub fn bandwidth(&self) -> f64 {
        match *self {
            Self::Rolling { bandwidth, .. } | Self::Endpoint { bandwidth, .. } => bandwidth,
        }
    }

    pub fn window(&self) -> usize {
        match *self {
            Self::Rolling { window, .. } | Self::Endpoint { window, .. } => window,
        }
    }

    pub fn is_repainting(&self) -> bool {
        matches!(self, Self::Endpoint { .. })
    }
}

/// Kernel weights by lag and their total.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelState {
    pub coefficients: Vec<f64>,
    pub normalizing_sum: f64,
    /// Leading lags with a nonzero weight.
    pub support: usize,
}

impl KernelState {
    pub fn new(bandwidth: f64, window: usize) -> Result<Self, NumericError> {
        let coefficients: Vec<f64> = (0..window)
            .map(|i| gaussian_weight(i as f64, bandwidth))
            .collect();
        let normalizing_sum = coefficients.iter().sum();
        check_weight_sum(normalizing_sum)?;
        let support = coefficients.iter().take_while(|w| **w > 0.0).count();
        Ok(Self {
            coefficients,
            normalizing_sum,
            support,
        })
    }

    /// Weight sum over the first `len` lags.
    pub fn partial_sum(&self, len: usize) -> f64 {
        self.coefficients.iter().take(len.min(self.support)).sum()
    }

    /// Window positions within reach of position `p`.
    fn reach(&self, p: usize) -> std::ops::Range<usize> {
        let lo = p.saturating_sub(self.support.saturating_sub(1));
        let hi = (p + self.support).min(self.coefficients.len());
        lo..hi
    }

    /// Symmetric weight sum for every window position.
    fn endpoint_sums(&self) -> Result<Vec<f64>, NumericError> {
        (0..self.coefficients.len())
            .map(|p| {
                let sum: f64 = self
                    .reach(p)
                    .map(|q| self.coefficients[p.abs_diff(q)])
                    .sum();
                check_weight_sum(sum)
            })
            .collect()
    }
}

fn check_weight_sum(sum: f64) -> Result<f64, NumericError> {
    if sum.is_finite() && sum > 0.0 {
        Ok(sum)
    } else {
        Err(NumericError::DegenerateWeights(sum))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelChannel {
    pub center: f64,
    pub upper: f64,
    pub lower: f64,
}

impl KernelChannel {
    fn new(center: f64, half_width: f64) -> Self {
        Self {
            center,
            upper: center + half_width,
            lower: center - half_width,
        }
    }

    pub fn half_width(&self) -> f64 {
        self.upper - self.center
    }
}

#[derive(Debug, Clone)]
pub struct KernelRegressionChannel {
    mode: KernelMode,
    multiplier: f64,
    state: KernelState,
    /// Endpoint mode: normalizer per window position. Empty in rolling mode.
    endpoint_sums: Vec<f64>,
    prices: RollingWindow<f64>,
    /// Rolling mode: |price - center| per bar.
    residuals: RollingWindow<f64>,
}

impl KernelRegressionChannel {
    pub fn new(mode: KernelMode, multiplier: f64) -> Result<Self, EngineError> {
        let bandwidth = mode.bandwidth();
        let window = mode.window();
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(ConfigError::InvalidBandwidth(bandwidth).into());
        }
        if !(multiplier.is_finite() && multiplier >= 0.0) {
            return Err(ConfigError::InvalidMultiplier(multiplier).into());
        }
        if !(MIN_KERNEL_WINDOW..=MAX_KERNEL_WINDOW).contains(&window) {
            return Err(ConfigError::KernelWindowOutOfRange {
                got: window,
                min: MIN_KERNEL_WINDOW,
                max: MAX_KERNEL_WINDOW,
            }
            .into());
        }

        let state = KernelState::new(bandwidth, window)?;
        let endpoint_sums = if mode.is_repainting() {
            state.endpoint_sums()?
        } else {
            Vec::new()
        };
        Ok(Self {
            mode,
            multiplier,
            state,
            endpoint_sums,
            prices: RollingWindow::new(window),
            residuals: RollingWindow::new(window),
        })
    }

    pub fn mode(&self) -> KernelMode {
        self.mode
    }

    pub fn state(&self) -> &KernelState {
        &self.state
    }

    /// Fold in one price. Non-finite input is rejected without touching state.
    pub fn update(&mut self, price: f64) -> Result<Option<KernelChannel>, NumericError> {
        if !price.is_finite() {
            return Err(NumericError::NonFinite {
                what: "kernel",
                value: price,
            });
        }
        self.prices.push(price);
        match self.mode {
            KernelMode::Rolling { .. } => self.rolling(price).map(Some),
            KernelMode::Endpoint { .. } => Ok(self.endpoint()),
        }
    }

    /// Endpoint mode: smoothed values for the whole window as of the last
    /// update, newest bar first. `None` in rolling mode or before the window
    /// fills.
    pub fn curve(&self) -> Option<Vec<f64>> {
        let prices = self.endpoint_prices()?;
        Some((0..prices.len()).map(|p| self.fit(&prices, p)).collect())
    }

    fn rolling(&mut self, price: f64) -> Result<KernelChannel, NumericError> {
        let m = self.prices.len();
        let denominator = check_weight_sum(self.state.partial_sum(m))?;
        let numerator: f64 = self
            .prices
            .iter()
            .take(self.state.support)
            .zip(&self.state.coefficients)
            .map(|(p, w)| p * w)
            .sum();
        let center = numerator / denominator;

        self.residuals.push((price - center).abs());
        let mad = self.residuals.iter().sum::<f64>() / self.residuals.len() as f64;

        Ok(KernelChannel::new(center, self.multiplier * mad))
    }

    fn endpoint_prices(&self) -> Option<Vec<f64>> {
        (self.mode.is_repainting() && self.prices.is_full()).then(|| self.prices.iter().collect())
    }

    /// Symmetric fit at window position `p` (0 = newest).
    fn fit(&self, prices: &[f64], p: usize) -> f64 {
        let numerator: f64 = self
            .state
            .reach(p)
            .map(|q| prices[q] * self.state.coefficients[p.abs_diff(q)])
            .sum();
        numerator / self.endpoint_sums[p]
    }

    fn endpoint(&self) -> Option<KernelChannel> {
        let prices = self.endpoint_prices()?;
        let mut center = 0.0;
        let mut abs_dev = 0.0;
        for (p, &price) in prices.iter().enumerate() {
            let y = self.fit(&prices, p);
            if p == 0 {
                center = y;
            }
            abs_dev += (price - y).abs();
        }
        let mad = abs_dev / prices.len() as f64;
        Some(KernelChannel::new(center, self.multiplier * mad))
    }
}
