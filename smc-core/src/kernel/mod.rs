//! Gaussian kernel regression channel.

pub mod channel;

pub use channel::{
    gaussian_weight, KernelChannel, KernelMode, KernelRegressionChannel, KernelState,
    MAX_KERNEL_WINDOW, MIN_KERNEL_WINDOW,
};
