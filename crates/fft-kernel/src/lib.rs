//! FFT Kernel: synthetic agent signals, spectral smoothing and stability metrics.
//!
//! The crate is a set of stateless functions:
//!
//! - [`generator`] builds a [`SignalTable`] of noisy phase-shifted sine waves,
//!   one per simulated agent.
//! - [`smoother`] low-passes a series by truncating its DFT.
//! - [`metrics`] scores a raw/smoothed pair by resilience and error reduction.
//!
//! Randomness is always injected, so seeded runs are reproducible.

pub mod config;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod series;
pub mod smoother;
pub mod spectrum;

pub use config::{GeneratorConfig, SmootherConfig, DEFAULT_KEEP_RATIO, DEFAULT_NOISE_STD_DEV};
pub use error::{Result, SignalError};
pub use generator::{generate, generate_with, linspace, SignalGenerator};
pub use metrics::{error_reduction, evaluate, resilience, Evaluation};
pub use series::{AgentId, SignalTable};
pub use smoother::{smooth, SpectralTruncation, Smoother};
