//! FFT Demo: command-line presentation layer for the FFT stabilization kernel.
//!
//! Each run generates noisy agent signals, smooths one of them by spectral
//! truncation and reports how much steadier it became:
//! - Resilience before/after (inverse variance)
//! - Error reduction (relative drop in mean absolute deviation)

pub mod config;
pub mod experiment;
pub mod render;
pub mod results;

pub use config::DemoConfig;
pub use experiment::{run_sweep, DemoOutcome, DemoRunner};
pub use render::{CsvRenderer, RenderView, Renderer, TerminalRenderer};
pub use results::{RunRecord, SweepResults};
