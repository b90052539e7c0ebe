//! Frequency-domain smoothing by raw spectrum truncation.
//!
//! The series is transformed, every bin at index `>= floor(len * keep_ratio)`
//! is zeroed, and the real part of the inverse transform is returned.
//!
//! Only the first `cutoff` bins survive. The mirrored negative-frequency bins
//! in the upper half are zeroed as well, so this is not a symmetric low-pass
//! filter: the output keeps roughly half the energy of the retained band.

use num_complex::Complex64;

use crate::config::{validate_keep_ratio, SmootherConfig};
use crate::error::{Result, SignalError};
use crate::spectrum;

pub use crate::config::DEFAULT_KEEP_RATIO;

/// A filter that maps a series to a smoothed series of the same length.
pub trait Smoother: Send + Sync {
    /// Label used in reports.
    fn name(&self) -> &str;

    /// Smooth `series`. The result has the same length as the input.
    fn smooth(&self, series: &[f64]) -> Result<Vec<f64>>;
}

/// Number of bins retained for a series of `len` samples.
pub fn cutoff(len: usize, keep_ratio: f64) -> usize {
    let raw = (len as f64 * keep_ratio).floor();
    if raw >= len as f64 {
        len
    } else {
        raw as usize
    }
}

/// Low-pass a series by keeping the first `floor(len * keep_ratio)` DFT bins.
pub fn smooth(series: &[f64], keep_ratio: f64) -> Result<Vec<f64>> {
    validate_keep_ratio(keep_ratio)?;
    if series.is_empty() {
        return Err(SignalError::invalid("series", "must not be empty"));
    }

    let mut bins = spectrum::forward_real(series);
    let cutoff = cutoff(series.len(), keep_ratio);
    for bin in &mut bins[cutoff..] {
        *bin = Complex64::new(0.0, 0.0);
    }
    spectrum::inverse(&mut bins);

    Ok(bins.into_iter().map(|c| c.re).collect())
}

/// [`Smoother`] backed by [`smooth`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralTruncation {
    keep_ratio: f64,
}

impl SpectralTruncation {
    pub fn new(keep_ratio: f64) -> Result<Self> {
        validate_keep_ratio(keep_ratio)?;
        Ok(Self { keep_ratio })
    }

    pub fn from_config(config: &SmootherConfig) -> Result<Self> {
        Self::new(config.keep_ratio)
    }

    pub fn keep_ratio(&self) -> f64 {
        self.keep_ratio
    }
}

impl Default for SpectralTruncation {
    fn default() -> Self {
        Self {
            keep_ratio: DEFAULT_KEEP_RATIO,
        }
    }
}

impl Smoother for SpectralTruncation {
    fn name(&self) -> &str {
        "spectral_truncation"
    }

    fn smooth(&self, series: &[f64]) -> Result<Vec<f64>> {
        smooth(series, self.keep_ratio)
    }
}
