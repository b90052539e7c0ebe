//! Error type for the signal-processing core.

use thiserror::Error;

/// Errors raised by the signal-processing core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl SignalError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;
