//! Error types for control operations.

use thiserror::Error;

/// Errors that can occur during controller construction or a control tick.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CtrlError {
    /// Task target pose does not have exactly 6 elements.
    #[error("task target must have length 6, got {0}")]
    TargetLength(usize),

    /// Task target velocity does not have exactly 6 elements.
    #[error("task target velocity must have length 6, got {0}")]
    TargetVelocityLength(usize),

    /// Structurally invalid gain configuration.
    #[error("invalid gain configuration: {reason}")]
    InvalidGains {
        /// Description of the offending gain.
        reason: String,
    },

    /// The joint-space mass matrix failed factorization (exactly singular).
    #[error("joint-space mass matrix is singular")]
    SingularMassMatrix,
}

impl CtrlError {
    /// Create an invalid-gains error.
    #[must_use]
    pub fn invalid_gains(reason: impl Into<String>) -> Self {
        Self::InvalidGains {
            reason: reason.into(),
        }
    }

    /// Check if this is an input-validation error (bad target shape).
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::TargetLength(_) | Self::TargetVelocityLength(_))
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidGains { .. })
    }
}
