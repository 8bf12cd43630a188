//! Gain configuration for the operational space controller.

use crate::{CtrlError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gains for an operational space controller.
///
/// Fixed at controller construction. The defaulting rules follow the
/// critically-damped convention: the orientation gain tracks the position
/// gain, and the damping gain defaults to `sqrt(kp + ko)`.
///
/// # Builder Order
///
/// [`orientation`](Self::orientation) refreshes the default damping gain
/// `kv = sqrt(kp + ko)`; set a custom damping via
/// [`damping`](Self::damping) *after* the orientation gain.
///
/// # Example
///
/// ```
/// use ctrl_types::OscGains;
///
/// let gains = OscGains::new(25.0).orientation(180.0).integral(0.005);
/// assert_eq!(gains.kv, (25.0f64 + 180.0).sqrt());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OscGains {
    /// Proportional gain on task-space position error.
    pub kp: f64,
    /// Proportional gain on task-space orientation error.
    pub ko: f64,
    /// Derivative (damping) gain on task-space velocity.
    pub kv: f64,
    /// Integral gain on accumulated position error.
    pub ki: f64,
    /// Maximum commanded end-effector speed in meters/second, or `None`
    /// for no velocity limiting.
    pub vmax: Option<f64>,
}

impl Default for OscGains {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OscGains {
    /// Create gains from a position gain, applying the defaults
    /// `ko = kp`, `kv = sqrt(kp + ko)`, `ki = 0`, no velocity limit.
    #[must_use]
    pub fn new(kp: f64) -> Self {
        Self {
            kp,
            ko: kp,
            kv: (2.0 * kp).sqrt(),
            ki: 0.0,
            vmax: None,
        }
    }

    /// Set the orientation gain and refresh the default damping gain
    /// `kv = sqrt(kp + ko)`.
    #[must_use]
    pub fn orientation(mut self, ko: f64) -> Self {
        self.ko = ko;
        self.kv = (self.kp + ko).sqrt();
        self
    }

    /// Set the damping gain.
    #[must_use]
    pub fn damping(mut self, kv: f64) -> Self {
        self.kv = kv;
        self
    }

    /// Set the integral gain.
    #[must_use]
    pub fn integral(mut self, ki: f64) -> Self {
        self.ki = ki;
        self
    }

    /// Cap the commanded end-effector speed at `vmax` meters/second.
    #[must_use]
    pub fn velocity_limit(mut self, vmax: f64) -> Self {
        self.vmax = Some(vmax);
        self
    }

    /// The error-to-velocity ratio `lambda = kp / kv` used by the
    /// velocity-limited control law.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.kp / self.kv
    }

    /// Validate the gain structure.
    ///
    /// `kp` and `kv` must be strictly positive: both appear as divisors
    /// (the orientation scaling `ko/kp` and the ratio `lambda = kp/kv`).
    /// `ko` and `ki` must be non-negative, and the velocity cap, when set,
    /// strictly positive. All values must be finite.
    pub fn validate(&self) -> Result<()> {
        if !self.kp.is_finite() || self.kp <= 0.0 {
            return Err(CtrlError::invalid_gains(format!(
                "kp must be positive and finite, got {}",
                self.kp
            )));
        }
        if !self.kv.is_finite() || self.kv <= 0.0 {
            return Err(CtrlError::invalid_gains(format!(
                "kv must be positive and finite, got {}",
                self.kv
            )));
        }
        if !self.ko.is_finite() || self.ko < 0.0 {
            return Err(CtrlError::invalid_gains(format!(
                "ko must be non-negative and finite, got {}",
                self.ko
            )));
        }
        if !self.ki.is_finite() || self.ki < 0.0 {
            return Err(CtrlError::invalid_gains(format!(
                "ki must be non-negative and finite, got {}",
                self.ki
            )));
        }
        if let Some(vmax) = self.vmax {
            if !vmax.is_finite() || vmax <= 0.0 {
                return Err(CtrlError::invalid_gains(format!(
                    "vmax must be positive and finite, got {vmax}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let gains = OscGains::new(50.0);
        assert_eq!(gains.ko, 50.0);
        assert_relative_eq!(gains.kv, 100.0f64.sqrt(), epsilon = 1e-12);
        assert_eq!(gains.ki, 0.0);
        assert!(gains.vmax.is_none());
        assert!(gains.validate().is_ok());
    }

    #[test]
    fn test_orientation_refreshes_damping() {
        let gains = OscGains::new(25.0).orientation(200.0);
        assert_relative_eq!(gains.kv, 225.0f64.sqrt(), epsilon = 1e-12);

        // Explicit damping set afterwards survives
        let gains = OscGains::new(25.0).orientation(200.0).damping(3.0);
        assert_eq!(gains.kv, 3.0);
    }

    #[test]
    fn test_lambda() {
        let gains = OscGains::new(50.0).damping(10.0);
        assert_relative_eq!(gains.lambda(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_validation_rejects_degenerate_gains() {
        assert!(OscGains::new(0.0).validate().is_err());
        assert!(OscGains::new(-1.0).validate().is_err());
        assert!(OscGains::new(50.0).damping(0.0).validate().is_err());
        assert!(OscGains::new(50.0).damping(-2.0).validate().is_err());
        assert!(OscGains::new(50.0).orientation(-1.0).validate().is_err());
        assert!(OscGains::new(50.0).integral(-0.1).validate().is_err());
        assert!(OscGains::new(50.0).velocity_limit(0.0).validate().is_err());
        assert!(
            OscGains::new(50.0)
                .velocity_limit(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(OscGains::new(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_validation_accepts_orientation_only_scaling() {
        // ko may be zero (orientation error contribution vanishes)
        assert!(OscGains::new(50.0).orientation(0.0).validate().is_ok());
    }
}
