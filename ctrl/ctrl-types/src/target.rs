//! Per-tick task-space target description.

use nalgebra::Vector3;

use crate::{CtrlError, Result};

/// Conventional name of the end-effector reference frame.
pub const END_EFFECTOR: &str = "ee";

/// A borrowed view of the task-space goal for one control tick.
///
/// The pose is a 6-element slice `[x, y, z, alpha, beta, gamma]` (meters,
/// radians, intrinsic-xyz Euler order). The optional velocity is a
/// 6-element slice in the same layout and defaults to zero. The reference
/// frame defaults to the end-effector and the point-of-interest offset
/// (expressed in that frame) to the zero vector.
///
/// Slice lengths are validated when the controller consumes the target,
/// not at construction.
///
/// # Example
///
/// ```
/// use ctrl_types::TaskTarget;
/// use nalgebra::Vector3;
///
/// let pose = [0.4, 0.1, 0.3, 0.0, 0.0, 1.2];
/// let vel = [0.05, 0.0, 0.0, 0.0, 0.0, 0.0];
/// let target = TaskTarget::new(&pose)
///     .velocity(&vel)
///     .offset(Vector3::new(0.0, 0.0, 0.02));
/// assert!(target.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaskTarget<'a> {
    /// Desired pose: `[x, y, z, alpha, beta, gamma]`.
    pub pose: &'a [f64],
    /// Desired task-space velocity, or `None` for zero.
    pub velocity: Option<&'a [f64]>,
    /// Reference frame being controlled.
    pub frame: &'a str,
    /// Point of interest within `frame`, in frame coordinates.
    pub offset: Vector3<f64>,
}

impl<'a> TaskTarget<'a> {
    /// Create a target for the end-effector frame with zero velocity and
    /// zero offset.
    #[must_use]
    pub fn new(pose: &'a [f64]) -> Self {
        Self {
            pose,
            velocity: None,
            frame: END_EFFECTOR,
            offset: Vector3::zeros(),
        }
    }

    /// Set the desired task-space velocity.
    #[must_use]
    pub fn velocity(mut self, velocity: &'a [f64]) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Control a frame other than the end-effector.
    #[must_use]
    pub fn frame(mut self, frame: &'a str) -> Self {
        self.frame = frame;
        self
    }

    /// Set the point of interest within the controlled frame.
    #[must_use]
    pub fn offset(mut self, offset: Vector3<f64>) -> Self {
        self.offset = offset;
        self
    }

    /// Check the pose and velocity slice lengths.
    pub fn validate(&self) -> Result<()> {
        if self.pose.len() != 6 {
            return Err(CtrlError::TargetLength(self.pose.len()));
        }
        if let Some(vel) = self.velocity {
            if vel.len() != 6 {
                return Err(CtrlError::TargetVelocityLength(vel.len()));
            }
        }
        Ok(())
    }

    /// Target position `[x, y, z]`.
    ///
    /// # Panics
    ///
    /// Panics if the pose slice is shorter than 6; call
    /// [`validate`](Self::validate) first.
    #[must_use]
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.pose[0], self.pose[1], self.pose[2])
    }

    /// Target orientation `[alpha, beta, gamma]` in intrinsic-xyz Euler
    /// angles.
    ///
    /// # Panics
    ///
    /// Panics if the pose slice is shorter than 6; call
    /// [`validate`](Self::validate) first.
    #[must_use]
    pub fn euler(&self) -> Vector3<f64> {
        Vector3::new(self.pose[3], self.pose[4], self.pose[5])
    }
}
