//! Joint-torque source interface for secondary control.

use nalgebra::DVector;

/// A source of joint-space torque computed from joint state alone.
///
/// Secondary controllers (posture maintenance, joint-limit avoidance,
/// joint-space damping) implement this trait and are registered with the
/// primary controller, which projects their output into the null space of
/// the primary task before summing it in.
///
/// The blanket implementation for closures keeps simple dampers and test
/// doubles free of boilerplate:
///
/// ```
/// use ctrl_core::TorqueGenerator;
/// use nalgebra::DVector;
///
/// let kd = 2.0;
/// let mut damper = move |_q: &DVector<f64>, dq: &DVector<f64>| -kd * dq;
/// let torque = damper.generate(&DVector::zeros(2), &DVector::from_vec(vec![0.5, -0.5]));
/// assert_eq!(torque[0], -1.0);
/// ```
pub trait TorqueGenerator {
    /// Compute a joint torque for the given joint angles and velocities.
    /// The returned vector must have length N (the model's joint count).
    fn generate(&mut self, q: &DVector<f64>, dq: &DVector<f64>) -> DVector<f64>;
}

impl<F> TorqueGenerator for F
where
    F: FnMut(&DVector<f64>, &DVector<f64>) -> DVector<f64>,
{
    fn generate(&mut self, q: &DVector<f64>, dq: &DVector<f64>) -> DVector<f64> {
        self(q, dq)
    }
}
