//! Robot model interface consumed by the controller.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Kinematic and dynamic model of an articulated arm.
///
/// The controller is model-agnostic: anything that can report a Jacobian,
/// mass matrix, forward kinematics, and the bias terms for a given joint
/// configuration can be driven. Implementations are typically analytic
/// models, a simulator binding, or a hardware driver's identified model.
///
/// # Conventions
///
/// - Task vectors and Jacobian rows are ordered `[x, y, z, alpha, beta,
///   gamma]`: rows 0-2 are linear, rows 3-5 angular.
/// - `frame` names a point of control on the arm; [`END_EFFECTOR`] is the
///   conventional default. Implementations define which names they accept.
/// - `offset` is the point of interest expressed in `frame` coordinates.
///
/// [`END_EFFECTOR`]: ctrl_types::END_EFFECTOR
pub trait RobotModel {
    /// Number of joints N (the generalized-coordinate dimension).
    fn n_joints(&self) -> usize;

    /// Full 6xN Jacobian of the offset point in `frame`, at configuration
    /// `q`.
    fn jacobian(&self, frame: &str, q: &DVector<f64>, offset: &Vector3<f64>) -> DMatrix<f64>;

    /// NxN joint-space inertia matrix M(q). Expected symmetric positive
    /// definite, though it may be ill-conditioned near singular
    /// configurations.
    fn mass_matrix(&self, q: &DVector<f64>) -> DMatrix<f64>;

    /// World position of the offset point in `frame` (forward kinematics).
    fn position(&self, frame: &str, q: &DVector<f64>, offset: &Vector3<f64>) -> Vector3<f64>;

    /// World rotation matrix of `frame`.
    fn rotation(&self, frame: &str, q: &DVector<f64>) -> Matrix3<f64>;

    /// NxN Coriolis/centripetal matrix C(q, dq); the bias force is
    /// `C(q, dq) * dq`.
    fn coriolis(&self, q: &DVector<f64>, dq: &DVector<f64>) -> DMatrix<f64>;

    /// Generalized force exerted *by* gravity on the joints. A
    /// gravity-compensating controller subtracts this vector from its
    /// output torque.
    fn gravity(&self, q: &DVector<f64>) -> DVector<f64>;
}

impl<M: RobotModel + ?Sized> RobotModel for &M {
    fn n_joints(&self) -> usize {
        (**self).n_joints()
    }

    fn jacobian(&self, frame: &str, q: &DVector<f64>, offset: &Vector3<f64>) -> DMatrix<f64> {
        (**self).jacobian(frame, q, offset)
    }

    fn mass_matrix(&self, q: &DVector<f64>) -> DMatrix<f64> {
        (**self).mass_matrix(q)
    }

    fn position(&self, frame: &str, q: &DVector<f64>, offset: &Vector3<f64>) -> Vector3<f64> {
        (**self).position(frame, q, offset)
    }

    fn rotation(&self, frame: &str, q: &DVector<f64>) -> Matrix3<f64> {
        (**self).rotation(frame, q)
    }

    fn coriolis(&self, q: &DVector<f64>, dq: &DVector<f64>) -> DMatrix<f64> {
        (**self).coriolis(q, dq)
    }

    fn gravity(&self, q: &DVector<f64>) -> DVector<f64> {
        (**self).gravity(q)
    }
}
