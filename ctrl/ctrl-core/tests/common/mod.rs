//! Shared test fixture: an analytic planar two-link arm.

#![allow(dead_code)] // not every test binary uses every helper

use ctrl_core::RobotModel;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Revolute-revolute arm in the x-y plane, joints about +z, with point
/// masses at the link tips. Gravity acts along -y. All dynamics terms are
/// closed-form, so expected torques can be computed independently of the
/// controller.
pub struct PlanarTwoLink {
    /// Link lengths (meters).
    pub l1: f64,
    pub l2: f64,
    /// Point masses at the link tips (kg).
    pub m1: f64,
    pub m2: f64,
    /// Gravitational acceleration (m/s^2).
    pub g: f64,
}

impl Default for PlanarTwoLink {
    fn default() -> Self {
        Self {
            l1: 1.0,
            l2: 0.8,
            m1: 1.2,
            m2: 0.9,
            g: 9.81,
        }
    }
}

impl PlanarTwoLink {
    /// World position of the elbow (tip of link 1).
    pub fn elbow(&self, q: &DVector<f64>) -> Vector3<f64> {
        Vector3::new(self.l1 * q[0].cos(), self.l1 * q[0].sin(), 0.0)
    }

    /// A pose slice equal to the current end-effector pose, for tests that
    /// hold the arm at its present position and orientation.
    pub fn held_pose(&self, q: &DVector<f64>) -> [f64; 6] {
        let p = self.position("ee", q, &Vector3::zeros());
        [p.x, p.y, p.z, 0.0, 0.0, q[0] + q[1]]
    }
}

impl RobotModel for PlanarTwoLink {
    fn n_joints(&self) -> usize {
        2
    }

    fn jacobian(&self, frame: &str, q: &DVector<f64>, offset: &Vector3<f64>) -> DMatrix<f64> {
        let point = self.position(frame, q, offset);
        let origins = [Vector3::zeros(), self.elbow(q)];
        let z = Vector3::z();

        let mut j = DMatrix::zeros(6, 2);
        for (col, origin) in origins.iter().enumerate() {
            let linear = z.cross(&(point - origin));
            for row in 0..3 {
                j[(row, col)] = linear[row];
                j[(row + 3, col)] = z[row];
            }
        }
        j
    }

    fn mass_matrix(&self, q: &DVector<f64>) -> DMatrix<f64> {
        let c2 = q[1].cos();
        let (l1, l2) = (self.l1, self.l2);
        let m11 = self.m1 * l1 * l1 + self.m2 * (l1 * l1 + l2 * l2 + 2.0 * l1 * l2 * c2);
        let m12 = self.m2 * (l2 * l2 + l1 * l2 * c2);
        let m22 = self.m2 * l2 * l2;
        DMatrix::from_row_slice(2, 2, &[m11, m12, m12, m22])
    }

    fn position(&self, frame: &str, q: &DVector<f64>, offset: &Vector3<f64>) -> Vector3<f64> {
        assert_eq!(frame, "ee", "fixture only models the end-effector frame");
        let s1 = q[0].sin();
        let c1 = q[0].cos();
        let s12 = (q[0] + q[1]).sin();
        let c12 = (q[0] + q[1]).cos();
        let tip = Vector3::new(self.l1 * c1 + self.l2 * c12, self.l1 * s1 + self.l2 * s12, 0.0);
        tip + self.rotation(frame, q) * offset
    }

    fn rotation(&self, _frame: &str, q: &DVector<f64>) -> Matrix3<f64> {
        let theta = q[0] + q[1];
        let (s, c) = theta.sin_cos();
        Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
    }

    fn coriolis(&self, q: &DVector<f64>, dq: &DVector<f64>) -> DMatrix<f64> {
        let h = -self.m2 * self.l1 * self.l2 * q[1].sin();
        DMatrix::from_row_slice(
            2,
            2,
            &[h * dq[1], h * (dq[0] + dq[1]), -h * dq[0], 0.0],
        )
    }

    fn gravity(&self, q: &DVector<f64>) -> DVector<f64> {
        // Force exerted by gravity: the negative potential-energy gradient
        let c1 = q[0].cos();
        let c12 = (q[0] + q[1]).cos();
        let du_dq1 = self.g * (self.m1 * self.l1 * c1 + self.m2 * (self.l1 * c1 + self.l2 * c12));
        let du_dq2 = self.g * self.m2 * self.l2 * c12;
        DVector::from_vec(vec![-du_dq1, -du_dq2])
    }
}

/// Deterministic pseudo-random values in [-0.5, 0.5) via a simple LCG.
pub fn lcg(state: &mut u64) -> f64 {
    *state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    ((*state >> 33) as f64) / f64::from(u32::MAX) - 0.5
}

/// The x/y-only controlled-DOF mask: a full-rank 2x2 task for this arm
/// away from the straightened configuration.
pub fn xy_mask() -> ctrl_core::ControlledDof {
    ctrl_core::ControlledDof::new([true, true, false, false, false, false])
}
