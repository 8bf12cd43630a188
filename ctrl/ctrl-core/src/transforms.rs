//! Orientation representations and the task-space orientation error.
//!
//! The controller describes target orientations as intrinsic-xyz Euler
//! angles and measures the current orientation from the model's rotation
//! matrix. Both are converted to unit quaternions and compared through the
//! relative rotation `q_r = q_target * conj(q_current)`, whose vector part
//! is the orientation error direction.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

/// Unit quaternion for intrinsic-xyz Euler angles: a rotation of `alpha`
/// about the body x-axis, then `beta` about the new y-axis, then `gamma`
/// about the new z-axis.
#[must_use]
pub fn quat_from_intrinsic_xyz(alpha: f64, beta: f64, gamma: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), alpha)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), beta)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), gamma)
}

/// Unit quaternion for a 3x3 rotation matrix.
///
/// The matrix is re-orthonormalized on the way in, so slightly drifted
/// rotations from numerical forward kinematics are accepted.
#[must_use]
pub fn quat_from_rotation(rot: &Matrix3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(rot))
}

/// Orientation error between two unit quaternions: the vector part of
/// `q_target * conj(q_current)`, sign-corrected for the quaternion double
/// cover.
///
/// `q` and `-q` encode the same rotation, so the relative quaternion can
/// land on either sheet; multiplying the vector part by the sign of the
/// scalar part always picks the short way around. Without the correction
/// the error direction flips discontinuously when the scalar part crosses
/// zero, which a torque controller turns into spikes. An exactly-pi
/// relative rotation (scalar part zero) reads as zero error for that tick.
#[must_use]
pub fn quaternion_error(
    target: &UnitQuaternion<f64>,
    current: &UnitQuaternion<f64>,
) -> Vector3<f64> {
    let q_r = target * current.conjugate();
    let sign = if q_r.w > 0.0 {
        1.0
    } else if q_r.w < 0.0 {
        -1.0
    } else {
        0.0
    };
    Vector3::new(q_r.i, q_r.j, q_r.k) * sign
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn intrinsic_xyz_matches_composed_rotations() {
        let (a, b, g) = (0.3, -0.7, 1.1);
        let q = quat_from_intrinsic_xyz(a, b, g);

        let expected = Rotation3::from_axis_angle(&Vector3::x_axis(), a)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), b)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), g);

        let m = q.to_rotation_matrix();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(m[(i, j)], expected[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn rotation_matrix_round_trip() {
        let q = quat_from_intrinsic_xyz(0.4, 0.2, -0.9);
        let m: Matrix3<f64> = *q.to_rotation_matrix().matrix();
        let q2 = quat_from_rotation(&m);
        assert_relative_eq!(q.angle_to(&q2), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn error_zero_when_aligned() {
        let q = quat_from_intrinsic_xyz(0.5, -0.2, 0.8);
        let err = quaternion_error(&q, &q);
        assert_relative_eq!(err.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn sign_correction_picks_short_way() {
        let current = UnitQuaternion::identity();

        // 3pi/2 about z: the relative quaternion has a negative scalar
        // part, and the short way around is -pi/2
        let long_way = quat_from_intrinsic_xyz(0.0, 0.0, 3.0 * FRAC_PI_2);
        let short_way = quat_from_intrinsic_xyz(0.0, 0.0, -FRAC_PI_2);

        let err_long = quaternion_error(&long_way, &current);
        let err_short = quaternion_error(&short_way, &current);

        assert_relative_eq!(err_long.x, err_short.x, epsilon = 1e-12);
        assert_relative_eq!(err_long.y, err_short.y, epsilon = 1e-12);
        assert_relative_eq!(err_long.z, err_short.z, epsilon = 1e-12);
        // Short way to 3pi/2 is a negative rotation about z
        assert!(err_long.z < 0.0);
    }

    #[test]
    fn error_continuous_across_pi() {
        let current = UnitQuaternion::identity();
        let eps = 1e-6;

        let below = quaternion_error(&quat_from_intrinsic_xyz(0.0, 0.0, PI - eps), &current);
        let above = quaternion_error(&quat_from_intrinsic_xyz(0.0, 0.0, PI + eps), &current);

        // Same magnitude on both sides of the pi boundary; direction flips
        // with the geodesic, not with the quaternion sheet
        assert_relative_eq!(below.norm(), above.norm(), epsilon = 1e-5);
        assert!(below.z > 0.0);
        assert!(above.z < 0.0);
    }

    #[test]
    fn zero_scalar_part_reads_zero() {
        // An exactly-pi relative rotation has scalar part exactly zero;
        // floating-point Euler construction lands near but not on it, so
        // build the quaternion directly
        let current = UnitQuaternion::identity();
        let target =
            UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(0.0, 0.0, 0.0, 1.0));
        let err = quaternion_error(&target, &current);
        assert_relative_eq!(err.norm(), 0.0, epsilon = 1e-12);
    }
}
