//! Operational space controller.
//!
//! Computes, once per control tick, the joint torques that drive a point
//! on an articulated arm toward a task-space pose and velocity. The
//! control law runs in task (Cartesian) space and is mapped to joint
//! torques through the Jacobian and the task-space inertia
//! `Mx = (J * M^-1 * J^T)^-1`, with gravity and optionally
//! Coriolis compensation added in joint space. Secondary torque sources
//! are projected through the dynamically consistent null-space filter so
//! they cannot disturb the primary task.
//!
//! Reference: Khatib, "A unified approach for motion and force control of
//! robot manipulators: The operational space formulation" (1987).

use nalgebra::{DMatrix, DVector, Vector3, Vector6};

use ctrl_types::{ControlledDof, CtrlError, IntegratedError, OscGains, Result, TaskTarget};

use crate::generator::TorqueGenerator;
use crate::linalg;
use crate::model::RobotModel;
use crate::transforms;

/// The task-force law applied each tick, fixed at construction from the
/// gain configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ControlLaw {
    /// Proportional-derivative task force with no velocity cap.
    Unlimited,
    /// Saturates the commanded end-effector velocity at `vmax`, scaling
    /// the non-binding dimensions to preserve the direction of approach.
    VelocityLimited {
        /// Maximum commanded task-space speed (meters/second).
        vmax: f64,
    },
}

/// Operational space torque controller.
///
/// Holds the gain configuration, the controlled-DOF mask, the registered
/// secondary controllers, and the one piece of persistent state: the
/// integral-error accumulator. Everything else is recomputed per tick from
/// the joint state and the task target.
///
/// Integral accumulation covers position error only; accumulating
/// orientation error as well is a possible extension, deliberately not
/// wired in.
///
/// # Example
///
/// ```ignore
/// use ctrl_core::{OscController, RobotModel};
/// use ctrl_types::{ControlledDof, OscGains, TaskTarget};
///
/// let model = MyArmModel::new();
/// let mut osc = OscController::new(model, OscGains::new(50.0).velocity_limit(0.5))?
///     .with_controlled_dof(ControlledDof::ALL)
///     .with_coriolis();
///
/// // each tick:
/// let torque = osc.generate(&q, &dq, &TaskTarget::new(&pose))?;
/// ```
pub struct OscController<M: RobotModel> {
    model: M,
    gains: OscGains,
    law: ControlLaw,
    dof: ControlledDof,
    secondary: Vec<Box<dyn TorqueGenerator>>,
    use_gravity: bool,
    use_coriolis: bool,
    integrated: IntegratedError,
    training_signal: Option<DVector<f64>>,
    singular_fallbacks: u64,
}

impl<M: RobotModel> OscController<M> {
    /// Create a controller with the default configuration: position-only
    /// control, gravity compensation on, Coriolis compensation off, no
    /// secondary controllers.
    ///
    /// # Errors
    ///
    /// Returns [`CtrlError::InvalidGains`] if the gain structure is
    /// invalid (see [`OscGains::validate`]).
    pub fn new(model: M, gains: OscGains) -> Result<Self> {
        gains.validate()?;
        let law = match gains.vmax {
            Some(vmax) => ControlLaw::VelocityLimited { vmax },
            None => ControlLaw::Unlimited,
        };
        let ctrl = Self {
            model,
            gains,
            law,
            dof: ControlledDof::default(),
            secondary: Vec::new(),
            use_gravity: true,
            use_coriolis: false,
            integrated: IntegratedError::new(),
            training_signal: None,
            singular_fallbacks: 0,
        };
        ctrl.warn_if_underactuated();
        Ok(ctrl)
    }

    /// Select which task-space dimensions are servoed.
    #[must_use]
    pub fn with_controlled_dof(mut self, dof: ControlledDof) -> Self {
        self.dof = dof;
        self.warn_if_underactuated();
        self
    }

    /// Register a secondary controller whose output is projected into the
    /// null space of the primary task. Secondaries are queried in
    /// registration order and their filtered torques summed.
    #[must_use]
    pub fn with_secondary(mut self, controller: Box<dyn TorqueGenerator>) -> Self {
        self.secondary.push(controller);
        self
    }

    /// Disable gravity compensation.
    #[must_use]
    pub fn without_gravity(mut self) -> Self {
        self.use_gravity = false;
        self
    }

    /// Enable Coriolis/centripetal compensation.
    #[must_use]
    pub fn with_coriolis(mut self) -> Self {
        self.use_coriolis = true;
        self
    }

    /// The gain configuration.
    #[must_use]
    pub fn gains(&self) -> &OscGains {
        &self.gains
    }

    /// The controlled-DOF mask.
    #[must_use]
    pub fn controlled_dof(&self) -> ControlledDof {
        self.dof
    }

    /// The robot model being driven.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Whether more task dimensions are controlled than the robot has
    /// joints. Tracking proceeds but degrades.
    #[must_use]
    pub fn is_underactuated(&self) -> bool {
        self.dof.n_ctrl() > self.model.n_joints()
    }

    /// How many ticks have fallen back to the damped pseudo-inverse
    /// because the task-space inertia was near singular.
    #[must_use]
    pub fn singular_fallbacks(&self) -> u64 {
        self.singular_fallbacks
    }

    /// The most recent control signal *before* gravity compensation and
    /// null-space additions, for adaptive-control consumers that learn the
    /// unmodeled dynamics. `None` until the first tick.
    #[must_use]
    pub fn training_signal(&self) -> Option<&DVector<f64>> {
        self.training_signal.as_ref()
    }

    /// The accumulated task-space position error.
    #[must_use]
    pub fn integrated_error(&self) -> Vector3<f64> {
        self.integrated.get()
    }

    /// Zero the integral accumulator, e.g. between episodes.
    pub fn reset_integrated_error(&mut self) {
        self.integrated.reset();
    }

    /// Compute the joint torque driving the controlled frame toward
    /// `target`.
    ///
    /// `q` and `dq` are the joint angles and velocities, both length N.
    /// Returns a length-N torque vector.
    ///
    /// # Errors
    ///
    /// - [`CtrlError::TargetLength`] / [`CtrlError::TargetVelocityLength`]
    ///   if the target slices are not length 6 (checked before any model
    ///   call).
    /// - [`CtrlError::SingularMassMatrix`] if the model's mass matrix
    ///   cannot be factored.
    pub fn generate(
        &mut self,
        q: &DVector<f64>,
        dq: &DVector<f64>,
        target: &TaskTarget<'_>,
    ) -> Result<DVector<f64>> {
        target.validate()?;
        let n = self.model.n_joints();
        debug_assert_eq!(q.len(), n, "joint angle vector length mismatch");
        debug_assert_eq!(dq.len(), n, "joint velocity vector length mismatch");

        // Controlled rows of the Jacobian at the requested frame/offset
        let j = self
            .dof
            .select_rows(&self.model.jacobian(target.frame, q, &target.offset));

        // Joint-space inertia and its task-space counterpart
        let m = self.model.mass_matrix(q);
        let m_inv = linalg::Lu::factor(&m)
            .ok_or(CtrlError::SingularMassMatrix)?
            .inverse();
        let mx_inv = &j * &m_inv * j.transpose();
        let (mx, degenerate) = linalg::task_inertia(&mx_inv);
        if degenerate {
            self.note_singular_fallback();
        }

        // Task-space error, full 6-vector, masked afterwards.
        // The current position is also needed for integral accumulation,
        // even when no position dimension is servoed.
        let mut u_task6 = Vector6::zeros();
        let mut xyz = Vector3::zeros();
        if self.dof.has_position() || self.gains.ki != 0.0 {
            xyz = self.model.position(target.frame, q, &target.offset);
        }
        if self.dof.has_position() {
            u_task6
                .fixed_rows_mut::<3>(0)
                .copy_from(&(xyz - target.position()));
        }
        if self.dof.has_orientation() {
            let euler = target.euler();
            let q_d = transforms::quat_from_intrinsic_xyz(euler.x, euler.y, euler.z);
            let q_e = transforms::quat_from_rotation(&self.model.rotation(target.frame, q));
            let err = transforms::quaternion_error(&q_d, &q_e);
            u_task6
                .fixed_rows_mut::<3>(3)
                .copy_from(&(-(self.gains.ko / self.gains.kp) * err));
        }
        let mut u_task = self.dof.select(&u_task6);

        let target_vel = match target.velocity {
            Some(vel) => self.dof.select_slice(vel),
            None => DVector::zeros(self.dof.n_ctrl()),
        };

        // Task-force law, fixed at construction
        let mut u = match self.law {
            ControlLaw::VelocityLimited { vmax } => {
                self.velocity_limited_force(&j, dq, &mut u_task, &target_vel, vmax);
                DVector::zeros(n)
            }
            ControlLaw::Unlimited => {
                u_task *= -self.gains.kp;
                if target_vel.iter().all(|&v| v == 0.0) {
                    // With no tracking velocity, damping applied in joint
                    // space is better conditioned than its task-space
                    // equivalent
                    -self.gains.kv * (&m * dq)
                } else {
                    let dx = &j * dq;
                    u_task -= self.gains.kv * (dx - &target_vel);
                    DVector::zeros(n)
                }
            }
        };

        // Integral term: position error only
        if self.gains.ki != 0.0 {
            self.integrated.accumulate(target.position() - xyz);
            let i_term = self.gains.ki * self.integrated.get();
            for (row, dim) in self.dof.active_dims().enumerate() {
                if dim < 3 {
                    u_task[row] -= i_term[dim];
                }
            }
        }

        // Dynamically consistent map from task force to joint torque
        u += j.transpose() * (&mx * &u_task);

        if self.use_coriolis {
            u -= self.model.coriolis(q, dq) * dq;
        }

        // Snapshot before gravity and null-space terms
        self.training_signal = Some(u.clone());

        if self.use_gravity {
            u -= self.model.gravity(q);
        }

        if !self.secondary.is_empty() {
            // One projector per tick, shared by every secondary: each
            // signal is filtered independently against the primary task
            // and the results summed
            let j_bar = &m_inv * j.transpose() * &mx;
            let filter = DMatrix::identity(n, n) - j.transpose() * j_bar.transpose();
            for controller in &mut self.secondary {
                let u_null = controller.generate(q, dq);
                debug_assert_eq!(u_null.len(), n, "secondary torque length mismatch");
                u += &filter * u_null;
            }
        }

        Ok(u)
    }

    /// Velocity-limited task force.
    ///
    /// Each active dimension has headroom `sat_i = vmax / (lambda *
    /// |u_i|)`; a zero error means infinite headroom, never a division by
    /// zero. When the tightest dimension is saturated, all others are
    /// scaled by the same factor so the approach direction is preserved,
    /// and the resulting velocity command is folded into a pure task-space
    /// damping force. The joint-space base torque is zero in this law.
    fn velocity_limited_force(
        &self,
        j: &DMatrix<f64>,
        dq: &DVector<f64>,
        u_task: &mut DVector<f64>,
        target_vel: &DVector<f64>,
        vmax: f64,
    ) {
        let lamb = self.gains.lambda();
        let n_ctrl = u_task.len();

        let sat: Vec<f64> = u_task
            .iter()
            .map(|&e| {
                if e == 0.0 {
                    f64::INFINITY
                } else {
                    vmax / (lamb * e.abs())
                }
            })
            .collect();

        // Binding dimension: minimum headroom
        let mut binding = 0;
        let mut sat_min = f64::INFINITY;
        for (i, &s) in sat.iter().enumerate() {
            if s < sat_min {
                sat_min = s;
                binding = i;
            }
        }

        let mut scale = vec![1.0; n_ctrl];
        if sat_min < 1.0 {
            let unclipped = self.gains.kp * u_task[binding];
            let clipped = self.gains.kv * vmax * u_task[binding].signum();
            scale.fill(clipped / unclipped);
            scale[binding] = 1.0;
        }

        let dx = j * dq;
        for i in 0..n_ctrl {
            let clip = (sat[i] / scale[i]).clamp(0.0, 1.0);
            u_task[i] =
                -self.gains.kv * (dx[i] - target_vel[i] - clip * (-lamb * scale[i] * u_task[i]));
        }
    }

    fn note_singular_fallback(&mut self) {
        if self.singular_fallbacks == 0 {
            tracing::warn!(
                "task-space inertia near singular, using damped pseudo-inverse (sv cutoff {})",
                linalg::SV_CUTOFF_RATIO
            );
        }
        self.singular_fallbacks += 1;
    }

    fn warn_if_underactuated(&self) {
        if self.is_underactuated() {
            tracing::warn!(
                n_ctrl = self.dof.n_ctrl(),
                n_joints = self.model.n_joints(),
                "more task dimensions controlled than the robot has joints, \
                 tracking will degrade"
            );
        }
    }
}

impl<M: RobotModel> std::fmt::Debug for OscController<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OscController")
            .field("gains", &self.gains)
            .field("law", &self.law)
            .field("dof", &self.dof)
            .field("n_secondary", &self.secondary.len())
            .field("use_gravity", &self.use_gravity)
            .field("use_coriolis", &self.use_coriolis)
            .field("integrated", &self.integrated)
            .field("singular_fallbacks", &self.singular_fallbacks)
            .finish_non_exhaustive()
    }
}
