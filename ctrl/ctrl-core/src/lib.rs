//! Operational space torque control.
//!
//! This crate computes, once per control tick, the joint torques that move
//! a point on an articulated arm toward a task-space pose and velocity,
//! honoring the arm's dynamics (inertia, gravity, Coriolis forces) and
//! blending in secondary objectives through null-space projection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RobotModel (trait)                     │
//! │  J(q), M(q), forward kinematics, rotation, C(q,dq), g(q)    │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ queried per tick
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       OscController                         │
//! │  task error → control law → Jᵀ·Mx mapping → compensation    │
//! │  state: integral-error accumulator only                     │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ null-space filter
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │               TorqueGenerator (0..N secondaries)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller is synchronous and allocation-light: every tick is a
//! bounded dense linear-algebra computation sized for arms of up to about
//! ten joints, intended to finish well inside a kHz-class control period.
//!
//! # Quick Start
//!
//! ```ignore
//! use ctrl_core::{OscController, RobotModel};
//! use ctrl_types::{OscGains, TaskTarget};
//!
//! let model = MyArmModel::load();
//! let mut osc = OscController::new(model, OscGains::new(50.0).velocity_limit(0.5))?;
//!
//! loop {
//!     let (q, dq) = read_joint_sensors();
//!     let torque = osc.generate(&q, &dq, &TaskTarget::new(&pose))?;
//!     apply_torque(&torque);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/ctrl-core/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,     // mul_add style changes aren't always clearer
    clippy::doc_markdown          // Not all technical terms need backticks
)]

// Robot model and secondary-controller interfaces
mod generator;
mod model;

// Dense inversion routines (LU, damped pseudo-inverse)
pub mod linalg;

// Euler/quaternion conversion and the double-cover-corrected error
pub mod transforms;

// The controller itself
mod osc;

pub use generator::TorqueGenerator;
pub use model::RobotModel;
pub use osc::OscController;

// Re-export the data types so controller users need only this crate
pub use ctrl_types::{
    ControlledDof, CtrlError, IntegratedError, OscGains, Result, TaskTarget, END_EFFECTOR,
};
