//! Core types for operational space control.
//!
//! This crate provides the foundational types shared by the control stack:
//!
//! - [`OscGains`] - proportional/damping/integral gains and the velocity cap
//! - [`ControlledDof`] - which of the 6 task-space dimensions are servoed
//! - [`TaskTarget`] - the per-tick task-space goal (pose, velocity, frame)
//! - [`IntegratedError`] - the persistent task-space integral accumulator
//! - [`CtrlError`] - error type for configuration and input validation
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no control law, no model access,
//! no linear algebra beyond trivial selection. They're the common language
//! between:
//!
//! - Controllers (operational space, joint space, null-space secondaries)
//! - Robot model providers (analytic models, simulators, hardware drivers)
//! - Configuration loading and logging
//!
//! # Task-Space Convention
//!
//! Task vectors are ordered `[x, y, z, alpha, beta, gamma]`: Cartesian
//! position first, then Euler orientation in the intrinsic-xyz convention.
//! All angles are radians, all distances meters.
//!
//! # Example
//!
//! ```
//! use ctrl_types::{ControlledDof, OscGains};
//!
//! let gains = OscGains::new(50.0).integral(0.05).velocity_limit(0.5);
//! assert!(gains.validate().is_ok());
//! assert_eq!(gains.ko, 50.0); // orientation gain defaults to kp
//!
//! let dof = ControlledDof::POSITION;
//! assert_eq!(dof.n_ctrl(), 3);
//! ```

#![doc(html_root_url = "https://docs.rs/ctrl-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
// Allow certain clippy lints that are overly pedantic for type definitions
#![allow(
    clippy::missing_const_for_fn,  // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,      // mul_add style changes aren't always clearer
    clippy::missing_errors_doc     // Error docs added where non-obvious
)]

mod error;
mod gains;
mod integral;
mod mask;
mod target;

pub use error::CtrlError;
pub use gains::OscGains;
pub use integral::IntegratedError;
pub use mask::ControlledDof;
pub use target::{TaskTarget, END_EFFECTOR};

// Re-export math types for convenience
pub use nalgebra::{DMatrix, DVector, Vector3, Vector6};

/// Result type for control operations.
pub type Result<T> = std::result::Result<T, CtrlError>;
