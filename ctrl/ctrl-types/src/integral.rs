//! Persistent integral-error state.

use nalgebra::Vector3;

/// Accumulated task-space position error.
///
/// This is the only state a controller carries between ticks. It is owned
/// by exactly one controller instance, accumulates whenever the integral
/// gain is nonzero, and is never reset automatically; callers reset it
/// explicitly between episodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegratedError(Vector3<f64>);

impl IntegratedError {
    /// Create a zeroed accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current accumulated error.
    #[must_use]
    pub fn get(&self) -> Vector3<f64> {
        self.0
    }

    /// Add one tick's position error to the accumulator.
    pub fn accumulate(&mut self, error: Vector3<f64>) {
        self.0 += error;
    }

    /// Zero the accumulator.
    pub fn reset(&mut self) {
        self.0 = Vector3::zeros();
    }
}
