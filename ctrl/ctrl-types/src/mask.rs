//! Controlled task-space degrees of freedom.

use nalgebra::{DMatrix, DVector, Vector6};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selects which of the 6 task-space dimensions
/// `[x, y, z, alpha, beta, gamma]` are actively servoed.
///
/// The length-6 invariant is structural: the mask is a fixed-size array.
/// Rows of the full 6xN Jacobian and entries of 6-element task vectors are
/// restricted to the active dimensions before the control law runs.
///
/// Selecting more dimensions than the robot has joints is allowed but
/// degrades tracking; the controller logs a warning for that configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlledDof([bool; 6]);

impl ControlledDof {
    /// Position-only control: `[x, y, z]`.
    pub const POSITION: Self = Self([true, true, true, false, false, false]);

    /// Orientation-only control: `[alpha, beta, gamma]`.
    pub const ORIENTATION: Self = Self([false, false, false, true, true, true]);

    /// Full 6-DOF pose control.
    pub const ALL: Self = Self([true; 6]);

    /// Create a mask from explicit per-dimension flags.
    #[must_use]
    pub const fn new(flags: [bool; 6]) -> Self {
        Self(flags)
    }

    /// Number of actively controlled dimensions.
    #[must_use]
    pub fn n_ctrl(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }

    /// Whether any of the position dimensions `[x, y, z]` are controlled.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.0[..3].iter().any(|&f| f)
    }

    /// Whether any of the orientation dimensions are controlled.
    #[must_use]
    pub fn has_orientation(&self) -> bool {
        self.0[3..].iter().any(|&f| f)
    }

    /// The raw per-dimension flags.
    #[must_use]
    pub const fn flags(&self) -> [bool; 6] {
        self.0
    }

    /// Iterate over the task-dimension indices of the active flags, in
    /// ascending order. The iteration position is the row index in the
    /// restricted (masked) vectors and matrices.
    pub fn active_dims(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(dim, &f)| f.then_some(dim))
    }

    /// Restrict a full 6xN matrix to the active rows, producing an
    /// `n_ctrl`xN matrix.
    ///
    /// # Panics
    ///
    /// Panics if `full` does not have exactly 6 rows.
    #[must_use]
    pub fn select_rows(&self, full: &DMatrix<f64>) -> DMatrix<f64> {
        assert_eq!(full.nrows(), 6, "expected a 6-row task-space matrix");
        let n = full.ncols();
        let mut out = DMatrix::zeros(self.n_ctrl(), n);
        for (row, dim) in self.active_dims().enumerate() {
            for col in 0..n {
                out[(row, col)] = full[(dim, col)];
            }
        }
        out
    }

    /// Restrict a 6-element task vector to the active entries.
    #[must_use]
    pub fn select(&self, full: &Vector6<f64>) -> DVector<f64> {
        let mut out = DVector::zeros(self.n_ctrl());
        for (row, dim) in self.active_dims().enumerate() {
            out[row] = full[dim];
        }
        out
    }

    /// Restrict a 6-element slice to the active entries.
    ///
    /// # Panics
    ///
    /// Panics if `full` does not have exactly 6 elements; callers validate
    /// slice lengths before selection.
    #[must_use]
    pub fn select_slice(&self, full: &[f64]) -> DVector<f64> {
        assert_eq!(full.len(), 6, "expected a 6-element task-space vector");
        let mut out = DVector::zeros(self.n_ctrl());
        for (row, dim) in self.active_dims().enumerate() {
            out[row] = full[dim];
        }
        out
    }
}

impl Default for ControlledDof {
    fn default() -> Self {
        Self::POSITION
    }
}
