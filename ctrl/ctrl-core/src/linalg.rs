//! Dense linear-algebra routines for the task-space inertia mapping.
//!
//! Pure math with no controller state: LU factorization for the
//! joint-space mass matrix and the determinant screen on the task-space
//! inertia, plus the damped pseudo-inverse used near kinematic
//! singularities.

use nalgebra::DMatrix;

/// Determinant magnitude above which the task-space inertia is inverted
/// directly. Below it the configuration is treated as near-singular and
/// the damped pseudo-inverse takes over.
pub const DET_THRESHOLD: f64 = 1e-5;

/// Relative singular-value cutoff for the damped pseudo-inverse: singular
/// values below this fraction of the largest one are zeroed.
pub const SV_CUTOFF_RATIO: f64 = 0.005;

/// Pivot magnitude below which LU factorization reports a singular matrix.
const LU_PIVOT_MIN: f64 = 1e-30;

/// Dense LU factorization with partial pivoting.
///
/// Factors `A = P*L*U`, storing L (unit lower) and U (upper) in one
/// matrix and the row permutation separately. O(n^3/3). Serves three
/// consumers: the determinant screen, linear solves, and the full inverse.
#[derive(Debug, Clone)]
pub(crate) struct Lu {
    lu: DMatrix<f64>,
    piv: Vec<usize>,
    /// Permutation parity, +1 or -1, for the determinant.
    parity: f64,
}

impl Lu {
    /// Factor a square matrix. Returns `None` if any pivot magnitude falls
    /// below `1e-30` (singular to working precision).
    pub(crate) fn factor(a: &DMatrix<f64>) -> Option<Self> {
        debug_assert_eq!(a.nrows(), a.ncols());
        let n = a.nrows();
        let mut lu = a.clone();
        let mut piv = vec![0usize; n];
        let mut parity = 1.0;

        for k in 0..n {
            // Partial pivot: largest |lu[i,k]| for i in k..n
            let mut max_val = lu[(k, k)].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let v = lu[(i, k)].abs();
                if v > max_val {
                    max_val = v;
                    max_row = i;
                }
            }
            if max_val < LU_PIVOT_MIN {
                return None;
            }
            piv[k] = max_row;

            if max_row != k {
                lu.swap_rows(k, max_row);
                parity = -parity;
            }

            for i in (k + 1)..n {
                lu[(i, k)] /= lu[(k, k)];
                for j in (k + 1)..n {
                    let delta = lu[(i, k)] * lu[(k, j)];
                    lu[(i, j)] -= delta;
                }
            }
        }

        Some(Self { lu, piv, parity })
    }

    /// Determinant from the factored form: parity times the product of the
    /// U diagonal.
    #[must_use]
    pub(crate) fn determinant(&self) -> f64 {
        let mut det = self.parity;
        for i in 0..self.lu.nrows() {
            det *= self.lu[(i, i)];
        }
        det
    }

    /// Solve `A*x = b` in place using the stored factors. Can be called
    /// repeatedly for different right-hand sides.
    pub(crate) fn solve_in_place(&self, x: &mut [f64]) {
        let n = self.lu.nrows();

        // Apply the row permutation to the RHS
        for k in 0..n {
            if self.piv[k] != k {
                x.swap(k, self.piv[k]);
            }
        }

        // Forward substitution (L*y = P*b)
        for i in 1..n {
            for k in 0..i {
                x[i] -= self.lu[(i, k)] * x[k];
            }
        }

        // Back substitution (U*x = y)
        for i in (0..n).rev() {
            for k in (i + 1)..n {
                x[i] -= self.lu[(i, k)] * x[k];
            }
            x[i] /= self.lu[(i, i)];
        }
    }

    /// Full inverse, one column solve per unit vector.
    #[must_use]
    pub(crate) fn inverse(&self) -> DMatrix<f64> {
        let n = self.lu.nrows();
        let mut inv = DMatrix::zeros(n, n);
        let mut col = vec![0.0; n];
        for j in 0..n {
            col.fill(0.0);
            col[j] = 1.0;
            self.solve_in_place(&mut col);
            for i in 0..n {
                inv[(i, j)] = col[i];
            }
        }
        inv
    }
}

/// Damped pseudo-inverse with a singular-value cutoff *relative* to the
/// largest singular value: directions below `rcond * sigma_max` are zeroed
/// instead of amplified, which keeps the result bounded at rank
/// deficiency.
#[must_use]
pub fn damped_pseudo_inverse(m: &DMatrix<f64>, rcond: f64) -> DMatrix<f64> {
    let (nrows, ncols) = m.shape();
    if nrows == 0 || ncols == 0 {
        return DMatrix::zeros(ncols, nrows);
    }
    let svd = m.clone().svd(true, true);
    let sigma_max = svd
        .singular_values
        .iter()
        .fold(0.0_f64, |acc, &s| acc.max(s));
    // pseudo_inverse only errors on a negative epsilon
    svd.pseudo_inverse(rcond * sigma_max)
        .unwrap_or_else(|_| DMatrix::zeros(ncols, nrows))
}

/// Invert the task-space inertia `Mx_inv`, falling back to a damped
/// pseudo-inverse near kinematic singularities.
///
/// Away from singularities (`|det| >= 1e-5`) the direct inverse is both
/// faster and more exact, so the two paths are kept explicit rather than
/// collapsed into one generic pseudo-inverse. Returns the inverse and
/// whether the damped fallback was taken.
#[must_use]
pub fn task_inertia(mx_inv: &DMatrix<f64>) -> (DMatrix<f64>, bool) {
    if let Some(lu) = Lu::factor(mx_inv) {
        if lu.determinant().abs() >= DET_THRESHOLD {
            return (lu.inverse(), false);
        }
    }
    (damped_pseudo_inverse(mx_inv, SV_CUTOFF_RATIO), true)
}
