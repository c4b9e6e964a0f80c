//! Ordinary least squares via the normal equations.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! in closed form as `β = (XᵀX)⁻¹ Xᵀy`. The inverse `(XᵀX)⁻¹` is kept because
//! coefficient standard errors are read off its diagonal.
//!
//! Implementation choices:
//! - `XᵀX` is symmetric positive definite for a full-rank design, so we factor it
//!   with Cholesky and reuse the factorization for both the solve and the inverse.
//! - Rank is checked up front with the singular values of `X` (the same tolerance
//!   numpy's `matrix_rank` uses). Cholesky alone can succeed on an exactly
//!   collinear design because rounding leaves a tiny positive pivot.

use nalgebra::{DMatrix, DVector};

/// Solution of the normal equations.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    pub beta: DVector<f64>,
    pub xtx_inv: DMatrix<f64>,
    /// Ratio of the largest to the smallest singular value of `X`.
    pub condition_number: f64,
}

/// Solve the normal equations for `x β ≈ y`.
///
/// Returns `None` if `x` is rank deficient or the solve produces non-finite values.
pub fn solve_normal_equations(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<NormalEquations> {
    if x.nrows() == 0 || x.ncols() == 0 || x.nrows() != y.len() {
        return None;
    }

    let singular_values = x.clone().svd(false, false).singular_values;
    let s_max = singular_values.max();
    let s_min = singular_values.min();
    let tol = s_max * (x.nrows().max(x.ncols()) as f64) * f64::EPSILON;
    if !(s_min > tol) {
        return None;
    }

    let xt = x.transpose();
    let xtx = &xt * x;
    let chol = xtx.cholesky()?;
    let beta = chol.solve(&(&xt * y));
    let xtx_inv = chol.inverse();

    if !beta.iter().chain(xtx_inv.iter()).all(|v| v.is_finite()) {
        return None;
    }

    Some(NormalEquations {
        beta,
        xtx_inv,
        condition_number: s_max / s_min,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_equations_solve_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let sol = solve_normal_equations(&x, &y).unwrap();
        assert!((sol.beta[0] - 2.0).abs() < 1e-10);
        assert!((sol.beta[1] - 3.0).abs() < 1e-10);

        // (XᵀX)⁻¹ for this design is [[5/6, -1/2], [-1/2, 1/2]].
        assert!((sol.xtx_inv[(0, 0)] - 5.0 / 6.0).abs() < 1e-10);
        assert!((sol.xtx_inv[(0, 1)] + 0.5).abs() < 1e-10);
        assert!((sol.xtx_inv[(1, 1)] - 0.5).abs() < 1e-10);
        assert!(sol.condition_number >= 1.0);
    }

    #[test]
    fn collinear_design_is_rejected() {
        // Second regressor is exactly twice the first.
        let x = DMatrix::from_row_slice(
            4,
            3,
            &[1.0, 1.0, 2.0, 1.0, 2.0, 4.0, 1.0, 3.0, 6.0, 1.0, 4.0, 8.0],
        );
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert!(solve_normal_equations(&x, &y).is_none());
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(solve_normal_equations(&x, &y).is_none());
    }
}
