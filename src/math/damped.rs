//! Damped normal equations solver.
//!
//! Each Levenberg–Marquardt iteration solves
//!
//! ```text
//! (JᵀJ + λI) Δp = -Jᵀr
//! ```
//!
//! The system is symmetric and, for any λ > 0 and finite `J`, positive definite,
//! so we factor it with Cholesky. A failed factorization (or a non-finite step)
//! means the matrix is numerically singular and the caller should grow λ.

use nalgebra::{DMatrix, DVector};

/// Solve the damped normal equations for the parameter step.
///
/// `jtj` is `JᵀJ` and `jtr` is `Jᵀr`. Returns `None` if the damped matrix is
/// not positive definite or the resulting step is not finite.
pub fn solve_damped_normal_equations(
    jtj: &DMatrix<f64>,
    jtr: &DVector<f64>,
    lambda: f64,
) -> Option<DVector<f64>> {
    let n = jtj.nrows();
    let damped = jtj + DMatrix::<f64>::identity(n, n) * lambda;
    if damped.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let chol = damped.cholesky()?;
    let step = chol.solve(&(-jtr));
    if step.iter().all(|v| v.is_finite()) {
        Some(step)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damped_solve_matches_hand_computation() {
        // (A + 1·I) s = -b with A = [[3, 1], [1, 2]], b = [-5, -5]
        // => [[4, 1], [1, 3]] s = [5, 5] => s = [10/11, 15/11]
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_row_slice(&[-5.0, -5.0]);
        let s = solve_damped_normal_equations(&a, &b, 1.0).unwrap();
        assert!((s[0] - 10.0 / 11.0).abs() < 1e-12);
        assert!((s[1] - 15.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn damping_regularizes_rank_deficient_matrix() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_row_slice(&[1.0, 1.0]);
        assert!(solve_damped_normal_equations(&a, &b, 1e-3).is_some());
    }

    #[test]
    fn non_finite_matrix_is_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[f64::INFINITY, 0.0, 0.0, 1.0]);
        let b = DVector::from_row_slice(&[1.0, 1.0]);
        assert!(solve_damped_normal_equations(&a, &b, 1.0).is_none());
    }
}
