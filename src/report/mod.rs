//! Reporting utilities: per-point residuals and formatted terminal output.
//!
//! Residuals use the solver's sign convention everywhere (tables, CSV export):
//! `residual = y_fit - y_obs`, so a positive value means the curve lies above
//! the observation.

pub mod format;

pub use format::*;

use crate::domain::{Dataset, FitResult, PointResidual};
use crate::models::predict;

/// Compute fitted values and residuals (`fitted - observed`) for each point.
pub fn compute_residuals(dataset: &Dataset, fit: &FitResult) -> Vec<PointResidual> {
    let params = fit.params();
    dataset
        .x()
        .iter()
        .zip(dataset.y())
        .map(|(&x, &y_obs)| {
            let y_fit = predict(x, params);
            PointResidual {
                x,
                y_obs,
                y_fit,
                residual: y_fit - y_obs,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BindingParams, Termination};
    use crate::models::residuals;

    #[test]
    fn residual_sign_matches_solver_residuals() {
        let dataset = Dataset::new(vec![1.0, 2.0, 4.0], vec![0.6, 0.6, 0.7]).unwrap();
        let fit = FitResult {
            bmax: 1.0,
            kd: 1.0,
            iterations: 3,
            converged: true,
            sum_squared_residuals: 0.0,
            r_squared: 0.0,
            termination: Termination::ObjectiveTolerance,
            initial_guess: BindingParams::new(0.7, 2.0),
        };

        let rows = compute_residuals(&dataset, &fit);
        let solver = residuals(fit.params(), dataset.x(), dataset.y()).unwrap();

        // y_fit(1) = 0.5 sits below y_obs = 0.6.
        assert!(rows[0].residual < 0.0);
        for (row, r) in rows.iter().zip(solver.iter()) {
            assert_eq!(row.residual, *r);
        }
    }
}
