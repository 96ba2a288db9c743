//! Fit session: validate, guess, solve, score.
//!
//! This is the boundary of the fitting core. Structurally invalid input is the
//! only hard failure; every numerical problem (singular Jacobian, iteration
//! cap, degenerate R²) comes back as a `FitResult` with `converged = false`
//! and/or `r_squared = NaN`.

use log::{info, warn};

use crate::domain::{BindingParams, Dataset, FitResult, SolverOptions, Termination};
use crate::error::{NumericError, ValidationError};
use crate::fit::evaluator::r_squared;
use crate::fit::solver;
use crate::math::{max, median};
use crate::models::{evaluate, objective, residuals_from_predicted};

/// Fit with the default solver options.
pub fn run(x: &[f64], y: &[f64]) -> Result<FitResult, ValidationError> {
    run_with_options(x, y, &SolverOptions::default())
}

pub fn run_with_options(
    x: &[f64],
    y: &[f64],
    opts: &SolverOptions,
) -> Result<FitResult, ValidationError> {
    opts.validate()?;
    let dataset = Dataset::new(x.to_vec(), y.to_vec())?;
    Ok(fit_dataset(&dataset, opts))
}

/// Fit an already-validated dataset. Infallible by construction.
pub fn fit_dataset(dataset: &Dataset, opts: &SolverOptions) -> FitResult {
    let guess = initial_guess(dataset);
    let (x, y) = (dataset.x(), dataset.y());

    let (params, iterations, termination) = match solver::fit(x, y, guess, opts) {
        Ok(outcome) => (outcome.params, outcome.iterations, outcome.termination),
        Err(NumericError::SingularJacobian { params, iterations }) => {
            warn!("fit abandoned after {iterations} iterations: singular Jacobian");
            (params, iterations, Termination::SingularJacobian)
        }
        Err(err) => {
            warn!("fit could not start: {err}");
            (guess, 0, Termination::DomainError)
        }
    };

    let (sum_squared_residuals, r2) = match evaluate(x, params) {
        Ok(predicted) => {
            let ssr = objective(&residuals_from_predicted(&predicted, y));
            let r2 = r_squared(y, &predicted).unwrap_or_else(|err| {
                warn!("r_squared undefined: {err}");
                f64::NAN
            });
            (ssr, r2)
        }
        Err(err) => {
            warn!("cannot score final parameters: {err}");
            (f64::NAN, f64::NAN)
        }
    };

    let converged = termination.is_converged();
    if converged {
        info!(
            "fit converged in {iterations} iterations: Bmax={:.6} Kd={:.6} R²={:.6}",
            params.bmax, params.kd, r2
        );
    } else {
        warn!(
            "fit did not converge ({}): Bmax={:.6} Kd={:.6}",
            termination.display_name(),
            params.bmax,
            params.kd
        );
    }

    FitResult {
        bmax: params.bmax,
        kd: params.kd,
        iterations,
        converged,
        sum_squared_residuals,
        r_squared: r2,
        termination,
        initial_guess: guess,
    }
}

/// Heuristic starting point: `Bmax₀ = max(y)`, `Kd₀ = median(x)`.
///
/// Not guaranteed to avoid local minima.
pub fn initial_guess(dataset: &Dataset) -> BindingParams {
    let bmax = max(dataset.y()).unwrap_or(0.0);
    let kd = median(dataset.x()).unwrap_or(0.0);
    BindingParams::new(bmax, kd)
}
