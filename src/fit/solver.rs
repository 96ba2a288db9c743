//! Levenberg–Marquardt nonlinear least squares for the binding model.
//!
//! Given observations `(x_i, y_i)` and a starting point, we iterate:
//!
//! 1. compute residuals `r` and the analytic Jacobian `J` at the current point
//! 2. solve `(JᵀJ + λI) Δp = -Jᵀr`
//! 3. try `p + Δp`: accept on a strict decrease of `Σ r²` (shrink λ), otherwise
//!    reject and grow λ, retrying from the same point
//!
//! A trial point that hits `Kd + x_i = 0` counts as a rejected step. Rejected
//! trials do not advance the iteration count, so `iterations` is the number
//! of Jacobian evaluations.
//!
//! The solver never discards parameters: every non-error outcome carries the
//! last accepted point, converged or not.

use log::{debug, trace};
use nalgebra::DVector;

use crate::domain::{BindingParams, SolverOptions, Termination};
use crate::error::NumericError;
use crate::math::solve_damped_normal_equations;
use crate::models::{jacobian, objective, residuals};

/// What one solver invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub params: BindingParams,
    /// Outer iterations started, i.e. Jacobian evaluations. The last one is
    /// counted even when it stopped without accepting a step.
    pub iterations: usize,
    pub converged: bool,
    pub termination: Termination,
    pub sum_squared_residuals: f64,
}

/// Mutable per-invocation state. Never shared across calls.
struct SolverState {
    params: BindingParams,
    residuals: DVector<f64>,
    ssr: f64,
    lambda: f64,
    iterations: usize,
}

impl SolverState {
    fn finish(self, termination: Termination) -> SolverOutcome {
        SolverOutcome {
            params: self.params,
            iterations: self.iterations,
            converged: termination.is_converged(),
            termination,
            sum_squared_residuals: self.ssr,
        }
    }
}

enum Trial {
    Accepted,
    Converged(Termination),
    GaveUp(Termination),
}

/// Fit `(Bmax, Kd)` to `(x, y)` starting from `initial`.
///
/// Errors:
/// - `NumericError::Domain` if the starting point itself is outside the model
///   domain (there is no accepted point to fall back to)
/// - `NumericError::SingularJacobian` if the damped normal matrix stays
///   singular above the λ ceiling; it carries the last accepted parameters and
///   the iteration count including the iteration that failed
pub fn fit(
    x: &[f64],
    y: &[f64],
    initial: BindingParams,
    opts: &SolverOptions,
) -> Result<SolverOutcome, NumericError> {
    let r0 = residuals(initial, x, y)?;
    let ssr0 = objective(&r0);
    let mut state = SolverState {
        params: initial,
        residuals: r0,
        ssr: ssr0,
        lambda: opts.initial_lambda,
        iterations: 0,
    };
    debug!(
        "lm start: bmax={:.6} kd={:.6} ssr={:.6e}",
        initial.bmax, initial.kd, state.ssr
    );

    if state.ssr == 0.0 {
        return Ok(state.finish(Termination::ObjectiveTolerance));
    }

    while state.iterations < opts.max_iterations {
        state.iterations += 1;

        match iterate(&mut state, x, y, opts)? {
            Trial::Accepted => {}
            Trial::Converged(termination) | Trial::GaveUp(termination) => {
                debug!(
                    "lm stop after {} iterations: {}",
                    state.iterations,
                    termination.display_name()
                );
                return Ok(state.finish(termination));
            }
        }
    }

    debug!("lm hit iteration cap ({})", opts.max_iterations);
    Ok(state.finish(Termination::MaxIterations))
}

/// One outer iteration: a single Jacobian, then as many damped trials as it
/// takes to either accept a step or give up.
fn iterate(
    state: &mut SolverState,
    x: &[f64],
    y: &[f64],
    opts: &SolverOptions,
) -> Result<Trial, NumericError> {
    let jac = jacobian(x, state.params)?;
    let jtj = jac.tr_mul(&jac);
    let jtr = jac.tr_mul(&state.residuals);

    let mut singular_streak = 0usize;

    loop {
        let Some(step) = solve_damped_normal_equations(&jtj, &jtr, state.lambda) else {
            state.lambda *= opts.lambda_grow;
            if state.lambda > opts.lambda_ceiling {
                singular_streak += 1;
                if singular_streak >= opts.singular_retry_limit {
                    return Err(NumericError::SingularJacobian {
                        params: state.params,
                        iterations: state.iterations,
                    });
                }
            }
            trace!("singular damped matrix, lambda -> {:.3e}", state.lambda);
            continue;
        };
        singular_streak = 0;

        let step_norm = step.norm();
        let param_norm = state.params.norm();
        if step_norm <= opts.step_tolerance * (param_norm + opts.step_tolerance) {
            return Ok(Trial::Converged(Termination::StepTolerance));
        }

        let candidate = BindingParams::new(state.params.bmax + step[0], state.params.kd + step[1]);
        if let Some(trial) = apply_trial(state, candidate, x, y, opts) {
            return Ok(trial);
        }
    }
}

/// Try `candidate` against the current point.
///
/// On a strict decrease the candidate is accepted and λ shrinks. Otherwise λ
/// grows and `None` asks the caller to re-solve from the same point, unless λ
/// has passed its ceiling, in which case the solver has stalled.
fn apply_trial(
    state: &mut SolverState,
    candidate: BindingParams,
    x: &[f64],
    y: &[f64],
    opts: &SolverOptions,
) -> Option<Trial> {
    // Exact ties count as non-improvement.
    let Some((r, ssr)) = trial_ssr(candidate, x, y).filter(|(_, ssr)| *ssr < state.ssr) else {
        state.lambda *= opts.lambda_grow;
        trace!("reject step (lambda -> {:.3e})", state.lambda);
        if state.lambda > opts.lambda_ceiling {
            return Some(Trial::GaveUp(Termination::Stalled));
        }
        return None;
    };

    let relative_decrease = (state.ssr - ssr) / state.ssr;
    state.params = candidate;
    state.residuals = r;
    state.ssr = ssr;
    state.lambda *= opts.lambda_shrink;
    debug!(
        "iter {}: bmax={:.8} kd={:.8} ssr={:.6e} lambda={:.3e}",
        state.iterations, candidate.bmax, candidate.kd, ssr, state.lambda
    );

    if ssr == 0.0 || relative_decrease <= opts.objective_tolerance {
        Some(Trial::Converged(Termination::ObjectiveTolerance))
    } else {
        Some(Trial::Accepted)
    }
}

/// Residuals and SSR at a trial point, or `None` if the point is outside the
/// model domain or the objective is not finite.
fn trial_ssr(candidate: BindingParams, x: &[f64], y: &[f64]) -> Option<(DVector<f64>, f64)> {
    match residuals(candidate, x, y) {
        Ok(r) => {
            let ssr = objective(&r);
            ssr.is_finite().then_some((r, ssr))
        }
        Err(err) => {
            trace!("trial point rejected: {err}");
            None
        }
    }
}
