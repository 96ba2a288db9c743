//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Minimum number of observations: two free parameters plus one.
pub const MIN_POINTS: usize = 3;

/// Paired concentration/response observations.
///
/// Construction validates the structural invariants, so a `Dataset` that
/// exists is always safe to hand to the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Dataset {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, ValidationError> {
        if x.len() != y.len() {
            return Err(ValidationError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < MIN_POINTS {
            return Err(ValidationError::TooFewPoints {
                n: x.len(),
                min: MIN_POINTS,
            });
        }
        if let Some(index) = x.iter().position(|v| !v.is_finite()) {
            return Err(ValidationError::NonFinite { axis: "x", index });
        }
        if let Some(index) = y.iter().position(|v| !v.is_finite()) {
            return Err(ValidationError::NonFinite { axis: "y", index });
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Concentration range `(min, max)`.
    pub fn x_range(&self) -> (f64, f64) {
        self.x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

/// The two model parameters `(Bmax, Kd)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BindingParams {
    /// Saturation amplitude.
    pub bmax: f64,
    /// Half-saturation constant.
    pub kd: f64,
}

impl BindingParams {
    pub fn new(bmax: f64, kd: f64) -> Self {
        Self { bmax, kd }
    }

    /// Euclidean norm of the parameter vector.
    pub fn norm(&self) -> f64 {
        self.bmax.hypot(self.kd)
    }

    pub fn is_finite(&self) -> bool {
        self.bmax.is_finite() && self.kd.is_finite()
    }
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Relative decrease of the objective fell below tolerance (or hit zero).
    ObjectiveTolerance,
    /// Proposed step was small relative to the parameter magnitude.
    StepTolerance,
    /// Iteration cap reached.
    MaxIterations,
    /// Damping passed its ceiling while no trial step improved the objective.
    Stalled,
    /// The damped normal matrix could not be factorized.
    SingularJacobian,
    /// The starting point was outside the model domain (`Kd + x_i = 0`).
    DomainError,
}

impl Termination {
    pub fn is_converged(self) -> bool {
        matches!(self, Termination::ObjectiveTolerance | Termination::StepTolerance)
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Termination::ObjectiveTolerance => "objective tolerance reached",
            Termination::StepTolerance => "step tolerance reached",
            Termination::MaxIterations => "iteration limit reached",
            Termination::Stalled => "stalled (damping ceiling)",
            Termination::SingularJacobian => "singular Jacobian",
            Termination::DomainError => "initial guess outside model domain",
        }
    }
}

/// Outcome of one fit session. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub bmax: f64,
    pub kd: f64,
    pub iterations: usize,
    pub converged: bool,
    #[serde(deserialize_with = "nan_from_null")]
    pub sum_squared_residuals: f64,
    /// `NaN` when the observed values have zero variance and the fit is not exact.
    #[serde(deserialize_with = "nan_from_null")]
    pub r_squared: f64,
    pub termination: Termination,
    pub initial_guess: BindingParams,
}

impl FitResult {
    pub fn params(&self) -> BindingParams {
        BindingParams::new(self.bmax, self.kd)
    }
}

// serde_json writes non-finite floats as `null`.
fn nan_from_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Levenberg–Marquardt tuning knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub initial_lambda: f64,
    /// Multiplier applied to λ after an accepted step (< 1).
    pub lambda_shrink: f64,
    /// Multiplier applied to λ after a rejected step (> 1).
    pub lambda_grow: f64,
    pub lambda_ceiling: f64,
    /// Relative objective decrease below which the fit is converged.
    pub objective_tolerance: f64,
    /// Step norm, relative to the parameter norm, below which the fit is converged.
    pub step_tolerance: f64,
    pub max_iterations: usize,
    /// Consecutive singular factorizations above the λ ceiling before giving up.
    pub singular_retry_limit: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            initial_lambda: 1e-3,
            lambda_shrink: 0.5,
            lambda_grow: 2.0,
            lambda_ceiling: 1e12,
            objective_tolerance: 1e-8,
            step_tolerance: 1e-8,
            max_iterations: 200,
            singular_retry_limit: 3,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("initial_lambda", self.initial_lambda),
            ("lambda_ceiling", self.lambda_ceiling),
            ("objective_tolerance", self.objective_tolerance),
            ("step_tolerance", self.step_tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::InvalidOption { name, value });
            }
        }
        if !(self.lambda_shrink.is_finite() && self.lambda_shrink > 0.0 && self.lambda_shrink < 1.0) {
            return Err(ValidationError::InvalidOption {
                name: "lambda_shrink",
                value: self.lambda_shrink,
            });
        }
        if !(self.lambda_grow.is_finite() && self.lambda_grow > 1.0) {
            return Err(ValidationError::InvalidOption {
                name: "lambda_grow",
                value: self.lambda_grow,
            });
        }
        if self.lambda_ceiling <= self.initial_lambda {
            return Err(ValidationError::InvalidOption {
                name: "lambda_ceiling",
                value: self.lambda_ceiling,
            });
        }
        if self.max_iterations == 0 {
            return Err(ValidationError::InvalidOption {
                name: "max_iterations",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// A per-point fitted value (used for reports and exports).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointResidual {
    pub x: f64,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub solver: SolverOptions,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Number of samples on the fitted curve grid.
    pub curve_points: usize,

    pub export_fit: Option<PathBuf>,
    pub export_residuals: Option<PathBuf>,
}

/// A saved fit file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub result: FitResult,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}
