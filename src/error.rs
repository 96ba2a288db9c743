//! Error types.
//!
//! Two layers:
//!
//! - typed library errors (`ValidationError`, `NumericError`) returned by the
//!   fitting core
//! - `AppError`, a message + process exit code used by the `kd` binary

use crate::domain::BindingParams;

/// Structurally invalid input. This is the only error that crosses the fit
/// session boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("x and y must have the same length (x has {x} values, y has {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("at least {min} points are required for a two-parameter fit, got {n}")]
    TooFewPoints { n: usize, min: usize },

    #[error("{axis}[{index}] is not a finite number")]
    NonFinite { axis: &'static str, index: usize },

    #[error("solver option `{name}` has an invalid value: {value}")]
    InvalidOption { name: &'static str, value: f64 },
}

/// Numerical pathologies raised inside the fit. The session absorbs all of
/// these into the `converged` / `r_squared` fields of the result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NumericError {
    #[error("model undefined at Kd = {kd} for x[{index}] = {x} (Kd + x = 0)")]
    Domain { index: usize, x: f64, kd: f64 },

    #[error("damped normal matrix is singular after {iterations} iterations (Bmax = {}, Kd = {})", .params.bmax, .params.kd)]
    SingularJacobian {
        params: BindingParams,
        iterations: usize,
    },

    #[error("observed values have zero variance but the fit leaves SS_res = {ss_res}")]
    DegenerateFit { ss_res: f64 },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(3, format!("Invalid input: {err}"))
    }
}
