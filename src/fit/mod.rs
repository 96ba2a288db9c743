//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - Levenberg–Marquardt refinement of `(Bmax, Kd)` (`solver`)
//! - coefficient of determination (`evaluator`)
//! - input validation, initial guess, and result packaging (`session`)

pub mod evaluator;
pub mod session;
pub mod solver;

pub use evaluator::*;
pub use session::*;
pub use solver::{SolverOutcome, fit};
