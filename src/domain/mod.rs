//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated input observations (`Dataset`)
//! - model parameters (`BindingParams`) and solver tuning (`SolverOptions`)
//! - fit outputs (`FitResult`, `Termination`, `PointResidual`, `FitFile`)

pub mod types;

pub use types::*;
