//! One-site saturation binding model.
//!
//! The model is implemented as small, pure functions so that the solver and the
//! presentation code can share them.

pub mod model;
pub mod residual;

pub use model::*;
pub use residual::*;
