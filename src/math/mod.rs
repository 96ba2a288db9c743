//! Mathematical utilities: damped normal equations and summary statistics.

pub mod damped;
pub mod stats;

pub use damped::*;
pub use stats::*;
