//! `kd-fit` library crate.
//!
//! Estimates `Bmax` and `Kd` of the one-site saturation binding model
//! `y = Bmax * x / (Kd + x)` with an explicit Levenberg–Marquardt solver.
//!
//! The binary (`kd`) is a thin wrapper around this library so that the fitting
//! core is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
