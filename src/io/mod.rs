//! Input/output helpers.
//!
//! - comma-separated number lists (`parse`)
//! - CSV ingest (`ingest`)
//! - fit JSON + residual CSV exports (`export`)

pub mod export;
pub mod ingest;
pub mod parse;

pub use export::*;
pub use ingest::*;
pub use parse::*;
