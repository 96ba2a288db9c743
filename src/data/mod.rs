//! Built-in and synthetic datasets.

pub mod sample;

pub use sample::*;
