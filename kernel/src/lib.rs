//! Kernel
//!
//! Shared types and utilities used by the sampling and integration crates.

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod film;
pub mod geometry;
pub mod hash;
pub mod integrator;
pub mod light;
pub mod math;
pub mod parallel;
pub mod rng;
pub mod sampling;
pub mod shader;
pub mod spectrum;
pub mod stats;
