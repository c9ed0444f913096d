//! Samplers
//!
//! Low-discrepancy sample generation: the PMJ sample pattern table, Sobol
//! direction matrices and the pattern sampler built on them.

#[macro_use]
extern crate log;

mod pattern_sampler;
mod pattern_table;
mod pixel_seed;
mod pmj;
mod sobol_matrices;
mod stratification;

// Re-export.
pub use pattern_sampler::*;
pub use pattern_table::*;
pub use pixel_seed::*;
pub use pmj::{generate_pmj02_pattern, generate_pmj02_patterns};
pub use sobol_matrices::{sobol_matrices, sobol_u32, SobolMatrices, NUM_SOBOL_DIMENSIONS, SOBOL_BITS};
pub use stratification::*;
