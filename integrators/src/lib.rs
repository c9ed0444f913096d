//! Integrators

#[macro_use]
extern crate log;

mod accumulate;
mod shade_background;
mod shade_batch;

// Re-export.
pub use accumulate::*;
pub use shade_background::*;
pub use shade_batch::*;
