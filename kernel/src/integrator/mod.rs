//! Integrator

mod config;
mod path_flags;
mod path_state;

// Re-export
pub use config::*;
pub use path_flags::*;
pub use path_state::*;
