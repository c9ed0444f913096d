//! Lights

#[macro_use]
extern crate log;

mod background;
mod distant;
mod light_list;

// Re-export.
pub use background::*;
pub use distant::*;
pub use light_list::*;
