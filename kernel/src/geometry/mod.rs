//! Geometry

mod common;
mod point2;
mod point3;
mod ray;
mod vector3;

// Re-export
pub use crate::math::Float;
pub use common::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use vector3::*;
