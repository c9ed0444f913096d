//! Rays

use super::*;
use crate::math::INFINITY;

/// A Ray
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,
}

impl Ray {
    /// Returns a new ray.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    /// * `t_max`  - Maximum extent of the ray.
    /// * `time`   - Time value.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float) -> Self {
        Self { o, d, t_max, time }
    }

    /// Returns an unbounded ray escaping in direction `d`.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    pub fn escaping(o: Point3f, d: Vector3f) -> Self {
        Self::new(o, d, INFINITY, 0.0)
    }

    /// Returns position along the ray at given parameter `t`.
    ///
    /// * `t` - Parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}
