//! Common sampling functions.

use crate::geometry::*;
use crate::math::*;

/// Uniformly sample a direction on the unit sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u.x;
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u.y;
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn sphere_poles() {
        let north = uniform_sample_sphere(&Point2f::new(0.0, 0.0));
        assert!(approx_eq!(f32, north.z, 1.0, epsilon = 1e-6));
        let south = uniform_sample_sphere(&Point2f::new(1.0, 0.5));
        assert!(approx_eq!(f32, south.z, -1.0, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn sphere_samples_are_unit_length(u in 0.0f32..1.0, v in 0.0f32..1.0) {
            let d = uniform_sample_sphere(&Point2f::new(u, v));
            prop_assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }
}
