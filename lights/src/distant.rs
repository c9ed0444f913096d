//! Distant Source

use kernel::geometry::*;
use kernel::light::*;
use kernel::math::*;
use kernel::shader::*;
use kernel::spectrum::*;

/// Implements a sun-like light at infinity that covers a small disk of
/// directions around its axis.
#[derive(Clone, Debug)]
pub struct DistantLight {
    /// Unit direction from the scene towards the light.
    pub dir: Vector3f,

    /// Full angular diameter of the disk in radians.
    pub angle: Float,

    /// Angular radius of the disk in radians.
    pub radius: Float,

    /// Cosine of the angular radius.
    pub cosangle: Float,

    /// Inverse area of the disk projected at unit distance.
    pub invarea: Float,

    /// Emission strength.
    pub strength: Spectrum,

    /// Light shader.
    pub shader: ShaderId,

    /// Flags of the light shader.
    pub shader_flags: ShaderFlags,

    /// Light group the emission is written to.
    pub lightgroup: Option<usize>,

    /// Light takes part in manifold next event estimation.
    pub use_caustics: bool,
}

impl DistantLight {
    /// Returns a new `DistantLight`. The direction must be finite and
    /// non-zero; it is normalized.
    ///
    /// * `dir`          - Direction towards the light.
    /// * `angle`        - Angular diameter in radians; clamped to [0, π].
    /// * `strength`     - Emission strength.
    /// * `shader`       - Light shader.
    /// * `shader_flags` - Flags of the light shader.
    /// * `lightgroup`   - Light group the emission is written to.
    pub fn new(
        dir: Vector3f,
        angle: Float,
        strength: Spectrum,
        shader: ShaderId,
        shader_flags: ShaderFlags,
        lightgroup: Option<usize>,
    ) -> Result<Self, String> {
        if dir.has_nans() || !dir.length_squared().is_normal() {
            return Err(format!("Invalid distant light direction {:?}", dir));
        }
        if angle.is_nan() {
            return Err(String::from("Distant light angle is NaN"));
        }

        let angle = clamp(angle, 0.0, PI);
        let radius = 0.5 * angle;
        let tan_radius = radius.tan();
        let area = PI * tan_radius * tan_radius;
        let invarea = if area > 0.0 { 1.0 / area } else { 1.0 };

        Ok(Self {
            dir: dir.normalize(),
            angle,
            radius,
            cosangle: radius.cos(),
            invarea,
            strength,
            shader,
            shader_flags,
            lightgroup,
            use_caustics: false,
        })
    }

    /// Reconstructs the light sample for a ray that escaped the scene along
    /// `d`. Returns `None` when the direction lies outside the light's disk,
    /// the light has no extent or it does not take part in MIS.
    ///
    /// * `d`                    - Unit ray direction.
    /// * `light_index`          - Index of this light in the light list.
    /// * `light_selection_pdf`  - Probability of picking this light.
    pub fn sample_from_ray(&self, d: &Vector3f, light_index: usize, light_selection_pdf: Float) -> Option<LightSample> {
        if !self.shader_flags.use_mis() || self.radius == 0.0 {
            return None;
        }

        let costheta = self.dir.dot(d);
        if costheta < self.cosangle {
            return None;
        }

        let eval_fac = self.invarea / (costheta * costheta * costheta);
        Some(LightSample {
            light_type: LightType::Distant,
            light_index,
            shader: self.shader,
            shader_flags: self.shader_flags,
            p: Point3f::default(),
            d: *d,
            t: INFINITY,
            pdf: eval_fac * light_selection_pdf,
            eval_fac,
            lightgroup: self.lightgroup,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn sun(angle: Float, flags: ShaderFlags) -> DistantLight {
        DistantLight::new(Vector3f::new(0.0, 0.0, 2.0), angle, Spectrum::ONE, ShaderId(1), flags, Some(0)).unwrap()
    }

    /// Direction at angular distance `theta` from +z.
    fn tilted(theta: Float) -> Vector3f {
        spherical_direction(theta.sin(), theta.cos(), 0.3)
    }

    #[test]
    fn matches_its_own_direction() {
        let light = sun(0.2, ShaderFlags::USE_MIS);
        let ls = light.sample_from_ray(&Vector3f::new(0.0, 0.0, 1.0), 3, 0.5);
        let ls = ls.expect("axis direction must match");
        assert_eq!(ls.light_type, LightType::Distant);
        assert_eq!(ls.light_index, 3);
        assert_eq!(ls.lightgroup, Some(0));
        assert_eq!(ls.t, INFINITY);
        assert!(approx_eq!(f32, ls.eval_fac, light.invarea, epsilon = 1e-3));
        assert!(approx_eq!(f32, ls.pdf, 0.5 * ls.eval_fac, ulps = 2));
    }

    #[test]
    fn rejects_directions_outside_the_disk() {
        let light = sun(0.2, ShaderFlags::USE_MIS);
        assert!(light.sample_from_ray(&tilted(0.05), 0, 1.0).is_some());
        assert!(light.sample_from_ray(&tilted(0.15), 0, 1.0).is_none());
        assert!(light.sample_from_ray(&Vector3f::new(0.0, 0.0, -1.0), 0, 1.0).is_none());
    }

    #[test]
    fn pdf_grows_towards_the_rim() {
        let light = sun(0.4, ShaderFlags::USE_MIS);
        let centre = light.sample_from_ray(&tilted(0.0), 0, 1.0).map(|ls| ls.pdf);
        let rim = light.sample_from_ray(&tilted(0.19), 0, 1.0).map(|ls| ls.pdf);
        match (centre, rim) {
            (Some(c), Some(r)) => assert!(r > c),
            _ => panic!("both directions lie inside the disk"),
        }
    }

    #[test]
    fn zero_angle_never_matches() {
        let light = sun(0.0, ShaderFlags::USE_MIS);
        assert_eq!(light.invarea, 1.0);
        assert!(light.sample_from_ray(&Vector3f::new(0.0, 0.0, 1.0), 0, 1.0).is_none());
    }

    #[test]
    fn lights_without_mis_never_match() {
        let light = sun(0.2, ShaderFlags::empty());
        assert!(light.sample_from_ray(&Vector3f::new(0.0, 0.0, 1.0), 0, 1.0).is_none());
    }

    #[test]
    fn degenerate_directions_are_rejected() {
        let new = |dir: Vector3f, angle: Float| {
            DistantLight::new(dir, angle, Spectrum::ONE, ShaderId(1), ShaderFlags::USE_MIS, None)
        };
        assert!(new(Vector3f::new(0.0, 0.0, 0.0), 0.2).is_err());
        assert!(new(Vector3f::new(0.0, Float::NAN, 1.0), 0.2).is_err());
        assert!(new(Vector3f::new(INFINITY, 0.0, 0.0), 0.2).is_err());
        assert!(new(Vector3f::new(0.0, 0.0, 1.0), Float::NAN).is_err());

        let light = new(Vector3f::new(0.0, 3.0, 0.0), 0.2).unwrap();
        assert!(!light.dir.has_nans());
        assert!(approx_eq!(f32, light.dir.length(), 1.0, ulps = 2));
    }

    #[test]
    fn invarea_of_a_known_disk() {
        let light = sun(2.0 * (0.5 as Float).atan(), ShaderFlags::USE_MIS);
        assert!(approx_eq!(f32, light.invarea, 4.0 / PI, epsilon = 1e-4));
        assert!(approx_eq!(f32, light.cosangle, 2.0 / (5.0 as Float).sqrt(), epsilon = 1e-5));
    }
}
