//! Scene light list.

use crate::background::*;
use crate::distant::*;
use kernel::geometry::*;
use kernel::light::*;
use kernel::math::*;

/// A light in the scene.
#[derive(Clone, Debug)]
pub enum Light {
    /// Environment light.
    Background(BackgroundLight),

    /// Sun-like light at infinity.
    Distant(DistantLight),
}

/// Lights visible to rays escaping the scene.
#[derive(Clone, Debug, Default)]
pub struct LightList {
    lights: Vec<Light>,
    background: Option<usize>,
}

impl LightList {
    /// Returns a new `LightList`. At most one background light is allowed.
    ///
    /// * `lights` - The lights.
    pub fn new(lights: Vec<Light>) -> Result<Self, String> {
        let mut background = None;
        for (i, light) in lights.iter().enumerate() {
            if let Light::Background(_) = light {
                if let Some(first) = background {
                    return Err(format!("Lights {} and {} are both background lights", first, i));
                }
                background = Some(i);
            }
        }

        debug!(
            "Light list: {} lights, background {}",
            lights.len(),
            if background.is_some() { "present" } else { "absent" }
        );
        Ok(Self { lights, background })
    }

    /// Returns the number of lights.
    pub fn num_all_lights(&self) -> usize {
        self.lights.len()
    }

    /// Returns the lights.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Returns the background light.
    pub fn background(&self) -> Option<&BackgroundLight> {
        match self.background.map(|i| &self.lights[i]) {
            Some(Light::Background(light)) => Some(light),
            _ => None,
        }
    }

    /// Returns light `light_index` if it is a distant light.
    ///
    /// * `light_index` - Index of the light.
    pub fn distant(&self, light_index: usize) -> Option<&DistantLight> {
        match self.lights.get(light_index) {
            Some(Light::Distant(light)) => Some(light),
            _ => None,
        }
    }

    /// Returns the index of the background light.
    pub fn background_index(&self) -> Option<usize> {
        self.background
    }

    /// Returns the probability of picking any one light.
    pub fn light_selection_pdf(&self) -> Float {
        if self.lights.is_empty() {
            0.0
        } else {
            1.0 / self.lights.len() as Float
        }
    }

    /// Returns the PDF with which light sampling would have produced the
    /// direction `d` from `p`, including light selection. Zero without a
    /// background light.
    ///
    /// * `_p` - Origin of the ray.
    /// * `d`  - Unit ray direction.
    pub fn background_light_pdf(&self, _p: &Point3f, d: &Vector3f) -> Float {
        self.background()
            .map_or(0.0, |light| light.pdf(d) * self.light_selection_pdf())
    }

    /// Reconstructs a light sample from a ray escaping along `d` when light
    /// `light_index` is a distant light whose disk contains `d`.
    ///
    /// * `d`           - Unit ray direction.
    /// * `light_index` - Index of the light.
    pub fn light_sample_from_distant_ray(&self, d: &Vector3f, light_index: usize) -> Option<LightSample> {
        self.distant(light_index)
            .and_then(|light| light.sample_from_ray(d, light_index, self.light_selection_pdf()))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use kernel::shader::*;
    use kernel::spectrum::*;

    fn sun() -> Light {
        Light::Distant(DistantLight::new(
            Vector3f::new(0.0, 0.0, 1.0),
            0.1,
            Spectrum::new(3.0),
            ShaderId(2),
            ShaderFlags::USE_MIS,
            None,
        )
        .expect("valid sun"))
    }

    fn sky() -> Light {
        Light::Background(BackgroundLight::new(BackgroundConfig::default()))
    }

    #[test]
    fn selection_pdf_is_uniform() {
        let list = LightList::new(vec![sky(), sun(), sun(), sun()]).expect("one background");
        assert_eq!(list.num_all_lights(), 4);
        assert_eq!(list.light_selection_pdf(), 0.25);
        assert_eq!(list.background_index(), Some(0));
        assert!(LightList::default().light_selection_pdf() == 0.0);
    }

    #[test]
    fn background_pdf_includes_selection() {
        let list = LightList::new(vec![sun(), sky()]).expect("one background");
        let pdf = list.background_light_pdf(&Point3f::default(), &Vector3f::new(1.0, 0.0, 0.0));
        assert!(approx_eq!(f32, pdf, 0.5 * INV_FOUR_PI, ulps = 2));
    }

    #[test]
    fn no_background_means_zero_pdf() {
        let list = LightList::new(vec![sun()]).expect("no background");
        assert!(list.background().is_none());
        assert_eq!(list.background_light_pdf(&Point3f::default(), &Vector3f::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn two_backgrounds_are_rejected() {
        assert!(LightList::new(vec![sky(), sun(), sky()]).is_err());
    }

    #[test]
    fn distant_ray_lookup_by_index() {
        let list = LightList::new(vec![sky(), sun()]).expect("one background");
        let up = Vector3f::new(0.0, 0.0, 1.0);

        let ls = list.light_sample_from_distant_ray(&up, 1).expect("inside the disk");
        assert_eq!(ls.light_index, 1);
        assert!(approx_eq!(f32, ls.pdf, 0.5 * ls.eval_fac, ulps = 2));

        assert!(list.light_sample_from_distant_ray(&up, 0).is_none());
        assert!(list.light_sample_from_distant_ray(&up, 7).is_none());
        assert!(list.light_sample_from_distant_ray(&Vector3f::new(1.0, 0.0, 0.0), 1).is_none());
    }
}
