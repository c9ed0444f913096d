//! Background Light
//!
//! Environment light evaluated for rays that escape the scene. An optional
//! latitude-longitude radiance map drives importance sampling; without one
//! directions are sampled uniformly over the sphere.

use kernel::geometry::*;
use kernel::math::*;
use kernel::sampling::*;
use kernel::shader::*;
use kernel::spectrum::*;

/// Background settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BackgroundConfig {
    /// Background shader.
    pub shader: ShaderId,

    /// Background is importance sampled and MIS weighted. The background
    /// shader must also carry `ShaderFlags::USE_MIS`.
    pub use_mis: bool,

    /// Camera rays see a transparent background.
    pub transparent: bool,

    /// Light group the background is written to.
    pub lightgroup: Option<usize>,

    /// Background takes part in manifold next event estimation.
    pub use_caustics: bool,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            shader: ShaderId::default(),
            use_mis: true,
            transparent: false,
            lightgroup: None,
            use_caustics: false,
        }
    }
}

/// Environment light with an optional importance map.
#[derive(Clone, Debug)]
pub struct BackgroundLight {
    /// Settings.
    pub config: BackgroundConfig,

    /// Importance map over (φ/2π, θ/π).
    distribution: Option<Distribution2D>,
}

impl BackgroundLight {
    /// Returns a `BackgroundLight` sampled uniformly over the sphere.
    ///
    /// * `config` - Background settings.
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            distribution: None,
        }
    }

    /// Returns a `BackgroundLight` importance sampled by the luminance of a
    /// latitude-longitude radiance map. Row 0 is the +z pole.
    ///
    /// * `config` - Background settings.
    /// * `width`  - Map width (φ resolution).
    /// * `height` - Map height (θ resolution).
    /// * `texels` - Radiance texels in row-major order.
    pub fn with_radiance_map(
        config: BackgroundConfig,
        width: usize,
        height: usize,
        texels: &[Spectrum],
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid radiance map resolution {}x{}", width, height));
        }
        if texels.len() != width * height {
            return Err(format!(
                "Radiance map has {} texels, expected {}x{}",
                texels.len(),
                width,
                height
            ));
        }
        if let Some(i) = texels.iter().position(|t| t.has_nans()) {
            return Err(format!("Radiance map texel {} is NaN", i));
        }

        // Scale by sin(θ) to account for the stretching of the map near the
        // poles.
        let func: Vec<Vec<Float>> = texels
            .chunks(width)
            .enumerate()
            .map(|(v, row)| {
                let sin_theta = (PI * (v as Float + 0.5) / height as Float).sin();
                row.iter().map(|t| max(t.y(), 0.0) * sin_theta).collect()
            })
            .collect();

        if func.iter().flatten().all(|&f| f == 0.0) {
            warn!("Radiance map is black; sampling the background uniformly.");
            return Ok(Self::new(config));
        }

        Ok(Self {
            config,
            distribution: Some(Distribution2D::new(func)),
        })
    }

    /// Returns true if escaped rays are MIS weighted against sampling this
    /// light. Both the setting and the shader flag must ask for MIS, the
    /// same flag distant lights are gated on.
    ///
    /// * `shader_flags` - Flags of the background shader.
    pub fn use_mis(&self, shader_flags: ShaderFlags) -> bool {
        self.config.use_mis && shader_flags.use_mis()
    }

    /// Returns true if the light has an importance map.
    pub fn has_importance_map(&self) -> bool {
        self.distribution.is_some()
    }

    /// Returns the solid angle PDF of sampling a direction, excluding light
    /// selection.
    ///
    /// * `d` - Unit direction.
    pub fn pdf(&self, d: &Vector3f) -> Float {
        match &self.distribution {
            None => uniform_sphere_pdf(),
            Some(distribution) => {
                let theta = spherical_theta(d.z);
                let phi = spherical_phi(d.x, d.y);
                let sin_theta = theta.sin();
                if sin_theta == 0.0 {
                    0.0
                } else {
                    distribution.pdf(&Point2f::new(phi * INV_TWO_PI, theta * INV_PI)) / (TWO_PI * PI * sin_theta)
                }
            }
        }
    }

    /// Samples a direction towards the background. Returns the direction and
    /// its solid angle PDF, or `None` when the sample is degenerate.
    ///
    /// * `u` - The random sample point.
    pub fn sample_direction(&self, u: &Point2f) -> Option<(Vector3f, Float)> {
        match &self.distribution {
            None => Some((uniform_sample_sphere(u), uniform_sphere_pdf())),
            Some(distribution) => {
                let (uv, map_pdf) = distribution.sample_continuous(u);
                if map_pdf == 0.0 {
                    return None;
                }

                let theta = uv.y * PI;
                let phi = uv.x * TWO_PI;
                let (sin_theta, cos_theta) = theta.sin_cos();
                if sin_theta == 0.0 {
                    return None;
                }

                let d = spherical_direction(sin_theta, cos_theta, phi);
                Some((d, map_pdf / (TWO_PI * PI * sin_theta)))
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
