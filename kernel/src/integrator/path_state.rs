//! Path State

use super::PathFlags;
use crate::geometry::{Point2u, Ray};
use crate::math::Float;
use crate::spectrum::Spectrum;

/// Per-path state carried between bounces. Owned and mutated by the path
/// integration loop; the background and light evaluators only read it.
#[derive(Copy, Clone, Debug)]
pub struct PathState {
    /// Current ray.
    pub ray: Ray,

    /// Accumulated path throughput.
    pub throughput: Spectrum,

    /// PDF of the current ray direction under BSDF sampling at the previous
    /// bounce.
    pub mis_ray_pdf: Float,

    /// Distance travelled since the last MIS bounce. Used to recover the
    /// position the light PDF is evaluated from.
    pub mis_ray_t: Float,

    /// Ray type and MIS flags.
    pub flag: PathFlags,

    /// Number of bounces so far; 0 for camera rays.
    pub bounce: u32,

    /// Index of the sample within the pixel.
    pub sample: u32,

    /// Pixel the path contributes to.
    pub pixel: Point2u,

    /// Per-pixel seed for the sample generator.
    pub rng_hash: u32,
}

impl PathState {
    /// Creates the state of a camera path.
    ///
    /// * `ray`      - Camera ray.
    /// * `pixel`    - Pixel the path contributes to.
    /// * `sample`   - Sample index within the pixel.
    /// * `rng_hash` - Per-pixel seed for the sample generator.
    pub fn new(ray: Ray, pixel: Point2u, sample: u32, rng_hash: u32) -> Self {
        Self {
            ray,
            throughput: Spectrum::ONE,
            mis_ray_pdf: 0.0,
            mis_ray_t: 0.0,
            flag: PathFlags::camera_ray(),
            bounce: 0,
            sample,
            pixel,
            rng_hash,
        }
    }

    /// Records a BSDF-sampled bounce. `pdf` is the BSDF sampling density of
    /// the new direction; singular bounces skip MIS for the next emission.
    ///
    /// * `ray`       - The scattered ray.
    /// * `bsdf_eval` - BSDF value times cosine divided by `pdf`.
    /// * `pdf`       - BSDF sampling PDF.
    /// * `flag`      - Lobe flags of the sampled bounce.
    pub fn scatter(&mut self, ray: Ray, bsdf_eval: Spectrum, pdf: Float, flag: PathFlags) {
        self.ray = ray;
        self.throughput = self.throughput * bsdf_eval;
        self.mis_ray_pdf = pdf;
        self.mis_ray_t = 0.0;
        self.bounce += 1;

        let keep = PathFlags::TRANSPARENT_BACKGROUND & self.flag;
        self.flag = keep | flag;
        if flag.contains(PathFlags::SINGULAR) {
            self.flag |= PathFlags::MIS_SKIP;
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
