//! Shader Flags

use crate::integrator::PathFlags;
use bitflags::bitflags;

bitflags! {
    /// Per-shader flags controlling MIS and light visibility.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ShaderFlags: u32 {
        /// Emission is importance sampled and MIS weighted.
        const USE_MIS = 1 << 0;

        /// Output is a constant colour; skip shader graph evaluation.
        const HAS_CONSTANT_EMISSION = 1 << 1;

        /// Invisible to diffuse bounces.
        const EXCLUDE_DIFFUSE = 1 << 2;

        /// Invisible to glossy reflection bounces.
        const EXCLUDE_GLOSSY = 1 << 3;

        /// Invisible to transmission bounces.
        const EXCLUDE_TRANSMIT = 1 << 4;

        /// Invisible to camera rays.
        const EXCLUDE_CAMERA = 1 << 5;

        /// Invisible to volume scattering bounces.
        const EXCLUDE_SCATTER = 1 << 6;

        /// All visibility exclusions.
        const EXCLUDE_ANY = Self::EXCLUDE_DIFFUSE.bits()
            | Self::EXCLUDE_GLOSSY.bits()
            | Self::EXCLUDE_TRANSMIT.bits()
            | Self::EXCLUDE_CAMERA.bits()
            | Self::EXCLUDE_SCATTER.bits();
    }
}

impl ShaderFlags {
    /// Returns true if a ray with the given path flags must not see this
    /// shader. Glossy exclusion only applies to glossy reflection; glossy
    /// transmission is governed by `EXCLUDE_TRANSMIT`.
    ///
    /// * `path_flag` - Ray type flags.
    pub fn excludes(&self, path_flag: PathFlags) -> bool {
        if !self.intersects(Self::EXCLUDE_ANY) {
            return false;
        }

        let glossy_reflect = PathFlags::GLOSSY | PathFlags::REFLECT;
        (self.contains(Self::EXCLUDE_DIFFUSE) && path_flag.contains(PathFlags::DIFFUSE))
            || (self.contains(Self::EXCLUDE_GLOSSY) && path_flag.contains(glossy_reflect))
            || (self.contains(Self::EXCLUDE_TRANSMIT) && path_flag.contains(PathFlags::TRANSMIT))
            || (self.contains(Self::EXCLUDE_CAMERA) && path_flag.contains(PathFlags::CAMERA))
            || (self.contains(Self::EXCLUDE_SCATTER) && path_flag.contains(PathFlags::VOLUME_SCATTER))
    }

    /// Returns true if emission is MIS weighted.
    pub fn use_mis(&self) -> bool {
        self.contains(Self::USE_MIS)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
