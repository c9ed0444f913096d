//! Path Flags

use bitflags::bitflags;

bitflags! {
    /// Ray type and MIS state of a path at its current bounce.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PathFlags: u32 {
        /// Camera ray, no bounce yet.
        const CAMERA = 1 << 0;

        /// Previous bounce sampled a reflection lobe.
        const REFLECT = 1 << 1;

        /// Previous bounce sampled a transmission lobe.
        const TRANSMIT = 1 << 2;

        /// Previous bounce sampled a diffuse lobe.
        const DIFFUSE = 1 << 3;

        /// Previous bounce sampled a glossy lobe.
        const GLOSSY = 1 << 4;

        /// Previous bounce sampled a singular (perfectly specular) lobe.
        const SINGULAR = 1 << 5;

        /// Previous bounce scattered inside a volume.
        const VOLUME_SCATTER = 1 << 6;

        /// Do not MIS weight emission hit by this ray.
        const MIS_SKIP = 1 << 7;

        /// Ray only contributes to the alpha of a transparent film.
        const TRANSPARENT_BACKGROUND = 1 << 8;

        /// Light connection was already made by manifold next event
        /// estimation for caustics.
        const MNEE_CULL_LIGHT_CONNECTION = 1 << 9;
    }
}

impl PathFlags {
    /// Flags of a fresh camera ray. Emission seen directly by the camera is
    /// never MIS weighted.
    pub fn camera_ray() -> Self {
        Self::CAMERA | Self::MIS_SKIP
    }
}
