//! Lights

use crate::geometry::{Point3f, Vector3f};
use crate::math::Float;
use crate::shader::{ShaderFlags, ShaderId};

/// Light types known to the kernel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LightType {
    /// Environment light, evaluated for rays escaping the scene.
    Background,

    /// Sun-like light at infinity with an angular extent.
    Distant,
}

/// A light sample, either drawn by light sampling or reconstructed from a ray
/// that hit the light.
#[derive(Copy, Clone, Debug)]
pub struct LightSample {
    /// Light type.
    pub light_type: LightType,

    /// Index of the light in the scene's light list.
    pub light_index: usize,

    /// Light shader.
    pub shader: ShaderId,

    /// Flags of the light shader (MIS and visibility exclusions).
    pub shader_flags: ShaderFlags,

    /// Point on the light; unused for lights at infinity.
    pub p: Point3f,

    /// Direction from the shading point towards the light.
    pub d: Vector3f,

    /// Distance to the light; infinite for lights at infinity.
    pub t: Float,

    /// Light sampling PDF in solid angle, including light selection.
    pub pdf: Float,

    /// Emission scale of the sample.
    pub eval_fac: Float,

    /// Light group the emission is written to.
    pub lightgroup: Option<usize>,
}
