//! Shaders
//!
//! Shader graphs are evaluated outside this workspace. The kernel only knows
//! the per-shader flags, the constant emission shortcut and the
//! `ShaderEvaluator` interface used when the shortcut does not apply.

mod shader_flags;

// Re-export
pub use shader_flags::*;

use crate::geometry::Vector3f;
use crate::integrator::PathFlags;
use crate::math::Float;
use crate::spectrum::Spectrum;

/// Index of a shader in the `ShaderTable`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Kernel-side description of a shader.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KernelShader {
    /// Shader flags.
    pub flags: ShaderFlags,

    /// Emission of the shader when `HAS_CONSTANT_EMISSION` is set.
    pub constant_emission: Spectrum,
}

impl KernelShader {
    /// Returns a shader whose output is evaluated by the shader graph.
    ///
    /// * `flags` - Shader flags.
    pub fn new(flags: ShaderFlags) -> Self {
        Self {
            flags: flags - ShaderFlags::HAS_CONSTANT_EMISSION,
            constant_emission: Spectrum::ZERO,
        }
    }

    /// Returns a shader known to emit a constant colour.
    ///
    /// * `flags`    - Shader flags.
    /// * `emission` - The constant emission.
    pub fn constant(flags: ShaderFlags, emission: Spectrum) -> Self {
        Self {
            flags: flags | ShaderFlags::HAS_CONSTANT_EMISSION,
            constant_emission: emission,
        }
    }

    /// Returns the constant emission if the shader has one.
    pub fn constant_emission(&self) -> Option<Spectrum> {
        if self.flags.contains(ShaderFlags::HAS_CONSTANT_EMISSION) {
            Some(self.constant_emission)
        } else {
            None
        }
    }
}

/// The scene's shaders indexed by `ShaderId`.
#[derive(Clone, Debug, Default)]
pub struct ShaderTable {
    shaders: Vec<KernelShader>,
}

impl ShaderTable {
    /// Returns a new table.
    ///
    /// * `shaders` - Shaders in `ShaderId` order.
    pub fn new(shaders: Vec<KernelShader>) -> Self {
        Self { shaders }
    }

    /// Appends a shader and returns its id.
    ///
    /// * `shader` - The shader.
    pub fn push(&mut self, shader: KernelShader) -> ShaderId {
        self.shaders.push(shader);
        ShaderId((self.shaders.len() - 1) as u32)
    }

    /// Returns the shader with the given id.
    ///
    /// * `id` - Shader id.
    pub fn get(&self, id: ShaderId) -> Option<&KernelShader> {
        self.shaders.get(id.0 as usize)
    }

    /// Returns the flags of the shader with the given id, empty for unknown
    /// ids.
    ///
    /// * `id` - Shader id.
    pub fn flags(&self, id: ShaderId) -> ShaderFlags {
        self.get(id).map_or(ShaderFlags::empty(), |s| s.flags)
    }
}

/// Evaluates shader graphs. Called concurrently from every path; must not
/// depend on state mutated by the integrator.
pub trait ShaderEvaluator: Sync {
    /// Evaluates the background shader for a ray escaping in direction `d`.
    ///
    /// * `shader`    - Background shader.
    /// * `d`         - Ray direction.
    /// * `time`      - Ray time.
    /// * `path_flag` - Ray type flags.
    fn eval_background(&self, shader: ShaderId, d: &Vector3f, time: Float, path_flag: PathFlags) -> Spectrum;

    /// Evaluates the emission shader of a light seen from direction `d`.
    ///
    /// * `shader`    - Light shader.
    /// * `d`         - Ray direction.
    /// * `time`      - Ray time.
    /// * `path_flag` - Ray type flags.
    fn eval_light(&self, shader: ShaderId, d: &Vector3f, time: Float, path_flag: PathFlags) -> Spectrum;
}
