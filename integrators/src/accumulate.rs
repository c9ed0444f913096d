//! Render buffer accumulation of path contributions.

use kernel::film::*;
use kernel::integrator::*;
use kernel::math::*;
use kernel::spectrum::*;
use samplers::sample_is_even;

/// Scales a contribution down so the sum of its absolute components does not
/// exceed `limit`. A limit of 0 disables clamping.
///
/// * `contribution` - Path contribution.
/// * `limit`        - Clamp limit.
#[inline]
pub fn clamp_sample(contribution: Spectrum, limit: Float) -> Spectrum {
    if limit == 0.0 {
        return contribution;
    }
    let sum = contribution.sum_abs();
    if sum > limit {
        contribution * (limit / sum)
    } else {
        contribution
    }
}

/// Adds a contribution to the combined pass and the adaptive sampling
/// auxiliary pass. Even samples are written doubled into the auxiliary pass
/// so it holds an estimate from half the samples.
///
/// * `config`       - Integrator configuration.
/// * `state`        - Path state.
/// * `contribution` - Clamped contribution.
/// * `buffer`       - Render buffer.
pub fn accumulate_combined(
    config: &IntegratorConfig,
    state: &PathState,
    contribution: Spectrum,
    buffer: &dyn RenderBufferWriter,
) {
    buffer.accumulate(state.pixel, PassType::Combined, contribution);

    if buffer.has_pass(PassType::AdaptiveAuxBuffer) && sample_is_even(config.sampling_pattern, state.sample) {
        buffer.accumulate(state.pixel, PassType::AdaptiveAuxBuffer, contribution * 2.0);
    }
}

/// Adds a contribution to a light pass (background or emission) and to the
/// light group pass.
///
/// * `state`        - Path state.
/// * `pass`         - Background or emission pass.
/// * `contribution` - Clamped contribution.
/// * `lightgroup`   - Light group of the emitter.
/// * `buffer`       - Render buffer.
pub fn accumulate_light_passes(
    state: &PathState,
    pass: PassType,
    contribution: Spectrum,
    lightgroup: Option<usize>,
    buffer: &dyn RenderBufferWriter,
) {
    if contribution.is_black() {
        return;
    }
    if let Some(lightgroup) = lightgroup {
        buffer.accumulate(state.pixel, PassType::Lightgroup(lightgroup), contribution);
    }
    buffer.accumulate(state.pixel, pass, contribution);
}

/// Writes the background seen by an escaped path. Transparent background rays
/// only add their transparency and the background pass.
///
/// * `config`      - Integrator configuration.
/// * `state`       - Path state.
/// * `l`           - Background radiance, MIS weighted.
/// * `transparent` - Transparency when the ray sees a transparent background.
/// * `lightgroup`  - Light group of the background.
/// * `buffer`      - Render buffer.
pub fn accumulate_background(
    config: &IntegratorConfig,
    state: &PathState,
    l: Spectrum,
    transparent: Option<Float>,
    lightgroup: Option<usize>,
    buffer: &dyn RenderBufferWriter,
) {
    let contribution = clamp_sample(state.throughput * l, config.sample_clamp(state.bounce));

    match transparent {
        Some(transparent) => buffer.accumulate_transparency(state.pixel, transparent),
        None => accumulate_combined(config, state, contribution, buffer),
    }

    accumulate_light_passes(state, PassType::Background, contribution, lightgroup, buffer);
}

/// Writes light emission reached by a path.
///
/// * `config`     - Integrator configuration.
/// * `state`      - Path state.
/// * `l`          - Emitted radiance, MIS weighted.
/// * `lightgroup` - Light group of the light.
/// * `buffer`     - Render buffer.
pub fn accumulate_emission(
    config: &IntegratorConfig,
    state: &PathState,
    l: Spectrum,
    lightgroup: Option<usize>,
    buffer: &dyn RenderBufferWriter,
) {
    let contribution = clamp_sample(state.throughput * l, config.sample_clamp(state.bounce));
    accumulate_combined(config, state, contribution, buffer);
    accumulate_light_passes(state, PassType::Emission, contribution, lightgroup, buffer);
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
