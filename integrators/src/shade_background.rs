//! Background and distant light shading for paths that escape the scene.

use crate::accumulate::*;
use kernel::film::*;
use kernel::integrator::*;
use kernel::light::*;
use kernel::sampling::mis_weight;
use kernel::shader::*;
use kernel::spectrum::*;
use kernel::{stat_counter, stat_inc, stat_register_fns};
use lights::*;

stat_counter!(
    "Integrator/Background evaluations",
    BACKGROUND_EVALUATIONS,
    background_stats_evaluations
);
stat_counter!(
    "Integrator/Constant background shortcuts",
    CONSTANT_BACKGROUND_SHORTCUTS,
    background_stats_constant_shortcuts
);

stat_register_fns!(background_stats_evaluations, background_stats_constant_shortcuts);

/// Scene data shared by every path during a render.
#[derive(Copy, Clone)]
pub struct ShadeContext<'a> {
    /// Integrator configuration.
    pub config: &'a IntegratorConfig,

    /// Lights.
    pub lights: &'a LightList,

    /// Shaders.
    pub shaders: &'a ShaderTable,

    /// Evaluates shaders without a constant emission.
    pub evaluator: &'a dyn ShaderEvaluator,
}

impl<'a> ShadeContext<'a> {
    /// Returns a new `ShadeContext`.
    ///
    /// * `config`    - Integrator configuration.
    /// * `lights`    - Lights.
    /// * `shaders`   - Shaders.
    /// * `evaluator` - Evaluates shaders without a constant emission.
    pub fn new(
        config: &'a IntegratorConfig,
        lights: &'a LightList,
        shaders: &'a ShaderTable,
        evaluator: &'a dyn ShaderEvaluator,
    ) -> Self {
        register_stats();
        Self {
            config,
            lights,
            shaders,
            evaluator,
        }
    }
}

/// Evaluates the background shader for the direction of an escaped ray and
/// applies the MIS weight against background light sampling. Rays the shader
/// is excluded from see black.
///
/// * `ctx`        - Scene data.
/// * `state`      - Path state.
/// * `background` - The background light.
pub fn eval_background_shader(ctx: &ShadeContext, state: &PathState, background: &BackgroundLight) -> Spectrum {
    let shader = background.config.shader;
    let shader_flags = ctx.shaders.flags(shader);
    if shader_flags.excludes(state.flag) {
        return Spectrum::ZERO;
    }

    stat_inc!(BACKGROUND_EVALUATIONS, 1);
    let mut l = match ctx.shaders.get(shader).and_then(|s| s.constant_emission()) {
        Some(emission) => {
            stat_inc!(CONSTANT_BACKGROUND_SHORTCUTS, 1);
            emission
        }
        None => ctx
            .evaluator
            .eval_background(shader, &state.ray.d, state.ray.time, state.flag),
    };

    if !state.flag.contains(PathFlags::MIS_SKIP) && background.use_mis(shader_flags) {
        // Light PDF is evaluated from the last MIS bounce, which may lie
        // behind transparent surfaces the ray passed through.
        let p = state.ray.o - state.ray.d * state.mis_ray_t;
        let pdf = ctx.lights.background_light_pdf(&p, &state.ray.d);
        l *= mis_weight(state.mis_ray_pdf, pdf);
    }

    l
}

/// Accumulates the background seen by an escaped path.
///
/// * `ctx`    - Scene data.
/// * `state`  - Path state.
/// * `buffer` - Render buffer.
pub fn integrate_background(ctx: &ShadeContext, state: &PathState, buffer: &dyn RenderBufferWriter) {
    let background = match ctx.lights.background() {
        Some(background) => background,
        None => return,
    };
    let config = &background.config;

    let mut eval_background = true;
    let transparent = if config.transparent && state.flag.contains(PathFlags::TRANSPARENT_BACKGROUND) {
        // Only the background pass needs the colour of a transparent
        // background.
        eval_background = buffer.has_pass(PassType::Background);
        Some(state.throughput.average())
    } else {
        None
    };

    // The light connection was made by manifold next event estimation.
    let use_mis = background.use_mis(ctx.shaders.flags(config.shader));
    if use_mis && config.use_caustics && state.flag.contains(PathFlags::MNEE_CULL_LIGHT_CONNECTION) {
        eval_background = false;
    }

    let l = if eval_background {
        eval_background_shader(ctx, state, background)
    } else {
        Spectrum::ZERO
    };

    accumulate_background(ctx.config, state, l, transparent, config.lightgroup, buffer);
}

/// Evaluates the emission of a light sample including its strength.
///
/// * `ctx`      - Scene data.
/// * `state`    - Path state.
/// * `ls`       - Light sample.
/// * `strength` - Light strength.
fn eval_light_shader(ctx: &ShadeContext, state: &PathState, ls: &LightSample, strength: Spectrum) -> Spectrum {
    let emission = match ctx.shaders.get(ls.shader).and_then(|s| s.constant_emission()) {
        Some(emission) => emission,
        None => ctx
            .evaluator
            .eval_light(ls.shader, &ls.d, state.ray.time, state.flag),
    };
    emission * ls.eval_fac * strength
}

/// Accumulates every distant light whose disk contains the direction of an
/// escaped path.
///
/// * `ctx`    - Scene data.
/// * `state`  - Path state.
/// * `buffer` - Render buffer.
pub fn integrate_distant_lights(ctx: &ShadeContext, state: &PathState, buffer: &dyn RenderBufferWriter) {
    for light_index in 0..ctx.lights.num_all_lights() {
        let (light, ls) = match ctx.lights.distant(light_index).zip(
            ctx.lights
                .light_sample_from_distant_ray(&state.ray.d, light_index),
        ) {
            Some(hit) => hit,
            None => continue,
        };

        if ls.shader_flags.excludes(state.flag) {
            continue;
        }

        // The light connection was made by manifold next event estimation.
        if light.use_caustics && state.flag.contains(PathFlags::MNEE_CULL_LIGHT_CONNECTION) {
            continue;
        }

        let mut l = eval_light_shader(ctx, state, &ls, light.strength);
        if l.is_black() {
            continue;
        }

        if !state.flag.contains(PathFlags::MIS_SKIP) {
            l *= mis_weight(state.mis_ray_pdf, ls.pdf);
        }

        trace!("Distant light {} hit by path at pixel {:?}", light_index, state.pixel);
        accumulate_emission(ctx.config, state, l, ls.lightgroup, buffer);
    }
}

/// Shades a path that escaped the scene: the background first, then the
/// distant lights.
///
/// * `ctx`    - Scene data.
/// * `state`  - Path state.
/// * `buffer` - Render buffer.
pub fn shade_background(ctx: &ShadeContext, state: &PathState, buffer: &dyn RenderBufferWriter) {
    integrate_background(ctx, state, buffer);
    integrate_distant_lights(ctx, state, buffer);
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use kernel::geometry::*;
    use kernel::math::*;
    use kernel::stat_get;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Shader graph stand-in that counts its calls.
    struct CountingEvaluator {
        value: Spectrum,
        calls: AtomicUsize,
    }

    impl CountingEvaluator {
        fn new(value: Spectrum) -> Self {
            Self {
                value,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ShaderEvaluator for CountingEvaluator {
        fn eval_background(&self, _shader: ShaderId, _d: &Vector3f, _time: Float, _path_flag: PathFlags) -> Spectrum {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value
        }

        fn eval_light(&self, _shader: ShaderId, _d: &Vector3f, _time: Float, _path_flag: PathFlags) -> Spectrum {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value
        }
    }

    struct Scene {
        config: IntegratorConfig,
        lights: LightList,
        shaders: ShaderTable,
        evaluator: CountingEvaluator,
    }

    impl Scene {
        fn new(background: Option<(KernelShader, BackgroundConfig)>) -> Self {
            let mut shaders = ShaderTable::default();
            let mut lights = vec![];
            if let Some((shader, mut config)) = background {
                config.shader = shaders.push(shader);
                lights.push(Light::Background(BackgroundLight::new(config)));
            }
            Self {
                config: IntegratorConfig {
                    sample_clamp_indirect: 0.0,
                    ..IntegratorConfig::default()
                },
                lights: LightList::new(lights).expect("valid lights"),
                shaders,
                evaluator: CountingEvaluator::new(Spectrum::new(7.0)),
            }
        }

        fn add_sun(&mut self, dir: Vector3f, shader: KernelShader, strength: Float) {
            let id = self.shaders.push(shader);
            let sun = DistantLight::new(dir, 0.1, Spectrum::new(strength), id, shader.flags, Some(0)).expect("valid sun");
            let mut lights = self.lights.lights().to_vec();
            lights.push(Light::Distant(sun));
            self.lights = LightList::new(lights).expect("valid lights");
        }

        fn ctx(&self) -> ShadeContext<'_> {
            ShadeContext::new(&self.config, &self.lights, &self.shaders, &self.evaluator)
        }
    }

    fn no_mis() -> BackgroundConfig {
        BackgroundConfig {
            use_mis: false,
            ..BackgroundConfig::default()
        }
    }

    fn film() -> RenderBuffer {
        let mut config = FilmConfig::new(4, 4);
        config.background_pass = true;
        config.emission_pass = true;
        config.num_lightgroups = 1;
        RenderBuffer::new(config).expect("valid film")
    }

    fn camera_path(d: Vector3f) -> PathState {
        PathState::new(Ray::escaping(Point3f::default(), d), Point2u::new(2, 3), 0, 0)
    }

    fn combined(rb: &RenderBuffer) -> Spectrum {
        rb.read_spectrum(Point2u::new(2, 3), PassType::Combined)
            .unwrap_or(Spectrum::new(Float::NAN))
    }

    fn up() -> Vector3f {
        Vector3f::new(0.0, 0.0, 1.0)
    }

    #[test]
    fn constant_background_skips_shader_graph() {
        let scene = Scene::new(Some((
            KernelShader::constant(ShaderFlags::empty(), Spectrum::new(0.5)),
            no_mis(),
        )));
        let rb = film();
        let state = camera_path(up());
        let before = stat_get!(CONSTANT_BACKGROUND_SHORTCUTS);

        integrate_background(&scene.ctx(), &state, &rb);

        assert_eq!(combined(&rb), Spectrum::new(0.5));
        assert_eq!(scene.evaluator.calls(), 0);
        assert_eq!(stat_get!(CONSTANT_BACKGROUND_SHORTCUTS), before + 1);
    }

    #[test]
    fn general_background_uses_shader_graph() {
        let scene = Scene::new(Some((KernelShader::new(ShaderFlags::empty()), no_mis())));
        let rb = film();
        integrate_background(&scene.ctx(), &camera_path(up()), &rb);
        assert_eq!(combined(&rb), Spectrum::new(7.0));
        assert_eq!(scene.evaluator.calls(), 1);
    }

    #[test]
    fn excluded_background_contributes_nothing() {
        let scene = Scene::new(Some((KernelShader::new(ShaderFlags::EXCLUDE_DIFFUSE), no_mis())));
        let rb = film();
        let mut state = camera_path(up());
        state.scatter(state.ray, Spectrum::ONE, 1.0, PathFlags::DIFFUSE | PathFlags::REFLECT);

        integrate_background(&scene.ctx(), &state, &rb);

        assert_eq!(combined(&rb), Spectrum::ZERO);
        assert_eq!(scene.evaluator.calls(), 0);
    }

    #[test]
    fn background_is_mis_weighted_after_a_bounce() {
        let scene = Scene::new(Some((
            KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::ONE),
            BackgroundConfig::default(),
        )));
        let rb = film();
        let mut state = camera_path(up());
        state.scatter(state.ray, Spectrum::ONE, INV_FOUR_PI, PathFlags::DIFFUSE | PathFlags::REFLECT);

        integrate_background(&scene.ctx(), &state, &rb);

        assert!(approx_eq!(f32, combined(&rb)[1], 0.5, epsilon = 1e-6));
    }

    #[test]
    fn background_mis_needs_the_shader_flag() {
        // MIS requested by the setting, but the shader was built without it.
        let scene = Scene::new(Some((
            KernelShader::constant(ShaderFlags::empty(), Spectrum::ONE),
            BackgroundConfig::default(),
        )));
        let rb = film();
        let mut state = camera_path(up());
        state.scatter(state.ray, Spectrum::ONE, INV_FOUR_PI, PathFlags::DIFFUSE | PathFlags::REFLECT);

        integrate_background(&scene.ctx(), &state, &rb);
        assert_eq!(combined(&rb), Spectrum::ONE);

        // The flag alone does not enable MIS either.
        let scene = Scene::new(Some((
            KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::ONE),
            no_mis(),
        )));
        let rb = film();
        integrate_background(&scene.ctx(), &state, &rb);
        assert_eq!(combined(&rb), Spectrum::ONE);
    }

    #[test]
    fn camera_rays_skip_mis() {
        let scene = Scene::new(Some((
            KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::ONE),
            BackgroundConfig::default(),
        )));
        let rb = film();
        integrate_background(&scene.ctx(), &camera_path(up()), &rb);
        assert_eq!(combined(&rb), Spectrum::ONE);
    }

    #[test]
    fn transparent_background_writes_alpha() {
        let config = BackgroundConfig {
            transparent: true,
            ..no_mis()
        };
        let scene = Scene::new(Some((KernelShader::new(ShaderFlags::empty()), config)));
        let p = Point2u::new(2, 3);
        let mut state = camera_path(up());
        state.flag |= PathFlags::TRANSPARENT_BACKGROUND;
        state.throughput = Spectrum::from_rgb(0.25, 0.5, 0.75);

        let rb = film();
        integrate_background(&scene.ctx(), &state, &rb);
        assert_eq!(combined(&rb), Spectrum::ZERO);
        assert_eq!(rb.transparency(p), Some(0.5));
        assert_eq!(
            rb.read_spectrum(p, PassType::Background),
            Some(Spectrum::from_rgb(0.25, 0.5, 0.75) * 7.0)
        );
        assert_eq!(scene.evaluator.calls(), 1);

        // Without a background pass the shader is not evaluated.
        let rb = RenderBuffer::new(FilmConfig::new(4, 4)).expect("valid film");
        integrate_background(&scene.ctx(), &state, &rb);
        assert_eq!(rb.transparency(p), Some(0.5));
        assert_eq!(scene.evaluator.calls(), 1);
    }

    #[test]
    fn mnee_culls_caustic_background() {
        let config = BackgroundConfig {
            use_caustics: true,
            ..BackgroundConfig::default()
        };
        let scene = Scene::new(Some((KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::ONE), config)));
        let rb = film();
        let mut state = camera_path(up());
        state.flag |= PathFlags::MNEE_CULL_LIGHT_CONNECTION;
        integrate_background(&scene.ctx(), &state, &rb);
        assert_eq!(combined(&rb), Spectrum::ZERO);
    }

    #[test]
    fn distant_light_seen_inside_its_disk() {
        let mut scene = Scene::new(None);
        scene.add_sun(up(), KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::ONE), 2.0);
        let invarea = scene.lights.distant(0).map_or(0.0, |l| l.invarea);
        let p = Point2u::new(2, 3);

        let rb = film();
        integrate_distant_lights(&scene.ctx(), &camera_path(up()), &rb);
        let expected = 2.0 * invarea;
        assert!(approx_eq!(f32, combined(&rb)[0], expected, epsilon = 1e-3 * expected));
        assert_eq!(rb.read_spectrum(p, PassType::Emission), Some(combined(&rb)));
        assert_eq!(rb.read_spectrum(p, PassType::Lightgroup(0)), Some(combined(&rb)));

        let rb = film();
        integrate_distant_lights(&scene.ctx(), &camera_path(Vector3f::new(1.0, 0.0, 0.0)), &rb);
        assert_eq!(combined(&rb), Spectrum::ZERO);
    }

    #[test]
    fn excluded_distant_light_does_not_hide_the_next() {
        let mut scene = Scene::new(None);
        scene.add_sun(
            up(),
            KernelShader::constant(ShaderFlags::USE_MIS | ShaderFlags::EXCLUDE_CAMERA, Spectrum::ONE),
            1.0,
        );
        scene.add_sun(up(), KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::ONE), 1.0);
        let invarea = scene.lights.distant(1).map_or(0.0, |l| l.invarea);

        let rb = film();
        integrate_distant_lights(&scene.ctx(), &camera_path(up()), &rb);
        assert!(approx_eq!(f32, combined(&rb)[2], invarea, epsilon = 1e-3 * invarea));
    }

    #[test]
    fn distant_light_is_mis_weighted_after_a_bounce() {
        let mut scene = Scene::new(None);
        scene.add_sun(up(), KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::ONE), 1.0);
        let ls = scene
            .lights
            .light_sample_from_distant_ray(&up(), 0)
            .expect("inside the disk");
        let mut state = camera_path(up());
        state.scatter(state.ray, Spectrum::ONE, ls.pdf, PathFlags::GLOSSY | PathFlags::REFLECT);

        let rb = film();
        integrate_distant_lights(&scene.ctx(), &state, &rb);
        let expected = 0.5 * ls.eval_fac;
        assert!(approx_eq!(f32, combined(&rb)[0], expected, epsilon = 1e-3 * expected));
    }

    #[test]
    fn background_then_lights_is_order_independent() {
        let mut scene = Scene::new(Some((
            KernelShader::constant(ShaderFlags::USE_MIS, Spectrum::new(0.5)),
            BackgroundConfig::default(),
        )));
        scene.add_sun(up(), KernelShader::new(ShaderFlags::USE_MIS), 1.0);
        let mut state = camera_path(up());
        state.scatter(state.ray, Spectrum::new(0.5), 0.25, PathFlags::DIFFUSE | PathFlags::REFLECT);

        let a = film();
        shade_background(&scene.ctx(), &state, &a);

        let b = film();
        integrate_distant_lights(&scene.ctx(), &state, &b);
        integrate_background(&scene.ctx(), &state, &b);

        assert_eq!(combined(&a), combined(&b));
        assert!(!combined(&a).is_black());
    }
}
