//! Parallel shading of escaped paths.

use crate::shade_background::*;
use kernel::film::*;
use kernel::integrator::*;
use kernel::report_stats;
use std::thread;

/// Number of paths handed to a worker at a time.
pub const PATH_CHUNK_SIZE: usize = 256;

/// Shades a batch of escaped paths on `n_threads` worker threads. Paths are
/// independent; contributions to the same pixel meet in the render buffer's
/// atomic accumulation.
///
/// * `ctx`       - Scene data.
/// * `paths`     - Paths whose rays escaped the scene.
/// * `buffer`    - Render buffer.
/// * `n_threads` - Number of worker threads.
pub fn shade_escaped_paths(ctx: &ShadeContext, paths: &[PathState], buffer: &dyn RenderBufferWriter, n_threads: usize) {
    let n_threads = n_threads.max(1);
    debug!("Shading {} escaped paths on {} threads", paths.len(), n_threads);

    thread::scope(|scope| {
        let (tx_worker, rx_worker) = crossbeam_channel::bounded::<&[PathState]>(n_threads);

        // Spawn worker threads.
        for _ in 0..n_threads {
            let rx_worker = rx_worker.clone();
            scope.spawn(move || {
                for chunk in rx_worker.iter() {
                    for state in chunk {
                        shade_background(ctx, state, buffer);
                    }
                }
                report_stats!();
            });
        }
        drop(rx_worker); // Drop extra since we've cloned one for each worker.

        // Send work.
        for chunk in paths.chunks(PATH_CHUNK_SIZE) {
            if tx_worker.send(chunk).is_err() {
                error!("Escaped path workers stopped early");
                break;
            }
        }
    });
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::geometry::*;
    use kernel::math::*;
    use kernel::shader::*;
    use kernel::spectrum::*;
    use lights::*;

    struct Unused;

    impl ShaderEvaluator for Unused {
        fn eval_background(&self, _shader: ShaderId, _d: &Vector3f, _time: Float, _path_flag: PathFlags) -> Spectrum {
            Spectrum::ZERO
        }

        fn eval_light(&self, _shader: ShaderId, _d: &Vector3f, _time: Float, _path_flag: PathFlags) -> Spectrum {
            Spectrum::ZERO
        }
    }

    #[test]
    fn parallel_matches_serial() {
        let mut shaders = ShaderTable::default();
        let shader = shaders.push(KernelShader::constant(ShaderFlags::empty(), Spectrum::new(0.25)));
        let config = BackgroundConfig {
            shader,
            use_mis: false,
            ..BackgroundConfig::default()
        };
        let lights = LightList::new(vec![Light::Background(BackgroundLight::new(config))]).expect("valid lights");
        let integrator_config = IntegratorConfig::default();
        let evaluator = Unused;
        let ctx = ShadeContext::new(&integrator_config, &lights, &shaders, &evaluator);

        // 16 samples for each pixel of a 8x8 film.
        let paths: Vec<PathState> = (0..1024)
            .map(|i| {
                let ray = Ray::escaping(Point3f::default(), Vector3f::new(0.0, 1.0, 0.0));
                PathState::new(ray, Point2u::new(i % 8, (i / 8) % 8), i / 64, 0)
            })
            .collect();

        let serial = RenderBuffer::new(FilmConfig::new(8, 8)).expect("valid film");
        shade_escaped_paths(&ctx, &paths, &serial, 1);

        let parallel = RenderBuffer::new(FilmConfig::new(8, 8)).expect("valid film");
        shade_escaped_paths(&ctx, &paths, &parallel, 4);

        for y in 0..8 {
            for x in 0..8 {
                let p = Point2u::new(x, y);
                assert_eq!(
                    parallel.read_spectrum(p, PassType::Combined),
                    Some(Spectrum::new(4.0))
                );
                assert_eq!(
                    parallel.read_spectrum(p, PassType::Combined),
                    serial.read_spectrum(p, PassType::Combined)
                );
            }
        }
    }

    #[test]
    fn empty_batch() {
        let lights = LightList::default();
        let shaders = ShaderTable::default();
        let config = IntegratorConfig::default();
        let evaluator = Unused;
        let ctx = ShadeContext::new(&config, &lights, &shaders, &evaluator);
        let rb = RenderBuffer::new(FilmConfig::new(1, 1)).expect("valid film");
        shade_escaped_paths(&ctx, &[], &rb, 0);
        assert_eq!(rb.read_spectrum(Point2u::new(0, 0), PassType::Combined), Some(Spectrum::ZERO));
    }
}
