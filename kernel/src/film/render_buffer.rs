//! Render Buffer

use super::*;
use crate::parallel::AtomicFloat;
use crate::{stat_inc, stat_memory_counter, stat_register_fns};
use std::sync::atomic::Ordering;

stat_memory_counter!("Memory/Render buffer", RENDER_BUFFER_MEMORY, render_buffer_stats_memory);

stat_register_fns!(render_buffer_stats_memory);

/// Small value added to the error normalization to avoid dividing by zero.
const CONVERGENCE_EPSILON: Float = 1e-4;

/// Per-pixel, per-pass float storage. Every channel is an `AtomicFloat` so
/// paths from any thread can accumulate into the same pixel.
pub struct RenderBuffer {
    /// Film configuration.
    config: FilmConfig,

    /// Channel layout of a pixel.
    layout: PassLayout,

    /// Channel storage, `layout.stride()` channels per pixel in scanline order.
    data: Vec<AtomicFloat>,
}

impl RenderBuffer {
    /// Allocates a zeroed render buffer.
    ///
    /// * `config` - Film configuration.
    pub fn new(config: FilmConfig) -> Result<Self, String> {
        register_stats();
        config.validate()?;

        let layout = PassLayout::new(&config);
        let n = config.width as usize * config.height as usize * layout.stride();
        let data = (0..n).map(|_| AtomicFloat::default()).collect();
        stat_inc!(RENDER_BUFFER_MEMORY, (n * std::mem::size_of::<AtomicFloat>()) as u64);

        Ok(Self { config, layout, data })
    }

    /// Returns the film configuration.
    pub fn config(&self) -> &FilmConfig {
        &self.config
    }

    /// Returns the pass layout.
    pub fn layout(&self) -> &PassLayout {
        &self.layout
    }

    /// Returns the index of the first channel of a pass at a pixel.
    ///
    /// * `pixel` - The pixel.
    /// * `pass`  - The pass.
    fn channel_index(&self, pixel: Point2u, pass: PassType) -> Option<usize> {
        if pixel.x >= self.config.width || pixel.y >= self.config.height {
            return None;
        }
        let offset = self.layout.offset(pass)?;
        let p = pixel.y as usize * self.config.width as usize + pixel.x as usize;
        Some(p * self.layout.stride() + offset)
    }

    /// Returns the channels of a pass at a pixel. Colour passes return 3
    /// values, combined and the adaptive auxiliary pass return 4.
    ///
    /// * `pixel` - The pixel.
    /// * `pass`  - The pass.
    pub fn read(&self, pixel: Point2u, pass: PassType) -> Option<Vec<Float>> {
        let start = self.channel_index(pixel, pass)?;
        let n = PassLayout::channels(pass);
        Some(
            self.data[start..start + n]
                .iter()
                .map(|c| c.load(Ordering::Acquire))
                .collect(),
        )
    }

    /// Returns the colour channels of a pass at a pixel as a spectrum.
    ///
    /// * `pixel` - The pixel.
    /// * `pass`  - The pass.
    pub fn read_spectrum(&self, pixel: Point2u, pass: PassType) -> Option<Spectrum> {
        self.read(pixel, pass)
            .map(|c| Spectrum::from_rgb(c[0], c[1], c[2]))
    }

    /// Returns the accumulated transparency of a pixel.
    ///
    /// * `pixel` - The pixel.
    pub fn transparency(&self, pixel: Point2u) -> Option<Float> {
        self.read(pixel, PassType::Combined).map(|c| c[3])
    }

    /// Returns true if the pixel's error estimate is below `threshold`. The
    /// estimate compares the combined pass against the auxiliary pass that
    /// holds twice the even half of the samples. Pixels are never converged
    /// when the film has no auxiliary pass.
    ///
    /// * `pixel`       - The pixel.
    /// * `num_samples` - Samples taken so far.
    /// * `threshold`   - Error threshold.
    pub fn converged(&self, pixel: Point2u, num_samples: u32, threshold: Float) -> bool {
        if num_samples == 0 {
            return false;
        }
        let (Some(i), Some(a)) = (
            self.read(pixel, PassType::Combined),
            self.read(pixel, PassType::AdaptiveAuxBuffer),
        ) else {
            return false;
        };

        let inv_n = 1.0 / num_samples as Float;
        let error_difference = ((i[0] - a[0]).abs() + (i[1] - a[1]).abs() + (i[2] - a[2]).abs()) * inv_n;
        let intensity = (i[0] + i[1] + i[2]) * inv_n;
        let error = error_difference / (CONVERGENCE_EPSILON + intensity.max(0.0).sqrt());
        error < threshold
    }

    /// Resets all channels to zero.
    pub fn clear(&self) {
        for c in self.data.iter() {
            c.store(0.0, Ordering::Release);
        }
    }
}

impl RenderBufferWriter for RenderBuffer {
    fn has_pass(&self, pass: PassType) -> bool {
        self.layout.offset(pass).is_some()
    }

    fn accumulate(&self, pixel: Point2u, pass: PassType, value: Spectrum) {
        if let Some(start) = self.channel_index(pixel, pass) {
            for (c, v) in self.data[start..start + COLOR_CHANNELS].iter().zip(value.to_rgb()) {
                c.add(v);
            }
        }
    }

    fn accumulate_transparency(&self, pixel: Point2u, value: Float) {
        if let Some(start) = self.channel_index(pixel, PassType::Combined) {
            self.data[start + 3].add(value);
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
