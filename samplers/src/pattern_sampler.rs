//! Pattern sampler.
//!
//! Produces the quasi-random numbers of a path: one value (or one 2D point)
//! per (pixel seed, sample index, dimension). Calls are pure; the only shared
//! state is the immutable pattern table.

use crate::pixel_seed::PixelSeed;
use crate::pmj::fixed_to_unit_float;
use crate::sobol_matrices::sobol_u32;
use crate::{SamplePatternTable, NUM_PMJ_PATTERNS, NUM_PMJ_SAMPLES};
use kernel::geometry::Point2f;
use kernel::hash::*;
use kernel::integrator::{HashVariant, IntegratorConfig, SamplingPattern, ShuffleVariant};
use kernel::math::{fract, Float};
use std::sync::Arc;

/// Odd bits of a sample index. Their parity splits the PMJ stream in two.
const ODD_BITS: u32 = 0xaaaaaaaa;

/// Returns true for one of two equally sized, equally distributed halves of
/// the sample stream. For PMJ this is the parity of the odd bits of the
/// sample index; for other patterns the parity of the index.
///
/// The PMJ shuffle never moves a sample to the other half, and the halves of
/// every pattern prefix are stratified, so each half reads a stratified half
/// of every pattern block. After the per-block rotation a half of 8192
/// samples scores, on average, below 0.7 of the degrees of freedom of a
/// 16x16 chi-square grid with either shuffle; random points score 1.0.
///
/// * `pattern` - The sampling pattern.
/// * `sample`  - Sample index.
#[inline]
pub fn sample_is_even(pattern: SamplingPattern, sample: u32) -> bool {
    match pattern {
        SamplingPattern::Pmj => (sample & ODD_BITS).count_ones() & 1 != 0,
        SamplingPattern::Sobol => sample & 1 != 0,
    }
}

/// Generates samples from the PMJ table or the Sobol sequence.
#[derive(Clone)]
pub struct PatternSampler {
    /// Integrator configuration.
    config: IntegratorConfig,

    /// Shared pattern table.
    table: Arc<SamplePatternTable>,
}

impl PatternSampler {
    /// Returns a sampler using the process-wide pattern table.
    ///
    /// * `config` - Integrator configuration.
    pub fn new(config: IntegratorConfig) -> Result<Self, String> {
        Self::with_table(config, SamplePatternTable::global())
    }

    /// Returns a sampler using the given pattern table.
    ///
    /// * `config` - Integrator configuration.
    /// * `table`  - Pattern table.
    pub fn with_table(config: IntegratorConfig, table: Arc<SamplePatternTable>) -> Result<Self, String> {
        config.validate()?;
        debug!(
            "Pattern sampler: {} pattern, {:?} hash, {:?} shuffle, scrambling distance {}",
            config.sampling_pattern, config.hash_variant, config.shuffle_variant, config.scrambling_distance
        );
        Ok(Self { config, table })
    }

    /// Returns the integrator configuration.
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Returns a value in [0, 1) for the given dimension of a sample.
    ///
    /// * `seed`      - Pixel seed.
    /// * `sample`    - Sample index within the pixel.
    /// * `dimension` - Sampling dimension.
    pub fn sample_1d(&self, seed: PixelSeed, sample: u32, dimension: u32) -> Float {
        match self.config.sampling_pattern {
            SamplingPattern::Pmj => self.pmj_sample_1d(seed, sample, dimension),
            SamplingPattern::Sobol => self.sobol_sample_1d(seed, sample, dimension),
        }
    }

    /// Returns a point in [0, 1)² for dimensions `dimension` and
    /// `dimension + 1` of a sample.
    ///
    /// * `seed`      - Pixel seed.
    /// * `sample`    - Sample index within the pixel.
    /// * `dimension` - First sampling dimension.
    pub fn sample_2d(&self, seed: PixelSeed, sample: u32, dimension: u32) -> Point2f {
        match self.config.sampling_pattern {
            SamplingPattern::Pmj => self.pmj_sample_2d(seed, sample, dimension),
            SamplingPattern::Sobol => self.sobol_sample_2d(seed, sample, dimension),
        }
    }

    /// Returns true if the sample belongs to the even half of the stream.
    ///
    /// * `sample` - Sample index.
    pub fn sample_is_even(&self, sample: u32) -> bool {
        sample_is_even(self.config.sampling_pattern, sample)
    }

    /// Returns the hash that selects the sequence. Pixels share the integrator
    /// seed's sequence when jittering.
    #[inline]
    fn sequence_hash(&self, seed: PixelSeed) -> u32 {
        if self.config.use_jitter() {
            self.config.seed
        } else {
            seed.0
        }
    }

    /// Returns the per-pixel offset of a dimension when jittering.
    #[inline]
    fn jitter(&self, seed: PixelSeed, dimension: u32) -> Float {
        if self.config.use_jitter() {
            cmj_randfloat_simple(dimension, seed.0, self.config.scrambling_distance)
        } else {
            0.0
        }
    }

    #[inline]
    fn hash_mix(&self, i: u32, p: u32) -> u32 {
        match self.config.hash_variant {
            HashVariant::Regular => cmj_hash(i, p),
            HashVariant::Simple => cmj_hash_simple(i, p),
        }
    }

    #[inline]
    fn rotation(&self, i: u32, p: u32) -> Float {
        match self.config.hash_variant {
            HashVariant::Regular => cmj_randfloat(i, p),
            HashVariant::Simple => cmj_randfloat_simple(i, p, 1.0),
        }
    }

    /// Shuffles a sample index within its `sample_is_even` half.
    ///
    /// Bit 1 is re-flipped so the odd-bit parity is kept. The flip depends
    /// only on higher bits, so the Owen shuffle stays a nested scramble and
    /// still maps aligned blocks onto aligned blocks.
    #[inline]
    fn shuffle(&self, sample: u32, rv: u32) -> u32 {
        let s = match self.config.shuffle_variant {
            ShuffleVariant::Owen => nested_uniform_scramble(sample, rv),
            ShuffleVariant::Xor => sample ^ rv,
        };
        s ^ ((((s ^ sample) & ODD_BITS).count_ones() & 1) << 1)
    }

    /// Shuffles the sample index and returns it with the offset dimension
    /// `d` that selects the pattern and rotation.
    #[inline]
    fn pmj_index(&self, hash: u32, sample: u32, dimension: u32) -> (u32, u32) {
        let rv = self.hash_mix(dimension, hash);
        let s = self.shuffle(sample, rv);
        let sample_set = s / NUM_PMJ_SAMPLES as u32;
        (s, dimension.wrapping_add(sample_set))
    }

    fn pmj_sample_1d(&self, seed: PixelSeed, sample: u32, dimension: u32) -> Float {
        let hash = self.sequence_hash(seed);
        let (s, d) = self.pmj_index(hash, sample, dimension);
        let dim = d as usize % NUM_PMJ_PATTERNS;

        // Each pattern holds two 1D streams: x for even `dim`, y for odd.
        let slot = s as usize % NUM_PMJ_SAMPLES;
        let x = self.table.get(2 * ((dim >> 1) * NUM_PMJ_SAMPLES + slot) + (dim & 1));

        fract(x + self.rotation(d, hash) + self.jitter(seed, dimension))
    }

    fn pmj_sample_2d(&self, seed: PixelSeed, sample: u32, dimension: u32) -> Point2f {
        let hash = self.sequence_hash(seed);
        let (s, d) = self.pmj_index(hash, sample, dimension);
        let dim = d as usize % NUM_PMJ_PATTERNS;

        let slot = s as usize % NUM_PMJ_SAMPLES;
        let index = 2 * (dim * NUM_PMJ_SAMPLES + slot);
        let x = self.table.get(index);
        let y = self.table.get(index + 1);

        Point2f::new(
            fract(x + self.rotation(d, hash) + self.jitter(seed, dimension)),
            fract(y + self.rotation(d.wrapping_add(1), hash) + self.jitter(seed, dimension.wrapping_add(1))),
        )
    }

    /// Owen scrambles the Sobol index with a seed of its own per dimension.
    /// Dimensions that wrap onto the same direction vectors read unrelated
    /// orderings of the sequence; prefixes still cover aligned blocks.
    #[inline]
    fn sobol_index(&self, hash: u32, sample: u32, dimension: u32) -> u32 {
        nested_uniform_scramble(sample, self.hash_mix(dimension, hash))
    }

    #[inline]
    fn sobol_value(&self, seed: PixelSeed, hash: u32, index: u32, dimension: u32) -> Float {
        let r = fixed_to_unit_float(sobol_u32(index, dimension));
        let shift = hash_to_float(cmj_hash_simple(dimension, hash));
        fract(r + shift + self.jitter(seed, dimension))
    }

    fn sobol_sample_1d(&self, seed: PixelSeed, sample: u32, dimension: u32) -> Float {
        let hash = self.sequence_hash(seed);
        let index = self.sobol_index(hash, sample, dimension);
        self.sobol_value(seed, hash, index, dimension)
    }

    fn sobol_sample_2d(&self, seed: PixelSeed, sample: u32, dimension: u32) -> Point2f {
        // Both axes share one index so the pair keeps its 2D stratification.
        let hash = self.sequence_hash(seed);
        let index = self.sobol_index(hash, sample, dimension);
        Point2f::new(
            self.sobol_value(seed, hash, index, dimension),
            self.sobol_value(seed, hash, index, dimension.wrapping_add(1)),
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
