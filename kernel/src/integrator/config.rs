//! Integrator configuration

use crate::math::Float;
use std::fmt;
use std::str::FromStr;

/// Low-discrepancy pattern used by the sample generator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SamplingPattern {
    /// Progressive multi-jittered table lookup.
    #[default]
    Pmj,

    /// Classic Sobol sequence.
    Sobol,
}

/// Hash used to decorrelate dimensions and pixel seeds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HashVariant {
    /// `cmj_hash`.
    #[default]
    Regular,

    /// `cmj_hash_simple`.
    Simple,
}

/// How a sample index is shuffled before the table lookup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ShuffleVariant {
    /// Nested uniform (Owen) scramble.
    #[default]
    Owen,

    /// XOR with the decorrelation value. Cheaper, lower quality.
    Xor,
}

impl FromStr for SamplingPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pmj" | "progressive_multi_jitter" => Ok(Self::Pmj),
            "sobol" => Ok(Self::Sobol),
            _ => Err(format!("Unknown sampling pattern '{s}'")),
        }
    }
}

impl fmt::Display for SamplingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pmj => write!(f, "pmj"),
            Self::Sobol => write!(f, "sobol"),
        }
    }
}

/// Process-wide integrator settings. Built once before rendering and never
/// mutated while a render is in progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegratorConfig {
    /// Global integrator seed.
    pub seed: u32,

    /// Low-discrepancy pattern.
    pub sampling_pattern: SamplingPattern,

    /// Values below 1 correlate pixels, sharing the sequence of `seed`
    /// jittered per pixel by at most this amount.
    pub scrambling_distance: Float,

    /// Hash used to decorrelate dimensions.
    pub hash_variant: HashVariant,

    /// Sample index shuffle.
    pub shuffle_variant: ShuffleVariant,

    /// Per-sample clamp for direct light (bounce 0). 0 disables.
    pub sample_clamp_direct: Float,

    /// Per-sample clamp for indirect light. 0 disables.
    pub sample_clamp_indirect: Float,
}

impl Default for IntegratorConfig {
    /// Returns the default configuration: PMJ with Owen scrambling, full
    /// decorrelation and indirect light clamped to 10.
    fn default() -> Self {
        Self {
            seed: 0,
            sampling_pattern: SamplingPattern::Pmj,
            scrambling_distance: 1.0,
            hash_variant: HashVariant::Regular,
            shuffle_variant: ShuffleVariant::Owen,
            sample_clamp_direct: 0.0,
            sample_clamp_indirect: 10.0,
        }
    }
}

impl IntegratorConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.scrambling_distance) {
            return Err(format!(
                "scrambling_distance must be in [0, 1], got {}",
                self.scrambling_distance
            ));
        }
        for (name, v) in [
            ("sample_clamp_direct", self.sample_clamp_direct),
            ("sample_clamp_indirect", self.sample_clamp_indirect),
        ] {
            if v.is_nan() || v < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {v}"));
            }
        }
        Ok(())
    }

    /// Returns true if pixels share a jittered sequence.
    pub fn use_jitter(&self) -> bool {
        self.scrambling_distance < 1.0
    }

    /// Returns the sample clamp for the given bounce; 0 disables clamping.
    ///
    /// * `bounce` - Path bounce.
    pub fn sample_clamp(&self, bounce: u32) -> Float {
        if bounce == 0 {
            self.sample_clamp_direct
        } else {
            self.sample_clamp_indirect
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
