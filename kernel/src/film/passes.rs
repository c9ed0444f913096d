//! Passes

/// Number of channels in the combined pass (RGB and transparency).
pub const COMBINED_CHANNELS: usize = 4;

/// Number of channels in colour-only passes.
pub const COLOR_CHANNELS: usize = 3;

/// Render passes a path can write to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PassType {
    /// Beauty pass with transparency in the alpha channel.
    Combined,

    /// Directly visible background.
    Background,

    /// Directly visible emission from lights.
    Emission,

    /// Combined contributions of the even half of the samples, doubled. Used
    /// to estimate per-pixel error for adaptive sampling.
    AdaptiveAuxBuffer,

    /// Light group with the given index.
    Lightgroup(usize),
}

/// Which passes the film stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilmConfig {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Store the background pass.
    pub background_pass: bool,

    /// Store the emission pass.
    pub emission_pass: bool,

    /// Store the adaptive sampling auxiliary pass.
    pub adaptive_aux_pass: bool,

    /// Number of light group passes.
    pub num_lightgroups: usize,
}

impl FilmConfig {
    /// Returns a configuration with only the combined pass.
    ///
    /// * `width`  - Width in pixels.
    /// * `height` - Height in pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background_pass: false,
            emission_pass: false,
            adaptive_aux_pass: false,
            num_lightgroups: 0,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Film resolution must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

/// Channel offsets of each pass within a pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassLayout {
    background: Option<usize>,
    emission: Option<usize>,
    adaptive_aux: Option<usize>,
    lightgroups: usize,
    num_lightgroups: usize,
    stride: usize,
}

impl PassLayout {
    /// Lays out the passes of a film. The combined pass is always first.
    ///
    /// * `config` - Film configuration.
    pub fn new(config: &FilmConfig) -> Self {
        let mut stride = COMBINED_CHANNELS;
        let mut next = |present: bool, channels: usize| {
            present.then(|| {
                let offset = stride;
                stride += channels;
                offset
            })
        };

        let background = next(config.background_pass, COLOR_CHANNELS);
        let emission = next(config.emission_pass, COLOR_CHANNELS);
        let adaptive_aux = next(config.adaptive_aux_pass, COMBINED_CHANNELS);
        let lightgroups = stride;
        stride += config.num_lightgroups * COLOR_CHANNELS;

        Self {
            background,
            emission,
            adaptive_aux,
            lightgroups,
            num_lightgroups: config.num_lightgroups,
            stride,
        }
    }

    /// Returns the channel offset of a pass, `None` if the film does not
    /// store it.
    ///
    /// * `pass` - The pass.
    pub fn offset(&self, pass: PassType) -> Option<usize> {
        match pass {
            PassType::Combined => Some(0),
            PassType::Background => self.background,
            PassType::Emission => self.emission,
            PassType::AdaptiveAuxBuffer => self.adaptive_aux,
            PassType::Lightgroup(i) if i < self.num_lightgroups => Some(self.lightgroups + i * COLOR_CHANNELS),
            PassType::Lightgroup(_) => None,
        }
    }

    /// Returns the number of channels of a pass.
    ///
    /// * `pass` - The pass.
    pub fn channels(pass: PassType) -> usize {
        match pass {
            PassType::Combined | PassType::AdaptiveAuxBuffer => COMBINED_CHANNELS,
            _ => COLOR_CHANNELS,
        }
    }

    /// Returns the number of channels per pixel.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
