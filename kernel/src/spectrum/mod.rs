//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// The spectrum type used for radiance and throughput.
pub type Spectrum = RGBSpectrum;
