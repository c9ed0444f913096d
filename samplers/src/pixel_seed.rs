//! Pixel seeds

use kernel::hash::{hash_iqint1, hash_iqnt2d};

/// Per-pixel seed of the sample generator. Deterministic in the pixel and the
/// integrator seed, so re-rendering with the same seed reproduces every
/// sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSeed(pub u32);

impl PixelSeed {
    /// Returns the seed of pixel (x, y).
    ///
    /// * `x`    - Pixel x-coordinate.
    /// * `y`    - Pixel y-coordinate.
    /// * `seed` - Integrator seed.
    pub fn new(x: u32, y: u32, seed: u32) -> Self {
        Self(hash_iqnt2d(x, y) ^ seed)
    }

    /// Returns the seed of a pixel given its linear index.
    ///
    /// * `index` - Linear pixel index.
    /// * `seed`  - Integrator seed.
    pub fn from_index(index: u32, seed: u32) -> Self {
        Self(hash_iqint1(index) ^ seed)
    }
}

impl From<u32> for PixelSeed {
    fn from(hash: u32) -> Self {
        Self(hash)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
