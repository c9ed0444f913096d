//! Film

mod passes;
mod render_buffer;

// Re-export.
pub use passes::*;
pub use render_buffer::*;

use crate::geometry::Point2u;
use crate::math::Float;
use crate::spectrum::Spectrum;

/// Sink for path contributions. Implementations must accumulate additively
/// and be safe to call from any number of threads at once.
pub trait RenderBufferWriter: Sync {
    /// Returns true if the buffer stores the given pass.
    ///
    /// * `pass` - The pass.
    fn has_pass(&self, pass: PassType) -> bool;

    /// Adds a spectrum to the colour channels of a pass. Ignored when the
    /// pass does not exist.
    ///
    /// * `pixel` - The pixel.
    /// * `pass`  - The pass.
    /// * `value` - The contribution.
    fn accumulate(&self, pixel: Point2u, pass: PassType, value: Spectrum);

    /// Adds a transparency term to the alpha channel of the combined pass.
    ///
    /// * `pixel` - The pixel.
    /// * `value` - The transparency.
    fn accumulate_transparency(&self, pixel: Point2u, value: Float);
}
