//! Multiple importance sampling weights

use crate::math::*;
use crate::{stat_counter, stat_inc, stat_register_fns};
use std::sync::Once;

stat_counter!(
    "Integrator/MIS weights with zero PDFs",
    MIS_ZERO_PDFS,
    mis_stats_zero_pdfs
);

stat_register_fns!(mis_stats_zero_pdfs);

/// Weight samples using the balance heuristic.
///
/// * `nf`    - Number of samples taken from `f_pdf`.
/// * `f_pdf` - First sampling distribution.
/// * `ng`    - Number of samples taken from `g_pdf`.
/// * `g_pdf` - Second sampling distribution.
#[inline]
pub fn balance_heuristic(nf: Int, f_pdf: Float, ng: Int, g_pdf: Float) -> Float {
    (nf as Float * f_pdf) / (nf as Float * f_pdf + ng as Float * g_pdf)
}

/// Returns the MIS weight of a BSDF-sampled ray that hit a light, weighted
/// against light sampling with the balance heuristic.
///
/// Both PDFs being zero means MIS was enabled for a ray that never recorded a
/// BSDF PDF. The weight falls back to 1 and the event is counted and logged
/// once per process.
///
/// * `mis_ray_pdf` - BSDF sampling PDF of the ray direction.
/// * `light_pdf`   - Light sampling PDF of the same direction.
#[inline]
pub fn mis_weight(mis_ray_pdf: Float, light_pdf: Float) -> Float {
    if mis_ray_pdf + light_pdf == 0.0 {
        report_zero_pdfs();
        return 1.0;
    }
    balance_heuristic(1, mis_ray_pdf, 1, light_pdf)
}

#[cold]
fn report_zero_pdfs() {
    static WARN: Once = Once::new();

    register_stats();
    stat_inc!(MIS_ZERO_PDFS, 1);
    WARN.call_once(|| {
        warn!("MIS weight requested with zero BSDF and light PDFs; using weight 1. Check MIS_SKIP handling upstream.");
    });
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_get;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn equal_pdfs_split_evenly() {
        assert_eq!(mis_weight(2.0, 2.0), 0.5);
    }

    #[test]
    fn zero_light_pdf_gives_full_weight() {
        assert_eq!(mis_weight(1.0, 0.0), 1.0);
    }

    #[test]
    fn zero_pdfs_are_guarded_and_counted() {
        let before = stat_get!(MIS_ZERO_PDFS);
        let w = mis_weight(0.0, 0.0);
        assert_eq!(w, 1.0);
        assert!(!w.is_nan());
        assert_eq!(stat_get!(MIS_ZERO_PDFS), before + 1);
    }

    proptest! {
        #[test]
        fn complementary_weights(a in 1e-3f32..1e3, b in 1e-3f32..1e3) {
            let sum = mis_weight(a, b) + mis_weight(b, a);
            prop_assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-5));
        }

        #[test]
        fn weight_in_unit_interval(a in 0.0f32..1e3, b in 0.0f32..1e3) {
            let w = mis_weight(a, b);
            prop_assert!((0.0..=1.0).contains(&w));
        }
    }
}
