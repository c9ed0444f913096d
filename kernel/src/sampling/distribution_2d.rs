//! 2D Distribution.

use crate::geometry::*;
use crate::math::*;
use crate::sampling::Distribution1D;

/// Represents a piecewise-constant 2D function’s PDF and CDF and provides methods to perform this sampling efficiently.
#[derive(Clone, Debug)]
pub struct Distribution2D {
    /// 1D conditional sampling density `p[ũ|ṽ]` for each `nv`.
    p_conditional_v: Vec<Distribution1D>,

    /// Marginal sampling density p[ṽ].
    p_marginal: Distribution1D,
}

impl Distribution2D {
    /// Returns a new `Distribution2D` for given piecewise-constant function.
    ///
    /// - `func` - Piecewise-constant 2D function as rows of equal length.
    pub fn new(func: Vec<Vec<Float>>) -> Self {
        let p_conditional_v: Vec<Distribution1D> = func.into_iter().map(Distribution1D::new).collect();
        let marginal_func: Vec<Float> = p_conditional_v.iter().map(|pcv| pcv.func_int).collect();
        let p_marginal = Distribution1D::new(marginal_func);
        Self {
            p_conditional_v,
            p_marginal,
        }
    }

    /// Return a sample point and PDF from the distribution given a random sample.
    ///
    /// - `u` - The random sample.
    pub fn sample_continuous(&self, u: &Point2f) -> (Point2f, Float) {
        // Draw a sample from the p[ṽ] marginal distribution in order to find the
        // ṽ coordinate.
        let (d1, pdf1, v) = self.p_marginal.sample_continuous(u.y);

        // Use ṽ to find the precomputed conditional distribution to use for
        // sampling ũ.
        let (d0, pdf0, _) = self.p_conditional_v[v].sample_continuous(u.x);

        (Point2f::new(d0, d1), pdf0 * pdf1)
    }

    /// Return the PDF value for a given sample value.
    ///
    /// * `p` - Sample value.
    pub fn pdf(&self, p: &Point2f) -> Float {
        // Compute the product of the conditional and marginal PDFs for sampling
        // it from the distribution.
        let nu = self.p_conditional_v[0].count();
        let nv = self.p_marginal.count();
        let iu = clamp((p.x * nu as Float) as usize, 0, nu - 1);
        let iv = clamp((p.y * nv as Float) as usize, 0, nv - 1);
        safe_divide(self.p_conditional_v[iv].func[iu], self.p_marginal.func_int)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn sampled_pdf_matches_pdf() {
        let d = Distribution2D::new(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 2.0]]);
        for u in [Point2f::new(0.1, 0.2), Point2f::new(0.7, 0.5), Point2f::new(0.9, 0.95)] {
            let (p, pdf) = d.sample_continuous(&u);
            assert!(approx_eq!(f32, pdf, d.pdf(&p), epsilon = 1e-5));
        }
    }

    #[test]
    fn constant_function_is_uniform() {
        let d = Distribution2D::new(vec![vec![5.0; 4]; 4]);
        assert!(approx_eq!(f32, d.pdf(&Point2f::new(0.3, 0.6)), 1.0, epsilon = 1e-6));
    }
}
