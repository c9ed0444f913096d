//! Stratification measures for 2D point sets.

use kernel::geometry::*;
use kernel::math::*;

/// Returns the chi-square statistic of points in [0,1)² binned on a
/// `grid` x `grid` grid against a uniform expectation. Well stratified sets
/// score far below the `grid² - 1` degrees of freedom.
///
/// * `points` - The points.
/// * `grid`   - Number of cells along each axis.
pub fn chi_square_2d(points: &[Point2f], grid: usize) -> f64 {
    if points.is_empty() || grid == 0 {
        return 0.0;
    }

    let mut counts = vec![0_usize; grid * grid];
    let cell = |v: Float| min((v * grid as Float) as usize, grid - 1);
    for p in points {
        counts[cell(p.y) * grid + cell(p.x)] += 1;
    }

    let expected = points.len() as f64 / (grid * grid) as f64;
    counts
        .iter()
        .map(|&c| (c as f64 - expected).powi(2) / expected)
        .sum()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_per_cell_scores_zero() {
        let points: Vec<Point2f> = (0..16)
            .map(|i| Point2f::new((i % 4) as Float * 0.25 + 0.1, (i / 4) as Float * 0.25 + 0.1))
            .collect();
        assert_eq!(chi_square_2d(&points, 4), 0.0);
    }

    #[test]
    fn clumped_points_score_high() {
        let points = vec![Point2f::new(0.01, 0.01); 16];
        // All 16 in one of 16 cells: 15 empty cells and one with 15 extra.
        assert_eq!(chi_square_2d(&points, 4), 15.0 + 225.0);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(chi_square_2d(&[], 4), 0.0);
        assert_eq!(chi_square_2d(&[Point2f::new(0.5, 0.5)], 0), 0.0);
    }
}
