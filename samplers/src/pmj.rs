//! Progressive multi-jittered (0,2) pattern generation.
//!
//! Each pattern is the first two Sobol dimensions, a (0,2)-sequence,
//! Owen-scrambled with per-pattern seeds. Owen scrambling keeps every
//! aligned power-of-two block of points a (0,m,2)-net, so every prefix of
//! a pattern is stratified the way progressive multi-jittered sequences are.
//!
//! Points are stored in a slightly permuted Sobol order so that the two
//! halves picked by the odd-bit parity of the slot are stratified too.

use crate::sobol_matrices::sobol_u32;
use crate::{NUM_PMJ_PATTERNS, NUM_PMJ_SAMPLES};
use kernel::hash::nested_uniform_scramble;
use kernel::math::Float;
use kernel::rng::RNG;
use std::thread;

/// 2^-24.
const INV_2_POW_24: Float = 1.0 / 16777216.0;

/// Converts a 32-bit fixed point value to a float in [0, 1). Only the top 24
/// bits are kept so the result is exact and never rounds up to 1.
///
/// * `v` - The fixed point value.
#[inline]
pub(crate) fn fixed_to_unit_float(v: u32) -> Float {
    (v >> 8) as Float * INV_2_POW_24
}

/// Returns the Sobol index stored in a pattern slot.
///
/// Bit 1 is flipped on the parity of bits 4, 7 and 9, which keeps aligned
/// blocks in place. The odd-bit parity of the slot becomes the parity of
/// bits 1, 3, 4 and 5 of the index; in Sobol order each side of that split
/// fills a square grid evenly for every power-of-two prefix.
///
/// * `slot` - Slot within the pattern.
#[inline]
fn slot_sobol_index(slot: u32) -> u32 {
    slot ^ (((slot & 0x290).count_ones() & 1) << 1)
}

/// Returns the interleaved `[x0, y0, x1, y1, ...]` points of one pattern.
///
/// * `pattern` - Pattern index; selects the scramble seeds.
pub fn generate_pmj02_pattern(pattern: usize) -> Vec<Float> {
    let mut rng = RNG::new(pattern as u64);
    let seed_x = rng.uniform_u32();
    let seed_y = rng.uniform_u32();

    let mut points = Vec::with_capacity(2 * NUM_PMJ_SAMPLES);
    for slot in 0..NUM_PMJ_SAMPLES as u32 {
        let i = slot_sobol_index(slot);
        points.push(fixed_to_unit_float(nested_uniform_scramble(sobol_u32(i, 0), seed_x)));
        points.push(fixed_to_unit_float(nested_uniform_scramble(sobol_u32(i, 1), seed_y)));
    }
    points
}

/// Generates all patterns in parallel and returns them pattern-major.
///
/// * `n_threads` - Number of worker threads.
pub fn generate_pmj02_patterns(n_threads: usize) -> Vec<Float> {
    let n_threads = n_threads.clamp(1, NUM_PMJ_PATTERNS);
    let pattern_len = 2 * NUM_PMJ_SAMPLES;
    let mut values: Vec<Float> = vec![0.0; NUM_PMJ_PATTERNS * pattern_len];

    debug!("Generating {NUM_PMJ_PATTERNS} sample patterns on {n_threads} threads");

    let values_ref = &mut values;
    thread::scope(|scope| {
        let (tx_collector, rx_collector) = crossbeam_channel::bounded::<(usize, Vec<Float>)>(n_threads);
        let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_threads);

        // Spawn collector thread.
        scope.spawn(move || {
            for (pattern, points) in rx_collector.iter() {
                let start = pattern * pattern_len;
                values_ref[start..start + pattern_len].copy_from_slice(&points);
            }
        });

        // Spawn worker threads.
        for _ in 0..n_threads {
            let rx_worker = rx_worker.clone();
            let tx_collector = tx_collector.clone();
            scope.spawn(move || {
                for pattern in rx_worker.iter() {
                    if tx_collector.send((pattern, generate_pmj02_pattern(pattern))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(rx_worker);
        drop(tx_collector);

        // Send work.
        for pattern in 0..NUM_PMJ_PATTERNS {
            if tx_worker.send(pattern).is_err() {
                break;
            }
        }
    });

    values
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_is_even;
    use kernel::integrator::SamplingPattern;
    use std::collections::{HashMap, HashSet};

    fn cell(v: Float, n: u32) -> u32 {
        (v * n as Float) as u32
    }

    /// Every elementary interval of area 1/len holds exactly one point.
    fn is_02_net(points: &[Float]) -> bool {
        let len = points.len() / 2;
        let m = len.trailing_zeros();
        (0..=m).all(|k| {
            let (nx, ny) = (1u32 << k, 1u32 << (m - k));
            let cells: HashSet<(u32, u32)> = points
                .chunks(2)
                .map(|p| (cell(p[0], nx), cell(p[1], ny)))
                .collect();
            cells.len() == len
        })
    }

    #[test]
    fn fixed_to_unit_float_below_one() {
        assert!(fixed_to_unit_float(u32::MAX) < 1.0);
        assert_eq!(fixed_to_unit_float(0x8000_0000), 0.5);
    }

    #[test]
    fn prefixes_are_stratified() {
        let points = generate_pmj02_pattern(3);
        for k in 0..=10 {
            let len = 1 << k;
            assert!(is_02_net(&points[..2 * len]), "prefix of {} points", len);
        }
    }

    #[test]
    fn aligned_blocks_are_stratified() {
        let points = generate_pmj02_pattern(11);
        for block in points.chunks(2 * 64) {
            assert!(is_02_net(block));
        }
    }

    #[test]
    fn slot_order_keeps_aligned_blocks() {
        let mut seen = HashSet::new();
        for slot in 0..NUM_PMJ_SAMPLES as u32 {
            let i = slot_sobol_index(slot);
            assert_eq!(i >> 2, slot >> 2);
            assert!(seen.insert(i));
        }
    }

    #[test]
    fn parity_halves_of_prefixes_are_stratified() {
        for pattern in [0, 5, NUM_PMJ_PATTERNS - 1] {
            let points = generate_pmj02_pattern(pattern);
            for m in 2..=10 {
                let len = 1_u32 << m;
                let grid = 1_u32 << ((m - 1) / 2);
                let per_cell = len / 2 / (grid * grid);
                for even in [true, false] {
                    let mut cells: HashMap<(u32, u32), u32> = HashMap::new();
                    for slot in (0..len).filter(|&i| sample_is_even(SamplingPattern::Pmj, i) == even) {
                        let p = &points[2 * slot as usize..];
                        *cells.entry((cell(p[0], grid), cell(p[1], grid))).or_insert(0) += 1;
                    }
                    assert_eq!(cells.len() as u32, grid * grid, "pattern {pattern}, prefix {len}");
                    assert!(
                        cells.values().all(|&c| c == per_cell),
                        "pattern {pattern}, prefix {len}, even {even}"
                    );
                }
            }
        }
    }

    #[test]
    fn patterns_differ() {
        assert_ne!(generate_pmj02_pattern(0), generate_pmj02_pattern(1));
    }

    #[test]
    fn parallel_matches_serial() {
        let values = generate_pmj02_patterns(4);
        assert_eq!(values.len(), NUM_PMJ_PATTERNS * 2 * NUM_PMJ_SAMPLES);
        for pattern in [0, 17, NUM_PMJ_PATTERNS - 1] {
            let start = pattern * 2 * NUM_PMJ_SAMPLES;
            assert_eq!(
                &values[start..start + 2 * NUM_PMJ_SAMPLES],
                generate_pmj02_pattern(pattern).as_slice()
            );
        }
    }
}
