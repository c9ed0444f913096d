//! Sobol direction matrices.
//!
//! Direction numbers are the Joe-Kuo "new-joe-kuo-6" set for the first
//! dimensions. Dimension 0 is the van der Corput sequence. The 32-bit
//! direction vectors are generated once and shared by all threads.

use std::sync::OnceLock;

/// Number of bits in a Sobol direction vector.
pub const SOBOL_BITS: usize = 32;

/// Number of embedded Sobol dimensions. Larger dimensions wrap around.
pub const NUM_SOBOL_DIMENSIONS: usize = 33;

/// Joe-Kuo parameters `(s, a, m_1..m_s)` for dimensions 1 and up.
const DIRECTION_NUMBERS: [(u32, u32, &[u32]); NUM_SOBOL_DIMENSIONS - 1] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
    (7, 7, &[1, 1, 3, 13, 7, 35, 63]),
    (7, 8, &[1, 3, 5, 9, 1, 25, 53]),
    (7, 14, &[1, 3, 1, 13, 9, 35, 107]),
    (7, 19, &[1, 3, 1, 5, 27, 61, 31]),
    (7, 21, &[1, 1, 5, 11, 19, 41, 61]),
    (7, 28, &[1, 3, 5, 3, 3, 13, 69]),
    (7, 31, &[1, 1, 7, 13, 1, 19, 1]),
    (7, 32, &[1, 3, 7, 5, 13, 19, 59]),
    (7, 37, &[1, 1, 3, 9, 25, 29, 41]),
    (7, 41, &[1, 3, 5, 13, 23, 1, 55]),
    (7, 42, &[1, 3, 7, 3, 13, 59, 17]),
    (7, 50, &[1, 3, 1, 3, 5, 53, 69]),
];

/// Direction vectors for each embedded dimension.
pub type SobolMatrices = [[u32; SOBOL_BITS]; NUM_SOBOL_DIMENSIONS];

/// Returns the process-wide Sobol direction vectors.
pub fn sobol_matrices() -> &'static SobolMatrices {
    static DATA: OnceLock<SobolMatrices> = OnceLock::new();
    DATA.get_or_init(generate_direction_vectors)
}

/// Generates the direction vectors from the Joe-Kuo parameters.
fn generate_direction_vectors() -> SobolMatrices {
    let mut vectors = [[0_u32; SOBOL_BITS]; NUM_SOBOL_DIMENSIONS];

    // First dimension is the van der Corput sequence.
    for (i, v) in vectors[0].iter_mut().enumerate() {
        *v = 1 << (SOBOL_BITS - 1 - i);
    }

    for (dim, &(s, a, m)) in DIRECTION_NUMBERS.iter().enumerate() {
        let v = &mut vectors[dim + 1];
        let s = s as usize;

        for i in 0..s {
            v[i] = m[i] << (SOBOL_BITS - 1 - i);
        }

        for i in s..SOBOL_BITS {
            v[i] = v[i - s] ^ (v[i - s] >> s);
            for k in 1..s {
                v[i] ^= ((a >> (s - 1 - k)) & 1) * v[i - k];
            }
        }
    }

    vectors
}

/// Returns the unscrambled 32-bit Sobol value of `index` in `dimension`.
/// Dimensions beyond the embedded ones wrap around.
///
/// * `index`     - Sequence index.
/// * `dimension` - Sobol dimension.
#[inline]
pub fn sobol_u32(index: u32, dimension: u32) -> u32 {
    let v = &sobol_matrices()[dimension as usize % NUM_SOBOL_DIMENSIONS];

    let mut result = 0;
    let mut i = index;
    let mut bit = 0;
    while i != 0 {
        if i & 1 != 0 {
            result ^= v[bit];
        }
        i >>= 1;
        bit += 1;
    }
    result
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn first_dimension_is_van_der_corput() {
        for i in 0..1024 {
            assert_eq!(sobol_u32(i, 0), i.reverse_bits());
        }
    }

    #[test]
    fn second_dimension_known_values() {
        let expected = [0.0, 0.5, 0.75, 0.25, 0.625, 0.125, 0.375, 0.875];
        for (i, e) in expected.iter().enumerate() {
            let v = sobol_u32(i as u32, 1) as f64 / 4294967296.0;
            assert_eq!(v, *e);
        }
    }

    #[test]
    fn direction_numbers_are_valid() {
        for (s, _, m) in DIRECTION_NUMBERS.iter() {
            assert_eq!(*s as usize, m.len());
            for (i, m_i) in m.iter().enumerate() {
                assert_eq!(m_i & 1, 1);
                assert!(*m_i < 1 << (i + 1));
            }
        }
    }

    #[test]
    fn each_dimension_is_stratified_in_1d() {
        // Any aligned block of 2^k points covers each 1/2^k interval once.
        for dim in 0..NUM_SOBOL_DIMENSIONS as u32 {
            let cells: HashSet<u32> = (256..512).map(|i| sobol_u32(i, dim) >> 24).collect();
            assert_eq!(cells.len(), 256, "dimension {}", dim);
        }
    }

    #[test]
    fn dimension_wraps() {
        assert_eq!(sobol_u32(77, NUM_SOBOL_DIMENSIONS as u32 + 3), sobol_u32(77, 3));
    }
}
