//! Bit and hash utilities
//!
//! All functions here are total over 32-bit words and carry no state. They
//! are shared by the pattern sampler (scrambling and rotation) and pixel seed
//! derivation.

use crate::math::Float;

/// First Laine-Karras multiplier.
pub const LK_K1: u32 = 0x6c50b47c;

/// Second Laine-Karras multiplier.
pub const LK_K2: u32 = 0xb82f1e52;

/// Third Laine-Karras multiplier.
pub const LK_K3: u32 = 0xc7afe638;

/// Fourth Laine-Karras multiplier.
pub const LK_K4: u32 = 0x8d22f6e6;

/// Scale converting a 32-bit hash to [0, 1). The divisor is slightly larger
/// than 2^32 so that `u32::MAX` maps strictly below 1.
const RAND_FLOAT_SCALE: Float = 1.0 / 4294967808.0;

/// Reverses the bits of a 32-bit word.
///
/// * `x` - The word.
#[inline(always)]
pub fn reverse_bits32(x: u32) -> u32 {
    x.reverse_bits()
}

/// Laine-Karras style permutation. Each step only propagates a bit into
/// higher bits so every step is invertible for a fixed `seed`.
///
/// * `x`    - The value to permute.
/// * `seed` - The permutation seed.
#[inline]
pub fn laine_karras_permutation(x: u32, seed: u32) -> u32 {
    let mut x = x.wrapping_add(seed);
    x ^= x.wrapping_mul(LK_K1);
    x ^= x.wrapping_mul(LK_K2);
    x ^= x.wrapping_mul(LK_K3);
    x ^= x.wrapping_mul(LK_K4);
    x
}

/// Owen scramble of a sample index, implemented as a Laine-Karras permutation
/// applied to the bit-reversed index.
///
/// * `x`    - The sample index.
/// * `seed` - The scramble seed.
#[inline]
pub fn nested_uniform_scramble(x: u32, seed: u32) -> u32 {
    reverse_bits32(laine_karras_permutation(reverse_bits32(x), seed))
}

/// Regular hash mixing an index with a seed.
///
/// * `i` - The index.
/// * `p` - The seed.
#[inline]
pub fn cmj_hash(i: u32, p: u32) -> u32 {
    let mut i = i ^ p;
    i ^= i >> 17;
    i ^= i >> 10;
    i = i.wrapping_mul(0xb36534e5);
    i ^= i >> 12;
    i ^= i >> 21;
    i = i.wrapping_mul(0x93fc4795);
    i ^= 0xdf6e307f;
    i ^= i >> 17;
    i.wrapping_mul(1 | p >> 18)
}

/// Cheaper hash mixing an index with a seed.
///
/// * `i` - The index.
/// * `p` - The seed.
#[inline]
pub fn cmj_hash_simple(i: u32, p: u32) -> u32 {
    let mut i = (i ^ 61) ^ p;
    i = i.wrapping_add(i << 3);
    i ^= i >> 4;
    i.wrapping_mul(0x27d4eb2d)
}

/// Converts a 32-bit hash to a float in [0, 1).
///
/// * `h` - The hash.
#[inline(always)]
pub fn hash_to_float(h: u32) -> Float {
    // `h as f32` rounds to nearest; for the largest words this is 2^32 and
    // the product is 4294967296 / 4294967808 < 1.
    h as Float * RAND_FLOAT_SCALE
}

/// Returns a float in [0, 1) from the regular hash.
///
/// * `i` - The index.
/// * `p` - The seed.
#[inline]
pub fn cmj_randfloat(i: u32, p: u32) -> Float {
    hash_to_float(cmj_hash(i, p))
}

/// Returns a float in [0, `scale`) from the simple hash.
///
/// * `i`     - The index.
/// * `p`     - The seed.
/// * `scale` - Upper bound of the result (1 for the unit interval).
#[inline]
pub fn cmj_randfloat_simple(i: u32, p: u32, scale: Float) -> Float {
    hash_to_float(cmj_hash_simple(i, p)) * scale
}

/// Integer hash of a single value.
///
/// * `n` - The value.
#[inline]
pub fn hash_iqint1(n: u32) -> u32 {
    let n = (n << 13) ^ n;
    n.wrapping_mul(
        n.wrapping_mul(n)
            .wrapping_mul(15731)
            .wrapping_add(789221),
    )
    .wrapping_add(1376312589)
}

/// Integer hash of a 2D coordinate.
///
/// * `x` - The x-coordinate.
/// * `y` - The y-coordinate.
#[inline]
pub fn hash_iqnt2d(x: u32, y: u32) -> u32 {
    let qx = 1103515245u32.wrapping_mul((x >> 1) ^ y);
    let qy = 1103515245u32.wrapping_mul((y >> 1) ^ x);
    1103515245u32.wrapping_mul(qx ^ (qy >> 3))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
