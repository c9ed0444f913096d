//! Common

#![allow(dead_code)]

use super::clamp::*;
use num_traits::Num;
use std::ops::Neg;

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Returns the fractional part of a non-negative value, wrapping it into
/// [0, 1).
///
/// For `v >= 0` the subtraction is exact so the result never rounds up to 1.
///
/// * `v` - The value.
#[inline(always)]
pub fn fract(v: Float) -> Float {
    v - v.floor()
}

/// Divides `a` by `b` returning 0 when `b` is 0.
///
/// * `a` - Dividend.
/// * `b` - Divisor.
#[inline(always)]
pub fn safe_divide(a: Float, b: Float) -> Float {
    if b != 0.0 {
        a / b
    } else {
        0.0
    }
}

/// Helper function which emulates the behavior of std::upper_bound(). The
/// implementation here uses a predicate function `pred` to compare values at
/// various indices instead of requiring access to an actual array.
///
/// * `size` - Size of array.
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first.saturating_sub(1), 0, size - 2)
}

/// Returns the spherical angle theta of a unit direction measured from the
/// +z axis.
///
/// * `z` - The z-component of the direction.
#[inline(always)]
pub fn spherical_theta(z: Float) -> Float {
    clamp(z, -1.0, 1.0).acos()
}

/// Returns the spherical angle phi in [0, 2π) of a direction.
///
/// * `x` - The x-component.
/// * `y` - The y-component.
#[inline(always)]
pub fn spherical_phi(x: Float, y: Float) -> Float {
    let p = y.atan2(x);
    if p < 0.0 {
        p + TWO_PI
    } else {
        p
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
