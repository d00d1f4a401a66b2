//! Common

use hexf::hexf32;
use num_traits::Num;
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 32-bit precision value for 1 - epsilon.
pub const FLOAT_ONE_MINUS_EPSILON: f32 = hexf32!("0x1.fffffep-1"); // 0.99999994

/// 1 - epsilon in the precision we've selected for `Float`.
pub const ONE_MINUS_EPSILON: Float = FLOAT_ONE_MINUS_EPSILON;

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

/// Clamps a value to the closed interval `[low, high]`.
///
/// * `val`  - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Linearly interpolate between two values for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t`  - Parameter.
/// * `p0` - Value at t=0.
/// * `p1` - Value at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Returns x^5.
#[inline(always)]
pub fn pow5(x: Float) -> Float {
    let x2 = x * x;
    x2 * x2 * x
}

/// Returns true if the value is finite and at least 1; the smallest valid
/// index of refraction.
#[inline]
pub fn is_valid_eta(eta: Float) -> bool {
    eta.is_finite() && eta >= 1.0
}

/// Bisects a monotonic predicate over `0..size` and returns the index `i`
/// such that `pred(i)` is true and `pred(i + 1)` is false, clamped to
/// `[0, size - 2]`.
///
/// * `size` - Size of array. Must be at least 2.
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    debug_assert!(size >= 2);

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

    min(first.saturating_sub(1), size - 2)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn find_interval_clamps_to_ends() {
        let nodes = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= -1.0), 0);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 0.0), 0);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 1.5), 1);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 3.0), 2);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 10.0), 2);
    }

    #[test]
    fn eta_validation() {
        assert!(is_valid_eta(1.0));
        assert!(is_valid_eta(2.4));
        assert!(!is_valid_eta(0.99));
        assert!(!is_valid_eta(Float::NAN));
        assert!(!is_valid_eta(INFINITY));
    }

    proptest! {
        #[test]
        fn find_interval_brackets_value(x in 0.0..9.0f32) {
            let nodes: Vec<Float> = (0..10).map(|i| i as Float).collect();
            let i = find_interval(nodes.len(), |j| nodes[j] <= x);
            prop_assert!(nodes[i] <= x && x <= nodes[i + 1]);
        }

        #[test]
        fn clamp_in_range(v in -10.0..10.0f32) {
            let c = clamp(v, -1.0, 1.0);
            prop_assert!((-1.0..=1.0).contains(&c));
        }
    }
}
