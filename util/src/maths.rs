//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `lhs` is much smaller than `rhs.abs()` in magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Normalise an angle in radians into the range [0, 2pi).
///
/// Exact multiples of 2pi, including negative ones, map to 0. The round-off
/// case noted on [`rem_euclid`], where a tiny negative input lands on 2pi
/// itself, is folded back to 0 so the output range holds strictly.
pub fn norm_angle_2pi<T>(angle_rad: T) -> T
where
    T: Float,
{
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let norm = rem_euclid(angle_rad, tau_t);
    if norm >= tau_t {
        T::from(0.0).unwrap()
    } else {
        norm
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
