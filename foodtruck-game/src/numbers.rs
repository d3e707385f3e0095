//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round half-up (toward positive infinity on ties) and clamp to the i32
/// range, returning 0 for non-finite values.
///
/// Ties matter for negative money: `-2.5` rounds to `-2`, not `-3`.
#[must_use]
pub fn round_half_up_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let rounded = (value + 0.5).floor().clamp(min, max);
    cast::<f64, i32>(rounded).unwrap_or(0)
}

/// Convert a usize index bound into f64 for unit-interval scaling.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Floor a non-negative f64 into a usize, returning 0 for negative or
/// non-finite input.
#[must_use]
pub fn floor_f64_to_usize(value: f64) -> usize {
    if !value.is_finite() || value < 0.0 {
        return 0;
    }
    cast::<f64, usize>(value.floor()).unwrap_or(0)
}
