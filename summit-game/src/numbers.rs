//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the altitude range (`0..=u32::MAX`), returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Clamp a value into `[min, max]` while letting NaN through untouched.
///
/// Scores coming from the judgment provider keep NaN observable instead of
/// silently becoming a bound.
#[must_use]
pub fn clamp_preserving_nan(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return value;
    }
    value.clamp(min, max)
}

/// Convert a count into f64 for ratio math.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}
