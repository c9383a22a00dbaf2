//! Numeric conversions used for pixel arithmetic.

/// Convert a count into a float.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

/// Convert a non-negative float into a count, truncating the fractional part.
///
/// Negative values and `NaN` give 0, values beyond the range of `usize` saturate.
#[must_use]
pub fn f64_to_usize(value: f64) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let newval = value as usize;
    newval
}
