//! Coercion of raw form input into numeric field values.
//!
//! Empty or non-numeric input becomes `0`. Time values are clamped to be
//! non-negative; pixel values accept a fractional input and truncate it.

/// Parse a time value in seconds. Non-finite and negative values become `0.0`.
pub fn coerce_seconds(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Parse a pixel coordinate.
pub fn coerce_pixels(raw: &str) -> i32 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i32>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        // `as` saturates at the i32 bounds.
        Ok(value) if value.is_finite() => value.trunc() as i32,
        _ => 0,
    }
}
