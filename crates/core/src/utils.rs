//! Numeric helpers shared by the classifier and the scorer.

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Clamps a value into `[0, 1]`, mapping NaN to 0.
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Divides, returning 0 when the denominator is zero or the result is not finite.
#[inline]
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    if den.abs() <= EPSILON {
        return 0.0;
    }
    let r = num / den;
    if r.is_finite() { r } else { 0.0 }
}

/// True when `v` lies inside the closed band `[lo, hi]`.
#[inline]
pub fn in_band(v: f64, (lo, hi): (f64, f64)) -> bool {
    v >= lo && v <= hi
}
