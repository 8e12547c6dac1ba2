/// Offset applied to spawned ray origins (and shaved off shadow-ray extents)
/// so that a surface does not shadow itself.
pub const RAY_EPSILON: f32 = 1e-4;

/// `sqrt` clamped at zero, for expressions like `sqrt(1 - cos^2)` that can
/// dip below zero through rounding.
pub fn safe_sqrt(x: f32) -> f32 {
    x.max(0.0).sqrt()
}

/// Computes `x / y` if y is nonzero; returns `None` if y is zero.
pub fn try_divide(x: f32, y: f32) -> Option<f32> {
    if y == 0.0 {
        None
    } else {
        Some(x / y)
    }
}

/// Returns the pair `(min, max)` of the two arguments.
pub fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
