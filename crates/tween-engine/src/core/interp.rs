// core/interp.rs
//
// Interpolation math shared by every tween.
// Nothing here clamps: eased progress may overshoot [0, 1] and the result follows it.

use glam::Vec4;

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two raw tween values.
#[inline]
pub fn lerp_vec4(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a + (b - a) * t
}

/// Fraction of a pass that has elapsed, given the time still remaining.
///
/// Only the lower side is clamped: once `remaining` runs negative the result
/// settles at 1.
#[inline]
pub fn progress(remaining: f32, total: f32) -> f32 {
    1.0 - (remaining / total).max(0.0)
}
