use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

static NEXT_TWEEN_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a tween, assigned when the tween is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

impl TweenId {
    /// Allocate the next process-unique ID.
    pub(crate) fn next() -> Self {
        TweenId(NEXT_TWEEN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tween#{}", self.0)
    }
}

/// Semantic payload carried by a tween.
///
/// Every tween stores its endpoints as a raw `Vec4`; the kind decides how that
/// raw value is handed to update callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweenKind {
    /// A single float in the `x` lane.
    Scalar,
    /// `x`, `y`, `z` lanes.
    Vector3,
    /// `r`, `g`, `b`, `a` in the `x`..`w` lanes.
    Color,
    /// All four lanes, uninterpreted.
    Vector4,
}

/// Linear RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// One lane of a raw tween value. For colors `X..W` map to `r..a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    X,
    Y,
    Z,
    W,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::X => 0,
            Channel::Y => 1,
            Channel::Z => 2,
            Channel::W => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = TweenId::next();
        let b = TweenId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn color_is_four_floats() {
        let raw: [f32; 4] = bytemuck::cast(Color::rgba(0.1, 0.2, 0.3, 0.4));
        assert_eq!(raw, [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn channel_indices() {
        assert_eq!(Channel::X.index(), 0);
        assert_eq!(Channel::W.index(), 3);
    }
}
