//! Conversions between semantic tween values and the raw `Vec4` every tween stores.

use glam::{Vec3, Vec4};

use crate::api::types::{Color, TweenKind};

/// A value type a tween can animate.
///
/// The raw representation is what the scheduler interpolates; `from_raw` is
/// applied right before the value reaches a callback or a target.
pub trait TweenValue: Copy + 'static {
    /// The tween kind this type belongs to.
    const KIND: TweenKind;

    fn into_raw(self) -> Vec4;

    fn from_raw(raw: Vec4) -> Self;
}

impl TweenValue for f32 {
    const KIND: TweenKind = TweenKind::Scalar;

    fn into_raw(self) -> Vec4 {
        Vec4::new(self, 0.0, 0.0, 0.0)
    }

    fn from_raw(raw: Vec4) -> Self {
        raw.x
    }
}

impl TweenValue for Vec3 {
    const KIND: TweenKind = TweenKind::Vector3;

    fn into_raw(self) -> Vec4 {
        self.extend(0.0)
    }

    fn from_raw(raw: Vec4) -> Self {
        raw.truncate()
    }
}

impl TweenValue for Color {
    const KIND: TweenKind = TweenKind::Color;

    fn into_raw(self) -> Vec4 {
        Vec4::from_array(bytemuck::cast(self))
    }

    fn from_raw(raw: Vec4) -> Self {
        bytemuck::cast(raw.to_array())
    }
}

impl TweenValue for Vec4 {
    const KIND: TweenKind = TweenKind::Vector4;

    fn into_raw(self) -> Vec4 {
        self
    }

    fn from_raw(raw: Vec4) -> Self {
        raw
    }
}
