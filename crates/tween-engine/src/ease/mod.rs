// ease/mod.rs
//
// Ease curves: keyframed progress remapping plus the built-in preset tables.

pub mod curve;
pub mod preset;

pub use curve::{EaseCurve, Keyframe, WeightedMode, DEFAULT_WEIGHT};
pub use preset::EasePreset;
