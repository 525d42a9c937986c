pub mod api;
pub mod core;
pub mod ease;
pub mod global;

// Re-export key types at crate root for convenience
pub use api::types::{Channel, Color, TweenId, TweenKind};
pub use api::value::TweenValue;
pub use api::target::Property;
pub use crate::core::config::{set_warnings_enabled, warnings_enabled, EaseSpec, Looping, TweenConfig};
pub use crate::core::error::{CurveError, TweenError};
pub use crate::core::interp::{lerp, lerp_vec4};
pub use crate::core::registry::{TweenRegistry, TweenSpawner};
pub use crate::core::tween::{Tween, INFINITE_LOOPS};
pub use ease::{EaseCurve, EasePreset, Keyframe, WeightedMode, DEFAULT_WEIGHT};
