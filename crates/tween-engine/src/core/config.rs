use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::ease::{EasePreset, Keyframe};

static WARNINGS: AtomicBool = AtomicBool::new(true);

/// Turn the engine's warnings (dead targets, callback kind mismatches) on or off.
/// Curve errors are always logged.
pub fn set_warnings_enabled(enabled: bool) {
    WARNINGS.store(enabled, Ordering::Relaxed);
}

pub fn warnings_enabled() -> bool {
    WARNINGS.load(Ordering::Relaxed)
}

/// Log a warning unless warnings are switched off.
pub(crate) fn warn(args: fmt::Arguments<'_>) {
    if warnings_enabled() {
        log::warn!("{}", args);
    }
}

/// How many passes a tween plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Looping {
    /// Total number of passes; every other pass runs in reverse.
    Times(i32),
    /// `true` loops forever, `false` plays exactly one extra (reversed) pass.
    Infinite(bool),
}

/// Ease selection: a preset name or a custom keyframe list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EaseSpec {
    Preset(EasePreset),
    Curve(Vec<Keyframe>),
}

/// Everything a tween can be configured with besides its values and duration.
/// Options left as `None` keep whatever the tween already has.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TweenConfig {
    /// Seconds to wait before the first pass starts.
    #[serde(default)]
    pub delay: Option<f32>,
    #[serde(default)]
    pub looping: Option<Looping>,
    #[serde(default)]
    pub ease: Option<EaseSpec>,
    /// Keep running through a context reset.
    #[serde(default)]
    pub persist_across_reset: Option<bool>,
}

impl TweenConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
