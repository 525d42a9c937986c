// ease/preset.rs
//
// Built-in ease curves as fixed control-point tables.
// The constants are part of the observable behavior: keep them exact.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::curve::{EaseCurve, Keyframe, WeightedMode};

/// Named ease curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EasePreset {
    SineIn,
    SineOut,
    SineInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    ExpIn,
    ExpOut,
    ExpInOut,
    /// Pulls back below zero before heading to the end.
    BackIn,
    /// Overshoots past the end, then settles.
    BackOut,
    BackInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl EasePreset {
    pub const ALL: [EasePreset; 18] = [
        EasePreset::SineIn,
        EasePreset::SineOut,
        EasePreset::SineInOut,
        EasePreset::CubicIn,
        EasePreset::CubicOut,
        EasePreset::CubicInOut,
        EasePreset::ExpIn,
        EasePreset::ExpOut,
        EasePreset::ExpInOut,
        EasePreset::BackIn,
        EasePreset::BackOut,
        EasePreset::BackInOut,
        EasePreset::ElasticIn,
        EasePreset::ElasticOut,
        EasePreset::ElasticInOut,
        EasePreset::BounceIn,
        EasePreset::BounceOut,
        EasePreset::BounceInOut,
    ];

    /// Control points for this preset.
    pub fn keys(self) -> &'static [Keyframe] {
        match self {
            EasePreset::SineIn => SINE_IN,
            EasePreset::SineOut => SINE_OUT,
            EasePreset::SineInOut => SINE_IN_OUT,
            EasePreset::CubicIn => CUBIC_IN,
            EasePreset::CubicOut => CUBIC_OUT,
            EasePreset::CubicInOut => CUBIC_IN_OUT,
            EasePreset::ExpIn => EXP_IN,
            EasePreset::ExpOut => EXP_OUT,
            EasePreset::ExpInOut => EXP_IN_OUT,
            EasePreset::BackIn => BACK_IN,
            EasePreset::BackOut => BACK_OUT,
            EasePreset::BackInOut => BACK_IN_OUT,
            EasePreset::ElasticIn => ELASTIC_IN,
            EasePreset::ElasticOut => ELASTIC_OUT,
            EasePreset::ElasticInOut => ELASTIC_IN_OUT,
            EasePreset::BounceIn => BOUNCE_IN,
            EasePreset::BounceOut => BOUNCE_OUT,
            EasePreset::BounceInOut => BOUNCE_IN_OUT,
        }
    }

    /// Build the curve. Presets are already normalized.
    pub fn curve(self) -> EaseCurve {
        EaseCurve::new(self.keys().to_vec())
    }

    /// Shared, per-thread instance of the preset curve.
    pub fn shared(self) -> Rc<EaseCurve> {
        thread_local! {
            static CACHE: RefCell<HashMap<EasePreset, Rc<EaseCurve>>> = RefCell::new(HashMap::new());
        }
        CACHE.with(|cache| {
            cache
                .borrow_mut()
                .entry(self)
                .or_insert_with(|| Rc::new(self.curve()))
                .clone()
        })
    }

    /// Shorthand for evaluating the preset once.
    pub fn apply(self, t: f32) -> f32 {
        self.shared().evaluate(t)
    }
}

const fn key(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Keyframe {
    Keyframe::new(time, value, in_tangent, out_tangent)
}

/// Key with weights that are stored but not active.
const fn key_w(t: f32, v: f32, i: f32, o: f32, iw: f32, ow: f32) -> Keyframe {
    Keyframe::weighted(t, v, i, o, iw, ow)
}

/// Key with both handle weights active.
const fn key_wb(t: f32, v: f32, i: f32, o: f32, iw: f32, ow: f32) -> Keyframe {
    Keyframe::weighted(t, v, i, o, iw, ow).with_mode(WeightedMode::Both)
}

// ── Sine ────────────────────────────────────────────────────────────────

const SINE_IN: &[Keyframe] = &[key(0.0, 0.0, 0.0, 0.0), key(1.0, 1.0, 1.45, 0.0)];
const SINE_OUT: &[Keyframe] = &[key(0.0, 0.0, 0.0, 1.62), key(1.0, 1.0, 0.0, 0.0)];
const SINE_IN_OUT: &[Keyframe] = &[key(0.0, 0.0, 0.0, 0.0), key(1.0, 1.0, 0.0, 0.0)];

// ── Cubic ───────────────────────────────────────────────────────────────

const CUBIC_IN: &[Keyframe] = &[key(0.0, 0.0, 0.0, 3.35), key(1.0, 1.0, 0.0, 0.0)];
const CUBIC_OUT: &[Keyframe] = &[key(0.0, 0.0, 0.0, 0.0), key(1.0, 1.0, 3.35, 0.0)];
const CUBIC_IN_OUT: &[Keyframe] = &[
    key(0.0, 0.0, 0.0, 0.0),
    key(0.5, 0.5, 3.23, 3.23),
    key(1.0, 1.0, 0.0, 0.0),
];

// ── Exponential ─────────────────────────────────────────────────────────

const EXP_IN: &[Keyframe] = &[
    key(0.0, 0.0, 0.0, 0.0),
    key(0.6, 0.025, 0.169, 0.169),
    key(1.0, 1.0, 7.41, 0.0),
];
const EXP_OUT: &[Keyframe] = &[
    key(0.0, 0.0, 0.0, 6.87),
    key(0.4, 0.962, 0.245, 0.245),
    key(1.0, 1.0, 0.0, 0.0),
];
const EXP_IN_OUT: &[Keyframe] = &[
    key_wb(0.0, 0.0, 0.0, 0.33, 0.0, 0.075),
    key_w(0.42, 0.13, 1.16, 1.16, 0.16, 0.0),
    key(0.5, 0.5, 11.62, 11.62),
    key_w(0.58, 0.87, 1.16, 1.16, 0.0, 0.16),
    key_wb(1.0, 1.0, 0.33, 0.0, 0.075, 0.0),
];

// ── Back ────────────────────────────────────────────────────────────────

const BACK_IN: &[Keyframe] = &[key(0.0, 0.0, 0.0, 0.0), key(1.0, 1.0, 4.5, 0.0)];
const BACK_OUT: &[Keyframe] = &[key(0.0, 0.0, 0.0, 4.5), key(1.0, 1.0, 0.0, 0.0)];
const BACK_IN_OUT: &[Keyframe] = &[
    key(0.0, 0.0, 0.0, 0.0),
    key(0.5, 0.5, 5.7, 5.7),
    key(1.0, 1.0, 0.0, 0.0),
];

// ── Elastic ─────────────────────────────────────────────────────────────

const ELASTIC_IN: &[Keyframe] = &[
    key_wb(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
    key_wb(0.4, 0.0, 1.25, 1.25, 0.11, 0.55),
    key_wb(0.55, 0.0, -1.47, -1.47, 0.06, 0.34),
    key_wb(0.7, 0.0, 3.56, 3.56, 0.2, 0.52),
    key_wb(1.0, 1.0, 16.0, 16.0, 0.515, 0.0),
];
const ELASTIC_OUT: &[Keyframe] = &[
    key_wb(0.0, 0.0, 16.0, 16.0, 0.0, 0.515),
    key_wb(0.3, 1.0, 3.56, 3.56, 0.52, 0.2),
    key_wb(0.45, 1.0, -1.47, -1.47, 0.34, 0.06),
    key_wb(0.6, 1.0, 1.25, 1.25, 0.55, 0.11),
    key_wb(1.0, 1.0, 0.0, 0.0, 1.0, 0.0),
];
const ELASTIC_IN_OUT: &[Keyframe] = &[
    key_wb(0.0, 0.0, 0.0, 0.0, 0.0, 1.0),
    key_wb(0.35, 0.0, -1.95, -1.95, 0.18, 0.3),
    key_wb(0.5, 0.5, 12.9, 12.9, 0.36, 0.333),
    key_wb(0.65, 1.0, -1.95, -1.95, 0.44, 0.18),
    key_wb(1.0, 1.0, 0.0, 0.0, 0.77, 0.0),
];

// ── Bounce ──────────────────────────────────────────────────────────────

const BOUNCE_OUT: &[Keyframe] = &[
    key_w(0.0, 0.0, 0.0, 0.62, 0.0, 0.9),
    key_w(0.1, 0.0, -0.5, 1.0, 0.63, 0.3),
    key_w(0.3, 0.0, -0.88, 2.5, 0.36, 0.17),
    key_w(0.6, 0.0, -2.6, 5.7, 0.16, 0.06),
    key_w(1.0, 1.0, 0.0, 0.0, 0.3, 0.0),
];
const BOUNCE_IN: &[Keyframe] = &[
    key_w(0.0, 0.0, 0.0, 0.0, 0.0, 0.3),
    key_w(0.4, 1.0, 5.73, -2.6, 0.06, 0.16),
    key_w(0.7, 1.0, 2.5, -0.88, 0.17, 0.36),
    key_w(0.9, 1.0, 0.97, -0.51, 0.29, 0.63),
    key_w(1.0, 1.0, 0.62, 0.0, 0.9, 0.0),
];
const BOUNCE_IN_OUT: &[Keyframe] = &[
    key_w(0.0, 0.0, 0.0, 0.62, 0.0, 0.9),
    key_w(0.05, 0.0, -0.5, 1.0, 0.63, 0.3),
    key_w(0.15, 0.0, -0.88, 2.5, 0.36, 0.17),
    key_w(0.3, 0.0, -2.6, 5.7, 0.16, 0.06),
    key_w(0.5, 0.5, 0.0, 0.0, 0.3, 0.0),
    key_w(0.7, 1.0, 5.73, -2.6, 0.06, 0.16),
    key_w(0.85, 1.0, 2.5, -0.88, 0.17, 0.36),
    key_w(0.95, 1.0, 0.97, -0.51, 0.29, 0.63),
    key_w(1.0, 1.0, 0.62, 0.0, 0.9, 0.0),
];
