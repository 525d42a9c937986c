//! Keyframed ease curves.
//!
//! A curve is a list of control points joined by cubic segments. Unweighted
//! segments are cubic Hermite splines; a segment whose left key weights its out
//! handle, or whose right key weights its in handle, becomes a cubic Bézier with
//! handle lengths taken from those weights.

use serde::{Deserialize, Serialize};

use crate::core::error::CurveError;

/// Handle length used on sides that carry no explicit weight.
/// At this length a Bézier segment is identical to the Hermite one.
pub const DEFAULT_WEIGHT: f32 = 1.0 / 3.0;

/// Which tangent handles of a key use their stored weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightedMode {
    #[default]
    None,
    In,
    Out,
    Both,
}

impl WeightedMode {
    fn weights_in(self) -> bool {
        matches!(self, WeightedMode::In | WeightedMode::Both)
    }

    fn weights_out(self) -> bool {
        matches!(self, WeightedMode::Out | WeightedMode::Both)
    }
}

/// One control point of an ease curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key.
    pub in_tangent: f32,
    /// Slope leaving this key.
    pub out_tangent: f32,
    #[serde(default)]
    pub in_weight: f32,
    #[serde(default)]
    pub out_weight: f32,
    #[serde(default)]
    pub weighted_mode: WeightedMode,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self::weighted(time, value, in_tangent, out_tangent, 0.0, 0.0)
    }

    /// Key with stored handle weights. The weights only take effect once a
    /// weighted mode is set with [`Keyframe::with_mode`].
    pub const fn weighted(
        time: f32,
        value: f32,
        in_tangent: f32,
        out_tangent: f32,
        in_weight: f32,
        out_weight: f32,
    ) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
            in_weight,
            out_weight,
            weighted_mode: WeightedMode::None,
        }
    }

    pub const fn with_mode(mut self, mode: WeightedMode) -> Self {
        self.weighted_mode = mode;
        self
    }

    fn out_handle(&self) -> f32 {
        if self.weighted_mode.weights_out() {
            self.out_weight
        } else {
            DEFAULT_WEIGHT
        }
    }

    fn in_handle(&self) -> f32 {
        if self.weighted_mode.weights_in() {
            self.in_weight
        } else {
            DEFAULT_WEIGHT
        }
    }
}

/// A progress-remapping curve.
///
/// Once installed on a tween a curve is normalized and never mutated again, so
/// it can be shared between tweens behind an `Rc`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct EaseCurve {
    keys: Vec<Keyframe>,
}

impl From<Vec<Keyframe>> for EaseCurve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<EaseCurve> for Vec<Keyframe> {
    fn from(curve: EaseCurve) -> Self {
        curve.keys
    }
}

impl EaseCurve {
    /// Build a curve from keys in any order. Keys are sorted by time.
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Straight line from (0, 0) to (1, 1).
    pub fn linear() -> Self {
        Self::new(vec![Keyframe::new(0.0, 0.0, 1.0, 1.0), Keyframe::new(1.0, 1.0, 1.0, 1.0)])
    }

    /// Parse a keyframe array from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether the curve already starts at (0, 0) and ends at (1, 1).
    pub fn is_normalized(&self) -> bool {
        match self.keys.as_slice() {
            [first, .., last] => {
                first.time == 0.0 && first.value == 0.0 && last.time == 1.0 && last.value == 1.0
            }
            _ => false,
        }
    }

    /// Copy of this curve remapped so the first key sits at (0, 0) and the last at (1, 1).
    ///
    /// Tangents are divided by the value range only; weights and weighted modes
    /// carry over untouched.
    pub fn normalized(&self) -> Result<EaseCurve, CurveError> {
        let (first, last) = match self.keys.as_slice() {
            [first, .., last] => (*first, *last),
            keys => return Err(CurveError::TooFewKeys { count: keys.len() }),
        };

        let value_range = last.value - first.value;
        if value_range == 0.0 {
            return Err(CurveError::FlatRange);
        }
        let time_range = last.time - first.time;
        if time_range == 0.0 {
            return Err(CurveError::FlatDomain);
        }

        let keys = self
            .keys
            .iter()
            .map(|k| Keyframe {
                time: (k.time - first.time) / time_range,
                value: (k.value - first.value) / value_range,
                in_tangent: k.in_tangent / value_range,
                out_tangent: k.out_tangent / value_range,
                ..*k
            })
            .collect();

        Ok(EaseCurve { keys })
    }

    /// Evaluate the curve at `t`.
    ///
    /// Inputs before the first key or after the last continue the edge
    /// segment's Hermite polynomial rather than clamping.
    pub fn evaluate(&self, t: f32) -> f32 {
        let keys = self.keys.as_slice();
        let n = keys.len();
        match n {
            0 => 0.0,
            1 => keys[0].value,
            _ => {
                if t < keys[0].time {
                    return extrapolate(&keys[0], &keys[1], t);
                }
                if t > keys[n - 1].time {
                    return extrapolate(&keys[n - 2], &keys[n - 1], t);
                }
                let i = keys.partition_point(|k| k.time <= t).saturating_sub(1).min(n - 2);
                segment(&keys[i], &keys[i + 1], t)
            }
        }
    }
}

fn segment(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
    let dt = k1.time - k0.time;
    if dt <= 0.0 {
        return k1.value;
    }

    // Infinite tangents mark a stepped segment.
    if !k0.out_tangent.is_finite() || !k1.in_tangent.is_finite() {
        return if t >= k1.time { k1.value } else { k0.value };
    }

    let s = (t - k0.time) / dt;
    let m0 = k0.out_tangent * dt;
    let m1 = k1.in_tangent * dt;

    if k0.weighted_mode.weights_out() || k1.weighted_mode.weights_in() {
        bezier(s, k0.value, k1.value, m0, m1, k0.out_handle(), k1.in_handle())
    } else {
        hermite(s, k0.value, k1.value, m0, m1)
    }
}

fn extrapolate(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
    let dt = k1.time - k0.time;
    if dt <= 0.0 || !k0.out_tangent.is_finite() || !k1.in_tangent.is_finite() {
        return if t < k0.time { k0.value } else { k1.value };
    }
    let s = (t - k0.time) / dt;
    hermite(s, k0.value, k1.value, k0.out_tangent * dt, k1.in_tangent * dt)
}

/// Cubic Hermite with tangents already scaled to the segment width.
#[inline]
fn hermite(s: f32, p0: f32, p1: f32, m0: f32, m1: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    (2.0 * s3 - 3.0 * s2 + 1.0) * p0
        + (s3 - 2.0 * s2 + s) * m0
        + (-2.0 * s3 + 3.0 * s2) * p1
        + (s3 - s2) * m1
}

/// Weighted segment as a cubic Bézier. Handles extend `w0` and `w1` of the
/// segment width along the tangents.
///
/// Computes in f64 internally; the time axis is solved for the curve parameter first.
fn bezier(s: f32, p0: f32, p1: f32, m0: f32, m1: f32, w0: f32, w1: f32) -> f32 {
    let x1 = w0 as f64;
    let x2 = 1.0 - w1 as f64;
    let u = solve_param(s as f64, x1, x2);

    let y0 = p0 as f64;
    let y1 = (p0 + w0 * m0) as f64;
    let y2 = (p1 - w1 * m1) as f64;
    let y3 = p1 as f64;
    let v = 1.0 - u;
    (v * v * v * y0 + 3.0 * v * v * u * y1 + 3.0 * v * u * u * y2 + u * u * u * y3) as f32
}

/// Find `u` with `x(u) == s` on a Bézier whose x controls are (0, x1, x2, 1).
///
/// Newton-Raphson first, bisection when the slope flattens or the step leaves [0, 1].
fn solve_param(s: f64, x1: f64, x2: f64) -> f64 {
    if s <= 0.0 {
        return 0.0;
    }
    if s >= 1.0 {
        return 1.0;
    }

    let mut u = s;
    for _ in 0..8 {
        let err = bezier_sample(u, x1, x2) - s;
        if err.abs() < 1e-7 {
            return u;
        }
        let slope = bezier_slope(u, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        u -= err / slope;
        if !(0.0..=1.0).contains(&u) {
            break;
        }
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    u = s;
    for _ in 0..40 {
        let x = bezier_sample(u, x1, x2);
        if (x - s).abs() < 1e-7 {
            break;
        }
        if x < s {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) * 0.5;
    }
    u
}

/// B(u) = 3(1-u)²u·p1 + 3(1-u)u²·p2 + u³, with endpoints 0 and 1.
#[inline]
fn bezier_sample(u: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * u + b) * u + c) * u
}

#[inline]
fn bezier_slope(u: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * u + 2.0 * b) * u + c
}
