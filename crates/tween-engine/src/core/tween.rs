// core/tween.rs
//
// A single animatable unit: endpoints, timing state, loop policy, and callbacks.
// Tweens are configured through chainable setters, then handed to a
// `TweenRegistry`, which owns every call to `step`.
//
// Usage:
//   let mut fade = Tween::value(1.0, 0.0, 0.5);
//   fade.set_ease(EasePreset::SineOut).on_update(|a: f32| set_alpha(a));
//   registry.add(fade);

use std::fmt;
use std::rc::Rc;

use glam::{Vec3, Vec4};

use crate::api::types::{Color, TweenId, TweenKind};
use crate::api::value::TweenValue;
use crate::core::config::{self, EaseSpec, Looping, TweenConfig};
use crate::core::error::TweenError;
use crate::core::interp::{lerp_vec4, progress};
use crate::ease::{EaseCurve, EasePreset};

/// Loop count that never runs out.
pub const INFINITE_LOOPS: i32 = i32::MAX;

/// Durations at or below this count as stopped.
const STOPPED_EPSILON: f32 = 0.00001;

type ApplyFn = Box<dyn FnMut(Vec4)>;
type UpdateFn = Box<dyn FnMut(Vec4)>;
type Callback = Box<dyn FnMut()>;

/// Outcome of advancing a tween by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Still counting down the start delay.
    Waiting,
    Running,
    /// A pass ended and the tween turned around.
    Looped,
    /// Stopped or zero-length: drop without completing.
    Discard,
    /// Last pass ended: drop and complete.
    Finished,
}

/// A single timed interpolation.
pub struct Tween {
    id: TweenId,
    kind: TweenKind,
    start: Vec4,
    end: Vec4,
    total_duration: f32,
    remaining: f32,
    delay: f32,
    loops_remaining: i32,
    ease: Option<Rc<EaseCurve>>,
    persist_across_reset: bool,
    started: bool,
    apply: Option<ApplyFn>,
    on_update: Option<UpdateFn>,
    on_complete: Option<Callback>,
    on_start: Option<Callback>,
    on_loop_end: Option<Callback>,
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("total_duration", &self.total_duration)
            .field("remaining", &self.remaining)
            .field("delay", &self.delay)
            .field("loops_remaining", &self.loops_remaining)
            .field("eased", &self.ease.is_some())
            .field("persist_across_reset", &self.persist_across_reset)
            .finish_non_exhaustive()
    }
}

impl Tween {
    /// Create a tween from raw endpoints. Negative durations are clamped to zero.
    pub fn new(kind: TweenKind, start: Vec4, end: Vec4, duration: f32) -> Self {
        let id = TweenId::next();
        if duration < 0.0 {
            config::warn(format_args!("{}: negative duration {} clamped to 0", id, duration));
        }
        let duration = duration.max(0.0);
        Self {
            id,
            kind,
            start,
            end,
            total_duration: duration,
            remaining: duration,
            delay: 0.0,
            loops_remaining: 0,
            ease: None,
            persist_across_reset: false,
            started: false,
            apply: None,
            on_update: None,
            on_complete: None,
            on_start: None,
            on_loop_end: None,
        }
    }

    /// Create a tween between two typed values; the kind follows the type.
    pub fn from_values<V: TweenValue>(from: V, to: V, duration: f32) -> Self {
        Self::new(V::KIND, from.into_raw(), to.into_raw(), duration)
    }

    /// Tween a single float.
    pub fn value(from: f32, to: f32, duration: f32) -> Self {
        Self::from_values(from, to, duration)
    }

    pub fn vector3(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self::from_values(from, to, duration)
    }

    pub fn color(from: Color, to: Color, duration: f32) -> Self {
        Self::from_values(from, to, duration)
    }

    pub fn vector4(from: Vec4, to: Vec4, duration: f32) -> Self {
        Self::from_values(from, to, duration)
    }

    /// A scalar tween with no motion, useful only for its timing and callbacks.
    pub fn timer(duration: f32) -> Self {
        Self::new(TweenKind::Scalar, Vec4::ZERO, Vec4::ZERO, duration)
    }

    /// Attach the function that writes each interpolated value into the target.
    pub fn with_apply(mut self, apply: impl FnMut(Vec4) + 'static) -> Self {
        self.apply = Some(Box::new(apply));
        self
    }

    // -- Accessors --

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn kind(&self) -> TweenKind {
        self.kind
    }

    /// Start of the current pass. Swaps with the end on every loop.
    pub fn start_value(&self) -> Vec4 {
        self.start
    }

    pub fn end_value(&self) -> Vec4 {
        self.end
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Time left in the current pass.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn loops_remaining(&self) -> i32 {
        self.loops_remaining
    }

    pub fn ease(&self) -> Option<&Rc<EaseCurve>> {
        self.ease.as_ref()
    }

    pub fn persists_across_reset(&self) -> bool {
        self.persist_across_reset
    }

    /// Raw interpolated value at the current point of the pass.
    pub fn current_value(&self) -> Vec4 {
        if self.total_duration == 0.0 {
            return self.end;
        }
        let t = progress(self.remaining, self.total_duration);
        let eased = match &self.ease {
            Some(curve) => curve.evaluate(t),
            None => t,
        };
        lerp_vec4(self.start, self.end, eased)
    }

    // -- Configuration --

    /// Use one of the built-in ease curves.
    pub fn set_ease(&mut self, preset: EasePreset) -> &mut Self {
        self.ease = Some(preset.shared());
        self
    }

    /// Use a custom curve, normalized to run from (0, 0) to (1, 1).
    ///
    /// A curve that cannot be normalized is logged and leaves the tween linear,
    /// replacing any ease set earlier.
    pub fn set_ease_curve(&mut self, curve: &EaseCurve) -> &mut Self {
        match curve.normalized() {
            Ok(normalized) => self.ease = Some(Rc::new(normalized)),
            Err(err) => {
                log::error!("{}: ease curve rejected: {}", self.id, err);
                self.ease = None;
            }
        }
        self
    }

    /// Share a curve with other tweens. Curves that are not normalized yet get a
    /// normalized private copy instead.
    pub fn set_shared_ease(&mut self, curve: Rc<EaseCurve>) -> &mut Self {
        if curve.is_normalized() {
            self.ease = Some(curve);
            self
        } else {
            self.set_ease_curve(&curve)
        }
    }

    /// Back to linear interpolation.
    pub fn clear_ease(&mut self) -> &mut Self {
        self.ease = None;
        self
    }

    /// Play `times` passes in total, reversing direction on every other pass.
    /// `1` plays once.
    pub fn set_looping(&mut self, times: i32) -> &mut Self {
        self.loops_remaining = times.saturating_sub(1);
        self
    }

    /// `true` loops forever. `false` plays exactly one extra, reversed pass,
    /// which is not the same as `set_looping(1)`.
    pub fn set_infinite_looping(&mut self, infinite: bool) -> &mut Self {
        self.loops_remaining = if infinite { INFINITE_LOOPS } else { 1 };
        self
    }

    /// Wait this many seconds before the first pass. Loops do not wait again.
    pub fn set_delay(&mut self, seconds: f32) -> &mut Self {
        self.delay = seconds;
        self
    }

    /// Keep running through `TweenRegistry::on_context_reset`.
    pub fn set_persist_across_reset(&mut self, persist: bool) -> &mut Self {
        self.persist_across_reset = persist;
        self
    }

    /// Called every running frame with the current value.
    ///
    /// `V` must match the tween's kind; a mismatched callback is dropped with a
    /// warning and the tween keeps whatever callback it had.
    pub fn on_update<V: TweenValue>(&mut self, callback: impl FnMut(V) + 'static) -> &mut Self {
        if let Err(err) = self.try_on_update(callback).map(|_| ()) {
            config::warn(format_args!("{}: {}", self.id, err));
        }
        self
    }

    /// Like [`Tween::on_update`], but reports a kind mismatch instead of logging it.
    pub fn try_on_update<V: TweenValue>(
        &mut self,
        mut callback: impl FnMut(V) + 'static,
    ) -> Result<&mut Self, TweenError> {
        if V::KIND != self.kind {
            return Err(TweenError::KindMismatch {
                expected: self.kind,
                found: V::KIND,
            });
        }
        self.on_update = Some(Box::new(move |raw| callback(V::from_raw(raw))));
        Ok(self)
    }

    /// Called once when the last pass ends. Not called for stopped tweens.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Called on the first frame after the start delay.
    pub fn on_start(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Called each time a pass ends and the tween turns around.
    pub fn on_loop_end(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on_loop_end = Some(Box::new(callback));
        self
    }

    /// Apply a whole configuration at once. Unset options are left alone.
    pub fn configure(&mut self, config: &TweenConfig) -> &mut Self {
        if let Some(delay) = config.delay {
            self.set_delay(delay);
        }
        if let Some(persist) = config.persist_across_reset {
            self.set_persist_across_reset(persist);
        }
        match config.looping {
            Some(Looping::Times(times)) => {
                self.set_looping(times);
            }
            Some(Looping::Infinite(infinite)) => {
                self.set_infinite_looping(infinite);
            }
            None => {}
        }
        match &config.ease {
            Some(EaseSpec::Preset(preset)) => {
                self.set_ease(*preset);
            }
            Some(EaseSpec::Curve(keys)) => {
                self.set_ease_curve(&EaseCurve::new(keys.clone()));
            }
            None => {}
        }
        self
    }

    /// Mark the tween for removal on the next registry pass. `on_complete` will not fire.
    pub fn stop(&mut self) {
        self.total_duration = 0.0;
    }

    /// True once the tween has been stopped (its duration is zero).
    ///
    /// The name reads backwards; the behavior is kept as is for compatibility.
    pub fn is_playing(&self) -> bool {
        self.total_duration <= STOPPED_EPSILON
    }

    // -- Scheduler hooks --

    /// Advance by one frame.
    pub(crate) fn step(&mut self, dt: f32) -> Step {
        if self.delay > 0.0 {
            self.delay -= dt;
            return Step::Waiting;
        }
        if self.total_duration == 0.0 {
            return Step::Discard;
        }

        if !self.started {
            self.started = true;
            if let Some(on_start) = self.on_start.as_mut() {
                on_start();
            }
        }

        let value = self.current_value();
        if let Some(apply) = self.apply.as_mut() {
            apply(value);
        }

        if self.remaining > 0.0 {
            self.remaining -= dt;
            let value = self.current_value();
            if let Some(on_update) = self.on_update.as_mut() {
                on_update(value);
            }
            Step::Running
        } else if self.loops_remaining > 0 {
            if self.loops_remaining != INFINITE_LOOPS {
                self.loops_remaining -= 1;
            }
            std::mem::swap(&mut self.start, &mut self.end);
            self.remaining = self.total_duration;
            log::trace!("{}: pass ended, {} loops left", self.id, self.loops_remaining);
            if let Some(on_loop_end) = self.on_loop_end.as_mut() {
                on_loop_end();
            }
            Step::Looped
        } else {
            Step::Finished
        }
    }

    /// Fire the completion callback. Called after the tween leaves the registry.
    pub(crate) fn complete(&mut self) {
        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete();
        }
    }
}
