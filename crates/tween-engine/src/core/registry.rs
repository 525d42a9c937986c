// core/registry.rs
//
// Tween scheduler. Owns every live tween and advances them once per host frame.
//
// Usage:
//   let mut tweens = TweenRegistry::new();
//   tweens.value(0.0, 1.0, 0.5).set_ease(EasePreset::CubicOut);
//   tweens.advance(dt);  // once per frame
//
// Callbacks run while the registry is mutably borrowed, so they cannot add
// tweens directly. They capture a `TweenSpawner` instead; anything queued through
// it joins the registry at the end of the current `advance` and first moves on the
// next one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Vec3, Vec4};

use crate::api::target::Property;
use crate::api::types::{Channel, Color, TweenId, TweenKind};
use crate::api::value::TweenValue;
use crate::core::config;
use crate::core::error::TweenError;
use crate::core::tween::{Step, Tween};

#[derive(Debug, Default)]
struct Pending {
    added: RefCell<Vec<Tween>>,
    stopped: RefCell<Vec<TweenId>>,
}

/// Deferred handle onto a registry, safe to use from inside tween callbacks.
#[derive(Debug, Clone, Default)]
pub struct TweenSpawner {
    pending: Rc<Pending>,
}

impl TweenSpawner {
    /// Queue a tween. It is registered when the current frame ends.
    pub fn add(&self, tween: Tween) -> TweenId {
        let id = tween.id();
        self.pending.added.borrow_mut().push(tween);
        id
    }

    /// Queue a stop for a live or queued tween.
    pub fn stop(&self, id: TweenId) {
        self.pending.stopped.borrow_mut().push(id);
    }

    /// Number of tweens waiting to be registered.
    pub fn queued(&self) -> usize {
        self.pending.added.borrow().len()
    }
}

/// Owns and advances all active tweens.
#[derive(Debug, Default)]
pub struct TweenRegistry {
    /// Kept in registration order; advanced newest first.
    tweens: Vec<Tween>,
    spawner: TweenSpawner,
}

impl TweenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for registering tweens from inside callbacks.
    pub fn spawner(&self) -> TweenSpawner {
        self.spawner.clone()
    }

    /// Register a tween. It is first advanced on the next `advance` call.
    pub fn add(&mut self, tween: Tween) -> TweenId {
        let id = tween.id();
        self.tweens.push(tween);
        id
    }

    fn push(&mut self, tween: Tween) -> &mut Tween {
        let index = self.tweens.len();
        self.tweens.push(tween);
        &mut self.tweens[index]
    }

    // -- Factories --

    /// Register a tween that hands each raw value to `apply`.
    pub fn tween(
        &mut self,
        apply: impl FnMut(Vec4) + 'static,
        from: Vec4,
        to: Vec4,
        duration: f32,
        kind: TweenKind,
    ) -> &mut Tween {
        self.push(Tween::new(kind, from, to, duration).with_apply(apply))
    }

    pub fn value(&mut self, from: f32, to: f32, duration: f32) -> &mut Tween {
        self.push(Tween::value(from, to, duration))
    }

    pub fn vector3(&mut self, from: Vec3, to: Vec3, duration: f32) -> &mut Tween {
        self.push(Tween::vector3(from, to, duration))
    }

    pub fn color(&mut self, from: Color, to: Color, duration: f32) -> &mut Tween {
        self.push(Tween::color(from, to, duration))
    }

    pub fn vector4(&mut self, from: Vec4, to: Vec4, duration: f32) -> &mut Tween {
        self.push(Tween::vector4(from, to, duration))
    }

    /// A tween that only counts time. Pair it with `on_complete`.
    pub fn timer(&mut self, duration: f32) -> &mut Tween {
        self.push(Tween::timer(duration))
    }

    /// Animate a property of `target` from its current value to `to`.
    ///
    /// Returns `None` (with a warning) when the target has already been dropped
    /// or is borrowed elsewhere.
    pub fn animate<T: 'static, V: TweenValue>(
        &mut self,
        target: &Weak<RefCell<T>>,
        property: Property<T, V>,
        to: V,
        duration: f32,
    ) -> Option<&mut Tween> {
        let from = Self::read_target(target, &property)?;
        Some(self.push_bound(target, property, from, to.into_raw(), duration))
    }

    /// Animate one component of a property, leaving the others at their
    /// current values.
    pub fn animate_channel<T: 'static, V: TweenValue>(
        &mut self,
        target: &Weak<RefCell<T>>,
        property: Property<T, V>,
        channel: Channel,
        to: f32,
        duration: f32,
    ) -> Option<&mut Tween> {
        let from = Self::read_target(target, &property)?;
        let mut end = from;
        end[channel.index()] = to;
        Some(self.push_bound(target, property, from, end, duration))
    }

    fn read_target<T: 'static, V: TweenValue>(
        target: &Weak<RefCell<T>>,
        property: &Property<T, V>,
    ) -> Option<Vec4> {
        let value = property.read_weak(target);
        if value.is_none() {
            config::warn(format_args!("{} ({:?}): {}", property.name(), V::KIND, TweenError::DeadTarget));
        }
        value
    }

    fn push_bound<T: 'static, V: TweenValue>(
        &mut self,
        target: &Weak<RefCell<T>>,
        property: Property<T, V>,
        from: Vec4,
        to: Vec4,
        duration: f32,
    ) -> &mut Tween {
        let tween = Tween::new(V::KIND, from, to, duration)
            .with_apply(property.applier(target.clone()));
        self.push(tween)
    }

    // -- Control --

    /// Stop a tween. It is dropped on the next `advance` without completing.
    /// Returns false if no live tween has this id.
    pub fn stop(&mut self, id: TweenId) -> bool {
        match self.get_mut(id) {
            Some(tween) => {
                tween.stop();
                true
            }
            None => false,
        }
    }

    /// Take a tween out of the registry immediately. No callbacks fire.
    pub fn remove(&mut self, id: TweenId) -> Option<Tween> {
        let index = self.tweens.iter().position(|t| t.id() == id)?;
        Some(self.tweens.remove(index))
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.iter_mut().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.get(id).is_some()
    }

    /// [`Tween::is_playing`] for a live tween, `None` once it has been removed.
    pub fn is_playing(&self, id: TweenId) -> Option<bool> {
        self.get(id).map(Tween::is_playing)
    }

    /// Number of live tweens, not counting queued ones.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Drop every tween, queued ones included. No callbacks fire.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.spawner.pending.added.borrow_mut().clear();
        self.spawner.pending.stopped.borrow_mut().clear();
    }

    /// Drop every tween that does not persist across a context reset.
    /// Survivors keep their progress.
    pub fn on_context_reset(&mut self) {
        let before = self.tweens.len();
        self.tweens.retain(Tween::persists_across_reset);
        self.spawner
            .pending
            .added
            .borrow_mut()
            .retain(Tween::persists_across_reset);
        log::debug!(
            "context reset: dropped {} tweens, {} kept",
            before - self.tweens.len(),
            self.tweens.len()
        );
    }

    // -- Frame --

    /// Advance every tween by `dt` seconds.
    /// Returns the number of tweens that completed this frame.
    pub fn advance(&mut self, dt: f32) -> usize {
        self.flush_pending();

        let mut completed = 0;
        let mut index = self.tweens.len();
        while index > 0 {
            index -= 1;
            match self.tweens[index].step(dt) {
                Step::Discard => {
                    let tween = self.tweens.remove(index);
                    log::trace!("{}: discarded", tween.id());
                }
                Step::Finished => {
                    let mut tween = self.tweens.remove(index);
                    log::debug!("{}: completed", tween.id());
                    tween.complete();
                    completed += 1;
                }
                Step::Waiting | Step::Running | Step::Looped => {}
            }
        }

        self.flush_pending();
        completed
    }

    fn flush_pending(&mut self) {
        let added: Vec<Tween> = self.spawner.pending.added.borrow_mut().drain(..).collect();
        self.tweens.extend(added);

        let stopped: Vec<TweenId> = self.spawner.pending.stopped.borrow_mut().drain(..).collect();
        for id in stopped {
            self.stop(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::{EaseCurve, EasePreset, Keyframe};
    use std::cell::Cell;

    fn recorder(registry: &mut TweenRegistry, from: f32, to: f32, duration: f32) -> (TweenId, Rc<Cell<f32>>) {
        let out = Rc::new(Cell::new(f32::NAN));
        let o = out.clone();
        let id = registry
            .tween(
                move |v| o.set(v.x),
                Vec4::splat(from),
                Vec4::splat(to),
                duration,
                TweenKind::Scalar,
            )
            .id();
        (id, out)
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn full_duration_reaches_end_and_completes_once() {
        let mut tweens = TweenRegistry::new();
        let (id, out) = recorder(&mut tweens, 2.0, 10.0, 1.0);
        let (done, on_done) = counter();
        tweens.get_mut(id).unwrap().on_complete(on_done);

        tweens.advance(0.5);
        assert_eq!(out.get(), 2.0);
        tweens.advance(0.5);
        assert!((out.get() - 6.0).abs() < 0.001);
        assert_eq!(done.get(), 0);

        // the full duration has elapsed; the next pass settles on the end value
        assert_eq!(tweens.advance(0.0), 1);
        assert_eq!(out.get(), 10.0);
        assert!(tweens.is_empty());
        assert_eq!(done.get(), 1);

        tweens.advance(0.5);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn update_sees_linear_values() {
        let mut tweens = TweenRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        tweens
            .value(-4.0, 4.0, 1.0)
            .on_update(move |v: f32| s.borrow_mut().push(v));

        for _ in 0..4 {
            tweens.advance(0.25);
        }
        let seen = seen.borrow();
        let expected = [-2.0, 0.0, 2.0, 4.0];
        assert_eq!(seen.len(), expected.len());
        for (got, want) in seen.iter().zip(expected) {
            assert!((got - want).abs() < 0.001, "got {got}, want {want}");
        }
    }

    #[test]
    fn looping_twice_reverses_once() {
        let mut tweens = TweenRegistry::new();
        let (id, out) = recorder(&mut tweens, 0.0, 10.0, 1.0);
        let (loops, on_loop) = counter();
        let (done, on_done) = counter();
        tweens
            .get_mut(id)
            .unwrap()
            .set_looping(2)
            .on_loop_end(on_loop)
            .on_complete(on_done);

        let mut applied = Vec::new();
        for _ in 0..6 {
            tweens.advance(0.5);
            applied.push(out.get());
        }
        assert_eq!(applied, vec![0.0, 5.0, 10.0, 10.0, 5.0, 0.0]);
        assert_eq!(loops.get(), 1);
        assert_eq!(done.get(), 1);
        assert!(!tweens.contains(id));
    }

    #[test]
    fn infinite_looping_never_finishes() {
        let mut tweens = TweenRegistry::new();
        let (loops, on_loop) = counter();
        let (done, on_done) = counter();
        let id = tweens
            .value(0.0, 1.0, 1.0)
            .set_infinite_looping(true)
            .on_loop_end(on_loop)
            .on_complete(on_done)
            .id();

        for _ in 0..200 {
            tweens.advance(0.25);
        }
        assert!(tweens.contains(id));
        assert_eq!(done.get(), 0);
        assert_eq!(loops.get(), 40);
        assert_eq!(tweens.get(id).unwrap().loops_remaining(), i32::MAX);
    }

    #[test]
    fn finite_looping_flag_plays_two_passes() {
        let mut tweens = TweenRegistry::new();
        let (done, on_done) = counter();
        let id = tweens
            .value(0.0, 1.0, 1.0)
            .set_infinite_looping(false)
            .on_complete(on_done)
            .id();

        for _ in 0..5 {
            tweens.advance(0.5);
        }
        assert!(tweens.contains(id));
        tweens.advance(0.5);
        assert!(!tweens.contains(id));
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn delay_holds_back_updates() {
        let mut tweens = TweenRegistry::new();
        let (id, out) = recorder(&mut tweens, 0.0, 1.0, 1.0);
        let updates = Rc::new(Cell::new(0u32));
        let u = updates.clone();
        tweens
            .get_mut(id)
            .unwrap()
            .set_delay(1.0)
            .on_update(move |_: f32| u.set(u.get() + 1));

        for _ in 0..4 {
            tweens.advance(0.25);
        }
        assert!(out.get().is_nan());
        assert_eq!(updates.get(), 0);

        tweens.advance(0.25);
        assert_eq!(out.get(), 0.0);
        assert_eq!(updates.get(), 1);

        // from here on it runs exactly like a fresh 1s tween
        for _ in 0..3 {
            tweens.advance(0.25);
        }
        assert!(tweens.contains(id));
        tweens.advance(0.25);
        assert_eq!(out.get(), 1.0);
        assert!(!tweens.contains(id));
    }

    #[test]
    fn delay_is_not_repeated_on_loop() {
        let mut tweens = TweenRegistry::new();
        let id = tweens.timer(0.5).set_delay(0.5).set_looping(2).id();
        // 2 delay frames, 2 per pass, 1 turnaround, 1 finishing frame
        for _ in 0..7 {
            tweens.advance(0.25);
        }
        assert!(tweens.contains(id));
        tweens.advance(0.25);
        assert!(!tweens.contains(id));
    }

    #[test]
    fn context_reset_keeps_persistent_tweens() {
        let mut tweens = TweenRegistry::new();
        let keep = tweens.value(0.0, 1.0, 1.0).set_persist_across_reset(true).id();
        let drop_a = tweens.value(0.0, 1.0, 1.0).id();
        let drop_b = tweens.timer(2.0).id();

        tweens.advance(0.25);
        tweens.on_context_reset();

        assert_eq!(tweens.len(), 1);
        assert!(tweens.contains(keep));
        assert!(!tweens.contains(drop_a));
        assert!(!tweens.contains(drop_b));
        assert_eq!(tweens.get(keep).unwrap().remaining(), 0.75);

        tweens.advance(0.25);
        assert_eq!(tweens.get(keep).unwrap().remaining(), 0.5);
    }

    #[test]
    fn stopped_tween_is_removed_without_completing() {
        let mut tweens = TweenRegistry::new();
        let (done, on_done) = counter();
        let id = tweens.value(0.0, 1.0, 1.0).on_complete(on_done).id();

        tweens.advance(0.25);
        assert!(tweens.stop(id));
        assert_eq!(tweens.is_playing(id), Some(true));

        assert_eq!(tweens.advance(0.25), 0);
        assert_eq!(tweens.is_playing(id), None);
        assert_eq!(done.get(), 0);
        assert!(!tweens.stop(id));
    }

    #[test]
    fn zero_duration_is_removed_silently() {
        let mut tweens = TweenRegistry::new();
        let (done, on_done) = counter();
        tweens.value(0.0, 1.0, 0.0).on_complete(on_done);
        tweens.advance(0.1);
        assert!(tweens.is_empty());
        assert_eq!(done.get(), 0);
    }

    #[test]
    fn newest_tweens_advance_first() {
        let mut tweens = TweenRegistry::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let o = order.clone();
            tweens.value(0.0, 1.0, 1.0).on_update(move |_: f32| o.borrow_mut().push(name));
        }
        tweens.advance(0.25);
        assert_eq!(*order.borrow(), vec!["c", "b", "a"]);
    }

    #[test]
    fn removal_keeps_registration_order() {
        let mut tweens = TweenRegistry::new();
        let a = tweens.timer(1.0).id();
        let b = tweens.timer(1.0).id();
        let c = tweens.timer(1.0).id();
        assert!(tweens.remove(b).is_some());
        let ids: Vec<TweenId> = tweens.tweens.iter().map(Tween::id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn spawned_tweens_start_next_frame() {
        let mut tweens = TweenRegistry::new();
        let spawner = tweens.spawner();
        let spawned = Rc::new(Cell::new(None));
        let s = spawned.clone();
        tweens.timer(0.25).on_complete(move || {
            s.set(Some(spawner.add(Tween::value(0.0, 1.0, 1.0))));
        });

        tweens.advance(0.25);
        assert!(spawned.get().is_none());
        tweens.advance(0.0);

        let id = spawned.get().unwrap();
        let tween = tweens.get(id).unwrap();
        assert_eq!(tween.remaining(), 1.0);

        tweens.advance(0.25);
        assert_eq!(tweens.get(id).unwrap().remaining(), 0.75);
    }

    #[test]
    fn spawner_stop_applies_after_frame() {
        let mut tweens = TweenRegistry::new();
        let target = tweens.value(0.0, 1.0, 1.0).id();
        let spawner = tweens.spawner();
        tweens.timer(0.25).on_complete(move || spawner.stop(target));

        tweens.advance(0.25);
        tweens.advance(0.0);
        assert_eq!(tweens.is_playing(target), Some(true));
        tweens.advance(0.25);
        assert!(!tweens.contains(target));
    }

    #[test]
    fn reset_drops_queued_tweens() {
        let mut tweens = TweenRegistry::new();
        let spawner = tweens.spawner();
        let mut persistent = Tween::timer(1.0);
        persistent.set_persist_across_reset(true);
        let keep = spawner.add(persistent);
        spawner.add(Tween::timer(1.0));
        assert_eq!(spawner.queued(), 2);

        tweens.on_context_reset();
        tweens.advance(0.0);
        assert_eq!(tweens.len(), 1);
        assert!(tweens.contains(keep));
    }

    #[test]
    fn start_and_loop_callbacks() {
        let mut tweens = TweenRegistry::new();
        let (starts, on_start) = counter();
        let (loops, on_loop) = counter();
        tweens
            .value(0.0, 1.0, 0.5)
            .set_looping(3)
            .on_start(on_start)
            .on_loop_end(on_loop);
        for _ in 0..20 {
            tweens.advance(0.25);
        }
        assert!(tweens.is_empty());
        assert_eq!(starts.get(), 1);
        assert_eq!(loops.get(), 2);
    }

    #[test]
    fn eased_tween_follows_preset() {
        let mut tweens = TweenRegistry::new();
        let (id, out) = recorder(&mut tweens, 0.0, 100.0, 1.0);
        tweens.get_mut(id).unwrap().set_ease(EasePreset::CubicOut);
        tweens.advance(0.5);
        tweens.advance(0.0);
        let expected = 100.0 * EasePreset::CubicOut.apply(0.5);
        assert!((out.get() - expected).abs() < 0.01);
    }

    #[test]
    fn unnormalizable_curve_runs_linear() {
        let mut tweens = TweenRegistry::new();
        let (id, out) = recorder(&mut tweens, 0.0, 10.0, 1.0);
        let flat = EaseCurve::new(vec![
            Keyframe::new(0.0, 3.0, 0.0, 0.0),
            Keyframe::new(1.0, 3.0, 0.0, 0.0),
        ]);
        tweens.get_mut(id).unwrap().set_ease_curve(&flat);
        tweens.advance(0.25);
        tweens.advance(0.0);
        assert!((out.get() - 2.5).abs() < 0.001);
    }

    struct Node {
        pos: Vec3,
        tint: Color,
    }

    const POSITION: Property<Node, Vec3> = Property::new("position", |n| n.pos, |n, v| n.pos = v);
    const TINT: Property<Node, Color> = Property::new("tint", |n| n.tint, |n, c| n.tint = c);

    fn node() -> Rc<RefCell<Node>> {
        Rc::new(RefCell::new(Node {
            pos: Vec3::new(1.0, 2.0, 3.0),
            tint: Color::WHITE,
        }))
    }

    #[test]
    fn animate_starts_from_current_value() {
        let mut tweens = TweenRegistry::new();
        let node = node();
        let id = tweens
            .animate(&Rc::downgrade(&node), POSITION, Vec3::new(3.0, 2.0, 1.0), 1.0)
            .unwrap()
            .id();
        assert_eq!(tweens.get(id).unwrap().kind(), TweenKind::Vector3);

        tweens.advance(0.5);
        tweens.advance(0.0);
        assert!((node.borrow().pos - Vec3::new(2.0, 2.0, 2.0)).length() < 0.001);

        tweens.advance(0.5);
        tweens.advance(0.0);
        assert_eq!(node.borrow().pos, Vec3::new(3.0, 2.0, 1.0));
        assert!(tweens.is_empty());
    }

    #[test]
    fn animate_channel_touches_one_component() {
        let mut tweens = TweenRegistry::new();
        let node = node();
        tweens
            .animate_channel(&Rc::downgrade(&node), TINT, Channel::W, 0.0, 0.5)
            .unwrap();
        tweens
            .animate_channel(&Rc::downgrade(&node), POSITION, Channel::Y, 8.0, 0.5)
            .unwrap();
        for _ in 0..3 {
            tweens.advance(0.25);
        }
        let n = node.borrow();
        assert_eq!(n.tint, Color::WHITE.with_alpha(0.0));
        assert_eq!(n.pos, Vec3::new(1.0, 8.0, 3.0));
    }

    #[test]
    fn dead_target_yields_none() {
        let mut tweens = TweenRegistry::new();
        let node = node();
        let weak = Rc::downgrade(&node);
        drop(node);
        assert!(tweens.animate(&weak, POSITION, Vec3::ZERO, 1.0).is_none());
        assert!(tweens.animate_channel(&weak, POSITION, Channel::X, 0.0, 1.0).is_none());
        assert!(tweens.is_empty());
    }

    #[test]
    fn target_dropped_mid_flight_is_harmless() {
        let mut tweens = TweenRegistry::new();
        let node = node();
        let (done, on_done) = counter();
        tweens
            .animate(&Rc::downgrade(&node), POSITION, Vec3::ZERO, 0.5)
            .unwrap()
            .on_complete(on_done);
        tweens.advance(0.25);
        drop(node);
        for _ in 0..3 {
            tweens.advance(0.25);
        }
        assert!(tweens.is_empty());
        assert_eq!(done.get(), 1);
    }
}
