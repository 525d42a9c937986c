//! Optional per-thread default registry.
//!
//! Hosts that would rather not thread a [`TweenRegistry`] through their code can
//! use these free functions instead. The registry is created on first use and
//! lives until [`shutdown`] or thread exit; the host still drives it with
//! [`advance`] once per frame.
//!
//! Tween callbacks run while the default registry is borrowed. [`add`] and
//! [`stop`] notice this and queue through the registry's spawner, so they are
//! safe to call from anywhere. [`with`] returns `None` instead.

use std::cell::RefCell;

use crate::api::types::TweenId;
use crate::core::config;
use crate::core::registry::{TweenRegistry, TweenSpawner};
use crate::core::tween::Tween;

thread_local! {
    static DEFAULT: RefCell<Option<TweenRegistry>> = RefCell::new(None);
    static SPAWNER: RefCell<Option<TweenSpawner>> = RefCell::new(None);
}

fn ensure(slot: &mut Option<TweenRegistry>) -> &mut TweenRegistry {
    slot.get_or_insert_with(|| {
        let registry = TweenRegistry::new();
        SPAWNER.with(|cell| *cell.borrow_mut() = Some(registry.spawner()));
        log::debug!("default tween registry created");
        registry
    })
}

/// Run `f` against the default registry, creating it if needed.
///
/// Returns `None` when called from inside one of the registry's own callbacks.
pub fn with<R>(f: impl FnOnce(&mut TweenRegistry) -> R) -> Option<R> {
    DEFAULT.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        Some(f(ensure(&mut slot)))
    })
}

/// Deferred handle onto the default registry.
pub fn spawner() -> TweenSpawner {
    if let Some(spawner) = SPAWNER.with(|cell| cell.borrow().clone()) {
        return spawner;
    }
    with(|registry| registry.spawner()).unwrap_or_default()
}

/// Register a tween with the default registry, or queue it during a frame.
pub fn add(tween: Tween) -> TweenId {
    let id = tween.id();
    let mut pending = Some(tween);
    with(|registry| {
        if let Some(tween) = pending.take() {
            registry.add(tween);
        }
    });
    if let Some(tween) = pending {
        spawner().add(tween);
    }
    id
}

/// Stop a tween in the default registry. Deferred when called during a frame
/// or when the tween is still queued.
pub fn stop(id: TweenId) {
    if with(|registry| registry.stop(id)) != Some(true) {
        spawner().stop(id);
    }
}

/// Advance the default registry by `dt` seconds.
/// Returns the number of tweens that completed this frame.
pub fn advance(dt: f32) -> usize {
    with(|registry| registry.advance(dt)).unwrap_or_else(|| {
        config::warn(format_args!("default tween registry advanced from inside a callback"));
        0
    })
}

/// Drop every non-persistent tween from the default registry.
pub fn on_context_reset() {
    if with(TweenRegistry::on_context_reset).is_none() {
        config::warn(format_args!("context reset ignored: default tween registry is busy"));
    }
}

/// Drop the default registry and everything in it. The next call creates a fresh one.
pub fn shutdown() {
    let dropped = DEFAULT.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            SPAWNER.with(|s| s.borrow_mut().take());
            slot.take()
        }
        Err(_) => {
            config::warn(format_args!("shutdown ignored: default tween registry is busy"));
            None
        }
    });
    if let Some(registry) = dropped {
        log::debug!("default tween registry shut down with {} tweens", registry.len());
    }
}
