//! Binding tweens to external objects.
//!
//! The engine never knows concrete target types. A [`Property`] is a pair of
//! plain function pointers that read and write one animatable field, and the
//! target itself is held weakly so a tween never keeps its object alive.
//!
//! ```rust,ignore
//! struct Sprite { pos: Vec3, tint: Color }
//!
//! const POSITION: Property<Sprite, Vec3> =
//!     Property::new("position", |s| s.pos, |s, v| s.pos = v);
//!
//! let sprite = Rc::new(RefCell::new(Sprite { .. }));
//! registry.animate(&Rc::downgrade(&sprite), POSITION, Vec3::X, 0.5);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glam::Vec4;

use crate::api::value::TweenValue;

/// Accessor for one animatable field of `T`, typed by the value it carries.
pub struct Property<T, V> {
    name: &'static str,
    get: fn(&T) -> V,
    set: fn(&mut T, V),
}

impl<T, V> Clone for Property<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Property<T, V> {}

impl<T, V> fmt::Debug for Property<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("name", &self.name).finish()
    }
}

impl<T: 'static, V: TweenValue> Property<T, V> {
    pub const fn new(name: &'static str, get: fn(&T) -> V, set: fn(&mut T, V)) -> Self {
        Self { name, get, set }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value of the property on `target`, as a raw tween value.
    pub fn read(&self, target: &T) -> Vec4 {
        (self.get)(target).into_raw()
    }

    /// Write a raw tween value into `target`.
    pub fn write(&self, target: &mut T, raw: Vec4) {
        (self.set)(target, V::from_raw(raw))
    }

    /// Read the current value through a weak handle. `None` if the target is gone.
    pub fn read_weak(&self, target: &Weak<RefCell<T>>) -> Option<Vec4> {
        let strong = target.upgrade()?;
        let value = strong.try_borrow().ok().map(|t| self.read(&t));
        value
    }

    /// Build the apply closure a tween calls each frame.
    ///
    /// Writes are skipped once the target has been dropped, or while the host
    /// holds a borrow of it.
    pub fn applier(self, target: Weak<RefCell<T>>) -> impl FnMut(Vec4) + 'static {
        move |raw| {
            if let Some(strong) = target.upgrade() {
                apply_to(&strong, |t| self.write(t, raw));
            }
        }
    }
}

fn apply_to<T>(target: &Rc<RefCell<T>>, write: impl FnOnce(&mut T)) {
    if let Ok(mut guard) = target.try_borrow_mut() {
        write(&mut guard);
    }
}
