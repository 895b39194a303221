//! Process-wide pointer position shared by every effect instance.
//!
//! The tracker owns one set of platform listeners which exists only while at
//! least one subscriber is registered.

use crate::constants::OFFSCREEN_COORD;
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Last known pointer location in viewport CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub const OFFSCREEN: Self = Self {
        x: OFFSCREEN_COORD,
        y: OFFSCREEN_COORD,
    };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// False for the sentinel (and anything else nonsensical).
    pub fn is_tracked(&self) -> bool {
        *self != Self::OFFSCREEN && self.x.is_finite() && self.y.is_finite()
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Default for PointerPosition {
    fn default() -> Self {
        Self::OFFSCREEN
    }
}

/// Platform listener set feeding a [`PointerTracker`].
///
/// `attach` installs the listeners; they report through
/// [`PointerTracker::update`] on the weak handle. `detach` removes them.
pub trait PointerSource {
    fn attach(&mut self, tracker: Weak<PointerTracker>);
    fn detach(&mut self);
}

pub struct PointerTracker {
    position: Cell<PointerPosition>,
    subscribers: Cell<usize>,
    source: RefCell<Box<dyn PointerSource>>,
    me: Weak<PointerTracker>,
}

impl PointerTracker {
    pub fn new(source: impl PointerSource + 'static) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            position: Cell::new(PointerPosition::OFFSCREEN),
            subscribers: Cell::new(0),
            source: RefCell::new(Box::new(source)),
            me: me.clone(),
        })
    }

    pub fn subscribe(&self) {
        let n = self.subscribers.get();
        self.subscribers.set(n + 1);
        if n == 0 {
            self.source.borrow_mut().attach(self.me.clone());
            log::debug!("[pointer] listeners attached");
        }
    }

    pub fn unsubscribe(&self) {
        match self.subscribers.get() {
            0 => {
                log::debug!("[pointer] unsubscribe without subscriber; ignoring");
            }
            1 => {
                self.subscribers.set(0);
                self.source.borrow_mut().detach();
                log::debug!("[pointer] listeners detached");
            }
            n => self.subscribers.set(n - 1),
        }
    }

    #[inline]
    pub fn get(&self) -> PointerPosition {
        self.position.get()
    }

    #[inline]
    pub fn update(&self, x: f32, y: f32) {
        self.position.set(PointerPosition { x, y });
    }

    /// Park the pointer at the sentinel, e.g. when it leaves the document.
    pub fn reset(&self) {
        self.position.set(PointerPosition::OFFSCREEN);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.get()
    }

    pub fn is_attached(&self) -> bool {
        self.subscribers.get() > 0
    }
}
