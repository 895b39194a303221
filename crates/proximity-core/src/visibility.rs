//! Viewport gating: an effect ticks and listens to the pointer only while its
//! element (plus a pre-entry margin) intersects the viewport.

use crate::pointer::PointerTracker;
use crate::scheduler::{FrameCallback, FrameScheduler, TickHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// An effect that can be paused by a [`VisibilityGate`].
pub trait Gated: FrameCallback {
    /// Entering visibility must also invalidate any cached geometry.
    fn set_visible(&self, visible: bool);
}

/// Platform intersection observer kept alive by the gate.
pub trait ViewportObserver {
    fn disconnect(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateOptions {
    pub root_margin_px: u32,
    pub track_pointer: bool,
}

impl GateOptions {
    /// CSS `rootMargin` string for the observer.
    pub fn root_margin(&self) -> String {
        format!("{}px", self.root_margin_px)
    }
}

pub struct VisibilityGate {
    effect: Rc<dyn Gated>,
    callback: Rc<dyn FrameCallback>,
    scheduler: Rc<FrameScheduler>,
    pointer: Option<Rc<PointerTracker>>,
    options: GateOptions,
    visible: Cell<bool>,
    tick: Cell<Option<TickHandle>>,
    pointer_held: Cell<bool>,
    observer: RefCell<Option<Box<dyn ViewportObserver>>>,
    torn_down: Cell<bool>,
}

impl VisibilityGate {
    pub fn new<E: Gated + 'static>(
        effect: Rc<E>,
        scheduler: Rc<FrameScheduler>,
        pointer: Option<Rc<PointerTracker>>,
        options: GateOptions,
    ) -> Rc<Self> {
        Rc::new(Self {
            callback: effect.clone(),
            effect,
            scheduler,
            pointer: if options.track_pointer { pointer } else { None },
            options,
            visible: Cell::new(false),
            tick: Cell::new(None),
            pointer_held: Cell::new(false),
            observer: RefCell::new(None),
            torn_down: Cell::new(false),
        })
    }

    pub fn options(&self) -> GateOptions {
        self.options
    }

    /// Hand the platform observer to the gate so teardown can disconnect it.
    pub fn set_observer(&self, observer: Box<dyn ViewportObserver>) {
        if self.torn_down.get() {
            let mut observer = observer;
            observer.disconnect();
            return;
        }
        *self.observer.borrow_mut() = Some(observer);
    }

    /// Feed one intersection report.
    pub fn observe(&self, intersecting: bool) {
        if self.torn_down.get() || intersecting == self.visible.get() {
            return;
        }
        self.visible.set(intersecting);
        if intersecting {
            self.effect.set_visible(true);
            let handle = self.scheduler.add(self.callback.clone());
            self.tick.set(Some(handle));
            if let Some(p) = &self.pointer {
                p.subscribe();
                self.pointer_held.set(true);
            }
        } else {
            self.effect.set_visible(false);
            self.release();
        }
    }

    /// Feed reports the platform delivered together; the latest one wins.
    pub fn observe_batch(&self, reports: impl IntoIterator<Item = bool>) {
        if let Some(latest) = reports.into_iter().last() {
            self.observe(latest);
        }
    }

    fn release(&self) {
        if let Some(handle) = self.tick.take() {
            self.scheduler.remove(handle);
        }
        if self.pointer_held.replace(false) {
            if let Some(p) = &self.pointer {
                p.unsubscribe();
            }
        }
    }

    /// Disconnect the observer and drop every registration. Idempotent.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        if let Some(mut obs) = self.observer.borrow_mut().take() {
            obs.disconnect();
        }
        self.visible.set(false);
        self.effect.set_visible(false);
        self.release();
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn is_registered(&self) -> bool {
        self.tick.get().is_some()
    }
}

impl Drop for VisibilityGate {
    fn drop(&mut self) {
        self.teardown();
    }
}
