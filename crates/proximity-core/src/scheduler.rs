//! One frame loop multiplexed across every mounted effect.

use crate::error::EffectError;
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Per-frame work registered with the [`FrameScheduler`].
pub trait FrameCallback {
    fn on_frame(&self, timestamp_ms: f64) -> Result<(), EffectError>;
}

/// Platform frame source (`requestAnimationFrame` on the web).
///
/// After `request_frame` the driver calls [`FrameScheduler::run_frame`] once
/// on the next frame unless `cancel_frame` comes first.
pub trait FrameDriver {
    fn request_frame(&mut self, scheduler: Weak<FrameScheduler>);
    fn cancel_frame(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

pub struct FrameScheduler {
    callbacks: RefCell<FnvHashMap<u64, Rc<dyn FrameCallback>>>,
    next_id: Cell<u64>,
    running: Cell<bool>,
    in_frame: Cell<bool>,
    driver: RefCell<Box<dyn FrameDriver>>,
    me: Weak<FrameScheduler>,
}

impl FrameScheduler {
    pub fn new(driver: impl FrameDriver + 'static) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            callbacks: RefCell::new(FnvHashMap::default()),
            next_id: Cell::new(0),
            running: Cell::new(false),
            in_frame: Cell::new(false),
            driver: RefCell::new(Box::new(driver)),
            me: me.clone(),
        })
    }

    pub fn add(&self, callback: Rc<dyn FrameCallback>) -> TickHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.callbacks.borrow_mut().insert(id, callback);
        if !self.running.get() {
            self.running.set(true);
            // Mid-frame additions are picked up by the re-request at frame end.
            if !self.in_frame.get() {
                self.driver.borrow_mut().request_frame(self.me.clone());
            }
            log::debug!("[scheduler] loop started");
        }
        TickHandle(id)
    }

    pub fn remove(&self, handle: TickHandle) {
        let now_empty = {
            let mut cbs = self.callbacks.borrow_mut();
            if cbs.remove(&handle.0).is_none() {
                return;
            }
            cbs.is_empty()
        };
        if now_empty && self.running.get() {
            self.running.set(false);
            if !self.in_frame.get() {
                self.driver.borrow_mut().cancel_frame();
            }
            log::debug!("[scheduler] loop stopped");
        }
    }

    /// Invoke every callback registered when the frame began and still
    /// registered at its turn, then schedule the next frame if any remain.
    pub fn run_frame(&self, timestamp_ms: f64) {
        let snapshot: Vec<(u64, Rc<dyn FrameCallback>)> = self
            .callbacks
            .borrow()
            .iter()
            .map(|(id, cb)| (*id, cb.clone()))
            .collect();

        self.in_frame.set(true);
        for (id, cb) in snapshot {
            if !self.callbacks.borrow().contains_key(&id) {
                continue;
            }
            if let Err(e) = cb.on_frame(timestamp_ms) {
                log::warn!("[scheduler] tick {} failed: {}", id, e);
            }
        }
        self.in_frame.set(false);

        if self.callbacks.borrow().is_empty() {
            self.running.set(false);
        } else {
            self.running.set(true);
            self.driver.borrow_mut().request_frame(self.me.clone());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    pub fn contains(&self, handle: TickHandle) -> bool {
        self.callbacks.borrow().contains_key(&handle.0)
    }
}
