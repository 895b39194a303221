use proximity_core::{FrameDriver, FrameScheduler};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame` driver. The closure is created on first request
/// and reused for every frame after that.
#[derive(Default)]
pub struct RafDriver {
    closure: Option<Closure<dyn FnMut(f64)>>,
    pending: Option<i32>,
}

impl FrameDriver for RafDriver {
    fn request_frame(&mut self, scheduler: Weak<FrameScheduler>) {
        let Some(window) = web::window() else {
            log::warn!("[frame] no window; scheduler idle");
            return;
        };
        let closure = self.closure.get_or_insert_with(|| {
            Closure::wrap(Box::new(move |ts: f64| {
                if let Some(s) = scheduler.upgrade() {
                    s.run_frame(ts);
                }
            }) as Box<dyn FnMut(f64)>)
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => self.pending = Some(id),
            Err(e) => log::warn!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_frame(&mut self) {
        if let (Some(window), Some(id)) = (web::window(), self.pending.take()) {
            let _ = window.cancel_animation_frame(id);
        }
    }
}

thread_local! {
    static SCHEDULER: Rc<FrameScheduler> = FrameScheduler::new(RafDriver::default());
}

/// The page-wide frame scheduler.
pub fn shared_scheduler() -> Rc<FrameScheduler> {
    SCHEDULER.with(Rc::clone)
}
