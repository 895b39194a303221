use proximity_core::{PointerSource, PointerTracker};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A registered DOM listener, removed again on drop.
pub struct EventListener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    /// Register a passive listener. `None` when the browser refuses it.
    pub fn passive(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(true);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        ) {
            log::warn!("[events] add {} failed: {:?}", kind, e);
            return None;
        }
        Some(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Window-level pointer/touch listeners feeding the shared tracker.
#[derive(Default)]
pub struct WindowPointerSource {
    listeners: Vec<EventListener>,
}

impl PointerSource for WindowPointerSource {
    fn attach(&mut self, tracker: Weak<PointerTracker>) {
        let Some(window) = web::window() else {
            log::warn!("[pointer] no window; pointer stays untracked");
            return;
        };

        let t = tracker.clone();
        let on_move = move |ev: web::Event| {
            let (Some(tracker), Some(ev)) = (t.upgrade(), ev.dyn_ref::<web::MouseEvent>()) else {
                return;
            };
            tracker.update(ev.client_x() as f32, ev.client_y() as f32);
        };
        self.listeners
            .extend(EventListener::passive(window.as_ref(), "pointermove", on_move));

        let t = tracker.clone();
        let on_touch = move |ev: web::Event| {
            let (Some(tracker), Some(ev)) = (t.upgrade(), ev.dyn_ref::<web::TouchEvent>()) else {
                return;
            };
            if let Some(touch) = ev.touches().get(0) {
                tracker.update(touch.client_x() as f32, touch.client_y() as f32);
            }
        };
        self.listeners
            .extend(EventListener::passive(window.as_ref(), "touchmove", on_touch));

        if let Some(document) = window.document() {
            let t = tracker;
            let on_leave = move |_ev: web::Event| {
                if let Some(tracker) = t.upgrade() {
                    tracker.reset();
                }
            };
            self.listeners
                .extend(EventListener::passive(document.as_ref(), "mouseleave", on_leave));
        }
    }

    fn detach(&mut self) {
        self.listeners.clear();
    }
}

thread_local! {
    static POINTER: Rc<PointerTracker> = PointerTracker::new(WindowPointerSource::default());
}

/// The page-wide pointer tracker.
pub fn shared_pointer() -> Rc<PointerTracker> {
    POINTER.with(Rc::clone)
}
