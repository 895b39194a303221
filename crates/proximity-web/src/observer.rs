use crate::dom::js_err;
use proximity_core::{ViewportObserver, VisibilityGate};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type EntriesCallback = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;

/// IntersectionObserver on one element, reporting into a gate.
pub struct DomViewportObserver {
    observer: web::IntersectionObserver,
    _callback: EntriesCallback,
}

impl ViewportObserver for DomViewportObserver {
    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

/// Start observing `element` and hand the observer to `gate`.
pub fn watch(element: &web::Element, gate: &Rc<VisibilityGate>) -> anyhow::Result<()> {
    let weak = Rc::downgrade(gate);
    let callback: EntriesCallback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _obs: web::IntersectionObserver| {
            let Some(gate) = weak.upgrade() else {
                return;
            };
            gate.observe_batch(
                entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                    .map(|entry| entry.is_intersecting()),
            );
        },
    )
        as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

    let init = web::IntersectionObserverInit::new();
    init.set_root_margin(&gate.options().root_margin());
    init.set_threshold(&JsValue::from_f64(0.0));
    let observer =
        web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(js_err)?;
    observer.observe(element);
    gate.set_observer(Box::new(DomViewportObserver {
        observer,
        _callback: callback,
    }));
    Ok(())
}
