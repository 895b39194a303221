use crate::canvas::{context_2d, CanvasGeometry, CanvasSurface, WindowTimeouts};
use crate::dom::{sync_canvas_backing_size, viewport_width};
use crate::events::{shared_pointer, EventListener};
use crate::frame::shared_scheduler;
use crate::observer;
use proximity_core::{
    Debouncer, GateOptions, ParticleConfig, ParticleEffect, ParticleField as Field,
    VisibilityGate, PARTICLE_ROOT_MARGIN_PX, RESIZE_DEBOUNCE_MS,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct ResizeState {
    debounce: Debouncer<i32>,
    timers: WindowTimeouts,
}

struct Mounted {
    effect: Rc<ParticleEffect>,
    gate: Rc<VisibilityGate>,
    resize: Rc<RefCell<ResizeState>>,
    _on_resize: Option<EventListener>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.gate.teardown();
        self.effect.destroy();
        if let Ok(mut r) = self.resize.try_borrow_mut() {
            let ResizeState { debounce, timers } = &mut *r;
            debounce.cancel(timers);
        }
        log::debug!("[particles] unmounted");
    }
}

fn apply_resize(canvas: &web::HtmlCanvasElement, effect: &ParticleEffect) {
    let (w, h) = sync_canvas_backing_size(canvas);
    if !effect.resize(w, h, viewport_width()) {
        log::debug!("[particles] resize to {}x{} skipped", w, h);
    }
}

fn mount(canvas: web::HtmlCanvasElement, config: ParticleConfig) -> anyhow::Result<Mounted> {
    let field = Field::new(config, rand::random::<u64>())?;
    let ctx = context_2d(&canvas).ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?;
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let _ = canvas.style().set_css_text(crate::markup::CANVAS_STYLE);

    let pointer = shared_pointer();
    let effect = ParticleEffect::new(
        field,
        Box::new(CanvasSurface::new(ctx)),
        Box::new(CanvasGeometry::new(canvas.clone())),
        pointer.clone(),
    );
    apply_resize(&canvas, &effect);

    let resize = Rc::new_cyclic(|weak: &std::rc::Weak<RefCell<ResizeState>>| {
        let weak = weak.clone();
        let canvas = canvas.clone();
        let effect = Rc::downgrade(&effect);
        RefCell::new(ResizeState {
            debounce: Debouncer::new(RESIZE_DEBOUNCE_MS),
            timers: WindowTimeouts::new(move || {
                if let Some(state) = weak.upgrade() {
                    if let Ok(mut s) = state.try_borrow_mut() {
                        s.debounce.fired();
                    }
                }
                if let Some(effect) = effect.upgrade() {
                    apply_resize(&canvas, &effect);
                }
            }),
        })
    });

    let weak_resize = Rc::downgrade(&resize);
    let on_resize = EventListener::passive(window.as_ref(), "resize", move |_ev| {
        if let Some(state) = weak_resize.upgrade() {
            if let Ok(mut s) = state.try_borrow_mut() {
                let ResizeState { debounce, timers } = &mut *s;
                debounce.trigger(timers);
            }
        }
    });

    let gate = VisibilityGate::new(
        effect.clone(),
        shared_scheduler(),
        Some(pointer),
        GateOptions {
            root_margin_px: PARTICLE_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );
    observer::watch(canvas.as_ref(), &gate)?;
    log::debug!("[particles] mounted");

    Ok(Mounted {
        effect,
        gate,
        resize,
        _on_resize: on_resize,
    })
}

/// Canvas particle field. Inert when the config is invalid or the canvas
/// has no 2D context.
#[wasm_bindgen]
pub struct ParticleField {
    inner: Option<Mounted>,
}

#[wasm_bindgen]
impl ParticleField {
    pub fn mount(
        canvas: web::HtmlCanvasElement,
        count: Option<u32>,
        color: Option<String>,
        magnet_radius: Option<f32>,
        ring_radius: Option<f32>,
        particle_size: Option<f32>,
    ) -> ParticleField {
        let d = ParticleConfig::default();
        let config = ParticleConfig {
            count: count.map(|c| c as usize).unwrap_or(d.count),
            color: color.unwrap_or(d.color),
            magnet_radius: magnet_radius.unwrap_or(d.magnet_radius),
            ring_radius: ring_radius.unwrap_or(d.ring_radius),
            particle_size: particle_size.unwrap_or(d.particle_size),
        };
        match mount(canvas, config) {
            Ok(m) => Self { inner: Some(m) },
            Err(e) => {
                log::warn!("[particles] inert: {:#}", e);
                Self { inner: None }
            }
        }
    }

    pub fn destroy(&mut self) {
        self.inner = None;
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner.is_some()
    }
}
