use crate::dom::window_document;
use crate::events::{shared_pointer, EventListener};
use crate::frame::shared_scheduler;
use crate::glyphs::{render_label, DomGlyphLayout, DomGlyphText};
use crate::markup;
use crate::observer;
use proximity_core::{
    GateOptions, ScrambleConfig, ScrambleEffect, ScrambleText, VisibilityGate,
    SCRAMBLE_ROOT_MARGIN_PX,
};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct Mounted {
    gate: Rc<VisibilityGate>,
    _listeners: Vec<EventListener>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        // Settles any scrambled glyph back to its own character.
        self.gate.teardown();
        log::debug!("[scramble] unmounted");
    }
}

fn mount(
    container: web::Element,
    cells: Vec<web::HtmlElement>,
    config: &ScrambleConfig,
) -> anyhow::Result<Mounted> {
    let text = ScrambleText::new(config, rand::random::<u64>())?;
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let effect = ScrambleEffect::new(
        text,
        Box::new(DomGlyphLayout::new(container.clone(), cells.clone())),
        Box::new(DomGlyphText::new(cells)),
        shared_pointer(),
    );

    let mut listeners = Vec::new();
    for kind in ["scroll", "resize"] {
        let weak = Rc::downgrade(&effect);
        listeners.extend(EventListener::passive(window.as_ref(), kind, move |_ev| {
            if let Some(effect) = weak.upgrade() {
                effect.invalidate_layout();
            }
        }));
    }

    let gate = VisibilityGate::new(
        effect,
        shared_scheduler(),
        Some(shared_pointer()),
        GateOptions {
            root_margin_px: SCRAMBLE_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );
    observer::watch(&container, &gate)?;
    log::debug!("[scramble] mounted {} glyphs", config.label.chars().count());

    Ok(Mounted {
        gate,
        _listeners: listeners,
    })
}

/// Text whose glyphs scramble briefly as the pointer moves past them. The
/// label is always rendered; the effect is skipped when the config is invalid.
#[wasm_bindgen]
pub struct ScrambledText {
    inner: Option<Mounted>,
}

#[wasm_bindgen]
impl ScrambledText {
    pub fn mount(
        container: web::Element,
        target: web::HtmlElement,
        label: String,
        radius: Option<f32>,
        duration: Option<f32>,
        speed: Option<f32>,
        chars: Option<String>,
    ) -> ScrambledText {
        let Some(document) = window_document() else {
            log::warn!("[scramble] no document; nothing rendered");
            return Self { inner: None };
        };
        let cells = match render_label(&document, &target, &label, markup::SCRAMBLE_GLYPH_STYLE) {
            Ok(m) => m.cells,
            Err(e) => {
                log::warn!("[scramble] markup failed: {:#}", e);
                return Self { inner: None };
            }
        };
        let d = ScrambleConfig::default();
        let config = ScrambleConfig {
            label,
            radius: radius.unwrap_or(d.radius),
            duration_sec: duration.unwrap_or(d.duration_sec),
            speed: speed.unwrap_or(d.speed),
            chars: chars.unwrap_or(d.chars),
        };
        match mount(container, cells, &config) {
            Ok(m) => Self { inner: Some(m) },
            Err(e) => {
                log::warn!("[scramble] static: {:#}", e);
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
