use crate::dom::window_document;
use crate::events::{shared_pointer, EventListener};
use crate::frame::shared_scheduler;
use crate::glyphs::{render_label, DomGlyphLayout, DomGlyphSink};
use crate::markup;
use crate::observer;
use proximity_core::{
    Falloff, GateOptions, ProximityConfig, ProximityEffect, ProximityText, VisibilityGate,
    TEXT_ROOT_MARGIN_PX,
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
        self.gate.teardown();
        log::debug!("[text] unmounted");
    }
}

fn parse_config(
    label: String,
    near_settings: String,
    far_settings: String,
    radius: Option<f32>,
    falloff: Option<String>,
) -> anyhow::Result<ProximityConfig> {
    let d = ProximityConfig::default();
    let falloff = match falloff {
        Some(f) => f.parse::<Falloff>()?,
        None => d.falloff,
    };
    Ok(ProximityConfig {
        label,
        near_settings,
        far_settings,
        radius: radius.unwrap_or(d.radius),
        falloff,
    })
}

fn mount(
    container: web::Element,
    cells: Vec<web::HtmlElement>,
    config: &ProximityConfig,
) -> anyhow::Result<Mounted> {
    let text = ProximityText::new(config)?;
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let effect = ProximityEffect::new(
        text,
        Box::new(DomGlyphLayout::new(container.clone(), cells.clone())),
        Box::new(DomGlyphSink::new(cells)),
        shared_pointer(),
    );

    // Layout moves under the pointer on scroll and resize.
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
            root_margin_px: TEXT_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );
    observer::watch(&container, &gate)?;
    log::debug!("[text] mounted {} glyphs", config.label.chars().count());

    Ok(Mounted {
        gate,
        _listeners: listeners,
    })
}

/// Per-glyph variable-font proximity text. The label markup is always
/// rendered; the animation is skipped when the config is invalid.
#[wasm_bindgen]
pub struct VariableProximity {
    inner: Option<Mounted>,
}

#[wasm_bindgen]
impl VariableProximity {
    pub fn mount(
        container: web::Element,
        target: web::HtmlElement,
        label: String,
        near_settings: String,
        far_settings: String,
        radius: Option<f32>,
        falloff: Option<String>,
    ) -> VariableProximity {
        let Some(document) = window_document() else {
            log::warn!("[text] no document; nothing rendered");
            return Self { inner: None };
        };
        let glyph_style = markup::glyph_style(&near_settings);
        let cells = match render_label(&document, &target, &label, &glyph_style) {
            Ok(m) => m.cells,
            Err(e) => {
                log::warn!("[text] markup failed: {:#}", e);
                return Self { inner: None };
            }
        };
        let mounted = parse_config(label, near_settings, far_settings, radius, falloff)
            .and_then(|config| mount(container, cells, &config));
        match mounted {
            Ok(m) => Self { inner: Some(m) },
            Err(e) => {
                log::warn!("[text] static: {:#}", e);
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
