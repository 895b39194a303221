use crate::dom::rect_of;
use crate::events::shared_pointer;
use crate::frame::shared_scheduler;
use crate::markup;
use crate::observer;
use glam::Vec2;
use proximity_core::{
    ElementGeometry, GateOptions, MagneticConfig, MagneticEffect, MagneticSpring, OffsetSink,
    Rect, VisibilityGate, MAGNETIC_ROOT_MARGIN_PX,
};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct WrapperGeometry(web::Element);

impl ElementGeometry for WrapperGeometry {
    fn element_rect(&self) -> Option<Rect> {
        let r = rect_of(&self.0);
        (!r.is_degenerate()).then_some(r)
    }
}

struct TransformSink(web::HtmlElement);

impl OffsetSink for TransformSink {
    fn set_offset(&mut self, offset: Vec2) {
        let _ = self
            .0
            .style()
            .set_property("transform", &markup::translate(offset.x, offset.y));
    }
}

fn mount(
    wrapper: web::Element,
    inner: web::HtmlElement,
    config: MagneticConfig,
) -> anyhow::Result<Rc<VisibilityGate>> {
    let spring = MagneticSpring::new(config)?;
    let effect = MagneticEffect::new(
        spring,
        Box::new(WrapperGeometry(wrapper.clone())),
        Box::new(TransformSink(inner)),
        shared_pointer(),
    );
    let gate = VisibilityGate::new(
        effect,
        shared_scheduler(),
        Some(shared_pointer()),
        GateOptions {
            root_margin_px: MAGNETIC_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );
    observer::watch(&wrapper, &gate)?;
    Ok(gate)
}

/// Element that leans toward the pointer while hovered and springs back.
#[wasm_bindgen]
pub struct MagneticButton {
    gate: Option<Rc<VisibilityGate>>,
}

#[wasm_bindgen]
impl MagneticButton {
    pub fn mount(
        wrapper: web::Element,
        inner: web::HtmlElement,
        strength: Option<f32>,
    ) -> MagneticButton {
        let d = MagneticConfig::default();
        let config = MagneticConfig {
            strength: strength.unwrap_or(d.strength),
            ..d
        };
        match mount(wrapper, inner, config) {
            Ok(gate) => {
                log::debug!("[magnetic] mounted");
                Self { gate: Some(gate) }
            }
            Err(e) => {
                log::warn!("[magnetic] static: {:#}", e);
                Self { gate: None }
            }
        }
    }

    pub fn destroy(&mut self) {
        if let Some(gate) = self.gate.take() {
            gate.teardown();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.gate.is_some()
    }
}
