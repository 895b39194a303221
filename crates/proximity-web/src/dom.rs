use crate::markup;
use proximity_core::{capped_backing_size, Rect};
use wasm_bindgen::JsValue;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

#[inline]
pub fn rect_of(el: &web::Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

pub fn viewport_width() -> f64 {
    web::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Size the canvas backing store to its container (pixel ratio capped) and
/// pin its css size. Returns the backing size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let Some(w) = web::window() else {
        return (canvas.width(), canvas.height());
    };
    let rect = match canvas.parent_element() {
        Some(parent) => parent.get_bounding_client_rect(),
        None => canvas.get_bounding_client_rect(),
    };
    let (w_px, h_px) = capped_backing_size(rect.width(), rect.height(), w.device_pixel_ratio());
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    let style = canvas.style();
    let _ = style.set_property("width", &markup::px(rect.width()));
    let _ = style.set_property("height", &markup::px(rect.height()));
    (w_px, h_px)
}
