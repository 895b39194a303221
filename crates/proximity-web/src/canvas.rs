use crate::dom::rect_of;
use glam::Vec2;
use proximity_core::{EffectError, Rect, Surface2d, SurfaceGeometry, TimeoutHost};
use std::f64::consts::TAU;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .ok()
}

pub struct CanvasSurface {
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface2d for CanvasSurface {
    fn clear(&mut self, width: u32, height: u32) -> Result<(), EffectError> {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: &str,
        alpha: f32,
    ) -> Result<(), EffectError> {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .map_err(|e| EffectError::Surface(format!("{:?}", e)))?;
        self.ctx.set_fill_style_str(color);
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.fill();
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: &str,
        alpha: f32,
        width: f32,
    ) -> Result<(), EffectError> {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
        Ok(())
    }

    fn reset_alpha(&mut self) {
        self.ctx.set_global_alpha(1.0);
    }
}

pub struct CanvasGeometry {
    canvas: web::HtmlCanvasElement,
}

impl CanvasGeometry {
    pub fn new(canvas: web::HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl SurfaceGeometry for CanvasGeometry {
    fn surface_rect(&self) -> Option<Rect> {
        let rect = rect_of(&self.canvas);
        (!rect.is_degenerate()).then_some(rect)
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}

/// `setTimeout` host running one fixed callback.
pub struct WindowTimeouts {
    callback: Closure<dyn FnMut()>,
}

impl WindowTimeouts {
    pub fn new(callback: impl FnMut() + 'static) -> Self {
        Self {
            callback: Closure::wrap(Box::new(callback) as Box<dyn FnMut()>),
        }
    }
}

impl TimeoutHost for WindowTimeouts {
    type Handle = i32;

    fn set_timeout(&mut self, delay_ms: u32) -> Option<i32> {
        web::window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .ok()
    }

    fn clear_timeout(&mut self, handle: i32) {
        if let Some(w) = web::window() {
            w.clear_timeout_with_handle(handle);
        }
    }
}
