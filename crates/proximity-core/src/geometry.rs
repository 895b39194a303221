use glam::Vec2;

/// Axis-aligned box in viewport CSS pixels (a `DOMRect` on the web).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    /// Zero-sized or non-finite boxes show up mid-reflow and are ignored.
    pub fn is_degenerate(&self) -> bool {
        !(self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Layout measurement for the text effect: the container box and one box per
/// glyph cell, both in viewport coordinates.
pub trait GeometryProvider {
    fn container_rect(&self) -> Option<Rect>;
    fn glyph_rect(&self, index: usize) -> Option<Rect>;
}

/// Maps viewport coordinates onto a drawing surface's backing pixels.
pub trait SurfaceGeometry {
    /// The surface's on-screen box.
    fn surface_rect(&self) -> Option<Rect>;
    /// Backing store size in device pixels.
    fn backing_size(&self) -> (u32, u32);
}

/// Viewport point to backing-pixel point, `None` when the surface has no area.
pub fn viewport_to_surface(p: Vec2, rect: Rect, backing: (u32, u32)) -> Option<Vec2> {
    if rect.is_degenerate() {
        return None;
    }
    let sx = backing.0 as f32 / rect.width;
    let sy = backing.1 as f32 / rect.height;
    Some(Vec2::new((p.x - rect.left) * sx, (p.y - rect.top) * sy))
}

/// Backing size for a css box, with the pixel ratio capped for fill-rate.
pub fn capped_backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(crate::constants::MAX_PIXEL_RATIO)
    } else {
        1.0
    };
    let w = (css_width.max(0.0) * dpr) as u32;
    let h = (css_height.max(0.0) * dpr) as u32;
    (w, h)
}

/// Live box of a single element.
pub trait ElementGeometry {
    fn element_rect(&self) -> Option<Rect>;
}
