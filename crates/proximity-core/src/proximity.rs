//! Variable-font proximity text.
//!
//! Each glyph of a label interpolates its font-variation axes between a "near"
//! (rest) and a "far" setting by how close the smoothed pointer is. Only the
//! variation styling changes; text and layout stay put.

use crate::config::ProximityConfig;
use crate::constants::{GAUSSIAN_SIGMA_FACTOR, OFFSCREEN_COORD, POINTER_SMOOTHING, SMOOTHING_SNAP_PX};
use crate::error::{ConfigError, EffectError};
use crate::geometry::GeometryProvider;
use crate::pointer::{PointerPosition, PointerTracker};
use crate::scheduler::FrameCallback;
use crate::visibility::Gated;
use glam::Vec2;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Falloff {
    #[default]
    Linear,
    Exponential,
    Gaussian,
}

impl Falloff {
    /// Interpolation weight in `[0, 1]`; exactly 0 at or beyond `radius`.
    pub fn weight(self, dist: f32, radius: f32) -> f32 {
        if !(radius > 0.0) || !(dist < radius) {
            return 0.0;
        }
        let norm = 1.0 - dist / radius;
        let w = match self {
            Falloff::Linear => norm,
            Falloff::Exponential => norm * norm,
            Falloff::Gaussian => {
                let z = dist / (radius * GAUSSIAN_SIGMA_FACTOR);
                (-0.5 * z * z).exp()
            }
        };
        w.clamp(0.0, 1.0)
    }
}

impl FromStr for Falloff {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Falloff::Linear),
            "exponential" => Ok(Falloff::Exponential),
            "gaussian" => Ok(Falloff::Gaussian),
            _ => Err(ConfigError::UnknownFalloff(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisSetting {
    pub name: String,
    pub near: f32,
    pub far: f32,
}

impl AxisSetting {
    #[inline]
    pub fn at(&self, weight: f32) -> f32 {
        self.near + (self.far - self.near) * weight
    }
}

pub type AxisList = SmallVec<[AxisSetting; 4]>;

/// Parse a `font-variation-settings` list such as `'wght' 400, "opsz" 9`.
/// Malformed entries are skipped; a repeated axis keeps its last value.
pub fn parse_variation_settings(s: &str) -> Vec<(String, f32)> {
    let mut out: Vec<(String, f32)> = Vec::new();
    for entry in s.split(',') {
        let mut parts = entry.split_whitespace();
        let (Some(raw_name), Some(raw_value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let name = raw_name.trim_matches(|c| c == '\'' || c == '"');
        let Ok(value) = raw_value.parse::<f32>() else {
            continue;
        };
        if name.is_empty() || !value.is_finite() {
            continue;
        }
        match out.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => out.push((name.to_string(), value)),
        }
    }
    out
}

/// Axis set comes from `near`; far-only axes are ignored and axes missing
/// from `far` keep their near value.
pub fn pair_axes(near: &str, far: &str) -> AxisList {
    let far = parse_variation_settings(far);
    parse_variation_settings(near)
        .into_iter()
        .map(|(name, near)| {
            let far = far.iter().find(|(n, _)| *n == name).map_or(near, |(_, v)| *v);
            AxisSetting { name, near, far }
        })
        .collect()
}

pub fn format_settings(axes: &[AxisSetting], weight: f32) -> String {
    let mut s = String::new();
    for (i, axis) in axes.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        let _ = write!(s, "'{}' {}", axis.name, axis.at(weight));
    }
    s
}

/// Words of the label, each as its glyph cells. Words wrap as units.
pub fn split_words(label: &str) -> Vec<Vec<char>> {
    label.split(' ').map(|w| w.chars().collect()).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    /// Container-local center, `None` until first measured.
    pub center: Option<Vec2>,
    pub weight: f32,
    written: Option<f32>,
}

/// Receives per-glyph style updates (inline `font-variation-settings`).
pub trait GlyphStyleSink {
    fn set_variation_settings(&mut self, index: usize, settings: &str);
}

pub struct ProximityText {
    axes: AxisList,
    glyphs: Vec<Glyph>,
    rest_settings: String,
    radius: f32,
    falloff: Falloff,
    smooth: Vec2,
    dirty: bool,
}

impl ProximityText {
    pub fn new(config: &ProximityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let glyphs = split_words(&config.label)
            .into_iter()
            .flatten()
            .map(|ch| Glyph {
                ch,
                center: None,
                weight: 0.0,
                // markup is created with the rest settings already applied
                written: Some(0.0),
            })
            .collect();
        Ok(Self {
            axes: pair_axes(&config.near_settings, &config.far_settings),
            glyphs,
            rest_settings: config.near_settings.clone(),
            radius: config.radius,
            falloff: config.falloff,
            smooth: Vec2::splat(OFFSCREEN_COORD),
            dirty: true,
        })
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Re-measure glyph centers. A degenerate box keeps the previous center.
    pub fn refresh_geometry(&mut self, container_origin: Vec2, geometry: &dyn GeometryProvider) {
        for (i, g) in self.glyphs.iter_mut().enumerate() {
            match geometry.glyph_rect(i) {
                Some(r) if !r.is_degenerate() => g.center = Some(r.center() - container_origin),
                _ => {}
            }
        }
        self.dirty = false;
    }

    /// Ease the smoothed pointer toward `target` (container-local).
    pub fn smooth_toward(&mut self, target: Vec2) -> Vec2 {
        let delta = target - self.smooth;
        if delta.length() <= SMOOTHING_SNAP_PX {
            self.smooth = target;
        } else {
            self.smooth += delta * POINTER_SMOOTHING;
        }
        self.smooth
    }

    pub fn tick(
        &mut self,
        pointer: PointerPosition,
        geometry: &dyn GeometryProvider,
        sink: &mut dyn GlyphStyleSink,
    ) {
        let Some(container) = geometry.container_rect() else {
            return;
        };
        let origin = container.origin();
        let target = if pointer.is_tracked() {
            pointer.as_vec2() - origin
        } else {
            Vec2::splat(OFFSCREEN_COORD)
        };
        let s = self.smooth_toward(target);

        if self.dirty {
            self.refresh_geometry(origin, geometry);
        }

        let radius_sq = self.radius * self.radius;
        for (i, g) in self.glyphs.iter_mut().enumerate() {
            let weight = match g.center {
                Some(c) => {
                    let dist_sq = s.distance_squared(c);
                    if dist_sq >= radius_sq {
                        0.0
                    } else {
                        self.falloff.weight(dist_sq.sqrt(), self.radius)
                    }
                }
                None => 0.0,
            };
            g.weight = weight;
            if g.written == Some(weight) {
                continue;
            }
            g.written = Some(weight);
            if weight == 0.0 {
                sink.set_variation_settings(i, &self.rest_settings);
            } else {
                sink.set_variation_settings(i, &format_settings(&self.axes, weight));
            }
        }
    }

    pub fn axes(&self) -> &[AxisSetting] {
        &self.axes
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Current axis values of one glyph, in axis order.
    pub fn axis_values(&self, index: usize) -> Option<SmallVec<[f32; 4]>> {
        let g = self.glyphs.get(index)?;
        Some(self.axes.iter().map(|a| a.at(g.weight)).collect())
    }

    pub fn smoothed_pointer(&self) -> Vec2 {
        self.smooth
    }
}

/// Proximity text bound to the shared pointer and live layout.
pub struct ProximityEffect {
    text: RefCell<ProximityText>,
    geometry: Box<dyn GeometryProvider>,
    sink: RefCell<Box<dyn GlyphStyleSink>>,
    pointer: Rc<PointerTracker>,
    visible: Cell<bool>,
}

impl ProximityEffect {
    pub fn new(
        text: ProximityText,
        geometry: Box<dyn GeometryProvider>,
        sink: Box<dyn GlyphStyleSink>,
        pointer: Rc<PointerTracker>,
    ) -> Rc<Self> {
        Rc::new(Self {
            text: RefCell::new(text),
            geometry,
            sink: RefCell::new(sink),
            pointer,
            visible: Cell::new(false),
        })
    }

    /// Scroll/resize hook: re-measure on the next tick.
    pub fn invalidate_layout(&self) {
        if let Ok(mut t) = self.text.try_borrow_mut() {
            t.mark_dirty();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn with_text<R>(&self, f: impl FnOnce(&ProximityText) -> R) -> R {
        f(&self.text.borrow())
    }
}

impl FrameCallback for ProximityEffect {
    fn on_frame(&self, _timestamp_ms: f64) -> Result<(), EffectError> {
        if !self.visible.get() {
            return Ok(());
        }
        let mut text = self.text.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
        let mut sink = self.sink.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
        text.tick(self.pointer.get(), self.geometry.as_ref(), &mut **sink);
        Ok(())
    }
}

impl Gated for ProximityEffect {
    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        if visible {
            self.invalidate_layout();
        }
    }
}
