//! Magnetic element: leans toward the pointer while hovered and springs back
//! when the pointer leaves.

use crate::config::MagneticConfig;
use crate::constants::{MAGNETIC_MAX_DT_SEC, MAGNETIC_REST_EPSILON_PX};
use crate::error::{ConfigError, EffectError};
use crate::geometry::{ElementGeometry, Rect};
use crate::pointer::{PointerPosition, PointerTracker};
use crate::scheduler::FrameCallback;
use crate::visibility::Gated;
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Receives the element's translate offset in CSS pixels.
pub trait OffsetSink {
    fn set_offset(&mut self, offset: Vec2);
}

/// Offset the element wants to reach for a given pointer.
pub fn hover_target(pointer: PointerPosition, rect: Rect, strength: f32) -> Vec2 {
    if !pointer.is_tracked() || rect.is_degenerate() {
        return Vec2::ZERO;
    }
    let p = pointer.as_vec2();
    if rect.contains(p) {
        (p - rect.center()) * strength
    } else {
        Vec2::ZERO
    }
}

/// Unit-mass damped spring, semi-implicit Euler.
#[derive(Clone, Debug)]
pub struct MagneticSpring {
    config: MagneticConfig,
    offset: Vec2,
    vel: Vec2,
}

impl MagneticSpring {
    pub fn new(config: MagneticConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            offset: Vec2::ZERO,
            vel: Vec2::ZERO,
        })
    }

    pub fn step(&mut self, target: Vec2, dt_sec: f32) -> Vec2 {
        let dt = dt_sec.clamp(0.0, MAGNETIC_MAX_DT_SEC);
        let accel = (target - self.offset) * self.config.stiffness - self.vel * self.config.damping;
        self.vel += accel * dt;
        self.offset += self.vel * dt;
        if target == Vec2::ZERO
            && self.offset.length() < MAGNETIC_REST_EPSILON_PX
            && self.vel.length() < MAGNETIC_REST_EPSILON_PX
        {
            self.offset = Vec2::ZERO;
            self.vel = Vec2::ZERO;
        }
        self.offset
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn strength(&self) -> f32 {
        self.config.strength
    }

    pub fn is_at_rest(&self) -> bool {
        self.offset == Vec2::ZERO && self.vel == Vec2::ZERO
    }
}

struct MagneticState {
    spring: MagneticSpring,
    last_timestamp_ms: Option<f64>,
    written: Vec2,
}

pub struct MagneticEffect {
    state: RefCell<MagneticState>,
    geometry: Box<dyn ElementGeometry>,
    sink: RefCell<Box<dyn OffsetSink>>,
    pointer: Rc<PointerTracker>,
    visible: Cell<bool>,
}

impl MagneticEffect {
    pub fn new(
        spring: MagneticSpring,
        geometry: Box<dyn ElementGeometry>,
        sink: Box<dyn OffsetSink>,
        pointer: Rc<PointerTracker>,
    ) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(MagneticState {
                spring,
                last_timestamp_ms: None,
                written: Vec2::ZERO,
            }),
            geometry,
            sink: RefCell::new(sink),
            pointer,
            visible: Cell::new(false),
        })
    }

    pub fn offset(&self) -> Vec2 {
        self.state.borrow().spring.offset()
    }
}

impl FrameCallback for MagneticEffect {
    fn on_frame(&self, timestamp_ms: f64) -> Result<(), EffectError> {
        if !self.visible.get() {
            return Ok(());
        }
        let mut st = self.state.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
        let dt_sec = match st.last_timestamp_ms.replace(timestamp_ms) {
            Some(prev) => ((timestamp_ms - prev) / 1000.0) as f32,
            None => 1.0 / 60.0,
        };
        let target = match self.geometry.element_rect() {
            Some(rect) => hover_target(self.pointer.get(), rect, st.spring.strength()),
            None => Vec2::ZERO,
        };
        let offset = st.spring.step(target, dt_sec);
        let moved = offset.distance(st.written) > MAGNETIC_REST_EPSILON_PX;
        if moved || (offset == Vec2::ZERO && st.written != Vec2::ZERO) {
            st.written = offset;
            let mut sink = self.sink.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
            sink.set_offset(offset);
        }
        Ok(())
    }
}

impl Gated for MagneticEffect {
    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        if let Ok(mut st) = self.state.try_borrow_mut() {
            st.last_timestamp_ms = None;
        }
    }
}
