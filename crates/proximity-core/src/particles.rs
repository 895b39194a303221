//! Magnetic particle field.
//!
//! Particles rest at a random home position. Near the pointer they are pulled
//! onto a ring around it instead of onto the pointer itself; away from it they
//! relax home. Friction is applied every tick, so motion always decays.

use crate::config::ParticleConfig;
use crate::constants::*;
use crate::error::{ConfigError, EffectError};
use crate::geometry::{viewport_to_surface, SurfaceGeometry};
use crate::pointer::PointerTracker;
use crate::scheduler::FrameCallback;
use crate::visibility::Gated;
use glam::Vec2;
use rand::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub home: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
    /// Distance to the pointer measured at the start of the last step.
    pub pointer_dist: f32,
}

impl Particle {
    pub fn at_rest(home: Vec2, size: f32, alpha: f32) -> Self {
        Self {
            pos: home,
            home,
            vel: Vec2::ZERO,
            size,
            alpha,
            pointer_dist: f32::INFINITY,
        }
    }

    /// Advance one tick. `pointer` is in surface pixels, `None` when absent.
    pub fn step(&mut self, pointer: Option<Vec2>, magnet_radius: f32, ring_radius: f32) {
        let dist = pointer.map_or(f32::INFINITY, |m| m.distance(self.pos));
        self.pointer_dist = dist;
        match pointer {
            Some(m) if dist < magnet_radius => {
                let d = m - self.pos;
                let angle = d.y.atan2(d.x);
                let target = m - Vec2::new(angle.cos(), angle.sin()) * ring_radius;
                let force = (1.0 - dist / magnet_radius) * MAGNET_GAIN;
                self.vel += (target - self.pos) * force;
            }
            _ => {
                self.vel += (self.home - self.pos) * HOME_GAIN;
            }
        }
        self.vel *= FRICTION;
        self.pos += self.vel;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Base alpha brightened by speed.
    #[inline]
    pub fn glow(&self) -> f32 {
        (self.alpha + self.speed() * GLOW_SPEED_GAIN).min(1.0)
    }
}

/// 2D drawing target (a canvas 2D context on the web).
pub trait Surface2d {
    fn clear(&mut self, width: u32, height: u32) -> Result<(), EffectError>;
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str, alpha: f32) -> Result<(), EffectError>;
    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: &str,
        alpha: f32,
        width: f32,
    ) -> Result<(), EffectError>;
    /// Restore opacity to 1 after a pass.
    fn reset_alpha(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    Uninitialized,
    Ready,
    Running,
    Paused,
    Destroyed,
}

/// Narrow viewports get fewer particles.
pub fn effective_count(requested: usize, viewport_css_width: f64) -> usize {
    if viewport_css_width < NARROW_VIEWPORT_PX {
        requested.min(NARROW_VIEWPORT_MAX_PARTICLES)
    } else {
        requested
    }
}

pub struct ParticleField {
    config: ParticleConfig,
    particles: Vec<Particle>,
    width: u32,
    height: u32,
    state: SimState,
    visible: bool,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(config: ParticleConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            particles: Vec::new(),
            width: 0,
            height: 0,
            state: SimState::Uninitialized,
            visible: false,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Regenerate the whole batch for a new surface size. Degenerate sizes keep
    /// the current batch and return false.
    pub fn resize(&mut self, width: u32, height: u32, viewport_css_width: f64) -> bool {
        if self.state == SimState::Destroyed || width == 0 || height == 0 {
            return false;
        }
        let n = effective_count(self.config.count, viewport_css_width);
        let (w, h) = (width as f32, height as f32);
        let base = self.config.particle_size;
        let rng = &mut self.rng;
        self.particles = (0..n)
            .map(|_| {
                let home = Vec2::new(rng.gen::<f32>() * w, rng.gen::<f32>() * h);
                let size = base * (SIZE_MIN_FACTOR + rng.gen::<f32>() * SIZE_SPAN_FACTOR);
                let alpha = ALPHA_MIN + rng.gen::<f32>() * ALPHA_SPAN;
                Particle::at_rest(home, size, alpha)
            })
            .collect();
        self.width = width;
        self.height = height;
        if self.state == SimState::Uninitialized {
            self.state = if self.visible {
                SimState::Running
            } else {
                SimState::Ready
            };
        }
        log::debug!("[particles] {} particles on {}x{}", n, width, height);
        true
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.state = match (self.state, visible) {
            (SimState::Ready | SimState::Paused, true) => SimState::Running,
            (SimState::Running, false) => SimState::Paused,
            (s, _) => s,
        };
    }

    pub fn destroy(&mut self) {
        self.state = SimState::Destroyed;
        self.visible = false;
        self.particles.clear();
    }

    pub fn step(&mut self, pointer: Option<Vec2>) {
        let (magnet, ring) = (self.config.magnet_radius, self.config.ring_radius);
        for p in &mut self.particles {
            p.step(pointer, magnet, ring);
        }
    }

    /// Draw the field. Links are gated on each particle's pre-step pointer
    /// distance.
    pub fn render(&self, surface: &mut dyn Surface2d) -> Result<(), EffectError> {
        surface.clear(self.width, self.height)?;
        let color = self.config.color.as_str();
        let link_radius = self.config.magnet_radius * LINK_RADIUS_FACTOR;
        let links = self.particles.len() <= LINK_MAX_PARTICLES;

        for (i, p) in self.particles.iter().enumerate() {
            surface.fill_circle(p.pos, p.size, color, p.glow())?;

            if links && p.pointer_dist < link_radius {
                for q in &self.particles[i + 1..] {
                    let d = p.pos.distance(q.pos);
                    if d < LINK_DISTANCE {
                        let alpha = (1.0 - d / LINK_DISTANCE) * LINK_MAX_ALPHA;
                        surface.stroke_line(p.pos, q.pos, color, alpha, LINK_WIDTH)?;
                    }
                }
            }
        }
        surface.reset_alpha();
        Ok(())
    }

    /// One full frame: step then draw.
    pub fn tick(&mut self, surface: &mut dyn Surface2d, pointer: Option<Vec2>) -> Result<(), EffectError> {
        if self.state != SimState::Running {
            return Ok(());
        }
        self.step(pointer);
        self.render(surface)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Particle field bound to the shared pointer and a drawing surface.
pub struct ParticleEffect {
    field: RefCell<ParticleField>,
    surface: RefCell<Box<dyn Surface2d>>,
    geometry: Box<dyn SurfaceGeometry>,
    pointer: Rc<PointerTracker>,
    visible: Cell<bool>,
}

impl ParticleEffect {
    pub fn new(
        field: ParticleField,
        surface: Box<dyn Surface2d>,
        geometry: Box<dyn SurfaceGeometry>,
        pointer: Rc<PointerTracker>,
    ) -> Rc<Self> {
        Rc::new(Self {
            field: RefCell::new(field),
            surface: RefCell::new(surface),
            geometry,
            pointer,
            visible: Cell::new(false),
        })
    }

    pub fn resize(&self, width: u32, height: u32, viewport_css_width: f64) -> bool {
        match self.field.try_borrow_mut() {
            Ok(mut f) => f.resize(width, height, viewport_css_width),
            Err(_) => false,
        }
    }

    pub fn destroy(&self) {
        self.visible.set(false);
        if let Ok(mut f) = self.field.try_borrow_mut() {
            f.destroy();
        }
    }

    /// Pointer in surface pixels, `None` before any pointer event.
    pub fn surface_pointer(&self) -> Option<Vec2> {
        let p = self.pointer.get();
        if !p.is_tracked() {
            return None;
        }
        let rect = self.geometry.surface_rect()?;
        viewport_to_surface(p.as_vec2(), rect, self.geometry.backing_size())
    }

    pub fn state(&self) -> SimState {
        self.field.borrow().state()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField) -> R) -> R {
        f(&self.field.borrow())
    }
}

impl FrameCallback for ParticleEffect {
    fn on_frame(&self, _timestamp_ms: f64) -> Result<(), EffectError> {
        if !self.visible.get() {
            return Ok(());
        }
        let pointer = self.surface_pointer();
        let mut field = self.field.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
        let mut surface = self.surface.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
        field.tick(&mut **surface, pointer)
    }
}

impl Gated for ParticleEffect {
    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        if let Ok(mut f) = self.field.try_borrow_mut() {
            f.set_visible(visible);
        }
    }
}
