//! Scrambled text: glyphs near a moving pointer flicker through a character
//! set for a while, then settle back on their own character. Glyphs closer to
//! the pointer scramble longer.

use crate::config::ScrambleConfig;
use crate::constants::*;
use crate::error::{ConfigError, EffectError};
use crate::geometry::GeometryProvider;
use crate::pointer::{PointerPosition, PointerTracker};
use crate::proximity::split_words;
use crate::scheduler::FrameCallback;
use crate::visibility::Gated;
use glam::Vec2;
use rand::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct ScrambleGlyph {
    pub ch: char,
    /// Container-local center, `None` until first measured.
    pub center: Option<Vec2>,
    /// Character currently on screen.
    pub shown: char,
    remaining_sec: f32,
    since_swap_sec: f32,
}

impl ScrambleGlyph {
    pub fn is_scrambling(&self) -> bool {
        self.remaining_sec > 0.0
    }

    pub fn remaining_sec(&self) -> f32 {
        self.remaining_sec
    }
}

/// Receives the character a glyph cell should display.
pub trait GlyphTextSink {
    fn set_glyph_text(&mut self, index: usize, ch: char);
}

pub struct ScrambleText {
    glyphs: Vec<ScrambleGlyph>,
    charset: Vec<char>,
    radius: f32,
    duration_sec: f32,
    swap_interval_sec: f32,
    rng: StdRng,
    last_pointer: PointerPosition,
    dirty: bool,
}

impl ScrambleText {
    pub fn new(config: &ScrambleConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let glyphs = split_words(&config.label)
            .into_iter()
            .flatten()
            .map(|ch| ScrambleGlyph {
                ch,
                center: None,
                shown: ch,
                remaining_sec: 0.0,
                since_swap_sec: 0.0,
            })
            .collect();
        Ok(Self {
            glyphs,
            charset: config.chars.chars().collect(),
            radius: config.radius,
            duration_sec: config.duration_sec,
            swap_interval_sec: SCRAMBLE_FRAME_SEC / config.speed,
            rng: StdRng::seed_from_u64(seed),
            last_pointer: PointerPosition::OFFSCREEN,
            dirty: true,
        })
    }

    /// Scramble time for a glyph at `dist` from the pointer, `None` outside
    /// the radius.
    pub fn scramble_duration(&self, dist: f32) -> Option<f32> {
        (dist < self.radius).then(|| self.duration_sec * (1.0 - dist / self.radius))
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

    /// Advance by `dt_sec`. Only a pointer that moved since the last tick
    /// (re)starts scrambling; a restart overwrites the remaining time.
    pub fn tick(
        &mut self,
        pointer: PointerPosition,
        dt_sec: f32,
        geometry: &dyn GeometryProvider,
        sink: &mut dyn GlyphTextSink,
    ) {
        let Some(container) = geometry.container_rect() else {
            return;
        };
        let origin = container.origin();
        if self.dirty {
            self.refresh_geometry(origin, geometry);
        }

        let moved = pointer.is_tracked() && pointer != self.last_pointer;
        self.last_pointer = pointer;
        if moved {
            let local = pointer.as_vec2() - origin;
            let (radius, duration) = (self.radius, self.duration_sec);
            for g in &mut self.glyphs {
                let Some(c) = g.center else { continue };
                let dist = local.distance(c);
                if dist < radius {
                    g.remaining_sec = duration * (1.0 - dist / radius);
                    g.since_swap_sec = 0.0;
                }
            }
        }

        let Self {
            glyphs,
            charset,
            rng,
            swap_interval_sec,
            ..
        } = self;
        for (i, g) in glyphs.iter_mut().enumerate() {
            if g.remaining_sec <= 0.0 {
                continue;
            }
            g.remaining_sec -= dt_sec;
            if g.remaining_sec <= 0.0 {
                g.remaining_sec = 0.0;
                if g.shown != g.ch {
                    g.shown = g.ch;
                    sink.set_glyph_text(i, g.ch);
                }
                continue;
            }
            g.since_swap_sec += dt_sec;
            if g.shown == g.ch || g.since_swap_sec >= *swap_interval_sec {
                g.since_swap_sec = 0.0;
                if let Some(&pick) = charset.choose(rng) {
                    if pick != g.shown {
                        g.shown = pick;
                        sink.set_glyph_text(i, pick);
                    }
                }
            }
        }
    }

    /// Stop every scramble and restore the original characters.
    pub fn settle(&mut self, sink: &mut dyn GlyphTextSink) {
        for (i, g) in self.glyphs.iter_mut().enumerate() {
            g.remaining_sec = 0.0;
            if g.shown != g.ch {
                g.shown = g.ch;
                sink.set_glyph_text(i, g.ch);
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        self.glyphs.iter().all(|g| !g.is_scrambling() && g.shown == g.ch)
    }

    pub fn glyphs(&self) -> &[ScrambleGlyph] {
        &self.glyphs
    }
}

/// Scrambled text bound to the shared pointer and live layout.
pub struct ScrambleEffect {
    text: RefCell<ScrambleText>,
    geometry: Box<dyn GeometryProvider>,
    sink: RefCell<Box<dyn GlyphTextSink>>,
    pointer: Rc<PointerTracker>,
    visible: Cell<bool>,
    last_timestamp_ms: Cell<Option<f64>>,
}

impl ScrambleEffect {
    pub fn new(
        text: ScrambleText,
        geometry: Box<dyn GeometryProvider>,
        sink: Box<dyn GlyphTextSink>,
        pointer: Rc<PointerTracker>,
    ) -> Rc<Self> {
        Rc::new(Self {
            text: RefCell::new(text),
            geometry,
            sink: RefCell::new(sink),
            pointer,
            visible: Cell::new(false),
            last_timestamp_ms: Cell::new(None),
        })
    }

    pub fn invalidate_layout(&self) {
        if let Ok(mut t) = self.text.try_borrow_mut() {
            t.mark_dirty();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn with_text<R>(&self, f: impl FnOnce(&ScrambleText) -> R) -> R {
        f(&self.text.borrow())
    }
}

impl FrameCallback for ScrambleEffect {
    fn on_frame(&self, timestamp_ms: f64) -> Result<(), EffectError> {
        if !self.visible.get() {
            return Ok(());
        }
        let dt_sec = match self.last_timestamp_ms.replace(Some(timestamp_ms)) {
            Some(prev) => (((timestamp_ms - prev) / 1000.0) as f32).clamp(0.0, SCRAMBLE_MAX_DT_SEC),
            None => SCRAMBLE_FRAME_SEC,
        };
        let mut text = self.text.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
        let mut sink = self.sink.try_borrow_mut().map_err(|_| EffectError::Reentrant)?;
        text.tick(self.pointer.get(), dt_sec, self.geometry.as_ref(), &mut **sink);
        Ok(())
    }
}

impl Gated for ScrambleEffect {
    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        self.last_timestamp_ms.set(None);
        if visible {
            self.invalidate_layout();
            return;
        }
        // Never leave scrambled characters behind while paused or unmounted.
        if let (Ok(mut t), Ok(mut sink)) = (self.text.try_borrow_mut(), self.sink.try_borrow_mut()) {
            t.settle(&mut **sink);
        }
    }
}
