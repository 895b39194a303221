// Fakes for every platform seam so the engine runs host-side.

#![allow(dead_code)]

use glam::Vec2;
use proximity_core::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Default)]
pub struct ListenerLog {
    pub attached: Cell<bool>,
    pub attach_calls: Cell<usize>,
    pub detach_calls: Cell<usize>,
}

pub struct FakePointerSource(pub Rc<ListenerLog>);

impl PointerSource for FakePointerSource {
    fn attach(&mut self, _tracker: Weak<PointerTracker>) {
        self.0.attached.set(true);
        self.0.attach_calls.set(self.0.attach_calls.get() + 1);
    }
    fn detach(&mut self) {
        self.0.attached.set(false);
        self.0.detach_calls.set(self.0.detach_calls.get() + 1);
    }
}

pub fn pointer() -> (Rc<PointerTracker>, Rc<ListenerLog>) {
    let log = Rc::new(ListenerLog::default());
    (PointerTracker::new(FakePointerSource(log.clone())), log)
}

#[derive(Default)]
pub struct DriverLog {
    pub pending: Cell<bool>,
    pub requests: Cell<usize>,
    pub cancels: Cell<usize>,
}

pub struct ManualDriver(pub Rc<DriverLog>);

impl FrameDriver for ManualDriver {
    fn request_frame(&mut self, _scheduler: Weak<FrameScheduler>) {
        self.0.pending.set(true);
        self.0.requests.set(self.0.requests.get() + 1);
    }
    fn cancel_frame(&mut self) {
        self.0.pending.set(false);
        self.0.cancels.set(self.0.cancels.get() + 1);
    }
}

pub fn scheduler() -> (Rc<FrameScheduler>, Rc<DriverLog>) {
    let log = Rc::new(DriverLog::default());
    (FrameScheduler::new(ManualDriver(log.clone())), log)
}

/// Run one frame if the driver has one pending, like the browser would.
pub fn pump(s: &FrameScheduler, log: &DriverLog, timestamp_ms: f64) -> bool {
    if !log.pending.replace(false) {
        return false;
    }
    s.run_frame(timestamp_ms);
    true
}

#[derive(Default)]
pub struct SurfaceLog {
    pub clears: usize,
    pub circles: usize,
    pub lines: usize,
    pub max_alpha: f32,
}

#[derive(Clone, Default)]
pub struct CountingSurface(pub Rc<RefCell<SurfaceLog>>);

impl Surface2d for CountingSurface {
    fn clear(&mut self, _w: u32, _h: u32) -> Result<(), EffectError> {
        self.0.borrow_mut().clears += 1;
        Ok(())
    }
    fn fill_circle(&mut self, _c: Vec2, _r: f32, _color: &str, alpha: f32) -> Result<(), EffectError> {
        let mut l = self.0.borrow_mut();
        l.circles += 1;
        l.max_alpha = l.max_alpha.max(alpha);
        Ok(())
    }
    fn stroke_line(&mut self, _a: Vec2, _b: Vec2, _color: &str, _alpha: f32, _w: f32) -> Result<(), EffectError> {
        self.0.borrow_mut().lines += 1;
        Ok(())
    }
}

pub struct FixedSurface {
    pub rect: Rect,
    pub backing: (u32, u32),
}

impl SurfaceGeometry for FixedSurface {
    fn surface_rect(&self) -> Option<Rect> {
        Some(self.rect)
    }
    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }
}

/// Layout fake: container box plus glyph boxes that tests can edit.
#[derive(Clone, Default)]
pub struct FakeLayout {
    pub container: Rc<Cell<Option<Rect>>>,
    pub glyphs: Rc<RefCell<Vec<Option<Rect>>>>,
    pub glyph_reads: Rc<Cell<usize>>,
}

impl FakeLayout {
    pub fn new(container: Rect, glyphs: Vec<Rect>) -> Self {
        Self {
            container: Rc::new(Cell::new(Some(container))),
            glyphs: Rc::new(RefCell::new(glyphs.into_iter().map(Some).collect())),
            glyph_reads: Rc::new(Cell::new(0)),
        }
    }
}

impl GeometryProvider for FakeLayout {
    fn container_rect(&self) -> Option<Rect> {
        self.container.get()
    }
    fn glyph_rect(&self, index: usize) -> Option<Rect> {
        self.glyph_reads.set(self.glyph_reads.get() + 1);
        self.glyphs.borrow().get(index).copied().flatten()
    }
}

impl ElementGeometry for FakeLayout {
    fn element_rect(&self) -> Option<Rect> {
        self.container.get()
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink(pub Rc<RefCell<HashMap<usize, String>>>, pub Rc<Cell<usize>>);

impl GlyphStyleSink for RecordingSink {
    fn set_variation_settings(&mut self, index: usize, settings: &str) {
        self.0.borrow_mut().insert(index, settings.to_string());
        self.1.set(self.1.get() + 1);
    }
}

/// Character currently written to each glyph cell, plus a write count.
#[derive(Clone, Default)]
pub struct TextLog(pub Rc<RefCell<HashMap<usize, char>>>, pub Rc<Cell<usize>>);

impl GlyphTextSink for TextLog {
    fn set_glyph_text(&mut self, index: usize, ch: char) {
        self.0.borrow_mut().insert(index, ch);
        self.1.set(self.1.get() + 1);
    }
}

#[derive(Clone, Default)]
pub struct OffsetLog(pub Rc<Cell<Vec2>>, pub Rc<Cell<usize>>);

impl OffsetSink for OffsetLog {
    fn set_offset(&mut self, offset: Vec2) {
        self.0.set(offset);
        self.1.set(self.1.get() + 1);
    }
}

#[derive(Default)]
pub struct ObserverLog {
    pub disconnected: Cell<bool>,
}

pub struct FakeObserver(pub Rc<ObserverLog>);

impl ViewportObserver for FakeObserver {
    fn disconnect(&mut self) {
        self.0.disconnected.set(true);
    }
}

/// Gated callback that only counts ticks and visibility changes.
#[derive(Default)]
pub struct CountingEffect {
    pub ticks: Cell<usize>,
    pub visible: Cell<bool>,
    pub enters: Cell<usize>,
}

impl FrameCallback for CountingEffect {
    fn on_frame(&self, _t: f64) -> Result<(), EffectError> {
        self.ticks.set(self.ticks.get() + 1);
        Ok(())
    }
}

impl Gated for CountingEffect {
    fn set_visible(&self, visible: bool) {
        if visible && !self.visible.get() {
            self.enters.set(self.enters.get() + 1);
        }
        self.visible.set(visible);
    }
}
