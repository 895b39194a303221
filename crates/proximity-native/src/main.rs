use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use instant::Instant;
use proximity_core::{
    EffectError, ElementGeometry, FrameDriver, FrameScheduler, GateOptions, GeometryProvider,
    GlyphStyleSink, MagneticConfig, MagneticEffect, MagneticSpring, OffsetSink, ParticleConfig,
    ParticleEffect, ParticleField, PointerSource, PointerTracker, ProximityConfig,
    ProximityEffect, ProximityText, Rect, Surface2d, SurfaceGeometry, VisibilityGate,
    MAGNETIC_ROOT_MARGIN_PX, PARTICLE_ROOT_MARGIN_PX, TEXT_ROOT_MARGIN_PX,
};

const FRAME_MS: f64 = 1000.0 / 60.0;
const SURFACE: (u32, u32) = (800, 600);
const GLYPH_W: f32 = 24.0;
const GLYPH_H: f32 = 40.0;

/// Frames are pumped by the harness loop instead of a display.
#[derive(Default)]
struct ManualDriver {
    pending: Rc<Cell<bool>>,
}

impl FrameDriver for ManualDriver {
    fn request_frame(&mut self, _scheduler: Weak<FrameScheduler>) {
        self.pending.set(true);
    }

    fn cancel_frame(&mut self) {
        self.pending.set(false);
    }
}

/// Pointer positions are injected directly.
struct SyntheticSource;

impl PointerSource for SyntheticSource {
    fn attach(&mut self, _tracker: Weak<PointerTracker>) {}
    fn detach(&mut self) {}
}

#[derive(Default)]
struct DrawStats {
    circles: usize,
    lines: usize,
}

struct StatsSurface(Rc<RefCell<DrawStats>>);

impl Surface2d for StatsSurface {
    fn clear(&mut self, _w: u32, _h: u32) -> Result<(), EffectError> {
        Ok(())
    }

    fn fill_circle(&mut self, _c: Vec2, _r: f32, _color: &str, _a: f32) -> Result<(), EffectError> {
        self.0.borrow_mut().circles += 1;
        Ok(())
    }

    fn stroke_line(
        &mut self,
        _from: Vec2,
        _to: Vec2,
        _color: &str,
        _alpha: f32,
        _width: f32,
    ) -> Result<(), EffectError> {
        self.0.borrow_mut().lines += 1;
        Ok(())
    }
}

/// Surface pinned at the viewport origin at 1:1 pixel ratio.
struct OriginSurface;

impl SurfaceGeometry for OriginSurface {
    fn surface_rect(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, SURFACE.0 as f32, SURFACE.1 as f32))
    }

    fn backing_size(&self) -> (u32, u32) {
        SURFACE
    }
}

/// A single line of fixed-advance glyphs starting at `origin`.
struct MonospaceLine {
    origin: Vec2,
    glyphs: usize,
}

impl GeometryProvider for MonospaceLine {
    fn container_rect(&self) -> Option<Rect> {
        Some(Rect::new(
            self.origin.x,
            self.origin.y,
            GLYPH_W * self.glyphs as f32,
            GLYPH_H,
        ))
    }

    fn glyph_rect(&self, index: usize) -> Option<Rect> {
        (index < self.glyphs).then(|| {
            Rect::new(
                self.origin.x + GLYPH_W * index as f32,
                self.origin.y,
                GLYPH_W,
                GLYPH_H,
            )
        })
    }
}

struct StyleCounter(Rc<Cell<usize>>);

impl GlyphStyleSink for StyleCounter {
    fn set_variation_settings(&mut self, _index: usize, _settings: &str) {
        self.0.set(self.0.get() + 1);
    }
}

struct FixedBox(Rect);

impl ElementGeometry for FixedBox {
    fn element_rect(&self) -> Option<Rect> {
        Some(self.0)
    }
}

struct LastOffset(Rc<Cell<Vec2>>);

impl OffsetSink for LastOffset {
    fn set_offset(&mut self, offset: Vec2) {
        self.0.set(offset);
    }
}

/// Pointer path: a slow orbit around the surface center.
fn pointer_at(frame: usize) -> Vec2 {
    let t = frame as f32 / 120.0;
    Vec2::new(400.0 + 150.0 * t.cos(), 300.0 + 100.0 * t.sin())
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let frames: usize = match std::env::args().nth(1) {
        Some(s) => s.parse()?,
        None => 600,
    };

    let driver = ManualDriver::default();
    let pending = driver.pending.clone();
    let scheduler = FrameScheduler::new(driver);
    let pointer = PointerTracker::new(SyntheticSource);

    let draw = Rc::new(RefCell::new(DrawStats::default()));
    let config = ParticleConfig::default();
    let (ring_radius, magnet_radius) = (config.ring_radius, config.magnet_radius);
    let mut field = ParticleField::new(config, 7)?;
    field.resize(SURFACE.0, SURFACE.1, 1280.0);
    let particles = ParticleEffect::new(
        field,
        Box::new(StatsSurface(draw.clone())),
        Box::new(OriginSurface),
        pointer.clone(),
    );
    let particle_gate = VisibilityGate::new(
        particles.clone(),
        scheduler.clone(),
        Some(pointer.clone()),
        GateOptions {
            root_margin_px: PARTICLE_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );

    let label = "proximity harness";
    let text = ProximityText::new(&ProximityConfig {
        label: label.to_string(),
        radius: 80.0,
        ..ProximityConfig::default()
    })?;
    let glyphs = text.glyphs().len();
    let writes = Rc::new(Cell::new(0));
    let text_effect = ProximityEffect::new(
        text,
        Box::new(MonospaceLine {
            origin: Vec2::new(250.0, 280.0),
            glyphs,
        }),
        Box::new(StyleCounter(writes.clone())),
        pointer.clone(),
    );
    let text_gate = VisibilityGate::new(
        text_effect.clone(),
        scheduler.clone(),
        Some(pointer.clone()),
        GateOptions {
            root_margin_px: TEXT_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );

    let offset = Rc::new(Cell::new(Vec2::ZERO));
    let magnetic = MagneticEffect::new(
        MagneticSpring::new(MagneticConfig::default())?,
        Box::new(FixedBox(Rect::new(500.0, 250.0, 120.0, 48.0))),
        Box::new(LastOffset(offset.clone())),
        pointer.clone(),
    );
    let magnetic_gate = VisibilityGate::new(
        magnetic,
        scheduler.clone(),
        Some(pointer.clone()),
        GateOptions {
            root_margin_px: MAGNETIC_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );

    for gate in [&particle_gate, &text_gate, &magnetic_gate] {
        gate.observe(true);
    }
    log::info!(
        "[harness] {} callbacks, {} pointer subscribers, {} frames",
        scheduler.len(),
        pointer.subscriber_count(),
        frames
    );

    let started = Instant::now();
    let mut worst_ms = 0.0f64;
    for i in 0..frames {
        if !pending.replace(false) {
            log::warn!("[harness] loop stopped at frame {}", i);
            break;
        }
        let p = pointer_at(i);
        pointer.update(p.x, p.y);
        let t0 = Instant::now();
        scheduler.run_frame(i as f64 * FRAME_MS);
        worst_ms = worst_ms.max(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let total = started.elapsed();

    let last = pointer.get().as_vec2();
    // Only particles inside the magnet radius are expected on the ring.
    let (captured, ring_error) = particles.with_field(|f| {
        let errors: Vec<f32> = f
            .particles()
            .iter()
            .map(|p| p.pos.distance(last))
            .filter(|d| *d < magnet_radius)
            .map(|d| (d - ring_radius).abs())
            .collect();
        let n = errors.len();
        (n, errors.iter().sum::<f32>() / n.max(1) as f32)
    });
    let peak_weight = text_effect.with_text(|t| {
        t.glyphs()
            .iter()
            .map(|g| g.weight)
            .fold(0.0f32, f32::max)
    });
    let stats = draw.borrow();
    log::info!(
        "[harness] {} frames in {:.1}ms (avg {:.3}ms, worst {:.3}ms)",
        frames,
        total.as_secs_f64() * 1000.0,
        total.as_secs_f64() * 1000.0 / frames.max(1) as f64,
        worst_ms
    );
    log::info!(
        "[harness] particles: {} captured, mean ring error {:.2}px, {} circles, {} links drawn",
        captured,
        ring_error,
        stats.circles,
        stats.lines
    );
    log::info!(
        "[harness] text: {} glyphs, peak weight {:.2}, {} style writes",
        glyphs,
        peak_weight,
        writes.get()
    );
    log::info!("[harness] magnetic offset {:?}", offset.get());

    for gate in [&particle_gate, &text_gate, &magnetic_gate] {
        gate.teardown();
    }
    if !scheduler.is_empty() || pointer.is_attached() {
        anyhow::bail!("teardown left registrations behind");
    }
    log::info!("[harness] torn down; scheduler idle");
    Ok(())
}
