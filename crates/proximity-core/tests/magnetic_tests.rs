mod common;

use common::{pointer, pump, scheduler, FakeLayout, OffsetLog};
use glam::Vec2;
use proximity_core::*;

#[test]
fn target_follows_pointer_only_inside_box() {
    let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
    let inside = hover_target(PointerPosition::new(90.0, 30.0), rect, 0.3);
    assert!((inside - Vec2::new(12.0, 3.0)).length() < 1e-5);
    assert_eq!(hover_target(PointerPosition::new(150.0, 30.0), rect, 0.3), Vec2::ZERO);
    assert_eq!(hover_target(PointerPosition::OFFSCREEN, rect, 0.3), Vec2::ZERO);
}

#[test]
fn spring_settles_on_target_and_back_to_rest() {
    let mut s = MagneticSpring::new(MagneticConfig::default()).unwrap();
    let target = Vec2::new(12.0, 3.0);
    for _ in 0..300 {
        s.step(target, 1.0 / 60.0);
    }
    assert!((s.offset() - target).length() < 1e-3);
    for _ in 0..300 {
        s.step(Vec2::ZERO, 1.0 / 60.0);
    }
    assert!(s.is_at_rest());
}

#[test]
fn long_frame_gaps_are_clamped() {
    let mut s = MagneticSpring::new(MagneticConfig::default()).unwrap();
    // A multi-second stall (background tab) must not blow the spring up.
    let o = s.step(Vec2::new(12.0, 3.0), 5.0);
    assert!(o.length() < 12.5);
}

#[test]
fn invalid_config_is_rejected() {
    let c = MagneticConfig {
        stiffness: 0.0,
        ..MagneticConfig::default()
    };
    assert!(MagneticSpring::new(c).is_err());
}

#[test]
fn hovered_element_leans_then_returns() {
    let (s, slog) = scheduler();
    let (p, plog) = pointer();
    let layout = FakeLayout::new(Rect::new(0.0, 0.0, 100.0, 40.0), Vec::new());
    let out = OffsetLog::default();
    let effect = MagneticEffect::new(
        MagneticSpring::new(MagneticConfig::default()).unwrap(),
        Box::new(layout),
        Box::new(out.clone()),
        p.clone(),
    );
    let gate = VisibilityGate::new(
        effect.clone(),
        s.clone(),
        Some(p.clone()),
        GateOptions {
            root_margin_px: MAGNETIC_ROOT_MARGIN_PX,
            track_pointer: true,
        },
    );

    gate.observe(true);
    assert!(plog.attached.get());
    p.update(90.0, 30.0);
    let mut t = 0.0;
    for _ in 0..200 {
        t += 16.0;
        pump(&s, &slog, t);
    }
    assert!((effect.offset() - Vec2::new(12.0, 3.0)).length() < 0.05);
    assert!((out.0.get() - Vec2::new(12.0, 3.0)).length() < 0.1);

    p.update(500.0, 500.0);
    for _ in 0..300 {
        t += 16.0;
        pump(&s, &slog, t);
    }
    assert_eq!(effect.offset(), Vec2::ZERO);
    assert_eq!(out.0.get(), Vec2::ZERO);
    let writes = out.1.get();
    pump(&s, &slog, t + 16.0);
    assert_eq!(out.1.get(), writes, "no writes while resting");

    gate.teardown();
    assert!(s.is_empty());
}
