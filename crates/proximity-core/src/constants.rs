// Shared tuning constants for the proximity effects. Values match the
// look of the portfolio site; most are heuristics rather than invariants.

// Pointer
pub const OFFSCREEN_COORD: f32 = -9999.0; // sentinel meaning "no pointer seen yet"

// Particle field physics (per-tick gains, frame-rate dependent on purpose)
pub const MAGNET_GAIN: f32 = 0.08; // ring attraction gain at the pointer
pub const HOME_GAIN: f32 = 0.02; // relaxation gain toward the home position
pub const FRICTION: f32 = 0.92; // velocity multiplier applied every tick

// Particle field rendering
pub const GLOW_SPEED_GAIN: f32 = 0.1; // alpha added per px/tick of speed
pub const LINK_DISTANCE: f32 = 50.0; // max distance for a connecting line
pub const LINK_RADIUS_FACTOR: f32 = 1.2; // links only near the pointer (x magnet radius)
pub const LINK_MAX_PARTICLES: usize = 120; // skip link pass above this count
pub const LINK_MAX_ALPHA: f32 = 0.15;
pub const LINK_WIDTH: f32 = 0.5;

// Particle field sizing
pub const MAX_PIXEL_RATIO: f64 = 1.5; // never oversample beyond this
pub const NARROW_VIEWPORT_PX: f64 = 1024.0;
pub const NARROW_VIEWPORT_MAX_PARTICLES: usize = 60;
pub const RESIZE_DEBOUNCE_MS: u32 = 150;

// Particle appearance ranges
pub const SIZE_MIN_FACTOR: f32 = 0.5;
pub const SIZE_SPAN_FACTOR: f32 = 0.8;
pub const ALPHA_MIN: f32 = 0.3;
pub const ALPHA_SPAN: f32 = 0.7;

// Proximity text
pub const POINTER_SMOOTHING: f32 = 0.15; // fraction of remaining distance per tick
pub const SMOOTHING_SNAP_PX: f32 = 0.05;
pub const GAUSSIAN_SIGMA_FACTOR: f32 = 0.5; // sigma = radius * factor

// Magnetic element (spring is unit mass)
pub const MAGNETIC_MAX_DT_SEC: f32 = 1.0 / 30.0;
pub const MAGNETIC_REST_EPSILON_PX: f32 = 0.01;

// Scrambled text
pub const SCRAMBLE_FRAME_SEC: f32 = 1.0 / 60.0; // glyph swap interval at speed 1
pub const SCRAMBLE_MAX_DT_SEC: f32 = 0.1; // longer gaps (background tab) count as this

// Visibility pre-entry margins
pub const PARTICLE_ROOT_MARGIN_PX: u32 = 100;
pub const TEXT_ROOT_MARGIN_PX: u32 = 100;
pub const MAGNETIC_ROOT_MARGIN_PX: u32 = 0;
pub const SCRAMBLE_ROOT_MARGIN_PX: u32 = 0;
