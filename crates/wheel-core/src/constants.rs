use glam::Vec3;

// Shared wheel tuning constants used by both web and native frontends.

// Wheel model
pub const MAX_INDEX: i64 = 900; // palette table size; index wraps modulo this
pub const INIT_INDEX: i64 = MAX_INDEX / 2;
pub const NUM: usize = 8; // slots on the ring
pub const SLOT_COLOR_COUNT: usize = 36; // colored segments on the palette model
pub const PALETTE_CATEGORIES: usize = 5; // colors per palette

// Ring geometry
pub const RING_RADIUS: f32 = 2.0;

// Open/closed targets
pub const TILT_OPEN: f32 = 0.0;
pub const TILT_CLOSED: f32 = std::f32::consts::FRAC_PI_2;
pub const LATERAL_OPEN: [f32; 2] = [6.0, 0.0]; // (x, z)
pub const LATERAL_CLOSED: [f32; 2] = [-2.78, -1.85];

// Timing (milliseconds)
pub const INDEX_DEBOUNCE_MS: u64 = 20; // coalescing window for index steps
pub const CHAIN_STAGE_OFFSET_MS: u64 = 1000; // stage 2 starts at the latest this long after stage 1
pub const FADE_OPEN_DELAY_MS: u64 = 1000; // fade hold while the wheel is opening
pub const DRAG_DELAY_MS: u64 = 1000; // press must be held this long before drags count
pub const WHEEL_GESTURE_IDLE_MS: u64 = 120; // quiet time that ends a wheel gesture

// Gestures
pub const DRAG_THRESHOLD_PX: f32 = 0.5; // per-event jitter floor
pub const DRAG_STEPS_PER_VIEWPORT: f32 = 10.0; // one step per tenth of the viewport height

// Scroll intent classifier
pub const SCROLL_STABILITY: usize = 8; // deltas per comparison window
pub const SCROLL_SENSITIVITY: f32 = 100.0; // minimum average wheel delta for a tick
pub const SCROLL_TOLERANCE: f32 = 1.1;
pub const SCROLL_DELAY_MS: u64 = 150;

// Slot visuals
pub const ACTIVE_SCALE: f32 = 1.4; // centered slot pops out
pub const SCALE_SMOOTHING_PER_FRAME: f32 = 0.1; // lerp factor at 60 fps
pub const VISIBLE_OPACITY: f32 = 0.01; // swatches below this are not drawn
pub const SWATCH_SIZE: [f32; 3] = [0.4, 0.8, 0.1];
pub const SWATCH_SPACING: f32 = 3.3;

// Scene placement
pub const SCENE_ROTATION: [f32; 3] = [std::f32::consts::PI / 8.0, -std::f32::consts::PI / 3.2, 0.0];
pub const MODEL_POSITION: [f32; 3] = [-2.5, -2.5, 0.0];
pub const MODEL_SCALE: f32 = 1.8;
pub const SEGMENT_RING_RADIUS: f32 = 0.9;
pub const SEGMENT_SIZE: f32 = 0.14;
pub const FLOOR_Y: f32 = -2.5;
pub const FLOOR_SIZE: f32 = 25.0;
pub const FLOOR_OFFSET: [f32; 3] = [3.0, -2.0, -0.001]; // in floor-local space

// Camera
pub const CAMERA_EYE: [f32; 3] = [0.0, -10.0, 50.0];
pub const CAMERA_FOV_DEG: f32 = 20.0;
pub const CAMERA_ZOOM: f32 = 1.5;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const FOG_NEAR: f32 = 50.0;
pub const FOG_FAR: f32 = 60.0;

// Picking
pub const SLOT_PICK_RADIUS: f32 = 0.9;
pub const SEGMENT_PICK_RADIUS: f32 = 0.25;

// Compositor
pub const REFLECTION_SIZE: u32 = 512;
pub const REFLECTION_EVERY_N_FRAMES: u32 = 3;

#[inline]
pub fn model_position_vec3() -> Vec3 {
    Vec3::from(MODEL_POSITION)
}
