// Web frontend tuning. Wheel behavior itself lives in `wheel_core::constants`.

pub const CANVAS_ID: &str = "app-canvas";

// Backing store is capped so 3x phones don't render at full native density.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// `WheelEvent.deltaMode` values
pub const DOM_DELTA_PIXEL: u32 = 0;
pub const DOM_DELTA_LINE: u32 = 1;
pub const DOM_DELTA_PAGE: u32 = 2;

// `PointerEvent.button` of the primary (left / touch / pen) button
pub const PRIMARY_BUTTON: i16 = 0;
