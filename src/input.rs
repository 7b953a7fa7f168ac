use crate::constants::{DOM_DELTA_LINE, DOM_DELTA_PAGE, DOM_DELTA_PIXEL, MAX_DEVICE_PIXEL_RATIO, PRIMARY_BUTTON};
use glam::Vec2;
use wheel_core::{key_command, DeltaMode, KeyCommand};

/// Map `WheelEvent.deltaMode`; unknown modes are treated as pixels.
#[inline]
pub fn delta_mode(dom_mode: u32) -> DeltaMode {
    match dom_mode {
        DOM_DELTA_PIXEL => DeltaMode::Pixel,
        DOM_DELTA_LINE => DeltaMode::Line,
        DOM_DELTA_PAGE => DeltaMode::Page,
        _ => DeltaMode::Pixel,
    }
}

/// Client (CSS) coordinates to canvas backing-store pixels.
///
/// `rect_origin`/`rect_size` come from `getBoundingClientRect`, `canvas_size`
/// is the backing store. A collapsed rect passes CSS offsets through.
#[inline]
pub fn client_to_canvas_px(client: Vec2, rect_origin: Vec2, rect_size: Vec2, canvas_size: Vec2) -> Vec2 {
    let css = client - rect_origin;
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return css;
    }
    css / rect_size * canvas_size
}

/// Backing-store size for a CSS box at the given device pixel ratio.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    };
    let w = (css_width.max(0.0) * dpr) as u32;
    let h = (css_height.max(0.0) * dpr) as u32;
    (w.max(1), h.max(1))
}

#[inline]
pub fn is_primary_button(button: i16) -> bool {
    button == PRIMARY_BUTTON
}

/// Key commands whose browser default (page scroll, button activation)
/// must be suppressed.
#[inline]
pub fn suppresses_default(key: &str) -> bool {
    matches!(
        key_command(key),
        Some(KeyCommand::Step(_)) | Some(KeyCommand::ToggleOpen)
    )
}

/// Auto-repeat only makes sense for index steps.
#[inline]
pub fn accepts_repeat(command: KeyCommand) -> bool {
    matches!(command, KeyCommand::Step(_))
}
