//! Palette table and key arithmetic.
//!
//! The wheel browses a table of `MAX_INDEX` five-color palettes. The table is
//! generated deterministically from the key so both frontends (and the tests)
//! agree on every color without shipping a dataset.

use crate::constants::{MAX_INDEX, PALETTE_CATEGORIES};
use palette::{Hsl, IntoColor, LinSrgb, Srgb};

/// Five sRGB colors shown side by side on one slot.
pub type Palette = [Srgb<f32>; PALETTE_CATEGORIES];

// Golden angle keeps neighbouring keys visually distinct.
const GOLDEN_ANGLE_DEG: f32 = 137.507_76;

/// Normalize any signed index into a palette key in `[0, max)`.
#[inline]
pub fn wrap_key(index: i64, max: i64) -> usize {
    index.rem_euclid(max.max(1)) as usize
}

/// Palette for a key; keys outside the table wrap.
pub fn palette_for_key(key: usize) -> Palette {
    let key = key % MAX_INDEX as usize;
    let base_hue = (key as f32 * GOLDEN_ANGLE_DEG) % 360.0;
    // Harmony rule cycles so that neighbouring palettes differ in structure too.
    let spread = match key % 4 {
        0 => 24.0,  // analogous
        1 => 72.0,  // wide analogous
        2 => 150.0, // split complementary
        _ => 180.0, // complementary
    };
    let sat_base = 0.45 + 0.35 * (((key * 7) % 11) as f32 / 10.0);
    let mut out = [Srgb::new(0.0, 0.0, 0.0); PALETTE_CATEGORIES];
    for (k, slot) in out.iter_mut().enumerate() {
        let t = k as f32 / (PALETTE_CATEGORIES - 1) as f32; // 0..1
        let hue = base_hue + spread * (t - 0.5);
        let lightness = 0.28 + 0.5 * ((k * 3 + key) % PALETTE_CATEGORIES) as f32
            / (PALETTE_CATEGORIES - 1) as f32;
        let saturation = (sat_base + 0.1 * (1.0 - t)).clamp(0.0, 1.0);
        let hsl: Hsl = Hsl::new(hue, saturation, lightness.clamp(0.0, 1.0));
        *slot = hsl.into_color();
    }
    out
}

/// Palette for a signed wheel index.
#[inline]
pub fn palette_for_index(index: i64) -> Palette {
    palette_for_key(wrap_key(index, MAX_INDEX))
}

/// Linear RGBA for shading.
#[inline]
pub fn to_linear_rgba(color: Srgb<f32>, alpha: f32) -> [f32; 4] {
    let lin: LinSrgb<f32> = color.into_linear();
    [lin.red, lin.green, lin.blue, alpha]
}
