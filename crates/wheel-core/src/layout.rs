//! Slot Layout Engine.
//!
//! Maps `(index, is_open)` to the per-slot render parameters of the ring. A
//! small fixed ring (8 slots) shows a window onto the much longer palette
//! sequence; the rotation correction keeps keys and weights moving with the
//! ring's spin so index steps read as one continuous rotation.

use crate::constants::{MAX_INDEX, NUM, RING_RADIUS};
use glam::Vec3;
use smallvec::SmallVec;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotRenderParams {
    pub position: Vec3,
    pub palette_index: usize,
    pub alpha_weight: f32,
    pub rotation_offset: f32,
}

pub type SlotLayout = SmallVec<[SlotRenderParams; NUM]>;

/// Exponential ease-in-out: flat near both ends, steep around 0.5.
pub fn ease_in_out_expo(x: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else if x < 0.5 {
        2.0_f32.powf(20.0 * x - 10.0) / 2.0
    } else {
        (2.0 - 2.0_f32.powf(-20.0 * x + 10.0)) / 2.0
    }
}

/// Ring shape; `Default` is the shipped 8-slot, 900-key wheel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingConfig {
    pub slots: usize,
    pub max_index: i64,
    pub radius: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            slots: NUM,
            max_index: MAX_INDEX,
            radius: RING_RADIUS,
        }
    }
}

impl RingConfig {
    #[inline]
    pub fn slot_angle(&self, slot: usize) -> f32 {
        TAU * slot as f32 / self.slots as f32
    }

    /// Fixed ring position of a slot, independent of index and open state.
    #[inline]
    pub fn slot_position(&self, slot: usize) -> Vec3 {
        let a = self.slot_angle(slot);
        Vec3::new(0.0, -self.radius * a.sin(), -self.radius * a.cos())
    }

    /// Bell-shaped emphasis peaking at the middle slot.
    pub fn falloff(&self, slot: usize) -> f32 {
        let n = self.slots as f32;
        let d = (slot as f32 - n / 2.0).abs();
        ease_in_out_expo(1.0 - 2.0 * d / n)
    }

    /// Rotation correction: how many places keys and weights shift right.
    /// Truncated remainder, then absolute value, so negative indices shift too.
    #[inline]
    pub fn rotation_shift(&self, index: i64) -> usize {
        (index % self.slots as i64).unsigned_abs() as usize
    }

    pub fn layout(&self, index: i64, is_open: bool) -> SlotLayout {
        let n = self.slots;
        if n == 0 {
            return SlotLayout::new();
        }
        let center_offset = index.wrapping_sub((n / 2) as i64);
        let mut keys: SmallVec<[usize; NUM]> = (0..n)
            .map(|i| {
                let key = center_offset.wrapping_add(i as i64);
                key.rem_euclid(self.max_index.max(1)) as usize
            })
            .collect();
        let mut weights: SmallVec<[f32; NUM]> = (0..n).map(|i| self.falloff(i)).collect();

        let shift = self.rotation_shift(index) % n;
        keys.rotate_right(shift);
        weights.rotate_right(shift);

        if !is_open {
            for w in weights.iter_mut() {
                *w = if (*w - 1.0).abs() <= f32::EPSILON { 1.0 } else { 0.0 };
            }
        }

        (0..n)
            .map(|i| SlotRenderParams {
                position: self.slot_position(i),
                palette_index: keys[i],
                alpha_weight: weights[i],
                rotation_offset: -self.slot_angle(i),
            })
            .collect()
    }
}

/// Layout of the default ring.
#[inline]
pub fn layout(index: i64, is_open: bool) -> SlotLayout {
    RingConfig::default().layout(index, is_open)
}

/// The slot showing the full-weight palette, if any.
pub fn centered_slot(layout: &[SlotRenderParams]) -> Option<usize> {
    layout
        .iter()
        .position(|p| (p.alpha_weight - 1.0).abs() <= f32::EPSILON)
}
