//! Scene composition: camera, per-instance transforms, and picking.
//!
//! Hierarchy (outermost first):
//! scene root rotation → wheel lateral offset and tilt → ring spin → slot
//! placement, rotation offset and scale → five swatches per slot.
//! The palette model with its 36 segments and the reflective floor hang off
//! the scene root too.

use crate::animation::WheelPose;
use crate::compositor::Plane;
use crate::constants::{
    model_position_vec3, CAMERA_EYE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_ZOOM,
    FLOOR_OFFSET, FLOOR_SIZE, FLOOR_Y, MODEL_SCALE, NUM, PALETTE_CATEGORIES, SCENE_ROTATION,
    SEGMENT_PICK_RADIUS, SEGMENT_RING_RADIUS, SEGMENT_SIZE, SLOT_COLOR_COUNT, SLOT_PICK_RADIUS,
    SWATCH_SIZE, SWATCH_SPACING, VISIBLE_OPACITY,
};
use crate::layout::{centered_slot, SlotRenderParams};
use crate::palette::{palette_for_key, to_linear_rgba};
use crate::state::WheelSnapshot;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};
use smallvec::SmallVec;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Perspective camera looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f32,
    /// Narrows the field of view; 2.0 shows half as much.
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::from(CAMERA_EYE),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg: CAMERA_FOV_DEG,
            zoom: CAMERA_ZOOM,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            aspect: 1.0,
        }
    }
}

impl Camera {
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn effective_fov(&self) -> f32 {
        let half = (self.fov_y_deg.to_radians() * 0.5).tan() / self.zoom.max(f32::EPSILON);
        2.0 * half.atan()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.effective_fov(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray through a pixel of a `width × height` viewport.
    pub fn screen_ray(&self, px: Vec2, width: f32, height: f32) -> Ray {
        let ndc_x = 2.0 * px.x / width.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * px.y / height.max(1.0);
        let inv = self.view_proj().inverse();
        let far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        Ray {
            origin: self.eye,
            dir: (far - self.eye).normalize_or_zero(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Distance along a normalized ray to the first sphere hit in front of it.
#[inline]
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// One instanced box: world transform and linear RGBA (alpha = opacity).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub model: Mat4,
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickHit {
    Slot(usize),
    Segment(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PickSphere {
    hit: PickHit,
    center: Vec3,
    radius: f32,
}

/// Everything the renderer draws in one frame.
#[derive(Clone, Debug, Default)]
pub struct SceneFrame {
    pub swatches: Vec<Instance>,
    pub segments: Vec<Instance>,
    pub floor: Mat4,
    pub floor_plane: Option<Plane>,
    pub active_slot: Option<usize>,
    pickables: Vec<PickSphere>,
}

impl SceneFrame {
    /// Nearest slot or segment under the ray. Hidden slots are not pickable.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.pickables
            .iter()
            .filter_map(|p| ray_sphere(ray, p.center, p.radius).map(|t| (t, p.hit)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit)
    }

    pub fn plane(&self) -> Plane {
        self.floor_plane.unwrap_or_else(floor_plane)
    }
}

#[inline]
pub fn scene_root() -> Mat4 {
    let [x, y, z] = SCENE_ROTATION;
    Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, x, y, z))
}

pub fn floor_transform() -> Mat4 {
    scene_root()
        * Mat4::from_translation(Vec3::new(0.0, FLOOR_Y, 0.0))
        * Mat4::from_rotation_x(-FRAC_PI_2)
        * Mat4::from_translation(Vec3::from(FLOOR_OFFSET))
        * Mat4::from_scale(Vec3::new(FLOOR_SIZE, FLOOR_SIZE, 1.0))
}

/// The floor in world space; its normal points up out of the quad.
pub fn floor_plane() -> Plane {
    let m = floor_transform();
    let point = m.transform_point3(Vec3::ZERO);
    let normal = m.transform_vector3(Vec3::Z);
    Plane::from_point_normal(point, normal)
}

/// Transform of the spinning ring, shared by every slot.
pub fn ring_transform(pose: &WheelPose) -> Mat4 {
    scene_root()
        * Mat4::from_translation(Vec3::new(pose.lateral.x, 0.0, pose.lateral.y))
        * Mat4::from_rotation_y(pose.tilt)
        * Mat4::from_rotation_x(pose.spin)
}

pub fn compose(snapshot: &WheelSnapshot, layout: &[SlotRenderParams], pose: &WheelPose) -> SceneFrame {
    let mut frame = SceneFrame {
        swatches: Vec::with_capacity(NUM * PALETTE_CATEGORIES),
        segments: Vec::with_capacity(SLOT_COLOR_COUNT),
        floor: floor_transform(),
        floor_plane: Some(floor_plane()),
        active_slot: centered_slot(layout),
        pickables: Vec::with_capacity(NUM + SLOT_COLOR_COUNT),
    };

    let ring = ring_transform(pose);
    let swatch_scale = Vec3::from(SWATCH_SIZE);
    for (slot, params) in layout.iter().enumerate() {
        let Some(slot_pose) = pose.slots.get(slot) else {
            continue;
        };
        if slot_pose.opacity <= VISIBLE_OPACITY {
            continue;
        }
        let slot_m = ring
            * Mat4::from_translation(params.position)
            * Mat4::from_rotation_x(params.rotation_offset)
            * Mat4::from_scale(Vec3::splat(slot_pose.scale));
        let palette = palette_for_key(params.palette_index);
        for (k, color) in palette.iter().enumerate() {
            let x = (k as f32 - 2.5) / SWATCH_SPACING;
            frame.swatches.push(Instance {
                model: slot_m
                    * Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
                    * Mat4::from_scale(swatch_scale),
                color: to_linear_rgba(*color, slot_pose.opacity),
            });
        }
        frame.pickables.push(PickSphere {
            hit: PickHit::Slot(slot),
            center: slot_m.transform_point3(Vec3::ZERO),
            radius: SLOT_PICK_RADIUS * slot_pose.scale,
        });
    }

    let model = scene_root()
        * Mat4::from_translation(model_position_vec3())
        * Mat4::from_scale(Vec3::splat(MODEL_SCALE));
    for (segment, category) in snapshot.slot_colors.iter().enumerate() {
        let angle = TAU * segment as f32 / SLOT_COLOR_COUNT as f32;
        let local = Vec3::new(angle.cos(), 0.0, angle.sin()) * SEGMENT_RING_RADIUS;
        let seg_m = model
            * Mat4::from_translation(local)
            * Mat4::from_rotation_y(-angle)
            * Mat4::from_scale(Vec3::splat(SEGMENT_SIZE));
        let color = snapshot
            .active_palette
            .get(*category as usize)
            .copied()
            .unwrap_or_default();
        frame.segments.push(Instance {
            model: seg_m,
            color: to_linear_rgba(color, 1.0),
        });
        frame.pickables.push(PickSphere {
            hit: PickHit::Segment(segment),
            center: seg_m.transform_point3(Vec3::ZERO),
            radius: SEGMENT_PICK_RADIUS,
        });
    }

    frame
}
