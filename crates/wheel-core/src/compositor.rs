//! Dual-Pass Compositor planning.
//!
//! Decides per frame which passes run and into which target, and derives the
//! mirrored camera used by the reflection pass. The GPU side only executes the
//! resulting [`FramePlan`].

use crate::constants::{REFLECTION_EVERY_N_FRAMES, REFLECTION_SIZE};
use glam::{Mat4, Vec3, Vec4};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassTarget {
    /// Fixed-size off-screen reflection texture.
    Reflection,
    /// Viewport-sized HDR scene color.
    Hdr,
    /// The presentable surface.
    Surface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    Reflection,
    Main,
    Composite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassStep {
    pub kind: PassKind,
    pub target: PassTarget,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePlan {
    pub frame: u64,
    pub render_reflection: bool,
    pub passes: SmallVec<[PassStep; 3]>,
}

impl FramePlan {
    /// True when the main pass samples last frame's reflection.
    pub fn reuses_stale_reflection(&self) -> bool {
        !self.render_reflection
    }

    pub fn position(&self, kind: PassKind) -> Option<usize> {
        self.passes.iter().position(|p| p.kind == kind)
    }
}

/// Throttles the reflection pass to every `every_n`th frame.
///
/// The first frame, and the first frame after [`invalidate`](Self::invalidate),
/// always renders it so the main pass never samples an empty texture.
#[derive(Clone, Debug)]
pub struct ReflectionSchedule {
    every_n: u32,
    frame: u64,
    has_texture: bool,
}

impl Default for ReflectionSchedule {
    fn default() -> Self {
        Self::new(REFLECTION_EVERY_N_FRAMES)
    }
}

impl ReflectionSchedule {
    pub fn new(every_n: u32) -> Self {
        Self {
            every_n: every_n.max(1),
            frame: 0,
            has_texture: false,
        }
    }

    #[inline]
    pub fn every_n(&self) -> u32 {
        self.every_n
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The reflection texture was recreated; render it on the next frame.
    pub fn invalidate(&mut self) {
        self.has_texture = false;
    }

    pub fn plan(&mut self) -> FramePlan {
        let frame = self.frame;
        let render_reflection = !self.has_texture || frame % self.every_n as u64 == 0;
        let mut passes = SmallVec::new();
        if render_reflection {
            passes.push(PassStep {
                kind: PassKind::Reflection,
                target: PassTarget::Reflection,
            });
        }
        passes.push(PassStep {
            kind: PassKind::Main,
            target: PassTarget::Hdr,
        });
        passes.push(PassStep {
            kind: PassKind::Composite,
            target: PassTarget::Surface,
        });
        self.has_texture = true;
        self.frame += 1;
        FramePlan {
            frame,
            render_reflection,
            passes,
        }
    }
}

/// Pixel sizes of the off-screen targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetSizes {
    pub reflection: (u32, u32),
    pub main: (u32, u32),
}

impl TargetSizes {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            reflection: (REFLECTION_SIZE, REFLECTION_SIZE),
            main: (width.max(1), height.max(1)),
        }
    }

    /// Track the viewport. Zero sizes (minimized window) are ignored.
    /// Returns true when the main size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || self.main == (width, height) {
            return false;
        }
        self.main = (width, height);
        true
    }
}

/// Plane `normal · p + d = 0` with a unit normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    /// Packed for shaders: `xyz` normal, `w` offset.
    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        self.normal.extend(self.d)
    }

    /// Householder reflection across the plane.
    pub fn reflection_matrix(&self) -> Mat4 {
        let n = self.normal;
        let d = self.d;
        Mat4::from_cols(
            Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z, 0.0),
            Vec4::new(-2.0 * n.y * n.x, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z, 0.0),
            Vec4::new(-2.0 * n.z * n.x, -2.0 * n.z * n.y, 1.0 - 2.0 * n.z * n.z, 0.0),
            Vec4::new(-2.0 * d * n.x, -2.0 * d * n.y, -2.0 * d * n.z, 1.0),
        )
    }
}

/// Clip space to texture space (`y` flipped, wgpu UV origin top-left).
pub fn uv_bias() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.5, 0.5, 0.0, 1.0),
    )
}

/// Camera for the reflection pass and the matrix the floor uses to sample it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReflectionCamera {
    pub view: Mat4,
    pub view_proj: Mat4,
    pub texture_matrix: Mat4,
    pub clip_plane: Vec4,
}

impl ReflectionCamera {
    pub fn new(view: Mat4, proj: Mat4, plane: &Plane) -> Self {
        let mirrored = view * plane.reflection_matrix();
        let view_proj = proj * mirrored;
        Self {
            view: mirrored,
            view_proj,
            texture_matrix: uv_bias() * view_proj,
            clip_plane: plane.to_vec4(),
        }
    }
}
