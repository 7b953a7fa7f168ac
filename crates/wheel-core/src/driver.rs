use crate::animation::WheelAnimator;
use crate::compositor::ReflectionCamera;
use crate::layout::{centered_slot, RingConfig, SlotLayout, SlotRenderParams};
use crate::palette::palette_for_key;
use crate::scene::{compose, Camera, PickHit, SceneFrame};
use crate::state::WheelState;
use glam::Vec2;
use instant::Instant;

/// Per-frame glue between the store, the layout engine, the animator and the
/// scene. Both frontends drive one of these from their frame callback.
pub struct WheelDirector {
    ring: RingConfig,
    camera: Camera,
    animator: WheelAnimator,
    layout: SlotLayout,
    layout_key: (i64, bool),
    synced_revision: u64,
    last_frame: Option<Instant>,
    scene: SceneFrame,
}

impl WheelDirector {
    pub fn new(store: &WheelState) -> Self {
        let ring = RingConfig::default();
        let snap = store.snapshot();
        let layout = ring.layout(snap.index, snap.is_open);
        let animator = WheelAnimator::new(ring, &snap, &layout);
        let scene = compose(&snap, &layout, &animator.pose());
        Self {
            ring,
            camera: Camera::default(),
            animator,
            layout,
            layout_key: (snap.index, snap.is_open),
            synced_revision: snap.revision,
            last_frame: None,
            scene,
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    #[inline]
    pub fn layout(&self) -> &[SlotRenderParams] {
        &self.layout
    }

    #[inline]
    pub fn animator(&self) -> &WheelAnimator {
        &self.animator
    }

    /// Scene composed by the last call to [`frame`](Self::frame).
    #[inline]
    pub fn scene(&self) -> &SceneFrame {
        &self.scene
    }

    pub fn reflection_camera(&self) -> ReflectionCamera {
        ReflectionCamera::new(self.camera.view(), self.camera.projection(), &self.scene.plane())
    }

    /// Advance one frame: flush pending index steps, retarget, step, compose.
    pub fn frame(&mut self, store: &mut WheelState, now: Instant) -> &SceneFrame {
        store.tick(now);
        let snap = store.snapshot();
        let key = (snap.index, snap.is_open);
        if key != self.layout_key {
            self.layout = self.ring.layout(snap.index, snap.is_open);
            self.layout_key = key;
        }
        if snap.revision != self.synced_revision {
            self.animator.sync(&snap, &self.layout, now);
        }

        if let Some(slot) = centered_slot(&self.layout) {
            store.set_active_palette(palette_for_key(self.layout[slot].palette_index));
        }
        let snap = store.snapshot();
        self.synced_revision = snap.revision;

        let dt = match self.last_frame {
            Some(last) if now > last => now.duration_since(last).as_secs_f32(),
            _ => 0.0,
        };
        self.last_frame = Some(now);
        self.animator.step(dt, now);

        self.scene = compose(&snap, &self.layout, &self.animator.pose());
        &self.scene
    }

    /// Apply a click at pixel `px` of a `width × height` viewport.
    ///
    /// The centered slot toggles the wheel; a segment cycles its color.
    pub fn click(&self, store: &mut WheelState, px: Vec2, width: f32, height: f32) -> Option<PickHit> {
        let ray = self.camera.screen_ray(px, width, height);
        let hit = self.scene.pick(&ray)?;
        match hit {
            PickHit::Slot(slot) if Some(slot) == self.scene.active_slot => store.toggle_open(),
            PickHit::Slot(slot) => log::debug!("[wheel] click on side slot {}", slot),
            PickHit::Segment(segment) => store.cycle_slot_color(segment),
        }
        Some(hit)
    }
}
