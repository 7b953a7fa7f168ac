//! Transition Animator.
//!
//! Continuous values chase targets derived from the discrete wheel state.
//! Every animated value is a [`Spring`] that can be retargeted at any time and
//! continues from its current value and velocity, so a toggle in the middle of
//! a transition bends the motion instead of restarting it.
//!
//! - ring spin follows `index` on its own spring
//! - tilt and lateral offset run as a two-stage [`TransitionChain`]
//! - each slot latches its own fade through [`SlotFade`]

use crate::constants::{
    ACTIVE_SCALE, CHAIN_STAGE_OFFSET_MS, FADE_OPEN_DELAY_MS, LATERAL_CLOSED, LATERAL_OPEN, NUM,
    SCALE_SMOOTHING_PER_FRAME, TILT_CLOSED, TILT_OPEN,
};
use crate::layout::{RingConfig, SlotRenderParams};
use crate::state::WheelSnapshot;
use glam::Vec2;
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;

// Integration sub-step and the longest frame we are willing to simulate.
const SPRING_SUBSTEP_SEC: f32 = 1.0 / 240.0;
const SPRING_MAX_DT_SEC: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub tension: f32,
    pub friction: f32,
    pub mass: f32,
    /// Distance and speed below which the spring counts as at rest.
    pub precision: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 170.0,
            friction: 26.0,
            mass: 1.0,
            precision: 1e-3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    config: SpringConfig,
}

impl Spring {
    /// A spring at rest on `value`.
    pub fn new(value: f32) -> Self {
        Self::with_config(value, SpringConfig::default())
    }

    pub fn with_config(value: f32, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            config,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Redirect; value and velocity carry over.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` and stop.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Aim at the current value so the spring brakes to a stop where it is.
    pub fn park(&mut self) {
        self.target = self.value;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() <= self.config.precision
            && self.velocity.abs() <= self.config.precision
    }

    pub fn step(&mut self, dt_sec: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }
        let SpringConfig {
            tension,
            friction,
            mass,
            ..
        } = self.config;
        let mut remaining = dt_sec.clamp(0.0, SPRING_MAX_DT_SEC);
        while remaining > 0.0 {
            let h = remaining.min(SPRING_SUBSTEP_SEC);
            let accel = (-tension * (self.value - self.target) - friction * self.velocity) / mass;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }
}

// ---------------- Open/close chain ----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainPhase {
    Idle,
    RunningStage1,
    RunningStage2,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainOrder {
    /// Opening: slide out, then turn.
    PositionThenRotation,
    /// Closing: turn back, then slide in.
    RotationThenPosition,
}

impl ChainOrder {
    #[inline]
    pub fn for_open(open: bool) -> Self {
        if open {
            ChainOrder::PositionThenRotation
        } else {
            ChainOrder::RotationThenPosition
        }
    }
}

#[inline]
pub fn tilt_target(open: bool) -> f32 {
    if open {
        TILT_OPEN
    } else {
        TILT_CLOSED
    }
}

#[inline]
pub fn lateral_target(open: bool) -> Vec2 {
    Vec2::from(if open { LATERAL_OPEN } else { LATERAL_CLOSED })
}

/// Tilt and lateral offset animated one after the other.
///
/// Stage 2 starts when stage 1 comes to rest or once the stage offset has
/// elapsed, whichever happens first. While stage 1 runs, the stage-2 springs
/// are parked where they are.
#[derive(Clone, Debug)]
pub struct TransitionChain {
    tilt: Spring,
    lateral_x: Spring,
    lateral_z: Spring,
    open: bool,
    order: ChainOrder,
    phase: ChainPhase,
    stage_elapsed: f32,
    stage_offset: f32,
}

impl TransitionChain {
    pub fn new(open: bool) -> Self {
        let lateral = lateral_target(open);
        Self {
            tilt: Spring::new(tilt_target(open)),
            lateral_x: Spring::new(lateral.x),
            lateral_z: Spring::new(lateral.y),
            open,
            order: ChainOrder::for_open(open),
            phase: ChainPhase::Idle,
            stage_elapsed: 0.0,
            stage_offset: Duration::from_millis(CHAIN_STAGE_OFFSET_MS).as_secs_f32(),
        }
    }

    #[inline]
    pub fn phase(&self) -> ChainPhase {
        self.phase
    }

    #[inline]
    pub fn order(&self) -> ChainOrder {
        self.order
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn tilt(&self) -> f32 {
        self.tilt.value()
    }

    #[inline]
    pub fn lateral(&self) -> Vec2 {
        Vec2::new(self.lateral_x.value(), self.lateral_z.value())
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            ChainPhase::RunningStage1 | ChainPhase::RunningStage2
        )
    }

    pub fn set_open(&mut self, open: bool) {
        if self.open == open {
            return;
        }
        self.open = open;
        self.order = ChainOrder::for_open(open);
        self.phase = ChainPhase::RunningStage1;
        self.stage_elapsed = 0.0;
        match self.order {
            ChainOrder::PositionThenRotation => {
                self.retarget_position();
                self.tilt.park();
            }
            ChainOrder::RotationThenPosition => {
                self.retarget_rotation();
                self.lateral_x.park();
                self.lateral_z.park();
            }
        }
    }

    pub fn step(&mut self, dt_sec: f32) {
        self.tilt.step(dt_sec);
        self.lateral_x.step(dt_sec);
        self.lateral_z.step(dt_sec);
        match self.phase {
            ChainPhase::RunningStage1 => {
                self.stage_elapsed += dt_sec.max(0.0);
                let stage1_settled = match self.order {
                    ChainOrder::PositionThenRotation => self.position_settled(),
                    ChainOrder::RotationThenPosition => self.tilt.is_settled(),
                };
                if stage1_settled || self.stage_elapsed >= self.stage_offset {
                    self.phase = ChainPhase::RunningStage2;
                    match self.order {
                        ChainOrder::PositionThenRotation => self.retarget_rotation(),
                        ChainOrder::RotationThenPosition => self.retarget_position(),
                    }
                }
            }
            ChainPhase::RunningStage2 => {
                if self.tilt.is_settled() && self.position_settled() {
                    self.phase = ChainPhase::Done;
                    log::debug!("[anim] chain {:?} done", self.order);
                }
            }
            ChainPhase::Idle | ChainPhase::Done => {}
        }
    }

    fn retarget_rotation(&mut self) {
        self.tilt.set_target(tilt_target(self.open));
    }

    fn retarget_position(&mut self) {
        let lateral = lateral_target(self.open);
        self.lateral_x.set_target(lateral.x);
        self.lateral_z.set_target(lateral.y);
    }

    fn position_settled(&self) -> bool {
        self.lateral_x.is_settled() && self.lateral_z.is_settled()
    }
}

// ---------------- Per-slot fade ----------------

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingFade {
    start_at: Instant,
    target: f32,
}

/// Slot opacity with its own latched open flag.
///
/// The latch trails the wheel: it opens once the wheel has been open for the
/// hold delay and the slot's fade has come to rest, and a wheel close drops it
/// at once. While the wheel is open but the latch is still closed, a slot that
/// becomes hidden holds its opacity for the delay before fading out. Fade-ins
/// always start immediately.
#[derive(Clone, Debug)]
pub struct SlotFade {
    opacity: Spring,
    local_open: bool,
    target: f32,
    wheel_open: bool,
    opened_at: Option<Instant>,
    pending: Option<PendingFade>,
    open_delay: Duration,
}

impl SlotFade {
    pub fn new(opacity: f32, wheel_open: bool) -> Self {
        Self {
            opacity: Spring::new(opacity),
            local_open: wheel_open,
            target: opacity,
            wheel_open,
            opened_at: None,
            pending: None,
            open_delay: Duration::from_millis(FADE_OPEN_DELAY_MS),
        }
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity.value().clamp(0.0, 1.0)
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn local_open(&self) -> bool {
        self.local_open
    }

    /// True while a fade-out is held back after the wheel opened.
    #[inline]
    pub fn is_delayed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.opacity.is_settled()
    }

    #[inline]
    fn just_opened(&self) -> bool {
        self.wheel_open && !self.local_open
    }

    pub fn update(&mut self, target: f32, wheel_open: bool, now: Instant) {
        if (target - self.target).abs() <= f32::EPSILON && wheel_open == self.wheel_open {
            return;
        }
        if wheel_open && !self.wheel_open {
            self.opened_at = Some(now);
        }
        if !wheel_open {
            self.local_open = false;
            self.opened_at = None;
        }
        self.target = target;
        self.wheel_open = wheel_open;

        let fading_out = target < self.opacity.target() - f32::EPSILON;
        if fading_out && self.just_opened() {
            // a held fade keeps its original start
            let start_at = self.pending.map_or(now + self.open_delay, |p| p.start_at);
            self.pending = Some(PendingFade { start_at, target });
        } else {
            self.pending = None;
            self.opacity.set_target(target);
        }
    }

    pub fn step(&mut self, dt_sec: f32, now: Instant) {
        if let Some(p) = self.pending {
            if now >= p.start_at {
                self.opacity.set_target(p.target);
                self.pending = None;
            }
        }
        self.opacity.step(dt_sec);
        if self.just_opened()
            && self.is_settled()
            && self.opened_at.map_or(true, |t| now >= t + self.open_delay)
        {
            self.local_open = true;
        }
    }
}

/// Fade plus the centered-slot scale pop.
#[derive(Clone, Debug)]
pub struct SlotVisual {
    pub fade: SlotFade,
    scale: f32,
    scale_target: f32,
}

impl SlotVisual {
    fn new(params: &SlotRenderParams, wheel_open: bool) -> Self {
        let scale_target = scale_for_weight(params.alpha_weight);
        Self {
            fade: SlotFade::new(params.alpha_weight, wheel_open),
            scale: scale_target,
            scale_target,
        }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn step(&mut self, dt_sec: f32, now: Instant) {
        self.fade.step(dt_sec, now);
        let alpha = 1.0 - (1.0 - SCALE_SMOOTHING_PER_FRAME).powf(dt_sec.max(0.0) * 60.0);
        self.scale += (self.scale_target - self.scale) * alpha;
    }
}

#[inline]
fn scale_for_weight(weight: f32) -> f32 {
    if (weight - 1.0).abs() <= f32::EPSILON {
        ACTIVE_SCALE
    } else {
        1.0
    }
}

// ---------------- Whole wheel ----------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotPose {
    pub opacity: f32,
    pub scale: f32,
}

/// Sampled animation state for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelPose {
    pub spin: f32,
    pub tilt: f32,
    pub lateral: Vec2,
    pub slots: SmallVec<[SlotPose; NUM]>,
}

pub struct WheelAnimator {
    ring: RingConfig,
    spin: Spring,
    chain: TransitionChain,
    slots: SmallVec<[SlotVisual; NUM]>,
}

impl WheelAnimator {
    /// Start at rest on the given state.
    pub fn new(ring: RingConfig, snapshot: &WheelSnapshot, layout: &[SlotRenderParams]) -> Self {
        Self {
            ring,
            spin: Spring::new(spin_target(&ring, snapshot.index)),
            chain: TransitionChain::new(snapshot.is_open),
            slots: layout
                .iter()
                .map(|p| SlotVisual::new(p, snapshot.is_open))
                .collect(),
        }
    }

    #[inline]
    pub fn spin(&self) -> &Spring {
        &self.spin
    }

    #[inline]
    pub fn chain(&self) -> &TransitionChain {
        &self.chain
    }

    pub fn slot(&self, slot: usize) -> Option<&SlotVisual> {
        self.slots.get(slot)
    }

    /// Point every animated value at the targets implied by the state.
    pub fn sync(&mut self, snapshot: &WheelSnapshot, layout: &[SlotRenderParams], now: Instant) {
        self.spin.set_target(spin_target(&self.ring, snapshot.index));
        self.chain.set_open(snapshot.is_open);
        for (visual, params) in self.slots.iter_mut().zip(layout) {
            visual.fade.update(params.alpha_weight, snapshot.is_open, now);
            visual.scale_target = scale_for_weight(params.alpha_weight);
        }
    }

    pub fn step(&mut self, dt_sec: f32, now: Instant) {
        self.spin.step(dt_sec);
        self.chain.step(dt_sec);
        for visual in self.slots.iter_mut() {
            visual.step(dt_sec, now);
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.spin.is_settled()
            || self.chain.is_running()
            || self.slots.iter().any(|s| !s.fade.is_settled())
    }

    pub fn pose(&self) -> WheelPose {
        WheelPose {
            spin: self.spin.value(),
            tilt: self.chain.tilt(),
            lateral: self.chain.lateral(),
            slots: self
                .slots
                .iter()
                .map(|s| SlotPose {
                    opacity: s.fade.opacity(),
                    scale: s.scale(),
                })
                .collect(),
        }
    }
}

/// Ring angle for an index; unbounded so the ring never jumps back.
#[inline]
pub fn spin_target(ring: &RingConfig, index: i64) -> f32 {
    (std::f64::consts::TAU * index as f64 / ring.slots.max(1) as f64) as f32
}
