//! Gesture-to-Index Mapper.
//!
//! Raw vertical wheel and drag input becomes discrete [`IndexStep`]s. Nothing
//! maps while the wheel is closed.

use crate::constants::{
    DRAG_DELAY_MS, DRAG_STEPS_PER_VIEWPORT, DRAG_THRESHOLD_PX, SCROLL_DELAY_MS,
    SCROLL_SENSITIVITY, SCROLL_STABILITY, SCROLL_TOLERANCE, WHEEL_GESTURE_IDLE_MS,
};
use crate::state::{IndexStep, WheelState};
use instant::Instant;
use std::collections::VecDeque;
use std::time::Duration;

/// Unit of a wheel event's delta, as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelSample {
    /// Positive scrolls content down (towards the user).
    pub delta_y: f32,
    pub mode: DeltaMode,
    pub time: Instant,
}

impl WheelSample {
    pub fn new(delta_y: f32, mode: DeltaMode, time: Instant) -> Self {
        Self {
            delta_y,
            mode,
            time,
        }
    }

    /// Legacy `wheelDelta` scale: one notch is about 120, scrolling up is positive.
    pub fn wheel_delta(&self) -> f32 {
        let scale = match self.mode {
            DeltaMode::Pixel => 1.2,
            DeltaMode::Line => 40.0,
            DeltaMode::Page => 800.0,
        };
        -self.delta_y * scale
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub stability: usize,
    pub sensitivity: f32,
    pub tolerance: f32,
    pub delay: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            stability: SCROLL_STABILITY,
            sensitivity: SCROLL_SENSITIVITY,
            tolerance: SCROLL_TOLERANCE,
            delay: Duration::from_millis(SCROLL_DELAY_MS),
        }
    }
}

/// Tells intentional wheel ticks apart from momentum scrolling.
///
/// Keeps the last `2 * stability` deltas per direction. A sample counts as
/// intentional when the newer half of its direction's history averages above
/// `sensitivity` and clearly above the older half; a decaying inertial tail
/// never does. The very first sample of a direction is always intentional.
#[derive(Clone, Debug)]
pub struct ScrollIntentClassifier {
    config: ClassifierConfig,
    up: VecDeque<Option<f32>>,
    down: VecDeque<Option<f32>>,
    stamps: VecDeque<Option<Instant>>,
}

impl Default for ScrollIntentClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl ScrollIntentClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let len = config.stability.max(1) * 2;
        Self {
            config,
            up: std::iter::repeat(None).take(len).collect(),
            down: std::iter::repeat(None).take(len).collect(),
            stamps: std::iter::repeat(None).take(len).collect(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// `Some(direction)` for an intentional tick, `None` for inertia.
    pub fn check(&mut self, sample: &WheelSample) -> Option<IndexStep> {
        let delta = sample.wheel_delta();
        if !has_vertical_motion(delta) {
            return None;
        }
        push_window(&mut self.stamps, Some(sample.time));
        if delta > 0.0 {
            push_window(&mut self.up, Some(delta));
            self.classify(IndexStep::Increment, sample.time)
        } else {
            push_window(&mut self.down, Some(delta));
            self.classify(IndexStep::Decrement, sample.time)
        }
    }

    fn classify(&self, direction: IndexStep, now: Instant) -> Option<IndexStep> {
        let history = match direction {
            IndexStep::Increment => &self.up,
            IndexStep::Decrement => &self.down,
        };
        let len = history.len();
        let first = history.front().copied().flatten();
        let last = history.back().copied().flatten();
        let (Some(first), Some(last)) = (first, last) else {
            return Some(direction);
        };

        // Same delta repeating faster than `delay` is a smooth inertial stream.
        if let Some(Some(prev)) = self.stamps.get(len.saturating_sub(2)) {
            if *prev + self.config.delay > now && first == last {
                return None;
            }
        }

        let half = len / 2;
        let old_avg = mean(history.range(..half).copied());
        let new_avg = mean(history.range(half..).copied());

        if old_avg.abs() < (new_avg * self.config.tolerance).abs()
            && self.config.sensitivity < new_avg.abs()
        {
            Some(direction)
        } else {
            None
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = Option<f32>>) -> f32 {
    let n = values.len().max(1) as f32;
    values.map(|v| v.unwrap_or(0.0)).sum::<f32>() / n
}

fn push_window<T>(window: &mut VecDeque<T>, value: T) {
    window.push_back(value);
    window.pop_front();
}

/// One index step per wheel gesture.
///
/// The memo is set when a step is emitted and cleared by an inertial sample
/// or by a quiet gap that ends the gesture.
#[derive(Clone, Debug)]
pub struct WheelGestureMapper {
    classifier: ScrollIntentClassifier,
    memo: bool,
    last_event: Option<Instant>,
    idle: Duration,
}

impl Default for WheelGestureMapper {
    fn default() -> Self {
        Self::new(ScrollIntentClassifier::default())
    }
}

impl WheelGestureMapper {
    pub fn new(classifier: ScrollIntentClassifier) -> Self {
        Self {
            classifier,
            memo: false,
            last_event: None,
            idle: Duration::from_millis(WHEEL_GESTURE_IDLE_MS),
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.memo
    }

    pub fn on_wheel(&mut self, sample: &WheelSample, is_open: bool) -> Option<IndexStep> {
        if !is_open || !has_vertical_motion(sample.wheel_delta()) {
            return None;
        }
        if let Some(last) = self.last_event {
            if sample.time >= last + self.idle {
                self.memo = false;
            }
        }
        self.last_event = Some(sample.time);

        match self.classifier.check(sample) {
            Some(step) if !self.memo => {
                self.memo = true;
                log::debug!("[gesture] wheel {:?}", step);
                Some(step)
            }
            Some(_) => None,
            None => {
                self.memo = false;
                None
            }
        }
    }

    /// Explicit end of gesture, e.g. the pointer left the canvas.
    pub fn end_gesture(&mut self) {
        self.memo = false;
        self.last_event = None;
    }
}

// Horizontal-only events arrive with a zero vertical delta.
#[inline]
fn has_vertical_motion(delta: f32) -> bool {
    delta != 0.0 && delta.is_finite()
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragPress {
    started: Instant,
    last_y: f32,
    travel: f32,
    dragging: bool,
}

/// Vertical drag to index steps, one step per `step_px` of travel.
#[derive(Clone, Debug)]
pub struct DragMapper {
    delay: Duration,
    threshold_px: f32,
    step_px: f32,
    press: Option<DragPress>,
}

impl DragMapper {
    pub fn new(viewport_height: f32) -> Self {
        let mut mapper = Self {
            delay: Duration::from_millis(DRAG_DELAY_MS),
            threshold_px: DRAG_THRESHOLD_PX,
            step_px: 1.0,
            press: None,
        };
        mapper.set_viewport_height(viewport_height);
        mapper
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.step_px = (height / DRAG_STEPS_PER_VIEWPORT).max(1.0);
    }

    #[inline]
    pub fn step_px(&self) -> f32 {
        self.step_px
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.map(|p| p.dragging).unwrap_or(false)
    }

    pub fn begin(&mut self, y: f32, now: Instant) {
        self.press = Some(DragPress {
            started: now,
            last_y: y,
            travel: 0.0,
            dragging: false,
        });
    }

    /// Pointer moved to `y`. Drag down steps forward.
    pub fn on_move(&mut self, y: f32, now: Instant, is_open: bool) -> Option<IndexStep> {
        let press = self.press.as_mut()?;
        if now < press.started + self.delay {
            press.last_y = y;
            return None;
        }
        let dy = y - press.last_y;
        if dy.abs() <= self.threshold_px {
            return None;
        }
        press.last_y = y;
        press.dragging = true;
        if !is_open {
            return None;
        }
        press.travel += dy;
        if press.travel.abs() < self.step_px {
            return None;
        }
        let step = IndexStep::from_sign(press.travel);
        press.travel %= self.step_px;
        if let Some(step) = step {
            log::debug!("[gesture] drag {:?}", step);
        }
        step
    }

    /// Release. Returns true when the press turned into a drag rather than a click.
    pub fn end(&mut self) -> bool {
        self.press.take().map(|p| p.dragging).unwrap_or(false)
    }

    pub fn cancel(&mut self) {
        self.press = None;
    }
}

/// Keyboard shortcuts, keyed by DOM `KeyboardEvent.key` names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Step(IndexStep),
    ToggleOpen,
    RandomizeColors,
}

pub fn key_command(key: &str) -> Option<KeyCommand> {
    match key {
        "ArrowUp" | "ArrowRight" => Some(KeyCommand::Step(IndexStep::Increment)),
        "ArrowDown" | "ArrowLeft" => Some(KeyCommand::Step(IndexStep::Decrement)),
        " " | "Enter" => Some(KeyCommand::ToggleOpen),
        "r" | "R" => Some(KeyCommand::RandomizeColors),
        _ => None,
    }
}

impl KeyCommand {
    /// Apply to the store. Steps are ignored while the wheel is closed.
    pub fn apply<R: rand::Rng + ?Sized>(self, store: &mut WheelState, now: Instant, rng: &mut R) {
        match self {
            KeyCommand::Step(step) if store.is_open() => store.step(step, now),
            KeyCommand::Step(_) => {}
            KeyCommand::ToggleOpen => store.toggle_open(),
            KeyCommand::RandomizeColors => store.randomize_slot_colors(rng),
        }
    }
}
