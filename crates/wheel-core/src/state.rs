//! Wheel State Store.
//!
//! A single owned store holds the discrete wheel index, the open/closed flag
//! and the per-segment color categories. Frontends keep it behind
//! `Rc<RefCell<_>>` and hand references to the event callbacks and the frame
//! loop; nothing else keeps a mutable copy of `index` or `is_open`.
//!
//! Observers run synchronously inside the mutating call, so a change made by an
//! input callback is visible to the very next frame. Observers receive a
//! snapshot and cannot reach back into the store.

use crate::constants::{INDEX_DEBOUNCE_MS, MAX_INDEX, PALETTE_CATEGORIES, SLOT_COLOR_COUNT};
use crate::debounce::Debouncer;
use crate::palette::{palette_for_index, wrap_key, Palette};
use crate::seed::WheelSeed;
use instant::Instant;
use palette::Srgb;
use rand::Rng;
use std::time::Duration;

/// One discrete wheel movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexStep {
    Increment,
    Decrement,
}

impl IndexStep {
    #[inline]
    pub fn delta(self) -> i64 {
        match self {
            IndexStep::Increment => 1,
            IndexStep::Decrement => -1,
        }
    }

    /// Positive → increment, negative → decrement, zero/NaN → nothing.
    #[inline]
    pub fn from_sign(sign: f32) -> Option<Self> {
        if sign > 0.0 {
            Some(IndexStep::Increment)
        } else if sign < 0.0 {
            Some(IndexStep::Decrement)
        } else {
            None
        }
    }
}

/// Read model handed to observers and to the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelSnapshot {
    pub index: i64,
    pub is_open: bool,
    pub slot_colors: [u8; SLOT_COLOR_COUNT],
    pub active_palette: Palette,
    pub revision: u64,
}

impl WheelSnapshot {
    #[inline]
    pub fn palette_key(&self) -> usize {
        wrap_key(self.index, MAX_INDEX)
    }

    /// Color shown on a segment: the active palette entry it points at.
    pub fn slot_color(&self, slot: usize) -> Option<Srgb<f32>> {
        let category = *self.slot_colors.get(slot)? as usize;
        self.active_palette.get(category).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Observer = Box<dyn FnMut(&WheelSnapshot)>;

pub struct WheelState {
    index: i64,
    is_open: bool,
    slot_colors: [u8; SLOT_COLOR_COUNT],
    active_palette: Palette,
    revision: u64,
    stepper: Debouncer<IndexStep>,
    observers: Vec<(SubscriberId, Observer)>,
    next_subscriber: u64,
}

impl Default for WheelState {
    fn default() -> Self {
        Self::new(WheelSeed::default())
    }
}

impl WheelState {
    pub fn new(seed: WheelSeed) -> Self {
        Self::with_debounce(seed, Duration::from_millis(INDEX_DEBOUNCE_MS))
    }

    pub fn with_debounce(seed: WheelSeed, window: Duration) -> Self {
        Self {
            index: seed.index,
            is_open: false,
            slot_colors: seed.slot_colors,
            active_palette: palette_for_index(seed.index),
            revision: 0,
            stepper: Debouncer::new(window),
            observers: Vec::new(),
            next_subscriber: 0,
        }
    }

    #[inline]
    pub fn index(&self) -> i64 {
        self.index
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[inline]
    pub fn slot_colors(&self) -> &[u8; SLOT_COLOR_COUNT] {
        &self.slot_colors
    }

    #[inline]
    pub fn active_palette(&self) -> &Palette {
        &self.active_palette
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> WheelSnapshot {
        WheelSnapshot {
            index: self.index,
            is_open: self.is_open,
            slot_colors: self.slot_colors,
            active_palette: self.active_palette,
            revision: self.revision,
        }
    }

    /// Current state as a share seed.
    pub fn seed(&self) -> WheelSeed {
        WheelSeed {
            index: self.index,
            slot_colors: self.slot_colors,
        }
    }

    pub fn slot_color(&self, slot: usize) -> Option<Srgb<f32>> {
        self.snapshot().slot_color(slot)
    }

    // ---------------- Index ----------------

    /// Request a debounced index step; applied by `tick` once input goes quiet.
    pub fn step(&mut self, step: IndexStep, now: Instant) {
        self.stepper.call(now, step);
    }

    pub fn increment(&mut self, now: Instant) {
        self.step(IndexStep::Increment, now);
    }

    pub fn decrement(&mut self, now: Instant) {
        self.step(IndexStep::Decrement, now);
    }

    pub fn has_pending_step(&self) -> bool {
        self.stepper.is_pending()
    }

    /// Flush a due index step. Returns true when the index changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.stepper.poll(now) {
            Some(step) => {
                self.index += step.delta();
                log::debug!("[wheel] {:?} -> index={}", step, self.index);
                self.notify();
                true
            }
            None => false,
        }
    }

    // ---------------- Open/closed ----------------

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
        log::info!("[wheel] {}", if self.is_open { "open" } else { "closed" });
        self.notify();
    }

    pub fn set_open(&mut self, open: bool) {
        if self.is_open != open {
            self.toggle_open();
        }
    }

    // ---------------- Segment colors ----------------

    /// Override one segment's palette category. Out-of-range calls are ignored.
    pub fn set_slot_color(&mut self, slot: usize, palette_index: usize) {
        if slot >= SLOT_COLOR_COUNT || palette_index >= PALETTE_CATEGORIES {
            log::debug!(
                "[wheel] ignoring set_slot_color(slot={}, palette_index={})",
                slot,
                palette_index
            );
            return;
        }
        if self.slot_colors[slot] as usize == palette_index {
            return;
        }
        self.slot_colors[slot] = palette_index as u8;
        self.notify();
    }

    /// Advance a segment to the next palette category.
    pub fn cycle_slot_color(&mut self, slot: usize) {
        if let Some(current) = self.slot_colors.get(slot).copied() {
            self.set_slot_color(slot, (current as usize + 1) % PALETTE_CATEGORIES);
        }
    }

    pub fn randomize_slot_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for c in self.slot_colors.iter_mut() {
            *c = rng.gen_range(0..PALETTE_CATEGORIES as u8);
        }
        self.notify();
    }

    // ---------------- Active palette ----------------

    /// Record the palette of the centered slot. Repeats are not re-broadcast.
    pub fn set_active_palette(&mut self, palette: Palette) {
        if self.active_palette == palette {
            return;
        }
        self.active_palette = palette;
        self.notify();
    }

    // ---------------- Observers ----------------

    pub fn subscribe(&mut self, observer: impl FnMut(&WheelSnapshot) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Subscribe to a projection; `observer` only runs when the projection changes.
    pub fn subscribe_select<T, S, F>(&mut self, select: S, mut observer: F) -> SubscriberId
    where
        T: PartialEq + 'static,
        S: Fn(&WheelSnapshot) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        let mut last = select(&self.snapshot());
        self.subscribe(move |snap| {
            let next = select(snap);
            if next != last {
                observer(&next);
                last = next;
            }
        })
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        self.revision += 1;
        let snap = self.snapshot();
        for (_, observer) in self.observers.iter_mut() {
            observer(&snap);
        }
    }
}
