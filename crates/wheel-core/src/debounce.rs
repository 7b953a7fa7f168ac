use instant::Instant;
use std::time::Duration;

/// Trailing-edge coalescing wrapper.
///
/// Every `call` (re)schedules a single pending invocation `window` after the
/// call; only the payload of the most recent call survives. `poll` hands the
/// payload out once the window has passed without further calls. Time is
/// passed in so the frame loop and the tests drive the clock.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a call; cancels and reschedules any pending invocation.
    pub fn call(&mut self, now: Instant, payload: T) {
        self.pending = Some((now + self.window, payload));
    }

    /// Fire the pending invocation if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
