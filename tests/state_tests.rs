// Host-side tests for the wheel state store and the trailing debouncer.

use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wheel_core::debounce::Debouncer;
use wheel_core::palette::palette_for_index;
use wheel_core::{IndexStep, WheelSeed, WheelState, INDEX_DEBOUNCE_MS, PALETTE_CATEGORIES};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn seeded(index: i64) -> WheelState {
    WheelState::new(WheelSeed {
        index,
        ..WheelSeed::default()
    })
}

#[test]
fn debouncer_fires_once_after_the_window() {
    let t0 = Instant::now();
    let mut d = Debouncer::new(ms(20));
    d.call(t0, 1);
    assert!(d.is_pending());
    assert_eq!(d.poll(t0 + ms(19)), None);
    assert_eq!(d.poll(t0 + ms(20)), Some(1));
    assert!(!d.is_pending());
    assert_eq!(d.poll(t0 + ms(100)), None);
}

#[test]
fn debouncer_keeps_the_latest_payload_and_restarts_the_window() {
    let t0 = Instant::now();
    let mut d = Debouncer::new(ms(20));
    d.call(t0, "a");
    d.call(t0 + ms(15), "b");
    // the first deadline has passed, but the second call pushed it back
    assert_eq!(d.poll(t0 + ms(25)), None);
    assert_eq!(d.poll(t0 + ms(35)), Some("b"));
}

#[test]
fn debouncer_cancel_drops_the_pending_call() {
    let t0 = Instant::now();
    let mut d = Debouncer::new(ms(5));
    d.call(t0, ());
    d.cancel();
    assert_eq!(d.poll(t0 + ms(50)), None);
}

#[test]
fn new_store_starts_closed_on_the_seed() {
    let seed = WheelSeed {
        index: 42,
        slot_colors: [3; 36],
    };
    let store = WheelState::new(seed);
    assert_eq!(store.index(), 42);
    assert!(!store.is_open());
    assert_eq!(store.slot_colors(), &[3; 36]);
    assert_eq!(store.seed(), seed);
    assert_eq!(store.revision(), 0);
    assert_eq!(store.active_palette(), &palette_for_index(42));
}

#[test]
fn index_steps_apply_after_the_debounce_window() {
    let t0 = Instant::now();
    let mut store = seeded(450);
    store.increment(t0);
    assert!(store.has_pending_step());
    assert!(!store.tick(t0));
    assert_eq!(store.index(), 450);
    assert!(store.tick(t0 + ms(INDEX_DEBOUNCE_MS)));
    assert_eq!(store.index(), 451);
    assert!(!store.has_pending_step());
}

#[test]
fn a_burst_of_steps_moves_the_index_once() {
    let t0 = Instant::now();
    let mut store = seeded(450);
    for i in 0..5 {
        store.increment(t0 + ms(i * 5));
    }
    assert!(store.tick(t0 + ms(20 + 20)));
    assert_eq!(store.index(), 451);
    assert!(!store.tick(t0 + ms(200)));
}

#[test]
fn last_step_in_a_burst_wins() {
    let t0 = Instant::now();
    let mut store = seeded(10);
    store.increment(t0);
    store.decrement(t0 + ms(5));
    store.tick(t0 + ms(100));
    assert_eq!(store.index(), 9);
}

#[test]
fn index_is_unbounded_below_zero() {
    let t0 = Instant::now();
    let mut store = seeded(0);
    store.step(IndexStep::Decrement, t0);
    store.tick(t0 + ms(100));
    assert_eq!(store.index(), -1);
    assert_eq!(store.snapshot().palette_key(), 899);
}

#[test]
fn index_step_from_sign() {
    assert_eq!(IndexStep::from_sign(3.0), Some(IndexStep::Increment));
    assert_eq!(IndexStep::from_sign(-0.5), Some(IndexStep::Decrement));
    assert_eq!(IndexStep::from_sign(0.0), None);
    assert_eq!(IndexStep::from_sign(f32::NAN), None);
    assert_eq!(IndexStep::Increment.delta(), 1);
    assert_eq!(IndexStep::Decrement.delta(), -1);
}

#[test]
fn toggle_and_set_open() {
    let mut store = WheelState::default();
    store.toggle_open();
    assert!(store.is_open());
    let rev = store.revision();
    store.set_open(true);
    assert_eq!(store.revision(), rev, "no-op set_open must not notify");
    store.set_open(false);
    assert!(!store.is_open());
    assert_eq!(store.revision(), rev + 1);
}

#[test]
fn set_slot_color_ignores_out_of_range_arguments() {
    let mut store = WheelState::default();
    store.set_slot_color(36, 0);
    store.set_slot_color(0, PALETTE_CATEGORIES);
    assert_eq!(store.revision(), 0);
    store.set_slot_color(5, 2);
    assert_eq!(store.slot_colors()[5], 2);
    assert_eq!(store.revision(), 1);
    // same value again is a no-op
    store.set_slot_color(5, 2);
    assert_eq!(store.revision(), 1);
}

#[test]
fn cycle_slot_color_wraps_through_the_categories() {
    let mut store = WheelState::default();
    store.set_slot_color(0, PALETTE_CATEGORIES - 1);
    store.cycle_slot_color(0);
    assert_eq!(store.slot_colors()[0], 0);
    store.cycle_slot_color(0);
    assert_eq!(store.slot_colors()[0], 1);
    // unknown segment
    let rev = store.revision();
    store.cycle_slot_color(99);
    assert_eq!(store.revision(), rev);
}

#[test]
fn slot_color_reads_through_the_active_palette() {
    let mut store = WheelState::default();
    store.set_slot_color(3, 4);
    let palette = *store.active_palette();
    assert_eq!(store.slot_color(3), Some(palette[4]));
    assert_eq!(store.slot_color(36), None);
}

#[test]
fn randomize_keeps_categories_in_range() {
    let mut store = WheelState::default();
    let mut rng = StdRng::seed_from_u64(7);
    store.randomize_slot_colors(&mut rng);
    assert!(store
        .slot_colors()
        .iter()
        .all(|c| (*c as usize) < PALETTE_CATEGORIES));
    assert_eq!(store.revision(), 1);
}

#[test]
fn active_palette_repeats_are_not_rebroadcast() {
    let mut store = seeded(3);
    let calls = Rc::new(RefCell::new(0));
    let c = calls.clone();
    store.subscribe(move |_| *c.borrow_mut() += 1);
    store.set_active_palette(palette_for_index(3));
    assert_eq!(*calls.borrow(), 0);
    store.set_active_palette(palette_for_index(4));
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(store.active_palette(), &palette_for_index(4));
}

#[test]
fn observers_see_the_new_snapshot_synchronously() {
    let mut store = WheelState::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    store.subscribe(move |snap| s.borrow_mut().push((snap.is_open, snap.revision)));
    store.toggle_open();
    store.toggle_open();
    assert_eq!(*seen.borrow(), vec![(true, 1), (false, 2)]);
}

#[test]
fn selective_subscription_only_fires_on_change() {
    let t0 = Instant::now();
    let mut store = seeded(1);
    let opens = Rc::new(RefCell::new(Vec::new()));
    let o = opens.clone();
    store.subscribe_select(|snap| snap.is_open, move |open| o.borrow_mut().push(*open));

    store.set_slot_color(0, 1);
    store.increment(t0);
    store.tick(t0 + ms(100));
    assert!(opens.borrow().is_empty());

    store.toggle_open();
    assert_eq!(*opens.borrow(), vec![true]);
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut store = WheelState::default();
    let calls = Rc::new(RefCell::new(0));
    let c = calls.clone();
    let id = store.subscribe(move |_| *c.borrow_mut() += 1);
    store.toggle_open();
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.toggle_open();
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn a_hundred_rapid_increments_settle_to_one_step() {
    let t0 = Instant::now();
    let mut store = seeded(450);
    for i in 0..100 {
        // 100 calls spread over 19.8 ms
        let now = t0 + Duration::from_micros(i * 200);
        store.increment(now);
        store.tick(now);
    }
    assert!(store.index() - 450 < 100);
    store.tick(t0 + ms(200));
    assert_eq!(store.index(), 451);
}
