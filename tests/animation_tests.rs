// Host-side tests for springs, the open/close chain and slot fades.

use instant::Instant;
use std::time::Duration;
use wheel_core::animation::{spin_target, ChainOrder, ChainPhase, SlotFade, Spring, TransitionChain};
use wheel_core::layout::{layout, RingConfig};
use wheel_core::{
    WheelAnimator, WheelSeed, WheelState, ACTIVE_SCALE, LATERAL_CLOSED, LATERAL_OPEN, TILT_CLOSED,
    TILT_OPEN,
};

const DT: f32 = 1.0 / 60.0;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn run_spring(s: &mut Spring, seconds: f32) {
    let frames = (seconds / DT) as usize;
    for _ in 0..frames {
        s.step(DT);
    }
}

#[test]
fn spring_settles_on_its_target() {
    let mut s = Spring::new(0.0);
    s.set_target(1.0);
    assert!(!s.is_settled());
    run_spring(&mut s, 3.0);
    assert!(s.is_settled());
    assert_eq!(s.value(), 1.0);
    assert_eq!(s.velocity(), 0.0);
}

#[test]
fn spring_moves_towards_the_target_without_jumping() {
    let mut s = Spring::new(0.0);
    s.set_target(10.0);
    s.step(DT);
    assert!(s.value() > 0.0 && s.value() < 1.0, "value {}", s.value());
}

#[test]
fn spring_retarget_keeps_velocity() {
    let mut s = Spring::new(0.0);
    s.set_target(1.0);
    run_spring(&mut s, 0.1);
    let v = s.velocity();
    assert!(v > 0.0);
    s.set_target(-1.0);
    assert_eq!(s.velocity(), v);
    // momentum still carries it forward for a moment
    let before = s.value();
    s.step(0.001);
    assert!(s.value() > before);
    run_spring(&mut s, 3.0);
    assert_eq!(s.value(), -1.0);
}

#[test]
fn spring_huge_dt_is_capped() {
    let mut s = Spring::new(0.0);
    s.set_target(1.0);
    s.step(100.0);
    assert!(s.value().is_finite());
    assert!(s.value() < 1.5);
}

#[test]
fn spring_snap_and_park() {
    let mut s = Spring::new(0.0);
    s.set_target(5.0);
    run_spring(&mut s, 0.1);
    let here = s.value();
    s.park();
    assert_eq!(s.target(), here);
    s.snap_to(2.0);
    assert!(s.is_settled());
    assert_eq!(s.value(), 2.0);
}

fn run_chain(chain: &mut TransitionChain, seconds: f32) {
    for _ in 0..(seconds / DT) as usize {
        chain.step(DT);
    }
}

#[test]
fn chain_starts_idle_at_rest() {
    let chain = TransitionChain::new(false);
    assert_eq!(chain.phase(), ChainPhase::Idle);
    assert_eq!(chain.tilt(), TILT_CLOSED);
    assert_eq!(chain.lateral().to_array(), LATERAL_CLOSED);
    assert!(!chain.is_running());
}

#[test]
fn opening_slides_out_before_turning() {
    let mut chain = TransitionChain::new(false);
    chain.set_open(true);
    assert_eq!(chain.order(), ChainOrder::PositionThenRotation);
    assert_eq!(chain.phase(), ChainPhase::RunningStage1);

    run_chain(&mut chain, 0.2);
    assert_eq!(chain.phase(), ChainPhase::RunningStage1);
    assert_ne!(chain.lateral().x, LATERAL_CLOSED[0]);
    assert_eq!(chain.tilt(), TILT_CLOSED, "tilt waits for stage 2");

    run_chain(&mut chain, 6.0);
    assert_eq!(chain.phase(), ChainPhase::Done);
    assert_eq!(chain.tilt(), TILT_OPEN);
    assert_eq!(chain.lateral().to_array(), LATERAL_OPEN);
}

#[test]
fn closing_turns_back_before_sliding_in() {
    let mut chain = TransitionChain::new(true);
    chain.set_open(false);
    assert_eq!(chain.order(), ChainOrder::RotationThenPosition);

    run_chain(&mut chain, 0.2);
    assert_ne!(chain.tilt(), TILT_OPEN);
    assert_eq!(chain.lateral().to_array(), LATERAL_OPEN, "position waits for stage 2");

    run_chain(&mut chain, 6.0);
    assert_eq!(chain.phase(), ChainPhase::Done);
    assert_eq!(chain.tilt(), TILT_CLOSED);
    assert_eq!(chain.lateral().to_array(), LATERAL_CLOSED);
}

#[test]
fn stage_two_starts_by_the_stage_offset_at_the_latest() {
    let mut chain = TransitionChain::new(false);
    chain.set_open(true);
    run_chain(&mut chain, 1.05);
    assert_ne!(chain.phase(), ChainPhase::RunningStage1);
}

#[test]
fn reversing_mid_transition_continues_from_the_current_pose() {
    let mut chain = TransitionChain::new(false);
    chain.set_open(true);
    run_chain(&mut chain, 0.3);
    let lateral = chain.lateral();

    chain.set_open(false);
    assert_eq!(chain.phase(), ChainPhase::RunningStage1);
    assert_eq!(chain.order(), ChainOrder::RotationThenPosition);
    chain.step(DT);
    // no jump back to either endpoint
    assert!((chain.lateral() - lateral).length() < 0.5);

    run_chain(&mut chain, 6.0);
    assert_eq!(chain.tilt(), TILT_CLOSED);
    assert_eq!(chain.lateral().to_array(), LATERAL_CLOSED);
}

#[test]
fn setting_the_same_open_state_is_a_no_op() {
    let mut chain = TransitionChain::new(true);
    chain.set_open(true);
    assert_eq!(chain.phase(), ChainPhase::Idle);
}

fn run_fade(fade: &mut SlotFade, t0: Instant, from_ms: u64, to_ms: u64) {
    let mut t = from_ms;
    while t < to_ms {
        t += 16;
        fade.step(0.016, t0 + ms(t));
    }
}

#[test]
fn fade_in_starts_at_once_when_the_wheel_opens() {
    let t0 = Instant::now();
    let mut fade = SlotFade::new(0.0, false);
    fade.update(0.98, true, t0);
    assert!(!fade.is_delayed());

    run_fade(&mut fade, t0, 0, 500);
    assert!(fade.opacity() > 0.5);
    assert!(!fade.local_open());

    run_fade(&mut fade, t0, 500, 4000);
    assert!((fade.opacity() - 0.98).abs() < 1e-3);
    assert!(fade.local_open());
    assert!(fade.is_settled());
}

#[test]
fn fade_out_holds_right_after_the_wheel_opens() {
    let t0 = Instant::now();
    let mut fade = SlotFade::new(1.0, false);
    fade.update(1.0, true, t0);
    fade.update(0.0, true, t0 + ms(100));
    assert!(fade.is_delayed());

    run_fade(&mut fade, t0, 0, 1000);
    assert_eq!(fade.opacity(), 1.0);

    run_fade(&mut fade, t0, 1000, 4000);
    assert!(!fade.is_delayed());
    assert_eq!(fade.opacity(), 0.0);
}

#[test]
fn repeated_fade_outs_keep_the_first_hold() {
    let t0 = Instant::now();
    let mut fade = SlotFade::new(1.0, false);
    fade.update(1.0, true, t0);
    fade.update(0.5, true, t0);
    fade.update(0.2, true, t0 + ms(600));
    assert!(fade.is_delayed());

    run_fade(&mut fade, t0, 0, 1100);
    assert!(!fade.is_delayed());
    assert!(fade.opacity() < 1.0);
}

#[test]
fn fade_out_after_the_latch_opens_is_immediate() {
    let t0 = Instant::now();
    let mut fade = SlotFade::new(0.0, false);
    fade.update(0.98, true, t0);
    run_fade(&mut fade, t0, 0, 3000);
    assert!(fade.local_open());

    fade.update(0.0, true, t0 + ms(3000));
    assert!(!fade.is_delayed());
    fade.step(0.1, t0 + ms(3100));
    assert!(fade.opacity() < 0.98);
}

#[test]
fn latched_open_slot_follows_new_targets_immediately() {
    let t0 = Instant::now();
    let mut fade = SlotFade::new(0.5, true);
    fade.update(1.0, true, t0);
    assert!(!fade.is_delayed());
    fade.step(0.05, t0 + ms(50));
    assert!(fade.opacity() > 0.5);
}

#[test]
fn closing_fades_out_without_delay_and_unlatches() {
    let t0 = Instant::now();
    let mut fade = SlotFade::new(0.7, true);
    fade.update(0.0, false, t0);
    assert!(!fade.local_open());
    run_fade(&mut fade, t0, 0, 3000);
    assert_eq!(fade.opacity(), 0.0);
}

#[test]
fn closed_update_while_wheel_closed_is_not_delayed() {
    let t0 = Instant::now();
    let mut fade = SlotFade::new(0.0, false);
    fade.update(1.0, false, t0);
    fade.step(0.016, t0 + ms(16));
    assert!(!fade.is_delayed());
    assert!(fade.opacity() > 0.0);
}

#[test]
fn spin_target_advances_one_slot_angle_per_index() {
    let ring = RingConfig::default();
    let step = std::f32::consts::TAU / ring.slots as f32;
    assert_eq!(spin_target(&ring, 0), 0.0);
    assert!((spin_target(&ring, 1) - step).abs() < 1e-6);
    assert!((spin_target(&ring, -3) + 3.0 * step).abs() < 1e-5);
    // large indices keep their precision
    let a = spin_target(&ring, 100_000);
    let b = spin_target(&ring, 100_001);
    assert!((b - a - step).abs() < 1e-2);
}

#[test]
fn animator_starts_at_rest_on_the_state() {
    let store = WheelState::new(WheelSeed {
        index: 450,
        ..WheelSeed::default()
    });
    let snap = store.snapshot();
    let ring = RingConfig::default();
    let l = layout(450, false);
    let anim = WheelAnimator::new(ring, &snap, &l);
    assert!(!anim.is_animating());
    let pose = anim.pose();
    assert_eq!(pose.spin, spin_target(&ring, 450));
    assert_eq!(pose.tilt, TILT_CLOSED);
    let visible: Vec<_> = pose.slots.iter().filter(|s| s.opacity > 0.0).collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].scale, ACTIVE_SCALE);
}

#[test]
fn animator_sync_retargets_and_settles() {
    let t0 = Instant::now();
    let mut store = WheelState::new(WheelSeed {
        index: 10,
        ..WheelSeed::default()
    });
    let ring = RingConfig::default();
    let mut anim = WheelAnimator::new(ring, &store.snapshot(), &layout(10, false));

    store.toggle_open();
    let snap = store.snapshot();
    anim.sync(&snap, &layout(snap.index, snap.is_open), t0);
    assert!(anim.is_animating());

    let mut t = 0;
    while t < 8000 {
        t += 16;
        anim.step(0.016, t0 + ms(t));
    }
    assert!(!anim.is_animating());
    let pose = anim.pose();
    assert_eq!(pose.tilt, TILT_OPEN);
    assert_eq!(pose.lateral.to_array(), LATERAL_OPEN);
    assert!(pose.slots.iter().filter(|s| s.opacity > 0.0).count() > 1);
}
