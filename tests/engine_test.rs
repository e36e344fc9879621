//! End-to-end gesture sequences through the engine.

use std::cell::RefCell;
use std::rc::Rc;

use gesturectl::{
    Callbacks, Config, ContactSample, Engine, Point, SwipeDirection, TouchEvent, TouchPhase,
};

#[derive(Default)]
struct Record {
    taps: Vec<Point>,
    double_taps: Vec<Point>,
    long_presses: Vec<Point>,
    swipes: Vec<(SwipeDirection, f32)>,
    pinch_starts: Vec<Point>,
    pinches: Vec<(f32, Point)>,
    pinch_ends: Vec<f32>,
    rotate_starts: Vec<Point>,
    rotates: Vec<(f32, Point)>,
    rotate_ends: Vec<f32>,
}

fn recording_engine(config: Config) -> (Engine, Rc<RefCell<Record>>) {
    let rec = Rc::new(RefCell::new(Record::default()));
    let mut cbs = Callbacks::default();

    let r = rec.clone();
    cbs.on_tap = Some(Box::new(move |p| r.borrow_mut().taps.push(p)));
    let r = rec.clone();
    cbs.on_double_tap = Some(Box::new(move |p| r.borrow_mut().double_taps.push(p)));
    let r = rec.clone();
    cbs.on_long_press = Some(Box::new(move |p| r.borrow_mut().long_presses.push(p)));
    let r = rec.clone();
    cbs.on_swipe = Some(Box::new(move |d, v| r.borrow_mut().swipes.push((d, v))));
    let r = rec.clone();
    cbs.on_pinch_start = Some(Box::new(move |p| r.borrow_mut().pinch_starts.push(p)));
    let r = rec.clone();
    cbs.on_pinch = Some(Box::new(move |s, p| r.borrow_mut().pinches.push((s, p))));
    let r = rec.clone();
    cbs.on_pinch_end = Some(Box::new(move |s| r.borrow_mut().pinch_ends.push(s)));
    let r = rec.clone();
    cbs.on_rotate_start = Some(Box::new(move |p| r.borrow_mut().rotate_starts.push(p)));
    let r = rec.clone();
    cbs.on_rotate = Some(Box::new(move |d, p| r.borrow_mut().rotates.push((d, p))));
    let r = rec.clone();
    cbs.on_rotate_end = Some(Box::new(move |d| r.borrow_mut().rotate_ends.push(d)));

    (Engine::new(config, cbs), rec)
}

fn ev(t: u64, contacts: &[(u64, f32, f32)]) -> TouchEvent {
    TouchEvent::new(
        t,
        contacts
            .iter()
            .map(|&(id, x, y)| ContactSample { id, x, y })
            .collect(),
    )
}

#[test]
fn short_stationary_contact_is_one_tap() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 50.0, 50.0)]));
    e.on_event(TouchPhase::Move, &ev(30, &[(1, 53.0, 51.0)]));
    e.on_event(TouchPhase::End, &ev(60, &[(1, 53.0, 51.0)]));

    let rec = rec.borrow();
    assert_eq!(rec.taps.len(), 1);
    assert_eq!(rec.taps[0], Point::new(53.0, 51.0));
    assert!(rec.long_presses.is_empty());
    assert!(rec.swipes.is_empty());
    assert!(!e.is_active());
    assert!(!e.has_pending_long_press());
}

#[test]
fn second_touch_down_within_window_is_a_double_tap() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 10.0, 10.0)]));
    e.on_event(TouchPhase::End, &ev(40, &[(1, 10.0, 10.0)]));
    // Detected early, at the second touch-down, not at its release.
    e.on_event(TouchPhase::Start, &ev(200, &[(2, 11.0, 10.0)]));
    assert_eq!(rec.borrow().double_taps.len(), 1);
    e.on_event(TouchPhase::End, &ev(240, &[(2, 11.0, 10.0)]));

    let rec = rec.borrow();
    assert_eq!(rec.double_taps, vec![Point::new(11.0, 10.0)]);
    // The second sequence never fires a plain tap.
    assert_eq!(rec.taps.len(), 1);
}

#[test]
fn third_rapid_tap_is_not_a_second_double_tap() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    e.on_event(TouchPhase::End, &ev(30, &[(1, 0.0, 0.0)]));
    e.on_event(TouchPhase::Start, &ev(100, &[(2, 0.0, 0.0)]));
    e.on_event(TouchPhase::End, &ev(130, &[(2, 0.0, 0.0)]));
    e.on_event(TouchPhase::Start, &ev(200, &[(3, 0.0, 0.0)]));
    e.on_event(TouchPhase::End, &ev(230, &[(3, 0.0, 0.0)]));

    assert_eq!(rec.borrow().double_taps.len(), 1);
}

#[test]
fn held_stationary_contact_is_one_long_press_and_no_tap() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 20.0, 20.0)]));
    e.poll(300);
    assert!(rec.borrow().long_presses.is_empty());
    e.poll(500);
    e.poll(900); // repeated polls must not refire
    e.on_event(TouchPhase::End, &ev(1000, &[(1, 21.0, 20.0)]));

    let rec = rec.borrow();
    assert_eq!(rec.long_presses.len(), 1);
    assert_eq!(rec.long_presses[0], Point::new(20.0, 20.0));
    assert!(rec.taps.is_empty());
}

#[test]
fn long_press_respects_movement_tolerance() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    // 8 < 10 on both gates: the tap candidate and the timer survive the
    // move, and the fire-time re-check passes.
    e.on_event(TouchPhase::Move, &ev(100, &[(1, 8.0, 0.0)]));
    assert!(e.has_pending_long_press());
    e.poll(600);
    assert_eq!(rec.borrow().long_presses.len(), 1);
}

#[test]
fn fast_horizontal_release_is_a_right_swipe() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    e.on_event(TouchPhase::Move, &ev(100, &[(1, 150.0, 0.0)]));
    e.on_event(TouchPhase::End, &ev(120, &[(1, 150.0, 0.0)]));

    let rec = rec.borrow();
    assert_eq!(rec.swipes.len(), 1);
    let (dir, v) = rec.swipes[0];
    assert_eq!(dir, SwipeDirection::Right);
    assert!((v - 1.5).abs() < 1e-3, "velocity was {v}");
    // Movement disqualified the tap.
    assert!(rec.taps.is_empty());
}

#[test]
fn slow_drag_is_neither_tap_nor_swipe() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    e.on_event(TouchPhase::Move, &ev(400, &[(1, 80.0, 0.0)]));
    e.on_event(TouchPhase::End, &ev(500, &[(1, 80.0, 0.0)]));

    let rec = rec.borrow();
    assert!(rec.taps.is_empty());
    assert!(rec.swipes.is_empty());
}

#[test]
fn vertical_swipe_up_picks_the_dominant_axis() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 200.0)]));
    e.on_event(TouchPhase::Move, &ev(80, &[(1, 20.0, 40.0)]));
    e.on_event(TouchPhase::End, &ev(90, &[(1, 20.0, 40.0)]));

    let rec = rec.borrow();
    assert_eq!(rec.swipes.len(), 1);
    assert_eq!(rec.swipes[0].0, SwipeDirection::Up);
}

#[test]
fn stationary_two_fingers_pinch_at_exactly_one() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));
    e.on_event(TouchPhase::Move, &ev(16, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));

    let rec = rec.borrow();
    assert_eq!(rec.pinch_starts, vec![Point::new(50.0, 0.0)]);
    assert_eq!(rec.pinches.len(), 1);
    assert_eq!(rec.pinches[0].0, 1.0);
}

#[test]
fn spreading_fingers_doubles_the_scale() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    e.on_event(TouchPhase::Start, &ev(10, &[(2, 100.0, 0.0)]));
    e.on_event(TouchPhase::Move, &ev(50, &[(2, 200.0, 0.0)]));
    assert_eq!(e.output().scale, 2.0);
    e.on_event(TouchPhase::End, &ev(100, &[(2, 200.0, 0.0)]));

    let rec = rec.borrow();
    let (scale, center) = *rec.pinches.last().unwrap();
    assert_eq!(scale, 2.0);
    assert_eq!(center, Point::new(100.0, 0.0));
    assert_eq!(rec.pinch_ends, vec![2.0]);
    // One finger still down: the sequence is alive but no longer a pinch.
    assert!(e.is_active());
}

#[test]
fn quarter_turn_rotation_reports_ninety_degrees() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));
    e.on_event(TouchPhase::Move, &ev(60, &[(2, 0.0, 100.0)]));
    e.on_event(TouchPhase::End, &ev(120, &[(2, 0.0, 100.0)]));

    let rec = rec.borrow();
    assert_eq!(rec.rotate_starts, vec![Point::new(50.0, 0.0)]);
    let (delta, center) = *rec.rotates.last().unwrap();
    assert!((delta - 90.0).abs() < 1e-3, "delta was {delta}");
    assert_eq!(center, Point::new(0.0, 50.0));
    assert_eq!(rec.rotate_ends.len(), 1);
    assert!((rec.rotate_ends[0] - 90.0).abs() < 1e-3);
}

#[test]
fn cancel_mid_pinch_fires_no_end_callbacks() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));
    e.on_event(TouchPhase::Move, &ev(30, &[(2, 150.0, 0.0)]));
    e.on_event(TouchPhase::Cancel, &ev(40, &[]));

    let rec = rec.borrow();
    assert!(rec.pinch_ends.is_empty());
    assert!(rec.rotate_ends.is_empty());
    assert!(!e.is_active());
    assert!(!e.has_pending_long_press());
}

#[test]
fn reset_is_safe_at_any_point() {
    let (mut e, rec) = recording_engine(Config::default());
    e.reset();
    assert!(!e.output().is_active);

    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    e.reset();
    assert!(!e.output().is_active);
    assert!(!e.has_pending_long_press());
    e.poll(10_000);
    assert!(rec.borrow().long_presses.is_empty());

    // A reset also forgets the last tap, so no double-tap can bridge it.
    e.on_event(TouchPhase::Start, &ev(20_000, &[(1, 0.0, 0.0)]));
    e.on_event(TouchPhase::End, &ev(20_040, &[(1, 0.0, 0.0)]));
    e.reset();
    e.on_event(TouchPhase::Start, &ev(20_100, &[(2, 0.0, 0.0)]));
    assert!(rec.borrow().double_taps.is_empty());
}

#[test]
fn two_finger_lift_order_ends_gesture_then_sequence() {
    let (mut e, rec) = recording_engine(Config::default());
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    e.on_event(TouchPhase::Start, &ev(20, &[(2, 100.0, 0.0)]));
    e.on_event(TouchPhase::End, &ev(400, &[(1, 0.0, 0.0)]));
    assert!(e.is_active());
    assert_eq!(e.contact_count(), 1);
    e.on_event(TouchPhase::End, &ev(450, &[(2, 100.0, 0.0)]));
    assert!(!e.is_active());

    let rec = rec.borrow();
    assert_eq!(rec.pinch_ends.len(), 1);
    assert_eq!(rec.rotate_ends.len(), 1);
    // Late multi-finger release is not a swipe.
    assert!(rec.swipes.is_empty());
}

#[test]
fn disabled_classes_never_fire() {
    let mut cfg = Config::default();
    cfg.gestures.pinch = false;
    cfg.gestures.rotate = false;
    cfg.gestures.swipe = false;
    let (mut e, rec) = recording_engine(cfg);
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));
    e.on_event(TouchPhase::Move, &ev(50, &[(2, 300.0, 0.0)]));
    e.on_event(
        TouchPhase::End,
        &ev(80, &[(1, 0.0, 0.0), (2, 300.0, 0.0)]),
    );

    let rec = rec.borrow();
    assert!(rec.pinch_starts.is_empty());
    assert!(rec.pinches.is_empty());
    assert!(rec.rotate_starts.is_empty());
    assert!(rec.swipes.is_empty());
}

#[test]
fn reactive_output_tracks_and_clears_active_flag() {
    let (mut e, _rec) = recording_engine(Config::default());
    assert!(!e.output().is_active);
    e.on_event(TouchPhase::Start, &ev(0, &[(1, 0.0, 0.0)]));
    assert!(e.output().is_active);
    e.on_event(TouchPhase::End, &ev(40, &[(1, 0.0, 0.0)]));
    assert!(!e.output().is_active);
}
