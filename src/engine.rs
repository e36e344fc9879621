//! Event dispatcher and gesture classifier.
//!
//! All mutation happens synchronously on the thread delivering events; the
//! only deferred element is the long-press timer, which the host drives by
//! calling [`Engine::poll`] with its clock. Nothing on the event path can
//! fail: unknown contact ids are ignored, zero denominators skip that
//! sample, and haptic output is best effort.

use log::debug;

use crate::callbacks::{Callbacks, SwipeDirection};
use crate::config::{Config, SWIPE_WINDOW_MS};
use crate::event::{TouchEvent, TouchPhase};
use crate::geometry::{self, Point};
use crate::haptics::{Haptics, MotionPrefs, NullHaptics, Pulse, StaticMotionPrefs};
use crate::ledger::{Contact, Ledger};

/// Live values for consumers that need continuous visual feedback (for
/// example a pinch cursor), kept in sync with the ledger separately from
/// the fire-once callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Output {
    pub scale: f32,
    pub rotation_deg: f32,
    pub center: Point,
    pub is_active: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_deg: 0.0,
            center: Point::default(),
            is_active: false,
        }
    }
}

pub struct Engine {
    config: Config,
    callbacks: Callbacks,
    haptics: Box<dyn Haptics>,
    prefs: Box<dyn MotionPrefs>,
    ledger: Ledger,
    /// Survives sequence resets so a double-tap can span two sequences;
    /// cleared only by [`Engine::reset`].
    last_tap_ms: u64,
    output: Output,
}

impl Engine {
    pub fn new(config: Config, callbacks: Callbacks) -> Self {
        Self {
            config,
            callbacks,
            haptics: Box::new(NullHaptics),
            prefs: Box::new(StaticMotionPrefs(false)),
            ledger: Ledger::default(),
            last_tap_ms: 0,
            output: Output::default(),
        }
    }

    pub fn with_haptics(mut self, haptics: Box<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn with_motion_prefs(mut self, prefs: Box<dyn MotionPrefs>) -> Self {
        self.prefs = prefs;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn is_active(&self) -> bool {
        self.ledger.active
    }

    pub fn has_pending_long_press(&self) -> bool {
        self.ledger.long_press.is_some()
    }

    pub fn contact_count(&self) -> usize {
        self.ledger.contacts.len()
    }

    /// Convenience dispatcher over the four lifecycle handlers.
    pub fn on_event(&mut self, phase: TouchPhase, event: &TouchEvent) {
        match phase {
            TouchPhase::Start => self.on_start(event),
            TouchPhase::Move => self.on_move(event),
            TouchPhase::End => self.on_end(event),
            TouchPhase::Cancel => self.on_cancel(event),
        }
    }

    pub fn on_start(&mut self, event: &TouchEvent) {
        let t = event.timestamp_ms;
        let was_inactive = !self.ledger.active;

        for s in &event.contacts {
            self.ledger.insert(s.id, Point::new(s.x, s.y));
        }
        if self.ledger.contacts.is_empty() {
            return;
        }

        if was_inactive {
            self.ledger.active = true;
            self.ledger.sequence_start_ms = t;
            self.ledger.last_move_ms = t;
            self.ledger.tap_candidate = true;
            self.output.is_active = true;
            self.fire_pulse(Pulse::Light);
            if self.config.gestures.long_press && self.ledger.contacts.len() == 1 {
                self.ledger.arm_long_press(t + self.config.long_press_ms);
            }
        }

        // Double-tap fires early, at the second touch-down, not at its
        // release. The zero sentinel blocks a third rapid tap from being
        // read as another double-tap.
        if self.config.gestures.double_tap
            && self.ledger.contacts.len() == 1
            && self.last_tap_ms != 0
            && t.saturating_sub(self.last_tap_ms) < self.config.double_tap_ms
        {
            let pos = self.ledger.contacts[0].current;
            self.last_tap_ms = 0;
            self.ledger.tap_candidate = false;
            self.ledger.disarm_long_press();
            debug!("double tap at ({:.1}, {:.1})", pos.x, pos.y);
            if let Some(cb) = self.callbacks.on_double_tap.as_mut() {
                cb(pos);
            }
            self.fire_pulse(Pulse::DoublePulse);
        }

        if self.ledger.contacts.len() >= 2 {
            // Single-contact precondition for the timer is gone.
            self.ledger.disarm_long_press();
        }

        if self.ledger.contacts.len() == 2 {
            let a = self.ledger.contacts[0].current;
            let b = self.ledger.contacts[1].current;
            let mid = geometry::midpoint(a, b);
            self.output.center = mid;
            if self.config.gestures.pinch {
                self.ledger.pinch_baseline = Some(geometry::distance(a, b));
                self.ledger.pinch_scale = 1.0;
                self.output.scale = 1.0;
                if let Some(cb) = self.callbacks.on_pinch_start.as_mut() {
                    cb(mid);
                }
            }
            if self.config.gestures.rotate {
                self.ledger.rotate_baseline = Some(geometry::angle_deg(a, b));
                self.ledger.rotate_delta = 0.0;
                self.output.rotation_deg = 0.0;
                if let Some(cb) = self.callbacks.on_rotate_start.as_mut() {
                    cb(mid);
                }
            }
        }
    }

    pub fn on_move(&mut self, event: &TouchEvent) {
        if !self.ledger.active {
            return;
        }
        let t = event.timestamp_ms;
        let dt = t.saturating_sub(self.ledger.last_move_ms);

        for s in &event.contacts {
            let Some(c) = self.ledger.contact_mut(s.id) else {
                continue;
            };
            let prev = c.current;
            // Position always advances, even when dt == 0; velocity only
            // updates with a non-zero denominator.
            c.current = Point::new(s.x, s.y);
            if dt > 0 {
                let v = ((s.x - prev.x) / dt as f32, (s.y - prev.y) / dt as f32);
                self.ledger.last_velocity = v;
            }
        }
        self.ledger.last_move_ms = t;

        if self.ledger.tap_candidate && self.ledger.contacts.len() == 1 {
            let c = &self.ledger.contacts[0];
            let disp = geometry::distance(c.start, c.current);
            if disp > self.config.move_threshold_px {
                debug!("tap candidate dropped, moved {disp:.1}");
                self.ledger.tap_candidate = false;
                self.ledger.disarm_long_press();
            }
        }

        if self.ledger.contacts.len() == 2 {
            let a = self.ledger.contacts[0].current;
            let b = self.ledger.contacts[1].current;
            let mid = geometry::midpoint(a, b);

            if self.config.gestures.pinch {
                if let Some(base) = self.ledger.pinch_baseline {
                    if base > 0.0 {
                        let scale = geometry::distance(a, b) / base;
                        self.ledger.pinch_scale = scale;
                        self.output.scale = scale;
                        self.output.center = mid;
                        if let Some(cb) = self.callbacks.on_pinch.as_mut() {
                            cb(scale, mid);
                        }
                    }
                }
            }

            if self.config.gestures.rotate {
                if let Some(base) = self.ledger.rotate_baseline {
                    let delta = geometry::angle_deg(a, b) - base;
                    self.ledger.rotate_delta = delta;
                    self.output.rotation_deg = delta;
                    self.output.center = mid;
                    if let Some(cb) = self.callbacks.on_rotate.as_mut() {
                        cb(delta, mid);
                    }
                }
            }
        }
    }

    pub fn on_end(&mut self, event: &TouchEvent) {
        if !self.ledger.active {
            return;
        }
        let t = event.timestamp_ms;

        let mut ended: Vec<Contact> = Vec::new();
        for s in &event.contacts {
            if let Some(c) = self.ledger.contact_mut(s.id) {
                c.current = Point::new(s.x, s.y);
                let snapshot = c.clone();
                self.ledger.remove(s.id);
                ended.push(snapshot);
            }
        }

        if self.ledger.tap_candidate && ended.len() == 1 && self.ledger.contacts.is_empty() {
            let pos = ended[0].current;
            self.last_tap_ms = t;
            if self.config.gestures.tap {
                debug!("tap at ({:.1}, {:.1})", pos.x, pos.y);
                if let Some(cb) = self.callbacks.on_tap.as_mut() {
                    cb(pos);
                }
            }
        }

        // Swipe classification is independent of the tap outcome.
        if self.config.gestures.swipe
            && ended.len() == 1
            && t.saturating_sub(self.ledger.sequence_start_ms) < SWIPE_WINDOW_MS
        {
            let c = &ended[0];
            let disp = geometry::distance(c.start, c.current);
            let (vx, vy) = self.ledger.last_velocity;
            let vmag = (vx * vx + vy * vy).sqrt();
            if disp > self.config.move_threshold_px && vmag > self.config.swipe_velocity {
                let dx = c.current.x - c.start.x;
                let dy = c.current.y - c.start.y;
                let dir = if dx.abs() >= dy.abs() {
                    if dx > 0.0 {
                        SwipeDirection::Right
                    } else {
                        SwipeDirection::Left
                    }
                } else if dy > 0.0 {
                    SwipeDirection::Down
                } else {
                    SwipeDirection::Up
                };
                debug!("swipe {dir} at {vmag:.2} units/ms");
                if let Some(cb) = self.callbacks.on_swipe.as_mut() {
                    cb(dir, vmag);
                }
                self.fire_pulse(Pulse::Medium);
            }
        }

        if self.ledger.contacts.len() < 2 {
            if self.ledger.pinch_baseline.take().is_some() {
                let scale = self.ledger.pinch_scale;
                if let Some(cb) = self.callbacks.on_pinch_end.as_mut() {
                    cb(scale);
                }
            }
            if self.ledger.rotate_baseline.take().is_some() {
                let delta = self.ledger.rotate_delta;
                if let Some(cb) = self.callbacks.on_rotate_end.as_mut() {
                    cb(delta);
                }
            }
        }

        if self.ledger.contacts.is_empty() {
            self.ledger.reset();
            self.output.is_active = false;
        }
    }

    /// Aborts the sequence with no callbacks, regardless of how many
    /// contacts the event names or how many remain.
    pub fn on_cancel(&mut self, _event: &TouchEvent) {
        self.ledger.disarm_long_press();
        self.ledger.reset();
        self.output.is_active = false;
    }

    /// Drives the long-press timer. Hosts call this from their loop tick;
    /// the timer fires at most once and re-checks its preconditions, so a
    /// late or repeated poll is harmless.
    pub fn poll(&mut self, now_ms: u64) {
        let Some(timer) = self.ledger.long_press else {
            return;
        };
        if now_ms < timer.deadline_ms {
            return;
        }
        self.ledger.disarm_long_press();

        if !(self.ledger.active && self.ledger.contacts.len() == 1) {
            return;
        }
        let c = &self.ledger.contacts[0];
        if geometry::distance(c.start, c.current) > self.config.long_press_tolerance_px {
            return;
        }
        let pos = c.current;
        self.ledger.tap_candidate = false;
        debug!("long press at ({:.1}, {:.1})", pos.x, pos.y);
        if let Some(cb) = self.callbacks.on_long_press.as_mut() {
            cb(pos);
        }
        self.fire_pulse(Pulse::Strong);
    }

    /// Force-clears all state and pending timers; for host teardown or
    /// aborting a gesture mid-flight.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.last_tap_ms = 0;
        self.output = Output::default();
    }

    fn fire_pulse(&mut self, pulse: Pulse) {
        // The preference is re-read every time, not cached at build.
        if self.prefs.reduced_motion() {
            return;
        }
        self.haptics.pulse(pulse);
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("ledger", &self.ledger)
            .field("output", &self.output)
            .finish()
    }
}
