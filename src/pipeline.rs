//! Foreground run loop: evdev MT frames in, gesture log lines out.
//!
//! Raw ABS_MT events are decoded per-slot into lifecycle events the engine
//! consumes. The loop also drives the long-press timer, grabs devices
//! while a multi-contact gesture is live, reloads the active profile when
//! the profiles directory changes, and shuts down cleanly on
//! SIGINT/SIGTERM (resetting the engine so no timer outlives the host).

use anyhow::{Result, bail};
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use evdev::{AbsoluteAxisCode, Device, EventType, SynchronizationCode};
use notify::{RecursiveMode, Watcher, recommended_watcher};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use gesturectl::{
    Callbacks, Config, ContactSample, Engine, LogHaptics, MotionPrefs, TouchEvent, TouchPhase,
};

use crate::input;
use crate::profile::ProfileStore;

const SLOT_COUNT: usize = 10;
const IDLE_SLEEP: Duration = Duration::from_millis(4);

/// Reduced-motion preference shared with the profile reload path.
struct SharedMotionPrefs(Arc<AtomicBool>);

impl MotionPrefs for SharedMotionPrefs {
    fn reduced_motion(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    tracking_id: i32, // -1 = empty
    x: f32,
    y: f32,
    appeared: bool,
    moved: bool,
    released_id: i32, // -1 = none this frame
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            tracking_id: -1,
            x: 0.0,
            y: 0.0,
            appeared: false,
            moved: false,
            released_id: -1,
        }
    }
}

/// Translates MT protocol B (slot/tracking-id/position, SYN_REPORT framed)
/// into the engine's lifecycle events.
#[derive(Debug)]
pub struct SlotDecoder {
    slots: [Slot; SLOT_COUNT],
    cur: usize,
}

impl Default for SlotDecoder {
    fn default() -> Self {
        Self {
            slots: [Slot::default(); SLOT_COUNT],
            cur: 0,
        }
    }
}

impl SlotDecoder {
    pub fn on_slot(&mut self, slot: i32) {
        self.cur = slot.clamp(0, SLOT_COUNT as i32 - 1) as usize;
    }

    pub fn on_tracking_id(&mut self, tracking_id: i32) {
        let s = &mut self.slots[self.cur];
        if tracking_id < 0 {
            if s.tracking_id >= 0 {
                s.released_id = s.tracking_id;
            }
            s.tracking_id = -1;
            s.appeared = false;
            s.moved = false;
        } else {
            s.tracking_id = tracking_id;
            s.appeared = true;
            s.moved = false;
        }
    }

    pub fn on_pos_x(&mut self, raw: i32) {
        let s = &mut self.slots[self.cur];
        s.x = raw as f32;
        if !s.appeared {
            s.moved = true;
        }
    }

    pub fn on_pos_y(&mut self, raw: i32) {
        let s = &mut self.slots[self.cur];
        s.y = raw as f32;
        if !s.appeared {
            s.moved = true;
        }
    }

    /// Flushes the frame into zero or more lifecycle events.
    pub fn on_syn_report(&mut self, now_ms: u64) -> Vec<(TouchPhase, TouchEvent)> {
        let mut starts = Vec::new();
        let mut moves = Vec::new();
        let mut ends = Vec::new();

        for s in self.slots.iter_mut() {
            if s.released_id >= 0 {
                ends.push(ContactSample {
                    id: s.released_id as u64,
                    x: s.x,
                    y: s.y,
                });
                s.released_id = -1;
            }
            if s.tracking_id < 0 {
                continue;
            }
            let sample = ContactSample {
                id: s.tracking_id as u64,
                x: s.x,
                y: s.y,
            };
            if s.appeared {
                starts.push(sample);
                s.appeared = false;
                s.moved = false;
            } else if s.moved {
                moves.push(sample);
                s.moved = false;
            }
        }

        let mut out = Vec::new();
        if !starts.is_empty() {
            out.push((TouchPhase::Start, TouchEvent::new(now_ms, starts)));
        }
        if !moves.is_empty() {
            out.push((TouchPhase::Move, TouchEvent::new(now_ms, moves)));
        }
        if !ends.is_empty() {
            out.push((TouchPhase::End, TouchEvent::new(now_ms, ends)));
        }
        out
    }
}

/// Builds an engine whose callbacks log each recognized gesture.
pub fn build_engine(config: Config, reduced: Arc<AtomicBool>) -> Engine {
    let mut cbs = Callbacks::default();
    cbs.on_tap = Some(Box::new(|p| info!("tap at ({:.0}, {:.0})", p.x, p.y)));
    cbs.on_double_tap = Some(Box::new(|p| {
        info!("double tap at ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_long_press = Some(Box::new(|p| {
        info!("long press at ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_swipe = Some(Box::new(|dir, v| info!("swipe {dir} ({v:.2} units/ms)")));
    cbs.on_pinch_start = Some(Box::new(|p| {
        info!("pinch start at ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_pinch_end = Some(Box::new(|scale| info!("pinch end, scale {scale:.2}")));
    cbs.on_rotate_start = Some(Box::new(|p| {
        info!("rotate start at ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_rotate_end = Some(Box::new(|deg| info!("rotate end, {deg:.1} deg")));

    Engine::new(config, cbs)
        .with_haptics(Box::new(LogHaptics))
        .with_motion_prefs(Box::new(SharedMotionPrefs(reduced)))
}

pub fn run(mut store: ProfileStore, device: Option<String>) -> Result<()> {
    let mut devices: Vec<(Device, SlotDecoder)> = Vec::new();
    match &device {
        Some(path) => {
            let (dev, info) = input::open_device(path)?;
            info!("using {} ({})", info.path, info.name);
            devices.push((dev, SlotDecoder::default()));
        }
        None => {
            let found = input::discover_multitouch();
            if found.is_empty() {
                bail!("no multitouch devices detected; see `gesturectl doctor`");
            }
            for d in found {
                match Device::open(&d.path) {
                    Ok(dev) => {
                        info!("using {} ({})", d.path, d.name);
                        devices.push((dev, SlotDecoder::default()));
                    }
                    Err(e) => warn!("failed to open {}: {e}", d.path),
                }
            }
        }
    }
    if devices.is_empty() {
        bail!("failed to open any multitouch device");
    }
    for (dev, _) in devices.iter_mut() {
        let _ = dev.set_nonblocking(true);
    }

    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    let (watch_tx, watch_rx) = mpsc::channel();
    let mut watcher = recommended_watcher(watch_tx)?;
    watcher.watch(&store.profiles_dir, RecursiveMode::NonRecursive)?;

    let reduced = Arc::new(AtomicBool::new(store.profile.meta.reduced_motion));
    let mut engine = build_engine(store.profile.engine_config(), reduced.clone());
    info!("active profile '{}'", store.active_name);

    let clock = Instant::now();
    let mut grabbed = false;

    loop {
        if signals.pending().next().is_some() {
            info!("shutting down");
            break;
        }

        // Profile edits swap the engine between frames; the last good
        // profile stays in force when the new one fails to parse.
        let mut profile_dirty = false;
        while let Ok(event) = watch_rx.try_recv() {
            if event.is_ok() {
                profile_dirty = true;
            }
        }
        if profile_dirty {
            match store.reload() {
                Ok(()) => {
                    engine.reset();
                    reduced.store(store.profile.meta.reduced_motion, Ordering::Relaxed);
                    engine = build_engine(store.profile.engine_config(), reduced.clone());
                    info!("profile '{}' reloaded", store.active_name);
                }
                Err(e) => error!("profile reload failed, keeping last good: {e}"),
            }
        }

        let now_ms = clock.elapsed().as_millis() as u64;
        let mut any_event = false;

        for (dev, decoder) in devices.iter_mut() {
            let Ok(events) = dev.fetch_events() else {
                continue;
            };
            for ev in events {
                any_event = true;
                if ev.event_type() == EventType::ABSOLUTE {
                    match ev.code() {
                        c if c == AbsoluteAxisCode::ABS_MT_SLOT.0 => decoder.on_slot(ev.value()),
                        c if c == AbsoluteAxisCode::ABS_MT_TRACKING_ID.0 => {
                            decoder.on_tracking_id(ev.value())
                        }
                        c if c == AbsoluteAxisCode::ABS_MT_POSITION_X.0 => {
                            decoder.on_pos_x(ev.value())
                        }
                        c if c == AbsoluteAxisCode::ABS_MT_POSITION_Y.0 => {
                            decoder.on_pos_y(ev.value())
                        }
                        _ => {}
                    }
                } else if ev.event_type() == EventType::SYNCHRONIZATION
                    && ev.code() == SynchronizationCode::SYN_REPORT.0
                {
                    for (phase, event) in decoder.on_syn_report(now_ms) {
                        engine.on_event(phase, &event);
                    }
                }
            }
        }

        engine.poll(now_ms);

        // Hold the devices while a two-finger gesture is live so the
        // desktop doesn't also interpret it.
        let want_grab = engine.contact_count() >= 2;
        if want_grab && !grabbed {
            for (dev, _) in devices.iter_mut() {
                let _ = dev.grab();
            }
            grabbed = true;
        } else if !want_grab && grabbed {
            for (dev, _) in devices.iter_mut() {
                let _ = dev.ungrab();
            }
            grabbed = false;
        }

        if !any_event {
            std::thread::sleep(IDLE_SLEEP);
        }
    }

    // Teardown: no timer may survive the host.
    engine.reset();
    if grabbed {
        for (dev, _) in devices.iter_mut() {
            let _ = dev.ungrab();
        }
    }
    Ok(())
}
