//! Deterministic trace replay: feed a recorded JSON event stream through
//! the engine and print the recognized gestures. No devices needed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use gesturectl::{Callbacks, Config, ContactSample, Engine, TouchEvent, TouchPhase};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Milliseconds from trace start.
    pub t: u64,
    pub phase: TouchPhase,
    pub contacts: Vec<ContactSample>,
}

pub fn run(path: &str, config: Config) -> Result<()> {
    let txt = fs::read_to_string(Path::new(path)).with_context(|| format!("reading {path}"))?;
    let records: Vec<TraceRecord> =
        serde_json::from_str(&txt).with_context(|| format!("parsing {path}"))?;

    let long_press_ms = config.long_press_ms;
    let mut engine = Engine::new(config, printing_callbacks());

    let mut last_t = 0;
    for rec in &records {
        // Fire any timer that would have matured before this event.
        engine.poll(rec.t);
        engine.on_event(rec.phase, &TouchEvent::new(rec.t, rec.contacts.clone()));
        last_t = rec.t;
    }
    // Let a press still held at end of trace mature.
    engine.poll(last_t + long_press_ms);
    engine.reset();
    Ok(())
}

fn printing_callbacks() -> Callbacks {
    let mut cbs = Callbacks::default();
    cbs.on_tap = Some(Box::new(|p| println!("tap ({:.0}, {:.0})", p.x, p.y)));
    cbs.on_double_tap = Some(Box::new(|p| {
        println!("double-tap ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_long_press = Some(Box::new(|p| {
        println!("long-press ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_swipe = Some(Box::new(|dir, v| println!("swipe {dir} ({v:.2} units/ms)")));
    cbs.on_pinch_start = Some(Box::new(|p| {
        println!("pinch start ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_pinch = Some(Box::new(|scale, p| {
        println!("pinch {:.3} at ({:.0}, {:.0})", scale, p.x, p.y)
    }));
    cbs.on_pinch_end = Some(Box::new(|scale| println!("pinch end {scale:.3}")));
    cbs.on_rotate_start = Some(Box::new(|p| {
        println!("rotate start ({:.0}, {:.0})", p.x, p.y)
    }));
    cbs.on_rotate = Some(Box::new(|deg, p| {
        println!("rotate {:.1} deg at ({:.0}, {:.0})", deg, p.x, p.y)
    }));
    cbs.on_rotate_end = Some(Box::new(|deg| println!("rotate end {deg:.1} deg")));
    cbs
}
