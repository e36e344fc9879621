//! Haptic output capability. Pulses are fire-and-forget: the engine never
//! learns whether the device vibrated, and a missing device is a no-op.

use log::debug;

/// Pulse strengths the classifier emits. Patterns are vibration durations
/// in ms, with pauses between entries (the `navigator.vibrate` convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    /// Sequence start acknowledgement.
    Light,
    /// Swipe recognized.
    Medium,
    /// Long-press recognized.
    Strong,
    /// Double-tap recognized: two short pulses with a gap.
    DoublePulse,
}

impl Pulse {
    pub fn pattern(self) -> &'static [u64] {
        match self {
            Pulse::Light => &[10],
            Pulse::Medium => &[20],
            Pulse::Strong => &[50],
            Pulse::DoublePulse => &[10, 30, 10],
        }
    }
}

/// A vibration sink. Implementations must not block or error; absence of
/// hardware is expressed by doing nothing.
pub trait Haptics {
    fn pulse(&mut self, pulse: Pulse);
}

/// The reduced-motion preference source. Queried at the moment a pulse
/// would fire, so hosts may flip it at any time.
pub trait MotionPrefs {
    fn reduced_motion(&self) -> bool;
}

/// No hardware, no output.
#[derive(Debug, Default)]
pub struct NullHaptics;

impl Haptics for NullHaptics {
    fn pulse(&mut self, _pulse: Pulse) {}
}

/// Logs pulses instead of vibrating; the host binary's default sink.
#[derive(Debug, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn pulse(&mut self, pulse: Pulse) {
        debug!("haptic pulse {:?} {:?}", pulse, pulse.pattern());
    }
}

/// A fixed preference value, for hosts without a preference service.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMotionPrefs(pub bool);

impl MotionPrefs for StaticMotionPrefs {
    fn reduced_motion(&self) -> bool {
        self.0
    }
}
