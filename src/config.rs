//! Engine configuration: which gesture classes run and their thresholds.

use serde::Deserialize;
use thiserror::Error;

/// Fixed window after sequence start within which a lifted contact can
/// still classify as a swipe.
pub const SWIPE_WINDOW_MS: u64 = 300;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be a positive duration")]
    ZeroTimeout(&'static str),
    #[error("{0} must be non-negative")]
    NegativeDistance(&'static str),
}

/// Gesture classes the engine evaluates. Disabled classes are skipped
/// entirely: no baselines captured, no timers armed, no callbacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GestureSet {
    pub tap: bool,
    pub double_tap: bool,
    pub long_press: bool,
    pub swipe: bool,
    pub pinch: bool,
    pub rotate: bool,
}

impl Default for GestureSet {
    fn default() -> Self {
        Self {
            tap: true,
            double_tap: true,
            long_press: true,
            swipe: true,
            pinch: true,
            rotate: true,
        }
    }
}

/// Immutable for the engine's lifetime; a host wanting new values builds a
/// new engine (see the profile reload path in the binary).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gestures: GestureSet,
    /// Displacement separating "stationary" from "moved", in device units.
    pub move_threshold_px: f32,
    /// Minimum velocity magnitude for swipe recognition, units per ms.
    pub swipe_velocity: f32,
    pub double_tap_ms: u64,
    pub long_press_ms: u64,
    /// Movement tolerance re-checked when the long-press timer fires.
    /// Deliberately distinct from `move_threshold_px`; see DESIGN.md.
    pub long_press_tolerance_px: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gestures: GestureSet::default(),
            move_threshold_px: 10.0,
            swipe_velocity: 0.3,
            double_tap_ms: 300,
            long_press_ms: 500,
            long_press_tolerance_px: 10.0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.double_tap_ms == 0 {
            return Err(ConfigError::ZeroTimeout("double_tap_ms"));
        }
        if self.long_press_ms == 0 {
            return Err(ConfigError::ZeroTimeout("long_press_ms"));
        }
        if self.move_threshold_px < 0.0 {
            return Err(ConfigError::NegativeDistance("move_threshold_px"));
        }
        if self.swipe_velocity < 0.0 {
            return Err(ConfigError::NegativeDistance("swipe_velocity"));
        }
        if self.long_press_tolerance_px < 0.0 {
            return Err(ConfigError::NegativeDistance("long_press_tolerance_px"));
        }
        Ok(())
    }
}
