//! Multi-touch gesture recognition engine.
//!
//! Feed the four lifecycle events (`start`, `move`, `end`, `cancel`) from
//! any input surface into an [`Engine`] and receive disambiguated gesture
//! callbacks: tap, double-tap, long-press, directional swipe, pinch, and
//! rotate. Single-threaded and allocation-light; the host drives the one
//! deferred timer through [`Engine::poll`]. Hosts binding to a browser-like
//! surface must disable the surface's default gesture handling (for example
//! pinch-to-zoom) while the engine is attached.

pub mod callbacks;
pub mod config;
pub mod engine;
pub mod event;
pub mod geometry;
pub mod haptics;
pub mod ledger;

pub use callbacks::{Callbacks, SwipeDirection};
pub use config::{Config, ConfigError, GestureSet};
pub use engine::{Engine, Output};
pub use event::{ContactSample, TouchEvent, TouchPhase};
pub use geometry::Point;
pub use haptics::{Haptics, LogHaptics, MotionPrefs, NullHaptics, Pulse, StaticMotionPrefs};
