//! Caller-supplied gesture hooks. Every entry is optional; the engine
//! no-ops on absent entries rather than assuming a fixed interface.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
        };
        f.write_str(s)
    }
}

pub type PointHandler = Box<dyn FnMut(Point)>;
pub type SwipeHandler = Box<dyn FnMut(SwipeDirection, f32)>;
pub type ScaledHandler = Box<dyn FnMut(f32, Point)>;
pub type ValueHandler = Box<dyn FnMut(f32)>;

/// The capability table. Fire-once hooks (`on_tap`, `on_swipe`, ...) are
/// invoked at the moment of classification; the continuous pinch/rotate
/// hooks fire per move event between their `*_start` and `*_end` pair.
#[derive(Default)]
pub struct Callbacks {
    pub on_tap: Option<PointHandler>,
    pub on_double_tap: Option<PointHandler>,
    pub on_long_press: Option<PointHandler>,
    /// Direction plus velocity magnitude in units per ms.
    pub on_swipe: Option<SwipeHandler>,
    pub on_pinch_start: Option<PointHandler>,
    /// Scale relative to the baseline distance, plus current midpoint.
    pub on_pinch: Option<ScaledHandler>,
    pub on_pinch_end: Option<ValueHandler>,
    pub on_rotate_start: Option<PointHandler>,
    /// Angle delta in degrees relative to the baseline, plus midpoint.
    pub on_rotate: Option<ScaledHandler>,
    pub on_rotate_end: Option<ValueHandler>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn set<T>(o: &Option<T>) -> &'static str {
            if o.is_some() { "set" } else { "-" }
        }
        f.debug_struct("Callbacks")
            .field("on_tap", &set(&self.on_tap))
            .field("on_double_tap", &set(&self.on_double_tap))
            .field("on_long_press", &set(&self.on_long_press))
            .field("on_swipe", &set(&self.on_swipe))
            .field("on_pinch", &set(&self.on_pinch))
            .field("on_rotate", &set(&self.on_rotate))
            .finish()
    }
}
