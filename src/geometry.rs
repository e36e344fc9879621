//! Geometry primitives shared by the ledger and classifier.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Angle of the segment a→b in degrees, in (-180, 180].
///
/// Not symmetric: swapping arguments flips the result by 180° (mod 360).
/// Rotation baselines and current readings must therefore use the same
/// contact ordering (ledger insertion order) or the sign is corrupted.
pub fn angle_deg(a: Point, b: Point) -> f32 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Arithmetic midpoint of a and b.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}
