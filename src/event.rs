//! Touch lifecycle events as delivered by a host input surface.

use serde::{Deserialize, Serialize};

/// One contact descriptor carried by an event. Events list only the
/// contacts implicated in that event, not every active contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactSample {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub timestamp_ms: u64,
    pub contacts: Vec<ContactSample>,
}

impl TouchEvent {
    pub fn new(timestamp_ms: u64, contacts: Vec<ContactSample>) -> Self {
        Self {
            timestamp_ms,
            contacts,
        }
    }
}
