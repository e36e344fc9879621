//! The touch ledger: in-place mutable record of the current gesture
//! sequence, from first finger down to all fingers up.

use crate::geometry::Point;

/// One active finger. Created on contact-start, mutated in place on
/// contact-move, removed on contact-end/cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: u64,
    pub start: Point,
    pub current: Point,
}

impl Contact {
    pub fn new(id: u64, at: Point) -> Self {
        Self {
            id,
            start: at,
            current: at,
        }
    }
}

/// The pending long-press deferred callback, as a scoped resource: armed
/// at most once per single-contact sequence, and dropped synchronously on
/// every exit path that is not the timer naturally firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPressTimer {
    pub deadline_ms: u64,
}

/// Per-sequence state. Invariant: `long_press` is `Some` only while
/// `active && contacts.len() == 1 && tap_candidate`; any mutation that
/// breaks that precondition must call [`Ledger::disarm_long_press`] in the
/// same handler. Invariant: `contacts` never holds two entries with the
/// same id (insertion order is touch-down order).
#[derive(Debug, Default)]
pub struct Ledger {
    pub active: bool,
    pub sequence_start_ms: u64,
    pub contacts: Vec<Contact>,
    pub pinch_baseline: Option<f32>,
    pub pinch_scale: f32,
    pub rotate_baseline: Option<f32>,
    pub rotate_delta: f32,
    pub long_press: Option<LongPressTimer>,
    pub tap_candidate: bool,
    pub last_velocity: (f32, f32),
    pub last_move_ms: u64,
}

impl Ledger {
    pub fn contact(&self, id: u64) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn contact_mut(&mut self, id: u64) -> Option<&mut Contact> {
        self.contacts.iter_mut().find(|c| c.id == id)
    }

    /// Appends a contact unless the id is already tracked (silent no-op).
    pub fn insert(&mut self, id: u64, at: Point) {
        if self.contact(id).is_none() {
            self.contacts.push(Contact::new(id, at));
        }
    }

    /// Removes a contact by id; returns whether it was present.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        self.contacts.len() != before
    }

    pub fn arm_long_press(&mut self, deadline_ms: u64) {
        self.long_press = Some(LongPressTimer { deadline_ms });
    }

    pub fn disarm_long_press(&mut self) {
        self.long_press = None;
    }

    /// Returns the ledger to its zero value, dropping any pending timer.
    pub fn reset(&mut self) {
        *self = Ledger::default();
    }
}
