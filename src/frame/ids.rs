//! Frame id allocation.
//!
//! Ids come from a process-wide counter so that two frames built anywhere in
//! the program never collide. The counter starts above every id used by the
//! sample project.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// First id handed out by the process-wide allocator.
pub const FIRST_FRAME_ID: u32 = 10_000;

/// Largest id a frame may carry into the tree from outside the allocator.
///
/// Everything above it is headroom for ids allocated after a reservation.
pub const MAX_FRAME_ID: u32 = u32::MAX / 2;

static NEXT_FRAME_ID: AtomicU32 = AtomicU32::new(FIRST_FRAME_ID);

/// Stable handle for a frame anywhere in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub u32);

impl FrameId {
    /// Whether a frame built elsewhere may bring this id into the tree.
    pub fn is_storable(self) -> bool {
        self.0 <= MAX_FRAME_ID
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A source of fresh frame ids. Ids are increasing and never reused.
pub trait IdSource {
    /// The next id, or `None` once the id space is used up.
    fn try_next_id(&mut self) -> Option<FrameId>;

    /// The next id.
    ///
    /// # Panics
    ///
    /// Panics if the id space is used up.
    fn next_id(&mut self) -> FrameId {
        self.try_next_id()
            .unwrap_or_else(|| panic!("frame id space exhausted"))
    }
}

/// The process-wide allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessIds;

impl IdSource for ProcessIds {
    fn try_next_id(&mut self) -> Option<FrameId> {
        NEXT_FRAME_ID
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| next.checked_add(1))
            .ok()
            .map(FrameId)
    }
}

/// A local counter, for when ids must be predictable.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }
}

impl IdSource for SequentialIds {
    fn try_next_id(&mut self) -> Option<FrameId> {
        let id = FrameId(self.next);
        self.next = self.next.checked_add(1)?;
        Some(id)
    }
}

/// Make sure the process-wide allocator never hands out `id` or anything below it.
///
/// Called after frames with externally chosen ids (loaded or sample data) enter
/// the process. Reserving `u32::MAX` leaves the allocator exhausted rather than
/// wrapping to ids already in use.
pub fn reserve_ids_through(id: FrameId) {
    NEXT_FRAME_ID.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
}
