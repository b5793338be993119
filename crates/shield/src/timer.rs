//! Generation-checked timer queue.
//!
//! Timers run over a virtual monotonic clock: the host advances it from
//! whatever real event loop it sits in, and tests advance it directly.
//! Every entry carries the session generation that armed it; superseded
//! generations are cancelled eagerly, and stale entries that slip through
//! are dropped again on the fire path.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Session generation token. Strictly increasing; stale timer callbacks
/// compare theirs against the live one and no-op on mismatch.
pub type Generation = u64;

/// What a timer entry does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Primary shield window elapsed.
    PrimaryElapsed,
    /// Secondary shield window elapsed.
    SecondaryElapsed,
    /// One-second cosmetic countdown tick.
    CountdownTick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    deadline: Duration,
    /// Arming order, for deterministic firing at equal deadlines.
    seq: u64,
    generation: Generation,
    kind: TimerKind,
}

// BinaryHeap is a max-heap; invert so the earliest deadline surfaces.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual-time timer queue.
pub struct TimerQueue {
    now: Duration,
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending entries.
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    /// Arm a timer `delay` from now for `generation`.
    pub fn schedule(&mut self, delay: Duration, generation: Generation, kind: TimerKind) {
        let entry = Entry {
            deadline: self.now + delay,
            seq: self.next_seq,
            generation,
            kind,
        };
        self.next_seq += 1;
        self.heap.push(entry);
    }

    /// Drop every pending entry armed by `generation`.
    pub fn cancel_generation(&mut self, generation: Generation) {
        self.heap.retain(|e| e.generation != generation);
    }

    /// Drop everything.
    pub fn cancel_all(&mut self) {
        self.heap.clear();
    }

    /// Fire the next entry due at or before `target`, advancing the clock
    /// to its deadline. Returns `None` once nothing is due, leaving the
    /// clock at `target`.
    ///
    /// Firing one entry at a time lets the caller re-arm (the countdown
    /// tick does) and still have the new entry considered within the same
    /// advance window.
    pub fn fire_next(&mut self, target: Duration) -> Option<(Generation, TimerKind)> {
        let due = matches!(self.heap.peek(), Some(entry) if entry.deadline <= target);
        if due {
            let entry = self.heap.pop()?;
            self.now = entry.deadline.max(self.now);
            Some((entry.generation, entry.kind))
        } else {
            self.now = target;
            None
        }
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}
