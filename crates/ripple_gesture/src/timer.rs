//! Cancelable deadline timers
//!
//! Recognizers never block waiting for a deadline. They schedule a timer on
//! the shared queue and keep the returned [`CancelToken`]; the host drains
//! due timers on the UI task queue, and a cancelled timer is skipped when it
//! comes due.

use std::cell::Cell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::rc::Rc;

use ripple_input::Timestamp;

use crate::recognizer::RecognizerId;

/// Which deadline of a recognizer fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Remaining fingers of a multi-finger gesture did not arrive in time.
    FingerDeadline,
    /// The next tap of a multi-tap did not arrive in time.
    TapDeadline,
    /// A hold gesture reached its duration.
    Deadline,
    /// Periodic re-fire while a gesture is held.
    Repeat,
}

/// Handle that invalidates a scheduled timer.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// A timer that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFire {
    pub owner: RecognizerId,
    pub kind: TimerKind,
    pub deadline: Timestamp,
}

struct Entry {
    deadline: Timestamp,
    seq: u64,
    owner: RecognizerId,
    kind: TimerKind,
    token: CancelToken,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

/// Min-heap of pending deadlines, FIFO among equal deadlines.
#[derive(Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer and return its cancellation token.
    pub fn schedule(&mut self, owner: RecognizerId, kind: TimerKind, deadline: Timestamp) -> CancelToken {
        let token = CancelToken::new();
        self.heap.push(Reverse(Entry {
            deadline,
            seq: self.next_seq,
            owner,
            kind,
            token: token.clone(),
        }));
        self.next_seq += 1;
        token
    }

    /// Pop the earliest live timer due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<TimerFire> {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.token.is_cancelled() {
                self.heap.pop();
                continue;
            }
            if entry.deadline > now {
                return None;
            }
            let Reverse(entry) = self.heap.pop()?;
            return Some(TimerFire {
                owner: entry.owner,
                kind: entry.kind,
                deadline: entry.deadline,
            });
        }
        None
    }

    /// Earliest live deadline, if any.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.heap
            .iter()
            .filter(|Reverse(e)| !e.token.is_cancelled())
            .map(|Reverse(e)| e.deadline)
            .min()
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(e)| !e.token.is_cancelled())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
