//! Shared gesture context
//!
//! One context is owned by each event manager and shared (via `Rc`) with
//! every recognizer it arbitrates. Recognizers never call the referee
//! directly: they post disposals here and the manager drains them once the
//! recognizer has returned, routing each to its parent group or to the
//! referee.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use ripple_input::Timestamp;

use crate::config::GestureConfig;
use crate::recognizer::RecognizerId;
use crate::state::GestureDisposal;
use crate::timer::{CancelToken, TimerFire, TimerKind, TimerQueue};

/// A disposal posted by a recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Disposal {
    pub recognizer: RecognizerId,
    pub disposal: GestureDisposal,
}

/// Timers, disposal queue and id allocation for one event manager.
pub struct GestureContext {
    config: GestureConfig,
    next_id: Cell<u64>,
    timers: RefCell<TimerQueue>,
    disposals: RefCell<VecDeque<Disposal>>,
}

impl GestureContext {
    pub fn new(config: GestureConfig) -> Rc<Self> {
        Rc::new(Self {
            config,
            next_id: Cell::new(1),
            timers: RefCell::new(TimerQueue::new()),
            disposals: RefCell::new(VecDeque::new()),
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn allocate_id(&self) -> RecognizerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        RecognizerId::from_raw(id)
    }

    pub fn post_disposal(&self, recognizer: RecognizerId, disposal: GestureDisposal) {
        self.disposals
            .borrow_mut()
            .push_back(Disposal { recognizer, disposal });
    }

    pub fn take_disposal(&self) -> Option<Disposal> {
        self.disposals.borrow_mut().pop_front()
    }

    pub fn has_pending_disposals(&self) -> bool {
        !self.disposals.borrow().is_empty()
    }

    pub fn schedule(&self, owner: RecognizerId, kind: TimerKind, deadline: Timestamp) -> CancelToken {
        tracing::trace!(recognizer = owner.as_raw(), ?kind, deadline = deadline.as_millis(), "schedule timer");
        self.timers.borrow_mut().schedule(owner, kind, deadline)
    }

    pub fn pop_due_timer(&self, now: Timestamp) -> Option<TimerFire> {
        self.timers.borrow_mut().pop_due(now)
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.borrow().next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let ctx = GestureContext::new(GestureConfig::testing());
        let a = ctx.allocate_id();
        let b = ctx.allocate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_disposals_drain_fifo() {
        let ctx = GestureContext::new(GestureConfig::testing());
        let a = ctx.allocate_id();
        let b = ctx.allocate_id();
        ctx.post_disposal(a, GestureDisposal::Accept);
        ctx.post_disposal(b, GestureDisposal::Reject);
        assert_eq!(ctx.take_disposal().map(|d| d.recognizer), Some(a));
        assert_eq!(ctx.take_disposal().map(|d| d.disposal), Some(GestureDisposal::Reject));
        assert!(!ctx.has_pending_disposals());
    }
}
