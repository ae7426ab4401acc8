//! Test helpers shared by the unit tests of this crate

use std::cell::RefCell;
use std::rc::Rc;

use ripple_input::{Timestamp, TouchEvent, TouchType};

use crate::context::GestureContext;
use crate::recognizer::{GestureRecognizer, RecognizerCore, RecognizerHandle};
use crate::state::{GestureDisposal, GesturePriority};

pub type Log = Rc<RefCell<Vec<String>>>;

/// Recognizer that only records what the referee tells it.
pub struct Probe {
    core: RecognizerCore,
    label: &'static str,
    log: Log,
}

impl Probe {
    pub fn handle(
        ctx: &Rc<GestureContext>,
        label: &'static str,
        priority: GesturePriority,
        log: &Log,
    ) -> RecognizerHandle {
        let mut core = RecognizerCore::new(ctx);
        core.set_priority(priority);
        RecognizerHandle::new(Probe {
            core,
            label,
            log: Rc::clone(log),
        })
    }

    fn record(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, what));
    }
}

impl GestureRecognizer for Probe {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "Probe"
    }

    fn handle_touch_down(&mut self, _event: &TouchEvent) {}
    fn handle_touch_move(&mut self, _event: &TouchEvent) {}
    fn handle_touch_up(&mut self, _event: &TouchEvent) {}
    fn handle_touch_cancel(&mut self, _event: &TouchEvent) {}

    fn on_accepted(&mut self) {
        self.record("accepted");
    }

    fn on_rejected(&mut self) {
        self.record("rejected");
    }

    fn on_reset(&mut self) {
        self.record("reset");
    }
}

pub fn touch(id: i32, kind: TouchType, x: f32, y: f32, millis: u64) -> TouchEvent {
    TouchEvent::new(id, kind, x, y, Timestamp::from_millis(millis))
}

fn tree(handles: &[RecognizerHandle]) -> Vec<RecognizerHandle> {
    let mut all = Vec::new();
    for handle in handles {
        handle.collect_tree(&mut all);
    }
    all
}

/// Drain disposals posted by recognizers, routing children to their group
/// and applying everything else directly, standing in for a referee with
/// a single contender.
pub fn settle(ctx: &GestureContext, handles: &[RecognizerHandle]) {
    let all = tree(handles);
    while let Some(d) = ctx.take_disposal() {
        let Some(handle) = all.iter().find(|h| h.id() == d.recognizer) else {
            continue;
        };
        let parent = handle.borrow().core().parent();
        if let Some(parent) = parent.and_then(|p| all.iter().find(|h| h.id() == p)) {
            parent.borrow_mut().on_child_disposal(handle, d.disposal);
            continue;
        }
        let mut r = handle.borrow_mut();
        match d.disposal {
            GestureDisposal::Accept => r.accept(),
            GestureDisposal::Reject => r.reject(),
            GestureDisposal::Pending => r.pend(),
            GestureDisposal::None => {}
        }
    }
}

/// Fire due timers at `now`, then settle.
pub fn advance(ctx: &GestureContext, handles: &[RecognizerHandle], now: Timestamp) {
    let all = tree(handles);
    while let Some(fire) = ctx.pop_due_timer(now) {
        if let Some(handle) = all.iter().find(|h| h.id() == fire.owner) {
            handle.borrow_mut().on_timer(fire.kind, fire.deadline);
        }
        settle(ctx, handles);
    }
}

/// Feed an event to a recognizer and settle.
pub fn feed(ctx: &GestureContext, handle: &RecognizerHandle, event: &TouchEvent) {
    advance(ctx, std::slice::from_ref(handle), event.time);
    handle.borrow_mut().handle_event(event);
    settle(ctx, std::slice::from_ref(handle));
}
