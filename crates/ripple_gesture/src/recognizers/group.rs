//! Recognizer groups
//!
//! A group enters the referee as a single contender. Its children never
//! reach the referee: their disposals are routed to
//! [`GestureRecognizer::on_child_disposal`] on the group, which decides
//! what the group as a whole asks for.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use ripple_input::{AxisEvent, TouchEvent, TouchType};

use crate::context::GestureContext;
use crate::multi_fingers::MultiFingersState;
use crate::recognizer::{GestureRecognizer, RecognizerCore, RecognizerHandle};
use crate::state::{GestureDisposal, GesturePriority, RefereeState};

/// How a group combines its children
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupMode {
    /// Children must succeed one after another.
    Sequence,
    /// Every child may succeed.
    Parallel,
    /// The first child to succeed wins and the rest fail.
    Exclusive,
}

impl GroupMode {
    fn name(&self) -> &'static str {
        match self {
            GroupMode::Sequence => "SequenceGroup",
            GroupMode::Parallel => "ParallelGroup",
            GroupMode::Exclusive => "ExclusiveGroup",
        }
    }
}

pub struct RecognizerGroup {
    core: RecognizerCore,
    mode: GroupMode,
    children: Vec<RecognizerHandle>,
    fingers: MultiFingersState,
    /// Fingers currently pressed, replayed to the next child of a sequence
    pressed: FxHashMap<i32, TouchEvent>,
    /// Sequence: index of the child receiving events
    current: usize,
    /// Children whose acceptance waits for the group's own verdict
    waiting: Vec<RecognizerHandle>,
}

impl RecognizerGroup {
    pub fn new(ctx: &Rc<GestureContext>, mode: GroupMode, children: Vec<RecognizerHandle>) -> Self {
        let core = RecognizerCore::new(ctx);
        for child in &children {
            child.borrow_mut().core_mut().set_parent(Some(core.id()));
        }
        Self {
            core,
            mode,
            children,
            fingers: MultiFingersState::new(1),
            pressed: FxHashMap::default(),
            current: 0,
            waiting: Vec::new(),
        }
    }

    pub fn sequence(ctx: &Rc<GestureContext>, children: Vec<RecognizerHandle>) -> Self {
        Self::new(ctx, GroupMode::Sequence, children)
    }

    pub fn parallel(ctx: &Rc<GestureContext>, children: Vec<RecognizerHandle>) -> Self {
        Self::new(ctx, GroupMode::Parallel, children)
    }

    pub fn exclusive(ctx: &Rc<GestureContext>, children: Vec<RecognizerHandle>) -> Self {
        Self::new(ctx, GroupMode::Exclusive, children)
    }

    pub fn with_priority(mut self, priority: GesturePriority) -> Self {
        self.core.set_priority(priority);
        self
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    /// Children that should see the next event
    fn receivers(&self) -> Vec<RecognizerHandle> {
        match self.mode {
            GroupMode::Sequence => self.children.get(self.current).cloned().into_iter().collect(),
            GroupMode::Parallel | GroupMode::Exclusive => self
                .children
                .iter()
                .filter(|c| c.state() != RefereeState::Fail)
                .cloned()
                .collect(),
        }
    }

    fn forward(&mut self, event: &TouchEvent) {
        if self.core.state() == RefereeState::Ready {
            self.core.set_state(RefereeState::Detecting);
        }
        for child in self.receivers() {
            child.borrow_mut().handle_event(event);
        }
    }

    fn forward_axis(&mut self, event: &AxisEvent) {
        if self.core.state() == RefereeState::Ready {
            self.core.set_state(RefereeState::Detecting);
        }
        for child in self.receivers() {
            child.borrow_mut().handle_axis_event(event);
        }
    }

    fn request(&mut self, disposal: GestureDisposal) {
        if self.core.state().is_terminal() || self.core.disposal() == disposal {
            return;
        }
        self.core.adjudicate(disposal);
    }

    fn all_children_failed(&self) -> bool {
        self.children.iter().all(|c| c.state() == RefereeState::Fail)
    }

    fn reject_others(&self, winner: &RecognizerHandle) {
        for child in &self.children {
            if child != winner {
                child.borrow_mut().reject();
            }
        }
    }

    fn child_accepted(&mut self, child: &RecognizerHandle) {
        match self.mode {
            GroupMode::Exclusive => {
                if self.core.state() == RefereeState::Succeed {
                    child.borrow_mut().accept();
                    self.reject_others(child);
                    return;
                }
                if !self.waiting.is_empty() {
                    child.borrow_mut().reject();
                    return;
                }
                self.waiting.push(child.clone());
                self.request(GestureDisposal::Accept);
            }
            GroupMode::Parallel => {
                if self.core.state() == RefereeState::Succeed {
                    child.borrow_mut().accept();
                    return;
                }
                if !self.waiting.contains(child) {
                    self.waiting.push(child.clone());
                }
                self.request(GestureDisposal::Accept);
            }
            GroupMode::Sequence => {
                let is_current = self.children.get(self.current) == Some(child);
                if !is_current {
                    return;
                }
                if self.current + 1 < self.children.len() {
                    child.borrow_mut().accept();
                    self.current += 1;
                    tracing::debug!(group = self.core.id().as_raw(), step = self.current, "sequence advanced");
                    self.request(GestureDisposal::Pending);
                    self.replay_pressed();
                } else if self.core.state() == RefereeState::Succeed {
                    child.borrow_mut().accept();
                } else {
                    self.waiting.push(child.clone());
                    self.request(GestureDisposal::Accept);
                }
            }
        }
    }

    fn child_rejected(&mut self, child: &RecognizerHandle) {
        child.borrow_mut().reject();
        self.waiting.retain(|w| w != child);
        let group_fails = match self.mode {
            GroupMode::Sequence => true,
            GroupMode::Parallel | GroupMode::Exclusive => self.all_children_failed(),
        };
        if group_fails {
            self.request(GestureDisposal::Reject);
        }
    }

    /// Hand the pressed fingers to the next child of a sequence as fresh
    /// DOWN events.
    fn replay_pressed(&mut self) {
        let Some(next) = self.children.get(self.current).cloned() else {
            return;
        };
        let mut pressed: Vec<&TouchEvent> = self.pressed.values().collect();
        pressed.sort_by_key(|e| e.id);
        for event in pressed {
            let down = event.clone().with_kind(TouchType::Down);
            next.borrow_mut().handle_event(&down);
        }
    }
}

impl GestureRecognizer for RecognizerGroup {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        self.mode.name()
    }

    fn handle_touch_down(&mut self, event: &TouchEvent) {
        self.fingers.add_finger(event);
        self.pressed.insert(event.id, event.clone());
        self.forward(event);
    }

    fn handle_touch_move(&mut self, event: &TouchEvent) {
        self.fingers.update_point(event);
        if let Some(pressed) = self.pressed.get_mut(&event.id) {
            *pressed = event.clone();
        }
        self.forward(event);
    }

    fn handle_touch_up(&mut self, event: &TouchEvent) {
        self.fingers.release_finger(event);
        self.pressed.remove(&event.id);
        self.forward(event);
    }

    fn handle_touch_cancel(&mut self, event: &TouchEvent) {
        self.pressed.remove(&event.id);
        self.forward(event);
    }

    fn handle_axis_begin(&mut self, event: &AxisEvent) {
        self.forward_axis(event);
    }

    fn handle_axis_update(&mut self, event: &AxisEvent) {
        self.forward_axis(event);
    }

    fn handle_axis_end(&mut self, event: &AxisEvent) {
        self.forward_axis(event);
    }

    fn handle_axis_cancel(&mut self, event: &AxisEvent) {
        self.forward_axis(event);
    }

    fn on_child_disposal(&mut self, child: &RecognizerHandle, disposal: GestureDisposal) {
        tracing::trace!(
            group = self.core.id().as_raw(),
            child = child.id().as_raw(),
            disposal = disposal.name(),
            "child disposal"
        );
        match disposal {
            GestureDisposal::Accept => self.child_accepted(child),
            GestureDisposal::Reject => self.child_rejected(child),
            GestureDisposal::Pending => {
                child.borrow_mut().pend();
                self.request(GestureDisposal::Pending);
            }
            GestureDisposal::None => {}
        }
    }

    fn on_accepted(&mut self) {
        let waiting = std::mem::take(&mut self.waiting);
        for child in &waiting {
            child.borrow_mut().accept();
        }
        if self.mode == GroupMode::Exclusive {
            if let Some(winner) = waiting.first() {
                self.reject_others(winner);
            }
        }
    }

    fn on_rejected(&mut self) {
        self.waiting.clear();
        for child in &self.children {
            child.borrow_mut().reject();
        }
    }

    fn on_reset(&mut self) {
        self.current = 0;
        self.waiting.clear();
        self.pressed.clear();
    }

    fn on_flush_touch_events_begin(&mut self) {
        for child in &self.children {
            child.borrow_mut().on_flush_touch_events_begin();
        }
    }

    fn on_flush_touch_events_end(&mut self) {
        for child in &self.children {
            child.borrow_mut().on_flush_touch_events_end();
        }
    }

    fn is_group(&self) -> bool {
        true
    }

    fn children(&self) -> &[RecognizerHandle] {
        &self.children
    }

    fn multi_fingers(&self) -> Option<&MultiFingersState> {
        Some(&self.fingers)
    }

    fn multi_fingers_mut(&mut self) -> Option<&mut MultiFingersState> {
        Some(&mut self.fingers)
    }

    fn custom_info(&self) -> String {
        match self.mode {
            GroupMode::Sequence => format!("children: {}, step: {}", self.children.len(), self.current),
            _ => format!("children: {}", self.children.len()),
        }
    }
}
