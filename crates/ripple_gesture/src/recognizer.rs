//! The recognizer contract
//!
//! # Architecture
//!
//! ```text
//! TouchEvent / AxisEvent
//!     ↓ handle_event / handle_axis_event
//! GestureRecognizer (Click, LongPress, Pinch, Pan, groups)
//!     ↓ core.adjudicate(ACCEPT | PENDING | REJECT)
//! GestureContext disposal queue
//!     ↓ drained by the event manager
//! parent group ── or ── GestureReferee
//!     ↓ accept() / reject() / pend() / block()
//! user callbacks
//! ```
//!
//! Every recognizer embeds a [`RecognizerCore`] holding its id, referee
//! state, attachment and callbacks. Leaf recognizers additionally embed a
//! [`MultiFingersState`] for finger bookkeeping.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use ripple_input::{
    Axis, AxisEvent, AxisAction, Offset, Point, SourceTool, SourceType, Timestamp, TouchEvent,
    TouchType,
};

use crate::config::GestureConfig;
use crate::context::GestureContext;
use crate::multi_fingers::MultiFingersState;
use crate::node::NodeId;
use crate::snapshot::{GestureSnapshot, StateHistory, StateRecord};
use crate::state::{GestureDisposal, GestureJudgeResult, GesturePriority, RefereeState};
use crate::timer::{CancelToken, TimerKind};

/// Unique id of a recognizer within one gesture context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(u64);

impl RecognizerId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecognizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline the recognizer last received input from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputEventType {
    #[default]
    Touch,
    Axis,
}

/// One finger as reported to gesture callbacks
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FingerInfo {
    pub id: i32,
    pub position: Point,
}

/// Information handed to gesture callbacks and judges
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureEvent {
    pub recognizer: Option<RecognizerId>,
    pub time: Timestamp,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
    pub input_event_type: InputEventType,
    pub fingers: Vec<FingerInfo>,
    /// Primary location (tap point, pinch center, pan position)
    pub location: Point,
    /// True for repeated long-press firings
    pub repeat: bool,
    /// Completed taps for clicks
    pub count: u32,
    pub scale: f32,
    /// Total pan displacement
    pub offset: Offset,
    /// Pixels per millisecond
    pub velocity: Offset,
}

pub type GestureCallback = Rc<dyn Fn(&GestureEvent)>;
pub type GestureJudge = Rc<dyn Fn(&GestureEvent) -> GestureJudgeResult>;

/// User callbacks of a recognizer; each variant uses the subset it needs
#[derive(Clone, Default)]
pub struct GestureCallbacks {
    pub on_action: Option<GestureCallback>,
    pub on_action_start: Option<GestureCallback>,
    pub on_action_update: Option<GestureCallback>,
    pub on_action_end: Option<GestureCallback>,
    pub on_action_cancel: Option<GestureCallback>,
}

/// Fire an optional callback.
pub fn emit(callback: &Option<GestureCallback>, info: &GestureEvent) {
    if let Some(callback) = callback {
        callback(info);
    }
}

// ============================================================================
// Recognizer Core
// ============================================================================

/// State every recognizer carries.
pub struct RecognizerCore {
    id: RecognizerId,
    ctx: Rc<GestureContext>,
    state: RefereeState,
    disposal: GestureDisposal,
    priority: GesturePriority,
    attached_node: Option<NodeId>,
    parent: Option<RecognizerId>,
    enabled: bool,
    is_post_event_result: bool,
    input_event_type: InputEventType,
    source_type: SourceType,
    source_tool: SourceTool,
    sub_pipeline: Option<(Offset, f32)>,
    judge: Option<GestureJudge>,
    callbacks: GestureCallbacks,
    first_input_time: Option<Timestamp>,
    history: StateHistory,
}

impl RecognizerCore {
    pub fn new(ctx: &Rc<GestureContext>) -> Self {
        Self {
            id: ctx.allocate_id(),
            ctx: Rc::clone(ctx),
            state: RefereeState::Ready,
            disposal: GestureDisposal::None,
            priority: GesturePriority::Low,
            attached_node: None,
            parent: None,
            enabled: true,
            is_post_event_result: false,
            input_event_type: InputEventType::Touch,
            source_type: SourceType::None,
            source_tool: SourceTool::Unknown,
            sub_pipeline: None,
            judge: None,
            callbacks: GestureCallbacks::default(),
            first_input_time: None,
            history: StateHistory::default(),
        }
    }

    pub fn id(&self) -> RecognizerId {
        self.id
    }

    pub fn context(&self) -> &Rc<GestureContext> {
        &self.ctx
    }

    pub fn config(&self) -> &GestureConfig {
        self.ctx.config()
    }

    pub fn state(&self) -> RefereeState {
        self.state
    }

    pub fn set_state(&mut self, state: RefereeState) {
        if self.state != state {
            tracing::trace!(recognizer = self.id.0, from = self.state.name(), to = state.name(), "referee state");
            self.history.push(StateRecord {
                state,
                disposal: self.disposal,
            });
        }
        self.state = state;
    }

    pub fn disposal(&self) -> GestureDisposal {
        self.disposal
    }

    pub fn priority(&self) -> GesturePriority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: GesturePriority) {
        self.priority = priority;
    }

    pub fn attached_node(&self) -> Option<NodeId> {
        self.attached_node
    }

    pub fn parent(&self) -> Option<RecognizerId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<RecognizerId>) {
        self.parent = parent;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_post_event_result(&self) -> bool {
        self.is_post_event_result
    }

    pub fn input_event_type(&self) -> InputEventType {
        self.input_event_type
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn source_tool(&self) -> SourceTool {
        self.source_tool
    }

    pub fn sub_pipeline_offset(&self) -> Option<(Offset, f32)> {
        self.sub_pipeline
    }

    pub fn callbacks(&self) -> &GestureCallbacks {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut GestureCallbacks {
        &mut self.callbacks
    }

    pub fn set_judge(&mut self, judge: Option<GestureJudge>) {
        self.judge = judge;
    }

    pub fn first_input_time(&self) -> Option<Timestamp> {
        self.first_input_time
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Ask for a verdict. Without a judge every gesture may continue.
    pub fn judge(&self, info: &GestureEvent) -> GestureJudgeResult {
        match &self.judge {
            Some(judge) => judge(info),
            None => GestureJudgeResult::Continue,
        }
    }

    /// Post a disposal for the manager to route once this recognizer returns.
    pub fn adjudicate(&mut self, disposal: GestureDisposal) {
        tracing::debug!(recognizer = self.id.0, disposal = disposal.name(), "adjudicate");
        self.disposal = disposal;
        self.ctx.post_disposal(self.id, disposal);
    }

    /// Schedule a deadline for this recognizer.
    pub fn schedule(&self, kind: TimerKind, deadline: Timestamp) -> CancelToken {
        self.ctx.schedule(self.id, kind, deadline)
    }

    /// Skeleton callback info stamped with this recognizer's input source
    pub fn gesture_event(&self, time: Timestamp) -> GestureEvent {
        GestureEvent {
            recognizer: Some(self.id),
            time,
            source_type: self.source_type,
            source_tool: self.source_tool,
            input_event_type: self.input_event_type,
            scale: 1.0,
            ..Default::default()
        }
    }

    /// Map a point from the sub-pipeline this recognizer was hit-tested in
    /// to host coordinates.
    pub fn to_global(&self, point: Point) -> Point {
        match self.sub_pipeline {
            Some((offset, scale)) => Point::new(point.x * scale + offset.dx, point.y * scale + offset.dy),
            None => point,
        }
    }

    fn record_input(&mut self, kind: InputEventType, source_type: SourceType, source_tool: SourceTool, time: Timestamp) {
        self.input_event_type = kind;
        self.source_type = source_type;
        self.source_tool = source_tool;
        if self.first_input_time.is_none() {
            self.first_input_time = Some(time);
        }
    }

    fn reset(&mut self) {
        self.state = RefereeState::Ready;
        self.disposal = GestureDisposal::None;
        self.first_input_time = None;
    }
}

// ============================================================================
// Recognizer Trait
// ============================================================================

/// A gesture state machine that plugs into the referee.
pub trait GestureRecognizer {
    fn core(&self) -> &RecognizerCore;
    fn core_mut(&mut self) -> &mut RecognizerCore;

    /// Short type name used in dumps
    fn name(&self) -> &'static str;

    fn handle_touch_down(&mut self, event: &TouchEvent);
    fn handle_touch_move(&mut self, event: &TouchEvent);
    fn handle_touch_up(&mut self, event: &TouchEvent);
    fn handle_touch_cancel(&mut self, event: &TouchEvent);

    fn handle_axis_begin(&mut self, _event: &AxisEvent) {}
    fn handle_axis_update(&mut self, _event: &AxisEvent) {}
    fn handle_axis_end(&mut self, _event: &AxisEvent) {}
    fn handle_axis_cancel(&mut self, _event: &AxisEvent) {}

    /// Won arbitration
    fn on_accepted(&mut self);
    /// Lost arbitration
    fn on_rejected(&mut self);
    fn on_pending(&mut self) {}
    fn on_blocked(&mut self) {}
    /// Clear gesture-specific state and cancel timers
    fn on_reset(&mut self);

    fn on_timer(&mut self, _kind: TimerKind, _now: Timestamp) {}

    fn on_flush_touch_events_begin(&mut self) {}
    fn on_flush_touch_events_end(&mut self) {}

    /// Scroll axis this recognizer responds to
    fn axis_direction(&self) -> Axis {
        Axis::None
    }

    /// Extra text for dumps
    fn custom_info(&self) -> String {
        String::new()
    }

    fn multi_fingers(&self) -> Option<&MultiFingersState> {
        None
    }

    fn multi_fingers_mut(&mut self) -> Option<&mut MultiFingersState> {
        None
    }

    fn is_group(&self) -> bool {
        false
    }

    /// Child recognizers of a group
    fn children(&self) -> &[RecognizerHandle] {
        &[]
    }

    /// A child of this group posted a disposal.
    fn on_child_disposal(&mut self, _child: &RecognizerHandle, _disposal: GestureDisposal) {}

    // ------------------------------------------------------------------------
    // Provided
    // ------------------------------------------------------------------------

    fn id(&self) -> RecognizerId {
        self.core().id()
    }

    fn state(&self) -> RefereeState {
        self.core().state()
    }

    /// Route a touch sample to the matching handler.
    ///
    /// Always returns true: recognizers never stop propagation.
    fn handle_event(&mut self, event: &TouchEvent) -> bool {
        if !self.core().is_enabled() {
            return true;
        }
        self.core_mut()
            .record_input(InputEventType::Touch, event.source_type, event.source_tool, event.time);
        match event.kind {
            TouchType::Down => self.handle_touch_down(event),
            TouchType::Move => self.handle_touch_move(event),
            TouchType::Up => self.handle_touch_up(event),
            TouchType::Cancel => self.handle_touch_cancel(event),
            _ => {}
        }
        true
    }

    /// Route an axis sample to the matching handler.
    fn handle_axis_event(&mut self, event: &AxisEvent) -> bool {
        if !self.core().is_enabled() {
            return true;
        }
        self.core_mut()
            .record_input(InputEventType::Axis, event.source_type, event.source_tool, event.time);
        match event.action {
            AxisAction::Begin => self.handle_axis_begin(event),
            AxisAction::Update => self.handle_axis_update(event),
            AxisAction::End => self.handle_axis_end(event),
            AxisAction::Cancel => self.handle_axis_cancel(event),
            AxisAction::None => {}
        }
        true
    }

    /// Referee: this recognizer won.
    fn accept(&mut self) {
        if self.core().state() == RefereeState::Succeed {
            return;
        }
        self.core_mut().set_state(RefereeState::Succeed);
        self.on_accepted();
    }

    /// Referee: this recognizer lost. Ignored once terminal.
    fn reject(&mut self) {
        if self.core().state().is_terminal() {
            return;
        }
        self.core_mut().set_state(RefereeState::Fail);
        self.on_rejected();
    }

    /// Referee: waiting for the rest of the scope.
    fn pend(&mut self) {
        self.core_mut().set_state(RefereeState::Pending);
        self.on_pending();
    }

    /// Referee: an earlier competitor must resolve first.
    fn block(&mut self) {
        let state = if self.core().disposal() == GestureDisposal::Accept {
            RefereeState::SucceedBlocked
        } else {
            RefereeState::PendingBlocked
        };
        self.core_mut().set_state(state);
        self.on_blocked();
    }

    /// Hard reset back to READY.
    fn reset_status(&mut self) {
        self.on_reset();
        if let Some(fingers) = self.multi_fingers_mut() {
            fingers.clear();
        }
        self.core_mut().reset();
        for child in self.children() {
            child.borrow_mut().reset_status();
        }
    }

    /// The scope of `touch_id` closed. Resets once no finger remains.
    fn finish_referee(&mut self, touch_id: i32, is_blocked: bool) {
        let finished = match self.multi_fingers_mut() {
            Some(fingers) => {
                fingers.finish(touch_id);
                fingers.active_fingers().is_empty()
            }
            None => true,
        };
        if !finished {
            return;
        }
        if is_blocked && self.core().state() == RefereeState::SucceedBlocked {
            tracing::debug!(recognizer = self.id().0, "finished while blocked");
        }
        self.reset_status();
    }

    fn set_attached_node(&mut self, node: Option<NodeId>) {
        self.core_mut().attached_node = node;
        for child in self.children() {
            child.borrow_mut().set_attached_node(node);
        }
    }

    fn set_post_event_result(&mut self, value: bool) {
        self.core_mut().is_post_event_result = value;
        for child in self.children() {
            child.borrow_mut().set_post_event_result(value);
        }
    }

    fn set_sub_pipeline_global_offset(&mut self, offset: Offset, scale: f32) {
        self.core_mut().sub_pipeline = Some((offset, scale));
        for child in self.children() {
            child.borrow_mut().set_sub_pipeline_global_offset(offset, scale);
        }
    }

    /// Snapshot for the event tree dump
    fn dump(&self) -> GestureSnapshot {
        let core = self.core();
        GestureSnapshot::new(
            core.id(),
            core.parent(),
            core.attached_node(),
            self.name(),
            self.custom_info(),
        )
        .with_history(core.history())
    }

    /// Snapshots of this recognizer and its children, depth first
    fn dump_tree(&self, depth: usize, out: &mut Vec<GestureSnapshot>) {
        out.push(self.dump().with_depth(depth));
        for child in self.children() {
            child.borrow().dump_tree(depth + 1, out);
        }
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Shared handle to a recognizer
///
/// The candidate list, the gesture scope and the owning node all hold
/// clones; the id is cached so it can be read without borrowing.
#[derive(Clone)]
pub struct RecognizerHandle {
    id: RecognizerId,
    inner: Rc<RefCell<dyn GestureRecognizer>>,
}

impl RecognizerHandle {
    pub fn new<R: GestureRecognizer + 'static>(recognizer: R) -> Self {
        let id = recognizer.id();
        Self {
            id,
            inner: Rc::new(RefCell::new(recognizer)),
        }
    }

    pub fn id(&self) -> RecognizerId {
        self.id
    }

    pub fn borrow(&self) -> Ref<'_, dyn GestureRecognizer> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, dyn GestureRecognizer> {
        self.inner.borrow_mut()
    }

    pub fn state(&self) -> RefereeState {
        self.inner.borrow().state()
    }

    pub fn priority(&self) -> GesturePriority {
        self.inner.borrow().core().priority()
    }

    pub fn downgrade(&self) -> WeakRecognizerHandle {
        WeakRecognizerHandle {
            id: self.id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// This handle and its descendants, depth first
    pub fn collect_tree(&self, out: &mut Vec<RecognizerHandle>) {
        out.push(self.clone());
        for child in self.inner.borrow().children() {
            child.collect_tree(out);
        }
    }
}

impl PartialEq for RecognizerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecognizerHandle {}

impl fmt::Debug for RecognizerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(r) => write!(f, "{}#{}({})", r.name(), self.id, r.state().name()),
            Err(_) => write!(f, "recognizer#{}", self.id),
        }
    }
}

/// Non-owning handle used by lookup indexes
#[derive(Clone)]
pub struct WeakRecognizerHandle {
    id: RecognizerId,
    inner: Weak<RefCell<dyn GestureRecognizer>>,
}

impl WeakRecognizerHandle {
    pub fn id(&self) -> RecognizerId {
        self.id
    }

    pub fn upgrade(&self) -> Option<RecognizerHandle> {
        self.inner.upgrade().map(|inner| RecognizerHandle { id: self.id, inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
