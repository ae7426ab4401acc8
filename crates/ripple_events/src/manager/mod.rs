//! Event manager
//!
//! One manager per UI container. It hit-tests the node tree for every new
//! pointer, keeps the resulting candidate lists, feeds touch samples to them
//! and hands the disposals recognizers post to the gesture referee.
//!
//! ```text
//! DOWN ─▶ check_down_event ─▶ touch_test ─▶ dispatch_touch_event
//!                               │             ├─ reverse multi-container pass
//!                               │             ├─ forward recognizer/touch pass
//!                               │             └─ flush disposals ─▶ referee
//!                               └─ clean stale referee state first
//! ```
//!
//! Inconsistent input (a DOWN twice, an UP without DOWN, a referee stuck
//! unresolved) never surfaces as an error: the manager synthesizes a
//! falsified CANCEL, force-cleans the referee and carries on.

mod axis;
mod mouse;
mod post_event;

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use ripple_gesture::{
    GestureContext, GestureDisposal, GestureRecognizer, GestureReferee, GestureScope, NodeId,
    RecognizerHandle, RecognizerId, RefereeState, WeakRecognizerHandle,
};
use ripple_input::{
    AxisEvent, MouseButton, Offset, SourceTool, Timestamp, TouchEvent, TouchType,
};

use crate::config::EventManagerConfig;
use crate::event_tree::{EventTreeRecord, EventTreeType};
use crate::response_ctrl::ResponseCtrl;
use crate::scheduler::FrameScheduler;
use crate::target::{
    AccessibilityHoverTarget, AxisTarget, HoverTarget, MouseTarget, MouseTestResult,
    TouchEventTarget, TouchTestResult, TouchTestTarget,
};
use crate::tree::{HitNode, HitTestKind, NodeTree};

/// How a touch test is run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchTestOptions {
    pub kind: HitTestKind,
    /// Offset of the sub-pipeline the new candidates live in
    pub offset: Offset,
    pub scale: f32,
    /// Keep the pointer's previous candidates after the new ones
    pub need_append: bool,
}

impl Default for TouchTestOptions {
    fn default() -> Self {
        Self {
            kind: HitTestKind::Touch,
            offset: Offset::ZERO,
            scale: 1.0,
            need_append: false,
        }
    }
}

impl TouchTestOptions {
    /// Options for a sub-pipeline entered while the pointer is down
    pub fn appending(offset: Offset, scale: f32) -> Self {
        Self {
            offset,
            scale,
            need_append: true,
            ..Self::default()
        }
    }
}

/// Event family for received/consumed diagnostics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogChannel {
    Touch,
    Mouse,
    Axis,
}

/// Reject whatever is still contending when a scope is torn down.
fn reject_unresolved_members(touch_id: i32, scope: &GestureScope) {
    for member in scope.members() {
        if member.state().is_unresolved() {
            tracing::debug!(finger = touch_id, recognizer = member.id().as_raw(), "rejected on scope close");
            member.borrow_mut().reject();
        }
    }
}

fn touch_procedure(kind: TouchType) -> &'static str {
    match kind {
        TouchType::Down => "HandleTouchDown",
        TouchType::Up => "HandleTouchUp",
        TouchType::Move => "HandleTouchMove",
        TouchType::Cancel => "HandleTouchCancel",
        _ => "HandleTouchUnknown",
    }
}

fn recognizers_of(results: &TouchTestResult) -> Vec<RecognizerHandle> {
    results
        .iter()
        .filter_map(|target| target.recognizer().cloned())
        .collect()
}

pub struct EventManager {
    config: EventManagerConfig,
    ctx: Rc<GestureContext>,
    referee: GestureReferee,
    post_event_referee: GestureReferee,
    response_ctrl: ResponseCtrl,

    touch_test_results: IndexMap<i32, TouchTestResult>,
    post_event_touch_test_results: IndexMap<i32, TouchTestResult>,
    axis_touch_test_results: IndexMap<i32, TouchTestResult>,
    /// Finger id -> original id, for every finger currently down
    down_finger_ids: IndexMap<i32, i32>,
    recognizer_index: FxHashMap<RecognizerId, WeakRecognizerHandle>,
    hitted_frame_nodes: FxHashSet<NodeId>,
    monopolize_nodes: FxHashSet<NodeId>,

    mouse_test_results: FxHashMap<i32, MouseTestResult>,
    curr_mouse_test_results: Vec<MouseTarget>,
    pressed_mouse_test_results: FxHashMap<MouseButton, Vec<MouseTarget>>,
    last_hover_test_results: Vec<HoverTarget>,
    curr_hover_test_results: Vec<HoverTarget>,
    last_hover_dispatch_length: usize,
    last_accessibility_hover_results: Vec<AccessibilityHoverTarget>,
    cur_accessibility_hover_results: Vec<AccessibilityHoverTarget>,
    last_accessibility_hover_dispatch_length: usize,
    axis_test_results: Vec<AxisTarget>,
    last_axis_event: AxisEvent,

    last_touch_event: TouchEvent,
    last_event_time: Timestamp,
    last_down_finger_number: usize,
    last_source_tool: SourceTool,
    inner_event_win: bool,
    is_dragging: bool,

    event_tree: EventTreeRecord,
    post_event_tree: EventTreeRecord,
    frame_scheduler: Option<Rc<dyn FrameScheduler>>,
    event_log: FxHashMap<(LogChannel, bool), Timestamp>,
}

impl EventManager {
    pub fn new(config: EventManagerConfig) -> Self {
        let ctx = GestureContext::new(config.gesture.clone());
        let mut referee = GestureReferee::new();
        referee.set_query_state_func(Box::new(reject_unresolved_members));
        let mut post_event_referee = GestureReferee::new();
        post_event_referee.set_query_state_func(Box::new(reject_unresolved_members));
        Self {
            config,
            ctx,
            referee,
            post_event_referee,
            response_ctrl: ResponseCtrl::new(),
            touch_test_results: IndexMap::new(),
            post_event_touch_test_results: IndexMap::new(),
            axis_touch_test_results: IndexMap::new(),
            down_finger_ids: IndexMap::new(),
            recognizer_index: FxHashMap::default(),
            hitted_frame_nodes: FxHashSet::default(),
            monopolize_nodes: FxHashSet::default(),
            mouse_test_results: FxHashMap::default(),
            curr_mouse_test_results: Vec::new(),
            pressed_mouse_test_results: FxHashMap::default(),
            last_hover_test_results: Vec::new(),
            curr_hover_test_results: Vec::new(),
            last_hover_dispatch_length: 0,
            last_accessibility_hover_results: Vec::new(),
            cur_accessibility_hover_results: Vec::new(),
            last_accessibility_hover_dispatch_length: 0,
            axis_test_results: Vec::new(),
            last_axis_event: AxisEvent::default(),
            last_touch_event: TouchEvent::default(),
            last_event_time: Timestamp::ZERO,
            last_down_finger_number: 0,
            last_source_tool: SourceTool::Unknown,
            inner_event_win: false,
            is_dragging: false,
            event_tree: EventTreeRecord::new(),
            post_event_tree: EventTreeRecord::new(),
            frame_scheduler: None,
            event_log: FxHashMap::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EventManagerConfig {
        &self.config
    }

    /// Context recognizers for this manager must be created on
    pub fn context(&self) -> &Rc<GestureContext> {
        &self.ctx
    }

    pub fn referee(&self) -> &GestureReferee {
        &self.referee
    }

    pub fn post_event_referee(&self) -> &GestureReferee {
        &self.post_event_referee
    }

    pub fn response_ctrl(&self) -> &ResponseCtrl {
        &self.response_ctrl
    }

    pub fn touch_test_results(&self) -> &IndexMap<i32, TouchTestResult> {
        &self.touch_test_results
    }

    pub fn down_finger_ids(&self) -> &IndexMap<i32, i32> {
        &self.down_finger_ids
    }

    pub fn event_tree(&self, tree_type: EventTreeType) -> &EventTreeRecord {
        match tree_type {
            EventTreeType::Touch => &self.event_tree,
            EventTreeType::PostEvent => &self.post_event_tree,
        }
    }

    fn record_mut(&mut self, tree_type: EventTreeType) -> &mut EventTreeRecord {
        match tree_type {
            EventTreeType::Touch => &mut self.event_tree,
            EventTreeType::PostEvent => &mut self.post_event_tree,
        }
    }

    pub fn set_frame_scheduler(&mut self, scheduler: Rc<dyn FrameScheduler>) {
        self.frame_scheduler = Some(scheduler);
    }

    pub fn last_source_tool(&self) -> SourceTool {
        self.last_source_tool
    }

    pub fn last_event_time(&self) -> Timestamp {
        self.last_event_time
    }

    pub fn is_inner_event_win(&self) -> bool {
        self.inner_event_win
    }

    pub fn set_inner_event_win(&mut self, win: bool) {
        self.inner_event_win = win;
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.is_dragging = dragging;
    }

    // ========================================================================
    // Disposals and Timers
    // ========================================================================

    fn index_recognizers(&mut self, results: &TouchTestResult) {
        self.recognizer_index.retain(|_, weak| weak.is_alive());
        let mut all = Vec::new();
        for handle in results.iter().filter_map(TouchTestTarget::recognizer) {
            handle.collect_tree(&mut all);
        }
        for handle in all {
            self.recognizer_index.insert(handle.id(), handle.downgrade());
        }
    }

    fn lookup(&self, id: RecognizerId) -> Option<RecognizerHandle> {
        self.recognizer_index.get(&id).and_then(WeakRecognizerHandle::upgrade)
    }

    /// Route every posted disposal to the owning group or referee.
    fn flush_disposals(&mut self) {
        while let Some(posted) = self.ctx.take_disposal() {
            let Some(handle) = self.lookup(posted.recognizer) else {
                tracing::trace!(recognizer = posted.recognizer.as_raw(), "disposal from unknown recognizer");
                continue;
            };
            let parent = handle.borrow().core().parent().and_then(|p| self.lookup(p));
            if let Some(parent) = parent {
                parent.borrow_mut().on_child_disposal(&handle, posted.disposal);
                continue;
            }
            let referee = if handle.borrow().core().is_post_event_result() {
                &mut self.post_event_referee
            } else {
                &mut self.referee
            };
            if !referee.contains(handle.id()) {
                tracing::trace!(recognizer = handle.id().as_raw(), "disposal outside any scope");
                continue;
            }
            referee.adjudicate(&handle, posted.disposal);
        }
    }

    /// Fire recognizer timers due at `now`.
    pub fn advance_time(&mut self, now: Timestamp) {
        while let Some(fire) = self.ctx.pop_due_timer(now) {
            if let Some(handle) = self.lookup(fire.owner) {
                handle.borrow_mut().on_timer(fire.kind, fire.deadline);
            }
            self.flush_disposals();
        }
    }

    /// Earliest pending recognizer deadline
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.ctx.next_deadline()
    }

    // ========================================================================
    // Touch Test
    // ========================================================================

    fn collect_touch_targets(&mut self, tree: &NodeTree, hits: &[HitNode]) -> TouchTestResult {
        let mut results = TouchTestResult::new();
        for hit in hits {
            let Some(node) = tree.get(hit.node) else {
                continue;
            };
            if node.monopolize_events {
                self.monopolize_nodes.insert(hit.node);
            } else {
                self.monopolize_nodes.remove(&hit.node);
            }
            if node.on_touch.is_some() || node.on_multi_container.is_some() {
                results.push(TouchTestTarget::Touch(Rc::new(TouchEventTarget::new(
                    hit.node,
                    node.tag.clone(),
                    hit.origin,
                    node.on_touch.clone(),
                    node.on_multi_container.clone(),
                ))));
            }
            results.extend(node.recognizers().iter().cloned().map(TouchTestTarget::Recognizer));
        }
        results
    }

    fn hit_test_touch(
        &mut self,
        event: &TouchEvent,
        tree: &NodeTree,
        root: NodeId,
        kind: HitTestKind,
    ) -> TouchTestResult {
        let hits = tree.hit_test(root, event.position(), kind, Some(event));
        self.set_hitted_frame_node(tree, &hits);
        let results = self.collect_touch_targets(tree, &hits);
        for handle in results.iter().filter_map(TouchTestTarget::recognizer) {
            handle.borrow_mut().set_post_event_result(false);
        }
        self.index_recognizers(&results);
        results
    }

    /// Remember hit nodes that carry recognizers.
    pub fn set_hitted_frame_node(&mut self, tree: &NodeTree, hits: &[HitNode]) {
        for hit in hits {
            if !tree.recognizers(hit.node).is_empty() {
                self.hitted_frame_nodes.insert(hit.node);
            }
        }
    }

    /// Reset the recognizers of every node hit since the last clean.
    pub fn clean_gesture_event_hub(&mut self, tree: &NodeTree) {
        for node in self.hitted_frame_nodes.drain() {
            for recognizer in tree.recognizers(node) {
                recognizer.borrow_mut().reset_status();
            }
        }
    }

    /// Hit-test for a new pointer and register its candidates.
    pub fn touch_test(&mut self, event: &TouchEvent, tree: &NodeTree, root: NodeId, options: TouchTestOptions) {
        self.advance_time(event.time);
        if !tree.contains(root) {
            return;
        }
        if !self.cur_accessibility_hover_results.is_empty() {
            self.falsify_hover_cancel_event_and_dispatch(event);
        }
        self.clean_referee_before_touch_test(event, tree);

        let previous = self.touch_test_results.get(&event.id).cloned().unwrap_or_default();
        let mut results = self.hit_test_touch(event, tree, root, options.kind);
        if options.need_append {
            for target in &results {
                target.set_sub_pipeline_global_offset(options.offset, options.scale);
            }
            results.extend(previous.iter().cloned());
        }
        self.referee.add_gesture_to_scope(event.id, &recognizers_of(&results));
        self.touch_test_results.insert(event.id, results);

        self.check_referee_state_and_re_touch_test(event, tree, root, options, previous);

        let tags: Vec<&str> = self
            .touch_test_results
            .get(&event.id)
            .into_iter()
            .flatten()
            .filter_map(|target| target.attached_node())
            .filter_map(|node| tree.tag(node))
            .collect();
        if tags.is_empty() {
            tracing::info!(finger = event.id, "touch test hit nothing");
        } else {
            tracing::debug!(finger = event.id, nodes = ?tags, "touch test");
        }
    }

    fn clean_referee_before_touch_test(&mut self, event: &TouchEvent, tree: &NodeTree) {
        if self.referee.check_event_type_change(event.source_type, false) {
            tracing::debug!(finger = event.id, "input switched from axis, cleaning referee");
            self.falsify_axis_cancel();
            self.response_ctrl.reset();
            self.referee.clean_all(true);
            self.touch_test_results.clear();
            self.axis_touch_test_results.clear();
        }
        self.referee.check_source_type_change(event.source_type, false);

        if self.referee.query_all_done_for(event.id) {
            self.referee.clean_gesture_scope(event.id);
            if self.touch_test_results.is_empty() && self.referee.query_all_done() {
                self.inner_event_win = false;
                self.response_ctrl.reset();
                self.referee.clean_all(false);
            }
        }

        // A scope still pending here is a multi-tap waiting for its next tap.
        if self.last_down_finger_number == 0 && self.referee.query_all_done() {
            self.falsify_cancel_event_and_dispatch(event, true);
            self.referee.force_clean_gesture_referee();
            self.response_ctrl.reset();
            self.referee.clean_all(false);
            self.clean_gesture_event_hub(tree);
        }
    }

    fn check_referee_state_and_re_touch_test(
        &mut self,
        event: &TouchEvent,
        tree: &NodeTree,
        root: NodeId,
        options: TouchTestOptions,
        previous: TouchTestResult,
    ) {
        let idle = event.time.millis_since(self.last_event_time);
        if idle < self.config.event_clear_duration_ms || self.referee.is_ready() {
            return;
        }
        tracing::warn!(finger = event.id, idle_ms = idle, "referee stuck unresolved, redoing touch test");
        self.event_tree.clear();
        self.falsify_cancel_event_and_dispatch(event, true);
        self.referee.force_clean_gesture_referee();
        self.response_ctrl.reset();
        self.referee.clean_all(false);

        let mut results = self.hit_test_touch(event, tree, root, options.kind);
        if !self.referee.is_ready() {
            tracing::warn!(finger = event.id, "referee contaminated after re-test, force cleaning");
            self.referee.force_clean_gesture_referee();
        }
        if options.need_append {
            for target in &results {
                target.set_sub_pipeline_global_offset(options.offset, options.scale);
            }
            results.extend(previous);
        }
        self.referee.add_gesture_to_scope(event.id, &recognizers_of(&results));
        self.touch_test_results.insert(event.id, results);
    }

    // ========================================================================
    // Touch Dispatch
    // ========================================================================

    /// Full handling of one touch sample from the platform.
    pub fn on_touch_event(&mut self, event: &TouchEvent, tree: &NodeTree, root: NodeId) -> bool {
        if event.kind == TouchType::Down {
            self.check_down_event(event);
            self.touch_test(event, tree, root, TouchTestOptions::default());
        }
        self.dispatch_touch_event(event, true)
    }

    /// Dispatch a sample to its pointer's candidates.
    ///
    /// Returns false when the pointer has no candidate list.
    pub fn dispatch_touch_event(&mut self, event: &TouchEvent, send_on_touch: bool) -> bool {
        self.advance_time(event.time);
        let mut point = event.clone();
        self.update_drag_info(&mut point);

        let Some(results) = self.touch_test_results.get(&point.id).cloned() else {
            self.check_up_event(event);
            self.last_down_finger_number = self.down_finger_ids.len();
            return false;
        };
        self.last_touch_event = event.clone();
        self.event_tree.add_touch_point(&point);

        if point.kind == TouchType::Down {
            self.referee.clean_gesture_referee_state(point.id);
            self.add_snapshots(EventTreeType::Touch, point.id, &results);
        }

        if Self::dispatch_multi_container_event(&results, &point) {
            if point.kind == TouchType::Cancel && point.pull_type == TouchType::PullMove {
                self.clean_recognizers_for_drag_begin(&point);
                self.last_event_time = point.time;
                return true;
            }
            self.dispatch_touch_event_and_check(&point, &results, send_on_touch);
        }

        self.check_up_event(event);
        self.update_info_when_finish_dispatch(&point, send_on_touch);
        true
    }

    fn add_snapshots(&mut self, tree_type: EventTreeType, finger: i32, results: &TouchTestResult) {
        let mut snapshots = Vec::new();
        for target in results {
            target.dump(0, &mut snapshots);
        }
        let record = self.record_mut(tree_type);
        for snapshot in snapshots {
            record.add_gesture_snapshot(finger, snapshot);
        }
    }

    /// Pull events from a drag become cancels or ups.
    fn update_drag_info(&mut self, point: &mut TouchEvent) {
        if point.kind == TouchType::PullMove || point.pull_type == TouchType::PullMove {
            self.is_dragging = false;
            point.kind = TouchType::Cancel;
            point.pull_type = TouchType::PullMove;
        }
        if point.kind == TouchType::PullUp || point.kind == TouchType::Up {
            self.is_dragging = false;
            point.kind = TouchType::Up;
        }
    }

    /// Outermost candidate first; any container may stop the sample.
    fn dispatch_multi_container_event(results: &TouchTestResult, event: &TouchEvent) -> bool {
        results
            .iter()
            .rev()
            .all(|target| target.dispatch_multi_container_event(event))
    }

    fn dispatch_touch_event_and_check(&mut self, event: &TouchEvent, results: &TouchTestResult, send_on_touch: bool) {
        let is_down = event.kind == TouchType::Down;
        let had_fail = is_down && self.referee.has_fail_recognizer(event.id);
        let all_done = is_down && self.referee.query_all_done();

        self.dispatch_touch_event_to_touch_test_result(event, results, send_on_touch, EventTreeType::Touch);

        if is_down
            && !all_done
            && !had_fail
            && self.referee.has_fail_recognizer(event.id)
            && self.down_finger_ids.len() <= 1
        {
            tracing::debug!(finger = event.id, "recognizer failed during setup, dispatching again");
            self.referee.force_clean_gesture_referee();
            self.referee.add_gesture_to_scope(event.id, &recognizers_of(results));
            self.dispatch_touch_event_to_touch_test_result(event, results, false, EventTreeType::Touch);
        }
    }

    /// Recognizers always receive the sample; touch callbacks stop at the
    /// first one that returns [`Propagation::Stop`](crate::Propagation::Stop).
    fn dispatch_touch_event_to_touch_test_result(
        &mut self,
        event: &TouchEvent,
        results: &TouchTestResult,
        send_on_touch: bool,
        tree_type: EventTreeType,
    ) {
        let mut stop = false;
        for target in results {
            if tree_type == EventTreeType::Touch {
                if let Some(node) = target.attached_node() {
                    if event.kind == TouchType::Down {
                        let monopolize = self.monopolize_nodes.contains(&node);
                        self.response_ctrl.try_set_first_response(node, monopolize);
                    }
                    if !self.response_ctrl.should_response(node) {
                        if let Some(handle) = target.recognizer() {
                            if handle.state() != RefereeState::Fail {
                                handle.borrow_mut().core_mut().adjudicate(GestureDisposal::Reject);
                                self.flush_disposals();
                            }
                        }
                        continue;
                    }
                }
            }

            match target {
                TouchTestTarget::Recognizer(handle) => {
                    handle.borrow_mut().handle_event(event);
                    self.flush_disposals();
                    let (state, disposal) = {
                        let recognizer = handle.borrow();
                        (recognizer.state(), recognizer.core().disposal())
                    };
                    self.record_mut(tree_type).add_gesture_procedure(
                        target.dump_id(),
                        touch_procedure(event.kind),
                        state.name(),
                        disposal.name(),
                        event.time,
                    );
                }
                TouchTestTarget::Touch(touch) => {
                    if stop || !send_on_touch {
                        continue;
                    }
                    stop = touch.handle_event(event).is_stop();
                    self.record_mut(tree_type).add_gesture_procedure(
                        target.dump_id(),
                        touch_procedure(event.kind),
                        "",
                        "",
                        event.time,
                    );
                }
            }
        }
    }

    fn update_info_when_finish_dispatch(&mut self, event: &TouchEvent, send_on_touch: bool) {
        if matches!(event.kind, TouchType::Up | TouchType::Cancel) {
            self.referee.clean_gesture_scope(event.id);
            if send_on_touch {
                self.touch_test_results.shift_remove(&event.id);
            }
            if self.touch_test_results.is_empty() {
                self.referee.clean_redundance_scope();
            }
        }
        if self.referee.is_scopes_empty() {
            self.response_ctrl.reset();
        }
        self.last_event_time = event.time;
        self.last_down_finger_number = self.down_finger_ids.len();
        if !event.is_falsified {
            self.last_source_tool = event.source_tool;
        }
    }

    // ========================================================================
    // Protocol Checks
    // ========================================================================

    /// A DOWN for a finger that is already down cancels everything.
    pub fn check_down_event(&mut self, event: &TouchEvent) {
        if event.kind != TouchType::Down {
            return;
        }
        if self.down_finger_ids.contains_key(&event.id) {
            tracing::warn!(finger = event.id, "duplicate DOWN without UP, cancelling all fingers");
            self.falsify_cancel_event_and_dispatch(event, true);
            self.referee.force_clean_gesture_referee();
            self.touch_test_results.clear();
            self.down_finger_ids.clear();
        }
        self.down_finger_ids.insert(event.id, event.original_id);
    }

    /// An UP or CANCEL for a finger that is not down cancels everything.
    pub fn check_up_event(&mut self, event: &TouchEvent) {
        if event.is_falsified || !matches!(event.kind, TouchType::Up | TouchType::Cancel) {
            return;
        }
        if self.down_finger_ids.shift_remove(&event.id).is_none() {
            tracing::warn!(finger = event.id, kind = event.kind.name(), "UP without DOWN, cancelling all fingers");
            self.falsify_cancel_event_and_dispatch(event, true);
            self.referee.force_clean_gesture_referee();
            self.down_finger_ids.clear();
        }
    }

    /// Send a falsified CANCEL to every finger that is down.
    pub fn falsify_cancel_event_and_dispatch(&mut self, event: &TouchEvent, send_on_touch: bool) {
        if self.down_finger_ids.is_empty() {
            return;
        }
        let downs: Vec<(i32, i32)> = self.down_finger_ids.iter().map(|(&id, &original)| (id, original)).collect();
        let pointers = self.last_touch_event.pointers.clone();
        for (id, original_id) in downs {
            let mut cancel = event.clone();
            cancel.id = id;
            cancel.original_id = original_id;
            cancel.kind = TouchType::Cancel;
            cancel.pull_type = TouchType::Unknown;
            cancel.is_falsified = true;
            cancel.pointers = pointers.clone();
            cancel.history.clear();
            self.dispatch_touch_event(&cancel, send_on_touch);
        }
    }

    /// A drag took over: cancel the candidates of every pointer.
    pub fn clean_recognizers_for_drag_begin(&mut self, event: &TouchEvent) {
        let entries: Vec<(i32, TouchTestResult)> = self
            .touch_test_results
            .iter()
            .map(|(&id, results)| (id, results.clone()))
            .collect();
        for (id, results) in entries {
            let mut cancel = event.clone();
            cancel.id = id;
            cancel.original_id = self.down_finger_ids.get(&id).copied().unwrap_or(id);
            cancel.kind = TouchType::Cancel;
            cancel.is_interpolated = true;
            self.dispatch_touch_event_to_touch_test_result(&cancel, &results, true, EventTreeType::Touch);
            self.referee.clean_gesture_scope(id);
        }
        self.down_finger_ids.shift_remove(&event.id);
        self.touch_test_results.clear();
        self.referee.clean_redundance_scope();
    }

    /// A stylus took over: drop this pointer and cancel the rest.
    pub fn clear_touch_test_target_for_pen_stylus(&mut self, event: &TouchEvent) {
        self.referee.clean_gesture_scope(event.id);
        self.touch_test_results.shift_remove(&event.id);
        let downs: Vec<(i32, i32)> = self.down_finger_ids.iter().map(|(&id, &original)| (id, original)).collect();
        for (id, original_id) in downs {
            let mut cancel = event.clone();
            cancel.id = id;
            cancel.original_id = original_id;
            cancel.kind = TouchType::Cancel;
            cancel.is_falsified = true;
            self.dispatch_touch_event(&cancel, true);
        }
    }

    // ========================================================================
    // Frame Flush
    // ========================================================================

    pub fn flush_touch_events_begin(&mut self, events: &[TouchEvent]) {
        for event in events {
            if let Some(results) = self.touch_test_results.get(&event.id).cloned() {
                for target in results.iter().rev() {
                    target.on_flush_touch_events_begin();
                }
            }
        }
        self.flush_disposals();
    }

    /// Close a frame's batch; resampled batches ask for another frame.
    pub fn flush_touch_events_end(&mut self, events: &[TouchEvent]) {
        let mut resampled = false;
        for event in events {
            if let Some(results) = self.touch_test_results.get(&event.id).cloned() {
                for target in results.iter().rev() {
                    target.on_flush_touch_events_end();
                }
                resampled |= !event.history.is_empty();
            }
        }
        self.flush_disposals();
        if resampled && self.config.enable_resample {
            if let Some(scheduler) = &self.frame_scheduler {
                scheduler.request_frame();
            }
        }
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Forget every candidate list.
    pub fn clear_results(&mut self) {
        self.touch_test_results.clear();
        self.post_event_touch_test_results.clear();
        self.axis_touch_test_results.clear();
        self.mouse_test_results.clear();
        self.axis_test_results.clear();
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Recorded event trees as `(depth, line)` pairs
    pub fn dump_event(&self, tree_type: EventTreeType) -> Vec<(i32, String)> {
        self.event_tree(tree_type).dump(0, self.config.dump_limit)
    }

    fn check_and_log_event_info(
        &mut self,
        channel: LogChannel,
        consumed: bool,
        event_id: i32,
        action: impl fmt::Debug,
        boundary: bool,
        now: Timestamp,
    ) -> bool {
        let key = (channel, consumed);
        let due = boundary
            || self
                .event_log
                .get(&key)
                .map_or(true, |last| now.millis_since(*last) > self.config.event_clear_duration_ms);
        if !due {
            return false;
        }
        self.event_log.insert(key, now);
        if consumed {
            tracing::info!(?channel, event_id, ?action, "last consumed event");
        } else {
            tracing::info!(?channel, event_id, ?action, "last received event");
        }
        true
    }

    /// Log a received touch sample; DOWN/UP/CANCEL always, others throttled.
    pub fn check_and_log_last_received_touch_event_info(&mut self, event_id: i32, kind: TouchType, now: Timestamp) -> bool {
        self.check_and_log_event_info(LogChannel::Touch, false, event_id, kind, kind.is_boundary(), now)
    }

    pub fn check_and_log_last_consumed_touch_event_info(&mut self, event_id: i32, kind: TouchType, now: Timestamp) -> bool {
        self.check_and_log_event_info(LogChannel::Touch, true, event_id, kind, kind.is_boundary(), now)
    }

    pub fn check_and_log_last_received_mouse_event_info(
        &mut self,
        event_id: i32,
        action: ripple_input::MouseAction,
        now: Timestamp,
    ) -> bool {
        let boundary = mouse::is_boundary_action(action);
        self.check_and_log_event_info(LogChannel::Mouse, false, event_id, action, boundary, now)
    }

    pub fn check_and_log_last_consumed_mouse_event_info(
        &mut self,
        event_id: i32,
        action: ripple_input::MouseAction,
        now: Timestamp,
    ) -> bool {
        let boundary = mouse::is_boundary_action(action);
        self.check_and_log_event_info(LogChannel::Mouse, true, event_id, action, boundary, now)
    }

    pub fn check_and_log_last_received_axis_event_info(
        &mut self,
        event_id: i32,
        action: ripple_input::AxisAction,
        now: Timestamp,
    ) -> bool {
        let boundary = axis::is_boundary_action(action);
        self.check_and_log_event_info(LogChannel::Axis, false, event_id, action, boundary, now)
    }

    pub fn check_and_log_last_consumed_axis_event_info(
        &mut self,
        event_id: i32,
        action: ripple_input::AxisAction,
        now: Timestamp,
    ) -> bool {
        let boundary = axis::is_boundary_action(action);
        self.check_and_log_event_info(LogChannel::Axis, true, event_id, action, boundary, now)
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new(EventManagerConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use ripple_gesture::{ClickRecognizer, LongPressRecognizer, RecognizerCore};
    use ripple_input::Rect;

    use super::*;
    use crate::scheduler::FrameCounter;
    use crate::target::{Propagation, TouchEventInfo};
    use crate::tree::HitTestMode;

    pub(crate) type Seen = Rc<RefCell<Vec<(i32, TouchType, bool)>>>;

    pub(crate) struct Fixture {
        pub manager: EventManager,
        pub tree: NodeTree,
        pub root: NodeId,
        pub button: NodeId,
    }

    /// root(400x400) > button(0, 0, 100x100)
    pub(crate) fn fixture() -> Fixture {
        let manager = EventManager::new(EventManagerConfig::debug());
        let mut tree = NodeTree::new();
        let root = tree.create_node("Root", Rect::new(0.0, 0.0, 400.0, 400.0));
        let button = tree.create_node("Button", Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.set_root(root);
        tree.add_child(root, button);
        Fixture { manager, tree, root, button }
    }

    pub(crate) fn touch(id: i32, kind: TouchType, x: f32, y: f32, ms: u64) -> TouchEvent {
        TouchEvent::new(id, kind, x, y, Timestamp::from_millis(ms))
    }

    pub(crate) fn record_touches(tree: &mut NodeTree, node: NodeId) -> Seen {
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        tree.set_on_touch(
            node,
            Rc::new(move |info: &TouchEventInfo| {
                sink.borrow_mut().push((info.id, info.kind, info.is_falsified));
                Propagation::Continue
            }),
        );
        seen
    }

    impl Fixture {
        pub(crate) fn send(&mut self, event: TouchEvent) -> bool {
            self.manager.on_touch_event(&event, &self.tree, self.root)
        }
    }

    /// Asks to wait on DOWN and never resolves
    struct Sticky {
        core: RecognizerCore,
    }

    impl GestureRecognizer for Sticky {
        fn core(&self) -> &RecognizerCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut RecognizerCore {
            &mut self.core
        }

        fn name(&self) -> &'static str {
            "Sticky"
        }

        fn handle_touch_down(&mut self, _event: &TouchEvent) {
            self.core.adjudicate(GestureDisposal::Pending);
        }

        fn handle_touch_move(&mut self, _event: &TouchEvent) {}
        fn handle_touch_up(&mut self, _event: &TouchEvent) {}
        fn handle_touch_cancel(&mut self, _event: &TouchEvent) {}
        fn on_accepted(&mut self) {}
        fn on_rejected(&mut self) {}
        fn on_reset(&mut self) {}
    }

    #[test]
    fn test_click_beats_long_press() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let presses = Rc::new(RefCell::new(0));
        let click_sink = Rc::clone(&clicks);
        let press_sink = Rc::clone(&presses);
        let click = RecognizerHandle::new(
            ClickRecognizer::tap(&ctx).on_action(move |info| click_sink.borrow_mut().push(info.count)),
        );
        let press = RecognizerHandle::new(
            LongPressRecognizer::standard(&ctx).on_action(move |_| *press_sink.borrow_mut() += 1),
        );
        f.tree.add_recognizer(f.button, click.clone());
        f.tree.add_recognizer(f.button, press.clone());

        assert!(f.send(touch(0, TouchType::Down, 10.0, 10.0, 0)));
        assert_eq!(click.state(), RefereeState::Detecting);
        assert_eq!(press.state(), RefereeState::Detecting);
        assert!(f.send(touch(0, TouchType::Up, 10.5, 10.0, 80)));

        assert_eq!(*clicks.borrow(), vec![1]);
        assert_eq!(*presses.borrow(), 0);
        assert!(press.borrow().core().history().iter().any(|r| r.state == RefereeState::Fail));
        assert!(!click.borrow().core().history().iter().any(|r| r.state == RefereeState::Fail));

        // the press deadline was cancelled with the rejection
        f.manager.advance_time(Timestamp::from_millis(1000));
        assert_eq!(*presses.borrow(), 0);
        assert!(f.manager.referee().is_scopes_empty());
        assert!(f.manager.touch_test_results().is_empty());
        assert!(f.manager.down_finger_ids().is_empty());
    }

    #[test]
    fn test_long_press_wins_on_deadline() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let presses = Rc::new(RefCell::new(0));
        let press_sink = Rc::clone(&presses);
        let click = RecognizerHandle::new(ClickRecognizer::tap(&ctx));
        let press = RecognizerHandle::new(
            LongPressRecognizer::standard(&ctx).on_action(move |_| *press_sink.borrow_mut() += 1),
        );
        f.tree.add_recognizer(f.button, click.clone());
        f.tree.add_recognizer(f.button, press.clone());

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.manager.advance_time(Timestamp::from_millis(600));
        assert_eq!(press.state(), RefereeState::Succeed);
        assert_eq!(click.state(), RefereeState::Fail);
        assert_eq!(*presses.borrow(), 1);

        f.send(touch(0, TouchType::Up, 10.0, 10.0, 700));
        assert_eq!(*presses.borrow(), 1);
        assert!(f.manager.referee().is_scopes_empty());
    }

    #[test]
    fn test_double_tap_through_manager() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let counts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&counts);
        let Ok(double) = ClickRecognizer::new(&ctx, 1, 2) else {
            panic!("valid click config");
        };
        let double = RecognizerHandle::new(double.on_action(move |info| sink.borrow_mut().push(info.count)));
        f.tree.add_recognizer(f.button, double.clone());

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(0, TouchType::Up, 10.0, 10.0, 50));
        assert_eq!(double.state(), RefereeState::Pending);
        assert!(counts.borrow().is_empty());

        f.send(touch(0, TouchType::Down, 12.0, 10.0, 150));
        f.send(touch(0, TouchType::Up, 12.0, 10.0, 200));
        assert_eq!(*counts.borrow(), vec![2]);
        assert!(f.manager.referee().is_scopes_empty());
    }

    #[test]
    fn test_duplicate_down_sends_one_falsified_cancel() {
        let mut f = fixture();
        let seen = record_touches(&mut f.tree, f.button);

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(0, TouchType::Down, 10.0, 10.0, 10));

        assert_eq!(
            *seen.borrow(),
            vec![
                (0, TouchType::Down, false),
                (0, TouchType::Cancel, true),
                (0, TouchType::Down, false),
            ]
        );
        assert_eq!(f.manager.down_finger_ids().len(), 1);
        assert!(f.manager.down_finger_ids().contains_key(&0));
    }

    #[test]
    fn test_orphan_up_cancels_down_fingers() {
        let mut f = fixture();
        let seen = record_touches(&mut f.tree, f.button);

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        assert!(!f.send(touch(3, TouchType::Up, 10.0, 10.0, 20)));

        assert_eq!(
            *seen.borrow(),
            vec![(0, TouchType::Down, false), (0, TouchType::Cancel, true)]
        );
        assert!(f.manager.down_finger_ids().is_empty());
    }

    #[test]
    fn test_stuck_referee_redoes_touch_test() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let sticky = RecognizerHandle::new(Sticky {
            core: RecognizerCore::new(&ctx),
        });
        f.tree.add_recognizer(f.button, sticky.clone());
        let seen = record_touches(&mut f.tree, f.button);

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        assert_eq!(sticky.state(), RefereeState::Pending);

        f.send(touch(1, TouchType::Down, 20.0, 20.0, 2000));
        assert_eq!(
            *seen.borrow(),
            vec![
                (0, TouchType::Down, false),
                (0, TouchType::Cancel, true),
                (1, TouchType::Cancel, true),
                (1, TouchType::Down, false),
            ]
        );
        assert!(f.manager.touch_test_results().contains_key(&1));
        assert!(!f.manager.touch_test_results().contains_key(&0));
        assert_eq!(sticky.state(), RefereeState::Pending);
    }

    #[test]
    fn test_outer_container_can_stop_dispatch() {
        let mut f = fixture();
        let seen = record_touches(&mut f.tree, f.button);
        let order = Rc::new(RefCell::new(Vec::new()));
        for (node, stop) in [(f.root, true), (f.button, false)] {
            let sink = Rc::clone(&order);
            f.tree.set_on_multi_container(
                node,
                Rc::new(move |_: &TouchEvent| {
                    sink.borrow_mut().push(node);
                    if stop {
                        Propagation::Stop
                    } else {
                        Propagation::Continue
                    }
                }),
            );
        }

        assert!(f.send(touch(0, TouchType::Down, 10.0, 10.0, 0)));
        assert_eq!(*order.borrow(), vec![f.root]);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_touch_callbacks_stop_but_recognizers_still_see_events() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let click = RecognizerHandle::new(ClickRecognizer::tap(&ctx));
        f.tree.add_recognizer(f.root, click.clone());
        f.tree.set_on_touch(f.button, Rc::new(|_: &TouchEventInfo| Propagation::Stop));
        let root_seen = record_touches(&mut f.tree, f.root);

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        assert!(root_seen.borrow().is_empty());
        assert_eq!(click.state(), RefereeState::Detecting);
    }

    #[test]
    fn test_monopolizing_node_rejects_outer_recognizers() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let outer = RecognizerHandle::new(ClickRecognizer::tap(&ctx));
        f.tree.add_recognizer(f.root, outer.clone());
        f.tree.set_monopolize_events(f.button, true);
        let seen = record_touches(&mut f.tree, f.button);

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(outer.state(), RefereeState::Fail);
    }

    #[test]
    fn test_drag_begin_cancels_every_pointer() {
        let mut f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        f.tree.set_on_touch(
            f.button,
            Rc::new(move |info: &TouchEventInfo| {
                sink.borrow_mut().push((info.id, info.kind));
                Propagation::Continue
            }),
        );

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(1, TouchType::Down, 20.0, 20.0, 5));
        assert!(f.send(touch(0, TouchType::PullMove, 30.0, 30.0, 20)));

        let seen = seen.borrow();
        assert!(seen.contains(&(0, TouchType::Cancel)));
        assert!(seen.contains(&(1, TouchType::Cancel)));
        assert!(f.manager.touch_test_results().is_empty());
        assert_eq!(f.manager.down_finger_ids().keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_drag_begin_cancel_is_recorded() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let click = RecognizerHandle::new(ClickRecognizer::tap(&ctx));
        f.tree.add_recognizer(f.button, click.clone());

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(0, TouchType::PullMove, 30.0, 30.0, 20));

        assert!(click.borrow().core().history().iter().any(|r| r.state == RefereeState::Fail));
        let dump = f.manager.dump_event(EventTreeType::Touch);
        assert!(dump
            .iter()
            .any(|(_, line)| line.starts_with("procedure: HandleTouchCancel")));
    }

    #[test]
    fn test_up_ends_drag() {
        let mut f = fixture();
        f.manager.set_dragging(true);
        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        assert!(f.manager.is_dragging());
        f.send(touch(0, TouchType::Up, 10.0, 10.0, 40));
        assert!(!f.manager.is_dragging());
    }

    #[test]
    fn test_next_down_clears_inner_event_win() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        f.tree.add_recognizer(f.button, RecognizerHandle::new(ClickRecognizer::tap(&ctx)));

        f.manager.set_inner_event_win(true);
        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(0, TouchType::Up, 10.0, 10.0, 50));
        assert!(f.manager.is_inner_event_win());

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 400));
        assert!(!f.manager.is_inner_event_win());
    }

    #[test]
    fn test_pending_multi_tap_survives_next_down() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let Ok(double) = ClickRecognizer::new(&ctx, 1, 2) else {
            panic!("valid click config");
        };
        let double = RecognizerHandle::new(double);
        f.tree.add_recognizer(f.button, double.clone());

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(0, TouchType::Up, 10.0, 10.0, 50));
        assert_eq!(double.state(), RefereeState::Pending);

        f.send(touch(0, TouchType::Down, 200.0, 200.0, 100));
        assert_eq!(double.state(), RefereeState::Pending);
    }

    #[test]
    fn test_pen_stylus_drops_pointer_and_cancels_others() {
        let mut f = fixture();
        let seen = record_touches(&mut f.tree, f.button);
        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(1, TouchType::Down, 20.0, 20.0, 5));

        let pen = touch(0, TouchType::Move, 10.0, 10.0, 10);
        f.manager.clear_touch_test_target_for_pen_stylus(&pen);

        let seen = seen.borrow();
        assert!(seen.contains(&(1, TouchType::Cancel, true)));
        assert!(!seen.contains(&(0, TouchType::Cancel, true)));
        assert!(f.manager.touch_test_results().is_empty());
    }

    #[test]
    fn test_flush_end_requests_frame_for_resampled_batch() {
        let mut f = fixture();
        let counter = Rc::new(FrameCounter::new());
        f.manager.set_frame_scheduler(counter.clone());
        record_touches(&mut f.tree, f.button);
        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));

        f.manager.flush_touch_events_begin(&[touch(0, TouchType::Move, 11.0, 10.0, 16)]);
        f.manager.flush_touch_events_end(&[touch(0, TouchType::Move, 11.0, 10.0, 16)]);
        assert_eq!(counter.requested(), 0);

        let resampled = touch(0, TouchType::Move, 12.0, 10.0, 32)
            .with_history(vec![touch(0, TouchType::Move, 11.5, 10.0, 24)]);
        f.manager.flush_touch_events_end(&[resampled]);
        assert_eq!(counter.requested(), 1);
    }

    #[test]
    fn test_dump_lists_snapshots_and_respects_limit() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        f.tree.add_recognizer(f.button, RecognizerHandle::new(ClickRecognizer::tap(&ctx)));
        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        f.send(touch(0, TouchType::Up, 10.0, 10.0, 40));

        let lines = f.manager.dump_event(EventTreeType::Touch);
        assert!(lines.iter().any(|(_, line)| line.starts_with("Click#")));
        assert!(lines.iter().any(|(_, line)| line.contains("HandleTouchUp")));

        let mut limited = EventManager::new(EventManagerConfig::debug().with_dump_limit(4));
        let root = f.root;
        limited.on_touch_event(&touch(0, TouchType::Down, 10.0, 10.0, 0), &f.tree, root);
        assert_eq!(limited.dump_event(EventTreeType::Touch).len(), 4);
    }

    #[test]
    fn test_block_mode_hides_root_recognizers() {
        let mut f = fixture();
        let ctx = Rc::clone(f.manager.context());
        let outer = RecognizerHandle::new(ClickRecognizer::tap(&ctx));
        f.tree.add_recognizer(f.root, outer.clone());
        f.tree.set_hit_test_mode(f.button, HitTestMode::Block);
        record_touches(&mut f.tree, f.button);

        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        assert_eq!(f.manager.touch_test_results()[&0].len(), 1);
        assert_eq!(outer.state(), RefereeState::Ready);
    }

    #[test]
    fn test_append_keeps_previous_candidates_last() {
        let mut f = fixture();
        record_touches(&mut f.tree, f.button);
        f.send(touch(0, TouchType::Down, 10.0, 10.0, 0));
        let before = f.manager.touch_test_results()[&0].len();

        let mut sub = NodeTree::new();
        let embedded = sub.create_node("Embedded", Rect::new(0.0, 0.0, 50.0, 50.0));
        record_touches(&mut sub, embedded);
        f.manager.touch_test(
            &touch(0, TouchType::Down, 10.0, 10.0, 5),
            &sub,
            embedded,
            TouchTestOptions::appending(Offset::new(100.0, 100.0), 1.0),
        );
        let results = &f.manager.touch_test_results()[&0];
        assert_eq!(results.len(), before + 1);
        assert_eq!(results[0].attached_node(), Some(embedded));
    }

    #[test]
    fn test_event_info_logging_is_throttled() {
        let mut manager = EventManager::new(EventManagerConfig::debug());
        let t = Timestamp::from_millis;
        assert!(manager.check_and_log_last_received_touch_event_info(0, TouchType::Down, t(0)));
        assert!(!manager.check_and_log_last_received_touch_event_info(0, TouchType::Move, t(10)));
        assert!(manager.check_and_log_last_received_touch_event_info(0, TouchType::Move, t(2000)));
        assert!(manager.check_and_log_last_consumed_touch_event_info(0, TouchType::Move, t(2000)));
        assert!(manager.check_and_log_last_received_touch_event_info(0, TouchType::Up, t(2001)));
    }
}
