//! Axis (wheel, trackpad, crown) pipelines
//!
//! Axis samples reach gesture recognizers through their own candidate map
//! and the shared referee. Plain axis callbacks are hit-tested separately
//! and stop at the first node that consumes the sample.

use ripple_gesture::NodeId;
use ripple_input::{Axis, AxisAction, AxisEvent, TouchEvent, TouchPoint, TouchType};

use super::{recognizers_of, EventManager};
use crate::target::{AxisTarget, TouchTestResult};
use crate::tree::{HitTestKind, NodeTree};

pub(super) fn is_boundary_action(action: AxisAction) -> bool {
    matches!(action, AxisAction::Begin | AxisAction::End)
}

impl EventManager {
    pub fn axis_touch_test_results(&self) -> &indexmap::IndexMap<i32, TouchTestResult> {
        &self.axis_touch_test_results
    }

    /// Map an axis sample onto the touch phase it stands for.
    pub fn convert_axis_event_to_touch_event(event: &AxisEvent) -> TouchEvent {
        let kind = match event.action {
            AxisAction::Begin => TouchType::Down,
            AxisAction::Update => TouchType::Move,
            AxisAction::End => TouchType::Up,
            AxisAction::Cancel => TouchType::Cancel,
            AxisAction::None => TouchType::Unknown,
        };
        let point = TouchPoint {
            id: event.id,
            x: event.x,
            y: event.y,
            screen_x: event.screen_x,
            screen_y: event.screen_y,
            down_time: event.time,
            is_pressed: kind == TouchType::Down,
            original_id: event.id,
        };
        TouchEvent::new(event.id, kind, event.x, event.y, event.time)
            .with_screen_position(event.screen_x, event.screen_y)
            .with_source_type(event.source_type)
            .with_source_tool(event.source_tool)
            .with_touch_event_id(event.touch_event_id)
            .with_original_id(event.original_id)
            .with_pointers([point])
    }

    /// Hit-test recognizers for an axis sequence.
    pub fn axis_touch_test(&mut self, event: &AxisEvent, tree: &NodeTree, root: NodeId) {
        if self.referee.check_source_type_change(event.source_type, true) {
            let tool_changed = event.source_tool != self.last_source_tool;
            tracing::debug!(tool_changed, "input switched to axis, cancelling touches");
            let cancel = TouchEvent::new(event.id, TouchType::Cancel, event.x, event.y, event.time)
                .with_source_type(event.source_type)
                .with_source_tool(event.source_tool);
            self.falsify_cancel_event_and_dispatch(&cancel, tool_changed);
            self.response_ctrl.reset();
            self.referee.clean_all(true);
            if tool_changed {
                self.touch_test_results.clear();
                self.axis_touch_test_results.clear();
            }
        }
        if !tree.contains(root) {
            return;
        }
        if self.axis_touch_test_results.is_empty() && self.referee.query_all_done() {
            self.response_ctrl.reset();
        }
        let touch = Self::convert_axis_event_to_touch_event(event);
        let results = self.hit_test_touch(&touch, tree, root, HitTestKind::Axis);
        tracing::debug!(axis = event.id, candidates = results.len(), "axis touch test");
        self.axis_touch_test_results.insert(event.id, results);
    }

    /// Deliver an axis sample to its candidates.
    ///
    /// Returns false when the sample has no candidate list.
    pub fn dispatch_axis_touch_event(&mut self, event: &AxisEvent, send_on_touch: bool) -> bool {
        self.advance_time(event.time);
        let Some(results) = self.axis_touch_test_results.get(&event.id).cloned() else {
            tracing::info!(axis = event.id, "no axis test result");
            return false;
        };
        self.last_axis_event = event.clone();
        // rotation never joins a scope
        if event.action == AxisAction::Begin && !event.is_rotation_event {
            self.referee.add_gesture_to_scope(event.id, &recognizers_of(&results));
        }

        for target in &results {
            if !target.is_recognizer() && !send_on_touch {
                continue;
            }
            let handled = target.handle_axis_event(event);
            self.flush_disposals();
            if !handled {
                break;
            }
        }

        if matches!(event.action, AxisAction::End | AxisAction::None | AxisAction::Cancel)
            && !event.is_rotation_event
        {
            self.referee.clean_gesture_scope(event.id);
            self.axis_touch_test_results.shift_remove(&event.id);
        }
        self.last_event_time = event.time;
        self.last_source_tool = event.source_tool;
        true
    }

    /// Begin samples hit-test; every sample is dispatched.
    pub fn on_axis_event(&mut self, event: &AxisEvent, tree: &NodeTree, root: NodeId) -> bool {
        if event.action == AxisAction::Begin {
            self.axis_touch_test(event, tree, root);
        }
        self.dispatch_axis_touch_event(event, true)
    }

    /// Whether live axis candidates scroll along different axes.
    pub fn has_different_direction_gesture(&self) -> bool {
        let mut vertical = false;
        let mut horizontal = false;
        for target in self.axis_touch_test_results.values().flatten() {
            match target.axis_direction() {
                Axis::Free => return true,
                Axis::Vertical => vertical = true,
                Axis::Horizontal => horizontal = true,
                Axis::None => {}
            }
            if vertical && horizontal {
                return true;
            }
        }
        false
    }

    /// Cancel the axis sequence still in flight.
    pub fn falsify_axis_cancel(&mut self) {
        let Some(&id) = self.axis_touch_test_results.keys().next() else {
            return;
        };
        let mut cancel = self.last_axis_event.clone();
        cancel.action = AxisAction::Cancel;
        cancel.id = id;
        self.dispatch_axis_touch_event(&cancel, true);
    }

    // ========================================================================
    // Plain Axis Targets
    // ========================================================================

    pub fn axis_test(&mut self, event: &AxisEvent, tree: &NodeTree, root: NodeId) {
        if !tree.contains(root) {
            return;
        }
        self.axis_test_results = tree
            .hit_test(root, event.position(), HitTestKind::Axis, None)
            .into_iter()
            .filter_map(|hit| {
                let callback = tree.get(hit.node)?.on_axis.clone()?;
                Some(AxisTarget::new(hit.node, callback))
            })
            .collect();
    }

    /// Offer the sample to axis targets until one consumes it.
    ///
    /// Empty samples only clear the targets and return false.
    pub fn dispatch_axis_event_ng(&mut self, event: &AxisEvent) -> bool {
        let targets = std::mem::take(&mut self.axis_test_results);
        if event.is_empty() && !event.is_rotation_event {
            return false;
        }
        for target in &targets {
            if target.handle_axis_event(event) {
                break;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ripple_gesture::{PanDirection, PanRecognizer, PinchRecognizer, RecognizerHandle, RefereeState};
    use ripple_input::{Rect, SourceTool, SourceType, Timestamp};

    use super::*;
    use crate::config::EventManagerConfig;
    use crate::target::Propagation;

    fn axis(action: AxisAction, ms: u64) -> AxisEvent {
        AxisEvent::new(0, action, 10.0, 10.0, Timestamp::from_millis(ms))
    }

    fn single_node() -> (NodeTree, NodeId) {
        let mut tree = NodeTree::new();
        let root = tree.create_node("Root", Rect::new(0.0, 0.0, 400.0, 400.0));
        tree.set_root(root);
        (tree, root)
    }

    #[test]
    fn test_convert_axis_phases() {
        let begin = EventManager::convert_axis_event_to_touch_event(&axis(AxisAction::Begin, 0));
        assert_eq!(begin.kind, TouchType::Down);
        assert!(begin.pointers[0].is_pressed);
        assert_eq!(begin.source_type, SourceType::Mouse);

        let kinds: Vec<TouchType> = [AxisAction::Update, AxisAction::End, AxisAction::Cancel, AxisAction::None]
            .into_iter()
            .map(|action| EventManager::convert_axis_event_to_touch_event(&axis(action, 0)).kind)
            .collect();
        assert_eq!(
            kinds,
            vec![TouchType::Move, TouchType::Up, TouchType::Cancel, TouchType::Unknown]
        );
    }

    #[test]
    fn test_trackpad_pinch_through_axis_pipeline() {
        let (mut tree, root) = single_node();
        let mut manager = EventManager::new(EventManagerConfig::debug());
        let pinch = RecognizerHandle::new(PinchRecognizer::standard(manager.context()));
        tree.add_recognizer(root, pinch.clone());

        assert!(manager.on_axis_event(&axis(AxisAction::Begin, 0), &tree, root));
        assert_eq!(pinch.state(), RefereeState::Detecting);
        manager.on_axis_event(&axis(AxisAction::Update, 10).with_pinch_scale(1.5), &tree, root);
        assert_eq!(pinch.state(), RefereeState::Succeed);

        manager.on_axis_event(&axis(AxisAction::End, 20), &tree, root);
        assert!(manager.axis_touch_test_results().is_empty());
        assert!(manager.referee().is_scopes_empty());
        assert!(!manager.dispatch_axis_touch_event(&axis(AxisAction::Update, 30), true));
    }

    #[test]
    fn test_mixed_axis_directions() {
        let (mut tree, root) = single_node();
        let child = tree.create_node("List", Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.add_child(root, child);
        let mut manager = EventManager::new(EventManagerConfig::debug());
        let ctx = Rc::clone(manager.context());
        let pan = |direction| {
            let Ok(pan) = PanRecognizer::new(&ctx, 1, direction, 5.0) else {
                panic!("valid pan config");
            };
            RecognizerHandle::new(pan)
        };
        tree.add_recognizer(child, pan(PanDirection::VERTICAL));

        manager.axis_touch_test(&axis(AxisAction::Begin, 0), &tree, root);
        assert!(!manager.has_different_direction_gesture());

        tree.add_recognizer(root, pan(PanDirection::HORIZONTAL));
        manager.axis_touch_test(&axis(AxisAction::Begin, 10), &tree, root);
        assert!(manager.has_different_direction_gesture());
    }

    #[test]
    fn test_mouse_touch_after_axis_cancels_axis_sequence() {
        let (mut tree, root) = single_node();
        let mut manager = EventManager::new(EventManagerConfig::debug());
        let cancels = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&cancels);
        let pinch = RecognizerHandle::new(
            PinchRecognizer::standard(manager.context()).on_action_cancel(move |_| *sink.borrow_mut() += 1),
        );
        tree.add_recognizer(root, pinch.clone());

        manager.on_axis_event(&axis(AxisAction::Begin, 0), &tree, root);
        manager.on_axis_event(&axis(AxisAction::Update, 10).with_pinch_scale(1.5), &tree, root);
        assert_eq!(pinch.state(), RefereeState::Succeed);
        assert_eq!(manager.axis_touch_test_results().len(), 1);

        let down = TouchEvent::new(0, TouchType::Down, 10.0, 10.0, Timestamp::from_millis(20))
            .with_source_type(SourceType::Mouse)
            .with_source_tool(SourceTool::Mouse);
        manager.on_touch_event(&down, &tree, root);
        assert_eq!(*cancels.borrow(), 1);
        assert!(manager.axis_touch_test_results().is_empty());
        assert!(manager.touch_test_results().contains_key(&0));
    }

    #[test]
    fn test_first_consuming_axis_target_wins() {
        let (mut tree, root) = single_node();
        let child = tree.create_node("Scroll", Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.add_child(root, child);
        let seen = Rc::new(RefCell::new(Vec::new()));
        for (node, result) in [(root, Propagation::Continue), (child, Propagation::Stop)] {
            let sink = Rc::clone(&seen);
            tree.set_on_axis(
                node,
                Rc::new(move |_: &AxisEvent| {
                    sink.borrow_mut().push(node);
                    result
                }),
            );
        }
        let mut manager = EventManager::new(EventManagerConfig::debug());

        let scroll = axis(AxisAction::Update, 0).with_axes(0.0, -3.0);
        manager.axis_test(&scroll, &tree, root);
        assert!(manager.dispatch_axis_event_ng(&scroll));
        assert_eq!(*seen.borrow(), vec![child]);

        manager.axis_test(&scroll, &tree, root);
        assert!(!manager.dispatch_axis_event_ng(&axis(AxisAction::Update, 10)));
        assert_eq!(seen.borrow().len(), 1);
    }
}
