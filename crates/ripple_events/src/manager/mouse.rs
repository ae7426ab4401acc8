//! Mouse, hover and accessibility hover dispatch

use ripple_gesture::NodeId;
use ripple_input::{MouseAction, MouseButton, MouseEvent, TouchEvent, TouchType};

use super::EventManager;
use crate::target::{AccessibilityHoverTarget, HoverTarget, MouseTarget, MouseTestResult};
use crate::tree::{HitTestKind, NodeTree};

pub(super) fn is_boundary_action(action: MouseAction) -> bool {
    matches!(action, MouseAction::Press | MouseAction::Release)
}

/// Enter/exit diff between two hover lists, deepest node first.
///
/// `len` is the cursor left by the previous call: when an enter callback
/// intercepted, nodes past it were never entered, so they are neither
/// entered nor exited on the next call. `on_hover` returns true when the
/// callback intercepted the event.
fn dispatch_hover_cursor<T: PartialEq>(
    last: &[T],
    curr: &[T],
    len: &mut usize,
    mut on_hover: impl FnMut(&T, bool) -> bool,
) {
    let mut last_end = 0;
    let mut last_end_target = None;
    for (index, item) in last.iter().enumerate() {
        last_end += 1;
        if !curr.contains(item) {
            on_hover(item, false);
        }
        if index + 1 >= *len && *len != 0 {
            last_end_target = Some(item);
            break;
        }
    }

    *len = 0;
    let mut curr_end = 0;
    for (index, item) in curr.iter().enumerate() {
        curr_end += 1;
        if !last[..last_end].contains(item) && on_hover(item, true) {
            *len = index + 1;
            break;
        }
        if last_end_target == Some(item) {
            *len = index + 1;
            break;
        }
    }

    // still hovered, but now behind an interception
    for item in &last[..last_end] {
        if curr[curr_end..].contains(item) {
            on_hover(item, false);
        }
    }
}

impl EventManager {
    fn collect_mouse_targets(tree: &NodeTree, root: NodeId, event: &MouseEvent) -> MouseTestResult {
        let mut result = MouseTestResult::default();
        for hit in tree.hit_test(root, event.position(), HitTestKind::Mouse, None) {
            let Some(node) = tree.get(hit.node) else {
                continue;
            };
            if let Some(callback) = &node.on_mouse {
                result.mouse.push(MouseTarget::new(hit.node, hit.origin, callback.clone()));
            }
            if let Some(callback) = &node.on_hover {
                result.hover.push(HoverTarget::new(hit.node, callback.clone()));
            }
        }
        result
    }

    /// Hit-test for a mouse sample and refresh the hover lists.
    ///
    /// Moves with a button held reuse the pointer's last result, so a drag
    /// keeps talking to the nodes it started on.
    pub fn mouse_test(&mut self, event: &MouseEvent, tree: &NodeTree, root: NodeId) {
        if !tree.contains(root) {
            return;
        }
        let pointer = event.pointer_id();
        let result = if self.config.uses_hover_cursor() {
            if event.pull_action == MouseAction::PullMove {
                self.update_hover_node(event, MouseTestResult::default());
                return;
            }
            if event.action == MouseAction::Move && event.button != MouseButton::None {
                self.mouse_test_results.get(&pointer).cloned().unwrap_or_default()
            } else {
                let result = Self::collect_mouse_targets(tree, root, event);
                self.mouse_test_results.insert(pointer, result.clone());
                result
            }
        } else {
            Self::collect_mouse_targets(tree, root, event)
        };
        tracing::trace!(
            pointer,
            mouse = result.mouse.len(),
            hover = result.hover.len(),
            "mouse test"
        );
        self.update_hover_node(event, result);
    }

    pub fn update_hover_node(&mut self, event: &MouseEvent, result: MouseTestResult) {
        self.curr_mouse_test_results = result.mouse;
        match event.action {
            MouseAction::WindowLeave => {
                tracing::info!("hover exit by window leave");
                self.last_hover_test_results = std::mem::take(&mut self.curr_hover_test_results);
            }
            MouseAction::WindowEnter => {
                tracing::info!("hover enter by window enter");
                self.last_hover_test_results.clear();
                self.curr_hover_test_results = result.hover;
            }
            _ => {
                self.last_hover_test_results =
                    std::mem::replace(&mut self.curr_hover_test_results, result.hover);
            }
        }
    }

    /// Press chain a mouse event belongs to, if any
    fn press_chain(&self, button: MouseButton) -> Option<MouseButton> {
        match button {
            MouseButton::None => None,
            _ if self.config.uses_button_chains() => Some(button),
            MouseButton::Left => Some(MouseButton::Left),
            _ => None,
        }
    }

    /// Targets pressed with `button` and not yet released
    pub fn pressed_mouse_targets(&self, button: MouseButton) -> &[MouseTarget] {
        self.pressed_mouse_test_results
            .get(&button)
            .map_or(&[], Vec::as_slice)
    }

    /// Deliver a mouse sample. Returns true once a target stops it.
    ///
    /// Targets pressed with the event's button run first, then the current
    /// targets that did not already see the event.
    pub fn dispatch_mouse_event_ng(&mut self, event: &MouseEvent) -> bool {
        if !matches!(
            event.action,
            MouseAction::Press
                | MouseAction::Release
                | MouseAction::Move
                | MouseAction::WindowEnter
                | MouseAction::WindowLeave
        ) {
            return false;
        }

        let chain = self.press_chain(event.button);
        let mut handled = Vec::new();
        let mut stop = false;
        if let Some(button) = chain {
            let pressed = self.pressed_mouse_targets(button).to_vec();
            for target in pressed {
                let result = target.handle_mouse_event(event);
                handled.push(target);
                if result.is_stop() {
                    stop = true;
                    break;
                }
            }
            match event.action {
                MouseAction::Press => {
                    self.pressed_mouse_test_results
                        .insert(button, self.curr_mouse_test_results.clone());
                }
                MouseAction::Release => {
                    self.pressed_mouse_test_results.remove(&button);
                }
                _ => {}
            }
        }
        if event.pull_action == MouseAction::PullUp {
            let released = if self.config.uses_button_chains() {
                event.button
            } else {
                MouseButton::Left
            };
            self.pressed_mouse_test_results.remove(&released);
        }

        let pressed_after = chain
            .map(|button| self.pressed_mouse_targets(button).to_vec())
            .unwrap_or_default();
        for target in self.curr_mouse_test_results.clone() {
            let skip = if stop {
                pressed_after.contains(&target)
            } else {
                handled.contains(&target)
            };
            if !skip && target.handle_mouse_event(event).is_stop() {
                return true;
            }
        }
        false
    }

    /// Send hover enter/exit transitions for the last mouse test.
    pub fn dispatch_mouse_hover_event_ng(&mut self, event: &MouseEvent) -> bool {
        if self.config.uses_hover_cursor() {
            dispatch_hover_cursor(
                &self.last_hover_test_results,
                &self.curr_hover_test_results,
                &mut self.last_hover_dispatch_length,
                |target, hovered| target.handle_hover_event(hovered, event).is_stop(),
            );
            return true;
        }

        for target in &self.last_hover_test_results {
            if !self.curr_hover_test_results.contains(target) {
                target.handle_hover_event(false, event);
            }
        }
        for target in &self.curr_hover_test_results {
            if !self.last_hover_test_results.contains(target)
                && target.handle_hover_event(true, event).is_stop()
            {
                break;
            }
        }
        true
    }

    // ========================================================================
    // Accessibility Hover
    // ========================================================================

    /// Hit-test for an accessibility hover sample.
    pub fn accessibility_hover_test(&mut self, event: &TouchEvent, tree: &NodeTree, root: NodeId) {
        if !tree.contains(root) {
            return;
        }
        if self.down_finger_ids.is_empty() {
            self.response_ctrl.reset();
            self.referee.clean_all(false);
            self.touch_test_results.clear();
        }
        let mut targets = Vec::new();
        for hit in tree.hit_test(root, event.position(), HitTestKind::AccessibilityHover, Some(event)) {
            if let Some(callback) = tree.get(hit.node).and_then(|node| node.on_accessibility_hover.clone()) {
                targets.push(AccessibilityHoverTarget::new(hit.node, callback));
            }
        }
        self.update_accessibility_hover_node(event, targets);
    }

    pub fn update_accessibility_hover_node(&mut self, event: &TouchEvent, targets: Vec<AccessibilityHoverTarget>) {
        match event.kind {
            TouchType::HoverExit | TouchType::HoverCancel => {
                tracing::info!(kind = event.kind.name(), "accessibility hover ended");
                self.last_accessibility_hover_results = std::mem::take(&mut self.cur_accessibility_hover_results);
            }
            TouchType::HoverEnter => {
                tracing::info!("accessibility hover entered");
                self.last_accessibility_hover_results.clear();
                self.cur_accessibility_hover_results = targets;
            }
            _ => {
                self.last_accessibility_hover_results =
                    std::mem::replace(&mut self.cur_accessibility_hover_results, targets);
            }
        }
    }

    /// Same diff as mouse hover; accessibility callbacks never intercept.
    pub fn dispatch_accessibility_hover_event_ng(&mut self, event: &TouchEvent) {
        dispatch_hover_cursor(
            &self.last_accessibility_hover_results,
            &self.cur_accessibility_hover_results,
            &mut self.last_accessibility_hover_dispatch_length,
            |target, hovered| {
                target.handle_accessibility_hover_event(hovered, event);
                false
            },
        );
    }

    /// End accessibility hover before a regular touch takes over.
    pub fn falsify_hover_cancel_event_and_dispatch(&mut self, event: &TouchEvent) {
        self.last_accessibility_hover_results = std::mem::take(&mut self.cur_accessibility_hover_results);
        let mut cancel = event.clone();
        cancel.is_falsified = true;
        cancel.kind = TouchType::HoverCancel;
        self.dispatch_accessibility_hover_event_ng(&cancel);
    }
}
