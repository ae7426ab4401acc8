//! Scenario context
//!
//! A node tree, an event manager and a virtual clock. Scripts move the
//! clock explicitly; every event is stamped with the current time.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use ripple_events::{EventManager, EventManagerConfig, NodeTree};
use ripple_gesture::{GestureContext, NodeId};
use ripple_input::{
    AxisAction, AxisEvent, MouseAction, MouseButton, MouseEvent, Point, Rect, Timestamp, TouchEvent,
    TouchPoint, TouchType,
};

/// Size of the root node every scenario starts with
pub const ROOT_SIZE: f32 = 800.0;

pub struct ScenarioContext {
    manager: EventManager,
    tree: NodeTree,
    root: NodeId,
    clock: Timestamp,
    fingers: FxHashMap<i32, Point>,
}

impl ScenarioContext {
    pub fn new(config: EventManagerConfig) -> Self {
        let mut tree = NodeTree::new();
        let root = tree.create_node("Root", Rect::new(0.0, 0.0, ROOT_SIZE, ROOT_SIZE));
        tree.set_root(root);
        Self {
            manager: EventManager::new(config),
            tree,
            root,
            clock: Timestamp::ZERO,
            fingers: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn manager(&self) -> &EventManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut EventManager {
        &mut self.manager
    }

    /// Gesture context recognizers must be created on
    pub fn gestures(&self) -> Rc<GestureContext> {
        Rc::clone(self.manager.context())
    }

    pub fn now(&self) -> Timestamp {
        self.clock
    }

    /// Add a node under `parent`; `frame` is relative to the parent.
    pub fn node(&mut self, parent: NodeId, tag: &str, frame: Rect) -> NodeId {
        let node = self.tree.create_node(tag, frame);
        self.tree.add_child(parent, node);
        node
    }

    /// Move the clock forward and fire due recognizer timers.
    pub fn advance(&mut self, millis: u64) {
        self.clock = self.clock + std::time::Duration::from_millis(millis);
        self.manager.advance_time(self.clock);
    }

    /// Send a raw touch sample at the current time.
    pub fn send(&mut self, event: TouchEvent) -> bool {
        self.manager.on_touch_event(&event, &self.tree, self.root)
    }

    fn touch(&mut self, id: i32, kind: TouchType, x: f32, y: f32) -> bool {
        let lifted = matches!(kind, TouchType::Up | TouchType::Cancel);
        self.fingers.insert(id, Point::new(x, y));
        let mut pointers: Vec<TouchPoint> = self
            .fingers
            .iter()
            .map(|(&finger, point)| TouchPoint {
                id: finger,
                x: point.x,
                y: point.y,
                screen_x: point.x,
                screen_y: point.y,
                down_time: self.clock,
                is_pressed: !(lifted && finger == id),
                original_id: finger,
            })
            .collect();
        pointers.sort_by_key(|point| point.id);
        if lifted {
            self.fingers.remove(&id);
        }
        self.send(TouchEvent::new(id, kind, x, y, self.clock).with_pointers(pointers))
    }

    pub fn down(&mut self, id: i32, x: f32, y: f32) -> bool {
        self.touch(id, TouchType::Down, x, y)
    }

    pub fn move_to(&mut self, id: i32, x: f32, y: f32) -> bool {
        self.touch(id, TouchType::Move, x, y)
    }

    pub fn up(&mut self, id: i32, x: f32, y: f32) -> bool {
        self.touch(id, TouchType::Up, x, y)
    }

    /// Cancel a finger where it last was.
    pub fn cancel(&mut self, id: i32) -> bool {
        let point = self.fingers.get(&id).copied().unwrap_or_default();
        self.touch(id, TouchType::Cancel, point.x, point.y)
    }

    /// Mouse test plus hover and button dispatch, like a host window does.
    pub fn mouse(&mut self, action: MouseAction, button: MouseButton, x: f32, y: f32) -> bool {
        let event = MouseEvent::new(action, button, x, y, self.clock);
        self.manager.mouse_test(&event, &self.tree, self.root);
        self.manager.dispatch_mouse_hover_event_ng(&event);
        self.manager.dispatch_mouse_event_ng(&event)
    }

    pub fn hover(&mut self, x: f32, y: f32) -> bool {
        self.mouse(MouseAction::Move, MouseButton::None, x, y)
    }

    /// Send a trackpad sample through the axis gesture pipeline.
    pub fn axis(&mut self, action: AxisAction, x: f32, y: f32, pinch_scale: f32) -> bool {
        let event = AxisEvent::new(0, action, x, y, self.clock).with_pinch_scale(pinch_scale);
        self.manager.on_axis_event(&event, &self.tree, self.root)
    }
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self::new(EventManagerConfig::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointers_follow_fingers() {
        let mut ctx = ScenarioContext::default();
        ctx.down(0, 10.0, 10.0);
        ctx.down(1, 20.0, 20.0);
        assert_eq!(ctx.manager().down_finger_ids().len(), 2);

        ctx.up(0, 10.0, 10.0);
        ctx.cancel(1);
        assert!(ctx.manager().down_finger_ids().is_empty());
        assert!(ctx.fingers.is_empty());
    }

    #[test]
    fn test_advance_moves_clock() {
        let mut ctx = ScenarioContext::default();
        ctx.advance(40);
        ctx.advance(60);
        assert_eq!(ctx.now(), Timestamp::from_millis(100));
    }
}
