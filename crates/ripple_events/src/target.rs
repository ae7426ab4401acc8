//! Event targets collected by hit testing
//!
//! A touch test yields an ordered [`TouchTestResult`]: gesture recognizers
//! and plain touch callbacks, deepest node first. Mouse, hover, axis and
//! accessibility hover tests yield their own target kinds. Every target
//! refers back to its node by [`NodeId`] only.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use ripple_gesture::{GestureSnapshot, NodeId, RecognizerHandle, RecognizerId};
use ripple_input::{
    Axis, AxisEvent, MouseAction, MouseButton, MouseEvent, Offset, Point, SourceTool, SourceType,
    Timestamp, TouchEvent, TouchType,
};

/// Whether an event keeps travelling to the next target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

impl Propagation {
    pub fn is_stop(self) -> bool {
        self == Propagation::Stop
    }
}

/// Touch sample as seen by a node's touch callback
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEventInfo {
    pub node: NodeId,
    pub id: i32,
    pub kind: TouchType,
    /// Host window coordinates
    pub global: Point,
    /// Relative to the node's frame
    pub local: Point,
    pub time: Timestamp,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
    pub is_falsified: bool,
}

/// Mouse sample as seen by a node's mouse callback
#[derive(Clone, Debug, PartialEq)]
pub struct MouseEventInfo {
    pub node: NodeId,
    pub button: MouseButton,
    pub action: MouseAction,
    pub global: Point,
    pub local: Point,
    pub time: Timestamp,
}

pub type TouchCallback = Rc<dyn Fn(&TouchEventInfo) -> Propagation>;
pub type MultiContainerCallback = Rc<dyn Fn(&TouchEvent) -> Propagation>;
pub type MouseCallback = Rc<dyn Fn(&MouseEventInfo) -> Propagation>;
/// Called with `true` on hover enter and `false` on exit
pub type HoverCallback = Rc<dyn Fn(bool, &MouseEvent) -> Propagation>;
pub type AccessibilityHoverCallback = Rc<dyn Fn(bool, &TouchEvent)>;
pub type AxisCallback = Rc<dyn Fn(&AxisEvent) -> Propagation>;

// ============================================================================
// Touch targets
// ============================================================================

/// A node's plain touch callback inside a candidate list
pub struct TouchEventTarget {
    node: NodeId,
    tag: String,
    origin: Point,
    on_touch: Option<TouchCallback>,
    on_multi_container: Option<MultiContainerCallback>,
    sub_pipeline: Cell<Option<(Offset, f32)>>,
}

impl TouchEventTarget {
    pub fn new(
        node: NodeId,
        tag: impl Into<String>,
        origin: Point,
        on_touch: Option<TouchCallback>,
        on_multi_container: Option<MultiContainerCallback>,
    ) -> Self {
        Self {
            node,
            tag: tag.into(),
            origin,
            on_touch,
            on_multi_container,
            sub_pipeline: Cell::new(None),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn info(&self, event: &TouchEvent) -> TouchEventInfo {
        let position = event.position();
        let global = match self.sub_pipeline.get() {
            Some((offset, scale)) => Point::new(position.x * scale + offset.dx, position.y * scale + offset.dy),
            None => position,
        };
        TouchEventInfo {
            node: self.node,
            id: event.id,
            kind: event.kind,
            global,
            local: Point::new(position.x - self.origin.x, position.y - self.origin.y),
            time: event.time,
            source_type: event.source_type,
            source_tool: event.source_tool,
            is_falsified: event.is_falsified,
        }
    }

    /// Run the touch callback. Nodes without one let the event through.
    pub fn handle_event(&self, event: &TouchEvent) -> Propagation {
        match &self.on_touch {
            Some(callback) => callback(&self.info(event)),
            None => Propagation::Continue,
        }
    }

    pub fn dispatch_multi_container_event(&self, event: &TouchEvent) -> Propagation {
        match &self.on_multi_container {
            Some(callback) => callback(event),
            None => Propagation::Continue,
        }
    }
}

/// One entry of a candidate list
#[derive(Clone)]
pub enum TouchTestTarget {
    Recognizer(RecognizerHandle),
    Touch(Rc<TouchEventTarget>),
}

/// Ordered candidate list for one pointer, deepest node first
pub type TouchTestResult = Vec<TouchTestTarget>;

impl TouchTestTarget {
    pub fn recognizer(&self) -> Option<&RecognizerHandle> {
        match self {
            TouchTestTarget::Recognizer(handle) => Some(handle),
            TouchTestTarget::Touch(_) => None,
        }
    }

    pub fn is_recognizer(&self) -> bool {
        matches!(self, TouchTestTarget::Recognizer(_))
    }

    pub fn attached_node(&self) -> Option<NodeId> {
        match self {
            TouchTestTarget::Recognizer(handle) => handle.borrow().core().attached_node(),
            TouchTestTarget::Touch(target) => Some(target.node),
        }
    }

    /// Key used for gesture procedures in the event tree
    pub fn dump_id(&self) -> u64 {
        match self {
            TouchTestTarget::Recognizer(handle) => handle.id().as_raw(),
            TouchTestTarget::Touch(target) => target.node.to_raw(),
        }
    }

    /// Forward pass for nested containers. Recognizers never stop it.
    pub fn dispatch_multi_container_event(&self, event: &TouchEvent) -> bool {
        match self {
            TouchTestTarget::Recognizer(_) => true,
            TouchTestTarget::Touch(target) => !target.dispatch_multi_container_event(event).is_stop(),
        }
    }

    /// Deliver a touch sample; false stops plain touch propagation.
    pub fn handle_multi_container_event(&self, event: &TouchEvent) -> bool {
        match self {
            TouchTestTarget::Recognizer(handle) => handle.borrow_mut().handle_event(event),
            TouchTestTarget::Touch(target) => !target.handle_event(event).is_stop(),
        }
    }

    /// Deliver an axis sample. Plain touch targets ignore axis input.
    pub fn handle_axis_event(&self, event: &AxisEvent) -> bool {
        match self {
            TouchTestTarget::Recognizer(handle) => handle.borrow_mut().handle_axis_event(event),
            TouchTestTarget::Touch(_) => true,
        }
    }

    pub fn set_sub_pipeline_global_offset(&self, offset: Offset, scale: f32) {
        match self {
            TouchTestTarget::Recognizer(handle) => {
                handle.borrow_mut().set_sub_pipeline_global_offset(offset, scale)
            }
            TouchTestTarget::Touch(target) => target.sub_pipeline.set(Some((offset, scale))),
        }
    }

    pub fn on_flush_touch_events_begin(&self) {
        if let TouchTestTarget::Recognizer(handle) = self {
            handle.borrow_mut().on_flush_touch_events_begin();
        }
    }

    pub fn on_flush_touch_events_end(&self) {
        if let TouchTestTarget::Recognizer(handle) = self {
            handle.borrow_mut().on_flush_touch_events_end();
        }
    }

    pub fn axis_direction(&self) -> Axis {
        match self {
            TouchTestTarget::Recognizer(handle) => handle.borrow().axis_direction(),
            TouchTestTarget::Touch(_) => Axis::None,
        }
    }

    /// Snapshots of this target, and of every child for groups
    pub fn dump(&self, depth: usize, out: &mut Vec<GestureSnapshot>) {
        match self {
            TouchTestTarget::Recognizer(handle) => handle.borrow().dump_tree(depth, out),
            TouchTestTarget::Touch(target) => out.push(
                GestureSnapshot::new(
                    RecognizerId::from_raw(target.node.to_raw()),
                    None,
                    Some(target.node),
                    "TouchEventActuator",
                    target.tag.clone(),
                )
                .with_depth(depth),
            ),
        }
    }
}

impl fmt::Debug for TouchTestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchTestTarget::Recognizer(handle) => write!(f, "{:?}", handle),
            TouchTestTarget::Touch(target) => write!(f, "Touch({})", target.tag),
        }
    }
}

// ============================================================================
// Mouse, hover and axis targets
// ============================================================================

/// A node's mouse callback
#[derive(Clone)]
pub struct MouseTarget {
    node: NodeId,
    origin: Point,
    callback: MouseCallback,
}

impl MouseTarget {
    pub fn new(node: NodeId, origin: Point, callback: MouseCallback) -> Self {
        Self { node, origin, callback }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn handle_mouse_event(&self, event: &MouseEvent) -> Propagation {
        let global = event.position();
        (self.callback)(&MouseEventInfo {
            node: self.node,
            button: event.button,
            action: event.action,
            global,
            local: Point::new(global.x - self.origin.x, global.y - self.origin.y),
            time: event.time,
        })
    }
}

impl PartialEq for MouseTarget {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

/// A node's hover callback
#[derive(Clone)]
pub struct HoverTarget {
    node: NodeId,
    callback: HoverCallback,
}

impl HoverTarget {
    pub fn new(node: NodeId, callback: HoverCallback) -> Self {
        Self { node, callback }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn handle_hover_event(&self, hovered: bool, event: &MouseEvent) -> Propagation {
        (self.callback)(hovered, event)
    }
}

impl PartialEq for HoverTarget {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

/// A node's accessibility hover callback
#[derive(Clone)]
pub struct AccessibilityHoverTarget {
    node: NodeId,
    callback: AccessibilityHoverCallback,
}

impl AccessibilityHoverTarget {
    pub fn new(node: NodeId, callback: AccessibilityHoverCallback) -> Self {
        Self { node, callback }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn handle_accessibility_hover_event(&self, hovered: bool, event: &TouchEvent) {
        (self.callback)(hovered, event)
    }
}

impl PartialEq for AccessibilityHoverTarget {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

/// A node's axis callback
#[derive(Clone)]
pub struct AxisTarget {
    node: NodeId,
    callback: AxisCallback,
}

impl AxisTarget {
    pub fn new(node: NodeId, callback: AxisCallback) -> Self {
        Self { node, callback }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// True once the node consumed the sample.
    pub fn handle_axis_event(&self, event: &AxisEvent) -> bool {
        (self.callback)(event).is_stop()
    }
}

/// Mouse and hover targets found by one mouse test
#[derive(Clone, Default)]
pub struct MouseTestResult {
    pub mouse: Vec<MouseTarget>,
    pub hover: Vec<HoverTarget>,
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use slotmap::SlotMap;

    use super::*;

    fn node_id() -> NodeId {
        let mut nodes: SlotMap<NodeId, ()> = SlotMap::with_key();
        nodes.insert(())
    }

    #[test]
    fn test_touch_target_local_coordinates() {
        let node = node_id();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let target = TouchEventTarget::new(
            node,
            "Button",
            Point::new(10.0, 20.0),
            Some(Rc::new(move |info: &TouchEventInfo| {
                seen_clone.borrow_mut().push(info.local);
                Propagation::Stop
            })),
            None,
        );
        let event = TouchEvent::new(0, TouchType::Down, 15.0, 25.0, Timestamp::ZERO);
        let entry = TouchTestTarget::Touch(Rc::new(target));

        assert!(!entry.handle_multi_container_event(&event));
        assert!(entry.dispatch_multi_container_event(&event));
        assert_eq!(*seen.borrow(), vec![Point::new(5.0, 5.0)]);
        assert_eq!(entry.attached_node(), Some(node));
    }

    #[test]
    fn test_sub_pipeline_offset_maps_global_point() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let entry = TouchTestTarget::Touch(Rc::new(TouchEventTarget::new(
            node_id(),
            "Embedded",
            Point::default(),
            Some(Rc::new(move |info: &TouchEventInfo| {
                seen_clone.borrow_mut().push(info.global);
                Propagation::Continue
            })),
            None,
        )));
        entry.set_sub_pipeline_global_offset(Offset::new(100.0, 50.0), 2.0);
        entry.handle_multi_container_event(&TouchEvent::new(0, TouchType::Move, 1.0, 1.0, Timestamp::ZERO));
        assert_eq!(*seen.borrow(), vec![Point::new(102.0, 52.0)]);
    }

    #[test]
    fn test_touch_target_without_callback_continues() {
        let entry = TouchTestTarget::Touch(Rc::new(TouchEventTarget::new(
            node_id(),
            "Stack",
            Point::default(),
            None,
            None,
        )));
        let event = TouchEvent::new(0, TouchType::Up, 0.0, 0.0, Timestamp::ZERO);
        assert!(entry.handle_multi_container_event(&event));
        assert!(!entry.is_recognizer());
        assert_eq!(entry.axis_direction(), Axis::None);
    }
}
