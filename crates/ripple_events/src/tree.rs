//! Node registry and hit testing
//!
//! Nodes live in a slotmap keyed by [`NodeId`]. Frames are relative to the
//! parent node, and children are hit-tested topmost (last added) first. What
//! a node contributes to a hit and whether the hit reaches siblings and
//! ancestors is controlled by its [`HitTestMode`].

use slotmap::SlotMap;

use ripple_gesture::{NodeId, RecognizerHandle};
use ripple_input::{Point, Rect, TouchEvent};

use crate::target::{
    AccessibilityHoverCallback, AxisCallback, HoverCallback, MouseCallback, MultiContainerCallback,
    TouchCallback,
};

/// How a node takes part in hit testing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitTestMode {
    /// Hit self and children; siblings behind are not tested
    #[default]
    Default,
    /// Hit self only; children, siblings and ancestors are blocked
    Block,
    /// Hit self and children; siblings behind are still tested
    Transparent,
    /// Children only; siblings behind are still tested
    None,
    /// Hit self and children; siblings and ancestors are blocked
    BlockHierarchy,
    /// Neither self nor descendants respond
    BlockDescendants,
    /// Siblings behind are tested unless a child was hit
    TransparentSelf,
}

impl HitTestMode {
    /// A hit in a node with this mode ends the sibling walk.
    fn blocks_siblings(self) -> bool {
        matches!(
            self,
            HitTestMode::Default
                | HitTestMode::Block
                | HitTestMode::TransparentSelf
                | HitTestMode::BlockHierarchy
        )
    }
}

/// Outcome of hit testing one subtree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTestResult {
    OutOfRegion,
    Bubbling,
    StopBubbling,
    SelfTransparent,
}

/// Which pipeline asked for the hit test
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitTestKind {
    #[default]
    Touch,
    Mouse,
    AccessibilityHover,
    Axis,
}

/// A node hit by a test, with its origin in window coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitNode {
    pub node: NodeId,
    pub origin: Point,
}

pub type TouchInterceptCallback = std::rc::Rc<dyn Fn(&TouchEvent) -> HitTestMode>;

/// One node in the registry
pub struct EventNode {
    pub tag: String,
    /// Relative to the parent's frame
    pub frame: Rect,
    pub hit_test_mode: HitTestMode,
    pub enabled: bool,
    /// First responder for a pointer keeps all later touch events
    pub monopolize_events: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    recognizers: Vec<RecognizerHandle>,
    pub on_touch: Option<TouchCallback>,
    pub on_multi_container: Option<MultiContainerCallback>,
    pub on_touch_intercept: Option<TouchInterceptCallback>,
    pub on_mouse: Option<MouseCallback>,
    pub on_hover: Option<HoverCallback>,
    pub on_accessibility_hover: Option<AccessibilityHoverCallback>,
    pub on_axis: Option<AxisCallback>,
}

impl EventNode {
    fn new(tag: String, frame: Rect) -> Self {
        Self {
            tag,
            frame,
            hit_test_mode: HitTestMode::Default,
            enabled: true,
            monopolize_events: false,
            parent: None,
            children: Vec::new(),
            recognizers: Vec::new(),
            on_touch: None,
            on_multi_container: None,
            on_touch_intercept: None,
            on_mouse: None,
            on_hover: None,
            on_accessibility_hover: None,
            on_axis: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn recognizers(&self) -> &[RecognizerHandle] {
        &self.recognizers
    }
}

/// Scratch state shared by one hit test walk
struct HitContext<'a> {
    kind: HitTestKind,
    event: Option<&'a TouchEvent>,
}

/// Registry of event nodes
#[derive(Default)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, EventNode>,
    root: Option<NodeId>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node
    pub fn create_node(&mut self, tag: impl Into<String>, frame: Rect) -> NodeId {
        self.nodes.insert(EventNode::new(tag.into(), frame))
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Append `child` as the topmost child of `parent`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
    }

    /// Remove a node and its subtree
    pub fn remove_node(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&EventNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut EventNode> {
        self.nodes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.tag.as_str())
    }

    pub fn set_hit_test_mode(&mut self, id: NodeId, mode: HitTestMode) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.hit_test_mode = mode;
        }
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.enabled = enabled;
        }
    }

    pub fn set_monopolize_events(&mut self, id: NodeId, monopolize: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.monopolize_events = monopolize;
        }
    }

    /// Attach a recognizer to a node
    pub fn add_recognizer(&mut self, id: NodeId, recognizer: RecognizerHandle) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        recognizer.borrow_mut().set_attached_node(Some(id));
        node.recognizers.push(recognizer);
    }

    pub fn clear_recognizers(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.recognizers.clear();
        }
    }

    pub fn recognizers(&self, id: NodeId) -> &[RecognizerHandle] {
        self.nodes.get(id).map(|n| n.recognizers.as_slice()).unwrap_or(&[])
    }

    pub fn set_on_touch(&mut self, id: NodeId, callback: TouchCallback) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_touch = Some(callback);
        }
    }

    pub fn set_on_multi_container(&mut self, id: NodeId, callback: MultiContainerCallback) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_multi_container = Some(callback);
        }
    }

    pub fn set_on_touch_intercept(&mut self, id: NodeId, callback: TouchInterceptCallback) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_touch_intercept = Some(callback);
        }
    }

    pub fn set_on_mouse(&mut self, id: NodeId, callback: MouseCallback) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_mouse = Some(callback);
        }
    }

    pub fn set_on_hover(&mut self, id: NodeId, callback: HoverCallback) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_hover = Some(callback);
        }
    }

    pub fn set_on_accessibility_hover(&mut self, id: NodeId, callback: AccessibilityHoverCallback) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_accessibility_hover = Some(callback);
        }
    }

    pub fn set_on_axis(&mut self, id: NodeId, callback: AxisCallback) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.on_axis = Some(callback);
        }
    }

    /// Window position of a node's top-left corner
    pub fn absolute_origin(&self, id: NodeId) -> Option<Point> {
        let mut node = self.nodes.get(id)?;
        let mut origin = node.frame.origin();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            origin = Point::new(origin.x + node.frame.x, origin.y + node.frame.y);
        }
        Some(origin)
    }

    // ========================================================================
    // Hit Testing
    // ========================================================================

    /// Collect the nodes under `point`, deepest first.
    ///
    /// `point` is in the coordinates of `root`'s parent (window coordinates
    /// for a tree root).
    pub fn hit_test(
        &self,
        root: NodeId,
        point: Point,
        kind: HitTestKind,
        event: Option<&TouchEvent>,
    ) -> Vec<HitNode> {
        let ctx = HitContext { kind, event };
        let mut out = Vec::new();
        self.hit_test_node(root, point, Point::default(), &ctx, &mut out);
        out
    }

    fn effective_mode(&self, node: &EventNode, ctx: &HitContext<'_>) -> HitTestMode {
        if ctx.kind != HitTestKind::Mouse {
            if let (Some(intercept), Some(event)) = (&node.on_touch_intercept, ctx.event) {
                return intercept(event);
            }
        }
        node.hit_test_mode
    }

    fn hit_test_node(
        &self,
        id: NodeId,
        point: Point,
        parent_origin: Point,
        ctx: &HitContext<'_>,
        out: &mut Vec<HitNode>,
    ) -> (HitTestResult, HitTestMode) {
        let Some(node) = self.nodes.get(id) else {
            return (HitTestResult::OutOfRegion, HitTestMode::None);
        };
        let mode = self.effective_mode(node, ctx);
        if !node.enabled || mode == HitTestMode::BlockDescendants || !node.frame.contains(point) {
            return (HitTestResult::OutOfRegion, mode);
        }

        let local = Point::new(point.x - node.frame.x, point.y - node.frame.y);
        let origin = Point::new(parent_origin.x + node.frame.x, parent_origin.y + node.frame.y);
        let mut coming = Vec::new();
        let mut consumed = false;
        let mut prevent = false;
        let mut result = HitTestResult::OutOfRegion;

        if mode != HitTestMode::Block {
            for &child in node.children.iter().rev() {
                let (child_result, child_mode) = self.hit_test_node(child, local, origin, ctx, &mut coming);
                match child_result {
                    HitTestResult::StopBubbling => {
                        prevent = true;
                        consumed = true;
                        if child_mode.blocks_siblings() {
                            break;
                        }
                    }
                    HitTestResult::Bubbling if child_mode.blocks_siblings() => {
                        consumed = true;
                        break;
                    }
                    _ => {}
                }
            }
        }

        if consumed {
            result = if prevent {
                HitTestResult::StopBubbling
            } else {
                HitTestResult::Bubbling
            };
            consumed = false;
        } else if mode == HitTestMode::Block {
            result = HitTestResult::StopBubbling;
        }

        if !prevent && mode != HitTestMode::None {
            coming.push(HitNode { node: id, origin });
            consumed = true;
            if mode == HitTestMode::BlockHierarchy {
                prevent = true;
            }
        }
        out.extend(coming);

        if !consumed {
            return (result, mode);
        }
        let result = match result {
            HitTestResult::OutOfRegion if prevent => HitTestResult::StopBubbling,
            HitTestResult::OutOfRegion if mode == HitTestMode::TransparentSelf => {
                HitTestResult::SelfTransparent
            }
            HitTestResult::OutOfRegion => HitTestResult::Bubbling,
            _ if mode == HitTestMode::BlockHierarchy => HitTestResult::StopBubbling,
            other => other,
        };
        (result, mode)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    struct Fixture {
        tree: NodeTree,
        root: NodeId,
        a: NodeId,
        b: NodeId,
        c: NodeId,
    }

    /// root(400x400) > [a(200x200), b(100x100) > c(50x50)]; b sits above a
    fn fixture() -> Fixture {
        let mut tree = NodeTree::new();
        let root = tree.create_node("Root", Rect::new(0.0, 0.0, 400.0, 400.0));
        let a = tree.create_node("A", Rect::new(0.0, 0.0, 200.0, 200.0));
        let b = tree.create_node("B", Rect::new(0.0, 0.0, 100.0, 100.0));
        let c = tree.create_node("C", Rect::new(0.0, 0.0, 50.0, 50.0));
        tree.set_root(root);
        tree.add_child(root, a);
        tree.add_child(root, b);
        tree.add_child(b, c);
        Fixture { tree, root, a, b, c }
    }

    fn hits(f: &Fixture, x: f32, y: f32) -> Vec<NodeId> {
        f.tree
            .hit_test(f.root, Point::new(x, y), HitTestKind::Touch, None)
            .into_iter()
            .map(|h| h.node)
            .collect()
    }

    #[test]
    fn test_default_stops_at_topmost_sibling() {
        let f = fixture();
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.c, f.b, f.root]);
        assert_eq!(hits(&f, 70.0, 70.0), vec![f.b, f.root]);
        assert_eq!(hits(&f, 150.0, 150.0), vec![f.a, f.root]);
        assert_eq!(hits(&f, 300.0, 300.0), vec![f.root]);
        assert!(hits(&f, 500.0, 10.0).is_empty());
    }

    #[test]
    fn test_transparent_lets_siblings_through() {
        let mut f = fixture();
        f.tree.set_hit_test_mode(f.b, HitTestMode::Transparent);
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.c, f.b, f.a, f.root]);
    }

    #[test]
    fn test_transparent_self_blocks_when_child_hit() {
        let mut f = fixture();
        f.tree.set_hit_test_mode(f.b, HitTestMode::TransparentSelf);
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.c, f.b, f.root]);
        assert_eq!(hits(&f, 70.0, 70.0), vec![f.b, f.a, f.root]);
    }

    #[test]
    fn test_block_hides_children_and_ancestors() {
        let mut f = fixture();
        f.tree.set_hit_test_mode(f.b, HitTestMode::Block);
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.b]);
    }

    #[test]
    fn test_block_hierarchy_keeps_children() {
        let mut f = fixture();
        f.tree.set_hit_test_mode(f.b, HitTestMode::BlockHierarchy);
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.c, f.b]);
    }

    #[test]
    fn test_none_skips_self() {
        let mut f = fixture();
        f.tree.set_hit_test_mode(f.b, HitTestMode::None);
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.c, f.a, f.root]);
        assert_eq!(hits(&f, 70.0, 70.0), vec![f.a, f.root]);
    }

    #[test]
    fn test_block_descendants_and_disabled() {
        let mut f = fixture();
        f.tree.set_hit_test_mode(f.b, HitTestMode::BlockDescendants);
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.a, f.root]);

        let mut f = fixture();
        f.tree.set_enabled(f.b, false);
        assert_eq!(hits(&f, 10.0, 10.0), vec![f.a, f.root]);
    }

    #[test]
    fn test_touch_intercept_overrides_mode() {
        let mut f = fixture();
        f.tree
            .set_on_touch_intercept(f.b, Rc::new(|_: &TouchEvent| HitTestMode::Block));
        let event = TouchEvent::default();
        let touch: Vec<NodeId> = f
            .tree
            .hit_test(f.root, Point::new(10.0, 10.0), HitTestKind::Touch, Some(&event))
            .into_iter()
            .map(|h| h.node)
            .collect();
        assert_eq!(touch, vec![f.b]);

        let mouse: Vec<NodeId> = f
            .tree
            .hit_test(f.root, Point::new(10.0, 10.0), HitTestKind::Mouse, Some(&event))
            .into_iter()
            .map(|h| h.node)
            .collect();
        assert_eq!(mouse, vec![f.c, f.b, f.root]);
    }

    #[test]
    fn test_origins_are_absolute() {
        let mut tree = NodeTree::new();
        let root = tree.create_node("Root", Rect::new(0.0, 0.0, 400.0, 400.0));
        let child = tree.create_node("Child", Rect::new(50.0, 60.0, 100.0, 100.0));
        tree.add_child(root, child);
        let hits = tree.hit_test(root, Point::new(60.0, 70.0), HitTestKind::Touch, None);
        assert_eq!(hits[0].origin, Point::new(50.0, 60.0));
        assert_eq!(tree.absolute_origin(child), Some(Point::new(50.0, 60.0)));
    }

    #[test]
    fn test_remove_node_drops_subtree() {
        let mut f = fixture();
        f.tree.remove_node(f.b);
        assert!(!f.tree.contains(f.c));
        assert_eq!(f.tree.get(f.root).map(|n| n.children().len()), Some(1));
    }
}
