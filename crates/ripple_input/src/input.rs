//! Input event types for touch, axis and mouse pointers

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::Point;
use crate::time::Timestamp;

/// Device class an event came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    #[default]
    None,
    Mouse,
    Touch,
    TouchPad,
    Keyboard,
    Joystick,
}

/// Physical tool that produced the event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTool {
    #[default]
    Unknown,
    Finger,
    Pen,
    Rubber,
    Brush,
    Pencil,
    AirBrush,
    Mouse,
    Lens,
    Touchpad,
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS, Windows key on Windows)
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }

    /// Check if only ctrl is held
    pub fn ctrl_only(&self) -> bool {
        !self.shift && self.ctrl && !self.alt && !self.meta
    }
}

// ============================================================================
// Touch Events
// ============================================================================

/// Phase of a touch sample
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchType {
    Down,
    Up,
    Move,
    Cancel,
    PullDown,
    PullMove,
    PullUp,
    PullInWindow,
    PullOutWindow,
    HoverEnter,
    HoverMove,
    HoverExit,
    HoverCancel,
    #[default]
    Unknown,
}

impl TouchType {
    /// Upper-case name used in dumps and logs
    pub fn name(&self) -> &'static str {
        match self {
            TouchType::Down => "DOWN",
            TouchType::Up => "UP",
            TouchType::Move => "MOVE",
            TouchType::Cancel => "CANCEL",
            TouchType::PullDown => "PULL_DOWN",
            TouchType::PullMove => "PULL_MOVE",
            TouchType::PullUp => "PULL_UP",
            TouchType::PullInWindow => "PULL_IN_WINDOW",
            TouchType::PullOutWindow => "PULL_OUT_WINDOW",
            TouchType::HoverEnter => "HOVER_ENTER",
            TouchType::HoverMove => "HOVER_MOVE",
            TouchType::HoverExit => "HOVER_EXIT",
            TouchType::HoverCancel => "HOVER_CANCEL",
            TouchType::Unknown => "UNKNOWN",
        }
    }

    /// DOWN, UP and CANCEL bound a gesture; everything else happens inside one.
    pub fn is_boundary(&self) -> bool {
        matches!(self, TouchType::Down | TouchType::Up | TouchType::Cancel)
    }
}

/// One finger's position inside a multi-touch sample
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub screen_x: f32,
    pub screen_y: f32,
    pub down_time: Timestamp,
    pub is_pressed: bool,
    pub original_id: i32,
}

/// A point-in-time touch sample for one finger
///
/// Events created by the core itself rather than by hardware are marked
/// `is_falsified` (synthesized cancels) or `is_interpolated` (resampled moves).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub id: i32,
    pub original_id: i32,
    pub x: f32,
    pub y: f32,
    pub screen_x: f32,
    pub screen_y: f32,
    pub kind: TouchType,
    pub pull_type: TouchType,
    pub time: Timestamp,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
    pub touch_event_id: i32,
    pub pointers: SmallVec<[TouchPoint; 4]>,
    pub history: Vec<TouchEvent>,
    pub is_falsified: bool,
    pub is_interpolated: bool,
}

impl TouchEvent {
    /// Create a finger sample at window position `(x, y)`
    pub fn new(id: i32, kind: TouchType, x: f32, y: f32, time: Timestamp) -> Self {
        Self {
            id,
            original_id: id,
            x,
            y,
            screen_x: x,
            screen_y: y,
            kind,
            pull_type: TouchType::Unknown,
            time,
            source_type: SourceType::Touch,
            source_tool: SourceTool::Finger,
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: TouchType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_pull_type(mut self, pull_type: TouchType) -> Self {
        self.pull_type = pull_type;
        self
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn with_source_tool(mut self, source_tool: SourceTool) -> Self {
        self.source_tool = source_tool;
        self
    }

    pub fn with_original_id(mut self, original_id: i32) -> Self {
        self.original_id = original_id;
        self
    }

    pub fn with_touch_event_id(mut self, touch_event_id: i32) -> Self {
        self.touch_event_id = touch_event_id;
        self
    }

    pub fn with_screen_position(mut self, screen_x: f32, screen_y: f32) -> Self {
        self.screen_x = screen_x;
        self.screen_y = screen_y;
        self
    }

    pub fn with_history(mut self, history: Vec<TouchEvent>) -> Self {
        self.history = history;
        self
    }

    pub fn with_pointers(mut self, pointers: impl IntoIterator<Item = TouchPoint>) -> Self {
        self.pointers = pointers.into_iter().collect();
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Touch point describing this sample's own finger
    pub fn to_touch_point(&self) -> TouchPoint {
        TouchPoint {
            id: self.id,
            x: self.x,
            y: self.y,
            screen_x: self.screen_x,
            screen_y: self.screen_y,
            down_time: self.time,
            is_pressed: self.kind == TouchType::Down,
            original_id: self.original_id,
        }
    }
}

// ============================================================================
// Axis Events
// ============================================================================

/// Phase of a wheel/trackpad axis sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisAction {
    #[default]
    None,
    Begin,
    Update,
    End,
    Cancel,
}

/// Scroll direction a recognizer cares about
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    None,
    Horizontal,
    Vertical,
    Free,
}

/// Wheel, trackpad or crown sample
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisEvent {
    pub id: i32,
    pub original_id: i32,
    pub x: f32,
    pub y: f32,
    pub screen_x: f32,
    pub screen_y: f32,
    pub horizontal_axis: f32,
    pub vertical_axis: f32,
    pub pinch_axis_scale: f32,
    pub action: AxisAction,
    pub time: Timestamp,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
    pub modifiers: Modifiers,
    pub touch_event_id: i32,
    pub is_rotation_event: bool,
}

impl AxisEvent {
    pub fn new(id: i32, action: AxisAction, x: f32, y: f32, time: Timestamp) -> Self {
        Self {
            id,
            original_id: id,
            x,
            y,
            screen_x: x,
            screen_y: y,
            action,
            time,
            source_type: SourceType::Mouse,
            source_tool: SourceTool::Mouse,
            ..Default::default()
        }
    }

    pub fn with_axes(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_axis = horizontal;
        self.vertical_axis = vertical;
        self
    }

    pub fn with_pinch_scale(mut self, scale: f32) -> Self {
        self.pinch_axis_scale = scale;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_source(mut self, source_type: SourceType, source_tool: SourceTool) -> Self {
        self.source_type = source_type;
        self.source_tool = source_tool;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Dominant scroll axis of this sample
    pub fn direction(&self) -> Axis {
        let h = self.horizontal_axis != 0.0;
        let v = self.vertical_axis != 0.0;
        match (h, v) {
            (true, true) => Axis::Free,
            (true, false) => Axis::Horizontal,
            (false, true) => Axis::Vertical,
            (false, false) => Axis::None,
        }
    }

    /// True when no axis moved and no pinch scale is reported
    pub fn is_empty(&self) -> bool {
        self.horizontal_axis == 0.0 && self.vertical_axis == 0.0 && self.pinch_axis_scale == 0.0
    }
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    None,
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Back button (side button)
    Back,
    /// Forward button (side button)
    Forward,
}

/// What the mouse did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseAction {
    #[default]
    None,
    Press,
    Release,
    Move,
    WindowEnter,
    WindowLeave,
    Hover,
    HoverEnter,
    HoverMove,
    HoverExit,
    PullDown,
    PullMove,
    PullUp,
    Cancel,
}

/// Mouse sample
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub screen_x: f32,
    pub screen_y: f32,
    pub button: MouseButton,
    pub action: MouseAction,
    pub pull_action: MouseAction,
    pub pressed_buttons: u32,
    pub time: Timestamp,
    pub source_type: SourceType,
    pub source_tool: SourceTool,
    pub touch_event_id: i32,
}

/// Mouse pointer ids are offset so they never collide with finger ids.
pub const MOUSE_BASE_ID: i32 = 1000;

impl MouseEvent {
    pub fn new(action: MouseAction, button: MouseButton, x: f32, y: f32, time: Timestamp) -> Self {
        Self {
            x,
            y,
            screen_x: x,
            screen_y: y,
            button,
            action,
            time,
            source_type: SourceType::Mouse,
            source_tool: SourceTool::Mouse,
            ..Default::default()
        }
    }

    pub fn with_pull_action(mut self, pull_action: MouseAction) -> Self {
        self.pull_action = pull_action;
        self
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Pointer id used to key mouse-test results
    pub fn pointer_id(&self) -> i32 {
        self.id + MOUSE_BASE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_event_builder() {
        let event = TouchEvent::new(3, TouchType::Down, 10.0, 20.0, Timestamp::from_millis(5))
            .with_original_id(7)
            .with_source_tool(SourceTool::Pen);
        assert_eq!(event.id, 3);
        assert_eq!(event.original_id, 7);
        assert_eq!(event.source_tool, SourceTool::Pen);
        assert_eq!(event.position(), Point::new(10.0, 20.0));
        assert!(!event.is_falsified);
        assert!(event.to_touch_point().is_pressed);
    }

    #[test]
    fn test_axis_direction() {
        let t = Timestamp::ZERO;
        let base = AxisEvent::new(0, AxisAction::Update, 0.0, 0.0, t);
        assert_eq!(base.clone().with_axes(0.0, 3.0).direction(), Axis::Vertical);
        assert_eq!(base.clone().with_axes(2.0, 0.0).direction(), Axis::Horizontal);
        assert_eq!(base.clone().with_axes(2.0, 3.0).direction(), Axis::Free);
        assert!(base.is_empty());
    }

    #[test]
    fn test_mouse_pointer_id_offset() {
        let event = MouseEvent::new(MouseAction::Move, MouseButton::None, 0.0, 0.0, Timestamp::ZERO);
        assert_eq!(event.pointer_id(), MOUSE_BASE_ID);
    }

    #[test]
    fn test_touch_type_names() {
        assert_eq!(TouchType::HoverCancel.name(), "HOVER_CANCEL");
        assert!(TouchType::Cancel.is_boundary());
        assert!(!TouchType::Move.is_boundary());
    }
}
