//! Ripple Event Manager
//!
//! Routes raw pointer input from the host window to the node tree:
//!
//! - **Hit testing**: `NodeTree` walks nodes front to back honouring each
//!   node's `HitTestMode`
//! - **Touch dispatch**: per-pointer candidate lists fed to recognizers and
//!   touch callbacks, with disposals resolved by the gesture referee
//! - **Mouse, hover and axis**: press chains, hover enter/exit diffs and
//!   wheel/trackpad pipelines
//! - **Diagnostics**: event tree dumps and throttled event logging
//!
//! # Example
//!
//! ```rust
//! use ripple_events::{EventManager, EventManagerConfig, NodeTree};
//! use ripple_gesture::{ClickRecognizer, GestureRecognizer, RecognizerHandle, RefereeState};
//! use ripple_input::{Rect, Timestamp, TouchEvent, TouchType};
//!
//! let mut manager = EventManager::new(EventManagerConfig::standard());
//! let mut tree = NodeTree::new();
//! let root = tree.create_node("Root", Rect::new(0.0, 0.0, 400.0, 400.0));
//! tree.set_root(root);
//!
//! let click = RecognizerHandle::new(ClickRecognizer::tap(manager.context()));
//! tree.add_recognizer(root, click.clone());
//!
//! let down = TouchEvent::new(0, TouchType::Down, 20.0, 20.0, Timestamp::ZERO);
//! let up = TouchEvent::new(0, TouchType::Up, 20.0, 20.0, Timestamp::from_millis(60));
//! manager.on_touch_event(&down, &tree, root);
//! manager.on_touch_event(&up, &tree, root);
//!
//! assert!(click.borrow().core().history().iter().any(|r| r.state == RefereeState::Succeed));
//! assert!(manager.referee().is_scopes_empty());
//! ```

pub mod config;
pub mod error;
pub mod event_tree;
pub mod manager;
pub mod response_ctrl;
pub mod scheduler;
pub mod target;
pub mod tree;

pub use config::{EventManagerConfig, API_VERSION_BUTTON_CHAINS, API_VERSION_HOVER_CURSOR};
pub use error::{ConfigError, Result};
pub use event_tree::{EventTree, EventTreeRecord, EventTreeType, GestureProcedure, TouchPointRecord, MAX_EVENT_TREES};
pub use manager::{EventManager, LogChannel, TouchTestOptions};
pub use response_ctrl::{MonopolizeState, ResponseCtrl};
pub use scheduler::{FrameCounter, FrameScheduler};
pub use target::{
    AccessibilityHoverCallback, AccessibilityHoverTarget, AxisCallback, AxisTarget, HoverCallback,
    HoverTarget, MouseCallback, MouseEventInfo, MouseTarget, MouseTestResult, MultiContainerCallback,
    Propagation, TouchCallback, TouchEventInfo, TouchEventTarget, TouchTestResult, TouchTestTarget,
};
pub use tree::{EventNode, HitNode, HitTestKind, HitTestMode, HitTestResult, NodeTree, TouchInterceptCallback};
