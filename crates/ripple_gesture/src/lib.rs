//! Ripple Gesture Arbitration
//!
//! This crate decides which gesture wins when several recognizers compete
//! for the same pointer:
//!
//! - **Recognizers**: per-gesture state machines (click, long press, pinch, pan)
//! - **Groups**: exclusive, parallel and sequenced composition of recognizers
//! - **Referee**: per-pointer gesture scopes resolving accept/reject requests
//! - **Timers**: cancelable deadlines drained on the UI task queue
//!
//! # Example
//!
//! ```rust
//! use ripple_gesture::{
//!     ClickRecognizer, GestureConfig, GestureContext, GestureRecognizer,
//!     GestureReferee, LongPressRecognizer, RecognizerHandle, RefereeState,
//! };
//! use ripple_input::{Timestamp, TouchEvent, TouchType};
//!
//! let ctx = GestureContext::new(GestureConfig::standard());
//! let click = RecognizerHandle::new(ClickRecognizer::tap(&ctx));
//! let press = RecognizerHandle::new(LongPressRecognizer::standard(&ctx));
//!
//! let mut referee = GestureReferee::new();
//! referee.add_gesture_to_scope(0, &[click.clone(), press.clone()]);
//!
//! let down = TouchEvent::new(0, TouchType::Down, 10.0, 10.0, Timestamp::ZERO);
//! let up = TouchEvent::new(0, TouchType::Up, 10.0, 10.0, Timestamp::from_millis(80));
//! for event in [&down, &up] {
//!     for handle in [&click, &press] {
//!         handle.borrow_mut().handle_event(event);
//!     }
//!     while let Some(d) = ctx.take_disposal() {
//!         let handle = if d.recognizer == click.id() { &click } else { &press };
//!         referee.adjudicate(handle, d.disposal);
//!     }
//! }
//! assert_eq!(click.state(), RefereeState::Succeed);
//! assert_eq!(press.state(), RefereeState::Fail);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod multi_fingers;
pub mod node;
pub mod recognizer;
pub mod recognizers;
pub mod referee;
pub mod scope;
pub mod snapshot;
pub mod state;
pub mod timer;

#[cfg(test)]
mod testing;

pub use config::{validate_fingers, GestureConfig, MAX_FINGERS};
pub use context::{Disposal, GestureContext};
pub use error::{GestureError, Result};
pub use multi_fingers::MultiFingersState;
pub use node::NodeId;
pub use recognizer::{
    emit, FingerInfo, GestureCallback, GestureCallbacks, GestureEvent, GestureJudge,
    GestureRecognizer, InputEventType, RecognizerCore, RecognizerHandle, RecognizerId,
    WeakRecognizerHandle,
};
pub use recognizers::{
    ClickRecognizer, GroupMode, LongPressRecognizer, PanDirection, PanRecognizer,
    PinchRecognizer, RecognizerGroup,
};
pub use referee::{GestureReferee, QueryStateFunc};
pub use scope::GestureScope;
pub use snapshot::{GestureSnapshot, StateHistory, StateRecord};
pub use state::{GestureDisposal, GestureJudgeResult, GesturePriority, RefereeState};
pub use timer::{CancelToken, TimerFire, TimerKind, TimerQueue};
