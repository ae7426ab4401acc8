//! Ripple input model
//!
//! Point-in-time pointer samples consumed by the gesture core:
//!
//! - [`TouchEvent`] - finger, stylus and synthesized touch samples
//! - [`AxisEvent`] - wheel, trackpad and crown samples
//! - [`MouseEvent`] - mouse button, move and window enter/leave samples
//! - [`Resampler`] - reconstructs a sample at a frame's target time
//!
//! Platform adapters build these from native callbacks; everything downstream
//! works purely on the types in this crate and the [`Timestamp`] event clock.

mod geometry;
mod input;
pub mod resample;
mod time;

pub use geometry::{Offset, Point, Rect};
pub use input::{
    Axis, AxisAction, AxisEvent, Modifiers, MouseAction, MouseButton, MouseEvent, SourceTool,
    SourceType, TouchEvent, TouchPoint, TouchType, MOUSE_BASE_ID,
};
pub use resample::{ResamplePoint, Resampler};
pub use time::Timestamp;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::geometry::{Offset, Point, Rect};
    pub use crate::input::{
        Axis, AxisAction, AxisEvent, Modifiers, MouseAction, MouseButton, MouseEvent, SourceTool,
        SourceType, TouchEvent, TouchPoint, TouchType,
    };
    pub use crate::time::Timestamp;
}
