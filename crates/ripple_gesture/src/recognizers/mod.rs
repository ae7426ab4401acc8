//! Built-in recognizers
//!
//! - [`ClickRecognizer`] - single and multi-tap, multi-finger taps
//! - [`LongPressRecognizer`] - hold with optional repeat
//! - [`PinchRecognizer`] - two-or-more finger scale, ctrl+wheel and trackpad pinch
//! - [`PanRecognizer`] - directional drag and wheel scroll
//! - [`RecognizerGroup`] - exclusive, parallel and sequenced composition

mod click;
mod group;
mod long_press;
mod pan;
mod pinch;

pub use click::ClickRecognizer;
pub use group::{GroupMode, RecognizerGroup};
pub use long_press::LongPressRecognizer;
pub use pan::{PanDirection, PanRecognizer};
pub use pinch::PinchRecognizer;

use crate::multi_fingers::MultiFingersState;
use crate::recognizer::{FingerInfo, RecognizerCore};

/// Fingers of `state` in id order, mapped to host coordinates
pub(crate) fn finger_infos(core: &RecognizerCore, state: &MultiFingersState) -> Vec<FingerInfo> {
    let mut fingers: Vec<FingerInfo> = state
        .touch_points()
        .map(|p| FingerInfo {
            id: p.id,
            position: core.to_global(p.position()),
        })
        .collect();
    fingers.sort_by_key(|f| f.id);
    fingers
}

/// Cancel a pending timer, if any
pub(crate) fn cancel_timer(token: &mut Option<crate::timer::CancelToken>) {
    if let Some(token) = token.take() {
        token.cancel();
    }
}
