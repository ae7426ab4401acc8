//! Tap recognizer

use std::rc::Rc;
use std::time::Duration;

use ripple_input::{Point, Timestamp, TouchEvent};

use super::{cancel_timer, finger_infos};
use crate::config::validate_fingers;
use crate::context::GestureContext;
use crate::error::{GestureError, Result};
use crate::multi_fingers::MultiFingersState;
use crate::recognizer::{emit, GestureEvent, GestureRecognizer, RecognizerCore};
use crate::state::{GestureDisposal, GestureJudgeResult, GesturePriority, RefereeState};
use crate::timer::{CancelToken, TimerKind};

/// Recognizes `count` taps of `fingers` fingers.
///
/// All fingers must be down within the multi-finger timeout and each tap
/// must follow the previous one within the multi-tap timeout, landing no
/// farther than the multi-tap slop from the first tap.
pub struct ClickRecognizer {
    core: RecognizerCore,
    fingers: MultiFingersState,
    count: u32,
    distance_threshold: f32,
    tapped_count: u32,
    equals_to_fingers: bool,
    first_tap: Option<Point>,
    last_position: Point,
    last_time: Timestamp,
    finger_deadline: Option<CancelToken>,
    tap_deadline: Option<CancelToken>,
}

impl ClickRecognizer {
    pub fn new(ctx: &Rc<GestureContext>, fingers: usize, count: u32) -> Result<Self> {
        let fingers = validate_fingers(fingers)?;
        if count == 0 {
            return Err(GestureError::InvalidCount(count));
        }
        Ok(Self {
            core: RecognizerCore::new(ctx),
            fingers: MultiFingersState::new(fingers),
            count,
            distance_threshold: f32::INFINITY,
            tapped_count: 0,
            equals_to_fingers: false,
            first_tap: None,
            last_position: Point::default(),
            last_time: Timestamp::ZERO,
            finger_deadline: None,
            tap_deadline: None,
        })
    }

    /// Single-finger single tap
    pub fn tap(ctx: &Rc<GestureContext>) -> Self {
        Self {
            core: RecognizerCore::new(ctx),
            fingers: MultiFingersState::new(1),
            count: 1,
            distance_threshold: f32::INFINITY,
            tapped_count: 0,
            equals_to_fingers: false,
            first_tap: None,
            last_position: Point::default(),
            last_time: Timestamp::ZERO,
            finger_deadline: None,
            tap_deadline: None,
        }
    }

    /// Movement from the DOWN point that cancels the tap.
    pub fn with_distance_threshold(mut self, distance: f32) -> Result<Self> {
        if distance <= 0.0 {
            return Err(GestureError::InvalidDistance("distance_threshold", distance));
        }
        self.distance_threshold = distance;
        Ok(self)
    }

    pub fn with_priority(mut self, priority: GesturePriority) -> Self {
        self.core.set_priority(priority);
        self
    }

    pub fn on_action(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.core.callbacks_mut().on_action = Some(Rc::new(f));
        self
    }

    pub fn with_judge(mut self, f: impl Fn(&GestureEvent) -> GestureJudgeResult + 'static) -> Self {
        self.core.set_judge(Some(Rc::new(f)));
        self
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn tapped_count(&self) -> u32 {
        self.tapped_count
    }

    fn info(&self) -> GestureEvent {
        let mut info = self.core.gesture_event(self.last_time);
        info.fingers = finger_infos(&self.core, &self.fingers);
        info.location = self.core.to_global(self.last_position);
        info.count = self.tapped_count;
        info
    }

    fn start_finger_deadline(&mut self, now: Timestamp) {
        cancel_timer(&mut self.finger_deadline);
        let timeout = Duration::from_millis(self.core.config().multi_finger_timeout_ms);
        self.finger_deadline = Some(self.core.schedule(TimerKind::FingerDeadline, now + timeout));
    }

    fn start_tap_deadline(&mut self, now: Timestamp) {
        cancel_timer(&mut self.tap_deadline);
        let timeout = Duration::from_millis(self.core.config().multi_tap_timeout_ms);
        self.tap_deadline = Some(self.core.schedule(TimerKind::TapDeadline, now + timeout));
    }

    fn cancel_timers(&mut self) {
        cancel_timer(&mut self.finger_deadline);
        cancel_timer(&mut self.tap_deadline);
    }

    fn fail(&mut self) {
        self.cancel_timers();
        self.core.adjudicate(GestureDisposal::Reject);
    }
}

impl GestureRecognizer for ClickRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "Click"
    }

    fn handle_touch_down(&mut self, event: &TouchEvent) {
        if self.core.state().is_terminal() {
            return;
        }
        let position = event.position();
        if self.tapped_count > 0 {
            let slop = self.core.config().multi_tap_slop;
            if self.first_tap.is_some_and(|first| position.distance_to(first) > slop) {
                tracing::debug!(recognizer = self.core.id().as_raw(), "tap outside multi-tap slop");
                self.fail();
                return;
            }
        }
        cancel_timer(&mut self.tap_deadline);
        self.fingers.add_finger(event);
        self.last_position = position;
        self.last_time = event.time;

        let current = self.fingers.current_fingers();
        let required = self.fingers.fingers();
        if current < required {
            self.start_finger_deadline(event.time);
        } else if current == required {
            cancel_timer(&mut self.finger_deadline);
            self.equals_to_fingers = true;
            if self.core.state() == RefereeState::Ready {
                self.core.set_state(RefereeState::Detecting);
            }
        } else {
            tracing::debug!(recognizer = self.core.id().as_raw(), current, required, "too many fingers");
            self.fail();
        }
    }

    fn handle_touch_move(&mut self, event: &TouchEvent) {
        if self.core.state().is_terminal() {
            return;
        }
        self.fingers.update_point(event);
        if self.fingers.max_travel() > self.distance_threshold {
            tracing::debug!(recognizer = self.core.id().as_raw(), "tap moved too far");
            self.fail();
        }
    }

    fn handle_touch_up(&mut self, event: &TouchEvent) {
        if self.core.state().is_terminal() {
            return;
        }
        self.fingers.release_finger(event);
        self.last_position = event.position();
        self.last_time = event.time;

        if self.fingers.max_travel() > self.distance_threshold {
            self.fail();
            return;
        }

        if self.equals_to_fingers && self.fingers.current_fingers() == 0 {
            self.tapped_count += 1;
            self.first_tap.get_or_insert(event.position());
            if self.tapped_count == self.count {
                self.cancel_timers();
                if self.core.judge(&self.info()) == GestureJudgeResult::Reject {
                    self.core.adjudicate(GestureDisposal::Reject);
                    return;
                }
                self.core.adjudicate(GestureDisposal::Accept);
                return;
            }
            self.equals_to_fingers = false;
            self.start_tap_deadline(event.time);
        }

        if !matches!(self.core.state(), RefereeState::Pending | RefereeState::Fail) {
            self.core.adjudicate(GestureDisposal::Pending);
        }

        if self.fingers.current_fingers() > 0 && self.equals_to_fingers {
            self.start_finger_deadline(event.time);
        }
    }

    fn handle_touch_cancel(&mut self, _event: &TouchEvent) {
        if self.core.state().is_terminal() {
            return;
        }
        self.fail();
    }

    fn on_timer(&mut self, kind: TimerKind, _now: Timestamp) {
        match kind {
            TimerKind::FingerDeadline => {
                self.finger_deadline = None;
                if self.fingers.current_fingers() < self.fingers.fingers() || self.equals_to_fingers {
                    tracing::debug!(recognizer = self.core.id().as_raw(), "fingers did not arrive in time");
                    self.fail();
                }
            }
            TimerKind::TapDeadline => {
                self.tap_deadline = None;
                if self.tapped_count < self.count {
                    tracing::debug!(recognizer = self.core.id().as_raw(), tapped = self.tapped_count, "next tap did not arrive");
                    self.fail();
                }
            }
            _ => {}
        }
    }

    fn on_accepted(&mut self) {
        self.cancel_timers();
        let info = self.info();
        emit(&self.core.callbacks().on_action, &info);
    }

    fn on_rejected(&mut self) {
        self.cancel_timers();
    }

    fn on_reset(&mut self) {
        self.cancel_timers();
        self.tapped_count = 0;
        self.equals_to_fingers = false;
        self.first_tap = None;
    }

    fn multi_fingers(&self) -> Option<&MultiFingersState> {
        Some(&self.fingers)
    }

    fn multi_fingers_mut(&mut self) -> Option<&mut MultiFingersState> {
        Some(&mut self.fingers)
    }

    fn custom_info(&self) -> String {
        format!(
            "fingers: {}, count: {}, tapped: {}",
            self.fingers.fingers(),
            self.count,
            self.tapped_count
        )
    }
}
