//! Pinch recognizer

use std::rc::Rc;

use ripple_input::{AxisEvent, Point, Timestamp, TouchEvent};

use super::finger_infos;
use crate::config::validate_fingers;
use crate::context::GestureContext;
use crate::error::{GestureError, Result};
use crate::multi_fingers::MultiFingersState;
use crate::recognizer::{
    emit, GestureCallback, GestureCallbacks, GestureEvent, GestureRecognizer, RecognizerCore,
};
use crate::state::{GestureDisposal, GestureJudgeResult, GesturePriority, RefereeState};

/// Recognizes fingers spreading apart or closing in.
///
/// Touch input compares the mean distance of the fingers from their
/// centroid against the value when the last required finger went down.
/// Axis input uses the trackpad pinch scale when reported, otherwise
/// ctrl+wheel ticks step the scale by a fixed amount.
pub struct PinchRecognizer {
    core: RecognizerCore,
    fingers: MultiFingersState,
    distance: f32,
    initial_dev: f32,
    current_dev: f32,
    scale: f32,
    pinch_center: Point,
    last_time: Timestamp,
}

impl PinchRecognizer {
    pub fn new(ctx: &Rc<GestureContext>, fingers: usize, distance: f32) -> Result<Self> {
        let fingers = validate_fingers(fingers)?;
        if fingers < 2 {
            return Err(GestureError::InvalidFingers(fingers));
        }
        if distance <= 0.0 {
            return Err(GestureError::InvalidDistance("distance", distance));
        }
        Ok(Self::build(ctx, fingers, distance))
    }

    /// Two fingers, default distance from the context
    pub fn standard(ctx: &Rc<GestureContext>) -> Self {
        let distance = ctx.config().pinch_distance_px();
        Self::build(ctx, 2, distance)
    }

    fn build(ctx: &Rc<GestureContext>, fingers: usize, distance: f32) -> Self {
        Self {
            core: RecognizerCore::new(ctx),
            fingers: MultiFingersState::new(fingers),
            distance,
            initial_dev: 0.0,
            current_dev: 0.0,
            scale: 1.0,
            pinch_center: Point::default(),
            last_time: Timestamp::ZERO,
        }
    }

    pub fn with_priority(mut self, priority: GesturePriority) -> Self {
        self.core.set_priority(priority);
        self
    }

    pub fn on_action_start(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.core.callbacks_mut().on_action_start = Some(Rc::new(f));
        self
    }

    pub fn on_action_update(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.core.callbacks_mut().on_action_update = Some(Rc::new(f));
        self
    }

    pub fn on_action_end(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.core.callbacks_mut().on_action_end = Some(Rc::new(f));
        self
    }

    pub fn on_action_cancel(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.core.callbacks_mut().on_action_cancel = Some(Rc::new(f));
        self
    }

    pub fn with_judge(mut self, f: impl Fn(&GestureEvent) -> GestureJudgeResult + 'static) -> Self {
        self.core.set_judge(Some(Rc::new(f)));
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn info(&self) -> GestureEvent {
        let mut info = self.core.gesture_event(self.last_time);
        info.fingers = finger_infos(&self.core, &self.fingers);
        info.scale = self.scale;
        info.location = self.core.to_global(self.pinch_center);
        info
    }

    fn try_accept(&mut self) {
        if self.core.judge(&self.info()) == GestureJudgeResult::Reject {
            self.core.adjudicate(GestureDisposal::Reject);
            return;
        }
        self.core.adjudicate(GestureDisposal::Accept);
    }

    fn fire(&self, callback: fn(&GestureCallbacks) -> &Option<GestureCallback>) {
        let info = self.info();
        emit(callback(self.core.callbacks()), &info);
    }
}

impl GestureRecognizer for PinchRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "Pinch"
    }

    fn handle_touch_down(&mut self, event: &TouchEvent) {
        if self.core.state().is_terminal() {
            return;
        }
        self.fingers.add_finger(event);
        self.last_time = event.time;
        let current = self.fingers.current_fingers();
        let required = self.fingers.fingers();
        if current > required {
            tracing::debug!(recognizer = self.core.id().as_raw(), current, required, "too many fingers");
            self.core.adjudicate(GestureDisposal::Reject);
            return;
        }
        if current == required && self.core.state() == RefereeState::Ready {
            self.initial_dev = self.fingers.average_deviation();
            self.current_dev = self.initial_dev;
            self.pinch_center = self.fingers.centroid();
            self.core.set_state(RefereeState::Detecting);
        }
    }

    fn handle_touch_move(&mut self, event: &TouchEvent) {
        self.fingers.update_point(event);
        self.last_time = event.time;
        match self.core.state() {
            RefereeState::Detecting => {
                self.current_dev = self.fingers.average_deviation();
                self.pinch_center = self.fingers.centroid();
                if (self.current_dev - self.initial_dev).abs() >= self.distance && self.initial_dev > 0.0 {
                    self.scale = self.current_dev / self.initial_dev;
                    self.try_accept();
                }
            }
            RefereeState::Succeed => {
                self.current_dev = self.fingers.average_deviation();
                self.pinch_center = self.fingers.centroid();
                if self.initial_dev > 0.0 {
                    self.scale = self.current_dev / self.initial_dev;
                }
                self.fire(|c| &c.on_action_update);
            }
            _ => {}
        }
    }

    fn handle_touch_up(&mut self, event: &TouchEvent) {
        self.fingers.release_finger(event);
        self.last_time = event.time;
        match self.core.state() {
            RefereeState::Succeed => {
                if self.fingers.current_fingers() + 1 == self.fingers.fingers() {
                    self.fire(|c| &c.on_action_end);
                }
            }
            RefereeState::Fail => {}
            _ => self.core.adjudicate(GestureDisposal::Reject),
        }
    }

    fn handle_touch_cancel(&mut self, event: &TouchEvent) {
        self.last_time = event.time;
        match self.core.state() {
            RefereeState::Succeed => self.fire(|c| &c.on_action_cancel),
            RefereeState::Fail => {}
            _ => self.core.adjudicate(GestureDisposal::Reject),
        }
    }

    fn handle_axis_begin(&mut self, event: &AxisEvent) {
        if self.core.state().is_terminal() {
            return;
        }
        self.last_time = event.time;
        self.scale = 1.0;
        self.pinch_center = event.position();
        self.core.set_state(RefereeState::Detecting);
    }

    fn handle_axis_update(&mut self, event: &AxisEvent) {
        self.last_time = event.time;
        self.pinch_center = event.position();
        let step = self.core.config().axis_pinch_step;
        if event.pinch_axis_scale != 0.0 {
            self.scale = event.pinch_axis_scale;
        } else if event.modifiers.ctrl_only() {
            if event.vertical_axis < 0.0 {
                self.scale += step;
            } else if event.vertical_axis > 0.0 {
                self.scale = (self.scale - step).max(0.0);
            }
        } else if self.core.state() == RefereeState::Detecting {
            self.core.adjudicate(GestureDisposal::Reject);
            return;
        }

        match self.core.state() {
            RefereeState::Detecting if self.scale != 1.0 => self.try_accept(),
            RefereeState::Succeed => self.fire(|c| &c.on_action_update),
            _ => {}
        }
    }

    fn handle_axis_end(&mut self, event: &AxisEvent) {
        self.last_time = event.time;
        match self.core.state() {
            RefereeState::Succeed => self.fire(|c| &c.on_action_end),
            RefereeState::Fail => {}
            _ => self.core.adjudicate(GestureDisposal::Reject),
        }
    }

    fn handle_axis_cancel(&mut self, event: &AxisEvent) {
        self.last_time = event.time;
        match self.core.state() {
            RefereeState::Succeed => self.fire(|c| &c.on_action_cancel),
            RefereeState::Fail => {}
            _ => self.core.adjudicate(GestureDisposal::Reject),
        }
    }

    fn on_accepted(&mut self) {
        self.fire(|c| &c.on_action_start);
    }

    fn on_rejected(&mut self) {}

    fn on_reset(&mut self) {
        self.initial_dev = 0.0;
        self.current_dev = 0.0;
        self.scale = 1.0;
    }

    fn multi_fingers(&self) -> Option<&MultiFingersState> {
        Some(&self.fingers)
    }

    fn multi_fingers_mut(&mut self) -> Option<&mut MultiFingersState> {
        Some(&mut self.fingers)
    }

    fn custom_info(&self) -> String {
        format!("fingers: {}, distance: {}", self.fingers.fingers(), self.distance)
    }
}
