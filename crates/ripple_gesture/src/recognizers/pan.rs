//! Pan recognizer

use std::rc::Rc;

use bitflags::bitflags;

use ripple_input::{Axis, AxisEvent, Offset, Point, Timestamp, TouchEvent};

use super::finger_infos;
use crate::config::validate_fingers;
use crate::context::GestureContext;
use crate::error::{GestureError, Result};
use crate::multi_fingers::MultiFingersState;
use crate::recognizer::{
    emit, GestureCallback, GestureCallbacks, GestureEvent, GestureRecognizer, RecognizerCore,
};
use crate::state::{GestureDisposal, GestureJudgeResult, GesturePriority, RefereeState};

bitflags! {
    /// Directions a pan may start in
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PanDirection: u8 {
        const NONE = 0;
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

enum Verdict {
    Detecting,
    Accept,
    Reject,
}

/// Recognizes fingers dragging past a distance in an allowed direction.
pub struct PanRecognizer {
    core: RecognizerCore,
    fingers: MultiFingersState,
    direction: PanDirection,
    distance: f32,
    offset: Offset,
    velocity: Offset,
    last_point: Point,
    last_time: Timestamp,
}

impl PanRecognizer {
    pub fn new(ctx: &Rc<GestureContext>, fingers: usize, direction: PanDirection, distance: f32) -> Result<Self> {
        let fingers = validate_fingers(fingers)?;
        if distance < 0.0 {
            return Err(GestureError::InvalidDistance("distance", distance));
        }
        Ok(Self::build(ctx, fingers, direction, distance))
    }

    /// One finger, every direction, default distance from the context
    pub fn standard(ctx: &Rc<GestureContext>) -> Self {
        let distance = ctx.config().pan_distance_px();
        Self::build(ctx, 1, PanDirection::ALL, distance)
    }

    fn build(ctx: &Rc<GestureContext>, fingers: usize, direction: PanDirection, distance: f32) -> Self {
        Self {
            core: RecognizerCore::new(ctx),
            fingers: MultiFingersState::new(fingers),
            direction,
            distance,
            offset: Offset::ZERO,
            velocity: Offset::ZERO,
            last_point: Point::default(),
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

    pub fn direction(&self) -> PanDirection {
        self.direction
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    fn info(&self) -> GestureEvent {
        let mut info = self.core.gesture_event(self.last_time);
        info.fingers = finger_infos(&self.core, &self.fingers);
        info.location = self.core.to_global(self.last_point);
        info.offset = self.offset;
        info.velocity = self.velocity;
        info
    }

    fn fire(&self, callback: fn(&GestureCallbacks) -> &Option<GestureCallback>) {
        let info = self.info();
        emit(callback(self.core.callbacks()), &info);
    }

    fn verdict(&self) -> Verdict {
        let Offset { dx, dy } = self.offset;
        let horizontal = self.direction.intersects(PanDirection::HORIZONTAL);
        let vertical = self.direction.intersects(PanDirection::VERTICAL);
        let matches_x = (dx < 0.0 && self.direction.contains(PanDirection::LEFT))
            || (dx > 0.0 && self.direction.contains(PanDirection::RIGHT));
        let matches_y = (dy < 0.0 && self.direction.contains(PanDirection::UP))
            || (dy > 0.0 && self.direction.contains(PanDirection::DOWN));

        if self.direction == PanDirection::ALL {
            return if self.offset.length() >= self.distance { Verdict::Accept } else { Verdict::Detecting };
        }
        match (horizontal, vertical) {
            (false, false) => Verdict::Reject,
            (true, false) => {
                if dx.abs() < self.distance {
                    Verdict::Detecting
                } else if matches_x {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
            (false, true) => {
                if dy.abs() < self.distance {
                    Verdict::Detecting
                } else if matches_y {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
            (true, true) => {
                if self.offset.length() < self.distance {
                    Verdict::Detecting
                } else if (dx.abs() >= dy.abs() && matches_x) || (dy.abs() > dx.abs() && matches_y) {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
        }
    }

    fn detect(&mut self) {
        match self.verdict() {
            Verdict::Detecting => {}
            Verdict::Reject => {
                tracing::debug!(recognizer = self.core.id().as_raw(), "pan in disallowed direction");
                self.core.adjudicate(GestureDisposal::Reject);
            }
            Verdict::Accept => {
                if self.core.judge(&self.info()) == GestureJudgeResult::Reject {
                    self.core.adjudicate(GestureDisposal::Reject);
                } else {
                    self.core.adjudicate(GestureDisposal::Accept);
                }
            }
        }
    }

    fn track(&mut self, point: Point, time: Timestamp) {
        let elapsed = time.millis_since(self.last_time);
        if elapsed > 0 {
            let delta = point - self.last_point;
            self.velocity = Offset::new(delta.dx / elapsed as f32, delta.dy / elapsed as f32);
        }
        self.last_point = point;
        self.last_time = time;
    }

    fn travelled(&self) -> Offset {
        let mut sum = Offset::ZERO;
        let mut count = 0usize;
        for point in self.fingers.touch_points() {
            if let Some(down) = self.fingers.down_point(point.id) {
                sum = sum + (point.position() - down.position());
                count += 1;
            }
        }
        if count == 0 {
            return Offset::ZERO;
        }
        Offset::new(sum.dx / count as f32, sum.dy / count as f32)
    }
}

impl GestureRecognizer for PanRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "Pan"
    }

    fn handle_touch_down(&mut self, event: &TouchEvent) {
        if self.core.state().is_terminal() {
            return;
        }
        self.fingers.add_finger(event);
        self.track(self.fingers.centroid(), event.time);
        if self.fingers.current_fingers() == self.fingers.fingers() && self.core.state() == RefereeState::Ready {
            self.offset = Offset::ZERO;
            self.core.set_state(RefereeState::Detecting);
        }
    }

    fn handle_touch_move(&mut self, event: &TouchEvent) {
        self.fingers.update_point(event);
        self.track(self.fingers.centroid(), event.time);
        match self.core.state() {
            RefereeState::Detecting => {
                self.offset = self.travelled();
                self.detect();
            }
            RefereeState::Succeed => {
                self.offset = self.travelled();
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
        self.offset = Offset::ZERO;
        self.velocity = Offset::ZERO;
        self.last_point = event.position();
        self.last_time = event.time;
        self.core.set_state(RefereeState::Detecting);
    }

    fn handle_axis_update(&mut self, event: &AxisEvent) {
        let previous = self.last_time;
        self.offset = self.offset + Offset::new(-event.horizontal_axis, -event.vertical_axis);
        self.last_point = event.position();
        self.last_time = event.time;
        let elapsed = event.time.millis_since(previous);
        if elapsed > 0 {
            self.velocity = Offset::new(-event.horizontal_axis / elapsed as f32, -event.vertical_axis / elapsed as f32);
        }
        match self.core.state() {
            RefereeState::Detecting => self.detect(),
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
        self.offset = Offset::ZERO;
        self.velocity = Offset::ZERO;
    }

    fn axis_direction(&self) -> Axis {
        let horizontal = self.direction.intersects(PanDirection::HORIZONTAL);
        let vertical = self.direction.intersects(PanDirection::VERTICAL);
        match (horizontal, vertical) {
            (true, true) => Axis::Free,
            (true, false) => Axis::Horizontal,
            (false, true) => Axis::Vertical,
            (false, false) => Axis::None,
        }
    }

    fn multi_fingers(&self) -> Option<&MultiFingersState> {
        Some(&self.fingers)
    }

    fn multi_fingers_mut(&mut self) -> Option<&mut MultiFingersState> {
        Some(&mut self.fingers)
    }

    fn custom_info(&self) -> String {
        format!(
            "fingers: {}, direction: {:#06b}, distance: {}",
            self.fingers.fingers(),
            self.direction.bits(),
            self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use ripple_input::{AxisAction, TouchType};

    use super::*;
    use crate::config::GestureConfig;
    use crate::recognizer::RecognizerHandle;
    use crate::testing::{feed, settle, touch};

    fn setup() -> Rc<GestureContext> {
        GestureContext::new(GestureConfig::testing())
    }

    #[test]
    fn test_accepts_after_distance() {
        let ctx = setup();
        let starts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&starts);
        let handle = RecognizerHandle::new(
            PanRecognizer::standard(&ctx).on_action_start(move |info| sink.borrow_mut().push(info.offset)),
        );
        feed(&ctx, &handle, &touch(0, TouchType::Down, 0.0, 0.0, 0));
        feed(&ctx, &handle, &touch(0, TouchType::Move, 3.0, 0.0, 10));
        assert_eq!(handle.state(), RefereeState::Detecting);
        feed(&ctx, &handle, &touch(0, TouchType::Move, 8.0, 0.0, 20));
        assert_eq!(handle.state(), RefereeState::Succeed);
        assert_eq!(*starts.borrow(), vec![Offset::new(8.0, 0.0)]);
    }

    #[test]
    fn test_wrong_direction_rejects() {
        let ctx = setup();
        let handle = RecognizerHandle::new(PanRecognizer::new(&ctx, 1, PanDirection::HORIZONTAL, 5.0).unwrap());
        feed(&ctx, &handle, &touch(0, TouchType::Down, 0.0, 0.0, 0));
        feed(&ctx, &handle, &touch(0, TouchType::Move, 0.0, 20.0, 10));
        assert_eq!(handle.state(), RefereeState::Detecting);

        let left = RecognizerHandle::new(PanRecognizer::new(&ctx, 1, PanDirection::LEFT, 5.0).unwrap());
        feed(&ctx, &left, &touch(0, TouchType::Down, 0.0, 0.0, 0));
        feed(&ctx, &left, &touch(0, TouchType::Move, 10.0, 0.0, 10));
        assert_eq!(left.state(), RefereeState::Fail);
    }

    #[test]
    fn test_axis_direction() {
        let ctx = setup();
        let vertical = PanRecognizer::new(&ctx, 1, PanDirection::VERTICAL, 5.0).unwrap();
        assert_eq!(vertical.axis_direction(), Axis::Vertical);
        assert_eq!(PanRecognizer::standard(&ctx).axis_direction(), Axis::Free);
    }

    #[test]
    fn test_wheel_scroll_accumulates() {
        let ctx = setup();
        let handle = RecognizerHandle::new(PanRecognizer::new(&ctx, 1, PanDirection::VERTICAL, 5.0).unwrap());
        let scroll = |action, v: f32, t: u64| {
            handle
                .borrow_mut()
                .handle_axis_event(&AxisEvent::new(0, action, 0.0, 0.0, Timestamp::from_millis(t)).with_axes(0.0, v));
            settle(&ctx, std::slice::from_ref(&handle));
        };
        scroll(AxisAction::Begin, 0.0, 0);
        scroll(AxisAction::Update, -3.0, 10);
        assert_eq!(handle.state(), RefereeState::Detecting);
        scroll(AxisAction::Update, -3.0, 20);
        assert_eq!(handle.state(), RefereeState::Succeed);
    }
}
