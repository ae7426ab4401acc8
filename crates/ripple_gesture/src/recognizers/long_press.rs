//! Long-press recognizer

use std::rc::Rc;
use std::time::Duration;

use ripple_input::{Timestamp, TouchEvent};

use super::{cancel_timer, finger_infos};
use crate::config::validate_fingers;
use crate::context::GestureContext;
use crate::error::{GestureError, Result};
use crate::multi_fingers::MultiFingersState;
use crate::recognizer::{emit, GestureEvent, GestureRecognizer, RecognizerCore};
use crate::state::{GestureDisposal, GestureJudgeResult, GesturePriority, RefereeState};
use crate::timer::{CancelToken, TimerKind};

/// Fires once `fingers` fingers have been held still for `duration`.
///
/// In repeat mode the action callback fires again every `duration` while
/// the fingers stay down. In catch mode (the default) the gesture judge may
/// still veto the press when the deadline expires.
pub struct LongPressRecognizer {
    core: RecognizerCore,
    fingers: MultiFingersState,
    duration: Duration,
    repeat: bool,
    is_catch_mode: bool,
    last_time: Timestamp,
    deadline: Option<CancelToken>,
    repeat_timer: Option<CancelToken>,
}

impl LongPressRecognizer {
    pub fn new(ctx: &Rc<GestureContext>, fingers: usize, repeat: bool, duration_ms: u64) -> Result<Self> {
        let fingers = validate_fingers(fingers)?;
        if duration_ms == 0 {
            return Err(GestureError::InvalidDuration("duration"));
        }
        Ok(Self {
            core: RecognizerCore::new(ctx),
            fingers: MultiFingersState::new(fingers),
            duration: Duration::from_millis(duration_ms),
            repeat,
            is_catch_mode: true,
            last_time: Timestamp::ZERO,
            deadline: None,
            repeat_timer: None,
        })
    }

    /// One finger, no repeat, default duration from the context
    pub fn standard(ctx: &Rc<GestureContext>) -> Self {
        Self {
            core: RecognizerCore::new(ctx),
            fingers: MultiFingersState::new(1),
            duration: Duration::from_millis(ctx.config().long_press_duration_ms),
            repeat: false,
            is_catch_mode: true,
            last_time: Timestamp::ZERO,
            deadline: None,
            repeat_timer: None,
        }
    }

    pub fn with_priority(mut self, priority: GesturePriority) -> Self {
        self.core.set_priority(priority);
        self
    }

    /// Whether the judge is consulted when the deadline expires.
    pub fn with_catch_mode(mut self, catch_mode: bool) -> Self {
        self.is_catch_mode = catch_mode;
        self
    }

    pub fn on_action(mut self, f: impl Fn(&GestureEvent) + 'static) -> Self {
        self.core.callbacks_mut().on_action = Some(Rc::new(f));
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

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn info(&self, repeat: bool) -> GestureEvent {
        let mut info = self.core.gesture_event(self.last_time);
        info.fingers = finger_infos(&self.core, &self.fingers);
        info.location = info.fingers.first().map(|f| f.position).unwrap_or_default();
        info.repeat = repeat;
        info
    }

    fn cancel_timers(&mut self) {
        cancel_timer(&mut self.deadline);
        cancel_timer(&mut self.repeat_timer);
    }

    fn fail(&mut self) {
        self.cancel_timers();
        self.core.adjudicate(GestureDisposal::Reject);
    }

    fn schedule_repeat(&mut self, from: Timestamp) {
        cancel_timer(&mut self.repeat_timer);
        self.repeat_timer = Some(self.core.schedule(TimerKind::Repeat, from + self.duration));
    }
}

impl GestureRecognizer for LongPressRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "LongPress"
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
            self.fail();
            return;
        }
        if current == required && self.core.state() == RefereeState::Ready {
            self.core.set_state(RefereeState::Detecting);
            cancel_timer(&mut self.deadline);
            self.deadline = Some(self.core.schedule(TimerKind::Deadline, event.time + self.duration));
        }
    }

    fn handle_touch_move(&mut self, event: &TouchEvent) {
        if self.core.state().is_terminal() {
            self.fingers.update_point(event);
            return;
        }
        self.fingers.update_point(event);
        self.last_time = event.time;
        if self.fingers.max_travel() > self.core.config().long_press_move_threshold {
            tracing::debug!(recognizer = self.core.id().as_raw(), "long press moved too far");
            self.fail();
        }
    }

    fn handle_touch_up(&mut self, event: &TouchEvent) {
        self.fingers.release_finger(event);
        self.last_time = event.time;
        match self.core.state() {
            RefereeState::Succeed => {
                self.cancel_timers();
                if self.fingers.current_fingers() == 0 {
                    let info = self.info(false);
                    emit(&self.core.callbacks().on_action_end, &info);
                }
            }
            RefereeState::Fail => {}
            _ => self.fail(),
        }
    }

    fn handle_touch_cancel(&mut self, event: &TouchEvent) {
        self.last_time = event.time;
        match self.core.state() {
            RefereeState::Succeed => {
                self.cancel_timers();
                let info = self.info(false);
                emit(&self.core.callbacks().on_action_cancel, &info);
            }
            RefereeState::Fail => {}
            _ => self.fail(),
        }
    }

    fn on_timer(&mut self, kind: TimerKind, now: Timestamp) {
        match kind {
            TimerKind::Deadline => {
                self.deadline = None;
                if self.core.state() != RefereeState::Detecting {
                    return;
                }
                self.last_time = now;
                if self.is_catch_mode && self.core.judge(&self.info(false)) == GestureJudgeResult::Reject {
                    tracing::debug!(recognizer = self.core.id().as_raw(), "judge rejected long press");
                    self.fail();
                    return;
                }
                self.core.adjudicate(GestureDisposal::Accept);
            }
            TimerKind::Repeat => {
                self.repeat_timer = None;
                if self.core.state() != RefereeState::Succeed {
                    return;
                }
                self.last_time = now;
                let info = self.info(true);
                emit(&self.core.callbacks().on_action, &info);
                self.schedule_repeat(now);
            }
            _ => {}
        }
    }

    fn on_accepted(&mut self) {
        cancel_timer(&mut self.deadline);
        let info = self.info(false);
        emit(&self.core.callbacks().on_action, &info);
        if self.repeat {
            self.schedule_repeat(self.last_time);
        }
    }

    fn on_rejected(&mut self) {
        self.cancel_timers();
    }

    fn on_reset(&mut self) {
        self.cancel_timers();
    }

    fn multi_fingers(&self) -> Option<&MultiFingersState> {
        Some(&self.fingers)
    }

    fn multi_fingers_mut(&mut self) -> Option<&mut MultiFingersState> {
        Some(&mut self.fingers)
    }

    fn custom_info(&self) -> String {
        format!(
            "fingers: {}, duration: {}ms, repeat: {}, catch: {}",
            self.fingers.fingers(),
            self.duration.as_millis(),
            self.repeat,
            self.is_catch_mode
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use ripple_input::TouchType;

    use super::*;
    use crate::config::GestureConfig;
    use crate::recognizer::RecognizerHandle;
    use crate::testing::{advance, feed, touch};

    fn setup() -> Rc<GestureContext> {
        GestureContext::new(GestureConfig::testing())
    }

    fn recording(lp: LongPressRecognizer) -> (RecognizerHandle, Rc<RefCell<Vec<bool>>>) {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        let handle = RecognizerHandle::new(lp.on_action(move |info| sink.borrow_mut().push(info.repeat)));
        (handle, fired)
    }

    #[test]
    fn test_fires_once_at_duration() {
        let ctx = setup();
        let (handle, fired) = recording(LongPressRecognizer::new(&ctx, 1, false, 500).unwrap());
        let handles = std::slice::from_ref(&handle);

        feed(&ctx, &handle, &touch(0, TouchType::Down, 10.0, 10.0, 0));
        assert_eq!(handle.state(), RefereeState::Detecting);
        advance(&ctx, handles, Timestamp::from_millis(499));
        assert!(fired.borrow().is_empty());

        advance(&ctx, handles, Timestamp::from_millis(500));
        assert_eq!(handle.state(), RefereeState::Succeed);
        advance(&ctx, handles, Timestamp::from_millis(2000));
        assert_eq!(*fired.borrow(), vec![false]);
    }

    #[test]
    fn test_repeat_refires_every_duration() {
        let ctx = setup();
        let (handle, fired) = recording(LongPressRecognizer::new(&ctx, 1, true, 500).unwrap());
        let handles = std::slice::from_ref(&handle);

        feed(&ctx, &handle, &touch(0, TouchType::Down, 10.0, 10.0, 0));
        advance(&ctx, handles, Timestamp::from_millis(1600));
        assert_eq!(*fired.borrow(), vec![false, true, true]);

        feed(&ctx, &handle, &touch(0, TouchType::Up, 10.0, 10.0, 1700));
        advance(&ctx, handles, Timestamp::from_millis(5000));
        assert_eq!(fired.borrow().len(), 3);
    }

    #[test]
    fn test_early_up_rejects() {
        let ctx = setup();
        let (handle, fired) = recording(LongPressRecognizer::standard(&ctx));
        feed(&ctx, &handle, &touch(0, TouchType::Down, 10.0, 10.0, 0));
        feed(&ctx, &handle, &touch(0, TouchType::Up, 10.0, 10.0, 100));
        assert_eq!(handle.state(), RefereeState::Fail);
        advance(&ctx, std::slice::from_ref(&handle), Timestamp::from_millis(1000));
        assert!(fired.borrow().is_empty());
    }

    #[test]
    fn test_move_past_threshold_rejects() {
        let ctx = setup();
        let (handle, _) = recording(LongPressRecognizer::standard(&ctx));
        feed(&ctx, &handle, &touch(0, TouchType::Down, 10.0, 10.0, 0));
        feed(&ctx, &handle, &touch(0, TouchType::Move, 20.0, 10.0, 50));
        assert_eq!(handle.state(), RefereeState::Detecting);
        feed(&ctx, &handle, &touch(0, TouchType::Move, 30.0, 10.0, 100));
        assert_eq!(handle.state(), RefereeState::Fail);
    }

    #[test]
    fn test_judge_rejects_after_deadline() {
        let ctx = setup();
        let (handle, fired) = recording(
            LongPressRecognizer::standard(&ctx).with_judge(|_| GestureJudgeResult::Reject),
        );
        feed(&ctx, &handle, &touch(0, TouchType::Down, 10.0, 10.0, 0));
        advance(&ctx, std::slice::from_ref(&handle), Timestamp::from_millis(600));
        assert_eq!(handle.state(), RefereeState::Fail);
        assert!(fired.borrow().is_empty());
    }

    #[test]
    fn test_judge_ignored_outside_catch_mode() {
        let ctx = setup();
        let (handle, fired) = recording(
            LongPressRecognizer::standard(&ctx)
                .with_judge(|_| GestureJudgeResult::Reject)
                .with_catch_mode(false),
        );
        feed(&ctx, &handle, &touch(0, TouchType::Down, 10.0, 10.0, 0));
        advance(&ctx, std::slice::from_ref(&handle), Timestamp::from_millis(600));
        assert_eq!(handle.state(), RefereeState::Succeed);
        assert_eq!(*fired.borrow(), vec![false]);
    }

    #[test]
    fn test_end_callback_after_success() {
        let ctx = setup();
        let ended = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&ended);
        let handle = RecognizerHandle::new(
            LongPressRecognizer::standard(&ctx).on_action_end(move |_| *sink.borrow_mut() += 1),
        );
        feed(&ctx, &handle, &touch(0, TouchType::Down, 10.0, 10.0, 0));
        advance(&ctx, std::slice::from_ref(&handle), Timestamp::from_millis(500));
        feed(&ctx, &handle, &touch(0, TouchType::Up, 10.0, 10.0, 700));
        assert_eq!(*ended.borrow(), 1);
    }
}
