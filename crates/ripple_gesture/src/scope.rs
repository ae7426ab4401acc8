//! Per-pointer gesture scopes

use crate::recognizer::{RecognizerHandle, RecognizerId};
use crate::state::{GesturePriority, RefereeState};

/// Recognizers contending for one pointer id, split into priority tiers.
///
/// High and Low members compete exclusively: High members resolve first and
/// within a tier the member registered earlier resolves first. Parallel
/// members run alongside both tiers.
#[derive(Debug, Default)]
pub struct GestureScope {
    touch_id: i32,
    high: Vec<RecognizerHandle>,
    low: Vec<RecognizerHandle>,
    parallel: Vec<RecognizerHandle>,
    has_gesture_accepted: bool,
    delay_close: bool,
}

impl GestureScope {
    pub fn new(touch_id: i32) -> Self {
        Self {
            touch_id,
            ..Default::default()
        }
    }

    pub fn touch_id(&self) -> i32 {
        self.touch_id
    }

    /// Register a member in the tier matching its priority.
    ///
    /// Returns false if the recognizer is already a member.
    pub fn add_member(&mut self, recognizer: &RecognizerHandle) -> bool {
        if self.contains(recognizer.id()) {
            return false;
        }
        let tier = match recognizer.priority() {
            GesturePriority::High => &mut self.high,
            GesturePriority::Low => &mut self.low,
            GesturePriority::Parallel => &mut self.parallel,
        };
        tier.push(recognizer.clone());
        true
    }

    pub fn contains(&self, id: RecognizerId) -> bool {
        self.members().any(|m| m.id() == id)
    }

    pub fn high_recognizers(&self) -> &[RecognizerHandle] {
        &self.high
    }

    pub fn low_recognizers(&self) -> &[RecognizerHandle] {
        &self.low
    }

    pub fn parallel_recognizers(&self) -> &[RecognizerHandle] {
        &self.parallel
    }

    /// All members: High, then Low, then Parallel.
    pub fn members(&self) -> impl Iterator<Item = &RecognizerHandle> {
        self.high.iter().chain(self.low.iter()).chain(self.parallel.iter())
    }

    /// Members that compete exclusively, in resolution order.
    pub fn exclusive_members(&self) -> impl Iterator<Item = &RecognizerHandle> {
        self.high.iter().chain(self.low.iter())
    }

    pub fn len(&self) -> usize {
        self.high.len() + self.low.len() + self.parallel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_gesture_accepted(&self) -> bool {
        self.has_gesture_accepted
    }

    pub(crate) fn set_gesture_accepted(&mut self) {
        self.has_gesture_accepted = true;
    }

    pub fn is_delay_closed(&self) -> bool {
        self.delay_close
    }

    pub(crate) fn set_delay_close(&mut self) {
        self.delay_close = true;
    }

    /// Some member waits for the rest of the scope.
    pub fn is_pending(&self) -> bool {
        self.members()
            .any(|m| matches!(m.state(), RefereeState::Pending | RefereeState::PendingBlocked))
    }

    /// No member is still contending.
    pub fn query_all_done(&self) -> bool {
        self.members().all(|m| {
            matches!(
                m.state(),
                RefereeState::Ready | RefereeState::Succeed | RefereeState::Fail
            )
        })
    }

    pub fn is_ready(&self) -> bool {
        self.members().all(|m| m.state() == RefereeState::Ready)
    }

    pub fn has_fail_recognizer(&self) -> bool {
        self.members().any(|m| m.state() == RefereeState::Fail)
    }

    /// Whether `recognizer` must wait for another member before resolving.
    pub fn check_need_blocked(&self, recognizer: &RecognizerHandle) -> bool {
        let priority = match self
            .members()
            .find(|m| m.id() == recognizer.id())
            .map(|m| m.priority())
        {
            Some(priority) => priority,
            None => return false,
        };
        if priority == GesturePriority::Parallel {
            return false;
        }
        for member in self.exclusive_members() {
            if member.id() == recognizer.id() {
                break;
            }
            if member.state() == RefereeState::Pending {
                return true;
            }
        }
        priority == GesturePriority::Low && self.high.iter().any(|m| m.state().is_unresolved())
    }

    /// Blocked members whose blockers have resolved, in resolution order.
    pub fn unblocked_members(&self) -> Vec<RecognizerHandle> {
        self.exclusive_members()
            .filter(|m| m.state().is_blocked() && !self.check_need_blocked(m))
            .cloned()
            .collect()
    }

    /// Hand every member the closing notification for this pointer.
    pub fn close(&self, is_blocked: bool) {
        for member in self.members() {
            member.borrow_mut().finish_referee(self.touch_id, is_blocked);
        }
    }

    /// Reset every member regardless of its state.
    pub fn force_close(&self) {
        for member in self.members() {
            member.borrow_mut().reset_status();
        }
    }

    /// Reset members left in a terminal state by an earlier gesture.
    pub fn clean_scope_state(&self) {
        for member in self.members() {
            if member.state().is_terminal() {
                member.borrow_mut().reset_status();
            }
        }
    }
}
