//! Gesture referee
//!
//! Decides which of the recognizers contending for a pointer wins. The
//! event manager registers candidates per pointer with
//! [`GestureReferee::add_gesture_to_scope`] and forwards every disposal a
//! recognizer posts to [`GestureReferee::adjudicate`].
//!
//! ```text
//! ACCEPT  ─▶ blocked?  ── yes ─▶ SUCCEED_BLOCKED
//!                      └─ no ──▶ SUCCEED, exclusive scope-mates FAIL
//! PENDING ─▶ blocked?  ── yes ─▶ PENDING_BLOCKED
//!                      └─ no ──▶ PENDING
//! REJECT  ─▶ FAIL, then blocked members whose blockers resolved move on
//! ```

use indexmap::IndexMap;

use ripple_input::SourceType;

use crate::recognizer::{RecognizerHandle, RecognizerId};
use crate::scope::GestureScope;
use crate::state::{GestureDisposal, GesturePriority, RefereeState};

/// Invoked with each scope right before it is torn down
pub type QueryStateFunc = Box<dyn Fn(i32, &GestureScope)>;

/// Per-pointer arbitration between recognizers
#[derive(Default)]
pub struct GestureReferee {
    scopes: IndexMap<i32, GestureScope>,
    query_state_func: Option<QueryStateFunc>,
    last_source_type: SourceType,
    last_is_axis: bool,
}

impl GestureReferee {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the hook run on every scope right before cleanup.
    pub fn set_query_state_func(&mut self, func: QueryStateFunc) {
        self.query_state_func = Some(func);
    }

    /// Register contenders for `touch_id`.
    pub fn add_gesture_to_scope(&mut self, touch_id: i32, candidates: &[RecognizerHandle]) {
        let scope = self
            .scopes
            .entry(touch_id)
            .or_insert_with(|| GestureScope::new(touch_id));
        for candidate in candidates {
            if scope.add_member(candidate) {
                tracing::trace!(finger = touch_id, recognizer = candidate.id().as_raw(), "add to scope");
            }
        }
    }

    pub fn scope(&self, touch_id: i32) -> Option<&GestureScope> {
        self.scopes.get(&touch_id)
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.scopes.keys().copied()
    }

    /// Resolve a disposal posted by `recognizer`.
    pub fn adjudicate(&mut self, recognizer: &RecognizerHandle, disposal: GestureDisposal) {
        match disposal {
            GestureDisposal::Accept => self.handle_accept_disposal(recognizer),
            GestureDisposal::Pending => self.handle_pending_disposal(recognizer),
            GestureDisposal::Reject => self.handle_reject_disposal(recognizer),
            GestureDisposal::None => {}
        }
        self.close_delayed_scopes();
    }

    fn is_blocked(&self, recognizer: &RecognizerHandle) -> bool {
        self.scopes
            .values()
            .any(|scope| scope.check_need_blocked(recognizer))
    }

    fn handle_accept_disposal(&mut self, recognizer: &RecognizerHandle) {
        if recognizer.state() == RefereeState::Succeed {
            return;
        }
        if self.is_blocked(recognizer) {
            tracing::debug!(recognizer = recognizer.id().as_raw(), "accept blocked");
            recognizer.borrow_mut().block();
            return;
        }

        let exclusive = recognizer.priority() != GesturePriority::Parallel;
        if exclusive {
            let lost = self.scopes.values().any(|scope| {
                scope
                    .exclusive_members()
                    .any(|m| m.id() != recognizer.id() && m.state() == RefereeState::Succeed)
            });
            if lost {
                tracing::debug!(recognizer = recognizer.id().as_raw(), "accept after another winner");
                recognizer.borrow_mut().reject();
                return;
            }
        }

        // Mark the winner before notifying losers so their callbacks observe it.
        recognizer
            .borrow_mut()
            .core_mut()
            .set_state(RefereeState::Succeed);

        let mut losers: Vec<RecognizerHandle> = Vec::new();
        for scope in self.scopes.values_mut() {
            if !scope.contains(recognizer.id()) {
                continue;
            }
            scope.set_gesture_accepted();
            if exclusive {
                for member in scope.exclusive_members() {
                    if member.id() != recognizer.id() && !losers.contains(member) {
                        losers.push(member.clone());
                    }
                }
            }
        }
        for loser in &losers {
            loser.borrow_mut().reject();
        }
        tracing::debug!(recognizer = recognizer.id().as_raw(), rejected = losers.len(), "accepted");
        recognizer.borrow_mut().on_accepted();
    }

    fn handle_pending_disposal(&mut self, recognizer: &RecognizerHandle) {
        if recognizer.state().is_terminal() {
            return;
        }
        if self.is_blocked(recognizer) {
            recognizer.borrow_mut().block();
            return;
        }
        recognizer.borrow_mut().pend();
    }

    fn handle_reject_disposal(&mut self, recognizer: &RecognizerHandle) {
        let state = recognizer.state();
        if state.is_terminal() {
            return;
        }
        recognizer.borrow_mut().reject();
        if state.is_blocked() {
            return;
        }
        self.unblock();
    }

    /// Let blocked members whose blockers resolved continue.
    fn unblock(&mut self) {
        loop {
            let next = self
                .scopes
                .values()
                .flat_map(|scope| scope.unblocked_members())
                .next();
            let Some(member) = next else {
                break;
            };
            match member.state() {
                RefereeState::SucceedBlocked => {
                    tracing::debug!(recognizer = member.id().as_raw(), "unblocked accept");
                    self.handle_accept_disposal(&member);
                }
                RefereeState::PendingBlocked => {
                    tracing::debug!(recognizer = member.id().as_raw(), "unblocked pending");
                    member.borrow_mut().pend();
                }
                _ => break,
            }
        }
    }

    fn close_delayed_scopes(&mut self) {
        let ready: Vec<i32> = self
            .scopes
            .iter()
            .filter(|(_, scope)| scope.is_delay_closed() && !scope.is_pending())
            .map(|(id, _)| *id)
            .collect();
        for touch_id in ready {
            tracing::debug!(finger = touch_id, "close delayed scope");
            self.close_scope(touch_id, false);
        }
    }

    fn close_scope(&mut self, touch_id: i32, is_blocked: bool) {
        if let Some(scope) = self.scopes.shift_remove(&touch_id) {
            if let Some(func) = &self.query_state_func {
                func(touch_id, &scope);
            }
            scope.close(is_blocked);
        }
    }

    /// The pointer lifted: close its scope, or mark it to close once no
    /// member is pending.
    pub fn clean_gesture_scope(&mut self, touch_id: i32) {
        let Some(scope) = self.scopes.get_mut(&touch_id) else {
            return;
        };
        if scope.is_pending() {
            tracing::debug!(finger = touch_id, "delay scope close");
            scope.set_delay_close();
            return;
        }
        self.close_scope(touch_id, false);
    }

    /// Close every scope.
    pub fn clean_all(&mut self, is_blocked: bool) {
        let ids: Vec<i32> = self.scopes.keys().copied().collect();
        for touch_id in ids {
            self.close_scope(touch_id, is_blocked);
        }
    }

    /// Close scopes with no pending member.
    pub fn clean_redundance_scope(&mut self) {
        let ids: Vec<i32> = self
            .scopes
            .iter()
            .filter(|(_, scope)| !scope.is_pending())
            .map(|(id, _)| *id)
            .collect();
        for touch_id in ids {
            self.close_scope(touch_id, false);
        }
    }

    /// Reset every member of every scope and drop all scopes.
    pub fn force_clean_gesture_referee(&mut self) {
        tracing::debug!(scopes = self.scopes.len(), "force clean referee");
        for scope in self.scopes.values() {
            scope.force_close();
        }
        self.scopes.clear();
    }

    /// Reset members of `touch_id` left terminal by the previous gesture.
    pub fn clean_gesture_referee_state(&mut self, touch_id: i32) {
        if let Some(scope) = self.scopes.get(&touch_id) {
            scope.clean_scope_state();
        }
    }

    /// Record the source of the current event; true if it changed.
    pub fn check_source_type_change(&mut self, source_type: SourceType, is_axis: bool) -> bool {
        let changed = source_type != self.last_source_type || is_axis != self.last_is_axis;
        self.last_source_type = source_type;
        self.last_is_axis = is_axis;
        changed
    }

    /// The previous event came from the axis pipeline and this one is a
    /// pointer event from a device other than a touch screen.
    pub fn check_event_type_change(&mut self, source_type: SourceType, is_axis: bool) -> bool {
        let changed = !is_axis && self.last_is_axis && source_type != SourceType::Touch;
        self.last_is_axis = is_axis;
        changed
    }

    /// No pointer has an unresolved scope.
    pub fn query_all_done(&self) -> bool {
        self.scopes.values().all(GestureScope::query_all_done)
    }

    pub fn query_all_done_for(&self, touch_id: i32) -> bool {
        self.scopes
            .get(&touch_id)
            .map_or(true, GestureScope::query_all_done)
    }

    pub fn has_fail_recognizer(&self, touch_id: i32) -> bool {
        self.scopes
            .get(&touch_id)
            .is_some_and(GestureScope::has_fail_recognizer)
    }

    pub fn has_gesture_accepted(&self, touch_id: i32) -> bool {
        self.scopes
            .get(&touch_id)
            .is_some_and(GestureScope::has_gesture_accepted)
    }

    pub fn is_ready(&self) -> bool {
        self.scopes.values().all(GestureScope::is_ready)
    }

    pub fn is_scopes_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Whether `id` is registered in any scope
    pub fn contains(&self, id: RecognizerId) -> bool {
        self.scopes.values().any(|scope| scope.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::GestureConfig;
    use crate::context::GestureContext;
    use crate::testing::Probe;

    fn setup() -> Rc<GestureContext> {
        GestureContext::new(GestureConfig::testing())
    }

    #[test]
    fn test_single_winner_rejects_exclusive_mates() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Probe::handle(&ctx, "a", GesturePriority::Low, &log);
        let b = Probe::handle(&ctx, "b", GesturePriority::Low, &log);
        let p = Probe::handle(&ctx, "p", GesturePriority::Parallel, &log);
        let mut referee = GestureReferee::new();
        referee.add_gesture_to_scope(0, &[a.clone(), b.clone(), p.clone()]);

        referee.adjudicate(&b, GestureDisposal::Accept);
        assert_eq!(b.state(), RefereeState::Succeed);
        assert_eq!(a.state(), RefereeState::Fail);
        assert_eq!(p.state(), RefereeState::Ready);
        assert!(referee.has_gesture_accepted(0));
        assert_eq!(*log.borrow(), vec!["a:rejected", "b:accepted"]);

        referee.adjudicate(&a, GestureDisposal::Accept);
        assert_eq!(a.state(), RefereeState::Fail);
    }

    #[test]
    fn test_duplicate_candidates_are_ignored() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Probe::handle(&ctx, "a", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        referee.add_gesture_to_scope(0, &[a.clone(), a.clone()]);
        referee.add_gesture_to_scope(0, &[a.clone()]);
        assert_eq!(referee.scope(0).map(GestureScope::len), Some(1));
    }

    #[test]
    fn test_pending_blocks_later_accept_until_rejected() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Probe::handle(&ctx, "first", GesturePriority::Low, &log);
        let second = Probe::handle(&ctx, "second", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        referee.add_gesture_to_scope(0, &[first.clone(), second.clone()]);

        referee.adjudicate(&first, GestureDisposal::Pending);
        assert_eq!(first.state(), RefereeState::Pending);

        second.borrow_mut().core_mut().adjudicate(GestureDisposal::Accept);
        referee.adjudicate(&second, GestureDisposal::Accept);
        assert_eq!(second.state(), RefereeState::SucceedBlocked);

        referee.adjudicate(&first, GestureDisposal::Reject);
        assert_eq!(first.state(), RefereeState::Fail);
        assert_eq!(second.state(), RefereeState::Succeed);
    }

    #[test]
    fn test_low_waits_for_high() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let high = Probe::handle(&ctx, "high", GesturePriority::High, &log);
        let low = Probe::handle(&ctx, "low", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        referee.add_gesture_to_scope(0, &[low.clone(), high.clone()]);

        high.borrow_mut().core_mut().set_state(RefereeState::Detecting);
        low.borrow_mut().core_mut().adjudicate(GestureDisposal::Pending);
        referee.adjudicate(&low, GestureDisposal::Pending);
        assert_eq!(low.state(), RefereeState::PendingBlocked);

        referee.adjudicate(&high, GestureDisposal::Reject);
        assert_eq!(low.state(), RefereeState::Pending);
    }

    #[test]
    fn test_high_accept_rejects_low() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let high = Probe::handle(&ctx, "high", GesturePriority::High, &log);
        let low = Probe::handle(&ctx, "low", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        referee.add_gesture_to_scope(0, &[low.clone(), high.clone()]);

        referee.adjudicate(&high, GestureDisposal::Accept);
        assert_eq!(high.state(), RefereeState::Succeed);
        assert_eq!(low.state(), RefereeState::Fail);
    }

    #[test]
    fn test_clean_scope_runs_hook_then_resets() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Probe::handle(&ctx, "a", GesturePriority::Low, &log);
        let b = Probe::handle(&ctx, "b", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_hook = Rc::clone(&seen);
        referee.set_query_state_func(Box::new(move |touch_id, scope| {
            seen_hook.borrow_mut().push((touch_id, scope.len()));
            for member in scope.members() {
                if member.state().is_unresolved() {
                    member.borrow_mut().reject();
                }
            }
        }));
        referee.add_gesture_to_scope(3, &[a.clone(), b.clone()]);
        b.borrow_mut().core_mut().set_state(RefereeState::Detecting);
        referee.adjudicate(&a, GestureDisposal::Accept);
        // accept does not run the hook
        assert!(seen.borrow().is_empty());

        referee.clean_gesture_scope(3);
        assert_eq!(*seen.borrow(), vec![(3, 2)]);
        assert!(referee.is_scopes_empty());
        assert_eq!(a.state(), RefereeState::Ready);
        assert_eq!(b.state(), RefereeState::Ready);
    }

    #[test]
    fn test_pending_member_delays_close() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Probe::handle(&ctx, "a", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        referee.add_gesture_to_scope(0, &[a.clone()]);
        a.borrow_mut().core_mut().adjudicate(GestureDisposal::Pending);
        referee.adjudicate(&a, GestureDisposal::Pending);

        referee.clean_gesture_scope(0);
        assert!(referee.scope(0).is_some_and(GestureScope::is_delay_closed));

        referee.adjudicate(&a, GestureDisposal::Reject);
        assert!(referee.is_scopes_empty());
        assert_eq!(a.state(), RefereeState::Ready);
    }

    #[test]
    fn test_force_clean_resets_everything() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Probe::handle(&ctx, "a", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        referee.add_gesture_to_scope(0, &[a.clone()]);
        referee.add_gesture_to_scope(1, &[a.clone()]);
        referee.adjudicate(&a, GestureDisposal::Accept);
        referee.force_clean_gesture_referee();
        assert!(referee.is_scopes_empty());
        assert_eq!(a.state(), RefereeState::Ready);
        assert!(log.borrow().contains(&"a:reset".to_string()));
    }

    #[test]
    fn test_queries() {
        let ctx = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Probe::handle(&ctx, "a", GesturePriority::Low, &log);
        let b = Probe::handle(&ctx, "b", GesturePriority::Low, &log);
        let mut referee = GestureReferee::new();
        assert!(referee.query_all_done());
        referee.add_gesture_to_scope(0, &[a.clone(), b.clone()]);
        assert!(referee.is_ready());

        a.borrow_mut().core_mut().set_state(RefereeState::Detecting);
        assert!(!referee.query_all_done());
        assert!(!referee.query_all_done_for(0));
        assert!(referee.query_all_done_for(9));

        referee.adjudicate(&b, GestureDisposal::Reject);
        assert!(referee.has_fail_recognizer(0));
        referee.adjudicate(&a, GestureDisposal::Accept);
        assert!(referee.query_all_done());

        referee.clean_gesture_referee_state(0);
        assert!(referee.is_ready());
    }

    #[test]
    fn test_source_type_change() {
        let mut referee = GestureReferee::new();
        assert!(referee.check_source_type_change(SourceType::Touch, false));
        assert!(!referee.check_source_type_change(SourceType::Touch, false));
        assert!(referee.check_source_type_change(SourceType::Mouse, false));
        assert!(referee.check_source_type_change(SourceType::Mouse, true));

        assert!(referee.check_event_type_change(SourceType::Mouse, false));
        assert!(!referee.check_event_type_change(SourceType::Mouse, false));
    }
}
